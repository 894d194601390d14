use std::io;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

/// Exit code used when Ctrl+C arrives while no sampler is listening.
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Single-shot stop flag, checked cooperatively by the sampling loop.
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

// `ctrlc` accepts one handler per process, so it is registered once and
// dispatches to whichever token the live guard published.
static HANDLER: OnceLock<Result<(), String>> = OnceLock::new();
static ACTIVE_TOKEN: Mutex<Option<CancellationToken>> = Mutex::new(None);

fn active_token() -> MutexGuard<'static, Option<CancellationToken>> {
    ACTIVE_TOKEN.lock().unwrap_or_else(PoisonError::into_inner)
}

fn ensure_handler() -> io::Result<()> {
    HANDLER
        .get_or_init(|| ctrlc::set_handler(on_interrupt).map_err(|err| err.to_string()))
        .clone()
        .map_err(io::Error::other)
}

fn on_interrupt() {
    let token = active_token().clone();
    match token {
        Some(token) => {
            tracing::debug!("Interrupt received");
            token.cancel();
        }
        None => process::exit(INTERRUPTED_EXIT_CODE),
    }
}

/// Routes Ctrl+C into a [`CancellationToken`] for as long as it is alive.
///
/// Once the guard drops, Ctrl+C exits the process as it would by default.
pub struct InterruptGuard {
    _private: (),
}

impl InterruptGuard {
    pub fn install(token: &CancellationToken) -> io::Result<Self> {
        ensure_handler()?;
        *active_token() = Some(token.clone());
        Ok(Self { _private: () })
    }
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        active_token().take();
    }
}
