use super::Reporter;
use super::format::{count_width, endpoint_line, progress_line, verdict_line};
use crate::endpoint::EndpointStats;
use crate::features::window::LossRatio;
use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};
use std::io::{self, Stdout, Write};

/// Renders the progress line in place and the final summary below it.
pub struct TerminalReporter<W: Write = Stdout> {
    out: W,
    capacity: usize,
}

impl TerminalReporter<Stdout> {
    pub fn stdout(capacity: usize) -> Self {
        Self::new(io::stdout(), capacity)
    }
}

impl<W: Write> TerminalReporter<W> {
    pub fn new(out: W, capacity: usize) -> Self {
        Self { out, capacity }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn rewrite_line(&mut self, text: &str) -> io::Result<()> {
        queue!(self.out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }

    fn write_final(
        &mut self,
        endpoints: &[EndpointStats],
        overall: Option<LossRatio>,
    ) -> io::Result<()> {
        self.rewrite_line("📋 Endpoints pinged:\n")?;
        for stats in endpoints {
            writeln!(self.out, "{}", endpoint_line(stats))?;
        }
        writeln!(
            self.out,
            "{}",
            verdict_line(overall, count_width(self.capacity))
        )?;
        self.out.flush()
    }
}

impl<W: Write> Reporter for TerminalReporter<W> {
    fn report_progress(&mut self, window: LossRatio, capacity: usize) {
        self.capacity = capacity;
        if let Err(err) = self.rewrite_line(&progress_line(window, capacity)) {
            tracing::warn!(error = %err, "Failed to write progress line");
        }
    }

    fn report_final(&mut self, endpoints: &[EndpointStats], overall: Option<LossRatio>) {
        if let Err(err) = self.write_final(endpoints, overall) {
            tracing::warn!(error = %err, "Failed to write final report");
        }
    }

    fn report_interrupted(&mut self) {
        if let Err(err) = self.rewrite_line("⏹️  Exiting packetloss monitor.\n") {
            tracing::warn!(error = %err, "Failed to write exit notice");
        }
    }
}
