use crate::config::WARN_LOSS_PERCENT;
use crate::endpoint::EndpointStats;
use crate::features::window::LossRatio;

const ADDRESS_WIDTH: usize = 16;
const TOTAL_WIDTH: usize = 4;
const FAILED_WIDTH: usize = 3;

/// Digit width used to zero-pad window counts so the progress line does not
/// jitter as it fills.
pub(super) fn count_width(capacity: usize) -> usize {
    capacity.to_string().len()
}

pub(super) fn format_ratio(ratio: LossRatio, width: usize) -> String {
    format!(
        "Packetloss rate ({:0width$}/{:0width$}): {:.2}%",
        ratio.failed,
        ratio.total,
        ratio.percent(),
        width = width
    )
}

pub(super) fn progress_line(ratio: LossRatio, capacity: usize) -> String {
    format!("🔄 {}", format_ratio(ratio, count_width(capacity)))
}

pub(super) fn endpoint_line(stats: &EndpointStats) -> String {
    format!(
        "{:<aw$}: {:>tw$} pings, {:>fw$} failed",
        stats.address,
        stats.total,
        stats.failed,
        aw = ADDRESS_WIDTH,
        tw = TOTAL_WIDTH,
        fw = FAILED_WIDTH
    )
}

pub(super) fn verdict_line(overall: Option<LossRatio>, width: usize) -> String {
    match overall {
        Some(ratio) if ratio.percent() < WARN_LOSS_PERCENT => {
            format!("✅ {}", format_ratio(ratio, width))
        }
        Some(ratio) => format!("⚠️ {}", format_ratio(ratio, width)),
        None => "➖ Packetloss rate: no samples recorded".to_string(),
    }
}
