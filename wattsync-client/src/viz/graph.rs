use crate::state::PowerHistoryPoint;

/// The live usage graph always renders exactly this many bars.
pub const MAX_BARS: usize = 60;

/// Hairline height so zero and near-zero bars stay visible.
pub const MIN_BAR_HEIGHT: f64 = 0.025;

pub const CRITICAL_THRESHOLD: f64 = 0.9;
pub const WARNING_THRESHOLD: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarLevel {
    Normal,
    Warning,
    Critical,
    /// Undefined scale, the limit is zero.
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsageBar {
    pub power: f64,
    /// Height fraction of the full graph, clamped to the hairline
    /// minimum.
    pub height: f64,
    pub level: BarLevel,
}

/// Monitor reachability as reflected by the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorSignal {
    Live,
    /// Monitor offline but recorded history remains on screen.
    Stale,
    /// Monitor offline and nothing recorded.
    NoData,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UsageGraph {
    pub bars: Vec<UsageBar>,
    pub signal: MonitorSignal,
}

fn bar_for(power: f64, power_limit: f64) -> UsageBar {
    if power_limit <= 0.0 {
        return UsageBar {
            power,
            height: MIN_BAR_HEIGHT,
            level: BarLevel::Neutral,
        };
    }

    let fraction = power / power_limit;
    let level = if fraction > CRITICAL_THRESHOLD {
        BarLevel::Critical
    } else if fraction > WARNING_THRESHOLD {
        BarLevel::Warning
    } else {
        BarLevel::Normal
    };

    UsageBar {
        power,
        height: fraction.clamp(MIN_BAR_HEIGHT, 1.0),
        level,
    }
}

/// Maps the pruned history onto a fixed-width bar sequence: the last
/// `MAX_BARS` points, left-padded with zero-power placeholders so the
/// count is always exact.
pub fn build_usage_graph(
    history: &[PowerHistoryPoint],
    power_limit: f64,
    monitor_online: bool,
) -> UsageGraph {
    let recent = &history[history.len().saturating_sub(MAX_BARS)..];
    let padding = MAX_BARS - recent.len();

    let bars = std::iter::repeat(0.0)
        .take(padding)
        .chain(recent.iter().map(|point| point.power))
        .map(|power| bar_for(power, power_limit))
        .collect();

    let signal = if monitor_online {
        MonitorSignal::Live
    } else if history.is_empty() {
        MonitorSignal::NoData
    } else {
        MonitorSignal::Stale
    };

    UsageGraph { bars, signal }
}
