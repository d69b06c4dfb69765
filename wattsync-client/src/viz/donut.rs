use wattsync_api::models::{Device, DeviceType};

/// Fixed palette cycled over segment index.
pub const SEGMENT_COLORS: [&str; 5] = ["#3b82f6", "#ef4444", "#10b981", "#f97316", "#8b5cf6"];
/// The unattributed-load segment always renders in this color.
pub const OTHER_COLOR: &str = "#6b7280";
/// Remaining capacity renders as a neutral arc.
pub const UNUSED_COLOR: &str = "#e5e7eb";

/// Appliance segments at or below this draw are noise and dropped.
pub const NOISE_THRESHOLD_WATTS: f64 = 0.1;

pub const OTHER_SEGMENT_NAME: &str = "Other";

#[derive(Debug, Clone, PartialEq)]
pub struct DonutSegment {
    pub name: String,
    pub power: f64,
    /// Angular share in degrees out of the power limit.
    pub sweep_degrees: f64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DonutChart {
    /// "Other" first, then appliances in collection order.
    pub segments: Vec<DonutSegment>,
    pub total_power: f64,
    pub power_limit: f64,
    /// Neutral arc for capacity not covered by any segment.
    pub unused_degrees: f64,
}

fn sweep_for(power: f64, power_limit: f64) -> f64 {
    if power_limit <= 0.0 {
        return 0.0;
    }
    power / power_limit * 360.0
}

/// Builds the per-appliance share breakdown of the monitor's total
/// draw. The total is the monitor's own reading while it is online,
/// falling back to the appliances sum when the monitor is unreachable
/// so the chart still renders something meaningful. The "Other"
/// segment is retained even at zero for a stable color legend.
pub fn build_donut(devices: &[Device], power_limit: f64) -> DonutChart {
    let monitor = devices
        .iter()
        .find(|device| device.device_type == DeviceType::PowerMonitor);

    let online_appliances: Vec<&Device> = devices
        .iter()
        .filter(|device| device.is_appliance() && device.is_online)
        .collect();

    let appliances_power: f64 = online_appliances
        .iter()
        .map(|device| device.current_power)
        .sum();

    let total_power = match monitor {
        Some(monitor) if monitor.is_online => monitor.current_power,
        _ => appliances_power,
    };

    let other_power = (total_power - appliances_power).max(0.0);

    let mut segments = vec![DonutSegment {
        name: OTHER_SEGMENT_NAME.to_string(),
        power: other_power,
        sweep_degrees: sweep_for(other_power, power_limit),
        color: OTHER_COLOR,
    }];

    for device in online_appliances {
        if device.current_power <= NOISE_THRESHOLD_WATTS {
            continue;
        }
        let index = segments.len();
        segments.push(DonutSegment {
            name: device.name.clone(),
            power: device.current_power,
            sweep_degrees: sweep_for(device.current_power, power_limit),
            color: SEGMENT_COLORS[index % SEGMENT_COLORS.len()],
        });
    }

    let used_degrees: f64 = segments.iter().map(|segment| segment.sweep_degrees).sum();

    DonutChart {
        segments,
        total_power,
        power_limit,
        unused_degrees: (360.0 - used_degrees).max(0.0),
    }
}
