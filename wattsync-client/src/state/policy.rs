use wattsync_api::models::{Device, DeviceType, SystemSettings};

/// A grid monitor reporting at or below this voltage is treated as a
/// blackout even while technically online.
pub const GRID_VOLTAGE_THRESHOLD: f64 = 100.0;

/// Which power-save message applies. Vacation wins over a blackout
/// when both hold: it is a deliberate user override, the outage is
/// incidental.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerSaveReason {
    Vacation,
    GridOutage,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolicyOutput {
    pub is_power_save_mode: bool,
    pub is_vacation_mode: bool,
    pub is_grid_available: bool,
    /// Donut ceiling. The server enforces the separate power-save
    /// limit during shedding, the client only displays the mode.
    pub display_limit: f64,
    pub reason: Option<PowerSaveReason>,
}

/// Derives the system-wide operating mode from settings and the grid
/// monitor's state. With no grid monitor configured the grid is
/// assumed present.
pub fn evaluate(settings: &SystemSettings, devices: &[Device]) -> PolicyOutput {
    let grid_monitor = devices
        .iter()
        .find(|device| device.device_type == DeviceType::GridMonitor);

    let is_grid_available = match grid_monitor {
        None => true,
        Some(monitor) => monitor.is_online && monitor.voltage > GRID_VOLTAGE_THRESHOLD,
    };

    let is_vacation_mode = settings.is_vacation_mode_enabled;
    let is_power_save_mode = is_vacation_mode || !is_grid_available;

    let reason = if is_vacation_mode {
        Some(PowerSaveReason::Vacation)
    } else if !is_grid_available {
        Some(PowerSaveReason::GridOutage)
    } else {
        None
    };

    PolicyOutput {
        is_power_save_mode,
        is_vacation_mode,
        is_grid_available,
        display_limit: settings.power_limit_watts,
        reason,
    }
}
