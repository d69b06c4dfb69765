use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::Id;

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceType {
    /// Switchable load with on/off control and a wattage rating
    #[default]
    SwitchableAppliance,
    /// Reports aggregate household draw
    PowerMonitor,
    /// Reports incoming grid supply presence and voltage
    GridMonitor,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Provider {
    #[default]
    Shelly,
    Tasmota,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Device identifier
    pub id: Id,
    /// Display name
    pub name: String,
    /// External device identifier, unique per user
    pub mqtt_prefix: String,
    /// Device category
    pub device_type: DeviceType,
    /// Firmware vendor
    pub provider: Provider,
    /// Excluded first during power-save shedding
    #[serde(default)]
    pub is_non_essential: bool,
    /// Ordering priority, 0 = highest, 10 = lowest
    #[serde(default)]
    pub priority: u8,
    /// Nameplate wattage, appliances only
    #[serde(default)]
    pub wattage: i32,
    /// Owning user
    #[serde(default)]
    pub username: String,
    /// Downtime-prevention window enabled
    #[serde(default)]
    pub prevent_downtime: bool,
    /// Longest tolerated off period
    #[serde(default)]
    pub max_downtime_minutes: u32,
    /// Shortest on period once powered back
    #[serde(default)]
    pub min_uptime_minutes: u32,

    /// Connectivity, reset on disconnect
    #[serde(default)]
    pub is_online: bool,
    /// Relay state as last reported
    #[serde(default)]
    pub is_on: bool,
    /// Instantaneous draw in watts
    #[serde(default)]
    pub current_power: f64,
    /// Supply voltage in volts
    #[serde(default)]
    pub voltage: f64,
    /// Device temperature in Celsius
    #[serde(default)]
    pub temperature: f64,
}

impl Device {
    /// Marks the device offline and zeroes every runtime electrical
    /// attribute. A device that is not online must never carry stale
    /// readings.
    pub fn set_offline(&mut self) {
        self.is_online = false;
        self.is_on = false;
        self.current_power = 0.0;
        self.voltage = 0.0;
        self.temperature = 0.0;
    }

    /// Applies a full telemetry snapshot. A telemetry payload implies
    /// the device is online.
    pub fn apply_status(&mut self, status: &StatusPayload) {
        self.is_online = true;
        self.is_on = status.output;
        self.current_power = status.apower;
        self.voltage = status.voltage;
        self.temperature = status.temperature.t_c;
    }

    pub fn is_appliance(&self) -> bool {
        self.device_type == DeviceType::SwitchableAppliance
    }
}

/// Energy counter block of the Shelly-style status payload.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergyCounter {
    /// Accumulated energy in watt-hours
    #[serde(default)]
    pub total: f64,
    /// Per-minute energy figures
    #[serde(default)]
    pub by_minute: Vec<f64>,
    /// Unix timestamp of the last minute boundary
    #[serde(default)]
    pub minute_ts: i64,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReading {
    /// Celsius
    #[serde(default, rename = "tC")]
    pub t_c: f64,
    /// Fahrenheit
    #[serde(default, rename = "tF")]
    pub t_f: f64,
}

/// Full telemetry snapshot for one device. Every sub-field defaults
/// independently, a partial payload is still a valid payload.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusPayload {
    #[serde(default)]
    pub id: Id,
    /// Reporting channel, e.g. "switch:0"
    #[serde(default)]
    pub source: String,
    /// Relay output state
    #[serde(default)]
    pub output: bool,
    /// Active power in watts
    #[serde(default)]
    pub apower: f64,
    /// Supply voltage in volts
    #[serde(default)]
    pub voltage: f64,
    /// Current in amperes
    #[serde(default)]
    pub current: f64,
    /// Energy counters
    #[serde(default)]
    pub aenergy: EnergyCounter,
    /// Temperature readings
    #[serde(default)]
    pub temperature: TemperatureReading,
}

/// One entry of the statuses snapshot: either full telemetry or an
/// explicit offline marker. The offline variant must come first so a
/// bare `{"online": false}` is not swallowed by the fully-defaulted
/// telemetry payload.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeviceStatusData {
    Offline { online: bool },
    Telemetry(StatusPayload),
}

/// Statuses snapshot as returned by the REST collaborator, keyed by
/// stringified device id.
pub type AllStatuses = HashMap<String, DeviceStatusData>;

/// One push notification. Both optional fields are independently
/// meaningful: connectivity change only, telemetry refresh only, or
/// both at once.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateEvent {
    pub device_id: Id,
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_online: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_json: Option<StatusPayload>,
}
