use serde::{Deserialize, Serialize};

use crate::models::{DeviceType, Id, Provider};

/// Device creation/update payload. The engine never issues these, the
/// shapes are kept for the device CRUD collaborator.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRequest {
    pub name: String,
    pub mqtt_prefix: String,
    pub device_type: DeviceType,
    pub provider: Provider,
    pub is_non_essential: bool,
    pub priority: u8,
    pub wattage: i32,
    pub prevent_downtime: bool,
    pub max_downtime_minutes: u32,
    pub min_uptime_minutes: u32,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceResponse {
    pub id: Id,
    pub name: String,
    pub mqtt_prefix: String,
    pub device_type: DeviceType,
    pub provider: Provider,
    pub is_non_essential: bool,
    pub priority: u8,
    pub wattage: i32,
    pub username: String,
    pub prevent_downtime: bool,
    pub max_downtime_minutes: u32,
    pub min_uptime_minutes: u32,
}

#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ToggleRequest {
    pub on: bool,
}
