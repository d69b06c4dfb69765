use serde::{Deserialize, Serialize};

use super::Id;

/// Fallback values used when the settings collaborator is unreachable.
pub const DEFAULT_POWER_LIMIT_WATTS: f64 = 3500.0;
pub const DEFAULT_POWER_ON_MARGIN_WATTS: f64 = 500.0;
pub const DEFAULT_OVERLOAD_COOLDOWN_SECONDS: u32 = 30;
pub const DEFAULT_POWER_SAVE_LIMIT_WATTS: f64 = 1500.0;

/// System-wide power budget configuration. Owned and mutated by the
/// settings collaborator, read-only input for the engine.
#[cfg_attr(feature = "docs", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    /// Total budget, e.g. the main breaker limit
    pub power_limit_watts: f64,
    /// Headroom required before a device may be switched back on
    pub power_on_margin_watts: f64,
    /// Wait after an overload before restoring devices
    pub overload_cooldown_seconds: u32,
    /// Ceiling the server enforces while power-save is active
    #[serde(default = "default_power_save_limit")]
    pub power_save_limit_watts: f64,
    /// User override forcing power-save regardless of grid state
    #[serde(default)]
    pub is_vacation_mode_enabled: bool,
}

fn default_power_save_limit() -> f64 {
    DEFAULT_POWER_SAVE_LIMIT_WATTS
}

impl Default for SystemSettings {
    fn default() -> Self {
        Self {
            id: None,
            power_limit_watts: DEFAULT_POWER_LIMIT_WATTS,
            power_on_margin_watts: DEFAULT_POWER_ON_MARGIN_WATTS,
            overload_cooldown_seconds: DEFAULT_OVERLOAD_COOLDOWN_SECONDS,
            power_save_limit_watts: DEFAULT_POWER_SAVE_LIMIT_WATTS,
            is_vacation_mode_enabled: false,
        }
    }
}
