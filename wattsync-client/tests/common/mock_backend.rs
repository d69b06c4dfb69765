use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::StatusCode;
use wattsync_api::models::{AllStatuses, Device, Id, SystemSettings};
use wattsync_client::errors::ApiError;
use wattsync_client::services::Backend;

/// Scripted collaborator state shared with the test body. Flip the
/// failure flags between engine interactions to exercise the error
/// taxonomy without a server.
#[derive(Default)]
pub struct BackendScript {
    pub devices: Vec<Device>,
    pub statuses: AllStatuses,
    /// `None` simulates a transport failure on the settings endpoint.
    pub settings: Option<SystemSettings>,
    pub fail_devices: bool,
    pub fail_toggle: bool,
    pub unauthorized: bool,
    pub snapshot_fetches: usize,
    pub toggles: Vec<(Id, bool)>,
}

#[derive(Clone, Default)]
pub struct MockBackend {
    pub script: Arc<Mutex<BackendScript>>,
}

impl MockBackend {
    pub fn new(devices: Vec<Device>, statuses: AllStatuses) -> Self {
        Self {
            script: Arc::new(Mutex::new(BackendScript {
                devices,
                statuses,
                settings: Some(SystemSettings::default()),
                ..BackendScript::default()
            })),
        }
    }
}

fn server_error() -> ApiError {
    ApiError::Status(StatusCode::INTERNAL_SERVER_ERROR)
}

#[async_trait]
impl Backend for MockBackend {
    async fn fetch_devices(&self) -> Result<Vec<Device>, ApiError> {
        let mut script = self.script.lock().unwrap();
        script.snapshot_fetches += 1;
        if script.unauthorized {
            return Err(ApiError::Unauthorized);
        }
        if script.fail_devices {
            return Err(server_error());
        }
        Ok(script.devices.clone())
    }

    async fn fetch_statuses(&self) -> Result<AllStatuses, ApiError> {
        let script = self.script.lock().unwrap();
        if script.unauthorized {
            return Err(ApiError::Unauthorized);
        }
        if script.fail_devices {
            return Err(server_error());
        }
        Ok(script.statuses.clone())
    }

    async fn fetch_settings(&self) -> Result<SystemSettings, ApiError> {
        let script = self.script.lock().unwrap();
        if script.unauthorized {
            return Err(ApiError::Unauthorized);
        }
        script.settings.clone().ok_or_else(server_error)
    }

    async fn save_settings(&self, settings: &SystemSettings) -> Result<SystemSettings, ApiError> {
        let mut script = self.script.lock().unwrap();
        script.settings = Some(settings.clone());
        Ok(settings.clone())
    }

    async fn toggle_device(&self, device_id: Id, on: bool) -> Result<(), ApiError> {
        // Simulated round trip so the optimistic flip is observable
        // before the outcome lands.
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;

        let mut script = self.script.lock().unwrap();
        script.toggles.push((device_id, on));
        if script.fail_toggle {
            return Err(server_error());
        }
        Ok(())
    }
}
