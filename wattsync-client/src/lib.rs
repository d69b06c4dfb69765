use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Notify};

use crate::configs::Settings;
use crate::engine::{DashboardEngine, DashboardSnapshot, EngineConfig};
use crate::services::api::ApiService;
use crate::services::gateway::PushGateway;
use crate::state::PowerSaveReason;

pub mod configs;
pub mod engine;
pub mod errors;
pub mod services;
pub mod state;
pub mod viz;

/// Headless dashboard runner: authenticates, subscribes to the push
/// topic, and logs every published snapshot until Ctrl-C.
pub async fn run(settings: &Arc<Settings>) {
    let mut api = ApiService::new(
        &settings.server.base_url,
        Duration::from_secs(settings.server.timeout_secs),
    );

    api.login(&settings.auth.email, &settings.auth.password)
        .await
        .expect("Failed to authenticate against the backend.");
    let user = api
        .current_user()
        .await
        .expect("Failed to resolve the current user.");
    let token = api
        .token()
        .expect("Login left no bearer token.")
        .to_string();

    let (gateway_tx, gateway_rx) = mpsc::channel(100);
    let gateway = PushGateway::connect(&settings.gateway, &user.username, &token, gateway_tx);

    let (_command_tx, command_rx) = mpsc::channel(16);
    let shutdown = Arc::new(Notify::new());

    let engine = DashboardEngine::new(api, EngineConfig::default()).on_unauthorized({
        let shutdown = shutdown.clone();
        move || shutdown.notify_one()
    });
    let mut snapshots = engine.subscribe();

    let engine_task = tokio::spawn(engine.run(gateway_rx, command_rx, shutdown.clone()));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutdown requested");
                break;
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                log_snapshot(&snapshot);
            }
        }
    }

    shutdown.notify_one();
    if let Err(error) = gateway.shutdown().await {
        tracing::warn!("gateway teardown: {error}");
    }
    let _ = engine_task.await;
}

fn log_snapshot(snapshot: &DashboardSnapshot) {
    let mode = match snapshot.policy.reason {
        Some(PowerSaveReason::Vacation) => "vacation power-save",
        Some(PowerSaveReason::GridOutage) => "blackout power-save",
        None => "normal",
    };

    tracing::info!(
        total_power = snapshot.donut.total_power,
        limit = snapshot.policy.display_limit,
        devices = snapshot.devices.len(),
        segments = snapshot.donut.segments.len(),
        mode,
        "dashboard updated"
    );
}
