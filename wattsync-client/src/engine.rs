use std::sync::Arc;
use std::time::Duration;

use time::OffsetDateTime;
use tokio::sync::{mpsc, watch, Notify};
use tracing::{info, warn};
use wattsync_api::models::{Device, DeviceType, Id, SystemSettings};

use crate::services::api::Backend;
use crate::services::gateway::GatewayMessage;
use crate::state::sampler::SAMPLE_INTERVAL_SECS;
use crate::state::{self, PolicyOutput, PowerSampler};
use crate::viz::{self, DonutChart, UsageGraph};

/// Outcome of the last device-snapshot load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    /// The snapshot could not be fetched; the last-known collection is
    /// kept on screen.
    Failed,
}

/// Rendered dashboard state, published after every mutation.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub devices: Vec<Device>,
    pub settings: SystemSettings,
    pub policy: PolicyOutput,
    pub donut: DonutChart,
    pub graph: UsageGraph,
    pub load: LoadState,
}

/// User-driven commands into the engine loop.
#[derive(Debug)]
pub enum Command {
    Toggle { device_id: Id, on: bool },
    Refresh,
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub sample_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_interval: Duration::from_secs(SAMPLE_INTERVAL_SECS),
        }
    }
}

/// Owns the device collection, settings, and sampler. All three push
/// sources (snapshot fetch, gateway events, sampler ticks) are folded
/// into one select loop, so every mutation is a single atomic
/// read-modify-write step.
pub struct DashboardEngine<B: Backend> {
    api: B,
    config: EngineConfig,
    devices: Vec<Device>,
    settings: SystemSettings,
    sampler: PowerSampler,
    load: LoadState,
    snapshot_tx: watch::Sender<DashboardSnapshot>,
    on_unauthorized: Option<Box<dyn Fn() + Send>>,
}

impl<B: Backend> DashboardEngine<B> {
    pub fn new(api: B, config: EngineConfig) -> Self {
        let settings = SystemSettings::default();
        let initial = DashboardSnapshot {
            devices: Vec::new(),
            settings: settings.clone(),
            policy: state::evaluate(&settings, &[]),
            donut: viz::build_donut(&[], settings.power_limit_watts),
            graph: viz::build_usage_graph(&[], settings.power_limit_watts, false),
            load: LoadState::Loading,
        };
        let (snapshot_tx, _) = watch::channel(initial);

        Self {
            api,
            config,
            devices: Vec::new(),
            settings,
            sampler: PowerSampler::new(),
            load: LoadState::Loading,
            snapshot_tx,
            on_unauthorized: None,
        }
    }

    /// Registers the logout callback invoked on an authorization
    /// failure. Such failures are never retried.
    pub fn on_unauthorized(mut self, callback: impl Fn() + Send + 'static) -> Self {
        self.on_unauthorized = Some(Box::new(callback));
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Runs until `shutdown` fires. The gateway channel, the sampler
    /// interval, and the command channel all mutate the same state,
    /// one message per loop iteration.
    pub async fn run(
        mut self,
        mut gateway_rx: mpsc::Receiver<GatewayMessage>,
        mut commands: mpsc::Receiver<Command>,
        shutdown: Arc<Notify>,
    ) {
        self.refresh().await;

        let mut ticker = tokio::time::interval(self.config.sample_interval);

        loop {
            tokio::select! {
                _ = shutdown.notified() => break,
                _ = ticker.tick() => {
                    self.sampler.sample(OffsetDateTime::now_utc(), &self.devices);
                    self.publish();
                }
                Some(message) = gateway_rx.recv() => match message {
                    GatewayMessage::Status(event) => {
                        self.devices = state::apply_update(std::mem::take(&mut self.devices), &event);
                        self.publish();
                    }
                    GatewayMessage::Reconnected => {
                        info!("push gateway reconnected, refreshing snapshot");
                        self.refresh().await;
                    }
                },
                Some(command) = commands.recv() => self.handle_command(command).await,
            }
        }

        info!("dashboard engine stopped");
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Refresh => self.refresh().await,
            Command::Toggle { device_id, on } => self.toggle(device_id, on).await,
        }
    }

    /// Fetches settings plus a fresh device/statuses snapshot. The
    /// settings fetch degrades to the previous (initially default)
    /// values; a failed device fetch keeps the last-known collection
    /// and surfaces the failure in the load state.
    async fn refresh(&mut self) {
        match self.api.fetch_settings().await {
            Ok(settings) => self.settings = settings,
            Err(error) if error.is_unauthorized() => {
                self.logout();
                return;
            }
            Err(error) => warn!("settings unavailable, keeping previous values: {error}"),
        }

        let (devices, statuses) =
            futures::join!(self.api.fetch_devices(), self.api.fetch_statuses());

        let error = match (devices, statuses) {
            (Ok(devices), Ok(statuses)) => {
                self.devices = state::merge_statuses(devices, &statuses);
                self.load = LoadState::Ready;
                self.publish();
                return;
            }
            (Err(error), Ok(_)) | (Ok(_), Err(error)) => error,
            (Err(first), Err(second)) => {
                if second.is_unauthorized() {
                    second
                } else {
                    first
                }
            }
        };

        if error.is_unauthorized() {
            self.logout();
            return;
        }

        warn!("device snapshot failed: {error}");
        self.load = LoadState::Failed;
        self.publish();
    }

    /// Optimistic toggle: the local relay state flips immediately and
    /// is rolled back if the command fails. No system-wide error
    /// state.
    async fn toggle(&mut self, device_id: Id, on: bool) {
        let Some(index) = self.devices.iter().position(|device| device.id == device_id) else {
            warn!(device_id, "toggle for unknown device ignored");
            return;
        };

        let previous = self.devices[index].is_on;
        self.devices[index].is_on = on;
        self.publish();

        if let Err(error) = self.api.toggle_device(device_id, on).await {
            warn!(device_id, "toggle failed, rolling back: {error}");
            if error.is_unauthorized() {
                self.logout();
            }
            self.devices[index].is_on = previous;
            self.publish();
        }
    }

    fn logout(&mut self) {
        warn!("authorization failure, logging out");
        if let Some(callback) = &self.on_unauthorized {
            callback();
        }
    }

    fn publish(&self) {
        let policy = state::evaluate(&self.settings, &self.devices);
        let monitor_online = self
            .devices
            .iter()
            .any(|device| device.device_type == DeviceType::PowerMonitor && device.is_online);
        let points = self.sampler.points();

        let snapshot = DashboardSnapshot {
            devices: self.devices.clone(),
            settings: self.settings.clone(),
            donut: viz::build_donut(&self.devices, policy.display_limit),
            graph: viz::build_usage_graph(&points, policy.display_limit, monitor_online),
            policy,
            load: self.load,
        };

        self.snapshot_tx.send_replace(snapshot);
    }
}
