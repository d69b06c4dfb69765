use std::collections::VecDeque;

use time::{Duration, OffsetDateTime};
use wattsync_api::models::{Device, DeviceType};

/// Cadence at which the engine drives [`PowerSampler::sample`].
pub const SAMPLE_INTERVAL_SECS: u64 = 2;

/// Points older than this are evicted on every tick.
pub const RETENTION_HORIZON: Duration = Duration::minutes(5);

/// One sample of the monitored total draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerHistoryPoint {
    pub time: OffsetDateTime,
    pub power: f64,
}

/// Time-windowed record of the power monitor's instantaneous draw.
/// The retained sequence is always sorted by time ascending and only
/// holds points within the retention horizon of the last prune.
#[derive(Debug, Default)]
pub struct PowerSampler {
    history: VecDeque<PowerHistoryPoint>,
}

impl PowerSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the monitor's current draw if one is present and
    /// online, then prunes expired points. An absent or offline
    /// monitor appends nothing; there is no zero-padding sample.
    pub fn sample(&mut self, now: OffsetDateTime, devices: &[Device]) {
        let monitor = devices
            .iter()
            .find(|device| device.device_type == DeviceType::PowerMonitor);

        if let Some(monitor) = monitor {
            if monitor.is_online {
                self.history.push_back(PowerHistoryPoint {
                    time: now,
                    power: monitor.current_power,
                });
            }
        }

        let cutoff = now - RETENTION_HORIZON;
        while self.history.front().is_some_and(|point| point.time <= cutoff) {
            self.history.pop_front();
        }
    }

    pub fn points(&self) -> Vec<PowerHistoryPoint> {
        self.history.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monitor(online: bool, power: f64) -> Device {
        Device {
            id: 1,
            name: "Main monitor".into(),
            device_type: DeviceType::PowerMonitor,
            is_online: online,
            current_power: power,
            ..Device::default()
        }
    }

    fn at(base: OffsetDateTime, secs: i64) -> OffsetDateTime {
        base + Duration::seconds(secs)
    }

    #[test]
    fn test_online_monitor_appends_point() {
        let base = OffsetDateTime::now_utc();
        let mut sampler = PowerSampler::new();

        sampler.sample(base, &[monitor(true, 812.0)]);

        let points = sampler.points();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].power, 812.0);
        assert_eq!(points[0].time, base);
    }

    #[test]
    fn test_offline_monitor_appends_nothing_but_still_prunes() {
        let base = OffsetDateTime::now_utc();
        let mut sampler = PowerSampler::new();

        sampler.sample(base, &[monitor(true, 400.0)]);
        sampler.sample(at(base, 301), &[monitor(false, 0.0)]);

        assert!(sampler.is_empty(), "old point pruned, nothing appended");
    }

    #[test]
    fn test_absent_monitor_degrades_to_empty_history() {
        let base = OffsetDateTime::now_utc();
        let mut sampler = PowerSampler::new();

        sampler.sample(base, &[]);

        assert!(sampler.is_empty());
    }

    #[test]
    fn test_no_retained_point_older_than_horizon() {
        let base = OffsetDateTime::now_utc();
        let mut sampler = PowerSampler::new();

        for tick in 0..200 {
            sampler.sample(at(base, tick * 2), &[monitor(true, 500.0)]);
        }

        let now = at(base, 199 * 2);
        let cutoff = now - RETENTION_HORIZON;
        assert!(sampler.points().iter().all(|point| point.time > cutoff));
    }

    #[test]
    fn test_history_stays_time_ascending() {
        let base = OffsetDateTime::now_utc();
        let mut sampler = PowerSampler::new();

        for tick in 0..50 {
            sampler.sample(at(base, tick * 2), &[monitor(true, tick as f64)]);
        }

        let points = sampler.points();
        assert!(points.windows(2).all(|pair| pair[0].time < pair[1].time));
    }

    #[test]
    fn test_boundary_point_is_evicted() {
        let base = OffsetDateTime::now_utc();
        let mut sampler = PowerSampler::new();

        sampler.sample(base, &[monitor(true, 100.0)]);
        // Exactly at the horizon counts as expired.
        sampler.sample(base + RETENTION_HORIZON, &[monitor(true, 200.0)]);

        let points = sampler.points();
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].power, 200.0);
    }
}
