use wattsync_api::models::{AllStatuses, Device, DeviceStatusData};

/// Combines a device list snapshot with a statuses map into enriched
/// device records. Statuses are keyed by stringified device id. A
/// missing entry and an explicit offline marker are equivalent: the
/// device comes out offline with every electrical field zeroed.
pub fn merge_statuses(devices: Vec<Device>, statuses: &AllStatuses) -> Vec<Device> {
    devices
        .into_iter()
        .map(|mut device| {
            match statuses.get(&device.id.to_string()) {
                Some(DeviceStatusData::Telemetry(payload)) => device.apply_status(payload),
                Some(DeviceStatusData::Offline { .. }) | None => device.set_offline(),
            }
            device
        })
        .collect()
}
