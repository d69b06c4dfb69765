use wattsync_api::models::{Device, StatusUpdateEvent};

/// Applies one push event to the device collection. Events for unknown
/// or just-deleted devices are silently ignored. An explicit offline
/// transition zeroes the electrical fields in the same reduction, so
/// no intermediate state ever pairs `is_online = false` with stale
/// readings. A telemetry payload implies the device is online even
/// when the `isOnline` flag is absent.
pub fn apply_update(devices: Vec<Device>, event: &StatusUpdateEvent) -> Vec<Device> {
    devices
        .into_iter()
        .map(|mut device| {
            if device.id != event.device_id {
                return device;
            }

            if event.is_online == Some(false) {
                device.set_offline();
            } else if event.is_online == Some(true) || event.status_json.is_some() {
                device.is_online = true;
                if let Some(payload) = &event.status_json {
                    device.apply_status(payload);
                }
            }

            device
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use wattsync_api::models::{DeviceType, StatusPayload};

    use super::*;

    fn appliance(id: i32, power: f64) -> Device {
        Device {
            id,
            name: format!("Appliance {id}"),
            device_type: DeviceType::SwitchableAppliance,
            is_online: true,
            is_on: power > 0.0,
            current_power: power,
            voltage: 230.0,
            temperature: 30.0,
            ..Device::default()
        }
    }

    #[test]
    fn test_offline_event_zeroes_electrical_fields() {
        let event = StatusUpdateEvent {
            device_id: 1,
            is_online: Some(false),
            ..StatusUpdateEvent::default()
        };

        let reduced = apply_update(vec![appliance(1, 500.0)], &event);

        assert!(!reduced[0].is_online);
        assert!(!reduced[0].is_on);
        assert_eq!(reduced[0].current_power, 0.0);
        assert_eq!(reduced[0].voltage, 0.0);
        assert_eq!(reduced[0].temperature, 0.0);
    }

    #[test]
    fn test_offline_event_is_idempotent() {
        let event = StatusUpdateEvent {
            device_id: 1,
            is_online: Some(false),
            ..StatusUpdateEvent::default()
        };

        let once = apply_update(vec![appliance(1, 500.0)], &event);
        let twice = apply_update(once.clone(), &event);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_unknown_device_is_a_noop() {
        let devices = vec![appliance(1, 500.0), appliance(2, 120.0)];
        let event = StatusUpdateEvent {
            device_id: 99,
            is_online: Some(false),
            ..StatusUpdateEvent::default()
        };

        let reduced = apply_update(devices.clone(), &event);

        assert_eq!(devices, reduced);
    }

    #[test]
    fn test_empty_collection_is_a_noop() {
        let event = StatusUpdateEvent {
            device_id: 1,
            is_online: Some(true),
            ..StatusUpdateEvent::default()
        };

        assert!(apply_update(Vec::new(), &event).is_empty());
    }

    #[test]
    fn test_telemetry_overwrites_electrical_fields() {
        let event = StatusUpdateEvent {
            device_id: 1,
            status_json: Some(StatusPayload {
                output: true,
                apower: 750.5,
                voltage: 228.1,
                ..StatusPayload::default()
            }),
            ..StatusUpdateEvent::default()
        };

        let mut offline = appliance(1, 0.0);
        offline.set_offline();
        let reduced = apply_update(vec![offline], &event);

        assert!(reduced[0].is_online, "statusJson implies online");
        assert!(reduced[0].is_on);
        assert_eq!(reduced[0].current_power, 750.5);
    }

    #[test]
    fn test_online_only_event_keeps_existing_readings() {
        let event = StatusUpdateEvent {
            device_id: 1,
            is_online: Some(true),
            ..StatusUpdateEvent::default()
        };

        let reduced = apply_update(vec![appliance(1, 340.0)], &event);

        assert!(reduced[0].is_online);
        assert_eq!(reduced[0].current_power, 340.0);
        assert_eq!(reduced[0].voltage, 230.0);
    }

    #[test]
    fn test_other_devices_pass_through_unchanged() {
        let devices = vec![appliance(1, 500.0), appliance(2, 120.0)];
        let event = StatusUpdateEvent {
            device_id: 1,
            is_online: Some(false),
            ..StatusUpdateEvent::default()
        };

        let reduced = apply_update(devices.clone(), &event);

        assert_eq!(devices[1], reduced[1]);
    }
}
