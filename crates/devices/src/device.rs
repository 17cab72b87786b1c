use std::sync::Arc;

use rust_decimal::Decimal;

use medstock_core::{Aggregate, AggregateRoot, DeviceId, DomainResult};
use medstock_events::{AlertSink, execute, stdout};
use medstock_products::{Item, ItemDetails};

use crate::state::{DeviceCommand, DeviceEvent, DeviceRejection, DeviceState};

/// A single physical, reusable device unit.
///
/// Devices are not consumed and have no quantity. Every command is decided by
/// the current [`DeviceState`]; transitions and rejections are written to the
/// device's alert sink as one line each.
#[derive(Clone)]
pub struct Device {
    id: DeviceId,
    details: ItemDetails,
    state: DeviceState,
    use_count: u32,
    version: u64,
    sink: Arc<dyn AlertSink>,
}

impl Device {
    /// New device in the `Usable` state with a use count of zero.
    pub fn new(name: impl Into<String>) -> DomainResult<Self> {
        Ok(Self {
            id: DeviceId::new(),
            details: ItemDetails::new(name, "Device", Decimal::ZERO)?,
            state: DeviceState::Usable,
            use_count: 0,
            version: 0,
            sink: stdout(),
        })
    }

    pub fn with_sink(mut self, sink: Arc<dyn AlertSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn name(&self) -> &str {
        self.details.name()
    }

    pub fn state(&self) -> DeviceState {
        self.state
    }

    pub fn use_count(&self) -> u32 {
        self.use_count
    }

    /// Value descriptor of this device, for placement in the category tree.
    pub fn as_item(&self) -> Item {
        Item::Device(self.details.clone())
    }

    /// Force the state without going through a transition.
    pub fn set_state(&mut self, state: DeviceState) {
        tracing::debug!(device = %self.name(), from = %self.state, to = %state, "device state overridden");
        self.state = state;
    }

    pub fn reset_use_count(&mut self) {
        self.use_count = 0;
    }

    pub fn begin_use(&mut self) -> bool {
        self.run(DeviceCommand::BeginUse).is_ok()
    }

    pub fn end_use(&mut self) -> bool {
        self.run(DeviceCommand::EndUse).is_ok()
    }

    pub fn send_for_maintenance(&mut self) -> bool {
        self.run(DeviceCommand::SendForMaintenance).is_ok()
    }

    pub fn complete_maintenance(&mut self) -> bool {
        self.run(DeviceCommand::CompleteMaintenance).is_ok()
    }

    /// Run a command, report the outcome to the sink, and return the new state.
    ///
    /// A rejection is a no-op: state and use count are left as they were.
    pub fn run(&mut self, command: DeviceCommand) -> Result<DeviceState, DeviceRejection> {
        match execute(self, &command) {
            Ok(events) => {
                for event in &events {
                    self.confirm(event);
                }
                Ok(self.state)
            }
            Err(rejection) => {
                tracing::debug!(
                    device = %self.name(),
                    state = %self.state,
                    ?command,
                    "device command rejected"
                );
                self.sink
                    .emit(&format!("Device {} {}.", self.name(), rejection));
                Err(rejection)
            }
        }
    }

    fn confirm(&self, event: &DeviceEvent) {
        tracing::info!(
            device = %self.name(),
            state = %self.state,
            use_count = self.use_count,
            "device transition"
        );
        let name = self.name();
        let line = match event {
            DeviceEvent::UseStarted { use_count } => {
                format!("Device {name} is now in use (use #{use_count}).")
            }
            DeviceEvent::UseEnded {
                next: DeviceState::InMaintenance,
            } => format!(
                "Device {name} finished use #{} and must be maintained. State: {}.",
                self.use_count, self.state
            ),
            DeviceEvent::UseEnded { .. } => {
                format!("Device {name} is no longer in use. State: {}.", self.state)
            }
            DeviceEvent::SentForMaintenance => {
                format!("Device {name} was sent for maintenance. State: {}.", self.state)
            }
            DeviceEvent::MaintenanceCompleted => format!(
                "Maintenance completed for device {name}. State: {}.",
                self.state
            ),
        };
        self.sink.emit(&line);
    }
}

impl AggregateRoot for Device {
    type Id = DeviceId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

impl Aggregate for Device {
    type Command = DeviceCommand;
    type Event = DeviceEvent;
    type Error = DeviceRejection;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            DeviceEvent::UseStarted { use_count } => self.use_count = *use_count,
            DeviceEvent::MaintenanceCompleted => self.reset_use_count(),
            DeviceEvent::UseEnded { .. } | DeviceEvent::SentForMaintenance => {}
        }
        self.state = event.next_state();

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        let event = self.state.decide(*command, self.use_count)?;
        Ok(vec![event])
    }
}

impl core::fmt::Debug for Device {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Device")
            .field("id", &self.id)
            .field("name", &self.details.name())
            .field("state", &self.state)
            .field("use_count", &self.use_count)
            .field("version", &self.version)
            .finish()
    }
}

impl core::fmt::Display for Device {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} [{}] uses: {}",
            self.name(),
            self.state,
            self.use_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::MAINTENANCE_THRESHOLD;
    use medstock_events::MemorySink;

    fn mri() -> (Device, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let device = Device::new("MRI").unwrap().with_sink(sink.clone());
        (device, sink)
    }

    #[test]
    fn starts_usable_with_zero_uses() {
        let (device, sink) = mri();
        assert_eq!(device.state(), DeviceState::Usable);
        assert_eq!(device.use_count(), 0);
        assert_eq!(device.version(), 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn empty_name_is_rejected() {
        assert!(Device::new("").is_err());
    }

    #[test]
    fn maintenance_cycle() {
        let (mut device, sink) = mri();

        assert!(device.begin_use());
        assert_eq!(device.state(), DeviceState::InUse);
        assert!(device.end_use());
        assert_eq!(device.state(), DeviceState::Usable);
        assert_eq!(device.use_count(), 1);

        for _ in 1..MAINTENANCE_THRESHOLD {
            assert!(device.begin_use());
            assert!(device.end_use());
        }
        assert_eq!(device.state(), DeviceState::InMaintenance);
        assert_eq!(device.use_count(), MAINTENANCE_THRESHOLD);

        sink.take();
        assert!(!device.begin_use());
        assert_eq!(device.state(), DeviceState::InMaintenance);
        assert_eq!(device.use_count(), MAINTENANCE_THRESHOLD);
        assert_eq!(
            sink.lines(),
            vec!["Device MRI is in maintenance and cannot be used."]
        );

        assert!(device.complete_maintenance());
        assert_eq!(device.state(), DeviceState::Usable);
        assert_eq!(device.use_count(), 0);
    }

    #[test]
    fn every_command_emits_exactly_one_line() {
        let (mut device, sink) = mri();
        device.end_use();
        device.complete_maintenance();
        device.begin_use();
        device.begin_use();
        device.send_for_maintenance();
        device.send_for_maintenance();
        device.end_use();
        device.complete_maintenance();

        let lines = sink.lines();
        assert_eq!(lines.len(), 8);
        assert!(lines.iter().all(|l| l.contains("MRI")));
        assert_eq!(lines[0], "Device MRI is not in use.");
        assert_eq!(lines[2], "Device MRI is now in use (use #1).");
        assert_eq!(lines[3], "Device MRI is already in use.");
    }

    #[test]
    fn rejection_does_not_bump_version() {
        let (mut device, _sink) = mri();
        assert_eq!(device.run(DeviceCommand::EndUse), Err(DeviceRejection::NotInUse));
        assert_eq!(device.version(), 0);
        assert_eq!(device.run(DeviceCommand::BeginUse), Ok(DeviceState::InUse));
        assert_eq!(device.version(), 1);
    }

    #[test]
    fn send_for_maintenance_while_in_use_keeps_count() {
        let (mut device, _sink) = mri();
        device.begin_use();
        device.send_for_maintenance();
        assert_eq!(device.state(), DeviceState::InMaintenance);
        assert_eq!(device.use_count(), 1);
    }

    #[test]
    fn as_item_describes_device() {
        let (device, _sink) = mri();
        let item = device.as_item();
        assert_eq!(item.name(), "MRI");
        assert_eq!(item.variant(), "Device");
    }

    #[test]
    fn overrides_bypass_transitions() {
        let (mut device, sink) = mri();
        device.begin_use();
        device.set_state(DeviceState::Usable);
        device.reset_use_count();
        assert_eq!(device.state(), DeviceState::Usable);
        assert_eq!(device.use_count(), 0);
        assert_eq!(sink.lines().len(), 1);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn command() -> impl Strategy<Value = DeviceCommand> {
            prop_oneof![
                Just(DeviceCommand::BeginUse),
                Just(DeviceCommand::EndUse),
                Just(DeviceCommand::SendForMaintenance),
                Just(DeviceCommand::CompleteMaintenance),
            ]
        }

        proptest! {
            /// Property: the use count never exceeds the threshold and an in-use
            /// device has been used at least once.
            #[test]
            fn state_stays_legal(commands in prop::collection::vec(command(), 0..64)) {
                let (mut device, _sink) = mri();
                for cmd in commands {
                    let _ = device.run(cmd);
                    prop_assert!(device.use_count() <= MAINTENANCE_THRESHOLD);
                    if device.state() == DeviceState::InUse {
                        prop_assert!(device.use_count() >= 1);
                    }
                }
            }

            /// Property: completing maintenance always yields Usable with zero uses.
            #[test]
            fn maintenance_resets(commands in prop::collection::vec(command(), 0..32)) {
                let (mut device, _sink) = mri();
                for cmd in commands {
                    let _ = device.run(cmd);
                }
                device.send_for_maintenance();
                prop_assert_eq!(device.state(), DeviceState::InMaintenance);
                prop_assert!(device.complete_maintenance());
                prop_assert_eq!(device.state(), DeviceState::Usable);
                prop_assert_eq!(device.use_count(), 0);
            }

            /// Property: version counts accepted commands only.
            #[test]
            fn version_counts_transitions(commands in prop::collection::vec(command(), 0..64)) {
                let (mut device, _sink) = mri();
                let mut accepted = 0u64;
                for cmd in commands {
                    if device.run(cmd).is_ok() {
                        accepted += 1;
                    }
                }
                prop_assert_eq!(device.version(), accepted);
            }
        }
    }
}
