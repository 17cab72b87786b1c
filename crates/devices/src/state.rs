use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Use count at which ending a use forces the device into maintenance.
pub const MAINTENANCE_THRESHOLD: u32 = 5;

/// Device lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceState {
    /// Initial state; accepts new uses.
    Usable,
    InUse,
    /// Locked out until maintenance is completed.
    InMaintenance,
}

/// Operator commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceCommand {
    BeginUse,
    EndUse,
    SendForMaintenance,
    CompleteMaintenance,
}

/// Transitions decided by a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceEvent {
    UseStarted { use_count: u32 },
    UseEnded { next: DeviceState },
    SentForMaintenance,
    MaintenanceCompleted,
}

impl DeviceEvent {
    pub fn next_state(&self) -> DeviceState {
        match self {
            DeviceEvent::UseStarted { .. } => DeviceState::InUse,
            DeviceEvent::UseEnded { next } => *next,
            DeviceEvent::SentForMaintenance => DeviceState::InMaintenance,
            DeviceEvent::MaintenanceCompleted => DeviceState::Usable,
        }
    }
}

/// Why a command was a no-op in the current state.
///
/// Messages read as the continuation of "Device <name> ...".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeviceRejection {
    #[error("is already in use")]
    AlreadyInUse,

    #[error("is not in use")]
    NotInUse,

    #[error("is in maintenance and cannot be used")]
    UnderMaintenance,

    #[error("is not in use; it is in maintenance")]
    IdleUnderMaintenance,

    #[error("is already in maintenance")]
    AlreadyInMaintenance,

    #[error("is not in maintenance")]
    NotInMaintenance,
}

impl DeviceState {
    /// Decide the response to `command` given the device's current use count.
    ///
    /// | State \ Command | BeginUse | EndUse | SendForMaintenance | CompleteMaintenance |
    /// |---|---|---|---|---|
    /// | Usable | count+1, InUse | rejected | InMaintenance | rejected |
    /// | InUse | rejected | InMaintenance if count ≥ threshold, else Usable | InMaintenance | rejected |
    /// | InMaintenance | rejected | rejected | rejected | count := 0, Usable |
    pub fn decide(
        self,
        command: DeviceCommand,
        use_count: u32,
    ) -> Result<DeviceEvent, DeviceRejection> {
        use DeviceCommand::*;

        match (self, command) {
            (DeviceState::Usable, BeginUse) => Ok(DeviceEvent::UseStarted {
                use_count: use_count.saturating_add(1),
            }),
            (DeviceState::Usable, EndUse) => Err(DeviceRejection::NotInUse),
            (DeviceState::Usable, SendForMaintenance) => Ok(DeviceEvent::SentForMaintenance),
            (DeviceState::Usable, CompleteMaintenance) => Err(DeviceRejection::NotInMaintenance),

            (DeviceState::InUse, BeginUse) => Err(DeviceRejection::AlreadyInUse),
            (DeviceState::InUse, EndUse) => {
                let next = if use_count >= MAINTENANCE_THRESHOLD {
                    DeviceState::InMaintenance
                } else {
                    DeviceState::Usable
                };
                Ok(DeviceEvent::UseEnded { next })
            }
            (DeviceState::InUse, SendForMaintenance) => Ok(DeviceEvent::SentForMaintenance),
            (DeviceState::InUse, CompleteMaintenance) => Err(DeviceRejection::NotInMaintenance),

            (DeviceState::InMaintenance, BeginUse) => Err(DeviceRejection::UnderMaintenance),
            (DeviceState::InMaintenance, EndUse) => Err(DeviceRejection::IdleUnderMaintenance),
            (DeviceState::InMaintenance, SendForMaintenance) => {
                Err(DeviceRejection::AlreadyInMaintenance)
            }
            (DeviceState::InMaintenance, CompleteMaintenance) => {
                Ok(DeviceEvent::MaintenanceCompleted)
            }
        }
    }
}

impl core::fmt::Display for DeviceState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            DeviceState::Usable => "Usable",
            DeviceState::InUse => "In use",
            DeviceState::InMaintenance => "In maintenance",
        })
    }
}
