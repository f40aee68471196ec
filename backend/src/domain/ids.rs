//! Positive integer identifiers for stored records.

use serde::Serialize;
use serde_json::json;

use super::Error;

/// Raised when an identifier is zero or negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{kind} id must be positive, got {value}")]
pub struct RecordIdError {
    kind: &'static str,
    value: i64,
}

/// Identifiers arrive from paths and bodies; a non-positive value is a
/// malformed request rather than a missing record.
impl From<RecordIdError> for Error {
    fn from(value: RecordIdError) -> Self {
        Self::invalid_request(value.to_string()).with_details(json!({
            "field": "id",
            "code": "malformed",
        }))
    }
}

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident => $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Validate and wrap a raw identifier.
            pub const fn new(value: i64) -> Result<Self, RecordIdError> {
                if value > 0 {
                    Ok(Self(value))
                } else {
                    Err(RecordIdError { kind: $kind, value })
                }
            }

            /// Raw identifier value.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

record_id! {
    /// Identifier of a staff account.
    UserId => "user"
}
record_id! {
    /// Identifier of a patient record.
    PatientId => "patient"
}
record_id! {
    /// Identifier of an appointment.
    AppointmentId => "appointment"
}
record_id! {
    /// Identifier of an inventory item.
    InventoryItemId => "inventory item"
}
record_id! {
    /// Identifier of a treatment plan.
    TreatmentPlanId => "treatment plan"
}
