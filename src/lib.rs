pub mod availability;
pub mod config;
pub mod coverage;
pub mod form;
pub mod query;
pub mod time;
#[cfg(feature = "wasm")]
pub mod wasm;

pub use availability::{compute_unavailable, Availability, ReservationRecord};
pub use config::FormConfig;
pub use coverage::{check_coverage, Coverage, CoverageError, CoverageRule};
pub use form::{AppointmentForm, FormError, FormState, SubmitBlocked};
pub use time::{label_slots, TimeError, TimeOfDay, SLOT_MINUTES};
