pub mod controller;
pub mod projector;
pub mod store;

pub use controller::{QueueController, ETA_DRIFT_THRESHOLD_MINUTES};
pub use projector::project;
pub use store::AppointmentStore;
