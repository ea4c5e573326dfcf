pub mod json_store;
pub mod seed;

pub use json_store::JsonFileStore;
pub use seed::seed_appointments;
