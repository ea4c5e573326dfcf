pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod snapshot;
pub mod state;

pub use error::*;
pub use models::*;
pub use router::create_queue_router;
pub use services::*;
pub use snapshot::*;
pub use state::QueueState;
