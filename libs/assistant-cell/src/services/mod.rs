pub mod client;

pub use client::{AssistantClient, OFFLINE_MESSAGE, UNAVAILABLE_MESSAGE};
