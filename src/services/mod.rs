//! Core services: the signal engine, the scan pipeline, the broadcast
//! fan-out and the user store.

pub mod broadcast;
pub mod engine;
pub mod pipeline;
pub mod user_store;

pub use broadcast::Broadcaster;
pub use engine::SignalEngine;
pub use pipeline::SignalPipeline;
pub use user_store::UserStore;
