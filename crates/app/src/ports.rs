//! Port definitions: traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod message_bus;
pub mod signal_client;
pub mod trunk_service;

pub use message_bus::{Message, MessageBus};
pub use signal_client::{SignalClient, SignalStream};
pub use trunk_service::TrunkService;
