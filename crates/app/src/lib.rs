//! # deliveryapp-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `SignalClient`: read and subscribe to vehicle signals
//!   - `TrunkService`: invoke the trunk actuator (open/close)
//!   - `MessageBus`: publish to and subscribe to messaging topics
//! - Define the **use-cases** driven by inbound traffic:
//!   - `CommandDispatcher`: toggle the trunk on request, answer exactly once
//!   - `StateNotifier`: mirror trunk state changes onto a topic
//! - Coordinate the process lifecycle (`AppRuntime`): topic registration,
//!   startup subscriptions, dispatch loop, graceful drain
//! - Provide **in-process infrastructure** (message bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `deliveryapp-domain` only (plus `tokio` for channels and tasks).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod message_bus;
pub mod ports;
pub mod runtime;
pub mod services;

#[cfg(test)]
mod testing;
