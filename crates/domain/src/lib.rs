//! # deliveryapp-domain
//!
//! Pure domain model for the delivery trunk automation agent.
//!
//! ## Responsibilities
//! - Foundational types: error conventions and fixed topic names
//! - Define **Signals** (addressable data points in the vehicle signal tree)
//!   and the update events a signal broker emits when they change
//! - Define the **Trunk** actuator: its position identifier and binary state
//! - Define the **wire messages** exchanged over the messaging topics
//!   (command request, command response, trunk state notification)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod topic;

pub mod message;
pub mod signal;
pub mod trunk;
