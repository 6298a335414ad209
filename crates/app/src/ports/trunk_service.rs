//! Trunk actuator port.
//!
//! The actuator is the only way to change trunk state; the open/closed
//! signal is read-only from the application's point of view.

use std::future::Future;
use std::sync::Arc;

use deliveryapp_domain::error::DeliveryError;
use deliveryapp_domain::trunk::{TrunkCommand, TrunkPosition};

/// Actuator service controlling a trunk.
pub trait TrunkService: Send + Sync {
    /// Request the trunk at `position` to open.
    fn open(&self, position: TrunkPosition)
    -> impl Future<Output = Result<(), DeliveryError>> + Send;

    /// Request the trunk at `position` to close.
    fn close(
        &self,
        position: TrunkPosition,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send;

    /// Route a [`TrunkCommand`] to [`open`](Self::open) or [`close`](Self::close).
    fn invoke(
        &self,
        command: TrunkCommand,
        position: TrunkPosition,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send {
        async move {
            match command {
                TrunkCommand::Open => self.open(position).await,
                TrunkCommand::Close => self.close(position).await,
            }
        }
    }
}

impl<T: TrunkService> TrunkService for Arc<T> {
    fn open(
        &self,
        position: TrunkPosition,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send {
        (**self).open(position)
    }

    fn close(
        &self,
        position: TrunkPosition,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send {
        (**self).close(position)
    }
}
