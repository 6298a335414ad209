//! Signal client port: read access and change notifications for vehicle
//! signals.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;

use deliveryapp_domain::error::DeliveryError;
use deliveryapp_domain::signal::{SignalPath, SignalUpdate, SignalValue};

/// Stream of updates for a subscription. Dropping every sender ends it.
pub type SignalStream = mpsc::Receiver<SignalUpdate>;

/// Access to the vehicle signal broker.
pub trait SignalClient: Send + Sync {
    /// Read the current value of one signal.
    fn get(
        &self,
        path: &SignalPath,
    ) -> impl Future<Output = Result<SignalValue, DeliveryError>> + Send;

    /// Subscribe to changes of one signal.
    fn subscribe(
        &self,
        path: &SignalPath,
    ) -> impl Future<Output = Result<SignalStream, DeliveryError>> + Send;
}

impl<T: SignalClient> SignalClient for Arc<T> {
    fn get(
        &self,
        path: &SignalPath,
    ) -> impl Future<Output = Result<SignalValue, DeliveryError>> + Send {
        (**self).get(path)
    }

    fn subscribe(
        &self,
        path: &SignalPath,
    ) -> impl Future<Output = Result<SignalStream, DeliveryError>> + Send {
        (**self).subscribe(path)
    }
}
