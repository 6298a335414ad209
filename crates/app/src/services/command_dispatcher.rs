//! Command dispatcher: handles trunk toggle requests end to end.
//!
//! Each request reads the current trunk state, invokes the opposite actuator
//! operation and publishes exactly one [`CommandResponse`] carrying the
//! request's `requestId`. The body of the request does not choose the
//! direction; it is always a toggle.
//!
//! Without [`with_exclusive_toggles`](CommandDispatcher::with_exclusive_toggles)
//! two overlapping requests may both read the same state and issue the same
//! command. Enabling it serialises the read-then-act sequence for the trunk.

use tokio::sync::Mutex;

use deliveryapp_domain::error::{DecodeError, DeliveryError, SignalError, report};
use deliveryapp_domain::message::{CommandRequest, CommandResponse};
use deliveryapp_domain::signal::SignalPath;
use deliveryapp_domain::topic;
use deliveryapp_domain::trunk::{TrunkCommand, TrunkPosition, TrunkState};

use crate::ports::{MessageBus, SignalClient, TrunkService};

/// Application service answering `openTrunk` requests.
pub struct CommandDispatcher<S, T, B> {
    signals: S,
    trunk: T,
    bus: B,
    position: TrunkPosition,
    is_open_path: SignalPath,
    toggle_lock: Option<Mutex<()>>,
}

impl<S, T, B> CommandDispatcher<S, T, B>
where
    S: SignalClient,
    T: TrunkService,
    B: MessageBus,
{
    /// Create a dispatcher controlling the trunk at `position`.
    pub fn new(signals: S, trunk: T, bus: B, position: TrunkPosition) -> Self {
        Self {
            signals,
            trunk,
            bus,
            position,
            is_open_path: position.is_open_path(),
            toggle_lock: None,
        }
    }

    /// Allow at most one read-then-act sequence in flight for this trunk.
    #[must_use]
    pub fn with_exclusive_toggles(mut self) -> Self {
        self.toggle_lock = Some(Mutex::new(()));
        self
    }

    /// Handle one raw `openTrunk` request payload.
    ///
    /// Signal and actuator failures are answered with a `status = 1`
    /// response. A payload that cannot be decoded is answered only when a
    /// `requestId` could be salvaged from it.
    ///
    /// # Errors
    ///
    /// Returns [`DeliveryError::Decode`] for an undecodable payload with no
    /// recoverable `requestId` (nothing is published), or the bus error if
    /// publishing the response fails.
    pub async fn handle_open_trunk_request(&self, payload: &[u8]) -> Result<(), DeliveryError> {
        let request = match CommandRequest::decode(payload) {
            Ok(request) => request,
            Err(err) => return self.reject(err).await,
        };

        let response = match self.toggle().await {
            Ok(command) => {
                tracing::info!(request_id = %request.request_id, %command, position = %self.position, "trunk toggled");
                CommandResponse::success(&request.request_id, command.confirmation())
            }
            Err(err) => {
                let message = report(&err);
                tracing::warn!(request_id = %request.request_id, error = %message, "trunk toggle failed");
                CommandResponse::failure(&request.request_id, message)
            }
        };

        self.respond(&response).await
    }

    async fn toggle(&self) -> Result<TrunkCommand, DeliveryError> {
        let _guard = match &self.toggle_lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        };

        let value = self.signals.get(&self.is_open_path).await?;
        let is_open = value.as_bool().ok_or_else(|| SignalError::TypeMismatch {
            path: self.is_open_path.clone(),
            expected: "bool",
        })?;

        let command = TrunkState::from(is_open).toggle_command();
        self.trunk.invoke(command, self.position).await?;
        Ok(command)
    }

    async fn reject(&self, err: DecodeError) -> Result<(), DeliveryError> {
        match err.request_id().map(str::to_owned) {
            Some(request_id) => {
                let message = report(&err);
                tracing::warn!(%request_id, error = %message, "rejecting malformed request");
                self.respond(&CommandResponse::failure(request_id, message))
                    .await
            }
            None => Err(err.into()),
        }
    }

    async fn respond(&self, response: &CommandResponse) -> Result<(), DeliveryError> {
        let payload = response.to_payload()?;
        self.bus
            .publish(topic::OPEN_TRUNK_RESPONSE, payload)
            .await?;
        tracing::debug!(request_id = %response.request_id, status = ?response.result.status, "response published");
        Ok(())
    }
}
