//! MQTT adapter error types.

use hearth_domain::error::HearthError;

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// The rumqttc client returned an error.
    #[error("MQTT client error")]
    Client(#[from] rumqttc::ClientError),

    /// Failed to serialize an outgoing command payload.
    #[error("failed to encode MQTT payload")]
    Encode(#[from] serde_json::Error),
}

impl From<MqttError> for HearthError {
    fn from(err: MqttError) -> Self {
        Self::Storage(Box::new(err))
    }
}
