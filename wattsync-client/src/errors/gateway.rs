#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Gateway connection error: {0}")]
    Connection(#[from] rumqttc::ConnectionError),

    #[error("Gateway client error: {0}")]
    Client(#[from] rumqttc::ClientError),

    #[error("Malformed push payload: {0}")]
    Payload(#[from] serde_json::Error),
}
