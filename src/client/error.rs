use crate::gateway::GatewayFailure;
use crate::schema::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    #[error("{context} {source}")]
    Validation {
        context: &'static str,
        #[source]
        source: ValidationError,
    },
    #[error("{0}")]
    Backend(String),
    #[error("unexpected bridge failure: {0}")]
    Unexpected(String),
}

impl From<GatewayFailure> for BridgeError {
    fn from(value: GatewayFailure) -> Self {
        match value {
            GatewayFailure::Text(message) => Self::Backend(message),
            GatewayFailure::Unexpected(message) => Self::Unexpected(message),
        }
    }
}
