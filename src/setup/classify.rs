use super::error::{ConfigError, SetupFailure};
use crate::gateway::GatewayFailure;

/// A failed gateway call, sorted by how much of it we can understand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawFailure {
    /// Not a backend string at all; propagated without classification.
    Unexpected(String),
    /// A backend string that is not JSON.
    PlainText(String),
    /// JSON that matches the classified error shape.
    Structured(ConfigError),
    /// JSON that does not match the classified error shape.
    Malformed { payload: String, reason: String },
}

pub fn classify_failure(failure: GatewayFailure) -> RawFailure {
    let raw = match failure {
        GatewayFailure::Unexpected(message) => return RawFailure::Unexpected(message),
        GatewayFailure::Text(raw) => raw,
    };

    let parsed: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(_) => return RawFailure::PlainText(raw),
    };

    match serde_json::from_value::<ConfigError>(parsed.clone()) {
        Ok(error) => RawFailure::Structured(error),
        Err(err) => RawFailure::Malformed {
            payload: parsed.to_string(),
            reason: err.to_string(),
        },
    }
}

impl RawFailure {
    /// Collapses everything except a classified error into a generic failure.
    pub fn into_generic(self) -> Result<ConfigError, SetupFailure> {
        match self {
            Self::Structured(error) => Ok(error),
            Self::Unexpected(message) => Err(SetupFailure::Unexpected(message)),
            Self::PlainText(message) => Err(SetupFailure::Unclassified(message)),
            Self::Malformed { payload, reason } => {
                Err(SetupFailure::MalformedConfigError { payload, reason })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Platform;
    use crate::setup::ConfigErrorKey;

    #[test]
    fn plain_strings_stay_unclassified() {
        let failure = classify_failure(GatewayFailure::Text("disk on fire".to_string()));
        assert_eq!(failure, RawFailure::PlainText("disk on fire".to_string()));
    }

    #[test]
    fn config_error_json_is_classified() {
        let raw = r#"{"error_key":"BattleNetInstall","message":"missing","platforms":["BattleNet","Steam"]}"#;
        let RawFailure::Structured(error) = classify_failure(GatewayFailure::Text(raw.to_string()))
        else {
            panic!("expected structured failure");
        };
        assert_eq!(error.error_key, ConfigErrorKey::BattleNetInstall);
        assert_eq!(error.platforms, vec![Platform::BattleNet, Platform::Steam]);
    }

    #[test]
    fn unknown_error_keys_are_malformed_not_classified() {
        let raw = r#"{"error_key":"Disk","message":"x","platforms":[]}"#;
        let failure = classify_failure(GatewayFailure::Text(raw.to_string()));
        let RawFailure::Malformed { payload, reason } = failure else {
            panic!("expected malformed failure");
        };
        assert!(payload.contains("Disk"));
        assert!(reason.contains("unknown variant"));
    }

    #[test]
    fn non_string_failures_pass_through() {
        assert_eq!(
            classify_failure(GatewayFailure::Unexpected("socket closed".to_string())),
            RawFailure::Unexpected("socket closed".to_string())
        );
    }
}
