use serde::de::DeserializeOwned;

/// A backend payload that must not be trusted until it passes [`validate_payload`].
pub trait PayloadSchema: DeserializeOwned {
    const NAME: &'static str;

    /// Semantic checks that serde cannot express.
    fn check(&self) -> Result<(), String> {
        Ok(())
    }
}

impl<T: PayloadSchema> PayloadSchema for Vec<T> {
    const NAME: &'static str = T::NAME;

    fn check(&self) -> Result<(), String> {
        self.iter().try_for_each(T::check)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{schema} payload is not valid json: {reason}")]
    Json {
        schema: &'static str,
        reason: String,
        payload: String,
    },
    #[error("{schema} payload failed validation: {reason}")]
    Schema {
        schema: &'static str,
        reason: String,
        payload: String,
    },
}

impl ValidationError {
    pub fn schema(&self) -> &'static str {
        match self {
            Self::Json { schema, .. } | Self::Schema { schema, .. } => schema,
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            Self::Json { reason, .. } | Self::Schema { reason, .. } => reason,
        }
    }

    pub fn payload(&self) -> &str {
        match self {
            Self::Json { payload, .. } | Self::Schema { payload, .. } => payload,
        }
    }
}

pub fn validate_payload<T: PayloadSchema>(raw: &str) -> Result<T, ValidationError> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|err| ValidationError::Json {
            schema: T::NAME,
            reason: err.to_string(),
            payload: raw.to_string(),
        })?;
    let schema_error = |reason: String| ValidationError::Schema {
        schema: T::NAME,
        reason,
        payload: raw.to_string(),
    };
    let parsed: T = serde_json::from_value(value).map_err(|err| schema_error(err.to_string()))?;
    parsed.check().map_err(schema_error)?;
    Ok(parsed)
}
