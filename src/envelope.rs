use serde::{Deserialize, Serialize};

use crate::error::DetectError;

/// Uniform `{code, msg, data}` body used by the HTTP layer that calls the detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: i64,
    pub msg: String,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            msg: "success".to_string(),
            data: Some(data),
        }
    }

    pub fn error(code: i64, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

impl<T> From<&DetectError> for Envelope<T> {
    fn from(err: &DetectError) -> Self {
        Envelope::error(err.code(), err.to_string())
    }
}
