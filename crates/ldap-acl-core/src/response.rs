//! The uniform response envelope.
//!
//! Every public operation answers with exactly one [`AuthResponse`]. Fields
//! that do not apply to an operation keep their zero value, and
//! `success == false` holds exactly when `error_code != 0`.

use serde::{Deserialize, Serialize};

use crate::error::ErrorCode;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub success: bool,
    pub error_code: i32,
    pub error_message: String,
    pub result_bool: bool,
    pub result_string: String,
    pub result_array: Vec<String>,
}

impl AuthResponse {
    /// A successful response with no payload.
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Self::default()
        }
    }

    pub fn with_bool(value: bool) -> Self {
        Self {
            result_bool: value,
            ..Self::ok()
        }
    }

    pub fn with_string(value: impl Into<String>) -> Self {
        Self {
            result_string: value.into(),
            ..Self::ok()
        }
    }

    pub fn with_array(values: Vec<String>) -> Self {
        Self {
            result_array: values,
            ..Self::ok()
        }
    }

    /// A failed response.
    ///
    /// `ErrorCode::None` is not a failure code; it is reported as
    /// `Unclassified` so the envelope invariant holds.
    pub fn failure(code: ErrorCode, message: impl Into<String>) -> Self {
        let code = match code {
            ErrorCode::None => ErrorCode::Unclassified,
            other => other,
        };
        Self {
            success: false,
            error_code: code.as_i32(),
            error_message: message.into(),
            ..Self::default()
        }
    }

    /// The typed code, if the numeric one is part of the table.
    pub fn code(&self) -> Option<ErrorCode> {
        ErrorCode::try_from(self.error_code).ok()
    }

    /// Checks `success == false ⇔ error_code != 0`.
    pub fn is_consistent(&self) -> bool {
        self.success == (self.error_code == 0)
    }
}
