//! Success envelopes.

use serde::Serialize;

/// `{ "success": true, "data": ... }`.
#[derive(Debug, Clone, Serialize)]
pub struct DataResponse<T> {
    /// Always true.
    pub success: bool,
    /// Payload.
    pub data: T,
}

impl<T> DataResponse<T> {
    /// Wraps a payload.
    pub const fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// `{ "success": true, "message": ... }` for writes with no payload.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    /// Always true.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
}

impl MessageResponse {
    /// Builds a success message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
