use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Global application settings, fetched and updated as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Days before an expiry date at which an `expiry_soon` alert fires.
    pub expiry_warning_days: u32,
}

impl Settings {
    /// The server rejects a warning window shorter than one day.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.expiry_warning_days < 1 {
            return Err(ApiError::new(
                "INVALID_SETTINGS",
                "expiry_warning_days must be >= 1",
            ));
        }
        Ok(())
    }
}
