//! Small response bodies shared by several handlers

use serde::{Deserialize, Serialize};

/// Plain acknowledgement, e.g. `{"message": "Book deleted successfully"}`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
