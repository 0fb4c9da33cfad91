//! Request types for the chat endpoint

use serde::{Deserialize, Serialize};

/// A question asked against one user's uploaded reports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// User whose reports are queried
    pub user_id: String,
    /// Natural-language question
    pub query: String,
}
