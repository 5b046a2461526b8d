//! Server status and the indicator labels derived from it

use serde::{Deserialize, Serialize};

/// Model name reported by a backend that serves answers from the specialized model.
pub const SPECIALIZED_MODEL: &str = "Heart-Specialized DistilGPT2";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerStatus {
    pub model_loaded: bool,
    pub model_type: String,
}

/// Online/offline presentation of the status dot and labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusIndicator {
    pub online: bool,
    pub status_text: &'static str,
    pub system_status: &'static str,
}

impl StatusIndicator {
    pub fn online() -> Self {
        Self {
            online: true,
            status_text: "AI Model Ready",
            system_status: "Online",
        }
    }

    pub fn offline() -> Self {
        Self {
            online: false,
            status_text: "Knowledge Base Only",
            system_status: "Limited",
        }
    }

    pub fn from_model_loaded(model_loaded: bool) -> Self {
        if model_loaded {
            Self::online()
        } else {
            Self::offline()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub model_type: String,
    pub response_source: &'static str,
}

impl ModelInfo {
    pub fn from_model_type(model_type: &str) -> Self {
        let response_source = if model_type == SPECIALIZED_MODEL {
            "AI Model & Knowledge Base"
        } else {
            "Knowledge Base Only"
        };
        Self {
            model_type: model_type.to_string(),
            response_source,
        }
    }
}
