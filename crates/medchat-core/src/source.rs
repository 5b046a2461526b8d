use serde::{Deserialize, Serialize};

/// Where an answer came from, as declared by the backend.
///
/// Unknown codes are kept verbatim so they can still be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Source {
    Model,
    KnowledgeBase,
    Error,
    Other(String),
}

impl Source {
    pub fn as_str(&self) -> &str {
        match self {
            Source::Model => "model",
            Source::KnowledgeBase => "knowledge_base",
            Source::Error => "error",
            Source::Other(code) => code,
        }
    }

    pub fn from_code(code: &str) -> Self {
        match code {
            "model" => Source::Model,
            "knowledge_base" => Source::KnowledgeBase,
            "error" => Source::Error,
            other => Source::Other(other.to_string()),
        }
    }

    /// Human readable label, see [`crate::format::format_source`].
    pub fn display_name(&self) -> &str {
        crate::format::format_source(self.as_str())
    }
}

impl From<String> for Source {
    fn from(code: String) -> Self {
        Source::from_code(&code)
    }
}

impl From<Source> for String {
    fn from(source: Source) -> Self {
        match source {
            Source::Other(code) => code,
            known => known.as_str().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_round_trip() {
        for code in ["model", "knowledge_base", "error"] {
            assert_eq!(Source::from_code(code).as_str(), code);
        }
    }

    #[test]
    fn test_unknown_code_is_preserved() {
        let source = Source::from_code("web_search");
        assert_eq!(source, Source::Other("web_search".to_string()));
        assert_eq!(source.display_name(), "web_search");
    }

    #[test]
    fn test_deserializes_from_bare_string() {
        let source: Source = serde_json::from_str("\"knowledge_base\"").unwrap();
        assert_eq!(source, Source::KnowledgeBase);
        assert_eq!(serde_json::to_string(&Source::Model).unwrap(), "\"model\"");
    }
}
