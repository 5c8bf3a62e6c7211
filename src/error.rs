use serde::{Serialize, Deserialize};
use std::fmt;

/// Unified error type for the planner.
/// Storage, config and command functions return Result<T, TutorError>.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TutorError {
    pub message: String,
    pub stage: String,
    pub entity: Option<String>,
    pub context: Option<String>,
    pub source: Option<String>,
}

impl TutorError {
    /// Create a new error with stage and message
    pub fn new<S: Into<String>>(message: S, stage: &'static str) -> Self {
        TutorError {
            message: message.into(),
            stage: stage.to_string(),
            entity: None,
            context: None,
            source: None,
        }
    }

    /// Name the entity (student, unit, record id) the error concerns
    pub fn with_entity<S: Into<String>>(mut self, entity: S) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Add additional context information
    pub fn with_context<S: Into<String>>(mut self, context: S) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add source error information
    pub fn with_source<S: Into<String>>(mut self, source: S) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn not_found<S: Into<String>>(kind: &str, id: S) -> Self {
        TutorError::new(format!("{} not found", kind), "lookup").with_entity(id)
    }
}

impl fmt::Display for TutorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.stage, self.message)?;
        if let Some(ref entity) = self.entity {
            write!(f, " (entity: {})", entity)?;
        }
        if let Some(ref context) = self.context {
            write!(f, " (context: {})", context)?;
        }
        if let Some(ref source) = self.source {
            write!(f, " (source: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for TutorError {}

impl From<anyhow::Error> for TutorError {
    fn from(err: anyhow::Error) -> Self {
        TutorError::new(
            err.to_string(),
            "unknown"
        ).with_source("anyhow")
    }
}

impl From<std::io::Error> for TutorError {
    fn from(err: std::io::Error) -> Self {
        TutorError::new(
            format!("I/O error: {}", err),
            "io"
        ).with_source("std::io")
    }
}

impl From<serde_json::Error> for TutorError {
    fn from(err: serde_json::Error) -> Self {
        TutorError::new(
            format!("JSON error: {}", err),
            "json_parse"
        ).with_source("serde_json")
    }
}

impl From<toml::de::Error> for TutorError {
    fn from(err: toml::de::Error) -> Self {
        TutorError::new(
            format!("Config error: {}", err),
            "config"
        ).with_source("toml")
    }
}

impl From<crate::validators::ValidationErrors> for TutorError {
    fn from(errs: crate::validators::ValidationErrors) -> Self {
        TutorError::new(
            errs.to_string(),
            "validation"
        )
    }
}
