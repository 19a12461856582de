use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::CompilationError;
use crate::model::ModuleIdentity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Why a parameter failed the marker type check. All of these surface as
/// the same catalog code; the reason only travels as detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum MarkerMismatch {
    UnqualifiedTypeName,
    UnresolvedSymbol,
    MissingModule,
    ForeignModule { module: ModuleIdentity },
    WrongName { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticDetail {
    Marker(MarkerMismatch),
    ParameterCount { count: usize },
    ReturnType { signature: String },
    ReturnMember { index: usize, signature: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub code: CompilationError,
    pub severity: Severity,
    pub message: String,
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<DiagnosticDetail>,
}

impl Diagnostic {
    pub fn error(code: CompilationError, span: Span) -> Self {
        Self {
            code,
            severity: Severity::Error,
            message: code.message().to_string(),
            span,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: DiagnosticDetail) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Failures while loading a configuration file or a model fixture.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid toml: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid fixture: {message}")]
    InvalidFixture { message: String },
}

impl LoadError {
    pub fn invalid_fixture(message: impl Into<String>) -> Self {
        Self::InvalidFixture {
            message: message.into(),
        }
    }
}
