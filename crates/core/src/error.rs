use thiserror::Error;

/// Errors raised while a single tokenizer attempts a match.
///
/// None of these abort a document parse: the engine logs them, records a
/// [`RecoverableError`] and treats the attempt as a decline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    /// The tokenizer reported consumed text that is not a prefix of its input.
    #[error("eaten text is not a prefix of the remaining input ({eaten} of {available} bytes)")]
    NotAPrefix {
        /// Length of the text the tokenizer tried to eat.
        eaten: usize,
        /// Length of the remaining input.
        available: usize,
    },
    /// The tokenizer matched without consuming anything.
    #[error("tokenizer matched but consumed no input")]
    EmptyMatch,
    /// Recursive block/inline parsing went deeper than the configured limit.
    #[error("nesting depth {depth} exceeds limit {limit}")]
    NestingTooDeep {
        /// Depth that was requested.
        depth: usize,
        /// Configured `maxNestingDepth`.
        limit: usize,
    },
    /// The input had a shape the tokenizer could not handle.
    #[error("malformed construct: {0}")]
    Pattern(String),
}

impl TokenizeError {
    /// Create a pattern error.
    pub fn pattern(message: impl Into<String>) -> Self {
        Self::Pattern(message.into())
    }
}

/// Errors surfaced through the public API.
#[derive(Debug, Error)]
pub enum MarkdownError {
    /// Parse options could not be deserialized.
    #[error("invalid parse options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
    /// Internal logic error (unexpected state).
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// A tokenizer failed and its construct was rendered as something else.
    Error,
    /// Suspicious input that still parsed.
    Warning,
}

/// A tokenizer failure that was swallowed to keep the document parse going.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoverableError {
    /// Registry name of the tokenizer that failed.
    pub tokenizer: &'static str,
    /// Error message
    pub message: String,
    /// Nesting depth at which the failure happened (0 = document root).
    pub depth: usize,
    /// Error severity
    pub severity: ErrorSeverity,
}

impl RecoverableError {
    /// Create a new recoverable error
    pub fn error(tokenizer: &'static str, message: impl Into<String>, depth: usize) -> Self {
        Self {
            tokenizer,
            message: message.into(),
            depth,
            severity: ErrorSeverity::Error,
        }
    }

    /// Create a new warning
    pub fn warning(tokenizer: &'static str, message: impl Into<String>, depth: usize) -> Self {
        Self {
            tokenizer,
            message: message.into(),
            depth,
            severity: ErrorSeverity::Warning,
        }
    }
}

impl std::fmt::Display for RecoverableError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let severity = match self.severity {
            ErrorSeverity::Error => "error",
            ErrorSeverity::Warning => "warning",
        };
        write!(
            f,
            "{} in `{}` at depth {}: {}",
            severity, self.tokenizer, self.depth, self.message
        )
    }
}

/// Collection of parse diagnostics (warnings and recoverable errors)
#[derive(Debug, Clone, Default)]
pub struct ParseDiagnostics {
    /// List of non-fatal warnings
    pub warnings: Vec<RecoverableError>,
    /// List of recoverable errors
    pub errors: Vec<RecoverableError>,
}

impl ParseDiagnostics {
    /// Create a new empty diagnostics collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic in the list matching its severity.
    pub fn push(&mut self, diagnostic: RecoverableError) {
        match diagnostic.severity {
            ErrorSeverity::Error => self.errors.push(diagnostic),
            ErrorSeverity::Warning => self.warnings.push(diagnostic),
        }
    }

    /// Check if there are any warnings
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Check if there are any errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check if there are any diagnostics
    pub fn has_any(&self) -> bool {
        self.has_warnings() || self.has_errors()
    }

    /// Get total count of all diagnostics
    pub fn count(&self) -> usize {
        self.warnings.len() + self.errors.len()
    }
}
