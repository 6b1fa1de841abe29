//! Error types for calbr.
//!
//! Uses `thiserror` for structured error types that map to exit codes.
//!
//! ## Error Taxonomy
//!
//! Errors are categorized by where they surface in a session:
//! - **Registration**: malformed aliases, bad prototypes or defaults, alias conflicts
//! - **Lookup**: the verb typed by the operator is not a registered alias
//! - **Bind**: unknown keyword names or malformed `key=value` tokens
//! - **Coercion**: a keyword value that does not parse under its declared type
//! - **Configuration**: config file parsing or validation
//! - **Handler**: anything raised while a command handler runs
//!
//! Lookup, bind and coercion errors are recoverable: the REPL reports them and
//! prompts again. Registration and configuration errors abort startup.

use thiserror::Error;

use crate::core::coercion::TypeTag;

// =============================================================================
// Error Categories
// =============================================================================

/// High-level error categories for classification and routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Command construction or registration failed.
    Registration,
    /// Verb not recognized.
    Lookup,
    /// Argument binding failed.
    Bind,
    /// Keyword value conversion failed.
    Coercion,
    /// Configuration issues (parse errors, invalid values).
    Configuration,
    /// Errors raised by command handlers or I/O.
    Handler,
}

impl ErrorCategory {
    /// Returns a human-readable description of the category.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Registration => "Registration error",
            Self::Lookup => "Lookup error",
            Self::Bind => "Bind error",
            Self::Coercion => "Coercion error",
            Self::Configuration => "Configuration error",
            Self::Handler => "Handler error",
        }
    }

    /// Returns a short code prefix for this category.
    #[must_use]
    pub const fn code_prefix(&self) -> &'static str {
        match self {
            Self::Registration => "R",
            Self::Lookup => "L",
            Self::Bind => "B",
            Self::Coercion => "T",
            Self::Configuration => "C",
            Self::Handler => "H",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

// =============================================================================
// Exit Codes
// =============================================================================

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// Unexpected failure
    GeneralError = 1,
    /// Startup failed: bad configuration or command registration
    StartupError = 2,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as Self
    }
}

/// Main error type for calbr operations.
#[derive(Error, Debug)]
pub enum CalbrError {
    // ==========================================================================
    // Registration errors (Category: Registration)
    // ==========================================================================
    /// Alias is too short or contains whitespace.
    #[error("invalid alias '{alias}': {reason}")]
    InvalidAlias { alias: String, reason: &'static str },

    /// Command declared without any alias.
    #[error("command requires at least one alias")]
    NoAliases,

    /// Attribute name outside the recognized set.
    #[error("{attribute}: unknown attribute")]
    UnknownAttribute { attribute: String },

    /// Prototype declares a type tag outside the recognized set.
    #[error("parameter '{param}': unknown type '{type_name}'")]
    UnknownType { param: String, type_name: String },

    /// Command built without a handler.
    #[error("command '{command}': callback required")]
    MissingCallback { command: String },

    /// Default value for a parameter the prototype does not declare.
    #[error("default '{param}' is not declared in the prototype")]
    DefaultNotInPrototype { param: String },

    /// Default value whose type differs from the declared one.
    #[error("default '{param}' must be {expected}, got {actual}")]
    DefaultTypeMismatch {
        param: String,
        expected: TypeTag,
        actual: TypeTag,
    },

    /// An alias is already held by a registered command.
    #[error("alias '{alias}' already registered by '{existing}'")]
    AliasConflict { alias: String, existing: String },

    // ==========================================================================
    // Lookup errors (Category: Lookup)
    // ==========================================================================
    /// Verb does not match any registered alias.
    #[error("{verb}: Command not found")]
    CommandNotFound { verb: String },

    // ==========================================================================
    // Bind errors (Category: Bind)
    // ==========================================================================
    /// Keyword name absent from the command's prototype.
    #[error("{keyword}: unknown keyword for '{command}'")]
    UnknownKeyword { command: String, keyword: String },

    /// A token with more than one `=`.
    #[error("too many '=' in keyword token '{token}'")]
    MalformedKeyword { token: String },

    // ==========================================================================
    // Coercion errors (Category: Coercion)
    // ==========================================================================
    /// Value does not parse under its declared type.
    #[error("{value:?}: not a valid {expected}")]
    Coercion { value: String, expected: TypeTag },

    // ==========================================================================
    // Configuration errors (Category: Configuration)
    // ==========================================================================
    /// Generic configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Error parsing configuration file.
    #[error("config parse error at {path}: {message}")]
    ConfigParse { path: String, message: String },

    /// Invalid value in configuration.
    #[error("invalid config value for '{key}': {message}")]
    ConfigInvalid {
        key: String,
        value: String,
        message: String,
    },

    // ==========================================================================
    // Handler errors (Category: Handler)
    // ==========================================================================
    /// A handler reported a failure.
    #[error("{command}: {message}")]
    Handler { command: String, message: String },

    /// A source or destination directory is missing or not a directory.
    #[error("{path}: {reason}")]
    Directory { path: String, reason: &'static str },

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for other errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CalbrError {
    /// Map error to process exit code.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self.category() {
            ErrorCategory::Registration | ErrorCategory::Configuration => ExitCode::StartupError,
            _ => ExitCode::GeneralError,
        }
    }

    /// Returns the error category for classification and routing.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidAlias { .. }
            | Self::NoAliases
            | Self::UnknownAttribute { .. }
            | Self::UnknownType { .. }
            | Self::MissingCallback { .. }
            | Self::DefaultNotInPrototype { .. }
            | Self::DefaultTypeMismatch { .. }
            | Self::AliasConflict { .. } => ErrorCategory::Registration,

            Self::CommandNotFound { .. } => ErrorCategory::Lookup,

            Self::UnknownKeyword { .. } | Self::MalformedKeyword { .. } => ErrorCategory::Bind,

            Self::Coercion { .. } => ErrorCategory::Coercion,

            Self::Config(_) | Self::ConfigParse { .. } | Self::ConfigInvalid { .. } => {
                ErrorCategory::Configuration
            }

            Self::Handler { .. } | Self::Directory { .. } | Self::Io(_) | Self::Other(_) => {
                ErrorCategory::Handler
            }
        }
    }

    /// Returns a stable error code for programmatic handling.
    ///
    /// Format: `CALBR-{category}{number}`.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAlias { .. } => "CALBR-R001",
            Self::NoAliases => "CALBR-R002",
            Self::UnknownAttribute { .. } => "CALBR-R003",
            Self::UnknownType { .. } => "CALBR-R004",
            Self::MissingCallback { .. } => "CALBR-R005",
            Self::DefaultNotInPrototype { .. } => "CALBR-R006",
            Self::DefaultTypeMismatch { .. } => "CALBR-R007",
            Self::AliasConflict { .. } => "CALBR-R010",

            Self::CommandNotFound { .. } => "CALBR-L001",

            Self::UnknownKeyword { .. } => "CALBR-B001",
            Self::MalformedKeyword { .. } => "CALBR-B002",

            Self::Coercion { .. } => "CALBR-T001",

            Self::ConfigParse { .. } => "CALBR-C001",
            Self::ConfigInvalid { .. } => "CALBR-C002",
            Self::Config(_) => "CALBR-C003",

            Self::Handler { .. } => "CALBR-H001",
            Self::Io(_) => "CALBR-H002",
            Self::Directory { .. } => "CALBR-H003",
            Self::Other(_) => "CALBR-H099",
        }
    }

    /// Whether the REPL can report this error and keep prompting without
    /// any state left behind.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Lookup | ErrorCategory::Bind | ErrorCategory::Coercion
        )
    }

    /// Shorthand for a handler failure attributed to `command`.
    pub fn handler(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Handler {
            command: command.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for calbr operations.
pub type Result<T> = std::result::Result<T, CalbrError>;
