use miette::Diagnostic;
use thiserror::Error;

/// Main error type for randomart operations
#[derive(Error, Diagnostic, Debug)]
pub enum RandomartError {
    #[error("Grammar configuration error: {message}")]
    #[diagnostic(code(randomart::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Unknown grammar: {name}")]
    #[diagnostic(code(randomart::lookup::grammar))]
    UnknownGrammar {
        name: String,
        #[help]
        help: Option<String>,
    },

    #[error("Rule {name} not found in grammar {grammar}")]
    #[diagnostic(code(randomart::lookup::rule))]
    UnknownRule { name: String, grammar: String },

    #[error("Internal invariant violated: {message}")]
    #[diagnostic(
        code(randomart::invariant),
        help("this is a bug in randomart or in a grammar that bypassed validation")
    )]
    Invariant { message: String },

    #[error("Invalid input: {message}")]
    #[diagnostic(code(randomart::input))]
    InvalidInput { message: String },

    #[error("Parse error: {message}")]
    #[diagnostic(code(randomart::parse))]
    Parse {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(randomart::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    /// Failure reported by the rendering backend, kept as-is.
    #[error(transparent)]
    #[diagnostic(code(randomart::backend))]
    Backend(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl RandomartError {
    /// Shorthand for a configuration error without help text.
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }

    /// The backend error, if this is one.
    ///
    /// Callers can downcast it to the concrete error type of their backend.
    pub fn backend_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Backend(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RandomartError>;
