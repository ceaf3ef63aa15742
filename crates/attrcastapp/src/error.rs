use thiserror::Error;

/// Failure of a single attribute's cast.
///
/// These are attribute-scoped: the schema runner records them into an
/// [`AttributeContext`](crate::context::AttributeContext) and carries on with
/// the sibling attributes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    /// The configured or inferred class name does not name a known type.
    #[error("{attribute}: class {class_name:?} does not exist")]
    TypeResolution {
        attribute: String,
        class_name: String,
    },

    /// The value does not conform to the target type and could not be coerced.
    #[error("{attribute}: expected {expected}, got {actual}")]
    TypeMismatch {
        attribute: String,
        expected: String,
        actual: String,
    },

    /// No value was given and the attribute has no default.
    #[error("{attribute} is required")]
    MissingValue { attribute: String },

    /// The declared default does not pass the attribute's own filter.
    #[error("{attribute}: default {value} is invalid")]
    InvalidDefault { attribute: String, value: String },

    /// An element of an array or a key of a hash failed its nested filter.
    #[error("{attribute}[{key}]: {source}")]
    InvalidNested {
        attribute: String,
        key: String,
        source: Box<FilterError>,
    },
}

impl FilterError {
    /// The attribute this error is scoped to.
    pub fn attribute(&self) -> &str {
        match self {
            FilterError::TypeResolution { attribute, .. }
            | FilterError::TypeMismatch { attribute, .. }
            | FilterError::MissingValue { attribute }
            | FilterError::InvalidDefault { attribute, .. }
            | FilterError::InvalidNested { attribute, .. } => attribute,
        }
    }

    /// Short machine-readable tag, used by the JSON output of the CLI.
    pub fn code(&self) -> &'static str {
        match self {
            FilterError::TypeResolution { .. } => "invalid_class",
            FilterError::TypeMismatch { .. } => "invalid_type",
            FilterError::MissingValue { .. } => "missing",
            FilterError::InvalidDefault { .. } => "invalid_default",
            FilterError::InvalidNested { .. } => "invalid_nested",
        }
    }
}

/// Errors raised by the filter registry.
///
/// Both are programming-time errors: they surface while a schema is being
/// defined, never while inputs are validated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown filter kind '{0}'")]
    UnknownFilterKind(String),

    #[error("filter kind '{0}' is already registered")]
    DuplicateFilterKind(String),
}

#[derive(Error, Debug)]
pub enum AttrcastError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("Invalid declaration for '{attribute}': {reason}")]
    Declaration { attribute: String, reason: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] confique::Error),
}

impl AttrcastError {
    pub(crate) fn declaration(attribute: impl Into<String>, reason: impl Into<String>) -> Self {
        AttrcastError::Declaration {
            attribute: attribute.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AttrcastError>;
