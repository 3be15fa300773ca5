//! Error types for member resolution and invocation

use std::error::Error as StdError;

use crate::reflect::{AccessPermission, MemberKind};

/// Result type for accessor operations
pub type AccessResult<T> = Result<T, AccessError>;

/// Error raised by a member's own code (property setter, method, constructor)
pub type Thrown = Box<dyn StdError + Send + Sync + 'static>;

/// Accessor error types
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// A required input was empty or malformed
    #[error("Invalid argument '{param}': {reason}")]
    InvalidArgument {
        /// Parameter name
        param: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// No field or property matched the lookup
    #[error("{kind} '{name}' not found on type {type_name}")]
    MemberNotFound {
        /// Member kind that was looked up
        kind: MemberKind,
        /// Member name
        name: String,
        /// Type the lookup ran against
        type_name: &'static str,
    },

    /// No method of that name exists among the searched methods
    #[error("Method '{name}' is not supported by type {type_name}")]
    UnsupportedMember {
        /// Method name
        name: String,
        /// Type the lookup ran against
        type_name: &'static str,
    },

    /// A value could not be converted to the type a member needs or returns
    #[error("Cannot cast value of '{member}': expected {expected}, actual type is {actual}")]
    CastMismatch {
        /// Member the value belongs to
        member: String,
        /// Expected type name
        expected: &'static str,
        /// Runtime type name of the value
        actual: &'static str,
    },

    /// Assigning a property or static field failed
    #[error("Failed to set {kind} '{name}' to {value}: {source}")]
    AssignmentFailed {
        /// Member kind
        kind: MemberKind,
        /// Member name
        name: String,
        /// Debug form of the attempted value
        value: String,
        /// Underlying failure
        #[source]
        source: Box<AccessError>,
    },

    /// Member has no setter (constant or get-only property)
    #[error("{kind} '{name}' on type {type_name} is read-only")]
    ReadOnly {
        /// Member kind
        kind: MemberKind,
        /// Member name
        name: String,
        /// Declaring type
        type_name: &'static str,
    },

    /// Property has no getter
    #[error("{kind} '{name}' on type {type_name} is write-only")]
    WriteOnly {
        /// Member kind
        kind: MemberKind,
        /// Member name
        name: String,
        /// Declaring type
        type_name: &'static str,
    },

    /// Wrong number of arguments for a method or constructor
    #[error("'{member}' expects {expected} argument(s), got {actual}")]
    ArgumentCount {
        /// Method or constructor name
        member: String,
        /// Declared arity
        expected: usize,
        /// Supplied argument count
        actual: usize,
    },

    /// An argument had the wrong runtime type
    #[error("Argument {index} of '{member}' expects {expected}, got {actual}")]
    ArgumentMismatch {
        /// Method or constructor name
        member: String,
        /// Zero-based argument position
        index: usize,
        /// Expected type name
        expected: &'static str,
        /// Supplied type name
        actual: &'static str,
    },

    /// The instance does not contain the requested declaring type
    #[error("Instance of {actual} has no part of type {expected}")]
    TargetMismatch {
        /// Requested declaring type
        expected: &'static str,
        /// Runtime type of the instance
        actual: &'static str,
    },

    /// The permission policy rejected the access
    #[error("Permission denied: {required} required for {kind} '{name}' on {type_name}")]
    PermissionDenied {
        /// Missing permission
        required: AccessPermission,
        /// Member kind
        kind: MemberKind,
        /// Member name
        name: String,
        /// Declaring type
        type_name: &'static str,
    },

    /// Error raised by the member itself, passed through untouched
    #[error(transparent)]
    Thrown(Thrown),
}

impl AccessError {
    /// Wrap an error raised inside a member body
    pub fn thrown<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        AccessError::Thrown(Box::new(err))
    }

    /// Borrow the error raised by the member, if it is an `E`
    pub fn thrown_ref<E>(&self) -> Option<&E>
    where
        E: StdError + 'static,
    {
        match self {
            AccessError::Thrown(inner) => inner.downcast_ref::<E>(),
            _ => None,
        }
    }

    /// Take the error raised by the member, if any
    pub fn into_thrown(self) -> Result<Thrown, AccessError> {
        match self {
            AccessError::Thrown(inner) => Ok(inner),
            other => Err(other),
        }
    }

    /// Whether this is a guard failure on the caller's input
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, AccessError::InvalidArgument { .. })
    }

    /// Whether the lookup found no matching member
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AccessError::MemberNotFound { .. } | AccessError::UnsupportedMember { .. }
        )
    }
}

/// Errors raised while loading a permission policy
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    /// The TOML document did not parse
    #[error("Invalid policy document: {0}")]
    Parse(#[from] toml::de::Error),

    /// A permission value was not recognized
    #[error("Invalid permission value for {key}: {value}")]
    InvalidPermission {
        /// Key that held the value
        key: String,
        /// Raw value
        value: String,
    },

    /// The policy file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File path
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
