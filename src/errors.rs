//! Structured error handling for the rigledger crate
//!
//! Every fallible operation in the ledger funnels into [`LedgerError`] so
//! callers (the CLI, embedding applications, tests) can distinguish a
//! persistence failure from a lookup miss or a bad configuration.

use thiserror::Error;

/// Main error type for ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Backend operation failed: {operation} - {source}")]
    Backend {
        operation: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O operation failed: {operation}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Archive operation failed: {operation}")]
    Archive {
        operation: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Lock poisoned: {resource}")]
    LockPoisoned { resource: String },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Resource not found: {resource} - {id}")]
    NotFound { resource: String, id: String },
}

/// Shorthand for Result with LedgerError, used throughout the crate
pub type LedgerResult<T> = Result<T, LedgerError>;

impl LedgerError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a backend error
    pub fn backend(
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Backend {
            operation: operation.into(),
            source: Box::new(source),
        }
    }

    /// Create a serialization error
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    /// Create an archive error
    pub fn archive(operation: impl Into<String>, source: zip::result::ZipError) -> Self {
        Self::Archive {
            operation: operation.into(),
            source,
        }
    }

    /// Create a validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }
}

/// Helper trait for mutex operations that report poisoning instead of panicking
pub trait SafeLock<T: ?Sized> {
    /// Lock a mutex, returning a LedgerError on poison
    fn safe_lock(&self) -> LedgerResult<std::sync::MutexGuard<'_, T>>;
}

impl<T: ?Sized> SafeLock<T> for std::sync::Mutex<T> {
    fn safe_lock(&self) -> LedgerResult<std::sync::MutexGuard<'_, T>> {
        self.lock().map_err(|_| LedgerError::LockPoisoned {
            resource: "mutex".to_string(),
        })
    }
}

/// Helper trait for RwLock read operations
pub trait SafeReadLock<T: ?Sized> {
    /// Acquire a read lock, returning a LedgerError on poison
    fn safe_read(&self) -> LedgerResult<std::sync::RwLockReadGuard<'_, T>>;
}

impl<T: ?Sized> SafeReadLock<T> for std::sync::RwLock<T> {
    fn safe_read(&self) -> LedgerResult<std::sync::RwLockReadGuard<'_, T>> {
        self.read().map_err(|_| LedgerError::LockPoisoned {
            resource: "rwlock_read".to_string(),
        })
    }
}

/// Helper trait for RwLock write operations
pub trait SafeWriteLock<T: ?Sized> {
    /// Acquire a write lock, returning a LedgerError on poison
    fn safe_write(&self) -> LedgerResult<std::sync::RwLockWriteGuard<'_, T>>;
}

impl<T: ?Sized> SafeWriteLock<T> for std::sync::RwLock<T> {
    fn safe_write(&self) -> LedgerResult<std::sync::RwLockWriteGuard<'_, T>> {
        self.write().map_err(|_| LedgerError::LockPoisoned {
            resource: "rwlock_write".to_string(),
        })
    }
}

/// Convert from sled errors
impl From<sled::Error> for LedgerError {
    fn from(err: sled::Error) -> Self {
        LedgerError::backend("sled_operation", err)
    }
}

/// Convert from serde_json errors
impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::serialization("json_operation", err)
    }
}

/// Convert from std::io errors
impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::io("io_operation", err)
    }
}

/// Convert from zip errors
impl From<zip::result::ZipError> for LedgerError {
    fn from(err: zip::result::ZipError) -> Self {
        LedgerError::archive("zip_operation", err)
    }
}
