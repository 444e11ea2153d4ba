//! Rich diagnostic error types for the frontdesk engine.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so operators know exactly
//! what went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the frontdesk engine.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain (error codes, help text, source spans) through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum FrontdeskError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Engine(#[from] EngineError),
}

/// Result alias using the top-level error type.
pub type FrontdeskResult<T> = std::result::Result<T, FrontdeskError>;

// ---------------------------------------------------------------------------
// Store errors
// ---------------------------------------------------------------------------

/// Errors from the knowledge and escalation stores.
///
/// `Io`, `Redb`, and `Serialization` all mean "the backing store is
/// unavailable or corrupt" — the caller-facing layer should apologize and
/// carry on. `RequestNotFound` and `AlreadyResolved` are client errors.
#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("I/O error: {source}")]
    #[diagnostic(
        code(frontdesk::store::io),
        help(
            "A filesystem operation failed. Check that the data directory exists, \
             has correct permissions, and that the disk is not full."
        )
    )]
    Io {
        #[source]
        source: std::io::Error,
    },

    #[error("redb transaction error: {message}")]
    #[diagnostic(
        code(frontdesk::store::redb),
        help(
            "The embedded database encountered a transaction error. \
             This may indicate corruption — try running with a fresh data directory. \
             If the problem persists, file a bug report."
        )
    )]
    Redb { message: String },

    #[error("serialization error: {message}")]
    #[diagnostic(
        code(frontdesk::store::serde),
        help(
            "Failed to serialize or deserialize a stored record. \
             This usually means the stored data format has changed between versions."
        )
    )]
    Serialization { message: String },

    #[error("help request not found: {id}")]
    #[diagnostic(
        code(frontdesk::store::request_not_found),
        help(
            "No help request with that id exists. \
             List pending requests with `frontdesk requests list`."
        )
    )]
    RequestNotFound { id: String },

    #[error("help request already resolved: {id}")]
    #[diagnostic(
        code(frontdesk::store::already_resolved),
        help(
            "Resolved is a terminal state; a request can only be answered once. \
             If the supervisor's answer needs updating, add a knowledge entry \
             directly with `frontdesk kb add`."
        )
    )]
    AlreadyResolved { id: String },
}

// ---------------------------------------------------------------------------
// Engine errors
// ---------------------------------------------------------------------------

/// Errors raised while composing the engine itself.
#[derive(Debug, Error, Diagnostic)]
pub enum EngineError {
    #[error("failed to create data directory: {path}")]
    #[diagnostic(
        code(frontdesk::engine::data_dir),
        help("Check that the parent directory exists and you have write permissions.")
    )]
    DataDir { path: String },

    #[error("invalid engine configuration: {message}")]
    #[diagnostic(
        code(frontdesk::engine::invalid_config),
        help("Fix the configuration value and retry.")
    )]
    InvalidConfig { message: String },
}
