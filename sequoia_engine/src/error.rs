//! Error types for the Sequoia engine
//!
//! This module defines the error types used throughout the engine,
//! including backend state changes, resources, uniforms and scene traversal.

use std::fmt;
use crate::render::UniformType;

/// Result type for Sequoia engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Sequoia engine errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A backend hook rejected a state change (OpenGL, D3D12, Null, ...)
    BackendError(String),

    /// Invalid resource (texture, program, vertex data, ...)
    InvalidResource(String),

    /// Initialization failed (engine, renderer, subsystems)
    InitializationFailed(String),

    /// Typed access to a uniform variable holding another type
    InvalidUniformType {
        expected: UniformType,
        found: UniformType,
    },

    /// A lock guarding shared engine state was poisoned by a panicking thread
    LockPoisoned(String),

    /// A scene-graph visitor failed
    Traversal(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::InvalidUniformType { expected, found } => write!(
                f,
                "Invalid uniform type '{}', expected '{}'",
                found, expected
            ),
            Error::LockPoisoned(what) => write!(f, "Lock poisoned: {}", what),
            Error::Traversal(msg) => write!(f, "Scene traversal failed: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
