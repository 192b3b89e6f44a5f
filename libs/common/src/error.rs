//! Custom error types for the common library
//!
//! This module defines the error types shared by the services: database
//! failures and session token failures.

use sqlx::Error as SqlxError;
use thiserror::Error;

/// Custom error type for database operations
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error occurred during database connection
    #[error("Database connection error: {0}")]
    Connection(#[source] SqlxError),

    /// Error occurred during database query execution
    #[error("Database query error: {0}")]
    Query(#[source] SqlxError),

    /// Error occurred during database migration
    #[error("Database migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Database configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with DatabaseError
pub type DatabaseResult<T> = Result<T, DatabaseError>;

/// Failures raised while minting or checking session tokens
#[derive(Error, Debug)]
pub enum TokenError {
    /// Missing or inconsistent signing configuration
    #[error("Token configuration error: {0}")]
    Configuration(String),

    /// The token could not be signed
    #[error("Failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    /// The token is expired, malformed or carries a bad signature
    #[error("Invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    /// The token verified but does not name a user
    #[error("Token does not carry a user id")]
    MissingSubject,
}
