//! Error types for the codelock crates.
//!
//! Policy outcomes (capacity rejection, lockout rejection, denial) are *not*
//! errors: the engine reports them as explicit outcome values. The variants
//! below cover genuine faults only, such as a closed delivery channel or a
//! token that cannot be constructed at all.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Configuration value that cannot even be normalized to a safe default.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input token outside the accepted character set.
    #[error("Invalid token: {message}")]
    InvalidToken { message: String },

    /// Roster delivery channel failure (emulator/host side).
    #[error("Delivery failed: {message}")]
    Delivery { message: String },

    /// Generic I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
