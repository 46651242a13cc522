//! # Error Types
//!
//! Domain-specific error types for pasar-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pasar-core errors (this file)                                         │
//! │  ├── CoreError        - General domain errors                          │
//! │  ├── ValidationError  - Rejected input (quantity, discount, ...)       │
//! │  ├── FormatError      - Rupiah formatting failures                     │
//! │  └── CryptoError      - Cursor cipher failures                         │
//! │                                                                         │
//! │  pasar-db errors (separate crate)                                      │
//! │  └── DbError          - Storage failures                               │
//! │                                                                         │
//! │  backend errors (apps/backend)                                         │
//! │  └── ApiError         - What the HTTP layer sees (code + status)       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → HTTP status class      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Input rejected by a value-object constructor.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A price or weight could not be rendered for display.
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    /// Cursor encryption or decryption failed.
    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    /// The cart item handed to the engine belongs to a different cart.
    ///
    /// ## When This Occurs
    /// - A handler loaded the item by UID without checking ownership
    /// - The item was moved/deleted between the two reads
    #[error("Cart item {item_uid} does not belong to cart {cart_uid}")]
    ItemNotInCart { item_uid: String, cart_uid: String },

    /// Integer arithmetic on rupiah amounts overflowed.
    #[error("Amount overflow while computing {operation}")]
    AmountOverflow { operation: &'static str },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the value-object constructors (`Quantity::new`,
/// `Discount::new`, `NewProduct::new`, ...) before any arithmetic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid email, non-finite weight).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Format Error
// =============================================================================

/// Display formatting errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// The amount has no representable magnitude (`i64::MIN`).
    #[error("Amount {0} cannot be formatted as rupiah")]
    AmountOutOfRange(i64),
}

// =============================================================================
// Crypto Error
// =============================================================================

/// Cursor cipher errors.
///
/// `Decrypt` and `InvalidCursor` mean the caller sent a bad cursor;
/// `InvalidKey` and `Encrypt` are server-side faults.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Key is not valid hex or has an unsupported length.
    #[error("Invalid cipher key: {0}")]
    InvalidKey(String),

    /// Producing a ciphertext failed.
    #[error("Encryption failed: {0}")]
    Encrypt(String),

    /// Ciphertext is malformed or failed authentication.
    #[error("Decryption failed: {0}")]
    Decrypt(String),

    /// Decrypted plaintext is not a row identifier.
    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),
}

impl CryptoError {
    /// True when the failure was caused by client-supplied input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, CryptoError::Decrypt(_) | CryptoError::InvalidCursor(_))
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
