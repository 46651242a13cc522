//! # Validation Module
//!
//! Validated value objects and input checks for pasar.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP layer (external)                                        │
//! │  └── Deserialization into raw request payloads                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Quantity / Discount / PageLimit / PageDirection                   │
//! │  └── NewProduct / NewUser constructors                                 │
//! │           │   (once constructed, a value is valid for its lifetime)    │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / UNIQUE constraints                                     │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pasar_core::validation::{Discount, PageDirection, Quantity};
//!
//! let qty = Quantity::new(5).unwrap();
//! assert_eq!(qty.get(), 5);
//! assert!(Quantity::new(0).is_err());
//!
//! assert!(Discount::new(101).is_err());
//! assert_eq!(PageDirection::parse("").unwrap(), PageDirection::First);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::ProductStatus;
use crate::{
    MAX_DISCOUNT_PERCENT, MAX_ITEM_QUANTITY, MAX_PAGE_LIMIT, MIN_BASE_PRICE,
    MIN_DESCRIPTION_LENGTH, MIN_PRODUCT_NAME_LENGTH, MIN_PRODUCT_WEIGHT_GRAMS,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Quantity
// =============================================================================

/// A cart line quantity in `1..=MAX_ITEM_QUANTITY`.
///
/// Zero is not a quantity: removing a line goes through the delete
/// operation, never through an update to 0.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Cart: Add / Change Quantity                                            │
/// │                                                                         │
/// │  Request carries quantity: 5                                            │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  Quantity::new(5) ← THIS FUNCTION                                      │
/// │       │                                                                 │
/// │       ├── qty <= 0?  → MustBePositive                                  │
/// │       ├── qty > 999? → OutOfRange                                      │
/// │       └── OK → cart engine                                             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Quantity(i64);

impl Quantity {
    pub fn new(qty: i64) -> ValidationResult<Self> {
        if qty <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            });
        }

        if qty > MAX_ITEM_QUANTITY {
            return Err(ValidationError::OutOfRange {
                field: "quantity".to_string(),
                min: 1,
                max: MAX_ITEM_QUANTITY,
            });
        }

        Ok(Quantity(qty))
    }

    #[inline]
    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Quantity {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Quantity::new(value)
    }
}

// =============================================================================
// Discount
// =============================================================================

/// A percentage discount in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Discount(i64);

impl Discount {
    pub fn new(percent: i64) -> ValidationResult<Self> {
        if !(0..=MAX_DISCOUNT_PERCENT).contains(&percent) {
            return Err(ValidationError::OutOfRange {
                field: "discount".to_string(),
                min: 0,
                max: MAX_DISCOUNT_PERCENT,
            });
        }
        Ok(Discount(percent))
    }

    /// No discount.
    pub const fn none() -> Self {
        Discount(0)
    }

    #[inline]
    pub const fn percent(&self) -> i64 {
        self.0
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// Page size for cursor pagination, `1..=MAX_PAGE_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PageLimit(i64);

impl PageLimit {
    pub fn new(limit: i64) -> ValidationResult<Self> {
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(ValidationError::OutOfRange {
                field: "limit".to_string(),
                min: 1,
                max: MAX_PAGE_LIMIT,
            });
        }
        Ok(PageLimit(limit))
    }

    #[inline]
    pub const fn get(&self) -> i64 {
        self.0
    }
}

/// Which way a keyset page walks from its cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageDirection {
    /// No cursor: start from the lowest identifier.
    First,
    /// Rows after the cursor.
    Next,
    /// Rows before the cursor.
    Prev,
}

impl PageDirection {
    /// Parses the wire form: `""`, `"next"` or `"prev"`.
    pub fn parse(raw: &str) -> ValidationResult<Self> {
        match raw {
            "" => Ok(PageDirection::First),
            "next" => Ok(PageDirection::Next),
            "prev" => Ok(PageDirection::Prev),
            _ => Err(ValidationError::NotAllowed {
                field: "direction".to_string(),
                allowed: vec![String::new(), "next".to_string(), "prev".to_string()],
            }),
        }
    }

    /// The wire form of this direction.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PageDirection::First => "",
            PageDirection::Next => "next",
            PageDirection::Prev => "prev",
        }
    }
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name: trimmed, at least 5 characters.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_min_chars("name", name, MIN_PRODUCT_NAME_LENGTH)
}

/// Validates a product description: trimmed, at least 30 characters.
pub fn validate_description(description: &str) -> ValidationResult<()> {
    validate_min_chars("description", description, MIN_DESCRIPTION_LENGTH)
}

/// Validates an email address (shape only; ownership is the identity
/// provider's concern).
///
/// ## Example
/// ```rust
/// use pasar_core::validation::validate_email;
///
/// assert!(validate_email("budi@example.com").is_ok());
/// assert!(validate_email("budi").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must contain a local part and a domain separated by '@'".to_string(),
        }),
    }
}

fn validate_min_chars(field: &str, value: &str, min: usize) -> ValidationResult<()> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    if value.chars().count() < min {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min,
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a product weight in grams: finite and at least 100 g.
pub fn validate_weight_grams(grams: f64) -> ValidationResult<()> {
    if !grams.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: "weight_value".to_string(),
            reason: "must be a finite number".to_string(),
        });
    }
    if grams < MIN_PRODUCT_WEIGHT_GRAMS {
        return Err(ValidationError::OutOfRange {
            field: "weight_value".to_string(),
            min: MIN_PRODUCT_WEIGHT_GRAMS as i64,
            max: i64::MAX,
        });
    }
    Ok(())
}

/// Validates a catalog base price in rupiah (minimum Rp 5.000).
pub fn validate_base_price(rupiah: i64) -> ValidationResult<()> {
    if rupiah < MIN_BASE_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "base_price_value".to_string(),
            min: MIN_BASE_PRICE,
            max: i64::MAX,
        });
    }
    Ok(())
}

// =============================================================================
// New Product
// =============================================================================

/// Raw product fields as submitted by an admin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    #[serde(default)]
    pub sku: Option<String>,
    pub description: String,
    pub images: Vec<String>,
    pub weight_value: f64,
    pub base_price_value: i64,
    pub discount: i64,
    pub stock: i64,
    pub status: String,
}

/// A catalog product that passed every catalog rule.
///
/// Used for both create and full update.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub sku: Option<String>,
    pub description: String,
    pub images: Vec<String>,
    pub weight_value: f64,
    pub base_price_value: i64,
    pub discount: Discount,
    pub stock: i64,
    pub status: ProductStatus,
}

impl NewProduct {
    /// Validates raw input.
    ///
    /// ## Rules
    /// - name ≥ 5 characters, description ≥ 30 characters
    /// - at least one non-empty image URL
    /// - weight ≥ 100 g, base price ≥ Rp 5.000
    /// - discount 0..=100, stock ≥ 0
    /// - status `ACTIVE` or `INACTIVE`
    pub fn new(input: ProductInput) -> ValidationResult<Self> {
        validate_product_name(&input.name)?;
        validate_description(&input.description)?;

        if input.images.is_empty() || input.images.iter().any(|url| url.trim().is_empty()) {
            return Err(ValidationError::Required {
                field: "images".to_string(),
            });
        }

        validate_weight_grams(input.weight_value)?;
        validate_base_price(input.base_price_value)?;
        let discount = Discount::new(input.discount)?;

        if input.stock < 0 {
            return Err(ValidationError::OutOfRange {
                field: "stock".to_string(),
                min: 0,
                max: i64::MAX,
            });
        }

        let status = ProductStatus::parse(&input.status)?;
        let sku = input
            .sku
            .map(|sku| sku.trim().to_string())
            .filter(|sku| !sku.is_empty());

        Ok(NewProduct {
            name: input.name.trim().to_string(),
            sku,
            description: input.description.trim().to_string(),
            images: input.images,
            weight_value: input.weight_value,
            base_price_value: input.base_price_value,
            discount,
            stock: input.stock,
            status,
        })
    }
}

// =============================================================================
// New User
// =============================================================================

/// A user about to be registered.
///
/// `auth_uid` is the subject identifier issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub auth_uid: String,
    pub email: String,
    pub name: String,
    pub phone: String,
    pub profile_image: String,
}

impl NewUser {
    pub fn new(auth_uid: &str, email: &str) -> ValidationResult<Self> {
        let auth_uid = auth_uid.trim();
        if auth_uid.is_empty() {
            return Err(ValidationError::Required {
                field: "auth_uid".to_string(),
            });
        }
        validate_email(email)?;

        Ok(NewUser {
            auth_uid: auth_uid.to_string(),
            email: email.trim().to_lowercase(),
            name: String::new(),
            phone: String::new(),
            profile_image: String::new(),
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn with_profile_image(mut self, url: impl Into<String>) -> Self {
        self.profile_image = url.into();
        self
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
