//! # Validation Module
//!
//! Input rules checked before any query is issued.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Shell                                                        │
//! │  └── Argument parsing (numbers, enums, prices)                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Command layer                                                │
//! │  └── THIS MODULE: form and business rules                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE (username, non-empty SKU)                                  │
//! │  └── Foreign keys                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Form validators ([`validate_item`], [`validate_new_user`]) report every
//! failing field at once through [`ValidationError::Multiple`].
//!
//! ## Usage
//! ```rust
//! use stockroom_core::validation::{validate_credentials_present, validate_sku};
//!
//! assert!(validate_sku("STP-01").is_ok());
//! assert!(validate_credentials_present("admin", "").is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{ItemInput, MovementType, NewCategory, NewStockMovement, NewSupplier, NewUser};
use crate::{MAX_PRICE_CENTS, MAX_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;
const MAX_SKU_LEN: usize = 50;
const MAX_UNIT_LEN: usize = 20;
const MAX_SEARCH_LEN: usize = 100;
const MIN_USERNAME_LEN: usize = 3;
const MAX_USERNAME_LEN: usize = 50;
pub const MIN_PASSWORD_LEN: usize = 6;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU. Items may have none, so empty is accepted.
///
/// ## Rules
/// - At most 50 characters
/// - Letters, digits, hyphens and underscores only
///
/// ```rust
/// use stockroom_core::validation::validate_sku;
///
/// assert!(validate_sku("").is_ok());
/// assert!(validate_sku("PEN-BLU_10").is_ok());
/// assert!(validate_sku("has space").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.chars().count() > MAX_SKU_LEN {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: MAX_SKU_LEN,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a required display name (item, category, supplier).
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required(field));
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a search query and returns it trimmed. Empty is allowed.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_SEARCH_LEN,
        });
    }

    Ok(query.to_string())
}

/// Validates an optional e-mail address: empty, or `local@domain.tld`.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    if email.is_empty() {
        return Ok(());
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "expected name@example.com".to_string(),
        })
    }
}

// =============================================================================
// Credential Validators
// =============================================================================

/// Both fields must be filled in before a login is attempted.
pub fn validate_credentials_present(username: &str, password: &str) -> ValidationResult<()> {
    let mut errors = Vec::new();
    if username.trim().is_empty() {
        errors.push(ValidationError::required("username"));
    }
    if password.is_empty() {
        errors.push(ValidationError::required("password"));
    }
    ValidationError::collect(errors)
}

/// ## Rules
/// - 3 to 50 characters
/// - Letters, digits, `.`, `_` and `-`
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let username = username.trim();

    if username.is_empty() {
        return Err(ValidationError::required("username"));
    }

    let len = username.chars().count();
    if len < MIN_USERNAME_LEN {
        return Err(ValidationError::TooShort {
            field: "username".to_string(),
            min: MIN_USERNAME_LEN,
        });
    }
    if len > MAX_USERNAME_LEN {
        return Err(ValidationError::TooLong {
            field: "username".to_string(),
            max: MAX_USERNAME_LEN,
        });
    }

    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "must contain only letters, numbers, '.', '_' and '-'".to_string(),
        });
    }

    Ok(())
}

pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Stock levels and prices may be zero but never negative.
pub fn validate_non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Checks `0 <= value <= max`.
pub fn validate_amount(field: &str, value: i64, max: i64) -> ValidationResult<()> {
    validate_non_negative(field, value)?;
    if value > max {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max,
        });
    }
    Ok(())
}

/// Validates the quantity of a stock movement.
///
/// Adjustments carry a signed delta and only reject zero; every other
/// movement type needs a positive quantity. The magnitude is capped at
/// [`MAX_QUANTITY`].
pub fn validate_movement_quantity(kind: MovementType, quantity: i64) -> ValidationResult<()> {
    let (ok, min) = match kind {
        MovementType::Adjustment => (quantity != 0, -MAX_QUANTITY),
        _ => (quantity > 0, 1),
    };

    if !ok {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    if quantity < min || quantity > MAX_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min,
            max: MAX_QUANTITY,
        });
    }
    Ok(())
}

// =============================================================================
// Form Validators
// =============================================================================

/// Validates the item form.
///
/// ## Rules
/// - Name, category and supplier are required
/// - SKU format (see [`validate_sku`])
/// - Quantities and prices are not negative and stay within
///   [`MAX_QUANTITY`] / [`MAX_PRICE_CENTS`]
/// - Unit at most 20 characters
pub fn validate_item(input: &ItemInput) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if let Err(e) = validate_name("name", &input.name) {
        errors.push(e);
    }
    if input.category_id.is_none() {
        errors.push(ValidationError::required("category"));
    }
    if input.supplier_id.is_none() {
        errors.push(ValidationError::required("supplier"));
    }
    if let Err(e) = validate_sku(&input.sku) {
        errors.push(e);
    }

    for (field, value, max) in [
        ("quantity", input.quantity, MAX_QUANTITY),
        ("minimum stock", input.minimum_stock, MAX_QUANTITY),
        ("reorder level", input.reorder_level, MAX_QUANTITY),
        ("cost price", input.cost_price_cents, MAX_PRICE_CENTS),
        ("selling price", input.selling_price_cents, MAX_PRICE_CENTS),
    ] {
        if let Err(e) = validate_amount(field, value, max) {
            errors.push(e);
        }
    }

    if input.unit.trim().chars().count() > MAX_UNIT_LEN {
        errors.push(ValidationError::TooLong {
            field: "unit".to_string(),
            max: MAX_UNIT_LEN,
        });
    }

    ValidationError::collect(errors)
}

pub fn validate_new_category(category: &NewCategory) -> ValidationResult<()> {
    validate_name("category name", &category.name)
}

pub fn validate_new_supplier(supplier: &NewSupplier) -> ValidationResult<()> {
    let mut errors = Vec::new();
    if let Err(e) = validate_name("supplier name", &supplier.name) {
        errors.push(e);
    }
    if let Err(e) = validate_email(&supplier.email) {
        errors.push(e);
    }
    ValidationError::collect(errors)
}

pub fn validate_new_user(user: &NewUser) -> ValidationResult<()> {
    let mut errors = Vec::new();
    if let Err(e) = validate_username(&user.username) {
        errors.push(e);
    }
    if let Err(e) = validate_password(&user.password) {
        errors.push(e);
    }
    if let Err(e) = validate_name("full name", &user.full_name) {
        errors.push(e);
    }
    if let Err(e) = validate_email(&user.email) {
        errors.push(e);
    }
    ValidationError::collect(errors)
}

pub fn validate_movement(movement: &NewStockMovement) -> ValidationResult<()> {
    validate_movement_quantity(movement.movement_type, movement.quantity)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_item() -> ItemInput {
        ItemInput {
            name: "Blue Pen".to_string(),
            sku: "PEN-BLU".to_string(),
            category_id: Some(1),
            supplier_id: Some(1),
            quantity: 10,
            minimum_stock: 5,
            reorder_level: 8,
            cost_price_cents: 50,
            selling_price_cents: 120,
            ..Default::default()
        }
    }

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("STP-01").is_ok());
        assert!(validate_sku("product_1").is_ok());
        assert!(validate_sku("").is_ok());

        assert!(validate_sku("has space").is_err());
        assert!(validate_sku("semi;colon").is_err());
        assert!(validate_sku(&"A".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Stapler").is_ok());
        assert_eq!(
            validate_name("name", "   "),
            Err(ValidationError::required("name"))
        );
        assert!(validate_name("name", &"A".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_item_ok() {
        assert!(validate_item(&valid_item()).is_ok());
    }

    #[test]
    fn test_validate_item_reports_all_missing_fields() {
        let input = ItemInput {
            name: String::new(),
            category_id: None,
            supplier_id: None,
            ..valid_item()
        };

        let err = validate_item(&input).unwrap_err();
        assert_eq!(
            err.to_string(),
            "name is required; category is required; supplier is required"
        );
    }

    #[test]
    fn test_validate_item_rejects_negative_values() {
        let input = ItemInput {
            quantity: -1,
            ..valid_item()
        };
        assert_eq!(
            validate_item(&input),
            Err(ValidationError::Negative {
                field: "quantity".to_string()
            })
        );
    }

    #[test]
    fn test_validate_credentials_present() {
        assert!(validate_credentials_present("admin", "admin123").is_ok());
        assert_eq!(
            validate_credentials_present(" ", "x"),
            Err(ValidationError::required("username"))
        );
        assert!(matches!(
            validate_credentials_present("", ""),
            Err(ValidationError::Multiple(errors)) if errors.len() == 2
        ));
    }

    #[test]
    fn test_validate_username_and_password() {
        assert!(validate_username("j.doe").is_ok());
        assert!(validate_username("jd").is_err());
        assert!(validate_username("john doe").is_err());
        assert!(validate_password("123456").is_ok());
        assert!(validate_password("12345").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("").is_ok());
        assert!(validate_email("sales@acme.com").is_ok());
        assert!(validate_email("sales@acme").is_err());
        assert!(validate_email("@acme.com").is_err());
        assert!(validate_email("a@b@c.com").is_err());
    }

    #[test]
    fn test_validate_movement_quantity() {
        assert!(validate_movement_quantity(MovementType::In, 5).is_ok());
        assert!(validate_movement_quantity(MovementType::Out, 0).is_err());
        assert!(validate_movement_quantity(MovementType::Transfer, -1).is_err());
        assert!(validate_movement_quantity(MovementType::Adjustment, -3).is_ok());
        assert!(validate_movement_quantity(MovementType::Adjustment, 0).is_err());
    }

    #[test]
    fn test_movement_quantity_is_capped() {
        assert!(validate_movement_quantity(MovementType::In, MAX_QUANTITY).is_ok());
        assert_eq!(
            validate_movement_quantity(MovementType::In, i64::MAX),
            Err(ValidationError::OutOfRange {
                field: "quantity".to_string(),
                min: 1,
                max: MAX_QUANTITY
            })
        );
        assert!(matches!(
            validate_movement_quantity(MovementType::Adjustment, i64::MIN),
            Err(ValidationError::OutOfRange { min, .. }) if min == -MAX_QUANTITY
        ));
        assert!(validate_movement_quantity(MovementType::Adjustment, -MAX_QUANTITY).is_ok());
    }

    #[test]
    fn test_validate_item_caps_quantity_and_price() {
        let at_limit = ItemInput {
            quantity: MAX_QUANTITY,
            cost_price_cents: MAX_PRICE_CENTS,
            selling_price_cents: MAX_PRICE_CENTS,
            ..valid_item()
        };
        assert!(validate_item(&at_limit).is_ok());

        let huge = ItemInput {
            quantity: 10_000_000_000,
            cost_price_cents: 10_000_000_000,
            ..valid_item()
        };
        assert!(matches!(
            validate_item(&huge),
            Err(ValidationError::Multiple(errors)) if errors.len() == 2
                && errors.iter().all(|e| matches!(e, ValidationError::OutOfRange { .. }))
        ));
    }

    #[test]
    fn test_validate_new_user() {
        let user = NewUser {
            username: "clerk".to_string(),
            password: "clerk123".to_string(),
            full_name: "Store Clerk".to_string(),
            ..Default::default()
        };
        assert!(validate_new_user(&user).is_ok());

        let bad = NewUser {
            password: "123".to_string(),
            ..user
        };
        assert!(validate_new_user(&bad).is_err());
    }

    #[test]
    fn test_validate_search_query_trims() {
        assert_eq!(validate_search_query("  pen ").unwrap(), "pen");
        assert!(validate_search_query(&"x".repeat(101)).is_err());
    }
}
