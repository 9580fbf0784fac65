//! Error types and validation functions for mock skewer generation.
//!
//! Generation is a pure computation, so every failure is a rejected input:
//! either a grid that breaks the redshift approximation
//! ([`MockError::ConfigurationError`]) or a numeric argument outside the
//! domain of the model ([`MockError::DomainError`]). Both are detected at
//! entry, before any field is allocated.

use thiserror::Error;

/// Error types for mock skewer generation.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum MockError {
    /// Grid is too long for the linear velocity-to-redshift mapping.
    #[error(
        "Configuration error: grid length {length_kms} km/s exceeds {limit_kms} km/s, \
         the redshift approximation breaks down"
    )]
    ConfigurationError {
        /// Total grid length `N * dv_kms`
        length_kms: f64,
        /// Largest supported length (`4 * c_kms`)
        limit_kms: f64,
    },

    /// Numeric input outside the domain of the model.
    #[error("Domain error: {parameter} = {value}, expected {constraint}")]
    DomainError {
        /// Parameter name
        parameter: String,
        /// Invalid value provided
        value: f64,
        /// Valid range or constraint description
        constraint: String,
    },

    /// Two fields that must be aligned cell-for-cell have different lengths.
    #[error("Length mismatch for {field}: expected {expected} cells, got {actual}")]
    LengthMismatch {
        /// Name of the misaligned field
        field: String,
        /// Length of the reference field
        expected: usize,
        /// Length actually provided
        actual: usize,
    },

    /// FFT computation error.
    #[error("FFT computation failed: input size {size} not supported")]
    FftError {
        /// Transform size that caused the failure
        size: usize,
    },

    /// Non-finite values produced by a computation.
    #[error("Numerical computation failed: {reason}")]
    NumericalError {
        /// Detailed reason for numerical failure
        reason: String,
    },
}

/// Result type for mock generation operations.
pub type MockResult<T> = Result<T, MockError>;

/// Validates that a parameter is finite and strictly positive.
///
/// # Example
/// ```rust
/// use lya_mocks::errors::validate_positive;
///
/// assert!(validate_positive(10.0, "dv_kms").is_ok());
/// assert!(validate_positive(0.0, "dv_kms").is_err());
/// assert!(validate_positive(f64::NAN, "dv_kms").is_err());
/// ```
pub fn validate_positive(value: f64, name: &str) -> MockResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MockError::DomainError {
            parameter: name.to_string(),
            value,
            constraint: "finite and > 0".to_string(),
        })
    }
}

/// Validates that a parameter is finite and not negative.
pub fn validate_non_negative(value: f64, name: &str) -> MockResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(MockError::DomainError {
            parameter: name.to_string(),
            value,
            constraint: "finite and >= 0".to_string(),
        })
    }
}

/// Validates that a redshift lies above -1, where `(1+z)` power laws are defined.
pub fn validate_redshift(z: f64, name: &str) -> MockResult<()> {
    if z.is_finite() && z > -1.0 {
        Ok(())
    } else {
        Err(MockError::DomainError {
            parameter: name.to_string(),
            value: z,
            constraint: "finite and > -1".to_string(),
        })
    }
}

/// Validates that a value is finite and not NaN.
///
/// # Example
/// ```rust
/// use lya_mocks::errors::validate_finite;
///
/// assert!(validate_finite(1.0, "test").is_ok());
/// assert!(validate_finite(f64::NAN, "test").is_err());
/// assert!(validate_finite(f64::INFINITY, "test").is_err());
/// ```
pub fn validate_finite(value: f64, name: &str) -> MockResult<()> {
    if !value.is_finite() {
        Err(MockError::DomainError {
            parameter: name.to_string(),
            value,
            constraint: "finite".to_string(),
        })
    } else {
        Ok(())
    }
}

/// Validates that all values in a slice are finite.
///
/// Returns on the first non-finite value, naming its index.
pub fn validate_all_finite(data: &[f64], name: &str) -> MockResult<()> {
    if let Some((i, &value)) = data.iter().enumerate().find(|(_, &v)| !v.is_finite()) {
        let value_desc = if value.is_nan() {
            "NaN".to_string()
        } else if value.is_sign_positive() {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };

        return Err(MockError::NumericalError {
            reason: format!(
                "{} contains non-finite value at index {}: {}",
                name, i, value_desc
            ),
        });
    }

    Ok(())
}

/// Validates that two aligned fields have the same number of cells.
pub fn validate_same_length(expected: usize, actual: usize, field: &str) -> MockResult<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(MockError::LengthMismatch {
            field: field.to_string(),
            expected,
            actual,
        })
    }
}

/// Validate memory allocation size before a grid is built.
///
/// Maximum allocation is 1 GB per array.
///
/// # Example
/// ```rust
/// use lya_mocks::errors::validate_allocation_size;
///
/// assert!(validate_allocation_size(1000, "test").is_ok());
/// assert!(validate_allocation_size(2_000_000_000, "test").is_err());
/// ```
pub fn validate_allocation_size(size: usize, operation: &str) -> MockResult<()> {
    const MAX_SAFE_ALLOCATION: usize = 1 << 30;

    if size > MAX_SAFE_ALLOCATION {
        return Err(MockError::DomainError {
            parameter: format!("{} allocation (bytes)", operation),
            value: size as f64,
            constraint: format!("<= {} bytes", MAX_SAFE_ALLOCATION),
        });
    }

    Ok(())
}
