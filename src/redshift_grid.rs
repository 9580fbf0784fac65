//! Redshift of each cell of a grid uniformly spaced in velocity.
//!
//! Cell `N/2 - 1` sits at the central redshift `z_c`; the others follow the
//! small-offset inverse of the velocity-redshift relation
//!
//! ```text
//! z[i] = (1 + z_c) (1 - (i - N/2 + 1) dv / 2c)^-2 - 1
//! ```
//!
//! which stops being meaningful once the grid spans more than `4c`.

use crate::errors::{
    validate_all_finite, validate_allocation_size, validate_positive, validate_redshift,
    MockError, MockResult,
};
use num_complex::Complex64;

/// Speed of light in km/s.
pub const C_KMS: f64 = 2.998e5;

/// Longest grid, in km/s, the redshift mapping supports.
pub const MAX_GRID_LENGTH_KMS: f64 = 4.0 * C_KMS;

/// Index of the cell placed at the central redshift.
pub fn center_index(n: usize) -> usize {
    n / 2 - 1
}

/// Validate a grid of `2^n2` cells of width `dv_kms` and return its size.
///
/// A grid reaching [`MAX_GRID_LENGTH_KMS`] is a
/// [`MockError::ConfigurationError`]; it is detected from the length alone,
/// before anything is allocated. At exactly `4c` the last cell lands on the
/// pole of the mapping, so the limit itself is excluded.
pub fn check_grid(n2: u32, dv_kms: f64) -> MockResult<usize> {
    if n2 == 0 {
        return Err(MockError::DomainError {
            parameter: "n2".to_string(),
            value: 0.0,
            constraint: ">= 1".to_string(),
        });
    }
    validate_positive(dv_kms, "dv_kms")?;

    let length_kms = f64::from(n2).exp2() * dv_kms;
    if length_kms >= MAX_GRID_LENGTH_KMS {
        return Err(MockError::ConfigurationError {
            length_kms,
            limit_kms: MAX_GRID_LENGTH_KMS,
        });
    }

    if n2 >= usize::BITS {
        return Err(MockError::DomainError {
            parameter: "n2".to_string(),
            value: f64::from(n2),
            constraint: format!("< {}", usize::BITS),
        });
    }
    let n = 1usize << n2;
    validate_allocation_size(n.saturating_mul(std::mem::size_of::<Complex64>()), "grid")?;
    Ok(n)
}

/// Redshift of every cell of a `2^n2`-cell grid centered on `z_c`.
pub fn get_redshifts(z_c: f64, n2: u32, dv_kms: f64) -> MockResult<Vec<f64>> {
    let n = check_grid(n2, dv_kms)?;
    validate_redshift(z_c, "z_c")?;

    let half = (n / 2) as f64;
    let step = dv_kms / (2.0 * C_KMS);
    let redshifts: Vec<f64> = (0..n)
        .map(|i| {
            let offset = (i as f64 - half + 1.0) * step;
            let stretch = (1.0 - offset).powi(-2);
            // equal to (1+z_c)*stretch - 1, exact at the center cell
            z_c + (1.0 + z_c) * (stretch - 1.0)
        })
        .collect();

    validate_all_finite(&redshifts, "redshifts")?;
    log::debug!(
        "redshift grid: {} cells, z in [{:.5}, {:.5}]",
        n,
        redshifts[0],
        redshifts[n - 1]
    );
    Ok(redshifts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_center_cell_is_exact() {
        for &z_c in &[0.1, 2.1, 3.0, 3.7, 5.3] {
            for &(n2, dv) in &[(1, 10.0), (10, 10.0), (12, 3.3), (15, 10.0)] {
                let z = get_redshifts(z_c, n2, dv).unwrap();
                assert_eq!(z.len(), 1 << n2);
                assert_eq!(z[center_index(z.len())], z_c);
            }
        }
    }

    #[test]
    fn test_redshift_increases_along_grid() {
        let z = get_redshifts(3.0, 10, 10.0).unwrap();
        assert!(z.windows(2).all(|w| w[1] > w[0]));
        assert!(z[0] < 3.0 && z[1023] > 3.0);
    }

    #[test]
    fn test_matches_closed_form() {
        let (z_c, n2, dv) = (3.0, 4, 100.0);
        let z = get_redshifts(z_c, n2, dv).unwrap();
        let n = 16.0;
        for (i, &zi) in z.iter().enumerate() {
            let expected =
                (1.0 + z_c) * (1.0 - (i as f64 - n / 2.0 + 1.0) * dv / 2.0 / C_KMS).powi(-2) - 1.0;
            assert_approx_eq!(zi, expected, 1e-12);
        }
    }

    #[test]
    fn test_long_grid_is_configuration_error() {
        match get_redshifts(3.0, 20, 100.0) {
            Err(MockError::ConfigurationError {
                length_kms,
                limit_kms,
            }) => {
                assert_eq!(length_kms, 1048576.0 * 100.0);
                assert_eq!(limit_kms, 4.0 * C_KMS);
            }
            other => panic!("Expected ConfigurationError, got {:?}", other),
        }
        assert!(matches!(
            check_grid(200, 10.0),
            Err(MockError::ConfigurationError { .. })
        ));
    }

    #[test]
    fn test_grid_at_exactly_four_c_is_configuration_error() {
        // 16 cells of 74950 km/s span exactly 4c
        assert_eq!(16.0 * 74950.0, MAX_GRID_LENGTH_KMS);
        match get_redshifts(3.0, 4, 74950.0) {
            Err(MockError::ConfigurationError {
                length_kms,
                limit_kms,
            }) => assert_eq!(length_kms, limit_kms),
            other => panic!("Expected ConfigurationError, got {:?}", other),
        }

        let z = get_redshifts(3.0, 4, 74900.0).unwrap();
        assert!(z.iter().all(|zi| zi.is_finite()));
    }

    #[test]
    fn test_invalid_grid_inputs_are_domain_errors() {
        assert!(matches!(check_grid(0, 10.0), Err(MockError::DomainError { .. })));
        assert!(matches!(check_grid(10, -10.0), Err(MockError::DomainError { .. })));
        assert!(matches!(check_grid(10, 0.0), Err(MockError::DomainError { .. })));
        assert!(matches!(
            get_redshifts(-1.0, 10, 10.0),
            Err(MockError::DomainError { .. })
        ));
    }
}
