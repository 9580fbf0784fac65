//! Integration tests for the complete skewer generation workflow
//!
//! These tests drive the public API the way a plotting or analysis harness
//! would: build a configuration, generate skewers, and read back the arrays.

use lya_mocks::{
    generate_skewer, get_redshifts, power_amplitude, redshift_grid::center_index,
    sample_gaussian_field, tau_amplitude, to_density, to_flux, to_optical_depth, SkewerConfig,
    SkewerGenerator,
};

/// Test scenario: the reference end-to-end run
///
/// z_c = 3, 1024 cells of 10 km/s, seed 666.
#[test]
fn test_reference_skewer_end_to_end() {
    let config = SkewerConfig::new(3.0, 10, 10.0, 666);
    let skewer = generate_skewer(&config).unwrap();

    assert_eq!(skewer.len(), 1024);
    assert_eq!(skewer.redshift, get_redshifts(3.0, 10, 10.0).unwrap());
    assert_eq!(skewer.redshift[center_index(1024)], 3.0);

    let summary = skewer.summaries();
    assert!(summary.flux.mean > 0.0 && summary.flux.mean < 1.0);
    assert!(summary.flux.min > 0.0 && summary.flux.max <= 1.0);
    assert!(summary.density.min > 0.0);
    assert!(summary.optical_depth.min > 0.0);
    assert!(summary.delta.mean.abs() < 3.0 * summary.delta.variance.sqrt());

    // same configuration, same arrays
    let again = generate_skewer(&config).unwrap();
    assert_eq!(skewer, again);
}

/// Test scenario: flux trend across the reference skewer
///
/// The single seed-666 skewer is more transmissive in its low-redshift half.
#[test]
fn test_reference_skewer_flux_falls_with_redshift() {
    let skewer = generate_skewer(&SkewerConfig::new(3.0, 10, 10.0, 666)).unwrap();
    let half = skewer.len() / 2;
    let low_z = skewer.flux[..half].iter().sum::<f64>() / half as f64;
    let high_z = skewer.flux[half..].iter().sum::<f64>() / half as f64;

    assert!(skewer.redshift[half] > skewer.redshift[half - 1]);
    assert!(
        low_z > high_z,
        "mean flux {} at low z should exceed {} at high z",
        low_z,
        high_z
    );
}

/// Test scenario: the free functions compose into the engine's output
#[test]
fn test_free_functions_match_generator() {
    let (z_c, n2, dv, seed) = (3.0, 9, 10.0, 31);
    let skewer = generate_skewer(&SkewerConfig::new(z_c, n2, dv, seed)).unwrap();

    let z = get_redshifts(z_c, n2, dv).unwrap();
    let delta = sample_gaussian_field(z_c, n2, dv, seed).unwrap();
    assert_eq!(delta, skewer.delta);

    let density = to_density(z_c, skewer.var_delta, &z, &delta).unwrap();
    let tau = to_optical_depth(&z, &density).unwrap();
    let flux = to_flux(&tau).unwrap();
    assert_eq!(density, skewer.density);
    assert_eq!(tau, skewer.optical_depth);
    assert_eq!(flux, skewer.flux);
}

/// Test scenario: mean flux falls towards higher redshift
///
/// Averaged over many skewers the flux in the high-redshift half of the grid
/// is lower than in the low-redshift half, following `tau_amplitude(z)`.
#[test]
fn test_mean_flux_decreases_with_redshift() {
    let generator = SkewerGenerator::new(SkewerConfig::new(3.0, 10, 10.0, 666)).unwrap();
    let realizations = 2000;
    let half = 512;

    let (mut low_z, mut high_z) = (0.0, 0.0);
    for index in 0..realizations {
        let skewer = generator.generate_member(index).unwrap();
        low_z += skewer.flux[..half].iter().sum::<f64>();
        high_z += skewer.flux[half..].iter().sum::<f64>();
    }
    let norm = (realizations as f64) * half as f64;
    let (low_z, high_z) = (low_z / norm, high_z / norm);

    assert!(generator.redshift()[half] > generator.redshift()[half - 1]);
    assert!(low_z > 0.0 && low_z < 1.0);
    assert!(
        high_z < low_z,
        "mean flux {} at high z should be below {} at low z",
        high_z,
        low_z
    );
    assert!(tau_amplitude(generator.redshift()[1023]) > tau_amplitude(generator.redshift()[0]));
    assert!(power_amplitude(generator.redshift()[1023]) < power_amplitude(generator.redshift()[0]));
}

/// Test scenario: batch generation
///
/// Members are reproducible, pairwise different, and the batch does not
/// depend on how it was scheduled.
#[test]
fn test_batch_generation_is_deterministic() {
    let generator = SkewerGenerator::new(SkewerConfig::new(2.5, 8, 12.5, 2024)).unwrap();
    let first = generator.generate_batch(8).unwrap();
    let second = generator.generate_batch(8).unwrap();
    assert_eq!(first, second);

    for i in 0..first.len() {
        for j in (i + 1)..first.len() {
            assert_ne!(first[i].delta, first[j].delta);
        }
        assert_eq!(first[i].redshift, first[0].redshift);
    }
}
