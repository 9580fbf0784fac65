//! Statistical validation of the Gaussian field sampler
//!
//! Over many seeds the sampled fields must reproduce the variance and the
//! power spectrum of the model they were drawn from.

use lya_mocks::{
    estimate_power_kms, sample_gaussian_field, wavenumbers_kms, GaussianFieldSampler,
    PowerSpectrumModel,
};
use statrs::statistics::Statistics;

/// `(1/π) ∫_0^{k_max} P(k) dk` by Simpson's rule on a fine grid.
fn integrate_power(model: &PowerSpectrumModel, z: f64, k_max: f64, dv: f64) -> f64 {
    let intervals = 200_000;
    let h = k_max / intervals as f64;
    let mut sum = model.power_kms(z, 0.0, dv) + model.power_kms(z, k_max, dv);
    for i in 1..intervals {
        let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
        sum += weight * model.power_kms(z, i as f64 * h, dv);
    }
    sum * h / 3.0 / std::f64::consts::PI
}

/// Test scenario: expected variance is the integral of the power spectrum
#[test]
fn test_expected_variance_matches_power_integral() {
    let model = PowerSpectrumModel::default();
    let (z_c, n, dv) = (3.0, 4096, 10.0);

    let discrete = model.expected_variance(z_c, n, dv).unwrap();
    let k_nyquist = std::f64::consts::PI / dv;
    let continuous = integrate_power(&model, z_c, k_nyquist, dv);

    assert!(
        (discrete / continuous - 1.0).abs() < 0.02,
        "mode sum {} vs integral {}",
        discrete,
        continuous
    );
}

/// Test scenario: sample variance converges to the model variance
///
/// z_c = 3, 4096 cells of 10 km/s, averaged over independent seeds.
#[test]
fn test_sample_variance_converges() {
    let model = PowerSpectrumModel::default();
    let sampler = GaussianFieldSampler::new(3.0, 12, 10.0, &model).unwrap();
    let expected = sampler.expected_variance();

    let realizations = 2000;
    let mean_variance = (0..realizations)
        .map(|seed| {
            let field = sampler.sample(seed).unwrap();
            field.iter().population_variance()
        })
        .collect::<Vec<f64>>()
        .mean();

    assert!(
        (mean_variance / expected - 1.0).abs() < 0.10,
        "sample variance {} vs expected {}",
        mean_variance,
        expected
    );
}

/// Test scenario: periodogram of the samples tracks the model power
///
/// Periodogram values are averaged over seeds and over bands of adjacent
/// modes, then compared with the model averaged over the same bands.
#[test]
fn test_empirical_power_tracks_model() {
    let model = PowerSpectrumModel::default();
    let (z_c, n2, dv) = (3.0, 10, 10.0);
    let n = 1 << n2;
    let sampler = GaussianFieldSampler::new(z_c, n2, dv, &model).unwrap();

    let realizations = 400;
    let mut mean_power = vec![0.0; n / 2 + 1];
    for seed in 0..realizations {
        let field = sampler.sample(seed).unwrap();
        let power = estimate_power_kms(&field, dv).unwrap();
        for (acc, p) in mean_power.iter_mut().zip(power) {
            *acc += p / realizations as f64;
        }
    }

    let k = wavenumbers_kms(n, dv);
    let target = model.power_spectrum(z_c, &k, dv).unwrap();
    let band = 16;
    for start in (1..n / 2 - band).step_by(band) {
        let measured: f64 = mean_power[start..start + band].iter().sum();
        let modelled: f64 = target[start..start + band].iter().sum();
        assert!(
            (measured / modelled - 1.0).abs() < 0.10,
            "band starting at mode {}: measured {} vs model {}",
            start,
            measured,
            modelled
        );
    }
}

/// Test scenario: determinism of a single draw
#[test]
fn test_seed_determinism() {
    let a = sample_gaussian_field(3.0, 12, 10.0, 42).unwrap();
    let b = sample_gaussian_field(3.0, 12, 10.0, 42).unwrap();
    assert_eq!(a.len(), 4096);
    assert!(a.iter().zip(&b).all(|(x, y)| x.to_bits() == y.to_bits()));
}
