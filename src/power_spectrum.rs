//! One-dimensional flux power spectrum in velocity units.
//!
//! The model follows McDonald et al. (2006): a power law in wavenumber that
//! bends at `k1`, normalized so that its unsmoothed value at `k0` equals the
//! redshift-dependent amplitude `A(z)`, and suppressed at small scales by a
//! Gaussian of width `R1` and by the top-hat window of one grid cell:
//!
//! ```text
//! P(k) = A(z) (1 + (k0/k1)^n) / (1 + (k/k1)^n) · exp(-(k R1)^2) · sinc^2(k dv / 2)
//! ```
//!
//! The optical-depth amplitude is a second, independent power law in `(1+z)`.

use crate::config::{PowerSpectrumParams, SpectrumShape};
use crate::errors::{
    validate_non_negative, validate_positive, validate_redshift, MockError, MockResult,
};
use std::f64::consts::PI;

/// Floor of `k * dv` in the top-hat window, where `sinc(0) = 1` is approached.
const MIN_KDV: f64 = 1e-6;

/// Amplitude of the 1D flux power at redshift `z`, default fit.
///
/// `58.6 ((1+z)/4)^-2.82`: strictly decreasing in `z`.
pub fn power_amplitude(z: f64) -> f64 {
    PowerSpectrumModel::default().power_amplitude(z)
}

/// Amplitude of the optical depth at redshift `z`, default fit.
///
/// `0.374 ((1+z)/4)^5.10`: strictly increasing in `z`.
pub fn tau_amplitude(z: f64) -> f64 {
    PowerSpectrumModel::default().tau_amplitude(z)
}

/// Wavenumbers of the non-redundant half spectrum of an `n`-cell grid, in s/km.
///
/// `k[j] = 2π j / (n dv)` for `j = 0..=n/2`.
pub fn wavenumbers_kms(n: usize, dv_kms: f64) -> Vec<f64> {
    let length_kms = n as f64 * dv_kms;
    (0..=n / 2)
        .map(|j| 2.0 * PI * j as f64 / length_kms)
        .collect()
}

/// Power spectrum and amplitude fits with validated constants.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerSpectrumModel {
    params: PowerSpectrumParams,
}

impl Default for PowerSpectrumModel {
    fn default() -> Self {
        Self {
            params: PowerSpectrumParams::default(),
        }
    }
}

impl PowerSpectrumModel {
    /// Build a model, rejecting constants that would produce non-finite power.
    pub fn new(params: PowerSpectrumParams) -> MockResult<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    /// Constants of this model.
    pub fn params(&self) -> &PowerSpectrumParams {
        &self.params
    }

    /// Amplitude of the flux power at redshift `z`.
    pub fn power_amplitude(&self, z: f64) -> f64 {
        let p = &self.params;
        p.power_norm * ((1.0 + z) / (1.0 + p.z_pivot)).powf(p.power_slope)
    }

    /// Amplitude of the optical depth at redshift `z`.
    pub fn tau_amplitude(&self, z: f64) -> f64 {
        let p = &self.params;
        p.tau_norm * ((1.0 + z) / (1.0 + p.z_pivot)).powf(p.tau_slope)
    }

    /// Power before the Gaussian and top-hat suppression.
    pub fn unsmoothed_power_kms(&self, z: f64, k_kms: f64) -> f64 {
        let p = &self.params;
        let norm = 1.0 + (p.k0_skm / p.k1_skm).powf(p.n);
        self.power_amplitude(z) * norm / (1.0 + (k_kms / p.k1_skm).powf(p.n))
    }

    /// Gaussian suppression at `R1` times the squared sinc of one cell.
    pub fn smoothing_kernel(&self, k_kms: f64, dv_kms: f64) -> f64 {
        let gaussian = (-(k_kms * self.params.r1_kms).powi(2)).exp();
        let half_kdv = (k_kms * dv_kms).max(MIN_KDV) / 2.0;
        let sinc = half_kdv.sin() / half_kdv;
        gaussian * sinc * sinc
    }

    /// Power at wavenumber `k_kms` (s/km) for cells of `dv_kms`.
    ///
    /// Defined for `z > -1`, `k_kms >= 0` and `dv_kms > 0`;
    /// [`power_spectrum`](Self::power_spectrum) checks those bounds.
    pub fn power_kms(&self, z: f64, k_kms: f64, dv_kms: f64) -> f64 {
        match self.params.shape {
            SpectrumShape::Flat(power) => power,
            SpectrumShape::McDonald2006 => {
                self.unsmoothed_power_kms(z, k_kms) * self.smoothing_kernel(k_kms, dv_kms)
            }
        }
    }

    /// Power at each wavenumber, validating the inputs first.
    pub fn power_spectrum(&self, z: f64, k_kms: &[f64], dv_kms: f64) -> MockResult<Vec<f64>> {
        validate_redshift(z, "z")?;
        validate_positive(dv_kms, "dv_kms")?;
        for &k in k_kms {
            validate_non_negative(k, "k_kms")?;
        }
        Ok(k_kms
            .iter()
            .map(|&k| self.power_kms(z, k, dv_kms))
            .collect())
    }

    /// Variance of a field of `n` cells drawn with this spectrum.
    ///
    /// Trapezoidal rule for `(1/π) ∫ P(k) dk` up to the Nyquist wavenumber on
    /// the grid's own wavenumbers: the DC and Nyquist modes count once, every
    /// interior mode twice.
    pub fn expected_variance(&self, z: f64, n: usize, dv_kms: f64) -> MockResult<f64> {
        if n < 2 || n % 2 != 0 {
            return Err(MockError::DomainError {
                parameter: "n".to_string(),
                value: n as f64,
                constraint: "even and >= 2".to_string(),
            });
        }
        let power = self.power_spectrum(z, &wavenumbers_kms(n, dv_kms), dv_kms)?;
        let nyquist = power.len() - 1;
        let total: f64 = power
            .iter()
            .enumerate()
            .map(|(j, &p)| if j == 0 || j == nyquist { p } else { 2.0 * p })
            .sum();
        Ok(total / (n as f64 * dv_kms))
    }
}
