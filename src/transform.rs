//! Lognormal chain from the Gaussian field to transmitted flux.
//!
//! ```text
//! density = exp(tau_pl (delta sqrt(r) - var_delta r / 2)),   r = A(z) / A(z_c)
//! tau     = tau_amplitude(z) density
//! flux    = exp(-tau)
//! ```
//!
//! `r` rescales the field's variance from the central redshift to each
//! cell's own redshift; the `-var_delta r / 2` term keeps the mean density
//! close to one.

use crate::config::LognormalParams;
use crate::errors::{
    validate_all_finite, validate_non_negative, validate_redshift, validate_same_length,
    MockResult,
};
use crate::power_spectrum::PowerSpectrumModel;

/// Density, optical depth and flux maps sharing one power spectrum model.
#[derive(Debug, Clone, Default)]
pub struct LognormalTransform {
    model: PowerSpectrumModel,
    params: LognormalParams,
}

impl LognormalTransform {
    /// Transform with the given amplitude model and lognormal exponent.
    pub fn new(model: PowerSpectrumModel, params: LognormalParams) -> MockResult<Self> {
        params.validate()?;
        Ok(Self { model, params })
    }

    /// Lognormal density of every cell.
    ///
    /// `z` and `delta` must be aligned; `var_delta` is the variance of the
    /// Gaussian field at `z_c`.
    pub fn density(
        &self,
        z_c: f64,
        var_delta: f64,
        z: &[f64],
        delta: &[f64],
    ) -> MockResult<Vec<f64>> {
        validate_redshift(z_c, "z_c")?;
        validate_non_negative(var_delta, "var_delta")?;
        validate_same_length(z.len(), delta.len(), "delta")?;
        for &zi in z {
            validate_redshift(zi, "z")?;
        }

        let tau_pl = self.params.tau_pl;
        let central_amplitude = self.model.power_amplitude(z_c);
        let density: Vec<f64> = z
            .iter()
            .zip(delta)
            .map(|(&zi, &d)| {
                let rel_amp = self.model.power_amplitude(zi) / central_amplitude;
                (tau_pl * (d * rel_amp.sqrt() - 0.5 * var_delta * rel_amp)).exp()
            })
            .collect();

        validate_all_finite(&density, "density")?;
        Ok(density)
    }

    /// Optical depth of every cell, `tau_amplitude(z) * density`.
    pub fn optical_depth(&self, z: &[f64], density: &[f64]) -> MockResult<Vec<f64>> {
        validate_same_length(z.len(), density.len(), "density")?;
        for &zi in z {
            validate_redshift(zi, "z")?;
        }

        let tau: Vec<f64> = z
            .iter()
            .zip(density)
            .map(|(&zi, &rho)| self.model.tau_amplitude(zi) * rho)
            .collect();

        validate_all_finite(&tau, "optical depth")?;
        Ok(tau)
    }
}

/// Transmitted flux fraction `exp(-tau)` of every cell.
///
/// Flux lies in `(0, 1]`. Negative optical depths are unphysical and are
/// clamped to zero, giving a flux of exactly one.
pub fn to_flux(tau: &[f64]) -> MockResult<Vec<f64>> {
    validate_all_finite(tau, "optical depth")?;

    let clamped = tau.iter().filter(|&&t| t < 0.0).count();
    if clamped > 0 {
        log::warn!(
            "{} of {} cells have negative optical depth, clamped to zero",
            clamped,
            tau.len()
        );
    }

    Ok(tau.iter().map(|&t| (-t.max(0.0)).exp()).collect())
}

/// Lognormal density with the default model and `tau_pl = 2`.
pub fn to_density(z_c: f64, var_delta: f64, z: &[f64], delta: &[f64]) -> MockResult<Vec<f64>> {
    LognormalTransform::default().density(z_c, var_delta, z, delta)
}

/// Optical depth with the default optical-depth amplitude.
pub fn to_optical_depth(z: &[f64], density: &[f64]) -> MockResult<Vec<f64>> {
    LognormalTransform::default().optical_depth(z, density)
}
