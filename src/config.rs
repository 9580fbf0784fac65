//! # Generation Configuration
//!
//! Configuration structures for mock skewer generation: the grid and seed
//! ([`SkewerConfig`]), the shape and amplitude constants of the flux power
//! spectrum ([`PowerSpectrumParams`]), and the lognormal density transform
//! ([`LognormalParams`]).
//!
//! Defaults reproduce the McDonald et al. (2006) fits.

use crate::errors::{validate_finite, validate_non_negative, validate_positive, MockResult};
use crate::redshift_grid::check_grid;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Shape of the one-dimensional power spectrum.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SpectrumShape {
    /// McDonald et al. (2006) power-law bend with Gaussian and top-hat smoothing
    McDonald2006,
    /// Constant power at every wavenumber, for engine self-tests only
    Flat(f64),
}

/// Constants of the power spectrum and optical-depth models.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PowerSpectrumParams {
    /// Spectral shape
    pub shape: SpectrumShape,
    /// Power amplitude at the pivot redshift
    pub power_norm: f64,
    /// Power-law index of the power amplitude in `(1+z)`
    pub power_slope: f64,
    /// Optical-depth amplitude at the pivot redshift
    pub tau_norm: f64,
    /// Power-law index of the optical-depth amplitude in `(1+z)`
    pub tau_slope: f64,
    /// Pivot redshift of both amplitude fits
    pub z_pivot: f64,
    /// Wavenumber where the unsmoothed power equals the amplitude, in s/km
    pub k0_skm: f64,
    /// Bend scale of the power law, in s/km
    pub k1_skm: f64,
    /// Power-law index of the bend
    pub n: f64,
    /// Gaussian smoothing length, in km/s
    pub r1_kms: f64,
}

impl Default for PowerSpectrumParams {
    fn default() -> Self {
        Self::mcdonald_2006()
    }
}

impl PowerSpectrumParams {
    /// Fits from McDonald et al. (2006).
    pub fn mcdonald_2006() -> Self {
        Self {
            shape: SpectrumShape::McDonald2006,
            power_norm: 58.6,
            power_slope: -2.82,
            tau_norm: 0.374,
            tau_slope: 5.10,
            z_pivot: 3.0,
            k0_skm: 0.01,
            k1_skm: 0.001,
            n: 0.7,
            r1_kms: 5.0,
        }
    }

    /// Flat spectrum of constant `power`, keeping the default amplitude fits.
    pub fn flat(power: f64) -> Self {
        Self {
            shape: SpectrumShape::Flat(power),
            ..Self::mcdonald_2006()
        }
    }

    /// Reject constants that would make the model non-finite.
    pub fn validate(&self) -> MockResult<()> {
        if let SpectrumShape::Flat(power) = self.shape {
            validate_non_negative(power, "flat power")?;
        }
        validate_positive(self.power_norm, "power_norm")?;
        validate_finite(self.power_slope, "power_slope")?;
        validate_positive(self.tau_norm, "tau_norm")?;
        validate_finite(self.tau_slope, "tau_slope")?;
        validate_positive(1.0 + self.z_pivot, "1 + z_pivot")?;
        validate_positive(self.k0_skm, "k0_skm")?;
        validate_positive(self.k1_skm, "k1_skm")?;
        validate_positive(self.n, "n")?;
        validate_non_negative(self.r1_kms, "r1_kms")?;
        Ok(())
    }
}

/// Parameters of the Gaussian-to-density lognormal transform.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LognormalParams {
    /// Exponent applied to the Gaussian field before exponentiation
    pub tau_pl: f64,
}

impl Default for LognormalParams {
    fn default() -> Self {
        Self { tau_pl: 2.0 }
    }
}

impl LognormalParams {
    /// Reject a non-finite exponent.
    pub fn validate(&self) -> MockResult<()> {
        validate_finite(self.tau_pl, "tau_pl")
    }
}

/// Source of the Gaussian variance used by the density transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DensityVariance {
    /// Population variance of the drawn field
    #[default]
    Sample,
    /// Variance predicted by the power spectrum for this grid
    Analytic,
}

/// Everything needed to generate one skewer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SkewerConfig {
    /// Central redshift
    pub z_c: f64,
    /// Log2 of the number of cells
    pub n2: u32,
    /// Cell width in km/s
    pub dv_kms: f64,
    /// Seed of the random stream
    pub seed: u64,
    /// Power spectrum constants
    pub spectrum: PowerSpectrumParams,
    /// Lognormal transform constants
    pub lognormal: LognormalParams,
    /// Variance fed to the density transform
    pub density_variance: DensityVariance,
}

impl Default for SkewerConfig {
    fn default() -> Self {
        Self::reference()
    }
}

impl SkewerConfig {
    /// Configuration with the given grid and seed and default model constants.
    pub fn new(z_c: f64, n2: u32, dv_kms: f64, seed: u64) -> Self {
        Self {
            z_c,
            n2,
            dv_kms,
            seed,
            spectrum: PowerSpectrumParams::default(),
            lognormal: LognormalParams::default(),
            density_variance: DensityVariance::default(),
        }
    }

    /// 32768 cells of 10 km/s around z = 3, seed 666.
    pub fn reference() -> Self {
        Self::new(3.0, 15, 10.0, 666)
    }

    /// Replace the power spectrum constants.
    pub fn with_spectrum(mut self, spectrum: PowerSpectrumParams) -> Self {
        self.spectrum = spectrum;
        self
    }

    /// Replace the lognormal transform constants.
    pub fn with_lognormal(mut self, lognormal: LognormalParams) -> Self {
        self.lognormal = lognormal;
        self
    }

    /// Choose the variance fed to the density transform.
    pub fn with_density_variance(mut self, density_variance: DensityVariance) -> Self {
        self.density_variance = density_variance;
        self
    }

    /// Number of cells, `2^n2`.
    pub fn num_cells(&self) -> usize {
        1usize << self.n2
    }

    /// Check the grid first, then the model constants.
    pub fn validate(&self) -> MockResult<()> {
        check_grid(self.n2, self.dv_kms)?;
        validate_positive(self.z_c, "z_c")?;
        self.spectrum.validate()?;
        self.lognormal.validate()?;
        Ok(())
    }
}
