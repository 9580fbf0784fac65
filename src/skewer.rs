//! Skewer generation: configuration in, aligned arrays out.
//!
//! [`SkewerGenerator`] validates a [`SkewerConfig`], builds the redshift grid
//! and the field sampler once, and then produces any number of skewers. Each
//! skewer of a batch draws from its own ChaCha stream of the configured seed,
//! so batches are reproducible and can be generated in parallel.

use crate::config::{DensityVariance, SkewerConfig};
use crate::errors::MockResult;
use crate::gaussian_field::GaussianFieldSampler;
use crate::power_spectrum::PowerSpectrumModel;
use crate::redshift_grid::get_redshifts;
use crate::rng::{NormalSource, SkewerRng};
use crate::summary::{FieldSummary, SkewerSummary};
use crate::transform::{to_flux, LognormalTransform};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// One mock line of sight.
///
/// Every array has one entry per cell, aligned with `redshift`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Skewer {
    /// Redshift of each cell
    pub redshift: Vec<f64>,
    /// Gaussian field
    pub delta: Vec<f64>,
    /// Variance of the Gaussian field used by the density transform
    pub var_delta: f64,
    /// Lognormal density
    pub density: Vec<f64>,
    /// Optical depth
    pub optical_depth: Vec<f64>,
    /// Transmitted flux fraction
    pub flux: Vec<f64>,
}

impl Skewer {
    /// Number of cells.
    pub fn len(&self) -> usize {
        self.redshift.len()
    }

    /// Whether the skewer has no cells.
    pub fn is_empty(&self) -> bool {
        self.redshift.is_empty()
    }

    /// Mean, variance and range of each output field.
    pub fn summaries(&self) -> SkewerSummary {
        SkewerSummary {
            delta: FieldSummary::from_values(&self.delta),
            density: FieldSummary::from_values(&self.density),
            optical_depth: FieldSummary::from_values(&self.optical_depth),
            flux: FieldSummary::from_values(&self.flux),
        }
    }
}

/// Reusable generator for one configuration.
#[derive(Debug, Clone)]
pub struct SkewerGenerator {
    config: SkewerConfig,
    redshift: Vec<f64>,
    sampler: GaussianFieldSampler,
    transform: LognormalTransform,
}

impl SkewerGenerator {
    /// Validate `config` and precompute the grid and the mode amplitudes.
    ///
    /// A grid longer than `4c` fails with a configuration error before any
    /// array is allocated.
    pub fn new(config: SkewerConfig) -> MockResult<Self> {
        config.validate()?;

        let model = PowerSpectrumModel::new(config.spectrum.clone())?;
        let redshift = get_redshifts(config.z_c, config.n2, config.dv_kms)?;
        let sampler = GaussianFieldSampler::new(config.z_c, config.n2, config.dv_kms, &model)?;
        let transform = LognormalTransform::new(model, config.lognormal)?;

        Ok(Self {
            config,
            redshift,
            sampler,
            transform,
        })
    }

    /// Configuration this generator was built from.
    pub fn config(&self) -> &SkewerConfig {
        &self.config
    }

    /// Redshift of each cell.
    pub fn redshift(&self) -> &[f64] {
        &self.redshift
    }

    /// Field sampler for this grid.
    pub fn sampler(&self) -> &GaussianFieldSampler {
        &self.sampler
    }

    /// Skewer drawn from the configured seed.
    pub fn generate(&self) -> MockResult<Skewer> {
        self.generate_with(&mut SkewerRng::with_seed(self.config.seed))
    }

    /// Skewer drawn from an arbitrary normal source.
    pub fn generate_with<S: NormalSource + ?Sized>(&self, source: &mut S) -> MockResult<Skewer> {
        let delta = self.sampler.sample_with(source)?;
        let var_delta = match self.config.density_variance {
            DensityVariance::Sample => delta.iter().population_variance(),
            DensityVariance::Analytic => self.sampler.expected_variance(),
        };

        let z = &self.redshift;
        let density = self
            .transform
            .density(self.config.z_c, var_delta, z, &delta)?;
        let optical_depth = self.transform.optical_depth(z, &density)?;
        let flux = to_flux(&optical_depth)?;

        Ok(Skewer {
            redshift: self.redshift.clone(),
            delta,
            var_delta,
            density,
            optical_depth,
            flux,
        })
    }

    /// Skewer `index` of the batch: stream `index` of the configured seed.
    pub fn generate_member(&self, index: u64) -> MockResult<Skewer> {
        self.generate_with(&mut SkewerRng::with_seed(self.config.seed).fork(index))
    }

    /// `count` independent skewers, identical whether or not generated in parallel.
    pub fn generate_batch(&self, count: usize) -> MockResult<Vec<Skewer>> {
        log::debug!(
            "generating batch of {} skewers ({} cells each, seed {})",
            count,
            self.redshift.len(),
            self.config.seed
        );

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            (0..count as u64)
                .into_par_iter()
                .map(|index| self.generate_member(index))
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            (0..count as u64)
                .map(|index| self.generate_member(index))
                .collect()
        }
    }
}

/// Generate one skewer for `config`.
pub fn generate_skewer(config: &SkewerConfig) -> MockResult<Skewer> {
    SkewerGenerator::new(config.clone())?.generate()
}
