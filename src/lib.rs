//! # Lyman-alpha Forest Mock Skewers
//!
//! Synthetic one-dimensional transmitted-flux skewers that statistically mimic
//! the Lyman-alpha forest of quasar spectra, following the lognormal model of
//! McDonald et al. (2006). The crate only forward-generates mocks for fixed
//! model parameters; plotting and parameter parsing belong to the caller.
//!
//! ## Pipeline
//!
//! 1. **Power spectrum** ([`power_spectrum`]): redshift evolution of the flux
//!    power and optical-depth amplitudes, and the 1D power `P(k)` in km/s.
//! 2. **Redshift grid** ([`redshift_grid`]): `2^N2` cells uniformly spaced in
//!    velocity around a central redshift.
//! 3. **Gaussian field** ([`gaussian_field`]): spectral synthesis of a real
//!    Gaussian field whose power spectrum is `P(k)`.
//! 4. **Lognormal chain** ([`transform`]): Gaussian field → density →
//!    optical depth → transmitted flux.
//!
//! [`SkewerGenerator`] wires the steps together and returns every
//! intermediate array as data.
//!
//! ## Quick Start
//!
//! ```rust
//! use lya_mocks::{generate_skewer, SkewerConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1024 cells of 10 km/s around z = 3
//!     let config = SkewerConfig::new(3.0, 10, 10.0, 666);
//!     let skewer = generate_skewer(&config)?;
//!
//!     let summary = skewer.summaries();
//!     assert_eq!(skewer.flux.len(), 1024);
//!     assert!(summary.flux.mean > 0.0 && summary.flux.mean < 1.0);
//!     Ok(())
//! }
//! ```
//!
//! ## Reproducibility
//!
//! Randomness comes from a ChaCha20 stream seeded with `SkewerConfig::seed`;
//! identical configurations give bit-identical skewers. Batches draw skewer
//! `i` from stream `i` of the same seed (see [`SkewerRng::fork`]), which also
//! makes the optional `parallel` feature deterministic.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod errors;
pub mod fft_ops;
pub mod gaussian_field;
pub mod power_spectrum;
pub mod redshift_grid;
pub mod rng;
pub mod skewer;
pub mod summary;
pub mod transform;

pub use config::{
    DensityVariance, LognormalParams, PowerSpectrumParams, SkewerConfig, SpectrumShape,
};
pub use errors::{MockError, MockResult};
pub use gaussian_field::{sample_gaussian_field, GaussianFieldSampler, ModeKind};
pub use power_spectrum::{power_amplitude, tau_amplitude, wavenumbers_kms, PowerSpectrumModel};
pub use redshift_grid::{check_grid, get_redshifts, C_KMS};
pub use rng::{FixedSequence, NormalSource, SkewerRng};
pub use skewer::{generate_skewer, Skewer, SkewerGenerator};
pub use summary::{FieldSummary, SkewerSummary};
pub use transform::{to_density, to_flux, to_optical_depth, LognormalTransform};

pub use fft_ops::{estimate_power_kms, forward_real_fft, inverse_real_fft};
