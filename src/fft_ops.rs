//! FFT operations for spectral synthesis of real fields.
//!
//! rustfft only offers complex transforms, so real fields are handled through
//! their non-redundant half spectrum: an inverse transform extends the half
//! spectrum with its Hermitian mirror image before transforming, and a forward
//! transform keeps the first `n/2 + 1` coefficients. Normalization follows the
//! usual convention of an unnormalized forward transform and a `1/n` inverse.
//!
//! Plans are cached in a process-wide LRU cache keyed by size and direction,
//! so repeated draws on one grid plan only once.

use crate::errors::{validate_all_finite, validate_allocation_size, MockError, MockResult};
use lru::LruCache;
use num_complex::Complex64;
use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::num::NonZeroUsize;
use std::sync::{Arc, LazyLock, Mutex};

/// Cache key for FFT planners, distinguishing forward and inverse transforms
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct FftCacheKey {
    size: usize,
    is_forward: bool,
}

type FftPlanCache = LruCache<FftCacheKey, Arc<dyn Fft<f64>>>;

const MAX_CACHE_ENTRIES: usize = 64;
/// Largest supported transform (2^26 points)
const MAX_FFT_SIZE: usize = 1 << 26;

static FFT_CACHE: LazyLock<Mutex<FftPlanCache>> = LazyLock::new(|| {
    Mutex::new(LruCache::new(
        NonZeroUsize::new(MAX_CACHE_ENTRIES).unwrap_or(NonZeroUsize::MIN),
    ))
});

/// Get cached FFT plan (forward or inverse), planning it on a miss.
fn get_cached_fft_plan(size: usize, is_forward: bool) -> MockResult<Arc<dyn Fft<f64>>> {
    if size == 0 || size > MAX_FFT_SIZE {
        return Err(MockError::FftError { size });
    }

    let cache_key = FftCacheKey { size, is_forward };

    // A poisoned lock only means another thread panicked mid-insert; the
    // cached plans themselves are immutable.
    let mut cache = match FFT_CACHE.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            log::warn!("FFT plan cache mutex poisoned, recovering");
            poisoned.into_inner()
        }
    };

    if let Some(cached_fft) = cache.get(&cache_key) {
        return Ok(Arc::clone(cached_fft));
    }

    let mut planner = FftPlanner::new();
    let new_fft = if is_forward {
        planner.plan_fft_forward(size)
    } else {
        planner.plan_fft_inverse(size)
    };

    cache.put(cache_key, Arc::clone(&new_fft));
    Ok(new_fft)
}

/// Get cached FFT plan for forward transform
pub fn get_cached_fft_forward(size: usize) -> MockResult<Arc<dyn Fft<f64>>> {
    get_cached_fft_plan(size, true)
}

/// Get cached FFT plan for inverse transform
pub fn get_cached_fft_inverse(size: usize) -> MockResult<Arc<dyn Fft<f64>>> {
    get_cached_fft_plan(size, false)
}

/// Clear the FFT plan cache.
pub fn clear_fft_cache() {
    match FFT_CACHE.lock() {
        Ok(mut cache) => cache.clear(),
        Err(poisoned) => poisoned.into_inner().clear(),
    }
}

/// Current FFT cache statistics as `(forward_plans, inverse_plans)`.
pub fn get_fft_cache_stats() -> (usize, usize) {
    let cache = match FFT_CACHE.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };

    cache.iter().fold((0, 0), |(forward, inverse), (key, _)| {
        if key.is_forward {
            (forward + 1, inverse)
        } else {
            (forward, inverse + 1)
        }
    })
}

fn validate_real_transform_size(n: usize) -> MockResult<()> {
    if n < 2 || n % 2 != 0 {
        return Err(MockError::FftError { size: n });
    }
    validate_allocation_size(
        n.saturating_mul(std::mem::size_of::<Complex64>()),
        "real FFT",
    )
}

/// Inverse transform of the half spectrum of a real signal of even length `n`.
///
/// `half` holds coefficients `0..=n/2`. The imaginary parts of the DC and
/// Nyquist coefficients are ignored, as they must vanish for a real signal.
/// Output is normalized by `1/n`.
pub fn inverse_real_fft(half: &[Complex64], n: usize) -> MockResult<Vec<f64>> {
    validate_real_transform_size(n)?;
    let nyquist = n / 2;
    if half.len() != nyquist + 1 {
        return Err(MockError::LengthMismatch {
            field: "half spectrum".to_string(),
            expected: nyquist + 1,
            actual: half.len(),
        });
    }

    let mut buffer = vec![Complex::new(0.0, 0.0); n];
    buffer[0] = Complex::new(half[0].re, 0.0);
    buffer[nyquist] = Complex::new(half[nyquist].re, 0.0);
    for j in 1..nyquist {
        buffer[j] = half[j];
        buffer[n - j] = half[j].conj();
    }

    let fft = get_cached_fft_inverse(n)?;
    fft.process(&mut buffer);

    let norm = 1.0 / n as f64;
    Ok(buffer.iter().map(|c| c.re * norm).collect())
}

/// Forward transform of a real signal of even length, keeping coefficients `0..=n/2`.
pub fn forward_real_fft(data: &[f64]) -> MockResult<Vec<Complex64>> {
    let n = data.len();
    validate_real_transform_size(n)?;
    validate_all_finite(data, "FFT input")?;

    let mut buffer: Vec<Complex64> = data.iter().map(|&x| Complex::new(x, 0.0)).collect();
    let fft = get_cached_fft_forward(n)?;
    fft.process(&mut buffer);

    buffer.truncate(n / 2 + 1);
    Ok(buffer)
}

/// Periodogram estimate of the power of a field sampled every `dv_kms`.
///
/// Returns `|X_j|^2 dv / n` for `j = 0..=n/2`, in the same units as the
/// model power spectrum, so its expectation over realizations is `P(k_j)`.
pub fn estimate_power_kms(field: &[f64], dv_kms: f64) -> MockResult<Vec<f64>> {
    crate::errors::validate_positive(dv_kms, "dv_kms")?;
    let scale = dv_kms / field.len() as f64;
    Ok(forward_real_fft(field)?
        .iter()
        .map(|c| c.norm_sqr() * scale)
        .collect())
}
