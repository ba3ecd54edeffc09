//! Synthetic CGM demo data
//!
//! A base trace clustered toward low values by a log decay, and a noisy copy
//! of it. Same seed = same data.

use anyhow::{Context, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

/// Default number of generated points (before range filtering)
pub const DEFAULT_COUNT: usize = 300;

/// Offset added to every base value (mg/dl)
const BASE_OFFSET: f64 = 45.0;
/// Noise standard deviation is base^NOISE_EXPONENT
const NOISE_EXPONENT: f64 = 0.6;
const MAX_VALUE: f64 = 400.0;

#[derive(Debug, Clone, PartialEq)]
pub struct DemoData {
    /// Base trace, used as the reference column
    pub reference: Vec<f64>,
    /// Noisy trace, used as the prediction column
    pub prediction: Vec<f64>,
}

impl DemoData {
    pub fn len(&self) -> usize {
        self.reference.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reference.is_empty()
    }
}

/// Generate up to `count` pairs; base values at or above 400 are dropped.
pub fn generate_demo_data(count: usize, seed: u64) -> Result<DemoData> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let reference: Vec<f64> = (0..count)
        .map(|n| rng.gen_range(0.0..MAX_VALUE) / ((n + 2) as f64).ln() + BASE_OFFSET)
        .filter(|&v| v < MAX_VALUE)
        .collect();

    let prediction = reference
        .iter()
        .map(|&base| {
            let noise = Normal::new(base, base.powf(NOISE_EXPONENT))
                .with_context(|| format!("Invalid noise distribution for base {}", base))?;
            Ok(noise.sample(&mut rng))
        })
        .collect::<Result<Vec<f64>>>()?;

    Ok(DemoData {
        reference,
        prediction,
    })
}
