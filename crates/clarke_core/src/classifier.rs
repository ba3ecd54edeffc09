//! Zone Classifier
//!
//! Single pass over a validated sample set. Each sample is tested against the
//! zone predicates in priority order A, E, C, D; anything left is B. The order
//! matters because the predicates overlap on shared boundaries.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::geometry::{
    A_LOWER_RATIO, A_UPPER_RATIO, C_LOWER_INTERCEPT, C_LOWER_MIN_REFERENCE, C_LOWER_SLOPE,
    C_UPPER_MAX_REFERENCE, C_UPPER_OFFSET, D_LEFT_MAX_REFERENCE, D_RIGHT_MIN_REFERENCE, HYPER,
    HYPO,
};
use crate::sample::SampleSet;
use crate::zone::Zone;

/// Output form of [`calculate_zones`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TallyMode {
    /// Raw per-zone counts
    #[default]
    Counts,
    /// round(100 * count / total) per zone
    Percentages,
}

/// Classify one (reference, prediction) pair.
///
/// Total: every input, NaN included, maps to exactly one zone (NaN fails all
/// comparisons and falls through to B).
pub fn classify_sample(reference: f64, prediction: f64) -> Zone {
    let (r, p) = (reference, prediction);

    if (r <= HYPO && p <= HYPO) || (p <= A_UPPER_RATIO * r && p >= A_LOWER_RATIO * r) {
        Zone::A
    } else if (r >= HYPER && p <= HYPO) || (r <= HYPO && p >= HYPER) {
        Zone::E
    } else if ((HYPO..=C_UPPER_MAX_REFERENCE).contains(&r) && p >= r + C_UPPER_OFFSET)
        || ((C_LOWER_MIN_REFERENCE..=HYPER).contains(&r)
            && p <= C_LOWER_SLOPE * r + C_LOWER_INTERCEPT)
    {
        Zone::C
    } else if (r >= D_RIGHT_MIN_REFERENCE && (HYPO..=HYPER).contains(&p))
        || (r <= D_LEFT_MAX_REFERENCE && (HYPO..=HYPER).contains(&p))
        || ((D_LEFT_MAX_REFERENCE..=HYPO).contains(&r) && p >= A_UPPER_RATIO * r)
    {
        Zone::D
    } else {
        Zone::B
    }
}

/// Per-zone sample counts, indexed A..E
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ZoneTally {
    counts: [u64; 5],
}

impl ZoneTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify every sample of an already validated set.
    pub fn from_samples(samples: &SampleSet<'_>) -> Self {
        let mut tally = Self::new();
        for sample in samples.iter() {
            tally.record(classify_sample(sample.reference, sample.prediction));
        }
        tally
    }

    pub fn record(&mut self, zone: Zone) {
        self.counts[zone.index()] += 1;
    }

    pub fn count(&self, zone: Zone) -> u64 {
        self.counts[zone.index()]
    }

    pub fn counts(&self) -> [u64; 5] {
        self.counts
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// round(100 * count / total), ties to even. All zeros for an empty tally.
    ///
    /// The rounded entries need not sum to exactly 100.
    pub fn percentages(&self) -> [u64; 5] {
        let total = self.total();
        if total == 0 {
            return [0; 5];
        }
        self.counts
            .map(|count| (100.0 * count as f64 / total as f64).round_ties_even() as u64)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Zone, u64)> + '_ {
        Zone::ALL.iter().map(move |&zone| (zone, self.count(zone)))
    }
}

/// Validate the pair of sequences and tally zones in one pass.
pub fn tally(reference: &[f64], prediction: &[f64]) -> Result<ZoneTally> {
    let samples = SampleSet::new(reference, prediction)?;
    Ok(ZoneTally::from_samples(&samples))
}

/// Zone counts or rounded percentages in fixed order A, B, C, D, E.
///
/// # Errors
/// Input-shape error when the sequences differ in length or are empty.
/// Out-of-range values only produce a logged warning.
pub fn calculate_zones(reference: &[f64], prediction: &[f64], mode: TallyMode) -> Result<[u64; 5]> {
    let tally = tally(reference, prediction)?;
    Ok(match mode {
        TallyMode::Counts => tally.counts(),
        TallyMode::Percentages => tally.percentages(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GridError;

    #[test]
    fn test_within_twenty_percent_is_a() {
        assert_eq!(classify_sample(100.0, 120.0), Zone::A);
        assert_eq!(classify_sample(100.0, 80.0), Zone::A);
    }

    #[test]
    fn test_just_outside_twenty_percent_is_b() {
        assert_eq!(classify_sample(100.0, 125.0), Zone::B);
    }

    #[test]
    fn test_hypoglycemic_corner_is_always_a() {
        for (r, p) in [(0.0, 70.0), (70.0, 0.0), (10.0, 60.0), (70.0, 70.0), (5.0, 0.0)] {
            assert_eq!(classify_sample(r, p), Zone::A, "({}, {})", r, p);
        }
    }

    #[test]
    fn test_d_right() {
        assert_eq!(classify_sample(250.0, 100.0), Zone::D);
    }

    #[test]
    fn test_d_left() {
        assert_eq!(classify_sample(40.0, 150.0), Zone::D);
        // Sliver between 175/3 and 70, above the 120% line
        assert_eq!(classify_sample(65.0, 79.0), Zone::D);
    }

    #[test]
    fn test_e_zones() {
        assert_eq!(classify_sample(50.0, 250.0), Zone::E);
        assert_eq!(classify_sample(300.0, 40.0), Zone::E);
    }

    #[test]
    fn test_c_zones() {
        assert_eq!(classify_sample(160.0, 40.0), Zone::C);
        assert_eq!(classify_sample(100.0, 250.0), Zone::C);
    }

    #[test]
    fn test_priority_e_before_c_and_d() {
        // (70, 180) satisfies E, upper C and D-left predicates; E wins
        assert_eq!(classify_sample(70.0, 180.0), Zone::E);
        // (180, 70) satisfies E and lower C; E wins
        assert_eq!(classify_sample(180.0, 70.0), Zone::E);
    }

    #[test]
    fn test_nan_falls_through_to_b() {
        assert_eq!(classify_sample(f64::NAN, 100.0), Zone::B);
    }

    #[test]
    fn test_counts_in_fixed_order() {
        let reference = [100.0, 100.0, 160.0, 250.0, 50.0];
        let prediction = [110.0, 125.0, 40.0, 100.0, 250.0];
        let counts = calculate_zones(&reference, &prediction, TallyMode::Counts).unwrap();
        assert_eq!(counts, [1, 1, 1, 1, 1]);
    }

    #[test]
    fn test_percentages_of_uniform_tally() {
        let reference = [100.0, 100.0, 160.0, 250.0, 50.0];
        let prediction = [110.0, 125.0, 40.0, 100.0, 250.0];
        let pct = calculate_zones(&reference, &prediction, TallyMode::Percentages).unwrap();
        assert_eq!(pct, [20, 20, 20, 20, 20]);
    }

    #[test]
    fn test_percentages_round_half_to_even() {
        // 1/8 = 12.5% -> 12, 7/8 = 87.5% -> 88
        let mut tally = ZoneTally::new();
        tally.record(Zone::B);
        for _ in 0..7 {
            tally.record(Zone::A);
        }
        assert_eq!(tally.percentages(), [88, 12, 0, 0, 0]);
        assert_eq!(ZoneTally::new().percentages(), [0; 5]);
    }

    #[test]
    fn test_length_mismatch_aborts_before_counting() {
        let err = calculate_zones(&[1.0, 2.0, 3.0, 4.0, 5.0], &[1.0, 2.0, 3.0, 4.0], TallyMode::Counts)
            .unwrap_err();
        assert!(matches!(
            err,
            GridError::LengthMismatch {
                reference: 5,
                prediction: 4
            }
        ));
    }

    #[test]
    fn test_out_of_range_values_are_still_counted() {
        let counts = calculate_zones(&[450.0, -10.0], &[460.0, -5.0], TallyMode::Counts).unwrap();
        assert_eq!(counts.iter().sum::<u64>(), 2);
        assert_eq!(counts[Zone::A.index()], 2);
    }

    #[test]
    fn test_tally_iter() {
        let t = tally(&[100.0, 160.0], &[100.0, 40.0]).unwrap();
        let pairs: Vec<(Zone, u64)> = t.iter().collect();
        assert_eq!(
            pairs,
            vec![(Zone::A, 1), (Zone::B, 0), (Zone::C, 1), (Zone::D, 0), (Zone::E, 0)]
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: every sample lands in exactly one zone
            #[test]
            fn prop_tally_sums_to_sample_count(
                pairs in prop::collection::vec((-50.0f64..450.0, -50.0f64..450.0), 1..200)
            ) {
                let (reference, prediction): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
                let t = tally(&reference, &prediction).unwrap();
                prop_assert_eq!(t.total(), reference.len() as u64);
            }

            /// Property: both values <= 70 is always zone A
            #[test]
            fn prop_hypoglycemic_corner_is_a(r in 0.0f64..=70.0, p in 0.0f64..=70.0) {
                prop_assert_eq!(classify_sample(r, p), Zone::A);
            }

            /// Property: the 20% band is always zone A
            #[test]
            fn prop_twenty_percent_band_is_a(r in 0.0f64..400.0, ratio in 0.8f64..=1.2) {
                let p = r * ratio;
                prop_assume!(p >= 0.8 * r && p <= 1.2 * r);
                prop_assert_eq!(classify_sample(r, p), Zone::A);
            }

            /// Property: classification is deterministic
            #[test]
            fn prop_classification_is_pure(r in 0.0f64..400.0, p in 0.0f64..400.0) {
                prop_assert_eq!(classify_sample(r, p), classify_sample(r, p));
            }
        }
    }
}
