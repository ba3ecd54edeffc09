//! Serializable zone summary for downstream reporting

use serde::{Deserialize, Serialize};

use crate::classifier::ZoneTally;
use crate::zone::Zone;

/// One zone's share of the sample set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneSummary {
    pub zone: Zone,
    pub count: u64,
    /// Rounded percentage of the total
    pub percentage: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneReport {
    pub total: u64,
    pub zones: Vec<ZoneSummary>,
}

impl ZoneReport {
    pub fn from_tally(tally: &ZoneTally) -> Self {
        let percentages = tally.percentages();
        Self {
            total: tally.total(),
            zones: tally
                .iter()
                .map(|(zone, count)| ZoneSummary {
                    zone,
                    count,
                    percentage: percentages[zone.index()],
                })
                .collect(),
        }
    }

    /// Samples in the clinical error zones C, D and E
    pub fn clinical_error_count(&self) -> u64 {
        self.zones
            .iter()
            .filter(|z| z.zone.is_clinical_error())
            .map(|z| z.count)
            .sum()
    }
}
