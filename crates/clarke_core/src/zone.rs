//! Clarke Error Grid zones
//!
//! Five clinical-agreement categories over the (reference, prediction) plane.
//! Zone A and B are clinically acceptable; C, D and E are clinical errors.

use serde::{Deserialize, Serialize};

/// Zone identifier, ordered A..E
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Zone {
    /// Within 20% of the reference, or both values hypoglycemic (<= 70 mg/dl)
    A,
    /// Outside 20% but leads to benign or no treatment
    B,
    /// Overcorrects acceptable glucose levels
    C,
    /// Fails to detect and treat out-of-range glucose
    D,
    /// Erroneous treatment: prediction opposite to the actual level
    E,
}

impl Zone {
    /// All zones in tally order
    pub const ALL: [Zone; 5] = [Zone::A, Zone::B, Zone::C, Zone::D, Zone::E];

    /// Get zone index (0-4)
    pub fn index(&self) -> usize {
        match self {
            Zone::A => 0,
            Zone::B => 1,
            Zone::C => 2,
            Zone::D => 3,
            Zone::E => 4,
        }
    }

    /// Create from index
    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    /// Zone letter as drawn on the grid
    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::A => "A",
            Zone::B => "B",
            Zone::C => "C",
            Zone::D => "D",
            Zone::E => "E",
        }
    }

    /// Parse a zone letter (case-insensitive)
    pub fn from_letter(s: &str) -> Option<Self> {
        match s.trim() {
            "A" | "a" => Some(Zone::A),
            "B" | "b" => Some(Zone::B),
            "C" | "c" => Some(Zone::C),
            "D" | "d" => Some(Zone::D),
            "E" | "e" => Some(Zone::E),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Zone::A => "clinically accurate",
            Zone::B => "clinically acceptable",
            Zone::C => "overcorrecting",
            Zone::D => "failure to detect",
            Zone::E => "erroneous treatment",
        }
    }

    /// C, D and E lead to clinically wrong treatment decisions.
    pub fn is_clinical_error(&self) -> bool {
        matches!(self, Zone::C | Zone::D | Zone::E)
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Zone {}", self.as_str())
    }
}
