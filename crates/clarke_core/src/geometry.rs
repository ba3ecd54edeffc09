//! Boundary Geometry (SSOT)
//!
//! Every threshold of the zone predicates lives here. The classifier tests
//! samples against these constants and the renderer draws segments and
//! regions built from the same values, so a plotted boundary is always the
//! decision boundary used for counting.
//!
//! Coordinates are (reference, prediction) in mg/dl; `x` is reference.

use serde::{Deserialize, Serialize};

use crate::zone::Zone;

/// Hypoglycemia threshold (mg/dl)
pub const HYPO: f64 = 70.0;
/// Hyperglycemia threshold (mg/dl)
pub const HYPER: f64 = 180.0;
/// Upper edge of the fixed grid frame (mg/dl)
pub const GRID_MAX: f64 = 400.0;

/// Zone A band: prediction within 20% of reference
pub const A_LOWER_RATIO: f64 = 0.8;
pub const A_UPPER_RATIO: f64 = 1.2;

/// Upper zone C: prediction at least reference + 110, for 70 <= reference <= 290
pub const C_UPPER_OFFSET: f64 = 110.0;
pub const C_UPPER_MAX_REFERENCE: f64 = GRID_MAX - C_UPPER_OFFSET;

/// Lower zone C: prediction <= 1.4 * reference - 182, for 130 <= reference <= 180
pub const C_LOWER_SLOPE: f64 = 7.0 / 5.0;
pub const C_LOWER_INTERCEPT: f64 = -182.0;
pub const C_LOWER_MIN_REFERENCE: f64 = 130.0;

/// Right zone D starts at this reference value
pub const D_RIGHT_MIN_REFERENCE: f64 = 240.0;
/// Left zone D ends where the 120% line crosses prediction = 70
pub const D_LEFT_MAX_REFERENCE: f64 = 175.0 / 3.0;

/// Point in (reference, prediction) space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Straight line between two points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

impl Segment {
    pub const fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            from: Point::new(x0, y0),
            to: Point::new(x1, y1),
        }
    }

    pub fn midpoint(&self) -> Point {
        Point::new((self.from.x + self.to.x) / 2.0, (self.from.y + self.to.y) / 2.0)
    }
}

/// Theoretical 45° line, reference == prediction
pub const IDENTITY_LINE: Segment = Segment::new(0.0, 0.0, GRID_MAX, GRID_MAX);

/// Zone-separating segments, in drawing order.
///
/// The upper 20% ray ends at 400/1.2 rather than the rounded 320, and the
/// lower one starts at 56 (80% of 70) rather than 175/3, so both stay exactly
/// on the A-band edges used by the classifier.
pub const BOUNDARY_SEGMENTS: [Segment; 12] = [
    // D left / A: prediction = 70 up to the 120% line
    Segment::new(0.0, HYPO, D_LEFT_MAX_REFERENCE, HYPO),
    // A upper edge: prediction = 1.2 * reference
    Segment::new(D_LEFT_MAX_REFERENCE, HYPO, GRID_MAX / A_UPPER_RATIO, GRID_MAX),
    // D left / B, E upper / C upper
    Segment::new(HYPO, HYPO * A_UPPER_RATIO, HYPO, GRID_MAX),
    // D left / E upper
    Segment::new(0.0, HYPER, HYPO, HYPER),
    // C upper / B: prediction = reference + 110
    Segment::new(HYPO, HYPER, C_UPPER_MAX_REFERENCE, GRID_MAX),
    // A / B below the hypoglycemic corner
    Segment::new(HYPO, 0.0, HYPO, HYPO * A_LOWER_RATIO),
    // A lower edge: prediction = 0.8 * reference
    Segment::new(HYPO, HYPO * A_LOWER_RATIO, GRID_MAX, GRID_MAX * A_LOWER_RATIO),
    // C lower / E lower
    Segment::new(HYPER, 0.0, HYPER, HYPO),
    // E lower / B, D right
    Segment::new(HYPER, HYPO, GRID_MAX, HYPO),
    // B / D right
    Segment::new(D_RIGHT_MIN_REFERENCE, HYPO, D_RIGHT_MIN_REFERENCE, HYPER),
    // D right / B
    Segment::new(D_RIGHT_MIN_REFERENCE, HYPER, GRID_MAX, HYPER),
    // B / C lower: prediction = 1.4 * reference - 182
    Segment::new(C_LOWER_MIN_REFERENCE, 0.0, HYPER, HYPO),
];

/// Closed polygon covering one connected area of a zone inside the frame
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneRegion {
    pub zone: Zone,
    pub vertices: Vec<Point>,
}

impl ZoneRegion {
    fn new(zone: Zone, vertices: &[(f64, f64)]) -> Self {
        Self {
            zone,
            vertices: vertices.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        }
    }

    /// Even-odd ray cast. Points exactly on an edge may land on either side.
    pub fn contains(&self, p: Point) -> bool {
        let n = self.vertices.len();
        let Some(mut j) = n.checked_sub(1) else {
            return false;
        };
        let mut inside = false;
        for i in 0..n {
            let (a, b) = (self.vertices[i], self.vertices[j]);
            if (a.y > p.y) != (b.y > p.y) {
                let cross_x = a.x + (p.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if p.x < cross_x {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

/// The nine connected zone areas of the [0, 400]² frame.
pub fn zone_regions() -> Vec<ZoneRegion> {
    let upper_a_end = GRID_MAX / A_UPPER_RATIO;
    let a_top_at_hypo = HYPO * A_UPPER_RATIO;
    let a_bottom_at_hypo = HYPO * A_LOWER_RATIO;
    let a_bottom_at_max = GRID_MAX * A_LOWER_RATIO;

    vec![
        ZoneRegion::new(
            Zone::A,
            &[
                (0.0, 0.0),
                (HYPO, 0.0),
                (HYPO, a_bottom_at_hypo),
                (GRID_MAX, a_bottom_at_max),
                (GRID_MAX, GRID_MAX),
                (upper_a_end, GRID_MAX),
                (D_LEFT_MAX_REFERENCE, HYPO),
                (0.0, HYPO),
            ],
        ),
        ZoneRegion::new(
            Zone::B,
            &[
                (HYPO, a_top_at_hypo),
                (upper_a_end, GRID_MAX),
                (C_UPPER_MAX_REFERENCE, GRID_MAX),
                (HYPO, HYPER),
            ],
        ),
        ZoneRegion::new(
            Zone::B,
            &[
                (HYPO, 0.0),
                (C_LOWER_MIN_REFERENCE, 0.0),
                (HYPER, HYPO),
                (D_RIGHT_MIN_REFERENCE, HYPO),
                (D_RIGHT_MIN_REFERENCE, HYPER),
                (GRID_MAX, HYPER),
                (GRID_MAX, a_bottom_at_max),
                (HYPO, a_bottom_at_hypo),
            ],
        ),
        ZoneRegion::new(
            Zone::C,
            &[(HYPO, HYPER), (C_UPPER_MAX_REFERENCE, GRID_MAX), (HYPO, GRID_MAX)],
        ),
        ZoneRegion::new(
            Zone::C,
            &[(C_LOWER_MIN_REFERENCE, 0.0), (HYPER, 0.0), (HYPER, HYPO)],
        ),
        ZoneRegion::new(
            Zone::D,
            &[
                (0.0, HYPO),
                (D_LEFT_MAX_REFERENCE, HYPO),
                (HYPO, a_top_at_hypo),
                (HYPO, HYPER),
                (0.0, HYPER),
            ],
        ),
        ZoneRegion::new(
            Zone::D,
            &[
                (D_RIGHT_MIN_REFERENCE, HYPO),
                (GRID_MAX, HYPO),
                (GRID_MAX, HYPER),
                (D_RIGHT_MIN_REFERENCE, HYPER),
            ],
        ),
        ZoneRegion::new(
            Zone::E,
            &[(0.0, HYPER), (HYPO, HYPER), (HYPO, GRID_MAX), (0.0, GRID_MAX)],
        ),
        ZoneRegion::new(
            Zone::E,
            &[(HYPER, 0.0), (GRID_MAX, 0.0), (GRID_MAX, HYPO), (HYPER, HYPO)],
        ),
    ]
}

/// Zone letter anchored at a fixed grid position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneLabel {
    pub zone: Zone,
    pub at: Point,
}

impl ZoneLabel {
    const fn new(zone: Zone, x: f64, y: f64) -> Self {
        Self {
            zone,
            at: Point::new(x, y),
        }
    }

    /// Strictly inside both axis limits
    pub fn is_visible(&self, x_limits: (f64, f64), y_limits: (f64, f64)) -> bool {
        self.at.x > x_limits.0
            && self.at.x < x_limits.1
            && self.at.y > y_limits.0
            && self.at.y < y_limits.1
    }
}

/// Canonical label anchors, two per zone except A.
///
/// The right-hand B sits at (370, 260); (370, 370) would land inside the
/// zone A band.
pub const ZONE_LABELS: [ZoneLabel; 9] = [
    ZoneLabel::new(Zone::A, 30.0, 15.0),
    ZoneLabel::new(Zone::B, 370.0, 260.0),
    ZoneLabel::new(Zone::B, 280.0, 370.0),
    ZoneLabel::new(Zone::C, 160.0, 370.0),
    ZoneLabel::new(Zone::C, 160.0, 15.0),
    ZoneLabel::new(Zone::D, 30.0, 140.0),
    ZoneLabel::new(Zone::D, 370.0, 120.0),
    ZoneLabel::new(Zone::E, 30.0, 370.0),
    ZoneLabel::new(Zone::E, 370.0, 15.0),
];

/// Tick positions {0, 50, ..., 400}
pub fn grid_ticks() -> Vec<f64> {
    (0..=8).map(|i| f64::from(i) * 50.0).collect()
}
