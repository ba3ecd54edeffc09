//! # clarke_core - Clarke Error Grid Analysis
//!
//! Classifies paired (reference, prediction) glucose values into the five
//! Clarke Error Grid zones and renders the grid.
//!
//! ## Features
//! - Single zone classifier shared by counting and plotting
//! - Boundary geometry defined once, reused for lines, fills and labels
//! - Explicit drawable [`Surface`] with SVG export
//! - Typed, validated [`StyleConfig`] (JSON or YAML)
//!
//! ```rust
//! use clarke_core::{calculate_zones, GridRenderer, SvgExporter, TallyMode};
//!
//! let reference = [100.0, 160.0, 250.0];
//! let prediction = [110.0, 40.0, 100.0];
//!
//! let counts = calculate_zones(&reference, &prediction, TallyMode::Counts).unwrap();
//! assert_eq!(counts, [1, 0, 1, 1, 0]);
//!
//! let surface = GridRenderer::default().render(&reference, &prediction, Some("CGM")).unwrap();
//! let svg = SvgExporter::default().export(&surface).unwrap();
//! assert!(svg.contains("CGM"));
//! ```

pub mod classifier;
pub mod error;
pub mod geometry;
pub mod render;
pub mod report;
pub mod sample;
pub mod style;
pub mod surface;
pub mod svg;
pub mod zone;

pub use classifier::{calculate_zones, classify_sample, tally, TallyMode, ZoneTally};
pub use error::{GridError, Result, StyleError};
pub use geometry::{Point, Segment, ZoneLabel, ZoneRegion};
pub use render::GridRenderer;
pub use report::{ZoneReport, ZoneSummary};
pub use sample::{RangeWarning, Sample, SampleSet};
pub use style::{Color, StyleConfig, ZoneColors};
pub use surface::{Annotations, Frame, Primitive, Stroke, Surface};
pub use svg::SvgExporter;
pub use zone::Zone;
