//! Grid Renderer
//!
//! Draws the Clarke Error Grid into a [`Surface`]:
//! 1. identity diagonal (dotted)
//! 2. zone boundary segments
//! 3. optional zone fills
//! 4. sample scatter
//! 5. zone letters inside the axis limits
//! 6. title, axis labels and ticks
//!
//! All geometry comes from [`crate::geometry`]; counts come from the
//! classifier, never from a second copy of the zone predicates.

use tracing::{debug, warn};

use crate::classifier::ZoneTally;
use crate::error::Result;
use crate::geometry::{grid_ticks, zone_regions, Point, BOUNDARY_SEGMENTS, IDENTITY_LINE, ZONE_LABELS};
use crate::sample::SampleSet;
use crate::style::StyleConfig;
use crate::surface::{Annotations, Frame, Primitive, Stroke, Surface};

/// Renderer bound to one validated style
#[derive(Debug, Clone)]
pub struct GridRenderer {
    style: StyleConfig,
}

impl Default for GridRenderer {
    fn default() -> Self {
        Self {
            style: StyleConfig::default(),
        }
    }
}

impl GridRenderer {
    /// Validates the style up front so no drawing starts with a bad option.
    pub fn new(style: StyleConfig) -> Result<Self> {
        style.validate()?;
        Ok(Self { style })
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Empty surface sized to the style's limits
    pub fn new_surface(&self) -> Surface {
        Surface::with_frame(Frame {
            x_limits: self.style.x_limits,
            y_limits: self.style.y_limits,
            ..Frame::default()
        })
    }

    /// Grid and scatter on a fresh surface. `title` overrides the style title.
    pub fn render(&self, reference: &[f64], prediction: &[f64], title: Option<&str>) -> Result<Surface> {
        let mut surface = self.new_surface();
        self.render_onto(&mut surface, reference, prediction, title)?;
        Ok(surface)
    }

    /// Like [`render`](Self::render), also returning the zone tally.
    pub fn render_with_zones(
        &self,
        reference: &[f64],
        prediction: &[f64],
        title: Option<&str>,
    ) -> Result<(Surface, ZoneTally)> {
        let samples = SampleSet::new(reference, prediction)?;
        let mut surface = self.new_surface();
        self.draw(&mut surface, Some(&samples), title);
        Ok((surface, ZoneTally::from_samples(&samples)))
    }

    /// Draw onto a caller-owned surface. Inputs are validated before the
    /// surface is touched; on error it is left unchanged.
    pub fn render_onto(
        &self,
        surface: &mut Surface,
        reference: &[f64],
        prediction: &[f64],
        title: Option<&str>,
    ) -> Result<()> {
        let samples = SampleSet::new(reference, prediction)?;
        self.draw(surface, Some(&samples), title);
        Ok(())
    }

    /// Backdrop only: boundaries, fills, letters and annotations.
    pub fn draw_grid(&self, surface: &mut Surface) {
        self.draw(surface, None, None);
    }

    fn draw(&self, surface: &mut Surface, samples: Option<&SampleSet<'_>>, title: Option<&str>) {
        let style = &self.style;

        surface.push(Primitive::Line {
            segment: IDENTITY_LINE,
            color: style.grid_color,
            stroke: Stroke::Dotted,
        });
        for segment in BOUNDARY_SEGMENTS {
            surface.push(Primitive::Line {
                segment,
                color: style.grid_color,
                stroke: Stroke::Solid,
            });
        }

        if style.fill_zones {
            for region in zone_regions() {
                surface.push(Primitive::Polygon {
                    zone: region.zone,
                    color: style.zone_colors.for_zone(region.zone),
                    vertices: region.vertices,
                    opacity: style.fill_opacity,
                });
            }
        }

        if let Some(samples) = samples {
            debug!(samples = samples.len(), "drawing scatter");
            let mut skipped = 0usize;
            for sample in samples.iter() {
                if !sample.reference.is_finite() || !sample.prediction.is_finite() {
                    skipped += 1;
                    continue;
                }
                surface.push(Primitive::Marker {
                    at: Point::new(sample.reference, sample.prediction),
                    color: style.scatter_color,
                    opacity: style.scatter_opacity,
                    radius: style.marker_size,
                });
            }
            if skipped > 0 {
                warn!(skipped, "non-finite samples left out of the scatter");
            }
        }

        if !style.annotate {
            return;
        }

        for label in ZONE_LABELS
            .iter()
            .filter(|l| l.is_visible(style.x_limits, style.y_limits))
        {
            surface.push(Primitive::Text {
                at: label.at,
                text: label.zone.as_str().to_string(),
                font_size: style.font_size,
                color: style.grid_color,
            });
        }

        let within = |limits: (f64, f64)| -> Vec<f64> {
            grid_ticks()
                .into_iter()
                .filter(|t| *t >= limits.0 && *t <= limits.1)
                .collect()
        };
        surface.annotations = Some(Annotations {
            title: title.unwrap_or(&style.title).to_string(),
            x_label: style.x_label.clone(),
            y_label: style.y_label.clone(),
            x_ticks: within(style.x_limits),
            y_ticks: within(style.y_limits),
            font_size: style.font_size,
            color: style.grid_color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::tally;
    use crate::error::{GridError, StyleError};
    use crate::geometry::Segment;
    use crate::zone::Zone;
    use tracing_test::traced_test;

    fn sample_data() -> (Vec<f64>, Vec<f64>) {
        (
            vec![100.0, 100.0, 160.0, 250.0, 50.0, 300.0],
            vec![110.0, 125.0, 40.0, 100.0, 250.0, 310.0],
        )
    }

    #[test]
    fn test_draws_diagonal_and_boundaries() {
        let (r, p) = sample_data();
        let surface = GridRenderer::default().render(&r, &p, None).unwrap();

        let lines: Vec<(&Segment, Stroke)> = surface.lines().collect();
        assert_eq!(lines.len(), 13);
        assert_eq!(lines[0], (&IDENTITY_LINE, Stroke::Dotted));
        let solid: Vec<Segment> = lines[1..].iter().map(|(s, _)| **s).collect();
        assert_eq!(solid, BOUNDARY_SEGMENTS.to_vec());
        assert!(lines[1..].iter().all(|(_, s)| *s == Stroke::Solid));
    }

    #[test]
    fn test_one_marker_per_sample() {
        let (r, p) = sample_data();
        let surface = GridRenderer::default().render(&r, &p, None).unwrap();
        let markers: Vec<Point> = surface.markers().collect();
        assert_eq!(markers.len(), r.len());
        for (m, (x, y)) in markers.iter().zip(r.iter().zip(p.iter())) {
            assert_eq!(*m, Point::new(*x, *y));
        }
    }

    #[test]
    #[traced_test]
    fn test_non_finite_samples_are_not_plotted() {
        let (surface, zones) = GridRenderer::default()
            .render_with_zones(&[f64::NAN, 100.0, 120.0], &[100.0, f64::INFINITY, 125.0], None)
            .unwrap();
        assert_eq!(surface.markers().collect::<Vec<_>>(), vec![Point::new(120.0, 125.0)]);
        assert_eq!(zones.total(), 3);
        assert!(logs_contain("non-finite samples left out of the scatter"));
    }

    #[test]
    fn test_render_is_idempotent() {
        let (r, p) = sample_data();
        let renderer = GridRenderer::new(StyleConfig::filled()).unwrap();
        let first = renderer.render(&r, &p, Some("CGM")).unwrap();
        let second = renderer.render(&r, &p, Some("CGM")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_fills_are_optional() {
        let (r, p) = sample_data();
        let plain = GridRenderer::default().render(&r, &p, None).unwrap();
        assert_eq!(plain.polygons().count(), 0);

        let filled = GridRenderer::new(StyleConfig::filled())
            .unwrap()
            .render(&r, &p, None)
            .unwrap();
        let zones: Vec<Zone> = filled.polygons().map(|(z, _)| z).collect();
        assert_eq!(zones.len(), 9);
        for zone in Zone::ALL {
            assert!(zones.contains(&zone));
        }
        // Fills never change the scatter
        assert_eq!(
            plain.markers().collect::<Vec<_>>(),
            filled.markers().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_labels_follow_axis_limits() {
        let (r, p) = sample_data();
        let full = GridRenderer::default().render(&r, &p, None).unwrap();
        assert_eq!(full.texts().count(), 9);
        assert!(full.texts().any(|(_, at)| at == Point::new(370.0, 15.0)));

        let cropped = GridRenderer::new(StyleConfig::default().with_limits((0.0, 400.0), (50.0, 400.0)))
            .unwrap()
            .render(&r, &p, None)
            .unwrap();
        assert!(!cropped.texts().any(|(_, at)| at == Point::new(370.0, 15.0)));
        // A (30,15), C (160,15), E (370,15) drop out
        assert_eq!(cropped.texts().count(), 6);
        assert_eq!(cropped.frame.y_limits, (50.0, 400.0));
        let ann = cropped.annotations.as_ref().unwrap();
        assert_eq!(ann.y_ticks.first(), Some(&50.0));
        assert_eq!(ann.x_ticks.len(), 9);
    }

    #[test]
    fn test_title_override_and_defaults() {
        let (r, p) = sample_data();
        let renderer = GridRenderer::default();
        let s = renderer.render(&r, &p, None).unwrap();
        assert_eq!(s.annotations.as_ref().unwrap().title, "Clarke Error Grid");
        let s = renderer.render(&r, &p, Some("CGM")).unwrap();
        let ann = s.annotations.unwrap();
        assert_eq!(ann.title, "CGM");
        assert_eq!(ann.x_label, "Reference Concentration [mg/dl]");
    }

    #[test]
    fn test_plain_style_skips_annotations() {
        let (r, p) = sample_data();
        let s = GridRenderer::new(StyleConfig::plain()).unwrap().render(&r, &p, None).unwrap();
        assert!(s.annotations.is_none());
        assert_eq!(s.texts().count(), 0);
        assert_eq!(s.lines().count(), 13);
    }

    #[test]
    fn test_render_with_zones_matches_classifier() {
        let (r, p) = sample_data();
        let (surface, zones) = GridRenderer::default().render_with_zones(&r, &p, None).unwrap();
        assert_eq!(zones, tally(&r, &p).unwrap());
        assert_eq!(zones.counts(), [2, 1, 1, 1, 1]);
        assert_eq!(surface.markers().count(), 6);
    }

    #[test]
    fn test_length_mismatch_leaves_surface_untouched() {
        let renderer = GridRenderer::default();
        let mut surface = renderer.new_surface();
        let err = renderer
            .render_onto(&mut surface, &[1.0, 2.0, 3.0, 4.0, 5.0], &[1.0, 2.0, 3.0, 4.0], None)
            .unwrap_err();
        assert!(err.is_input_shape());
        assert!(surface.is_empty());
        assert!(surface.annotations.is_none());
    }

    #[test]
    fn test_invalid_style_is_rejected_up_front() {
        let style = StyleConfig {
            scatter_opacity: -0.1,
            ..StyleConfig::default()
        };
        let err = GridRenderer::new(style).unwrap_err();
        assert!(matches!(
            err,
            GridError::Style(StyleError::OpacityOutOfRange { field: "scatter_opacity", .. })
        ));
    }

    #[test]
    fn test_grid_only_backdrop() {
        let renderer = GridRenderer::new(StyleConfig::filled()).unwrap();
        let mut surface = renderer.new_surface();
        renderer.draw_grid(&mut surface);
        assert_eq!(surface.markers().count(), 0);
        assert_eq!(surface.lines().count(), 13);
        assert_eq!(surface.polygons().count(), 9);
        assert!(surface.annotations.is_some());
    }

    #[test]
    fn test_inputs_are_not_mutated() {
        let (r, p) = sample_data();
        let (r0, p0) = (r.clone(), p.clone());
        let _ = GridRenderer::default().render_with_zones(&r, &p, None).unwrap();
        assert_eq!(r, r0);
        assert_eq!(p, p0);
    }
}
