//! SVG export for rendered grids.
//!
//! Draws a [`Surface`] through plotters' SVG backend: the frame limits become
//! the cartesian ranges, annotations become the caption and mesh, and every
//! primitive is drawn in order on the plotting area. With an equal-aspect
//! frame the chart area is inset so one data unit spans the same number of
//! pixels on both axes.

use std::ops::Range;

use plotters::chart::{ChartBuilder, ChartContext};
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::drawing::{DrawingArea, IntoDrawingArea};
use plotters::element::{Circle, PathElement, Polygon, Text};
use plotters::prelude::{DrawingBackend, SVGBackend};
use plotters::series::DashedLineSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{Color as _, IntoFont, RGBColor, TextStyle};

use crate::error::{GridError, Result};
use crate::style::Color;
use crate::surface::{Frame, Primitive, Stroke, Surface};

type GridChart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Configuration for SVG export.
#[derive(Debug, Clone)]
pub struct SvgExporter {
    /// Document width in pixels.
    pub width: u32,
    /// Document height in pixels.
    pub height: u32,
    /// Outer margin around the chart.
    pub margin: u32,
    /// Height reserved below the plot for x tick labels and description.
    pub x_label_area: u32,
    /// Width reserved left of the plot for y tick labels and description.
    pub y_label_area: u32,
    pub font_family: String,
    /// Stroke width of grid lines in pixels.
    pub line_width: u32,
}

impl Default for SvgExporter {
    fn default() -> Self {
        Self {
            width: 720,
            height: 720,
            margin: 20,
            x_label_area: 60,
            y_label_area: 70,
            font_family: "sans-serif".into(),
            line_width: 2,
        }
    }
}

/// Extra space taken off the chart area, in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Inset {
    top: u32,
    bottom: u32,
    left: u32,
    right: u32,
}

impl Inset {
    fn apply<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> DrawingArea<DB, Shift> {
        root.margin(self.top, self.bottom, self.left, self.right)
    }
}

impl SvgExporter {
    /// Export a surface to an SVG string.
    pub fn export(&self, surface: &Surface) -> Result<String> {
        let inset = self.aspect_inset(surface)?;
        let mut out = String::new();
        {
            let root = SVGBackend::with_string(&mut out, (self.width, self.height)).into_drawing_area();
            root.fill(&rgb(surface.frame.background)).map_err(export_error)?;

            let area = inset.apply(&root);
            let mut chart = self.build_chart(&area, surface)?;
            self.draw_mesh(&mut chart, surface)?;
            for primitive in surface.primitives() {
                self.draw_primitive(&mut chart, &surface.frame, primitive)?;
            }
            root.present().map_err(export_error)?;
        }
        Ok(out)
    }

    /// Inset that gives both axes the same pixels per data unit.
    fn aspect_inset(&self, surface: &Surface) -> Result<Inset> {
        let frame = &surface.frame;
        if !frame.equal_aspect {
            return Ok(Inset::default());
        }

        let (x_px, y_px) = self.plot_pixels(surface, Inset::default())?;
        let (w, h) = (span(&x_px), span(&y_px));
        let x_span = frame.x_limits.1 - frame.x_limits.0;
        let y_span = frame.y_limits.1 - frame.y_limits.0;
        let scale = (w / x_span).min(h / y_span);

        let extra_w = (w - x_span * scale).round().max(0.0) as u32;
        let extra_h = (h - y_span * scale).round().max(0.0) as u32;
        Ok(Inset {
            top: extra_h / 2,
            bottom: extra_h - extra_h / 2,
            left: extra_w / 2,
            right: extra_w - extra_w / 2,
        })
    }

    /// Pixel ranges of the plotting area, laid out on a scratch document.
    fn plot_pixels(&self, surface: &Surface, inset: Inset) -> Result<(Range<i32>, Range<i32>)> {
        let mut scratch = String::new();
        let root = SVGBackend::with_string(&mut scratch, (self.width, self.height)).into_drawing_area();
        let area = inset.apply(&root);
        let chart = self.build_chart(&area, surface)?;
        let ranges = chart.plotting_area().get_pixel_range();
        Ok(ranges)
    }

    fn build_chart<'a, DB: DrawingBackend>(
        &self,
        area: &'a DrawingArea<DB, Shift>,
        surface: &Surface,
    ) -> Result<GridChart<'a, DB>> {
        let frame = &surface.frame;
        let mut builder = ChartBuilder::on(area);
        builder.margin(self.margin);
        if let Some(ann) = &surface.annotations {
            builder
                .caption(&ann.title, self.text_style(ann.font_size, ann.color))
                .x_label_area_size(self.x_label_area)
                .y_label_area_size(self.y_label_area);
        }
        builder
            .build_cartesian_2d(
                frame.x_limits.0..frame.x_limits.1,
                frame.y_limits.0..frame.y_limits.1,
            )
            .map_err(export_error)
    }

    fn draw_mesh<DB: DrawingBackend>(&self, chart: &mut GridChart<'_, DB>, surface: &Surface) -> Result<()> {
        let Some(ann) = &surface.annotations else {
            return Ok(());
        };

        chart
            .configure_mesh()
            .disable_mesh()
            .x_labels(ann.x_ticks.len())
            .y_labels(ann.y_ticks.len())
            .x_label_formatter(&fmt_tick)
            .y_label_formatter(&fmt_tick)
            .axis_style(rgb(ann.color).stroke_width(1))
            .label_style(self.text_style(ann.font_size * 0.8, ann.color))
            .axis_desc_style(self.text_style(ann.font_size, ann.color))
            .x_desc(ann.x_label.as_str())
            .y_desc(ann.y_label.as_str())
            .draw()
            .map_err(export_error)
    }

    fn draw_primitive<DB: DrawingBackend>(
        &self,
        chart: &mut GridChart<'_, DB>,
        frame: &Frame,
        primitive: &Primitive,
    ) -> Result<()> {
        match primitive {
            Primitive::Line {
                segment,
                color,
                stroke,
            } => {
                let Some(visible) = frame.clip_segment(segment) else {
                    return Ok(());
                };
                let points = vec![(visible.from.x, visible.from.y), (visible.to.x, visible.to.y)];
                let style = rgb(*color).stroke_width(self.line_width);
                match stroke {
                    Stroke::Solid => chart.draw_series(std::iter::once(PathElement::new(points, style))),
                    Stroke::Dotted => chart.draw_series(DashedLineSeries::new(points, 2, 4, style)),
                }
                .map_err(export_error)?;
            }
            Primitive::Polygon {
                vertices,
                color,
                opacity,
                ..
            } => {
                let visible = frame.clip_polygon(vertices);
                if visible.len() < 3 {
                    return Ok(());
                }
                let points = visible.iter().map(|p| (p.x, p.y)).collect::<Vec<_>>();
                chart
                    .draw_series(std::iter::once(Polygon::new(
                        points,
                        rgb(*color).mix(*opacity).filled(),
                    )))
                    .map_err(export_error)?;
            }
            Primitive::Marker {
                at,
                color,
                opacity,
                radius,
            } => {
                if !frame.contains(*at) {
                    return Ok(());
                }
                let radius = radius.round().max(1.0) as u32;
                chart
                    .draw_series(std::iter::once(Circle::new(
                        (at.x, at.y),
                        radius,
                        rgb(*color).mix(*opacity).filled(),
                    )))
                    .map_err(export_error)?;
            }
            Primitive::Text {
                at,
                text,
                font_size,
                color,
            } => {
                if !frame.contains(*at) {
                    return Ok(());
                }
                let style = self
                    .text_style(*font_size, *color)
                    .pos(Pos::new(HPos::Left, VPos::Bottom));
                chart
                    .draw_series(std::iter::once(Text::new(text.clone(), (at.x, at.y), style)))
                    .map_err(export_error)?;
            }
        }
        Ok(())
    }

    fn text_style(&self, size: f64, color: Color) -> TextStyle<'_> {
        (self.font_family.as_str(), size).into_font().color(&rgb(color))
    }
}

fn rgb(color: Color) -> RGBColor {
    RGBColor(color.r, color.g, color.b)
}

fn span(range: &Range<i32>) -> f64 {
    f64::from(range.end - range.start)
}

fn fmt_tick(v: &f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", *v as i64)
    } else {
        format!("{:.1}", v)
    }
}

fn export_error<E: std::fmt::Display>(err: E) -> GridError {
    GridError::Export(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::render::GridRenderer;
    use crate::style::StyleConfig;

    fn rendered(style: StyleConfig, title: Option<&str>) -> Surface {
        GridRenderer::new(style)
            .unwrap()
            .render(&[100.0, 250.0], &[110.0, 100.0], title)
            .unwrap()
    }

    #[test]
    fn test_document_structure() {
        let svg = SvgExporter::default()
            .export(&rendered(StyleConfig::default(), None))
            .unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<circle").count(), 2);
        assert_eq!(svg.matches("<polygon").count(), 0);
        assert!(svg.contains("Clarke Error Grid"));
        assert!(svg.contains("Reference Concentration [mg/dl]"));
    }

    #[test]
    fn test_export_is_deterministic() {
        let exporter = SvgExporter::default();
        let a = exporter.export(&rendered(StyleConfig::filled(), Some("CGM"))).unwrap();
        let b = exporter.export(&rendered(StyleConfig::filled(), Some("CGM"))).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.matches("<polygon").count(), 9);
    }

    #[test]
    fn test_text_is_escaped() {
        let svg = SvgExporter::default()
            .export(&rendered(StyleConfig::default(), Some("A<B")))
            .unwrap();
        assert!(svg.contains("A&lt;B"));
        assert!(!svg.contains("A<B"));
    }

    #[test]
    fn test_equal_aspect_plot_area() {
        let exporter = SvgExporter::default();
        for (x_limits, y_limits) in [((0.0, 400.0), (0.0, 400.0)), ((0.0, 400.0), (50.0, 400.0))] {
            let surface = rendered(StyleConfig::default().with_limits(x_limits, y_limits), None);
            let inset = exporter.aspect_inset(&surface).unwrap();
            let (x_px, y_px) = exporter.plot_pixels(&surface, inset).unwrap();
            let x_scale = span(&x_px) / (x_limits.1 - x_limits.0);
            let y_scale = span(&y_px) / (y_limits.1 - y_limits.0);
            // Within one pixel over the whole axis
            assert!((x_scale - y_scale).abs() * 400.0 <= 1.5, "{} vs {}", x_scale, y_scale);
        }
    }

    #[test]
    fn test_points_outside_frame_are_skipped() {
        let surface = rendered(StyleConfig::default().with_limits((0.0, 400.0), (105.0, 400.0)), None);
        let svg = SvgExporter::default().export(&surface).unwrap();
        // (250, 100) falls below the cropped frame
        assert_eq!(svg.matches("<circle").count(), 1);
    }

    #[test]
    fn test_non_finite_markers_are_never_written() {
        let mut surface = GridRenderer::default().new_surface();
        for at in [Point::new(f64::NAN, 100.0), Point::new(100.0, f64::NEG_INFINITY)] {
            surface.push(Primitive::Marker {
                at,
                color: Color::BLACK,
                opacity: 1.0,
                radius: 3.0,
            });
        }
        let svg = SvgExporter::default().export(&surface).unwrap();
        assert_eq!(svg.matches("<circle").count(), 0);
        assert!(!svg.contains("NaN"));
        assert!(!svg.contains("inf"));
    }

    #[test]
    fn test_plain_surface_has_no_text() {
        let svg = SvgExporter::default()
            .export(&rendered(StyleConfig::plain(), None))
            .unwrap();
        assert!(!svg.contains("Clarke Error Grid"));
        assert!(!svg.contains("<text"));
        assert_eq!(svg.matches("<circle").count(), 2);
    }

    #[test]
    fn test_tick_formatting() {
        assert_eq!(fmt_tick(&350.0), "350");
        assert_eq!(fmt_tick(&12.5), "12.5");
    }
}
