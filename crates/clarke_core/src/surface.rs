//! Drawable Surface
//!
//! Retained vector scene in data coordinates. The renderer fills it, an
//! exporter turns it into a document. Owning the scene explicitly (instead of
//! drawing into ambient "current figure" state) makes renders comparable:
//! two surfaces are equal exactly when they hold the same primitives.

use crate::geometry::{Point, Segment, GRID_MAX};
use crate::style::Color;
use crate::zone::Zone;

/// Line dash pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stroke {
    Solid,
    Dotted,
}

/// One drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Line {
        segment: Segment,
        color: Color,
        stroke: Stroke,
    },
    /// Filled zone region
    Polygon {
        zone: Zone,
        vertices: Vec<Point>,
        color: Color,
        opacity: f64,
    },
    /// Sample marker
    Marker {
        at: Point,
        color: Color,
        opacity: f64,
        radius: f64,
    },
    /// Zone letter anchored at its lower-left corner
    Text {
        at: Point,
        text: String,
        font_size: f64,
        color: Color,
    },
}

/// Visible data window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x_limits: (f64, f64),
    pub y_limits: (f64, f64),
    /// One data unit spans the same length on both axes
    pub equal_aspect: bool,
    pub background: Color,
}

impl Default for Frame {
    fn default() -> Self {
        Self {
            x_limits: (0.0, GRID_MAX),
            y_limits: (0.0, GRID_MAX),
            equal_aspect: true,
            background: Color::WHITE,
        }
    }
}

impl Frame {
    /// Inclusive on every edge; NaN coordinates are never inside.
    pub fn contains(&self, p: Point) -> bool {
        let (x0, x1) = self.x_limits;
        let (y0, y1) = self.y_limits;
        p.x >= x0 && p.x <= x1 && p.y >= y0 && p.y <= y1
    }

    /// Part of `segment` inside the frame (Liang-Barsky), `None` if it misses.
    pub fn clip_segment(&self, segment: &Segment) -> Option<Segment> {
        let (x0, x1) = self.x_limits;
        let (y0, y1) = self.y_limits;
        let (dx, dy) = (segment.to.x - segment.from.x, segment.to.y - segment.from.y);
        let mut t_in = 0.0f64;
        let mut t_out = 1.0f64;

        for (p, q) in [
            (-dx, segment.from.x - x0),
            (dx, x1 - segment.from.x),
            (-dy, segment.from.y - y0),
            (dy, y1 - segment.from.y),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let t = q / p;
            if p < 0.0 {
                t_in = t_in.max(t);
            } else {
                t_out = t_out.min(t);
            }
        }

        if t_in > t_out {
            return None;
        }
        let at = |t: f64| Point::new(segment.from.x + t * dx, segment.from.y + t * dy);
        let (from, to) = (at(t_in), at(t_out));
        Some(Segment { from, to })
    }

    /// Polygon cut to the frame (Sutherland-Hodgman). Empty if nothing is left.
    pub fn clip_polygon(&self, vertices: &[Point]) -> Vec<Point> {
        let (x0, x1) = self.x_limits;
        let (y0, y1) = self.y_limits;
        let edges: [(fn(Point, f64) -> bool, fn(Point, Point, f64) -> Point, f64); 4] = [
            (|p, x| p.x >= x, cross_vertical, x0),
            (|p, x| p.x <= x, cross_vertical, x1),
            (|p, y| p.y >= y, cross_horizontal, y0),
            (|p, y| p.y <= y, cross_horizontal, y1),
        ];

        let mut out = vertices.to_vec();
        for (inside, cross, bound) in edges {
            let input = std::mem::take(&mut out);
            let Some(&last) = input.last() else {
                break;
            };
            let mut prev = last;
            for &cur in &input {
                match (inside(cur, bound), inside(prev, bound)) {
                    (true, true) => out.push(cur),
                    (true, false) => {
                        out.push(cross(prev, cur, bound));
                        out.push(cur);
                    }
                    (false, true) => out.push(cross(prev, cur, bound)),
                    (false, false) => {}
                }
                prev = cur;
            }
        }
        out
    }
}

fn cross_vertical(a: Point, b: Point, x: f64) -> Point {
    let t = (x - a.x) / (b.x - a.x);
    Point::new(x, a.y + t * (b.y - a.y))
}

fn cross_horizontal(a: Point, b: Point, y: f64) -> Point {
    let t = (y - a.y) / (b.y - a.y);
    Point::new(a.x + t * (b.x - a.x), y)
}

/// Title, axis labels and ticks
#[derive(Debug, Clone, PartialEq)]
pub struct Annotations {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_ticks: Vec<f64>,
    pub y_ticks: Vec<f64>,
    pub font_size: f64,
    pub color: Color,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Surface {
    pub frame: Frame,
    pub annotations: Option<Annotations>,
    primitives: Vec<Primitive>,
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_frame(frame: Frame) -> Self {
        Self {
            frame,
            ..Self::default()
        }
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Remove all primitives, keep frame and annotations.
    pub fn clear(&mut self) {
        self.primitives.clear();
    }

    pub fn lines(&self) -> impl Iterator<Item = (&Segment, Stroke)> + '_ {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Line { segment, stroke, .. } => Some((segment, *stroke)),
            _ => None,
        })
    }

    pub fn markers(&self) -> impl Iterator<Item = Point> + '_ {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Marker { at, .. } => Some(*at),
            _ => None,
        })
    }

    pub fn polygons(&self) -> impl Iterator<Item = (Zone, &[Point])> + '_ {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Polygon { zone, vertices, .. } => Some((*zone, vertices.as_slice())),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = (&str, Point)> + '_ {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Text { text, at, .. } => Some((text.as_str(), *at)),
            _ => None,
        })
    }
}
