//! Visual inspection markers and the drawing model that produces them.
//!
//! Two fixed 200×200 canvases: the `image` canvas takes axis-aligned
//! rectangles, the `lens` canvas takes circles. A drag becomes a pending shape
//! on pointer-up only when it exceeds [`MIN_MARKER_SIZE`]; committing the
//! pending shape with a severity and note appends a marker.

use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use std::collections::HashSet;
use utoipa::ToSchema;

use crate::errors::FieldError;

/// Side of both square canvases, in drawing units.
pub const CANVAS_SIZE: f64 = 200.0;

/// Shapes must be strictly larger than this (both sides, or the radius).
pub const MIN_MARKER_SIZE: f64 = 2.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    #[default]
    Attention,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Canvas {
    /// Rectangular image area.
    Image,
    /// Circular lens area.
    Lens,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    fn within_canvas(&self) -> bool {
        (0.0..=CANVAS_SIZE).contains(&self.x) && (0.0..=CANVAS_SIZE).contains(&self.y)
    }

    fn clamped(&self) -> Point {
        Point::new(self.x.clamp(0.0, CANVAS_SIZE), self.y.clamp(0.0, CANVAS_SIZE))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum Shape {
    Rect { x: f64, y: f64, width: f64, height: f64 },
    Circle { cx: f64, cy: f64, r: f64 },
}

impl Shape {
    /// Zero-sized shape anchored at the pointer-down position.
    fn seed(canvas: Canvas, origin: Point) -> Self {
        match canvas {
            Canvas::Image => Shape::Rect {
                x: origin.x,
                y: origin.y,
                width: 0.0,
                height: 0.0,
            },
            Canvas::Lens => Shape::Circle {
                cx: origin.x,
                cy: origin.y,
                r: 0.0,
            },
        }
    }

    /// Shape spanned by dragging from `origin` to `to` on `canvas`.
    pub fn from_drag(canvas: Canvas, origin: Point, to: Point) -> Self {
        match canvas {
            Canvas::Image => Shape::Rect {
                x: origin.x.min(to.x),
                y: origin.y.min(to.y),
                width: (to.x - origin.x).abs(),
                height: (to.y - origin.y).abs(),
            },
            Canvas::Lens => Shape::Circle {
                cx: origin.x,
                cy: origin.y,
                r: (to.x - origin.x).hypot(to.y - origin.y),
            },
        }
    }

    pub fn canvas(&self) -> Canvas {
        match self {
            Shape::Rect { .. } => Canvas::Image,
            Shape::Circle { .. } => Canvas::Lens,
        }
    }

    pub fn exceeds_minimum(&self) -> bool {
        match *self {
            Shape::Rect { width, height, .. } => width > MIN_MARKER_SIZE && height > MIN_MARKER_SIZE,
            Shape::Circle { r, .. } => r > MIN_MARKER_SIZE,
        }
    }

    /// Whether a drag on the canvas could have produced this shape. Circles
    /// only need their centre inside; the radius may reach past the edge.
    pub fn fits_canvas(&self) -> bool {
        match *self {
            Shape::Rect { x, y, width, height } => {
                let corner = Point::new(x, y);
                let far = Point::new(x + width, y + height);
                corner.is_finite()
                    && far.is_finite()
                    && width >= 0.0
                    && height >= 0.0
                    && corner.within_canvas()
                    && far.within_canvas()
            }
            Shape::Circle { cx, cy, r } => {
                let centre = Point::new(cx, cy);
                centre.is_finite()
                    && centre.within_canvas()
                    && r.is_finite()
                    && r <= CANVAS_SIZE * std::f64::consts::SQRT_2
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Marker {
    pub id: i64,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub note: String,
    #[serde(flatten)]
    pub shape: Shape,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult, ToSchema)]
pub struct VisualInspection {
    #[serde(default)]
    pub general_observations: String,
    #[serde(default)]
    pub markers: Vec<Marker>,
}

impl VisualInspection {
    pub fn markers_on(&self, canvas: Canvas) -> impl Iterator<Item = &Marker> {
        self.markers.iter().filter(move |m| m.shape.canvas() == canvas)
    }

    pub fn is_empty(&self) -> bool {
        self.general_observations.trim().is_empty() && self.markers.is_empty()
    }

    /// Checks markers submitted with a whole order against the drawing
    /// rules: positive unique ids, shapes inside the canvas and above the
    /// minimum size.
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();
        for (index, marker) in self.markers.iter().enumerate() {
            let field = |name: &str| format!("visual_inspection.markers.{}.{}", index, name);
            if marker.id <= 0 || marker.id == i64::MAX {
                errors.push(FieldError::new(field("id"), "Identificador de marcação inválido."));
            } else if !seen.insert(marker.id) {
                errors.push(FieldError::new(field("id"), "Identificador de marcação repetido."));
            }
            if !marker.shape.fits_canvas() {
                errors.push(FieldError::new(field("shape"), "A marcação está fora da área de desenho."));
            } else if !marker.shape.exceeds_minimum() {
                errors.push(FieldError::new(field("shape"), "A marcação é menor que o tamanho mínimo."));
            }
        }
        errors
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnnotatorError {
    #[error("inspection is read-only")]
    ReadOnly,
    #[error("no finished shape is waiting for a severity and note")]
    NothingPending,
    #[error("marker {0} does not exist")]
    UnknownMarker(i64),
    #[error("no marker ids left after {0}")]
    IdsExhausted(i64),
}

/// Result of releasing the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerUp {
    /// Large enough; waits for [`Annotator::commit`] or [`Annotator::cancel`].
    Pending(Shape),
    /// Too small, thrown away.
    Discarded,
    /// No drawing was in progress.
    Ignored,
}

#[derive(Clone, Copy, Debug)]
struct Drawing {
    canvas: Canvas,
    origin: Point,
    shape: Shape,
}

/// In-memory drawing session over one order's visual inspection.
#[derive(Debug)]
pub struct Annotator {
    inspection: VisualInspection,
    read_only: bool,
    drawing: Option<Drawing>,
    pending: Option<Shape>,
    last_id: i64,
}

impl Annotator {
    pub fn new(inspection: VisualInspection, read_only: bool) -> Self {
        let last_id = inspection.markers.iter().map(|m| m.id).max().unwrap_or(0);
        Self {
            inspection,
            read_only,
            drawing: None,
            pending: None,
            last_id,
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn markers(&self) -> &[Marker] {
        &self.inspection.markers
    }

    pub fn inspection(&self) -> &VisualInspection {
        &self.inspection
    }

    pub fn into_inspection(self) -> VisualInspection {
        self.inspection
    }

    pub fn pending(&self) -> Option<Shape> {
        self.pending
    }

    /// Starts a draw. A new pointer-down drops any shape still pending.
    pub fn pointer_down(&mut self, canvas: Canvas, at: Point) -> bool {
        if self.read_only || !at.within_canvas() {
            return false;
        }
        self.pending = None;
        self.drawing = Some(Drawing {
            canvas,
            origin: at,
            shape: Shape::seed(canvas, at),
        });
        true
    }

    pub fn pointer_move(&mut self, to: Point) {
        if self.read_only || !to.is_finite() {
            return;
        }
        if let Some(drawing) = self.drawing.as_mut() {
            drawing.shape = Shape::from_drag(drawing.canvas, drawing.origin, to.clamped());
        }
    }

    pub fn pointer_up(&mut self) -> PointerUp {
        if self.read_only {
            return PointerUp::Ignored;
        }
        let Some(drawing) = self.drawing.take() else {
            return PointerUp::Ignored;
        };
        if drawing.shape.exceeds_minimum() {
            self.pending = Some(drawing.shape);
            PointerUp::Pending(drawing.shape)
        } else {
            PointerUp::Discarded
        }
    }

    /// Leaving the canvas mid-drag abandons the shape.
    pub fn pointer_leave(&mut self) {
        self.drawing = None;
    }

    /// Commits the pending shape as a marker.
    pub fn commit(&mut self, severity: Severity, note: impl Into<String>) -> Result<Marker, AnnotatorError> {
        if self.read_only {
            return Err(AnnotatorError::ReadOnly);
        }
        let shape = self.pending.ok_or(AnnotatorError::NothingPending)?;
        let id = self.next_id()?;
        self.pending = None;
        let marker = Marker {
            id,
            severity,
            note: note.into(),
            shape,
        };
        let mut markers = self.inspection.markers.clone();
        markers.push(marker.clone());
        self.inspection.markers = markers;
        Ok(marker)
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn remove(&mut self, id: i64) -> Result<Marker, AnnotatorError> {
        if self.read_only {
            return Err(AnnotatorError::ReadOnly);
        }
        let removed = self
            .inspection
            .markers
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or(AnnotatorError::UnknownMarker(id))?;
        self.inspection.markers = self
            .inspection
            .markers
            .iter()
            .filter(|m| m.id != id)
            .cloned()
            .collect();
        Ok(removed)
    }

    pub fn set_general_observations(&mut self, text: impl Into<String>) -> Result<(), AnnotatorError> {
        if self.read_only {
            return Err(AnnotatorError::ReadOnly);
        }
        self.inspection.general_observations = text.into();
        Ok(())
    }

    /// Creation timestamp in milliseconds, bumped to stay strictly increasing.
    fn next_id(&mut self) -> Result<i64, AnnotatorError> {
        let bumped = self
            .last_id
            .checked_add(1)
            .ok_or(AnnotatorError::IdsExhausted(self.last_id))?;
        self.last_id = chrono::Utc::now().timestamp_millis().max(bumped);
        Ok(self.last_id)
    }
}
