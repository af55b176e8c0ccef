//! Traced points and their assembly into render-ready linear curves.

use crate::error::{Result, RibbonError};
use crate::grammar::CurveConfig;
use crate::turtle::TurtleFrame;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A traced vertex: position plus ribbon surface normal.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub position: Vec3,
    pub normal: Vec3,
}

impl CurvePoint {
    /// The point under the turtle, facing along its normal.
    pub fn at(frame: &TurtleFrame) -> Self {
        Self {
            position: frame.position,
            normal: frame.normal(),
        }
    }
}

/// One element of the interpreter's output stream.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum TraceEvent {
    Point(CurvePoint),
    /// Ends the active strand.
    Break,
}

/// Ordered point/break stream produced by one interpreter pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    events: Vec<TraceEvent>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_point(&mut self, point: CurvePoint) {
        self.events.push(TraceEvent::Point(point));
    }

    /// Inserts a point ahead of every recorded event.
    pub fn prepend_point(&mut self, point: CurvePoint) {
        self.events.insert(0, TraceEvent::Point(point));
    }

    pub fn push_break(&mut self) {
        self.events.push(TraceEvent::Break);
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn point_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, TraceEvent::Point(_)))
            .count()
    }
}

impl FromIterator<TraceEvent> for Trace {
    fn from_iter<I: IntoIterator<Item = TraceEvent>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

/// Render-ready linear curves.
///
/// Layout matches a `(vertices-per-curve, P, N, constant width)` curves primitive:
/// `positions` and `normals` are flat `xyz` triples in strand order and every
/// entry of `vertices_per_curve` is at least 2.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CurveBuffer {
    pub vertices_per_curve: Vec<usize>,
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    /// Uniform curve width.
    pub width: f32,
}

impl CurveBuffer {
    pub fn curve_count(&self) -> usize {
        self.vertices_per_curve.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Iterates over `(positions, normals)` slices, one pair per curve.
    pub fn curves(&self) -> impl Iterator<Item = (&[f32], &[f32])> + '_ {
        let mut offset = 0;
        self.vertices_per_curve.iter().map(move |&count| {
            let range = offset * 3..(offset + count) * 3;
            offset += count;
            (&self.positions[range.clone()], &self.normals[range])
        })
    }

    /// Checks that the per-curve counts account for exactly the stored vertices.
    pub fn validate(&self) -> Result<()> {
        let counted: usize = self.vertices_per_curve.iter().sum();
        let points = self.vertex_count();
        if counted != points
            || self.positions.len() % 3 != 0
            || self.normals.len() != self.positions.len()
        {
            return Err(RibbonError::TopologyMismatch { counted, points });
        }
        Ok(())
    }
}

/// Folds a [`Trace`] into a [`CurveBuffer`], discarding degenerate strands.
#[derive(Clone, Debug, Default)]
pub struct CurveAssembler {
    config: CurveConfig,
}

impl CurveAssembler {
    pub fn new(config: CurveConfig) -> Self {
        Self { config }
    }

    /// Builds the buffer strand by strand.
    ///
    /// A strand ends at each [`TraceEvent::Break`] and at the end of the stream.
    /// Empty strands vanish; single-point strands are removed entirely since a
    /// line needs two vertices. The result is validated before it is returned.
    pub fn assemble(&self, trace: &Trace) -> Result<CurveBuffer> {
        let mut buffer = CurveBuffer {
            width: self.config.width,
            ..Default::default()
        };
        let mut count = 0usize;
        let mut discarded = 0usize;

        let events = trace.events().iter().map(Some).chain(std::iter::once(None));
        for event in events {
            match event {
                Some(TraceEvent::Point(point)) => {
                    buffer.positions.extend_from_slice(&point.position.to_array());
                    buffer.normals.extend_from_slice(&point.normal.to_array());
                    count += 1;
                }
                Some(TraceEvent::Break) | None => {
                    match count {
                        0 => {}
                        1 => {
                            let len = buffer.positions.len() - 3;
                            buffer.positions.truncate(len);
                            buffer.normals.truncate(len);
                            discarded += 1;
                        }
                        n => buffer.vertices_per_curve.push(n),
                    }
                    count = 0;
                }
            }
        }

        if discarded > 0 {
            tracing::debug!(discarded, "dropped single-point strands");
        }

        buffer.validate()?;
        tracing::info!(
            curves = buffer.curve_count(),
            vertices = buffer.vertex_count(),
            "assembled curves"
        );
        Ok(buffer)
    }
}
