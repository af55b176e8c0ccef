//! Interpreter that converts an expanded command string into a point/break [`Trace`].
//!
//! The entry point is [`TurtleInterpreter`]. Configure it with a [`TurtleConfig`],
//! register symbol-to-operation mappings via [`TurtleInterpreter::set_op`],
//! [`TurtleInterpreter::populate_standard_symbols`] or
//! [`TurtleInterpreter::populate_vocabulary`], then call [`TurtleInterpreter::run`].

use crate::curve::{CurvePoint, Trace};
use crate::error::{Result, RibbonError};
use crate::expander::CommandString;
use crate::grammar::GrammarStore;
use crate::symbols::{SymbolId, SymbolTable};
use crate::turtle::{STANDARD_SYMBOLS, TurtleFrame, TurtleOp};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Configuration for turtle interpretation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TurtleConfig {
    /// Initial distance covered by a forward move.
    pub step: f32,
    /// Turn angle in degrees for Yaw/Pitch/Roll.
    pub angle: f32,
    /// Step multiplier applied by `ScaleStep`.
    pub length_factor: f32,
}

impl Default for TurtleConfig {
    fn default() -> Self {
        Self {
            step: 1.0,
            angle: 90.0,
            length_factor: 0.9,
        }
    }
}

impl TurtleConfig {
    /// Rejects non-finite parameters.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("step", self.step),
            ("angle", self.angle),
            ("length_factor", self.length_factor),
        ] {
            if !value.is_finite() {
                return Err(RibbonError::MalformedGrammar(format!(
                    "turtle {name} must be finite, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Interprets a command string as turtle motion.
pub struct TurtleInterpreter {
    op_map: Vec<TurtleOp>,
    config: TurtleConfig,
}

impl TurtleInterpreter {
    /// Creates a new interpreter with the given configuration and an empty symbol map.
    pub fn new(config: TurtleConfig) -> Self {
        Self {
            op_map: Vec::new(),
            config,
        }
    }

    /// Replaces the entire symbol-to-operation map in one step (builder pattern).
    ///
    /// `map` is indexed by [`SymbolId`]. Any ID that falls outside the slice is
    /// treated as [`TurtleOp::Ignore`].
    pub fn with_map(mut self, map: Vec<TurtleOp>) -> Self {
        self.op_map = map;
        self
    }

    /// Assigns a single [`TurtleOp`] to a symbol ID, growing the map as needed.
    pub fn set_op(&mut self, sym_id: SymbolId, op: TurtleOp) {
        let idx = sym_id as usize;
        if idx >= self.op_map.len() {
            self.op_map.resize(idx + 1, TurtleOp::Ignore);
        }
        self.op_map[idx] = op;
    }

    /// Maps every standard symbol present in `symbols` to its conventional operation.
    pub fn populate_standard_symbols(&mut self, symbols: &SymbolTable) {
        for (name, op) in STANDARD_SYMBOLS {
            if let Some(id) = symbols.resolve_id(name) {
                self.set_op(id, op);
            }
        }
    }

    /// Installs the full command vocabulary of `grammar`, including its overrides.
    pub fn populate_vocabulary(&mut self, grammar: &GrammarStore) {
        for (id, op) in grammar.vocabulary() {
            self.set_op(id, op);
        }
    }

    pub fn config(&self) -> &TurtleConfig {
        &self.config
    }

    /// Walks `commands` once, left to right, and returns the traced point stream.
    ///
    /// The turtle starts at the origin heading along `+Y` with its normal on `+Z`.
    /// Symbols with no registered mapping are ignored.
    ///
    /// # Strands
    ///
    /// A forward move emits the point it arrives at; the root strand has no start
    /// point until it reaches its first branch-start, which anchors it at the origin.
    /// Branch-start closes the active strand and opens a branch strand anchored at
    /// the branch point; branch-end restores the saved frame and anchors the
    /// continuation at it. An anchor is emitted only once the strand actually moves,
    /// so branches without forward motion produce nothing. Non-positive steps are
    /// no-ops.
    ///
    /// # Errors
    ///
    /// [`RibbonError::UnbalancedBranch`] on a branch-end with no saved frame, or if
    /// any branch is still open when the commands run out.
    pub fn run(&self, commands: &CommandString) -> Result<Trace> {
        let angle = self.config.angle.to_radians();
        let mut frame = TurtleFrame::new(self.config.step);
        let mut stack: Vec<TurtleFrame> = Vec::new();
        let mut trace = Trace::new();
        let origin = CurvePoint::at(&frame);
        let mut root_strand = true;
        let mut strand_open = false;
        let mut anchor: Option<CurvePoint> = None;

        for (position, &sym) in commands.tokens().iter().enumerate() {
            let op = self
                .op_map
                .get(sym as usize)
                .copied()
                .unwrap_or(TurtleOp::Ignore);

            match op {
                // --- DRAWING ---
                TurtleOp::Forward => {
                    if frame.step <= 0.0 {
                        continue;
                    }
                    if let Some(start) = anchor.take() {
                        trace.push_point(start);
                    }
                    frame.advance(frame.step);
                    trace.push_point(CurvePoint::at(&frame));
                    strand_open = true;
                }
                TurtleOp::Move => {
                    if frame.step <= 0.0 {
                        continue;
                    }
                    frame.advance(frame.step);
                    trace.push_break();
                    root_strand = false;
                    strand_open = false;
                    anchor = Some(CurvePoint::at(&frame));
                }

                // --- ORIENTATION ---
                TurtleOp::Yaw(s) => frame.rotate_local_z(angle * s),
                TurtleOp::Pitch(s) => frame.rotate_local_x(angle * s),
                TurtleOp::Roll(s) => frame.rotate_local_y(angle * s),
                TurtleOp::TurnAround => frame.rotate_local_z(PI),

                // --- CONFIG ---
                TurtleOp::ScaleStep => frame.step *= self.config.length_factor,

                // --- FLOW ---
                TurtleOp::BranchStart => {
                    // No break precedes the root strand, so it starts at event 0.
                    if root_strand && strand_open {
                        trace.prepend_point(origin);
                    }
                    trace.push_break();
                    root_strand = false;
                    strand_open = false;
                    stack.push(frame.clone());
                    anchor = Some(CurvePoint::at(&frame));
                }
                TurtleOp::BranchEnd => {
                    frame = stack
                        .pop()
                        .ok_or(RibbonError::UnbalancedBranch { position, depth: 0 })?;
                    trace.push_break();
                    root_strand = false;
                    strand_open = false;
                    anchor = Some(CurvePoint::at(&frame));
                }
                TurtleOp::Ignore => {}
            }
        }

        if !stack.is_empty() {
            return Err(RibbonError::UnbalancedBranch {
                position: commands.len(),
                depth: stack.len(),
            });
        }

        tracing::debug!(
            commands = commands.len(),
            points = trace.point_count(),
            "interpreted command string"
        );
        Ok(trace)
    }
}
