//! # lsystem-ribbon
//!
//! Procedural ribbon generation from L-System grammars.
//!
//! A JSON description is loaded into a [`GrammarStore`], rewritten by the
//! [`ProductionExpander`] into a command string, walked by the [`TurtleInterpreter`]
//! into a point/break [`Trace`], and folded by the [`CurveAssembler`] into a
//! [`CurveBuffer`] of linear curves ready for an external renderer.
//! [`Ribbon`] drives all four stages.
//!
//! Expansion grows exponentially with the generation count. The crate imposes no
//! cap; callers must keep `generations` within what memory allows.

pub mod curve;
pub mod error;
pub mod expander;
pub mod grammar;
pub mod interpreter;
pub mod ribbon;
pub mod symbols;
pub mod turtle;

pub use curve::*;
pub use error::RibbonError;
pub use expander::*;
pub use grammar::*;
pub use interpreter::*;
pub use ribbon::*;
pub use symbols::*;
pub use turtle::*;
