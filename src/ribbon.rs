//! End-to-end evaluation: description → command string → trace → curves.

use crate::curve::{CurveAssembler, CurveBuffer};
use crate::error::Result;
use crate::expander::{CommandString, ProductionExpander};
use crate::grammar::{CurveConfig, GrammarDescription, GrammarStore};
use crate::interpreter::{TurtleConfig, TurtleInterpreter};
use std::path::Path;

/// A loaded ribbon grammar together with its evaluation parameters.
#[derive(Clone, Debug)]
pub struct Ribbon {
    grammar: GrammarStore,
    generations: u32,
    seed: u64,
    turtle: TurtleConfig,
    curve: CurveConfig,
}

impl Ribbon {
    pub fn from_description(description: &GrammarDescription) -> Result<Self> {
        description.turtle.validate()?;
        description.curve.validate()?;
        Ok(Self {
            grammar: GrammarStore::from_description(description)?,
            generations: description.generations,
            seed: description.seed,
            turtle: description.turtle.clone(),
            curve: description.curve.clone(),
        })
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Self::from_description(&GrammarDescription::from_json(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_description(&GrammarDescription::from_path(path)?)
    }

    /// Overrides the description's generation count.
    pub fn with_generations(mut self, generations: u32) -> Self {
        self.generations = generations;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.curve.width = width;
        self
    }

    pub fn grammar(&self) -> &GrammarStore {
        &self.grammar
    }

    pub fn generations(&self) -> u32 {
        self.generations
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Runs the rewriting stage only.
    pub fn expand(&self) -> Result<CommandString> {
        let commands = ProductionExpander::new(self.seed).expand(
            self.grammar.axiom(),
            &self.grammar,
            self.generations,
        )?;
        tracing::info!(
            generations = self.generations,
            seed = self.seed,
            tokens = commands.len(),
            "expanded grammar"
        );
        Ok(commands)
    }

    /// The expanded command string as text.
    pub fn command_string(&self) -> Result<String> {
        Ok(self.expand()?.render(self.grammar.symbols()))
    }

    /// Evaluates the whole pipeline. Either every stage succeeds and the buffer is
    /// returned, or the first error is and nothing is.
    pub fn evaluate(&self) -> Result<CurveBuffer> {
        // Overrides bypass the checks made at load time.
        self.curve.validate()?;
        let commands = self.expand()?;

        let mut interpreter = TurtleInterpreter::new(self.turtle.clone());
        interpreter.populate_vocabulary(&self.grammar);
        let trace = interpreter.run(&commands)?;
        tracing::info!(points = trace.point_count(), "traced turtle");

        CurveAssembler::new(self.curve.clone()).assemble(&trace)
    }
}
