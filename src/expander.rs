//! Generation-by-generation rewriting of the axiom into a turtle command string.

use crate::error::{Result, RibbonError};
use crate::grammar::GrammarStore;
use crate::symbols::{SymbolId, SymbolTable};
use rand::SeedableRng;
use rand::distributions::Distribution;
use rand::rngs::StdRng;

/// The final token sequence produced by expansion.
///
/// Immutable once built; the interpreter only reads it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CommandString {
    tokens: Vec<SymbolId>,
}

impl CommandString {
    pub fn new(tokens: Vec<SymbolId>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[SymbolId] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Renders the tokens back to text. Multi-character tokens are space-separated
    /// so the result stays unambiguous; single-character runs are concatenated.
    pub fn render(&self, symbols: &SymbolTable) -> String {
        let mut out = String::with_capacity(self.tokens.len());
        let mut previous_wide = false;
        for &id in &self.tokens {
            let name = symbols.resolve_name(id).unwrap_or("?");
            let wide = name.chars().count() > 1;
            if !out.is_empty() && (wide || previous_wide) {
                out.push(' ');
            }
            out.push_str(name);
            previous_wide = wide;
        }
        out
    }
}

/// Rewrites an axiom for a fixed number of generations.
///
/// Expansion is exponential in the generation count; bounding it is the caller's job.
#[derive(Clone, Debug, Default)]
pub struct ProductionExpander {
    seed: u64,
}

impl ProductionExpander {
    /// Creates an expander whose stochastic choices are drawn from `seed`.
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Applies `generations` rounds of rewriting to `axiom` using the rules in `grammar`.
    ///
    /// Every symbol with a rule is replaced each round; commands without a rule pass
    /// through. A symbol that is neither fails with [`RibbonError::UnboundSymbol`],
    /// including one introduced by the final round.
    /// Symbols with a single candidate never consume randomness, so purely
    /// deterministic grammars are unaffected by the seed.
    pub fn expand(
        &self,
        axiom: &[SymbolId],
        grammar: &GrammarStore,
        generations: u32,
    ) -> Result<CommandString> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut current = axiom.to_vec();

        for generation in 1..=generations {
            let mut next = Vec::with_capacity(current.len() * 2);
            for &symbol in &current {
                match grammar.rule_set(symbol) {
                    Some(set) => {
                        let index = match &set.picker {
                            Some(picker) => picker.sample(&mut rng),
                            None => 0,
                        };
                        next.extend_from_slice(&set.productions[index].replacement);
                    }
                    None => {
                        check_bound(grammar, symbol, generation)?;
                        next.push(symbol);
                    }
                }
            }
            current = next;
            tracing::debug!(generation, tokens = current.len(), "expanded generation");
        }

        // Replacements from the last round (or the axiom itself) are never rewritten.
        for &symbol in &current {
            check_bound(grammar, symbol, generations)?;
        }

        Ok(CommandString::new(current))
    }
}

fn check_bound(grammar: &GrammarStore, symbol: SymbolId, generation: u32) -> Result<()> {
    if grammar.is_terminal(symbol) || !grammar.rules_for(symbol).is_empty() {
        return Ok(());
    }
    Err(RibbonError::UnboundSymbol {
        symbol: grammar
            .symbols()
            .resolve_name(symbol)
            .unwrap_or_default()
            .to_owned(),
        generation,
    })
}
