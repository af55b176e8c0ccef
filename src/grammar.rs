//! Grammar description model and the [`GrammarStore`] built from it.
//!
//! A description is a JSON document:
//!
//! ```json
//! {
//!   "axiom": "A",
//!   "generations": 1,
//!   "rules": [{ "symbol": "A", "replacement": "F[+F][-F]" }],
//!   "turtle": { "step": 1.0, "angle": 90.0 }
//! }
//! ```
//!
//! Token strings are split into one token per non-whitespace character; use an
//! array of strings for multi-character tokens.

use crate::error::{Result, RibbonError};
use crate::interpreter::TurtleConfig;
use crate::symbols::{SymbolId, SymbolTable};
use crate::turtle::{STANDARD_SYMBOLS, TurtleOp};
use rand::distributions::WeightedIndex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// A token sequence as written in a description.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenList {
    /// One token per non-whitespace character.
    Text(String),
    /// Explicit tokens, allowing multi-character symbols.
    Tokens(Vec<String>),
}

impl TokenList {
    fn tokens(&self) -> Vec<String> {
        match self {
            Self::Text(text) => text
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(String::from)
                .collect(),
            Self::Tokens(tokens) => tokens.clone(),
        }
    }
}

impl From<&str> for TokenList {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

fn default_weight() -> u32 {
    1
}

/// One production as written in a description.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleDefinition {
    pub symbol: String,
    pub replacement: TokenList,
    /// Relative weight among rules sharing `symbol`.
    #[serde(default = "default_weight")]
    pub weight: u32,
}

/// Curve output settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CurveConfig {
    /// Uniform width handed to the renderer with every curve.
    pub width: f32,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self { width: 0.15 }
    }
}

impl CurveConfig {
    /// Rejects a negative or non-finite width.
    pub fn validate(&self) -> Result<()> {
        if !self.width.is_finite() || self.width < 0.0 {
            return Err(RibbonError::MalformedGrammar(format!(
                "curve width must be finite and non-negative, got {}",
                self.width
            )));
        }
        Ok(())
    }
}

/// The full structured description of a ribbon.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrammarDescription {
    pub axiom: TokenList,

    #[serde(default)]
    pub rules: Vec<RuleDefinition>,

    /// Overrides and additions to the standard command vocabulary.
    #[serde(default)]
    pub commands: BTreeMap<String, TurtleOp>,

    /// Number of rewriting rounds. Growth is exponential in this value.
    #[serde(default)]
    pub generations: u32,

    /// Seed for stochastic rule selection.
    #[serde(default)]
    pub seed: u64,

    #[serde(default)]
    pub turtle: TurtleConfig,

    #[serde(default)]
    pub curve: CurveConfig,
}

impl GrammarDescription {
    /// Parses a JSON description.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads and parses a JSON description from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| RibbonError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }
}

/// A single candidate replacement for a symbol.
#[derive(Clone, Debug, PartialEq)]
pub struct Production {
    pub replacement: Vec<SymbolId>,
    pub weight: u32,
}

/// All candidates for one symbol, with a sampler when there is more than one.
#[derive(Clone, Debug)]
pub(crate) struct RuleSet {
    pub(crate) productions: Vec<Production>,
    pub(crate) picker: Option<WeightedIndex<u32>>,
}

/// Production rules, axiom and command vocabulary of one grammar.
#[derive(Clone, Debug)]
pub struct GrammarStore {
    symbols: SymbolTable,
    axiom: Vec<SymbolId>,
    rules: HashMap<SymbolId, RuleSet>,
    vocabulary: HashMap<SymbolId, TurtleOp>,
}

impl GrammarStore {
    /// Parses a JSON description and builds the store from it.
    pub fn load(description: &str) -> Result<Self> {
        Self::from_description(&GrammarDescription::from_json(description)?)
    }

    /// Builds the store from an already-parsed description.
    ///
    /// Fails with [`RibbonError::MalformedGrammar`] when the axiom is empty, a rule has no
    /// replacement or a zero weight, a symbol's weights sum past `u32::MAX`, or a rule
    /// symbol is not a single token.
    pub fn from_description(description: &GrammarDescription) -> Result<Self> {
        let mut symbols = SymbolTable::new();

        let mut vocabulary = HashMap::new();
        for (name, op) in STANDARD_SYMBOLS {
            vocabulary.insert(symbols.intern(name)?, op);
        }
        for (name, op) in &description.commands {
            check_token(name)?;
            vocabulary.insert(symbols.intern(name)?, *op);
        }

        let axiom = intern_all(&mut symbols, &description.axiom)?;
        if axiom.is_empty() {
            return Err(RibbonError::MalformedGrammar("axiom is empty".into()));
        }

        let mut grouped: HashMap<SymbolId, Vec<Production>> = HashMap::new();
        for rule in &description.rules {
            check_token(&rule.symbol)?;
            let symbol = symbols.intern(&rule.symbol)?;
            let replacement = intern_all(&mut symbols, &rule.replacement)?;
            if replacement.is_empty() {
                return Err(RibbonError::MalformedGrammar(format!(
                    "rule for '{}' has no replacement",
                    rule.symbol
                )));
            }
            if rule.weight == 0 {
                return Err(RibbonError::MalformedGrammar(format!(
                    "rule for '{}' has zero weight",
                    rule.symbol
                )));
            }
            grouped.entry(symbol).or_default().push(Production {
                replacement,
                weight: rule.weight,
            });
        }

        let mut rules = HashMap::with_capacity(grouped.len());
        for (symbol, productions) in grouped {
            let picker = if productions.len() > 1 {
                // WeightedIndex sums without overflow checks.
                productions
                    .iter()
                    .try_fold(0u32, |total, p| total.checked_add(p.weight))
                    .ok_or_else(|| {
                        RibbonError::MalformedGrammar(format!(
                            "rule weights for '{}' exceed {}",
                            symbols.resolve_name(symbol).unwrap_or_default(),
                            u32::MAX
                        ))
                    })?;
                let weights = productions.iter().map(|p| p.weight);
                Some(
                    WeightedIndex::new(weights)
                        .map_err(|e| RibbonError::MalformedGrammar(e.to_string()))?,
                )
            } else {
                None
            };
            rules.insert(
                symbol,
                RuleSet {
                    productions,
                    picker,
                },
            );
        }

        tracing::debug!(
            symbols = symbols.len(),
            rules = description.rules.len(),
            axiom = axiom.len(),
            "grammar loaded"
        );

        Ok(Self {
            symbols,
            axiom,
            rules,
            vocabulary,
        })
    }

    pub fn axiom(&self) -> &[SymbolId] {
        &self.axiom
    }

    /// Candidate replacements for `symbol`, in declaration order. Empty for terminals.
    pub fn rules_for(&self, symbol: SymbolId) -> &[Production] {
        self.rules
            .get(&symbol)
            .map(|set| set.productions.as_slice())
            .unwrap_or(&[])
    }

    pub(crate) fn rule_set(&self, symbol: SymbolId) -> Option<&RuleSet> {
        self.rules.get(&symbol)
    }

    /// The turtle operation bound to `symbol`, if it is part of the command vocabulary.
    pub fn command(&self, symbol: SymbolId) -> Option<TurtleOp> {
        self.vocabulary.get(&symbol).copied()
    }

    /// Whether `symbol` is a turtle command with no rewriting rule.
    pub fn is_terminal(&self, symbol: SymbolId) -> bool {
        !self.rules.contains_key(&symbol) && self.vocabulary.contains_key(&symbol)
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn vocabulary(&self) -> impl Iterator<Item = (SymbolId, TurtleOp)> + '_ {
        self.vocabulary.iter().map(|(&id, &op)| (id, op))
    }
}

fn check_token(name: &str) -> Result<()> {
    if name.is_empty() || name.chars().any(char::is_whitespace) {
        return Err(RibbonError::MalformedGrammar(format!(
            "'{name}' is not a single token"
        )));
    }
    Ok(())
}

fn intern_all(symbols: &mut SymbolTable, list: &TokenList) -> Result<Vec<SymbolId>> {
    list.tokens()
        .iter()
        .map(|token| {
            check_token(token)?;
            symbols.intern(token)
        })
        .collect()
}
