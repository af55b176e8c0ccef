//! Error types for grammar loading, expansion, interpretation and assembly.

use std::path::PathBuf;

/// Every failure is fatal to the evaluation that raised it; no partial curve is produced.
#[derive(Debug, thiserror::Error)]
pub enum RibbonError {
    /// The description could not be parsed, or parsed into an unusable grammar.
    #[error("malformed grammar: {0}")]
    MalformedGrammar(String),

    /// Expansion met a token that is neither a turtle command nor has a rule.
    #[error("unbound symbol '{symbol}' in generation {generation}")]
    UnboundSymbol { symbol: String, generation: u32 },

    /// A branch-end without a matching branch-start, or branches left open at the end.
    #[error("unbalanced branch at command {position} (open branches: {depth})")]
    UnbalancedBranch { position: usize, depth: usize },

    /// Per-strand counts disagree with the retained vertices. Indicates an assembly bug.
    #[error("incorrect curve topology: {counted} total verts, {points} points")]
    TopologyMismatch { counted: usize, points: usize },

    #[error("failed to read description {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<serde_json::Error> for RibbonError {
    fn from(e: serde_json::Error) -> Self {
        RibbonError::MalformedGrammar(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RibbonError>;
