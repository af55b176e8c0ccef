//! Token interning.

use crate::error::{Result, RibbonError};
use std::collections::HashMap;

/// Compact handle for an interned token.
pub type SymbolId = u16;

/// Bidirectional map between token strings and [`SymbolId`]s.
///
/// IDs are dense and assigned in interning order, so tables indexed by
/// `SymbolId` (such as the interpreter's op map) stay small.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    names: Vec<String>,
    ids: HashMap<String, SymbolId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the ID for `name`, interning it on first use.
    pub fn intern(&mut self, name: &str) -> Result<SymbolId> {
        if let Some(&id) = self.ids.get(name) {
            return Ok(id);
        }
        let id = SymbolId::try_from(self.names.len()).map_err(|_| {
            RibbonError::MalformedGrammar(format!(
                "too many distinct symbols (limit {})",
                SymbolId::MAX as usize + 1
            ))
        })?;
        self.names.push(name.to_owned());
        self.ids.insert(name.to_owned(), id);
        Ok(id)
    }

    pub fn resolve_id(&self, name: &str) -> Option<SymbolId> {
        self.ids.get(name).copied()
    }

    pub fn resolve_name(&self, id: SymbolId) -> Option<&str> {
        self.names.get(id as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
