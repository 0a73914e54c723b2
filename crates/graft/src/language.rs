//! The handle a parser runtime receives for a loaded grammar.

use crate::grammar::Grammar;
use crate::registry::LinkedGrammar;
use crate::symbols::{FieldId, SymbolId};
use std::fmt;

/// A loaded, version-checked grammar.
///
/// `Language` is a cheap `Copy` reference into a [`Registry`](crate::Registry)
/// and is only ever handed out by a [`Loader`](crate::Loader) after every
/// check has passed. Two handles compare equal when they refer to the same
/// linked grammar.
#[derive(Clone, Copy)]
pub struct Language<'r> {
    grammar: &'r LinkedGrammar,
}

impl<'r> Language<'r> {
    pub(crate) fn new(grammar: &'r LinkedGrammar) -> Self {
        Self { grammar }
    }

    /// The grammar's name.
    #[must_use]
    pub fn name(self) -> &'r str {
        self.grammar.artifact.name()
    }

    /// The ABI version the artifact declared.
    #[must_use]
    pub fn abi_version(self) -> u32 {
        self.grammar.artifact.abi_version
    }

    /// The underlying rule graph.
    #[must_use]
    pub fn grammar(self) -> &'r Grammar {
        &self.grammar.artifact.grammar
    }

    /// Number of distinct node kinds, including the builtin `end` symbol.
    #[must_use]
    pub fn symbol_count(self) -> usize {
        self.grammar.symbols.symbol_count()
    }

    /// The node kind for a symbol id.
    #[must_use]
    pub fn symbol_name(self, symbol: SymbolId) -> Option<&'r str> {
        self.grammar.symbols.symbol(symbol).map(|s| s.name.as_str())
    }

    /// The symbol id for a node kind.
    #[must_use]
    pub fn symbol_for_name(self, kind: &str, named: bool) -> Option<SymbolId> {
        self.grammar.symbols.symbol_for_name(kind, named)
    }

    /// Whether nodes of this kind are named. Unknown ids are not.
    #[must_use]
    pub fn node_kind_is_named(self, symbol: SymbolId) -> bool {
        self.grammar.symbols.symbol(symbol).is_some_and(|s| s.named)
    }

    /// Whether nodes of this kind appear in syntax trees. Unknown ids do not.
    #[must_use]
    pub fn node_kind_is_visible(self, symbol: SymbolId) -> bool {
        self.grammar.symbols.symbol(symbol).is_some_and(|s| s.visible)
    }

    /// Number of fields. Valid ids are `1..=field_count()`.
    #[must_use]
    pub fn field_count(self) -> usize {
        self.grammar.symbols.field_count()
    }

    /// The field name for an id.
    #[must_use]
    pub fn field_name_for_id(self, field: FieldId) -> Option<&'r str> {
        self.grammar.symbols.field_name(field)
    }

    /// The id for a field name.
    #[must_use]
    pub fn field_id_for_name(self, name: &str) -> Option<FieldId> {
        self.grammar.symbols.field_id(name)
    }

    /// Symbol of the entry-point rule, if it resolved.
    #[must_use]
    pub fn start_symbol(self) -> Option<SymbolId> {
        self.grammar.entry
    }

    /// Whether the handle is safe to build a parser from: it has a symbol
    /// table and its entry point resolves to a named symbol in it.
    #[must_use]
    pub fn is_live(self) -> bool {
        self.symbol_count() > 0
            && self
                .start_symbol()
                .is_some_and(|entry| self.node_kind_is_named(entry))
    }
}

impl PartialEq for Language<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.grammar, other.grammar)
    }
}

impl Eq for Language<'_> {}

impl fmt::Debug for Language<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Language")
            .field("name", &self.name())
            .field("abi_version", &self.abi_version())
            .field("symbols", &self.symbol_count())
            .field("fields", &self.field_count())
            .finish()
    }
}
