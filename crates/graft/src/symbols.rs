//! Symbol and field tables derived from a grammar's rule graph.
//!
//! Ids are assigned deterministically so that linking the same artifact twice
//! yields identical tables:
//!
//! 1. id `0` is the builtin `end` symbol;
//! 2. the start rule, then every other rule in lexicographic order;
//! 3. named externals, in declaration order;
//! 4. named aliases not already present;
//! 5. anonymous tokens (`STRING` literals, anonymous alias values and
//!    `STRING` externals).
//!
//! `TOKEN` and `IMMEDIATE_TOKEN` are single lexical units: literals inside
//! them do not become symbols of their own.
//!
//! Field ids start at `1`, leaving `0` to mean "no field".

use crate::grammar::Grammar;
use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};

/// Index into a language's symbol table.
pub type SymbolId = u16;

/// Index into a language's field table. `0` is never assigned.
pub type FieldId = u16;

/// Name of the builtin end-of-input symbol.
pub const END_SYMBOL: &str = "end";

/// One entry in the symbol table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// The node kind as it appears in syntax trees.
    pub name: String,
    /// Whether nodes of this kind are named (rules and named aliases).
    pub named: bool,
    /// Whether nodes of this kind appear in syntax trees at all.
    pub visible: bool,
}

/// The table grew beyond what a [`SymbolId`] or [`FieldId`] can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{kind} table has {count} entries, more than ids can address")]
pub struct TableOverflow {
    /// Which table overflowed.
    pub kind: &'static str,
    /// How many entries it would have held.
    pub count: usize,
}

/// Symbols and fields of one linked grammar.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    by_name: HashMap<(String, bool), SymbolId>,
    fields: Vec<String>,
}

impl SymbolTable {
    /// Derive the tables for `grammar`, with `start` as the first rule symbol.
    ///
    /// # Errors
    ///
    /// Returns [`TableOverflow`] if there are more symbols or fields than ids.
    pub fn build(grammar: &Grammar, start: &str) -> Result<Self, TableOverflow> {
        let mut table = SymbolTable::default();
        table.push(END_SYMBOL, false, false);

        if grammar.has_rule(start) {
            table.push(start, true, !start.starts_with('_'));
        }
        let rule_names: BTreeSet<&str> = grammar.rules.keys().map(String::as_str).collect();
        for name in rule_names.into_iter().filter(|&name| name != start) {
            table.push(name, true, !name.starts_with('_'));
        }

        let mut named_aliases = BTreeSet::new();
        let mut tokens = BTreeSet::new();
        for external in grammar.externals.iter().flatten() {
            if let Some(name) = external.symbol_name() {
                table.push(name, true, !name.starts_with('_'));
            } else if let Some(literal) = external.string_value() {
                tokens.insert(literal);
            }
        }
        for rule in grammar.rule_trees() {
            rule.visit_syntactic(&mut |r| {
                if let Some(literal) = r.string_value() {
                    tokens.insert(literal);
                }
                match r.alias_value() {
                    Some((alias, true)) => {
                        named_aliases.insert(alias);
                    }
                    Some((alias, false)) => {
                        tokens.insert(alias);
                    }
                    None => {}
                }
            });
        }
        for alias in named_aliases {
            table.push(alias, true, true);
        }
        for token in tokens {
            table.push(token, false, true);
        }

        if SymbolId::try_from(table.symbols.len()).is_err() {
            return Err(TableOverflow {
                kind: "symbol",
                count: table.symbols.len(),
            });
        }

        table.fields = grammar.field_names().into_iter().map(String::from).collect();
        if FieldId::try_from(table.fields.len()).is_err() {
            return Err(TableOverflow {
                kind: "field",
                count: table.fields.len(),
            });
        }

        Ok(table)
    }

    /// Appends a symbol unless one with the same name and namedness exists.
    fn push(&mut self, name: &str, named: bool, visible: bool) {
        let Entry::Vacant(slot) = self.by_name.entry((name.to_string(), named)) else {
            return;
        };
        // Overflow is reported by `build` once the table is complete.
        slot.insert(SymbolId::try_from(self.symbols.len()).unwrap_or(SymbolId::MAX));
        self.symbols.push(Symbol {
            name: name.to_string(),
            named,
            visible,
        });
    }

    /// Number of symbols, including the builtin `end` symbol.
    #[must_use]
    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    /// Looks up a symbol by id.
    #[must_use]
    pub fn symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(usize::from(id))
    }

    /// Looks up a symbol id by node kind and namedness.
    #[must_use]
    pub fn symbol_for_name(&self, name: &str, named: bool) -> Option<SymbolId> {
        self.by_name.get(&(name.to_string(), named)).copied()
    }

    /// All symbols in id order.
    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    /// Number of fields. Valid field ids are `1..=field_count()`.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Looks up a field name by id.
    #[must_use]
    pub fn field_name(&self, id: FieldId) -> Option<&str> {
        let index = usize::from(id).checked_sub(1)?;
        self.fields.get(index).map(String::as_str)
    }

    /// Looks up a field id by name.
    #[must_use]
    pub fn field_id(&self, name: &str) -> Option<FieldId> {
        let index = self.fields.binary_search_by(|f| f.as_str().cmp(name)).ok()?;
        FieldId::try_from(index + 1).ok()
    }
}
