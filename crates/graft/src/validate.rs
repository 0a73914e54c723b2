//! Validation routines for Tree-sitter grammars.
//!
//! This module performs structural checks over a parsed [`Grammar`] before it
//! is linked: every rule node must carry the value or name its type requires,
//! and every symbol reference must name a defined rule or external.
//! Softer findings (rules unreachable from the start rule, left recursion,
//! a rule declaring several precedence levels) are reported through
//! [`tracing`] and do not fail validation.

use crate::grammar::{Grammar, Rule, RuleType};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{debug, warn};

/// Represents a validation failure encountered when checking a grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A `SYMBOL` rule names something that is neither a rule nor an external.
    #[error("undefined symbol '{symbol}' referenced in rule '{rule}'")]
    UndefinedSymbol {
        /// The missing symbol.
        symbol: String,
        /// The rule whose body contains the reference.
        rule: String,
    },

    /// A rule node lacks the value or name its type requires.
    #[error("{kind} rule in '{rule}' has no value or name")]
    MissingPayload {
        /// The rule type, as spelled in `grammar.json`.
        kind: &'static str,
        /// The rule whose body contains the node.
        rule: String,
    },

    /// The grammar defines no rules at all.
    #[error("grammar has no rules")]
    Empty,
}

/// Performs semantic validation of a parsed [`Grammar`] rooted at `start`.
///
/// - Checks that every rule node carries its value or name.
/// - Checks that all referenced symbols are defined.
/// - Warns about rules unreachable from `start`.
/// - Notes immediate left recursion.
/// - Warns about rules that mix precedence levels.
///
/// # Errors
///
/// Returns a [`ValidationError`] if the grammar is empty, has a bare rule
/// node, or references an undefined symbol.
pub fn validate(grammar: &Grammar, start: &str) -> Result<(), ValidationError> {
    if grammar.rules.is_empty() {
        return Err(ValidationError::Empty);
    }

    check_payloads(grammar)?;
    check_undefined_symbols(grammar)?;
    check_unreachable_rules(grammar, start);
    check_left_recursion(grammar);
    check_precedence(grammar);

    Ok(())
}

fn externals(grammar: &Grammar) -> HashSet<&str> {
    grammar
        .externals
        .iter()
        .flatten()
        .filter_map(|rule| rule.name.as_deref())
        .collect()
}

/// Rule definitions in name order, then `extras`, each with the context
/// reported in errors.
fn ordered_trees(grammar: &Grammar) -> impl Iterator<Item = (&str, &Rule)> {
    // Sorted so the reported error does not depend on hash order.
    let ordered: BTreeMap<_, _> = grammar.rules.iter().collect();
    ordered
        .into_iter()
        .map(|(name, rule)| (name.as_str(), rule))
        .chain(grammar.extras.iter().flatten().map(|rule| ("extras", rule)))
}

fn check_payloads(grammar: &Grammar) -> Result<(), ValidationError> {
    let externals = grammar.externals.iter().flatten().map(|rule| ("externals", rule));
    for (context, rule) in ordered_trees(grammar).chain(externals) {
        let mut bare = None;
        rule.visit(&mut |r| {
            if bare.is_none() && !r.has_payload() {
                bare = Some(r.type_name());
            }
        });
        if let Some(kind) = bare {
            return Err(ValidationError::MissingPayload {
                kind,
                rule: context.to_string(),
            });
        }
    }
    Ok(())
}

fn check_undefined_symbols(grammar: &Grammar) -> Result<(), ValidationError> {
    let externals = externals(grammar);

    for (context, rule) in ordered_trees(grammar) {
        let mut missing = None;
        rule.visit(&mut |r| {
            if missing.is_some() {
                return;
            }
            if let Some(name) = r.symbol_name() {
                if !grammar.has_rule(name) && !externals.contains(name) {
                    missing = Some(name);
                }
            }
        });
        if let Some(symbol) = missing {
            return Err(ValidationError::UndefinedSymbol {
                symbol: symbol.to_string(),
                rule: context.to_string(),
            });
        }
    }

    Ok(())
}

fn check_unreachable_rules(grammar: &Grammar, start: &str) {
    let mut reachable = HashSet::new();
    let mut to_visit = vec![start];
    to_visit.extend(grammar.extras.iter().flatten().flat_map(referenced_symbols));

    while let Some(rule_name) = to_visit.pop() {
        if !reachable.insert(rule_name) {
            continue;
        }
        if let Some(rule) = grammar.rules.get(rule_name) {
            to_visit.extend(referenced_symbols(rule));
        }
    }

    let unreachable: BTreeSet<_> = grammar
        .rules
        .keys()
        .map(String::as_str)
        .filter(|name| !reachable.contains(name) && !grammar.is_inlined(name))
        .collect();
    for rule_name in unreachable {
        warn!(grammar = %grammar.name, rule = rule_name, "unreachable rule");
    }
}

fn referenced_symbols(rule: &Rule) -> Vec<&str> {
    let mut symbols = Vec::new();
    rule.visit(&mut |r| symbols.extend(r.symbol_name()));
    symbols
}

fn check_left_recursion(grammar: &Grammar) {
    for (rule_name, rule) in &grammar.rules {
        if has_immediate_left_recursion(rule, rule_name) {
            debug!(grammar = %grammar.name, rule = %rule_name, "rule is left recursive");
        }
    }
}

fn has_immediate_left_recursion(rule: &Rule, target: &str) -> bool {
    match rule.rule_type {
        RuleType::Symbol => rule.name.as_deref() == Some(target),

        RuleType::Seq => rule
            .members
            .first()
            .is_some_and(|first| has_immediate_left_recursion(first, target)),

        RuleType::Choice => rule
            .members
            .iter()
            .any(|member| has_immediate_left_recursion(member, target)),

        RuleType::Prec
        | RuleType::PrecLeft
        | RuleType::PrecRight
        | RuleType::PrecDynamic
        | RuleType::Field
        | RuleType::Alias => rule
            .content
            .as_deref()
            .is_some_and(|content| has_immediate_left_recursion(content, target)),

        _ => false,
    }
}

fn check_precedence(grammar: &Grammar) {
    for (rule_name, rule) in &grammar.rules {
        let mut levels = BTreeSet::new();
        rule.visit(&mut |r| levels.extend(r.precedence()));
        if levels.len() > 1 {
            warn!(
                grammar = %grammar.name,
                rule = %rule_name,
                ?levels,
                "rule has multiple precedence levels"
            );
        }
    }
}
