// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Topological sort of a rule set by explicit `after:` edges (C4).

use std::collections::HashMap;

use bp_core::Rule;
use bp_handlers::AnyHandler;

use crate::error::ResolveError;

/// The key a rule is addressable by: its explicit `id`, or else its
/// handler's `dependency-key()`.
fn rule_key(rule: &Rule) -> String {
    match &rule.id {
        Some(id) => id.clone(),
        None => AnyHandler::for_rule(rule).dependency_key(),
    }
}

/// Orders `rules` so that for any dependency edge R2 `after:` R1, R1
/// appears before R2. Rules with no mutual dependency keep their
/// relative input order.
pub fn resolve(rules: &[Rule]) -> Result<Vec<Rule>, ResolveError> {
    let keys: Vec<String> = rules.iter().map(rule_key).collect();

    let mut by_id: HashMap<&str, usize> = HashMap::new();
    let mut by_secondary: HashMap<&str, usize> = HashMap::new();
    for (i, rule) in rules.iter().enumerate() {
        if let Some(id) = &rule.id {
            by_id.entry(id.as_str()).or_insert(i);
        }
        by_secondary.entry(keys[i].as_str()).or_insert(i);
    }

    let resolve_dep = |dep: &str| -> Option<usize> {
        by_id.get(dep).or_else(|| by_secondary.get(dep)).copied()
    };

    let mut visited = vec![false; rules.len()];
    let mut on_stack = vec![false; rules.len()];
    let mut order = Vec::with_capacity(rules.len());

    fn visit(
        i: usize,
        rules: &[Rule],
        keys: &[String],
        resolve_dep: &dyn Fn(&str) -> Option<usize>,
        visited: &mut [bool],
        on_stack: &mut [bool],
        order: &mut Vec<usize>,
    ) -> Result<(), ResolveError> {
        if on_stack[i] {
            return Err(ResolveError::CyclicDependency(keys[i].clone()));
        }
        if visited[i] {
            return Ok(());
        }
        on_stack[i] = true;
        for dep in &rules[i].after {
            if let Some(dep_idx) = resolve_dep(dep) {
                visit(dep_idx, rules, keys, resolve_dep, visited, on_stack, order)?;
            }
        }
        on_stack[i] = false;
        visited[i] = true;
        order.push(i);
        Ok(())
    }

    for i in 0..rules.len() {
        visit(i, rules, &keys, &resolve_dep, &mut visited, &mut on_stack, &mut order)?;
    }

    Ok(order.into_iter().map(|i| rules[i].clone()).collect())
}
