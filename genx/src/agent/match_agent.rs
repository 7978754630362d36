//! Match agent runtime: rule-based routing to a sub-agent (spec §4.4).
//!
//! Rule pattern semantics are left unspecified beyond "named rule evaluates
//! to matched/not-matched" (see DESIGN.md Open Questions); this module
//! evaluates rules through a pluggable [`RuleEvaluator`] so the matching
//! language itself stays out of the routing algorithm.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;

use crate::agentcfg::{AgentDef, AgentRef, MatchAgentDef, RefOrInline};

use super::error::AgentError;
use super::state::{AgentState, RuleMatch};

/// Evaluates one rule's pattern against the router's input text.
pub trait RuleEvaluator: Send + Sync {
    fn evaluate(&self, pattern: &str, input: &str) -> bool;
}

/// Default evaluator: a rule matches when its pattern occurs as a
/// case-insensitive substring of the input. Simple, total, and good enough
/// until a richer predicate language is needed.
pub struct SubstringRuleEvaluator;

impl RuleEvaluator for SubstringRuleEvaluator {
    fn evaluate(&self, pattern: &str, input: &str) -> bool {
        input.to_lowercase().contains(&pattern.to_lowercase())
    }
}

/// A flat, exact-name registry of agent definitions (spec §3: agents are
/// named entities referenced by `$ref`, unlike the prefix-matched model
/// registrations in [`crate::registry::Mux`]).
#[derive(Default)]
pub struct AgentDefRegistry {
    entries: DashMap<String, Arc<AgentDef>>,
}

impl AgentDefRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, def: AgentDef) {
        self.entries.insert(def.name().to_string(), Arc::new(def));
    }

    pub fn resolve(&self, name: &str) -> Option<Arc<AgentDef>> {
        self.entries.get(name).map(|e| e.clone())
    }
}

/// Counts how many `match` levels deep `state` already is, so a caller about
/// to delegate one more level can check it against `max_depth` (spec §4.4
/// "Nesting", SPEC_FULL supplemental depth limit) without any separate
/// depth bookkeeping field on the state itself.
pub fn nesting_depth(state: &AgentState) -> u32 {
    match state {
        AgentState::Match { data, .. } => match &data.calling_state {
            Some(inner) => 1 + nesting_depth(inner),
            None => 0,
        },
        AgentState::React { .. } => 0,
    }
}

/// Drives one `match` agent definition's routing decision.
pub struct MatchRunner {
    def: Arc<MatchAgentDef>,
    evaluator: Arc<dyn RuleEvaluator>,
    agent_defs: Arc<AgentDefRegistry>,
    max_depth: u32,
}

impl MatchRunner {
    pub fn new(def: Arc<MatchAgentDef>, agent_defs: Arc<AgentDefRegistry>, max_depth: u32) -> Self {
        MatchRunner {
            def,
            evaluator: Arc::new(SubstringRuleEvaluator),
            agent_defs,
            max_depth,
        }
    }

    pub fn with_evaluator(mut self, evaluator: Arc<dyn RuleEvaluator>) -> Self {
        self.evaluator = evaluator;
        self
    }

    fn matched_rule_names(&self, input: &str) -> Vec<String> {
        self.def
            .rules
            .iter()
            .filter(|r| self.evaluator.evaluate(&r.pattern, input))
            .map(|r| r.name.clone())
            .collect()
    }

    /// Finds the first route whose rule set is a subset of the matched rule
    /// names, falling back to `default` (spec §4.4 step 2).
    fn select_route(&self, matched: &[String]) -> Option<&AgentRef> {
        let matched: std::collections::HashSet<&str> = matched.iter().map(String::as_str).collect();
        for route in &self.def.route {
            if route.rules.iter().all(|r| matched.contains(r.as_str())) {
                return Some(&route.agent);
            }
        }
        self.def.default.as_ref()
    }

    fn resolve_agent_def(&self, agent_ref: &AgentRef) -> Result<Arc<AgentDef>, AgentError> {
        match agent_ref {
            RefOrInline::Inline(boxed) => Ok(Arc::new((**boxed).clone())),
            RefOrInline::Ref { reference } => self
                .agent_defs
                .resolve(reference)
                .ok_or_else(|| AgentError::ResolutionError(reference.clone())),
        }
    }

    /// Evaluates rules, selects a route, and instantiates the chosen
    /// sub-agent's initial state as `calling_state` (spec §4.4 steps 1-3).
    /// Returns the resolved sub-agent definition so the caller can drive it
    /// (via [`super::react::ReActRunner`] or recursively via `MatchRunner`).
    pub fn route(&self, state: &mut AgentState) -> Result<Arc<AgentDef>, AgentError> {
        let depth = nesting_depth(state);
        if depth + 1 > self.max_depth {
            return Err(AgentError::DepthExceeded { limit: self.max_depth });
        }
        let AgentState::Match { common, data } = state else {
            return Err(AgentError::Validation(
                "MatchRunner::route called with non-match state".into(),
            ));
        };
        if data.matched {
            return Err(AgentError::Validation("route already selected".into()));
        }

        let matched_names = self.matched_rule_names(&data.input);
        let chosen = self.select_route(&matched_names).ok_or_else(|| {
            AgentError::Validation(format!(
                "match agent {:?}: no route matched and no default",
                self.def.name
            ))
        })?;
        let sub_def = self.resolve_agent_def(chosen)?;

        data.matches = matched_names
            .iter()
            .map(|name| RuleMatch {
                rule_name: name.clone(),
                agent_name: sub_def.name().to_string(),
            })
            .collect();

        let sub_id = format!("{}/{}", common.id, sub_def.name());
        let sub_state = match sub_def.as_ref() {
            AgentDef::React(_) => AgentState::new_react(sub_id, sub_def.name()),
            AgentDef::Match(_) => AgentState::new_match(sub_id, sub_def.name(), data.input.clone()),
        };
        data.calling_state = Some(Box::new(sub_state));
        data.matched = true;
        tracing::debug!(agent = %self.def.name, chosen = %sub_def.name(), "match: routed");
        Ok(sub_def)
    }

    /// True once the delegated sub-agent has reached a terminal state (spec
    /// §4.4: control returns to the caller once the sub-agent is `done`).
    pub fn is_done(state: &AgentState) -> bool {
        match state {
            AgentState::Match { data, .. } => match &data.calling_state {
                Some(inner) => Self::is_done(inner),
                None => false,
            },
            AgentState::React { data, .. } => data.finished,
        }
    }

    /// Name-keyed lookup of the rules a `match` agent declared, for callers
    /// that need to inspect rule definitions directly (e.g. a Labeler
    /// wiring rule names to registered labels).
    pub fn rule_index(&self) -> HashMap<&str, &str> {
        self.def
            .rules
            .iter()
            .map(|r| (r.name.as_str(), r.pattern.as_str()))
            .collect()
    }
}
