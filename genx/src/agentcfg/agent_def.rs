//! Agent definitions (spec §3 "Agent", §4.3, §4.4).
//!
//! An agent is either `react` (tool-use loop against a single generator) or
//! `match` (route input to a sub-agent by rule). Both share a name, a
//! prompt, a list of context layers, and a generator.

use serde::{Deserialize, Serialize};

use super::refs::{AgentRef, GeneratorRef};
use super::tool::ToolDef;
use super::ContextLayer;

/// A named predicate evaluated against the agent's input text. Rule pattern
/// semantics are intentionally opaque at this layer (see DESIGN.md): the
/// spec leaves the matching language unspecified beyond "named rule
/// evaluates to matched/not-matched", so a rule's `pattern` is stored as raw
/// source text and interpreted by whatever `Labeler`/`Profiler` the rule
/// names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub pattern: String,
}

/// One routing entry: a set of rule names that must ALL have matched, mapped
/// to the sub-agent that should handle the input (spec §4.4 step 2: "find
/// the first route whose rule set is a subset of the matched rule names").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub rules: Vec<String>,
    pub agent: AgentRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactAgentDef {
    pub name: String,
    pub prompt: String,
    #[serde(default)]
    pub context_layers: Vec<ContextLayer>,
    pub generator: GeneratorRef,
    #[serde(default)]
    pub tools: Vec<ToolDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchAgentDef {
    pub name: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub context_layers: Vec<ContextLayer>,
    pub generator: GeneratorRef,
    pub rules: Vec<Rule>,
    pub route: Vec<Route>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<AgentRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AgentDef {
    React(ReactAgentDef),
    Match(MatchAgentDef),
}

impl AgentDef {
    pub fn name(&self) -> &str {
        match self {
            AgentDef::React(d) => &d.name,
            AgentDef::Match(d) => &d.name,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        match self {
            AgentDef::React(d) => {
                for tool in &d.tools {
                    tool.validate()?;
                }
                Ok(())
            }
            AgentDef::Match(d) => {
                let rule_names: std::collections::HashSet<&str> =
                    d.rules.iter().map(|r| r.name.as_str()).collect();
                for route in &d.route {
                    for rule in &route.rules {
                        if !rule_names.contains(rule.as_str()) {
                            return Err(format!(
                                "match agent {:?}: route references unknown rule {:?}",
                                d.name, rule
                            ));
                        }
                    }
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agentcfg::refs::RefOrInline;

    #[test]
    fn react_agent_roundtrips() {
        let def = AgentDef::React(ReactAgentDef {
            name: "weather".into(),
            prompt: "You are a weather bot.".into(),
            context_layers: Vec::new(),
            generator: GeneratorRef::Inline("qwen/turbo".into()),
            tools: Vec::new(),
        });
        let json = serde_json::to_string(&def).unwrap();
        let back: AgentDef = serde_json::from_str(&json).unwrap();
        assert_eq!(def, back);
        assert_eq!(def.name(), "weather");
    }

    #[test]
    fn match_agent_rejects_route_with_unknown_rule() {
        let def = AgentDef::Match(MatchAgentDef {
            name: "router".into(),
            prompt: String::new(),
            context_layers: Vec::new(),
            generator: GeneratorRef::Inline("qwen/turbo".into()),
            rules: vec![Rule {
                name: "is_weather".into(),
                pattern: "weather".into(),
            }],
            route: vec![Route {
                rules: vec!["is_billing".into()],
                agent: RefOrInline::Ref {
                    reference: "agent:billing".into(),
                },
            }],
            default: None,
        });
        assert!(def.validate().is_err());
    }

    #[test]
    fn match_agent_accepts_known_rule_routes() {
        let def = AgentDef::Match(MatchAgentDef {
            name: "router".into(),
            prompt: String::new(),
            context_layers: Vec::new(),
            generator: GeneratorRef::Inline("qwen/turbo".into()),
            rules: vec![Rule {
                name: "is_weather".into(),
                pattern: "weather".into(),
            }],
            route: vec![Route {
                rules: vec!["is_weather".into()],
                agent: RefOrInline::Ref {
                    reference: "agent:weather".into(),
                },
            }],
            default: None,
        });
        assert!(def.validate().is_ok());
    }
}
