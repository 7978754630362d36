//! Tool definitions (spec §3 "Tool", §4.3, §9).
//!
//! A tool is a sum type over five shapes: a built-in host capability, an HTTP
//! call, a generator invocation, a composite pipeline of steps, or a text
//! processor. Each carries whatever pre-parsed/validated form it needs so
//! `react.rs` never has to re-derive it on the hot path.

use serde::{Deserialize, Serialize};

use super::jq::JqExpr;
use super::jsonschema::JsonSchema;
use super::refs::ToolRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HttpAuth {
    Bearer { token: String },
    Basic { username: String, password: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuiltInTool {
    pub name: String,
    pub description: String,
    pub params_schema: JsonSchema,
    #[serde(default)]
    pub quit: bool,
}

fn default_max_response_size_mb() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpTool {
    pub name: String,
    pub description: String,
    pub method: HttpMethod,
    pub endpoint: String,
    #[serde(default)]
    pub headers: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<HttpAuth>,
    pub params_schema: JsonSchema,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_jq: Option<JqExpr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_jq: Option<JqExpr>,
    #[serde(default = "default_max_response_size_mb")]
    pub max_response_size_mb: u32,
    #[serde(default)]
    pub quit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolGenerateMode {
    Generate,
    JsonOutput,
}

/// A tool backed by a generator call (spec §3: "Generator (model
/// registration name, mode generate|json_output, optional prompt +
/// context_layers, output_schema required iff json_output)").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorTool {
    pub name: String,
    pub model: String,
    pub mode: ToolGenerateMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default)]
    pub context_layers: Vec<super::context_layer::ContextLayer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<JsonSchema>,
    #[serde(default)]
    pub quit: bool,
}

impl GeneratorTool {
    fn validate(&self) -> Result<(), String> {
        if self.mode == ToolGenerateMode::JsonOutput && self.output_schema.is_none() {
            return Err(format!(
                "generator tool {:?}: output_schema is required when mode is json_output",
                self.name
            ));
        }
        Ok(())
    }
}

/// A text-processing tool: like a generator tool but the caller passes
/// opaque `content` rather than a JSON-schema-shaped arguments object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextProcessorTool {
    pub name: String,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default)]
    pub context_layers: Vec<super::context_layer::ContextLayer>,
    #[serde(default)]
    pub quit: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeStep {
    pub id: String,
    pub tool: ToolRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_jq: Option<JqExpr>,
}

/// A sequential pipeline of other tools (spec §3/§9 "Composite").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeTool {
    pub name: String,
    pub description: String,
    pub steps: Vec<CompositeStep>,
    #[serde(default)]
    pub quit: bool,
}

impl CompositeTool {
    fn validate(&self) -> Result<(), String> {
        let mut seen = std::collections::HashSet::new();
        for step in &self.steps {
            if !seen.insert(step.id.as_str()) {
                return Err(format!(
                    "composite tool {:?}: duplicate step id {:?}",
                    self.name, step.id
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToolDef {
    BuiltIn(BuiltInTool),
    Http(HttpTool),
    Generator(GeneratorTool),
    Composite(CompositeTool),
    TextProcessor(TextProcessorTool),
}

impl ToolDef {
    pub fn name(&self) -> &str {
        match self {
            ToolDef::BuiltIn(t) => &t.name,
            ToolDef::Http(t) => &t.name,
            ToolDef::Generator(t) => &t.name,
            ToolDef::Composite(t) => &t.name,
            ToolDef::TextProcessor(t) => &t.name,
        }
    }

    pub fn quit(&self) -> bool {
        match self {
            ToolDef::BuiltIn(t) => t.quit,
            ToolDef::Http(t) => t.quit,
            ToolDef::Generator(t) => t.quit,
            ToolDef::Composite(t) => t.quit,
            ToolDef::TextProcessor(_) => false,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        match self {
            ToolDef::Generator(t) => t.validate(),
            ToolDef::Composite(t) => t.validate(),
            _ => Ok(()),
        }
    }

    /// Renders the function-calling schema entry a generator expects
    /// (spec §4.3: tools are offered to the generator as a JSON-schema
    /// function list each step).
    pub fn to_json_schema_entry(&self) -> serde_json::Value {
        let (description, params): (&str, serde_json::Value) = match self {
            ToolDef::BuiltIn(t) => (&t.description, t.params_schema.canonical()),
            ToolDef::Http(t) => (&t.description, t.params_schema.canonical()),
            ToolDef::Composite(t) => (&t.description, serde_json::json!({"type": "object"})),
            ToolDef::Generator(t) => (
                t.prompt.as_deref().unwrap_or(""),
                t.output_schema
                    .as_ref()
                    .map(JsonSchema::canonical)
                    .unwrap_or_else(|| serde_json::json!({"type": "object"})),
            ),
            ToolDef::TextProcessor(t) => (
                t.prompt.as_deref().unwrap_or(""),
                serde_json::json!({"type": "string"}),
            ),
        };
        serde_json::json!({
            "name": self.name(),
            "description": description,
            "parameters": params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> JsonSchema {
        JsonSchema::from_value(serde_json::json!({"type": "object"})).unwrap()
    }

    #[test]
    fn generator_tool_requires_output_schema_for_json_output() {
        let tool = GeneratorTool {
            name: "classify".into(),
            model: "qwen/turbo".into(),
            mode: ToolGenerateMode::JsonOutput,
            prompt: None,
            context_layers: Vec::new(),
            output_schema: None,
            quit: false,
        };
        assert!(ToolDef::Generator(tool).validate().is_err());
    }

    #[test]
    fn generate_mode_without_schema_is_fine() {
        let tool = GeneratorTool {
            name: "chat".into(),
            model: "qwen/turbo".into(),
            mode: ToolGenerateMode::Generate,
            prompt: None,
            context_layers: Vec::new(),
            output_schema: None,
            quit: false,
        };
        assert!(ToolDef::Generator(tool).validate().is_ok());
    }

    #[test]
    fn composite_rejects_duplicate_step_ids() {
        let tool = CompositeTool {
            name: "pipeline".into(),
            description: "d".into(),
            steps: vec![
                CompositeStep {
                    id: "a".into(),
                    tool: ToolRef::Ref {
                        reference: "tool:x".into(),
                    },
                    input_jq: None,
                },
                CompositeStep {
                    id: "a".into(),
                    tool: ToolRef::Ref {
                        reference: "tool:y".into(),
                    },
                    input_jq: None,
                },
            ],
            quit: false,
        };
        assert!(ToolDef::Composite(tool).validate().is_err());
    }

    #[test]
    fn name_and_quit_dispatch_by_variant() {
        let tool = ToolDef::BuiltIn(BuiltInTool {
            name: "halt".into(),
            description: "stop".into(),
            params_schema: schema(),
            quit: true,
        });
        assert_eq!(tool.name(), "halt");
        assert!(tool.quit());
    }

    #[test]
    fn json_schema_entry_roundtrips_through_serde() {
        let tool = ToolDef::BuiltIn(BuiltInTool {
            name: "search".into(),
            description: "search the web".into(),
            params_schema: schema(),
            quit: false,
        });
        let json = serde_json::to_string(&tool).unwrap();
        let back: ToolDef = serde_json::from_str(&json).unwrap();
        assert_eq!(tool, back);
        assert_eq!(tool.to_json_schema_entry()["name"], "search");
    }
}
