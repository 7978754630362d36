//! The model-config document: typed tree loaded from a YAML/JSON file (spec
//! §3 "Model-config document", §6 "Model-config file format").

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocType {
    Generator,
    Tts,
    Asr,
    Realtime,
    Segmentor,
    Labeler,
    Profiler,
}

impl DocType {
    fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw {
            "generator" => Ok(DocType::Generator),
            "tts" => Ok(DocType::Tts),
            "asr" => Ok(DocType::Asr),
            "realtime" => Ok(DocType::Realtime),
            "segmentor" => Ok(DocType::Segmentor),
            "labeler" => Ok(DocType::Labeler),
            "profiler" => Ok(DocType::Profiler),
            other => Err(ConfigError::InvalidEnum {
                field: "type",
                value: other.to_string(),
            }),
        }
    }
}

/// Per-registration generator/model entry (spec §3 "models[]").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    /// The symbolic registration name, e.g. `qwen/turbo`.
    pub name: String,
    /// The backend model id passed to the provider.
    pub model: String,
    #[serde(default)]
    pub support_json_output: bool,
    #[serde(default)]
    pub support_tool_calls: bool,
    #[serde(default)]
    pub support_text_only: bool,
    #[serde(default)]
    pub use_system_role: bool,
    #[serde(default)]
    pub extra_fields: Map<String, Value>,
}

/// Per-registration TTS voice entry (spec §3 "voices[]").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoiceEntry {
    pub name: String,
    pub voice: String,
    #[serde(default)]
    pub extra_fields: Map<String, Value>,
}

/// Wire shape as read straight off disk (after YAML→JSON conversion),
/// before credential expansion or schema/kind resolution.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawModelConfigDoc {
    #[serde(default)]
    pub schema: Option<String>,
    #[serde(rename = "type", default)]
    pub doc_type: Option<String>,
    /// Legacy discriminator: `"openai"` or `"gemini"` (spec §6 "Legacy
    /// form"). Always implies `type = generator`.
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub models: Vec<ModelEntry>,
    #[serde(default)]
    pub voices: Vec<VoiceEntry>,
    #[serde(default)]
    pub default_params: Map<String, Value>,
    #[serde(default)]
    pub verbose: bool,
}

/// A model-config document after schema/kind resolution and credential
/// expansion (spec §3, §4.2 steps 2-3).
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfigDoc {
    pub schema: String,
    pub doc_type: DocType,
    pub provider: String,
    pub api_key: String,
    pub app_id: String,
    pub token: String,
    pub base_url: String,
    pub models: Vec<ModelEntry>,
    pub voices: Vec<VoiceEntry>,
    pub default_params: Map<String, Value>,
    pub verbose: bool,
    /// False when a credential field that was present in the raw document
    /// expanded to the empty string (spec §3, §4.2 step 2: "silently
    /// skipped"). The loader checks this rather than erroring.
    pub credentials_satisfied: bool,
}

impl ModelConfigDoc {
    pub fn from_raw(raw: RawModelConfigDoc, expand: impl Fn(&str) -> String) -> Result<Self, ConfigError> {
        let (schema, doc_type) = match (&raw.schema, &raw.kind) {
            (Some(schema), _) => {
                let doc_type_str = raw
                    .doc_type
                    .as_deref()
                    .ok_or(ConfigError::MissingField("type"))?;
                (schema.clone(), DocType::parse(doc_type_str)?)
            }
            (None, Some(kind)) => {
                if kind != "openai" && kind != "gemini" {
                    return Err(ConfigError::InvalidEnum {
                        field: "kind",
                        value: kind.clone(),
                    });
                }
                (format!("{kind}/legacy/v1"), DocType::Generator)
            }
            (None, None) => return Err(ConfigError::MissingField("schema")),
        };
        let provider = schema.split('/').next().unwrap_or(&schema).to_string();

        let mut credentials_satisfied = true;
        let mut expand_credential = |field: &Option<String>| -> String {
            match field {
                None => String::new(),
                Some(raw_value) => {
                    let expanded = expand(raw_value);
                    if expanded.is_empty() {
                        credentials_satisfied = false;
                    }
                    expanded
                }
            }
        };
        let api_key = expand_credential(&raw.api_key);
        let app_id = expand_credential(&raw.app_id);
        let token = expand_credential(&raw.token);
        let base_url = expand_credential(&raw.base_url);

        Ok(ModelConfigDoc {
            schema,
            doc_type,
            provider,
            api_key,
            app_id,
            token,
            base_url,
            models: raw.models,
            voices: raw.voices,
            default_params: raw.default_params,
            verbose: raw.verbose,
            credentials_satisfied,
        })
    }
}
