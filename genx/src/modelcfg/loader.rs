//! Config loader: walks a directory of model-config documents and dispatches
//! each to a registrar (spec §4.2).
//!
//! Concrete provider clients (OpenAI, Gemini, DashScope, …) are out of scope
//! (spec §1); this module only owns the walk, parse, credential-expansion,
//! and dispatch-by-type steps, handing each resolved [`ModelConfigDoc`] to a
//! host-supplied [`Registrar`].

use std::path::Path;

use super::env::expand_from_process_env;
use super::error::ConfigError;
use super::schema::{DocType, ModelConfigDoc, RawModelConfigDoc};

/// What a concrete document dispatch produces: the registration names that
/// became resolvable as a result (spec §4.2 "Returns the aggregate list of
/// registered names").
pub trait Registrar {
    fn register_generator(&self, doc: &ModelConfigDoc) -> Result<Vec<String>, ConfigError>;
    fn register_tts(&self, doc: &ModelConfigDoc) -> Result<Vec<String>, ConfigError>;
    fn register_asr(&self, doc: &ModelConfigDoc) -> Result<Vec<String>, ConfigError>;
    fn register_segmentor(&self, doc: &ModelConfigDoc) -> Result<Vec<String>, ConfigError>;
    fn register_labeler(&self, doc: &ModelConfigDoc) -> Result<Vec<String>, ConfigError>;
    fn register_profiler(&self, doc: &ModelConfigDoc) -> Result<Vec<String>, ConfigError>;
}

fn parse_document(path: &Path, text: &str) -> Result<RawModelConfigDoc, ConfigError> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let value: serde_json::Value = match ext {
        "yaml" | "yml" => {
            serde_yaml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?
        }
        _ => serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?,
    };
    serde_json::from_value(value).map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Walks `dir` for `*.json`/`*.yaml`/`*.yml` files, parses and dispatches
/// each (spec §4.2). A document-level error (bad schema, unknown type, …) is
/// logged and that document is skipped; the walk continues. An empty
/// required credential is not an error at all — it is the documented silent
/// skip (spec §3, scenario 1).
pub fn load_from_dir(dir: &Path, registrar: &dyn Registrar) -> Result<Vec<String>, ConfigError> {
    let mut names = Vec::new();
    for entry in walkdir::WalkDir::new(dir).into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        if !matches!(ext, "json" | "yaml" | "yml") {
            continue;
        }
        let text = match std::fs::read_to_string(path) {
            Ok(t) => t,
            Err(source) => {
                tracing::warn!(path = %path.display(), error = %source, "modelcfg: read failed, skipping");
                continue;
            }
        };
        let raw = match parse_document(path, &text) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "modelcfg: parse failed, skipping document");
                continue;
            }
        };
        let doc = match ModelConfigDoc::from_raw(raw, expand_from_process_env) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "modelcfg: invalid document, skipping");
                continue;
            }
        };
        if !doc.credentials_satisfied {
            tracing::debug!(path = %path.display(), schema = %doc.schema, "modelcfg: credential unset, silently skipping");
            continue;
        }
        let dispatched = match doc.doc_type {
            DocType::Generator | DocType::Realtime => registrar.register_generator(&doc),
            DocType::Tts => registrar.register_tts(&doc),
            DocType::Asr => registrar.register_asr(&doc),
            DocType::Segmentor => registrar.register_segmentor(&doc),
            DocType::Labeler => registrar.register_labeler(&doc),
            DocType::Profiler => registrar.register_profiler(&doc),
        };
        match dispatched {
            Ok(mut registered) => {
                tracing::info!(path = %path.display(), count = registered.len(), "modelcfg: registered");
                names.append(&mut registered);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "modelcfg: registration failed, skipping document");
            }
        }
    }
    Ok(names)
}
