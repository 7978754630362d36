//! Pre-parsed jq expressions (spec §3 "pre-parsed during deserialization",
//! §9 "Pre-parsed jq expressions").
//!
//! A [`JqExpr`] parses its source at deserialization time so that an invalid
//! expression fails config validation immediately rather than on first use,
//! and keeps the parsed filter around for hot-path reuse. The source text is
//! kept alongside the parsed form purely so the expression can be
//! re-serialized byte-for-byte.

use std::sync::Arc;

use jaq_core::load::{Arena, File, Loader};
use jaq_core::{Compiler, Ctx, Native, RcIter};
use jaq_json::Val;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Clone)]
pub struct JqExpr {
    source: String,
    compiled: Arc<jaq_core::Filter<Native<Val>>>,
}

impl std::fmt::Debug for JqExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JqExpr").field("source", &self.source).finish()
    }
}

impl PartialEq for JqExpr {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl JqExpr {
    /// Parses and compiles `source`, failing config validation at load time
    /// (spec §7 "Config errors: ... invalid jq").
    pub fn parse(source: &str) -> Result<Self, String> {
        let program = File {
            code: source,
            path: (),
        };
        let arena = Arena::default();
        let loader = Loader::new(jaq_std::defs().chain(jaq_json::defs()));
        let modules = loader
            .load(&arena, program)
            .map_err(|errs| format!("jq parse error in {source:?}: {errs:?}"))?;
        let compiled = Compiler::default()
            .with_funs(jaq_std::funs().chain(jaq_json::funs()))
            .compile(modules)
            .map_err(|errs| format!("jq compile error in {source:?}: {errs:?}"))?;
        Ok(JqExpr {
            source: source.to_string(),
            compiled: Arc::new(compiled),
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Runs the expression against `input`, returning every emitted output
    /// (a jq filter can emit zero, one, or many values).
    pub fn run(&self, input: Value) -> Result<Vec<Value>, String> {
        let inputs = RcIter::new(core::iter::empty());
        let ctx = Ctx::new([], &inputs);
        let mut out = Vec::new();
        for result in self.compiled.run((ctx, Val::from(input))) {
            let val = result.map_err(|e| format!("jq runtime error: {e:?}"))?;
            out.push(val.into());
        }
        Ok(out)
    }
}

impl Serialize for JqExpr {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.source)
    }
}

impl<'de> Deserialize<'de> for JqExpr {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        JqExpr::parse(&s).map_err(serde::de::Error::custom)
    }
}
