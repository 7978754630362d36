//! Model-config documents: declarative YAML/JSON records that drive
//! registry registration (spec §3, §4.2, §6).

mod env;
mod error;
mod loader;
mod schema;

pub use env::{expand, expand_from_process_env};
pub use error::ConfigError;
pub use loader::{load_from_dir, Registrar};
pub use schema::{DocType, ModelConfigDoc, ModelEntry, RawModelConfigDoc, VoiceEntry};
