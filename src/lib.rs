pub mod config;
pub mod core;
pub mod domain;
pub mod server;
pub mod utils;

pub use config::{toml_config::TomlConfig, CliConfig};
pub use crate::core::{etl::ParseEngine, pipeline::CasparserPipeline};
pub use domain::model::{Fund, ParsedData, Transaction};
pub use server::{build_router, start_server, AppState};
pub use utils::error::{CasError, Result};
