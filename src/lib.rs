pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{hltb::HltbClient, steam::SteamLibraryClient, storage::LocalStorage};
pub use app::pipelines::SteamPipeline;
pub use config::RunConfig;
pub use crate::core::{etl::EtlEngine, resolver::DurationResolver};
pub use utils::error::{Result, SorterError};
