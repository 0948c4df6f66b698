pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{http::SplynxClient, storage::LocalStorage};
pub use app::pipelines::ShaperPipeline;
pub use config::ShaperConfig;
pub use crate::core::etl::EtlEngine;
pub use utils::error::{EtlError, Result};
