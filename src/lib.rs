pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};

pub use self::core::{
    explorer::ExplorerEngine,
    fetcher::PaginatedFetcher,
    filter::{filtered_data, FilterEngine, FilterSet},
    normalize::normalize,
    projection::{compute_scales, ScatterProjector},
    store::{FetchOutcome, FilmCatalog, StarshipStore},
    tooltip::TooltipPlacer,
};
pub use utils::error::{Result, ScatterError};
