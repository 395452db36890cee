pub mod cli;
pub mod toml_config;

pub const DEFAULT_FILMS_ENDPOINT: &str = "https://swapi.dev/api/films";
pub const DEFAULT_STARSHIPS_ENDPOINT: &str = "https://swapi.dev/api/starships/";
pub const OUTPUT_FORMATS: [&str; 2] = ["svg", "json"];

#[cfg(feature = "cli")]
pub use self::args::CliConfig;

#[cfg(feature = "cli")]
mod args {
    use crate::core::ConfigProvider;
    use crate::domain::model::{Margins, Viewport};
    use crate::utils::error::Result;
    use crate::utils::validation::{self, Validate};
    use clap::Parser;
    use serde::{Deserialize, Serialize};
    use std::time::Duration;

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "starship-scatter")]
    #[command(about = "Plot catalog starships by length and head count, filtered by film")]
    pub struct CliConfig {
        #[arg(long, default_value = super::DEFAULT_FILMS_ENDPOINT)]
        pub films_endpoint: String,

        #[arg(long, default_value = super::DEFAULT_STARSHIPS_ENDPOINT)]
        pub starships_endpoint: String,

        #[arg(long, default_value = "./output")]
        pub output_path: String,

        /// Film to filter by: episode id, resource URL, or title (repeatable)
        #[arg(long = "film")]
        pub films: Vec<String>,

        #[arg(long, default_value = "960")]
        pub width: f64,

        #[arg(long, default_value = "600")]
        pub height: f64,

        #[arg(long, default_value = "10")]
        pub page_size: usize,

        #[arg(long, default_value = "30")]
        pub timeout_seconds: u64,

        #[arg(long = "format", value_delimiter = ',', default_value = "svg,json")]
        pub formats: Vec<String>,

        /// TOML configuration file; replaces every other option except --verbose
        #[arg(long)]
        pub config: Option<String>,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,
    }

    impl ConfigProvider for CliConfig {
        fn films_endpoint(&self) -> &str {
            &self.films_endpoint
        }

        fn starships_endpoint(&self) -> &str {
            &self.starships_endpoint
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn page_size(&self) -> usize {
            self.page_size
        }

        fn request_timeout(&self) -> Option<Duration> {
            (self.timeout_seconds > 0).then(|| Duration::from_secs(self.timeout_seconds))
        }

        fn viewport(&self) -> Viewport {
            Viewport::new(self.width, self.height)
        }

        fn margins(&self) -> Margins {
            Margins::default()
        }

        fn selected_films(&self) -> &[String] {
            &self.films
        }

        fn output_formats(&self) -> &[String] {
            &self.formats
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validation::validate_url("films_endpoint", &self.films_endpoint)?;
            validation::validate_url("starships_endpoint", &self.starships_endpoint)?;
            validation::validate_path("output_path", &self.output_path)?;
            validation::validate_positive_number("page_size", self.page_size, 1)?;
            let margins = self.margins();
            validation::validate_viewport(self.width, self.height, margins.left, margins.bottom)?;
            validation::validate_output_formats("format", &self.formats, &super::OUTPUT_FORMATS)?;
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_defaults() {
            let config = CliConfig::parse_from(["starship-scatter"]);
            assert_eq!(config.films_endpoint, "https://swapi.dev/api/films");
            assert_eq!(config.page_size, 10);
            assert_eq!(config.formats, vec!["svg", "json"]);
            assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
            assert!(config.validate().is_ok());
        }

        #[test]
        fn test_repeated_films_and_formats() {
            let config = CliConfig::parse_from([
                "starship-scatter",
                "--film",
                "4",
                "--film",
                "https://swapi.dev/api/films/2/",
                "--format",
                "json",
                "--timeout-seconds",
                "0",
            ]);
            assert_eq!(config.selected_films(), ["4", "https://swapi.dev/api/films/2/"]);
            assert_eq!(config.output_formats(), ["json"]);
            assert_eq!(config.request_timeout(), None);
        }

        #[test]
        fn test_rejects_bad_values() {
            let config = CliConfig::parse_from(["starship-scatter", "--page-size", "0"]);
            assert!(config.validate().is_err());

            let config = CliConfig::parse_from(["starship-scatter", "--format", "png"]);
            assert!(config.validate().is_err());

            let config = CliConfig::parse_from(["starship-scatter", "--width", "30"]);
            assert!(config.validate().is_err());
        }
    }
}
