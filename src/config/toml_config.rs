use crate::config::{DEFAULT_FILMS_ENDPOINT, DEFAULT_STARSHIPS_ENDPOINT, OUTPUT_FORMATS};
use crate::core::fetcher::DEFAULT_PAGE_SIZE;
use crate::core::ConfigProvider;
use crate::domain::model::{Margins, Viewport};
use crate::utils::error::{Result, ScatterError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub filters: FiltersConfig,
    pub output: OutputConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub films_endpoint: Option<String>,
    pub starships_endpoint: Option<String>,
    pub page_size: Option<usize>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewportConfig {
    pub width: f64,
    pub height: f64,
    pub margins: Option<Margins>,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 600.0,
            margins: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FiltersConfig {
    #[serde(default)]
    pub films: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
}

fn default_formats() -> Vec<String> {
    OUTPUT_FORMATS.iter().map(|f| f.to_string()).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `compact` (default) or `json`
    pub format: Option<String>,
    pub verbose: Option<bool>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ScatterError::Config {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ScatterError::Config {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// A config pointing at the public catalog, used when no file is given.
    pub fn with_defaults(output_path: &str) -> Self {
        Self {
            source: SourceConfig {
                films_endpoint: Some(DEFAULT_FILMS_ENDPOINT.to_string()),
                starships_endpoint: Some(DEFAULT_STARSHIPS_ENDPOINT.to_string()),
                page_size: None,
                timeout_seconds: None,
            },
            viewport: ViewportConfig::default(),
            filters: FiltersConfig::default(),
            output: OutputConfig {
                path: output_path.to_string(),
                formats: default_formats(),
            },
            logging: None,
        }
    }

    pub fn json_logging(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.format.as_deref())
            .map(|f| f.eq_ignore_ascii_case("json"))
            .unwrap_or(false)
    }

    pub fn verbose_logging(&self) -> bool {
        self.logging
            .as_ref()
            .and_then(|l| l.verbose)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn films_endpoint(&self) -> &str {
        self.source.films_endpoint.as_deref().unwrap_or_default()
    }

    fn starships_endpoint(&self) -> &str {
        self.source.starships_endpoint.as_deref().unwrap_or_default()
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn page_size(&self) -> usize {
        self.source.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.source
            .timeout_seconds
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport.width, self.viewport.height)
    }

    fn margins(&self) -> Margins {
        self.viewport.margins.unwrap_or_default()
    }

    fn selected_films(&self) -> &[String] {
        &self.filters.films
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        let films = validation::validate_required_field("source.films_endpoint", &self.source.films_endpoint)?;
        validation::validate_url("source.films_endpoint", films)?;
        let starships =
            validation::validate_required_field("source.starships_endpoint", &self.source.starships_endpoint)?;
        validation::validate_url("source.starships_endpoint", starships)?;

        validation::validate_positive_number("source.page_size", self.page_size(), 1)?;
        validation::validate_path("output.path", &self.output.path)?;
        validation::validate_output_formats("output.formats", &self.output.formats, &OUTPUT_FORMATS)?;

        let margins = self.margins();
        validation::validate_viewport(self.viewport.width, self.viewport.height, margins.left, margins.bottom)?;

        if let Some(format) = self.logging.as_ref().and_then(|l| l.format.as_deref()) {
            if !matches!(format.to_ascii_lowercase().as_str(), "compact" | "json") {
                return Err(ScatterError::InvalidConfigValue {
                    field: "logging.format".to_string(),
                    value: format.to_string(),
                    reason: "Valid formats: compact, json".to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[source]
films_endpoint = "https://swapi.dev/api/films"
starships_endpoint = "https://swapi.dev/api/starships/"
page_size = 10
timeout_seconds = 15

[viewport]
width = 1024
height = 768

[filters]
films = ["4", "https://swapi.dev/api/films/2/"]

[output]
path = "./test-output"
formats = ["svg"]
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = TomlConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.films_endpoint(), "https://swapi.dev/api/films");
        assert_eq!(config.page_size(), 10);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.viewport(), Viewport::new(1024.0, 768.0));
        assert_eq!(config.margins(), Margins::default());
        assert_eq!(config.selected_films().len(), 2);
        assert_eq!(config.output_formats(), ["svg"]);
        assert!(!config.json_logging());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_optional_sections_default() {
        let config = TomlConfig::from_toml_str(
            r#"
[source]
films_endpoint = "http://localhost:8080/films"
starships_endpoint = "http://localhost:8080/starships/"

[output]
path = "./out"

[logging]
format = "json"
"#,
        )
        .unwrap();

        assert_eq!(config.viewport(), Viewport::new(960.0, 600.0));
        assert!(config.selected_films().is_empty());
        assert_eq!(config.output_formats(), ["svg", "json"]);
        assert_eq!(config.page_size(), DEFAULT_PAGE_SIZE);
        assert!(config.json_logging());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("STARSHIP_SCATTER_TEST_HOST", "https://catalog.test");

        let config = TomlConfig::from_toml_str(
            r#"
[source]
films_endpoint = "${STARSHIP_SCATTER_TEST_HOST}/films"
starships_endpoint = "${STARSHIP_SCATTER_TEST_HOST}/starships/"

[output]
path = "./output"
"#,
        )
        .unwrap();
        assert_eq!(config.films_endpoint(), "https://catalog.test/films");

        std::env::remove_var("STARSHIP_SCATTER_TEST_HOST");
    }

    #[test]
    fn test_missing_endpoint_fails_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[source]
starships_endpoint = "https://swapi.dev/api/starships/"

[output]
path = "./output"
"#,
        )
        .unwrap();

        assert!(matches!(
            config.validate(),
            Err(ScatterError::MissingConfig { .. })
        ));
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let mut config = TomlConfig::with_defaults("./output");
        config.source.films_endpoint = Some("invalid-url".to_string());
        assert!(config.validate().is_err());

        let mut config = TomlConfig::with_defaults("./output");
        config.viewport.margins = Some(Margins {
            top: 0.0,
            bottom: 700.0,
            left: 40.0,
            right: 0.0,
        });
        assert!(config.validate().is_err());

        let mut config = TomlConfig::with_defaults("./output");
        config.logging = Some(LoggingConfig {
            format: Some("xml".to_string()),
            verbose: None,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        assert!(matches!(
            TomlConfig::from_toml_str("[source"),
            Err(ScatterError::Config { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.output_path(), "./test-output");
    }
}
