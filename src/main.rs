use clap::Parser;
use starship_scatter::core::ConfigProvider;
use starship_scatter::utils::error::ErrorSeverity;
use starship_scatter::utils::{logger, validation::Validate};
use starship_scatter::{CliConfig, ExplorerEngine, LocalStorage, TomlConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    match cli.config.clone() {
        Some(path) => {
            let config = match TomlConfig::from_file(&path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            };
            let verbose = cli.verbose || config.verbose_logging();
            if config.json_logging() {
                logger::init_json_logger(verbose);
            } else {
                logger::init_cli_logger(verbose);
            }
            tracing::info!("📁 Loaded configuration from {}", path);
            run(config).await;
        }
        None => {
            logger::init_cli_logger(cli.verbose);
            if cli.verbose {
                tracing::debug!("CLI config: {:?}", cli);
            }
            run(cli).await;
        }
    }

    Ok(())
}

async fn run<C: ConfigProvider + Validate>(config: C) {
    tracing::info!("Starting starship-scatter");

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let engine = ExplorerEngine::new(storage, config);

    match engine.run().await {
        Ok(output_path) => {
            print_films(&engine);
            println!(
                "✅ Plotted {} starships",
                engine.filtered_starships().len()
            );
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}

fn print_films<S, C>(engine: &ExplorerEngine<S, C>)
where
    S: starship_scatter::core::Storage,
    C: ConfigProvider,
{
    let films = engine.films().data();
    if films.is_empty() {
        return;
    }

    let endpoint = engine.films().endpoint();
    println!("🎬 Films:");
    for film in films.iter() {
        let marker = if engine.filters().is_active(&film.resource_url(endpoint)) {
            "[x]"
        } else {
            "[ ]"
        };
        let year = film
            .release_year()
            .map(|y| y.to_string())
            .unwrap_or_else(|| "----".to_string());
        println!("  {} {:>2}  {} ({})", marker, film.id, film.title, year);
    }
}
