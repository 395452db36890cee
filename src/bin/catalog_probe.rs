use clap::Parser;
use starship_scatter::core::fetcher::{remaining_pages, PaginatedFetcher, DEFAULT_PAGE_SIZE};
use starship_scatter::utils::logger;
use starship_scatter::utils::validation::validate_url;
use std::time::Duration;

/// Fetches every page of one catalog resource and reports what came back.
#[derive(Parser)]
#[command(name = "catalog_probe")]
struct Args {
    /// Paginated catalog endpoint, e.g. https://swapi.dev/api/planets/
    endpoint: String,

    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: usize,

    #[arg(long, default_value = "30")]
    timeout_seconds: u64,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    validate_url("endpoint", &args.endpoint)?;

    let fetcher = PaginatedFetcher::new(args.page_size)
        .with_timeout(Some(Duration::from_secs(args.timeout_seconds)));

    println!("🚀 Probing {}", args.endpoint);
    let items: Vec<serde_json::Value> = fetcher.fetch_all(&args.endpoint).await?;
    let pages = 1 + remaining_pages(items.len() as u64, fetcher.page_size());

    println!("✅ {} items across {} page(s)", items.len(), pages);
    for item in items.iter().take(5) {
        if let Some(name) = item
            .get("name")
            .or_else(|| item.get("title"))
            .and_then(|v| v.as_str())
        {
            println!("  - {}", name);
        }
    }

    Ok(())
}
