use clap::Parser;
use tracing::info;

use geolocator::config::StaticConfig;
use geolocator::resolver::LocationResolver;
use geolocator::system::init_logging;

/// Geolocator - resolve IP addresses to geographic locations
#[derive(Parser)]
#[command(name = "geolocator")]
#[command(version)]
#[command(about = "Resolve IP addresses to geographic locations", long_about = None)]
struct Cli {
    /// IP addresses to resolve
    #[arg(required = true)]
    ips: Vec<String>,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = StaticConfig::load();
    let _guard = init_logging(&config.logging);

    let resolver = LocationResolver::new(config.resolver);

    info!("Resolving {} address(es)", cli.ips.len());
    let results = resolver.batch_resolve_locations(&cli.ips).await;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&results)?
    } else {
        serde_json::to_string(&results)?
    };
    println!("{}", output);

    Ok(())
}
