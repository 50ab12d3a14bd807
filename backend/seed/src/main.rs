use anyhow::Result;
use clap::Parser;
use server::database::RedisStore;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Bundle path or http(s) url
    source: String,

    #[arg(long, default_value = "redis://127.0.0.1:6379")]
    redis_url: String,

    /// Clear seeded collections before writing
    #[arg(long)]
    replace: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args = Args::parse();

    let bundle = seed::load_bundle(&args.source).await?;
    let store = RedisStore::connect(&args.redis_url).await?;

    let report = seed::seed(&store, bundle, args.replace).await?;

    println!("Carousel Items: {}", report.carousel);
    println!("Projects: {}", report.projects);
    println!("Team Members: {}", report.team);
    println!("Footer: {}", if report.footer { "updated" } else { "unchanged" });

    Ok(())
}
