//! post-ingest — fetch canonical excerpts for external social posts and
//! reconcile them into the site's post store.
//!
//! Usage:
//!   post-ingest --url <postUrl> [--url <postUrl> ...] [--store] [--title <title>] [--id <id>] [--force]
//!   post-ingest --update-existing [--force]
//!
//! Env (optional, enables the Twitter API v2 strategy):
//!   TWITTER_BEARER_TOKEN=xxxxx

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use post_ingest::config::AppConfig;
use post_ingest::http::ReqwestFetch;
use post_ingest::store::UpsertFields;
use post_ingest::{ingest_batch, refresh_store, upsert, AdapterSet, JsonFileStore, PostStore};

#[derive(Parser, Debug)]
#[command(name = "post-ingest")]
#[command(about = "Fetch content of a post from Twitter/X or LinkedIn")]
#[command(version)]
struct Cli {
    /// Post URL to fetch; repeat for a batch.
    #[arg(short = 'u', long = "url", value_name = "URL")]
    urls: Vec<String>,

    /// Persist fetched excerpts into the posts store.
    #[arg(short, long)]
    store: bool,

    /// Explicit title for the stored record(s).
    #[arg(short, long)]
    title: Option<String>,

    /// Explicit id for the stored record(s).
    #[arg(short, long)]
    id: Option<String>,

    /// Re-ingest every eligible record already in the store.
    #[arg(long, visible_alias = "refresh")]
    update_existing: bool,

    /// Overwrite the stored excerpt even when the fetched one is empty.
    #[arg(short, long)]
    force: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .compact()
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op where the environment is already set.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    if !cli.update_existing && cli.urls.is_empty() {
        anyhow::bail!("nothing to do: pass --url <postUrl> (repeatable) or --update-existing");
    }

    let cfg = AppConfig::from_env();
    let http = Arc::new(ReqwestFetch::new(cfg.http_timeout).context("building http client")?);
    let adapters = AdapterSet::standard(http, cfg.twitter_bearer.clone());
    let store = JsonFileStore::new(&cfg.store_path);

    if cli.update_existing {
        let updated = refresh_store(&adapters, &store, cli.force)
            .await
            .context("refreshing posts store")?;
        println!(
            "Updated {updated} entr{} in {}",
            if updated == 1 { "y" } else { "ies" },
            cfg.store_path.display()
        );
        return Ok(());
    }

    let outcomes = ingest_batch(&adapters, &cli.urls).await;

    let mut list = if cli.store {
        Some(store.load().context("loading posts store")?)
    } else {
        None
    };

    for outcome in &outcomes {
        match &outcome.result {
            Ok(fetched) => {
                println!("{}", serde_json::to_string_pretty(fetched)?);
                if let Some(list) = list.as_mut() {
                    let fields = UpsertFields {
                        id: cli.id.clone(),
                        title: cli.title.clone(),
                        excerpt: fetched.content.clone(),
                        force: cli.force,
                        ..Default::default()
                    };
                    upsert(list, &outcome.url, &fields);
                }
            }
            Err(e) => tracing::error!(url = %outcome.url, error = %e, "failed to fetch post"),
        }
    }

    if let Some(list) = list {
        store.save(&list).context("saving posts store")?;
        println!("Saved to {}", cfg.store_path.display());
    }
    Ok(())
}
