use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use tweetload::{process, LoadConfig};

const INPUT_STEM: &str = "IRAhandle_tweets";
const INPUT_COUNT: usize = 13;
const OUTPUT_DB: &str = "IRAhandle_tweets.db";

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) configuration ────────────────────────────────────────────
    let cfg = LoadConfig::from_env().context("reading configuration")?;
    info!(
        schema = %cfg.schema,
        shorten_urls = cfg.url_shortening.is_enabled(),
        "configured"
    );

    // ─── 3) load every numbered CSV into a fresh store ───────────────
    let inputs = process::numbered_inputs(Path::new("."), INPUT_STEM, INPUT_COUNT);
    let report = process::load(&inputs, Path::new(OUTPUT_DB), &cfg)
        .with_context(|| format!("loading {} files into {}", inputs.len(), OUTPUT_DB))?;

    info!(
        records = report.records,
        files = report.files,
        "all done"
    );
    Ok(())
}
