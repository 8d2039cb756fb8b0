//! `bgp ingest`

use std::time::Duration;

use anyhow::{bail, Context, Result};
use bgp_config::{report_unused_keys, resolve_secrets, IngestConfig, UnusedKeyPolicy};
use bgp_db::PgStore;
use bgp_ingest::{ColorTagPolicy, IngestSettings, Ingestor};
use bgp_source::BggPlaysSource;
use tracing::{error, info, warn};

/// Command-line values that take precedence over config files.
#[derive(Debug, Default)]
pub struct Overrides {
    pub days: Option<u32>,
    pub base_url: Option<String>,
    pub pacing_secs: Option<u64>,
}

pub fn apply_overrides(cfg: &mut IngestConfig, o: Overrides) -> Result<()> {
    if let Some(days) = o.days {
        cfg.ingest.window_days = days;
    }
    if let Some(url) = o.base_url {
        cfg.source.base_url = url;
    }
    if let Some(secs) = o.pacing_secs {
        cfg.source.pacing_secs = secs;
    }
    cfg.validate()
}

pub async fn run(config_paths: &[String], overrides: Overrides) -> Result<()> {
    let loaded = super::load_config(config_paths)?;
    let unused = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Warn)?;
    for key in &unused.unused_leaf_pointers {
        warn!(key = %key, "config key is not used");
    }

    let mut cfg = loaded.ingest_config()?;
    apply_overrides(&mut cfg, overrides)?;
    let secrets = resolve_secrets(&cfg)?;

    info!(
        config_hash = %loaded.config_hash,
        window_days = cfg.ingest.window_days,
        base_url = %cfg.source.base_url,
        pacing_secs = cfg.source.pacing_secs,
        "starting ingest"
    );

    // No store, no run.
    let pool = match bgp_db::connect(&secrets.database_url).await {
        Ok(p) => p,
        Err(e) => {
            error!(error = ?e, "store unreachable at startup");
            return Err(e);
        }
    };
    let status = bgp_db::status(&pool).await?;
    if !status.has_ledger_tables {
        bail!("ledger tables missing; run `bgp db migrate` first");
    }

    let store = PgStore::new(pool);
    let source = BggPlaysSource::new_with_base_url(cfg.source.base_url.clone())
        .context("build upstream source")?;
    let settings = IngestSettings {
        pacing: Duration::from_secs(cfg.source.pacing_secs),
        tag_policy: ColorTagPolicy::with_max_attempts(cfg.registry.max_tag_attempts),
    };

    let summary = Ingestor::new(&store, &source, settings)
        .ingest(cfg.ingest.window_days)
        .await?;

    println!("config_hash={}", loaded.config_hash);
    for (k, v) in summary.key_values() {
        println!("{k}={v}");
    }
    for f in &summary.failures {
        println!("failed_date={} page={} reason={}", f.date, f.page, f.reason);
    }
    Ok(())
}
