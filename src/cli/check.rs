//! Check command - validates a snapshot file offline

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;

use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::infrastructure::user::{ImportReport, UserService};

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Snapshot file to load
    pub path: PathBuf,
}

/// Load the file into an empty store and print what was accepted
///
/// Fails when the file as a whole cannot be imported. Skipped entries are
/// reported but do not fail the command.
pub async fn run(args: CheckArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    let path = args.path;
    let (report, service) = tokio::task::spawn_blocking({
        let path = path.clone();
        move || {
            let service = UserService::new();
            service
                .load_users_from_json(&path, true)
                .map(|report| (report, service))
        }
    })
    .await?
    .with_context(|| format!("Failed to import {}", path.display()))?;

    println!("{}", render_report(&path, &report, &service));

    Ok(())
}

fn render_report(path: &Path, report: &ImportReport, service: &UserService) -> String {
    let mut out = format!(
        "{}: {} loaded, {} skipped\n",
        path.display(),
        report.loaded,
        report.skipped_count()
    );

    for entry in &report.skipped {
        let _ = writeln!(out, "  skipped '{}': {}", entry.key, entry.reason);
    }

    out.push('\n');
    out.push_str(&service.to_string());
    out
}
