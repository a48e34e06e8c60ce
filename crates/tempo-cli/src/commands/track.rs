//! `tempo track` — record one activity event.

use anyhow::{bail, Result};
use tempo_core::{ingest, ReportCache, TrackRequest};

use crate::cli::TrackArgs;
use crate::{commands, detect, Config};

pub fn run(config: &Config, args: &TrackArgs) -> Result<()> {
    if args.file.is_empty() {
        bail!("--file is required");
    }

    let language = match args.lang.as_deref() {
        Some(lang) if !lang.trim().is_empty() => lang.to_string(),
        _ => detect::language_for_path(&args.file),
    };
    let project = match args.project.as_deref() {
        Some(project) if !project.trim().is_empty() => project.to_string(),
        _ => detect::project_for_path(&args.file),
    };

    let mut db = commands::open_database(config)?;
    let cache = ReportCache::default();
    let event = ingest::track(
        &mut db,
        &cache,
        TrackRequest {
            file: args.file.clone(),
            language,
            project,
            editor: args.editor.clone().unwrap_or_default(),
            lines: args.lines,
            branch: args.branch.clone(),
            is_write: !args.read_only,
        },
    )?;

    tracing::debug!(id = %event.id, "event persisted");
    println!("Activity tracked ({} in {})", event.language, event.project);
    Ok(())
}
