//! Progress file maintenance commands.

use std::path::Path;

use crate::progress::{JsonProgressStore, ProgressStore};

/// Summarize the progress file
pub fn cmd_progress(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        println!("No progress file at {}", path.display());
        return Ok(());
    }

    let state = JsonProgressStore::new(path).load()?;
    let summary = state.summary();

    println!("Progress file: {}", path.display());
    println!("  Books processed:  {}", summary.entries);
    println!("  With ISBN:        {}", summary.with_isbn);
    println!("  With cover:       {}", summary.with_cover);
    println!("  Nothing found:    {}", summary.empty);
    println!("  Last index:       {}", summary.last_index);

    Ok(())
}

/// Remove entries with neither ISBN nor cover
pub fn cmd_prune(path: &Path, dry_run: bool) -> anyhow::Result<()> {
    let store = JsonProgressStore::new(path);
    let mut state = store.load()?;

    let removed = state.prune_empty();
    if removed == 0 {
        println!("Nothing to prune.");
        return Ok(());
    }

    if dry_run {
        println!("DRY RUN - would remove {} empty entries", removed);
        return Ok(());
    }

    store.save(&state)?;
    tracing::info!("Pruned {} entries from {:?}", removed, path);
    println!(
        "Removed {} empty entries; they will be looked up again on the next import.",
        removed
    );

    Ok(())
}
