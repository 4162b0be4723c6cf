//! One-shot command line operations.

use std::path::Path;

use anyhow::Context;

use crate::state::AppState;

/// Mask the text in `file` and print the masked text and mapping summary.
pub fn mask_file(state: &AppState, file: &Path, id: Option<&str>) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let outcome = state.engine.mask(&text, id)?;

    println!("{}", outcome.masked_text);
    eprintln!();
    eprintln!("Document id:  {}", outcome.document_id);
    eprintln!("Entities:     {}", outcome.stats.total_entities_masked);
    eprintln!("Masking rate: {}", outcome.stats.masking_rate());
    eprintln!("Mapping:      {} ({})", outcome.document_id, state.store().backend_name());
    Ok(())
}

/// Restore the masked text in `file` from the mapping stored under `id`.
pub fn unmask_file(state: &AppState, file: &Path, id: &str) -> anyhow::Result<()> {
    let masked = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let outcome = state.engine.unmask(&masked, Some(id), None)?;
    println!("{}", outcome.original_text);
    Ok(())
}

pub fn print_help() {
    println!("Mailveil: reversible masking of sensitive text");
    println!();
    println!("Usage: mailveil [command]");
    println!();
    println!("Commands:");
    println!("  (none)                   Start the server");
    println!("  mask <file> [id]         Mask a file, store its mapping, print the result");
    println!("  unmask <file> <id>       Restore a masked file from its stored mapping");
    println!("  help                     Show this help message");
}
