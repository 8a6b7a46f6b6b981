//! Export command for writing stored entries as JSON.

use std::io::Write;

use anyhow::Result;

use ftl_db::Database;

/// Writes every entry as a pretty-printed JSON array, oldest date first.
pub fn run<W: Write>(writer: &mut W, db: &Database) -> Result<usize> {
    let entries = db.list_entries()?;
    writeln!(writer, "{}", serde_json::to_string_pretty(&entries)?)?;
    tracing::debug!(count = entries.len(), "exported entries");
    Ok(entries.len())
}
