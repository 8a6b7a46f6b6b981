//! Delete command for removing an entry.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};

use ftl_db::Database;

pub fn run<W: Write>(
    writer: &mut W,
    db: &mut Database,
    id: &str,
    now: DateTime<Utc>,
) -> Result<()> {
    let Some(entry) = db.delete_entry(id, now)? else {
        anyhow::bail!("no entry with ID {id}");
    };
    writeln!(
        writer,
        "Deleted entry {} ({} {} {})",
        entry.id, entry.date, entry.aircraft, entry.techlog_number
    )?;
    Ok(())
}
