//! Status command for showing reporting sessions.

use std::io::Write;

use anyhow::Result;
use ia_db::MIN_SESSION_STATS;

use super::open_database;
use crate::Config;

pub fn run<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    let db = open_database(config)?;
    let sessions = db.session_summaries()?;

    writeln!(writer, "Interaction analytics status")?;
    writeln!(writer, "Database: {}", config.database_path.display())?;

    if sessions.is_empty() {
        writeln!(writer, "No sessions recorded.")?;
    } else {
        writeln!(writer, "Sessions:")?;
        for session in sessions {
            let state = if session.accepted() {
                "accepted".to_string()
            } else {
                format!("pending, needs {MIN_SESSION_STATS}")
            };
            writeln!(
                writer,
                "- {} (started {}): {} submissions, {} distinct stats ({state})",
                session.session_id, session.started_at, session.submissions, session.distinct_stats
            )?;
        }
    }

    if let Some(last) = db.last_error()? {
        writeln!(writer, "Last error (code {}): {}", last.code, last.message)?;
    }

    Ok(())
}
