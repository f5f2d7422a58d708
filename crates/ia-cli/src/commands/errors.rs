//! Error lookup commands.

use std::io::Write;

use anyhow::Result;
use ia_core::{ErrorResolver, STATUS_OK};

use super::open_database;
use crate::Config;

/// Prints the backend's description of `code`.
pub fn run_code<W: Write>(writer: &mut W, config: &Config, code: i32) -> Result<()> {
    let db = open_database(config)?;
    match ErrorResolver::new(&db).message_for(code) {
        Some(message) => writeln!(writer, "{code}: {message}")?,
        None if code == STATUS_OK => writeln!(writer, "{code}: ok")?,
        None => writeln!(writer, "{code}: unrecognized status")?,
    }
    Ok(())
}

/// Prints the most recent rejection stored in the database.
pub fn run_last<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    let db = open_database(config)?;
    match db.last_error()? {
        Some(last) => writeln!(
            writer,
            "{} (code {}, at {})",
            last.message, last.code, last.recorded_at
        )?,
        None => writeln!(writer, "No errors recorded.")?,
    }
    Ok(())
}
