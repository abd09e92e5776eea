//! Output plumbing: JSONL logs to a file or stdout, summaries as JSON.

use anyhow::Context;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Write an already-rendered JSONL document to `output`, or stdout when
/// no path is given.
pub fn write_jsonl(jsonl: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("creating {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            writer.write_all(jsonl.as_bytes())?;
            writer.flush()?;
        }
        None => io::stdout().write_all(jsonl.as_bytes())?,
    }
    Ok(())
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
