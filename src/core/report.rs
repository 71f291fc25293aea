use crate::domain::model::RankedEntry;
use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::fmt::Write;

const NAME_LABEL: &str = "Nombre del juego";
const DURATION_LABEL: &str = "Main Story";

/// Renders the ranking: two labeled lines per game and a blank separator.
/// Durations always show a fractional part (`2.0`, `5.5`).
pub fn format_report(entries: &[RankedEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        // Writing into a String cannot fail.
        let _ = writeln!(out, "{}: {}", NAME_LABEL, entry.name);
        let _ = writeln!(out, "{}: {:?}", DURATION_LABEL, entry.hours);
        out.push('\n');
    }
    out
}

pub struct ReportWriter<S: Storage> {
    storage: S,
}

impl<S: Storage> ReportWriter<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Overwrites `path` with the rendered ranking. Any storage failure is
    /// returned as is; nothing is retried.
    pub async fn write_report(&self, path: &str, entries: &[RankedEntry]) -> Result<()> {
        let content = format_report(entries);
        tracing::debug!("Writing {} entries ({} bytes) to {}", entries.len(), content.len(), path);
        self.storage.write_file(path, content.as_bytes()).await?;
        tracing::info!("💾 Results saved to: {}", path);
        Ok(())
    }
}
