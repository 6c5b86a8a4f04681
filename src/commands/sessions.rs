use anyhow::Result;

use super::OutputFormat;
use crate::store::HitSource;

/// Sessions in descending order by time of latest hit.
pub fn run(source: &dyn HitSource, format: OutputFormat) -> Result<String> {
    let sessions = source.sessions()?;

    if format == OutputFormat::Json {
        return Ok(format!("{}\n", serde_json::to_string_pretty(&sessions)?));
    }

    let mut output = format!("{:<38} {}\n", "Session id", "Total Hits");
    for s in &sessions {
        output.push_str(&format!("{}   {}\n", s.session_id, s.hits));
    }
    Ok(output)
}
