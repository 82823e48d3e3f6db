use std::io::{self, Write};

use weekly_digest::Report;

const RICH_LABEL: &str = "Markdown report:";
const PLAIN_LABEL: &str = "Signal report:";

/// Writes both renderings, each under its own label line.
pub fn write_reports<W: Write>(report: &Report, out: &mut W) -> io::Result<()> {
    writeln!(out, "{RICH_LABEL}")?;
    writeln!(out, "{}", report.rich)?;
    writeln!(out)?;
    writeln!(out, "{PLAIN_LABEL}")?;
    writeln!(out, "{}", report.plain)?;
    out.flush()
}
