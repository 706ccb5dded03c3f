//! Plaintext run summary for the command-line driver
//!
//! Report renderers are out of scope; this only formats the counts and the
//! list of broken links.

use crate::types::{CheckResult, LinkResult, LinkStatus};
use std::fmt;

/// Plaintext rendering of a check result
///
/// Ends with a newline.
pub struct SummaryReport<'a>(pub &'a CheckResult);

impl fmt::Display for SummaryReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;

        writeln!(f, "=== Link Check Summary ===\n")?;
        writeln!(f, "Overview:")?;
        writeln!(f, "  Links checked: {}", result.total_checked)?;
        writeln!(f, "  Duration: {:.2}s", result.duration.as_secs_f64())?;
        writeln!(f, "  Success rate: {:.1}%", result.success_rate())?;
        writeln!(f)?;

        writeln!(f, "Links by Status:")?;
        let counts = [
            (LinkStatus::Ok, result.total_ok),
            (LinkStatus::Redirect, result.total_redirect),
            (LinkStatus::Dead, result.total_dead),
            (LinkStatus::Skipped, result.total_skipped()),
        ];
        for (status, count) in counts {
            writeln!(f, "  {}: {}", status, count)?;
        }
        writeln!(f, "  error/timeout: {}", result.total_errors)?;

        let mut broken: Vec<&LinkResult> = result.broken().collect();
        if broken.is_empty() {
            return writeln!(f, "\nNo broken links found.");
        }

        broken.sort_by(|a, b| a.url.cmp(&b.url));
        writeln!(f, "\nBroken Links ({}):", broken.len())?;
        for link in broken {
            writeln!(f, "  {}", describe_link(link))?;
            if let Some(page) = &link.found_on {
                writeln!(f, "    found on {}", page)?;
            }
        }

        Ok(())
    }
}

/// Formats a check result as a short plaintext summary
pub fn format_summary(result: &CheckResult) -> String {
    SummaryReport(result).to_string()
}

/// Prints the summary to stdout
pub fn print_summary(result: &CheckResult) {
    print!("{}", SummaryReport(result));
}

/// One-line description: status, code or error, URL
fn describe_link(link: &LinkResult) -> String {
    match (&link.error, link.status_code) {
        (Some(error), _) => format!("[{}] {} ({})", link.status, link.url, error),
        (None, 0) => format!("[{}] {}", link.status, link.url),
        (None, code) => format!("[{} {}] {}", link.status, code, link.url),
    }
}
