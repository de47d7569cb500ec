//! Console reporter with colored output

use super::ReportSummary;
use colored::Colorize;
use std::fmt::Write;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Print the summary to stdout
    pub fn report(&self, summary: &ReportSummary) {
        print!("{}", self.format(summary));
    }

    /// Render the summary as text
    pub fn format(&self, summary: &ReportSummary) -> String {
        let mut out = String::new();

        if summary.tables.is_empty() {
            let _ = writeln!(out, "{}", self.dim("No expandable tables in this report"));
        }
        for table in &summary.tables {
            let _ = writeln!(out, "{}", self.bold(&table.title));
            let rows = if table.rows == 0 {
                "No data found".to_string()
            } else {
                format!("{} row{}", table.rows, if table.rows == 1 { "" } else { "s" })
            };
            let _ = writeln!(out, "   {}", rows);
            for column in &table.columns {
                let counts: Vec<String> = column
                    .summary
                    .lines()
                    .into_iter()
                    .map(|(label, n)| format!("{}: {}", label, n))
                    .collect();
                let _ = writeln!(out, "   {} {}", self.dim(&format!("{}:", column.column)), counts.join(", "));
            }
            out.push('\n');
        }

        if !summary.results.is_empty() {
            let _ = writeln!(out, "{}", self.bold("Control results"));
            for (state, count) in &summary.results {
                let _ = writeln!(out, "   {:<16} {}", self.state(state), count);
            }
            out.push('\n');
        }

        for diagnostic in &summary.diagnostics {
            let _ = writeln!(out, "{}: {}", self.warning("Warning"), diagnostic);
        }
        out
    }

    fn bold(&self, s: &str) -> String {
        if self.use_colors {
            s.bold().to_string()
        } else {
            s.to_string()
        }
    }

    fn dim(&self, s: &str) -> String {
        if self.use_colors {
            s.dimmed().to_string()
        } else {
            s.to_string()
        }
    }

    fn warning(&self, s: &str) -> String {
        if self.use_colors {
            s.yellow().to_string()
        } else {
            s.to_string()
        }
    }

    fn state(&self, state: &str) -> String {
        if !self.use_colors {
            return state.to_string();
        }
        match state {
            "pass" => state.green().to_string(),
            "fail" | "error" | "incorrect-shall" => state.red().to_string(),
            "warning" | "incorrect-should" => state.yellow().to_string(),
            "bug" => state.magenta().to_string(),
            _ => state.dimmed().to_string(),
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}
