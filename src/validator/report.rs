use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;

/// Outcome of a single check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed, with an optional detail line
    Ok(Option<String>),
    /// Check passed but found something suspicious
    Warning(String),
    /// Check failed
    Failed(String),
    /// Check could not run because an earlier one failed
    Skipped,
}

impl CheckStatus {
    fn symbol(&self) -> &'static str {
        match self {
            CheckStatus::Ok(_) => "✓",
            CheckStatus::Warning(_) => "⚠",
            CheckStatus::Failed(_) => "✗",
            CheckStatus::Skipped => "-",
        }
    }

    fn is_failed(&self) -> bool {
        matches!(self, CheckStatus::Failed(_))
    }

    fn is_warning(&self) -> bool {
        matches!(self, CheckStatus::Warning(_))
    }
}

/// Individual validation check result
#[derive(Debug, Clone)]
pub struct ValidationCheck {
    /// Name of the validation check
    pub name: String,
    /// Result status of the check
    pub status: CheckStatus,
}

impl ValidationCheck {
    pub(crate) fn ok(name: impl Into<String>) -> Self {
        Self::with_status(name, CheckStatus::Ok(None))
    }

    pub(crate) fn ok_with(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::with_status(name, CheckStatus::Ok(Some(detail.into())))
    }

    pub(crate) fn warning(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_status(name, CheckStatus::Warning(message.into()))
    }

    pub(crate) fn failed(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_status(name, CheckStatus::Failed(message.into()))
    }

    pub(crate) fn skipped(name: impl Into<String>) -> Self {
        Self::with_status(name, CheckStatus::Skipped)
    }

    fn with_status(name: impl Into<String>, status: CheckStatus) -> Self {
        Self {
            name: name.into(),
            status,
        }
    }

    fn detail(&self) -> Option<(&'static str, &str)> {
        match &self.status {
            CheckStatus::Ok(Some(detail)) => Some(("", detail)),
            CheckStatus::Warning(msg) => Some(("WARNING", msg)),
            CheckStatus::Failed(msg) => Some(("FAILED", msg)),
            CheckStatus::Ok(None) | CheckStatus::Skipped => None,
        }
    }
}

/// Validation report for one IDX file
#[derive(Debug)]
pub struct ValidationReport {
    /// Individual check results, in execution order
    pub checks: Vec<ValidationCheck>,
    /// Path of the file that was validated
    pub file_path: String,
}

impl ValidationReport {
    /// Create an empty report for `file_path`
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            checks: Vec::new(),
            file_path: file_path.into(),
        }
    }

    /// Record a check result
    pub fn add_check(&mut self, check: ValidationCheck) {
        self.checks.push(check);
    }

    /// Whether any check failed
    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }

    /// Whether any check produced a warning
    pub fn has_warnings(&self) -> bool {
        self.warning_count() > 0
    }

    /// Number of passed checks
    pub fn success_count(&self) -> usize {
        self.count(|s| matches!(s, CheckStatus::Ok(_)))
    }

    /// Number of warnings
    pub fn warning_count(&self) -> usize {
        self.count(CheckStatus::is_warning)
    }

    /// Number of failed checks
    pub fn failure_count(&self) -> usize {
        self.count(CheckStatus::is_failed)
    }

    fn count(&self, pred: impl Fn(&CheckStatus) -> bool) -> usize {
        self.checks.iter().filter(|c| pred(&c.status)).count()
    }

    fn verdict(&self) -> &'static str {
        if self.has_failures() {
            "Validation FAILED"
        } else if self.has_warnings() {
            "Validation PASSED with warnings"
        } else {
            "Validation PASSED"
        }
    }

    /// Format the report with colors (plain text without the console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            let mut output = String::new();
            output.push_str(&format!("{}\n", style("IDX Validation Report").bold().cyan()));
            output.push_str(&format!("{}: {}\n\n", style("File").bold(), self.file_path));

            for check in &self.checks {
                let name = match check.status {
                    CheckStatus::Ok(_) => style(check.name.as_str()).green(),
                    CheckStatus::Warning(_) => style(check.name.as_str()).yellow(),
                    CheckStatus::Failed(_) => style(check.name.as_str()).red(),
                    CheckStatus::Skipped => style(check.name.as_str()).dim(),
                };
                output.push_str(&format!("[{}] {}", check.status.symbol(), name));
                match check.detail() {
                    Some(("", detail)) => output.push_str(&format!(" ({})\n", detail)),
                    Some((label, msg)) if check.status.is_failed() => {
                        output.push_str(&format!(" - {}: {}\n", style(label).red().bold(), msg))
                    }
                    Some((label, msg)) => {
                        output.push_str(&format!(" - {}: {}\n", style(label).yellow().bold(), msg))
                    }
                    None => output.push('\n'),
                }
            }

            output.push_str(&format!(
                "\n{}: {} passed, {} warnings, {} failed\n\n",
                style("Summary").bold(),
                style(self.success_count()).green(),
                style(self.warning_count()).yellow(),
                style(self.failure_count()).red()
            ));

            let verdict = if self.has_failures() {
                style(self.verdict()).red().bold()
            } else if self.has_warnings() {
                style(self.verdict()).yellow().bold()
            } else {
                style(self.verdict()).green().bold()
            };
            output.push_str(&format!("{}\n", verdict));
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            self.to_string()
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "IDX Validation Report")?;
        writeln!(f, "File: {}", self.file_path)?;
        writeln!(f)?;

        for check in &self.checks {
            write!(f, "[{}] {}", check.status.symbol(), check.name)?;
            match check.detail() {
                Some(("", detail)) => writeln!(f, " ({})", detail)?,
                Some((label, msg)) => writeln!(f, " - {}: {}", label, msg)?,
                None => writeln!(f)?,
            }
        }

        writeln!(f)?;
        writeln!(
            f,
            "Summary: {} passed, {} warnings, {} failed",
            self.success_count(),
            self.warning_count(),
            self.failure_count()
        )?;
        writeln!(f)?;
        writeln!(f, "{}", self.verdict())
    }
}
