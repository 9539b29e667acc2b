//! Diagnostics produced by region validation.
//!
//! A diagnostic names the region it is about by position and label, so the
//! CLI can point back into the file without the checks formatting it.

use std::fmt;

use crate::types::{MetaValue, PixelRegion};

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// The region a diagnostic is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionRef {
    /// Zero-based position in the file.
    pub index: usize,
    pub label: Option<String>,
    pub shape: &'static str,
}

impl RegionRef {
    pub fn of(index: usize, region: &PixelRegion) -> Self {
        Self {
            index,
            label: region
                .meta
                .get("label")
                .and_then(MetaValue::as_str)
                .map(str::to_string),
            shape: region.name(),
        }
    }
}

/// Regions are numbered from 1 for people.
impl fmt::Display for RegionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "Region {} '{}' ({})", self.index + 1, label, self.shape),
            None => write!(f, "Region {} ({})", self.index + 1, self.shape),
        }
    }
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Stable code, e.g. `regions::validate::annulus-not-nested`.
    pub code: &'static str,
    pub region: RegionRef,
    pub message: String,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn error(code: &'static str, region: RegionRef, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, code, region, message)
    }

    pub fn warning(code: &'static str, region: RegionRef, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, region, message)
    }

    fn new(severity: Severity, code: &'static str, region: RegionRef, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            region,
            message: message.into(),
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.region, self.message)
    }
}

/// Findings from one or more checks, in the order they were found.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn merge(&mut self, other: ValidationResult) {
        self.diagnostics.extend(other.diagnostics);
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == severity).count()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.warning_count() > 0
    }

    /// No findings at all.
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Most severe finding for the region at `index`, if any.
    pub fn worst_for(&self, index: usize) -> Option<Severity> {
        self.diagnostics
            .iter()
            .filter(|d| d.region.index == index)
            .map(|d| d.severity)
            .max()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }
}

impl FromIterator<Diagnostic> for ValidationResult {
    fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
        Self {
            diagnostics: iter.into_iter().collect(),
        }
    }
}
