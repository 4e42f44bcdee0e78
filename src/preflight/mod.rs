//! Environment preflight
//!
//! Every declared requirement is checked against the installed environment
//! before any report work begins. The scan never stops at the first problem:
//! each unmet requirement is logged with the install action that fixes it, and
//! only then is the run aborted if anything was missing.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::config::ReportConfig;

pub mod requirement;
pub mod version;

pub use requirement::Requirement;
pub use version::{Version, VersionConstraint};

/// Problems with the declared requirement list itself
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequirementError {
    #[error("malformed requirement \"{0}\"")]
    Malformed(String),

    #[error("invalid version constraint \"{0}\"")]
    InvalidConstraint(String),

    #[error("invalid version \"{0}\"")]
    InvalidVersion(String),
}

#[derive(Debug, Error)]
pub enum PreflightError {
    #[error("Failed to read requirements file \"{}\": {source}", .path.display())]
    RequirementsFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid dependency declaration: {0}")]
    Requirement(#[from] RequirementError),

    #[error("{summary}. Report generation aborted.")]
    Missing { count: usize, summary: String },
}

/// Lookup of installed tools
///
/// Split out so the scan can be exercised without touching the real `PATH`.
pub trait Environment {
    /// Location of the tool, if installed
    fn locate(&self, name: &str) -> Option<PathBuf>;

    /// Version reported by the installed tool
    fn installed_version(&self, executable: &Path) -> Option<Version>;
}

/// The process environment: `PATH` lookup and `<tool> --version`
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn locate(&self, name: &str) -> Option<PathBuf> {
        which::which(name).ok()
    }

    fn installed_version(&self, executable: &Path) -> Option<Version> {
        let output = Command::new(executable).arg("--version").output().ok()?;
        // Some tools print their version on stderr
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        Version::extract(&stdout).or_else(|| Version::extract(&stderr))
    }
}

/// Why a requirement is unmet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unmet {
    NotFound,
    VersionConflict { found: Option<Version> },
}

#[derive(Debug, Clone)]
pub struct Failure {
    pub requirement: Requirement,
    pub problem: Unmet,
}

impl Failure {
    /// The install action that resolves this failure
    pub fn remediation(&self) -> String {
        let target = match self.problem {
            Unmet::NotFound => self.requirement.name.clone(),
            Unmet::VersionConflict { .. } => self.requirement.to_string(),
        };
        format!(
            "MISSING DEPENDENCY: {}. Please install `{}` and retry the report generation.",
            self.requirement, target
        )
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = &self.requirement.name;
        let wanted = &self.requirement.constraint;
        match &self.problem {
            Unmet::NotFound => write!(f, "`{name}` was not found on PATH"),
            Unmet::VersionConflict { found: Some(found) } => {
                write!(f, "`{name}` {found} is installed but {wanted} is required")
            }
            Unmet::VersionConflict { found: None } => {
                write!(f, "version of `{name}` could not be determined but {wanted} is required")
            }
        }
    }
}

/// Outcome of a full scan
#[derive(Debug, Default)]
pub struct PreflightReport {
    pub checked: usize,
    pub failures: Vec<Failure>,
}

impl PreflightReport {
    pub fn is_satisfied(&self) -> bool {
        self.failures.is_empty()
    }

    /// `MISSING 1 DEPENDENCY` / `MISSING 3 DEPENDENCIES`
    pub fn summary(&self) -> String {
        let count = self.failures.len();
        let noun = if count == 1 { "DEPENDENCY" } else { "DEPENDENCIES" };
        format!("MISSING {count} {noun}")
    }
}

/// Check a single requirement
pub fn resolve(requirement: &Requirement, env: &dyn Environment) -> Result<(), Unmet> {
    let executable = env.locate(&requirement.name).ok_or(Unmet::NotFound)?;
    if requirement.constraint.is_any() {
        return Ok(());
    }

    match env.installed_version(&executable) {
        Some(found) if requirement.constraint.matches(&found) => Ok(()),
        found => Err(Unmet::VersionConflict { found }),
    }
}

/// Check every requirement, logging each failure as it is found
pub fn check(requirements: &[Requirement], env: &dyn Environment) -> PreflightReport {
    let mut report = PreflightReport {
        checked: requirements.len(),
        failures: Vec::new(),
    };

    for requirement in requirements {
        match resolve(requirement, env) {
            Ok(()) => tracing::debug!("Dependency satisfied: {}", requirement),
            Err(problem) => {
                let failure = Failure {
                    requirement: requirement.clone(),
                    problem,
                };
                tracing::error!("Error: {}", failure);
                tracing::error!("{}", failure.remediation());
                report.failures.push(failure);
            }
        }
    }

    report
}

/// Collect the declared requirements from the config and its requirements file
pub fn load_requirements(config: &ReportConfig) -> Result<Vec<Requirement>, PreflightError> {
    let mut requirements = config
        .preflight
        .requirements
        .iter()
        .map(|spec| spec.parse::<Requirement>())
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(path) = config.requirements_file() {
        let listing = std::fs::read_to_string(&path)
            .map_err(|source| PreflightError::RequirementsFile { path, source })?;
        requirements.extend(requirement::parse_list(&listing)?);
    }

    Ok(requirements)
}

/// Run the full preflight and fail if anything is missing
pub fn run(config: &ReportConfig, env: &dyn Environment) -> Result<PreflightReport, PreflightError> {
    let requirements = load_requirements(config)?;
    let report = check(&requirements, env);

    if !report.is_satisfied() {
        return Err(PreflightError::Missing {
            count: report.failures.len(),
            summary: report.summary(),
        });
    }

    tracing::debug!("All {} declared dependencies satisfied", report.checked);
    Ok(report)
}
