use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use super::RequirementError;
use super::version::VersionConstraint;

static REQUIREMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9][A-Za-z0-9._+-]*)\s*(.*)$").expect("requirement pattern is valid")
});

/// A required tool and the versions of it that are acceptable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub name: String,
    pub constraint: VersionConstraint,
}

impl FromStr for Requirement {
    type Err = RequirementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let spec = strip_comment(s).trim();
        let captures = REQUIREMENT
            .captures(spec)
            .ok_or_else(|| RequirementError::Malformed(s.trim().to_string()))?;

        let name = captures[1].to_string();
        let constraint = captures[2].parse()?;
        Ok(Requirement { name, constraint })
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.constraint.is_any() {
            write!(f, "{}", self.constraint)?;
        }
        Ok(())
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(index) => &line[..index],
        None => line,
    }
}

/// Parse a requirements listing, skipping blank lines and `#` comments
pub fn parse_list(text: &str) -> Result<Vec<Requirement>, RequirementError> {
    text.lines()
        .filter(|line| !strip_comment(line).trim().is_empty())
        .map(|line| line.parse::<Requirement>())
        .collect()
}
