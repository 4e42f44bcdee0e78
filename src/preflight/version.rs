//! Dotted numeric versions and the constraint clauses used in requirement specs

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use super::RequirementError;

static VERSION_IN_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+(?:\.\d+)*").expect("version pattern is valid")
});

/// A dotted numeric version such as `3.11.4`
///
/// Missing trailing components compare as zero, so `3.8 == 3.8.0`.
#[derive(Debug, Clone)]
pub struct Version {
    parts: Vec<u64>,
}

impl Version {
    /// Find the first version-looking token in free text, e.g. `pandoc 3.1.2`
    pub fn extract(text: &str) -> Option<Self> {
        VERSION_IN_TEXT
            .find(text)
            .and_then(|m| m.as_str().parse().ok())
    }

    pub fn parts(&self) -> &[u64] {
        &self.parts
    }

    fn part(&self, index: usize) -> u64 {
        self.parts.get(index).copied().unwrap_or(0)
    }

    fn starts_with(&self, prefix: &[u64]) -> bool {
        prefix
            .iter()
            .enumerate()
            .all(|(i, value)| self.part(i) == *value)
    }
}

impl FromStr for Version {
    type Err = RequirementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s
            .trim()
            .split('.')
            .map(|part| part.parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| RequirementError::InvalidVersion(s.trim().to_string()))?;
        if parts.is_empty() {
            return Err(RequirementError::InvalidVersion(s.to_string()));
        }
        Ok(Version { parts })
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.parts.len().max(other.parts.len());
        (0..len)
            .map(|i| self.part(i).cmp(&other.part(i)))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text: Vec<String> = self.parts.iter().map(u64::to_string).collect();
        f.write_str(&text.join("."))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Eq,
    Ne,
    Ge,
    Le,
    Gt,
    Lt,
    /// `~=`: at least this version, same release series
    Compatible,
}

impl Op {
    fn symbol(self) -> &'static str {
        match self {
            Op::Eq => "==",
            Op::Ne => "!=",
            Op::Ge => ">=",
            Op::Le => "<=",
            Op::Gt => ">",
            Op::Lt => "<",
            Op::Compatible => "~=",
        }
    }
}

// Two-character operators first so `>=` is not read as `>`
const OPERATORS: &[(&str, Op)] = &[
    ("==", Op::Eq),
    ("!=", Op::Ne),
    (">=", Op::Ge),
    ("<=", Op::Le),
    ("~=", Op::Compatible),
    (">", Op::Gt),
    ("<", Op::Lt),
];

#[derive(Debug, Clone, PartialEq, Eq)]
struct Clause {
    op: Op,
    version: Version,
    /// `==3.8.*` style prefix match
    wildcard: bool,
}

impl Clause {
    fn parse(text: &str) -> Result<Self, RequirementError> {
        let text = text.trim();
        let (op, rest) = OPERATORS
            .iter()
            .find_map(|(symbol, op)| text.strip_prefix(symbol).map(|rest| (*op, rest.trim())))
            .ok_or_else(|| RequirementError::InvalidConstraint(text.to_string()))?;

        let (version_text, wildcard) = match rest.strip_suffix(".*") {
            Some(prefix) if matches!(op, Op::Eq | Op::Ne) => (prefix, true),
            Some(_) => return Err(RequirementError::InvalidConstraint(text.to_string())),
            None => (rest, false),
        };
        let version: Version = version_text.parse()?;

        if op == Op::Compatible && version.parts().len() < 2 {
            return Err(RequirementError::InvalidConstraint(text.to_string()));
        }

        Ok(Clause {
            op,
            version,
            wildcard,
        })
    }

    fn matches(&self, installed: &Version) -> bool {
        match self.op {
            Op::Eq if self.wildcard => installed.starts_with(self.version.parts()),
            Op::Ne if self.wildcard => !installed.starts_with(self.version.parts()),
            Op::Eq => installed == &self.version,
            Op::Ne => installed != &self.version,
            Op::Ge => installed >= &self.version,
            Op::Le => installed <= &self.version,
            Op::Gt => installed > &self.version,
            Op::Lt => installed < &self.version,
            Op::Compatible => {
                let series = &self.version.parts()[..self.version.parts().len() - 1];
                installed >= &self.version && installed.starts_with(series)
            }
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op.symbol(), self.version)?;
        if self.wildcard {
            f.write_str(".*")?;
        }
        Ok(())
    }
}

/// Comma-separated list of clauses that must all hold, e.g. `>=2,<4`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionConstraint {
    clauses: Vec<Clause>,
}

impl VersionConstraint {
    /// Constraint that accepts any installed version
    pub fn any() -> Self {
        Self::default()
    }

    pub fn is_any(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn matches(&self, installed: &Version) -> bool {
        self.clauses.iter().all(|clause| clause.matches(installed))
    }
}

impl FromStr for VersionConstraint {
    type Err = RequirementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Self::any());
        }
        let clauses = s
            .split(',')
            .map(Clause::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(VersionConstraint { clauses })
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text: Vec<String> = self.clauses.iter().map(Clause::to_string).collect();
        f.write_str(&text.join(","))
    }
}
