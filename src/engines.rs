//! Node version gating.
//!
//! `engines.node` uses npm range syntax, which is a superset of what
//! [`semver::VersionReq`] understands. [`EngineRange`] lowers every `||`
//! alternative onto a `VersionReq` and a version satisfies the range when any
//! alternative matches it.

use std::{fmt, str::FromStr};

use semver::{Version, VersionReq};
use subprocess::{Exec, Redirection};

use crate::{
    error::{CreateError, Result},
    manifest::Manifest,
    trace,
};

#[derive(Debug, Clone)]
pub struct EngineRange {
    raw: String,
    alternatives: Vec<VersionReq>,
}

impl EngineRange {
    #[must_use]
    pub fn matches(&self, version: &Version) -> bool {
        self.alternatives.iter().any(|req| req.matches(version))
    }
}

impl fmt::Display for EngineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for EngineRange {
    type Err = semver::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let alternatives = s
            .split("||")
            .map(lower_comparator_set)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: s.trim().to_owned(),
            alternatives,
        })
    }
}

const OPERATORS: [&str; 8] = ["<", "<=", ">", ">=", "=", "~", "~>", "^"];

fn lower_comparator_set(set: &str) -> Result<VersionReq, semver::Error> {
    let tokens = set.split_whitespace().collect::<Vec<_>>();

    if let [low, "-", high] = tokens.as_slice() {
        // A wildcard end leaves that side of the range open.
        let bounds = [(">=", low), ("<=", high)]
            .into_iter()
            .map(|(op, v)| (op, strip_wildcards(strip_v(v))))
            .filter(|(_, v)| !v.is_empty())
            .map(|(op, v)| format!("{op}{v}"))
            .collect::<Vec<_>>();

        if bounds.is_empty() {
            return Ok(VersionReq::STAR);
        }
        return VersionReq::parse(&bounds.join(", "));
    }

    let mut comparators = Vec::with_capacity(tokens.len());
    let mut operator: Option<&str> = None;

    for token in tokens {
        if OPERATORS.contains(&token) {
            operator = Some(token);
            continue;
        }

        let comparator = match operator.take() {
            Some(op) => lower_comparator(&format!("{op}{token}")),
            None => lower_comparator(token),
        };

        if let Some(comparator) = comparator {
            comparators.push(comparator);
        }
    }

    if comparators.is_empty() {
        return Ok(VersionReq::STAR);
    }

    VersionReq::parse(&comparators.join(", "))
}

/// Rewrites a single npm comparator into `VersionReq` syntax. `None` means
/// the comparator matches everything.
fn lower_comparator(token: &str) -> Option<String> {
    let split = token
        .find(|c: char| !matches!(c, '<' | '>' | '=' | '~' | '^'))
        .unwrap_or(token.len());
    let (op, version) = token.split_at(split);
    let op = if op == "~>" { "~" } else { op };
    let version = strip_v(version);

    if version.is_empty() || version.split('.').all(is_wildcard) {
        return None;
    }

    let has_wildcard = version.split('.').any(is_wildcard);

    Some(match op {
        // A bare npm version is exact, a bare `VersionReq` version is caret.
        "" | "=" if has_wildcard => version.to_owned(),
        "" => format!("={version}"),
        _ => format!("{op}{}", strip_wildcards(version)),
    })
}

fn strip_v(version: &str) -> &str {
    version
        .strip_prefix('v')
        .or_else(|| version.strip_prefix('V'))
        .unwrap_or(version)
}

fn is_wildcard(part: &str) -> bool {
    matches!(part, "*" | "x" | "X")
}

/// `1.2.x` -> `1.2`, leaving the partial version for `VersionReq`.
fn strip_wildcards(version: &str) -> String {
    version
        .split('.')
        .take_while(|part| !is_wildcard(part))
        .collect::<Vec<_>>()
        .join(".")
}

/// Where the current runtime version comes from.
#[derive(Debug, Clone)]
pub enum Runtime {
    /// Run `<program> --version` and parse its output.
    Probe { program: String },
    Fixed(Version),
}

impl Default for Runtime {
    fn default() -> Self {
        Runtime::Probe {
            program: "node".into(),
        }
    }
}

impl Runtime {
    /// Returns the version of the runtime.
    ///
    /// # Errors
    ///
    /// Returns [`CreateError::RuntimeProbe`] if the program can not be run or
    /// prints something that is not a version.
    pub fn version(&self) -> Result<Version> {
        let program = match self {
            Runtime::Fixed(version) => return Ok(version.clone()),
            Runtime::Probe { program } => program,
        };

        let probe_err = |reason: String| CreateError::RuntimeProbe {
            program: program.clone(),
            reason,
        };

        let capture = Exec::cmd(program)
            .arg("--version")
            .stdout(Redirection::Pipe)
            .stderr(Redirection::Pipe)
            .capture()
            .map_err(|e| probe_err(e.to_string()))?;

        if !capture.exit_status.success() {
            return Err(probe_err(format!("exited with {:?}", capture.exit_status)));
        }

        let output = capture.stdout_str();
        trace!("`{program} --version` printed {}", output.trim());

        parse_runtime_version(&output).map_err(|e| probe_err(e.to_string()))
    }
}

/// Parses `v20.11.1`-style output.
pub fn parse_runtime_version(output: &str) -> Result<Version, semver::Error> {
    Version::parse(strip_v(output.trim()))
}

/// Fails when `manifest` declares an `engines.node` range the runtime does
/// not satisfy. Without a constraint this passes, and the runtime is only
/// asked for its version when there is something to check.
///
/// # Errors
///
/// - [`CreateError::InvalidRange`] for a range that can not be parsed
/// - [`CreateError::RuntimeProbe`] if the runtime version is unknown
/// - [`CreateError::RuntimeVersion`] on mismatch
pub fn check_engines(manifest: &Manifest, runtime: &Runtime) -> Result<()> {
    let Some(required) = manifest.engine_node() else {
        return Ok(());
    };

    let range = required
        .parse::<EngineRange>()
        .map_err(|source| CreateError::InvalidRange {
            range: required.to_owned(),
            source,
        })?;

    let actual = runtime.version()?;
    trace!("Checking Node v{actual} against {range}");

    if range.matches(&actual) {
        Ok(())
    } else {
        Err(CreateError::RuntimeVersion {
            required: range.to_string(),
            actual,
        })
    }
}
