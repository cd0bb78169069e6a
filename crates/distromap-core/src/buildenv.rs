//! Build environment planning: turn per-package build options into
//! `package.env` entries addressed by the mapped target package.
//!
//! Options arrive already parsed (one JSON record per package). Each truthy
//! flag contributes one `"<category/name> <profile>.conf"` line to the env
//! file the flag selects; the profiles themselves are fixed compiler flag sets.

use std::collections::BTreeMap;
use std::fmt;
use std::io::Write;
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Mapping;
use crate::error::MapError;

/// A typed build option value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, from = "RawOptionValue")]
pub enum OptionValue {
    Bool(bool),
    Int(u64),
    String(String),
}

impl OptionValue {
    /// `true`/`false` in any case become booleans, all-digit strings become
    /// integers, anything else stays a string.
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("true") {
            return Self::Bool(true);
        }
        if raw.eq_ignore_ascii_case("false") {
            return Self::Bool(false);
        }
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = raw.parse() {
                return Self::Int(n);
            }
        }
        Self::String(raw.to_string())
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(n) => *n != 0,
            Self::String(s) => !s.is_empty(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOptionValue {
    Bool(bool),
    Int(u64),
    Text(String),
}

impl From<RawOptionValue> for OptionValue {
    fn from(raw: RawOptionValue) -> Self {
        match raw {
            RawOptionValue::Bool(b) => Self::Bool(b),
            RawOptionValue::Int(n) => Self::Int(n),
            RawOptionValue::Text(s) => Self::parse(&s),
        }
    }
}

/// Build options for one source package.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageOptions {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub autospec: BTreeMap<String, OptionValue>,
}

impl PackageOptions {
    pub fn flag(&self, key: &str) -> bool {
        self.autospec.get(key).is_some_and(OptionValue::is_truthy)
    }
}

/// Read a JSON array of [`PackageOptions`].
pub fn load_package_options(path: &Path) -> Result<Vec<PackageOptions>, MapError> {
    let content = std::fs::read_to_string(path).map_err(|source| MapError::Read {
        what: "package options",
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| MapError::Json {
        what: "package options",
        path: path.to_path_buf(),
        source,
    })
}

/// Option key → env file → compiler profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagRule {
    pub option: &'static str,
    pub env_file: &'static str,
    pub profile: &'static str,
    /// Fire when the option is falsy instead.
    pub inverted: bool,
}

impl FlagRule {
    const fn new(option: &'static str, env_file: &'static str, profile: &'static str) -> Self {
        Self {
            option,
            env_file,
            profile,
            inverted: false,
        }
    }

    const fn inverted(self) -> Self {
        Self {
            inverted: true,
            ..self
        }
    }

    pub fn fires_for(&self, options: &PackageOptions) -> bool {
        options.flag(self.option) != self.inverted
    }
}

pub const FLAG_RULES: &[FlagRule] = &[
    FlagRule::new(
        "security_sensitive",
        "security_sensitive",
        "security-sensitive.conf",
    ),
    FlagRule::new("funroll-loops", "funroll", "funroll.conf"),
    FlagRule::new("optimize_size", "Osize", "Osize.conf"),
    FlagRule::new("fast-math", "ffast-math", "ffast-math.conf"),
    FlagRule::new("use_lto", "lto", "lto.conf"),
    FlagRule::new("use_lto", "no-lto", "no-lto.conf").inverted(),
];

/// One line destined for `package.env/<env_file>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvEntry {
    pub env_file: String,
    pub package: String,
    pub profile: String,
}

impl fmt::Display for EnvEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.package, self.profile)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvError {
    #[error("package options carry no package name")]
    MissingName,
    #[error("no mapping found for package: {0}")]
    NoMapping(String),
    #[error("no target package match for: {0}")]
    NoMatch(String),
}

/// Entries for one package, in [`FLAG_RULES`] order.
pub fn plan_package_env(
    options: &PackageOptions,
    mapping: &Mapping,
) -> Result<Vec<EnvEntry>, EnvError> {
    if options.name.is_empty() {
        return Err(EnvError::MissingName);
    }
    let record = mapping
        .get(&options.name)
        .ok_or_else(|| EnvError::NoMapping(options.name.clone()))?;
    let package = record
        .best_match
        .as_deref()
        .filter(|m| !m.is_empty())
        .ok_or_else(|| EnvError::NoMatch(options.name.clone()))?;

    Ok(FLAG_RULES
        .iter()
        .filter(|rule| rule.fires_for(options))
        .map(|rule| EnvEntry {
            env_file: rule.env_file.to_string(),
            package: package.to_string(),
            profile: rule.profile.to_string(),
        })
        .collect())
}

/// Entries for many packages. Packages that cannot be planned are logged
/// and counted, never fatal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvPlan {
    pub entries: Vec<EnvEntry>,
    pub planned: usize,
    pub skipped: usize,
}

pub fn plan_env(packages: &[PackageOptions], mapping: &Mapping) -> EnvPlan {
    let mut plan = EnvPlan::default();
    for options in packages {
        match plan_package_env(options, mapping) {
            Ok(entries) => {
                debug!("{}: {} env entries", options.name, entries.len());
                plan.entries.extend(entries);
                plan.planned += 1;
            }
            Err(e) => {
                warn!("{e}");
                plan.skipped += 1;
            }
        }
    }
    plan
}

/// A named compiler flag set written to `env/<file_name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerProfile {
    pub file_name: &'static str,
    pub lines: Vec<String>,
}

impl CompilerProfile {
    fn appending(file_name: &'static str, preamble: Option<&str>, flags: &str) -> Self {
        let mut lines: Vec<String> = preamble.map(str::to_string).into_iter().collect();
        for var in ["CFLAGS", "CXXFLAGS", "FCFLAGS", "FFLAGS"] {
            lines.push(format!("{var}=\"${{{var}}} {flags}\""));
        }
        Self { file_name, lines }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

pub fn compiler_profiles() -> Vec<CompilerProfile> {
    vec![
        CompilerProfile::appending("ffast-math.conf", None, "-ffast-math"),
        CompilerProfile::appending(
            "funroll.conf",
            None,
            "-falign-functions=32 -fno-semantic-interposition",
        ),
        CompilerProfile::appending("Ofast.conf", None, "-Ofast"),
        CompilerProfile::appending(
            "Osize.conf",
            None,
            "-Os -ffunction-sections -fdata-sections -fno-semantic-interposition",
        ),
        CompilerProfile::appending(
            "security-sensitive.conf",
            None,
            "-fzero-call-used-regs=used",
        ),
        CompilerProfile::appending(
            "lto.conf",
            Some(r#"WARNING_FLAGS="-Werror=odr -Werror=lto-type-mismatch -Werror=strict-aliasing""#),
            "-O3 -flto=auto ${WARNING_FLAGS}",
        ),
        CompilerProfile::appending(
            "no-lto.conf",
            Some(
                r#"DISABLE_LTO_FLAGS="-Wno-error=odr -Wno-error=lto-type-mismatch -Wno-error=strict-aliasing -fno-lto""#,
            ),
            "${DISABLE_LTO_FLAGS}",
        ),
    ]
}

/// Write every compiler profile into `dir`, replacing existing files.
pub fn write_compiler_profiles(dir: &Path) -> Result<Vec<std::path::PathBuf>, MapError> {
    std::fs::create_dir_all(dir).map_err(|source| MapError::Write {
        path: dir.to_path_buf(),
        source,
    })?;
    compiler_profiles()
        .iter()
        .map(|profile| {
            let path = dir.join(profile.file_name);
            std::fs::write(&path, profile.render()).map_err(|source| MapError::Write {
                path: path.clone(),
                source,
            })?;
            debug!("wrote {}", path.display());
            Ok(path)
        })
        .collect()
}

/// Append entries to `dir/<env_file>`, creating files as needed.
pub fn append_env_entries(dir: &Path, entries: &[EnvEntry]) -> Result<usize, MapError> {
    std::fs::create_dir_all(dir).map_err(|source| MapError::Write {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut by_file: BTreeMap<&str, String> = BTreeMap::new();
    for entry in entries {
        let buf = by_file.entry(entry.env_file.as_str()).or_default();
        buf.push_str(&entry.to_string());
        buf.push('\n');
    }

    for (env_file, content) in &by_file {
        let path = dir.join(env_file);
        let write_err = |source| MapError::Write {
            path: path.clone(),
            source,
        };
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(write_err)?;
        file.write_all(content.as_bytes()).map_err(write_err)?;
    }
    Ok(entries.len())
}
