//! Run configuration resolution.
//!
//! Built once at startup from the command line and the process environment,
//! read-only for the rest of the run.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use crate::error::HarnessError;

/// Locale forced on every external command so output is stable.
const FORCED_LOCALE: &str = "C.UTF-8";

/// Resolved configuration for one acceptance run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// C source file for the probe program.
    pub source: PathBuf,
    /// Directory holding the fixture RPM archives.
    pub testdir: PathBuf,
    /// Copied process environment with locale variables forced.
    pub env: BTreeMap<OsString, OsString>,
    /// Scratch directory all build artifacts land in.
    pub scratch: PathBuf,
    /// Derived object-file path (`<scratch>/<stem>.o`).
    pub object: PathBuf,
    /// Derived executable path (`<scratch>/<stem>`).
    pub program: PathBuf,
    /// C compiler command (`$CC`, default `cc`).
    pub cc: OsString,
    /// pkg-config command (`$PKG_CONFIG`, default `pkg-config`).
    pub pkg_config: OsString,
}

impl RunConfig {
    /// Resolve the configuration for one run.
    ///
    /// Validates the source suffix and the fixture directory before any
    /// external command is spawned.
    pub fn resolve(
        source: PathBuf,
        testdir: PathBuf,
        scratch: &Path,
    ) -> Result<Self, HarnessError> {
        let stem = source_stem(&source)?;
        if !testdir.is_dir() {
            return Err(HarnessError::Usage(format!(
                "test directory {} does not exist or is not a directory",
                testdir.display()
            )));
        }

        let env = prepare_env(std::env::vars_os());
        let cc = command_override(&env, "CC", "cc");
        let pkg_config = command_override(&env, "PKG_CONFIG", "pkg-config");
        let program = scratch.join(stem);
        let object = program.with_extension("o");
        Ok(Self {
            source,
            testdir,
            env,
            scratch: scratch.to_path_buf(),
            object,
            program,
            cc,
            pkg_config,
        })
    }
}

/// Extract the probe program's name from the source path.
///
/// The file name must be a plain stem plus exactly a `.c` suffix; anything
/// else (stacked suffixes, hidden files, no suffix) is a usage error.
fn source_stem(source: &Path) -> Result<String, HarnessError> {
    let name = source
        .file_name()
        .and_then(OsStr::to_str)
        .ok_or_else(|| HarnessError::Usage(format!("invalid source path {}", source.display())))?;
    match name.strip_suffix(".c") {
        Some(stem) if !stem.is_empty() && !stem.contains('.') => Ok(stem.to_string()),
        _ => Err(HarnessError::Usage(String::from(
            "the source file should only have a *.c extension",
        ))),
    }
}

/// Copy an environment and force the locale variables the run depends on.
///
/// `LC_ALL` pins a UTF-8 C locale and `LANGUAGES` is emptied so no
/// translation catalog can change command output.
pub fn prepare_env(
    base: impl IntoIterator<Item = (OsString, OsString)>,
) -> BTreeMap<OsString, OsString> {
    let mut env: BTreeMap<OsString, OsString> = base.into_iter().collect();
    env.insert(OsString::from("LC_ALL"), OsString::from(FORCED_LOCALE));
    env.insert(OsString::from("LANGUAGES"), OsString::new());
    env
}

/// Pick an external command name, honoring a non-empty environment override.
fn command_override(
    env: &BTreeMap<OsString, OsString>,
    key: &str,
    default: &str,
) -> OsString {
    match env.get(OsStr::new(key)) {
        Some(value) if !value.is_empty() => value.clone(),
        _ => OsString::from(default),
    }
}
