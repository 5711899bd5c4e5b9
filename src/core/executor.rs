use std::ffi::OsString;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

use super::target::{RenameTarget, RenameTargets};

pub const GORENAME: &str = "gorename";
const GORENAME_INSTALL: &str = "go install golang.org/x/tools/cmd/gorename@latest";

#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error(
        "{} not found{}. Run '{}' to install.",
        .tool,
        path_hint(.searched_path),
        .install
    )]
    ToolMissing {
        tool: String,
        /// Whether the tool was looked up on `$PATH` rather than given as a path.
        searched_path: bool,
        install: &'static str,
    },

    /// Target `index` (zero-based) failed; nothing after it was attempted.
    #[error("error replacing '{from}': {reason}")]
    RenameFailed {
        index: usize,
        from: String,
        to: String,
        reason: String,
    },
}

fn path_hint(searched_path: &bool) -> &'static str {
    if *searched_path {
        " in $PATH"
    } else {
        ""
    }
}

/// An external program able to rename one declaration across a package.
pub trait RenameTool {
    fn name(&self) -> &str;
    fn is_available(&self) -> bool;
    /// True when availability is decided by a `$PATH` lookup.
    fn searches_path(&self) -> bool {
        true
    }
    /// Renames `from` (a qualified reference) to `to`. The error string is
    /// reported to the user as-is.
    fn rename(&self, from: &str, to: &str) -> Result<(), String>;
}

/// `gorename`, run once per target and awaited before the next.
pub struct Gorename {
    program: PathBuf,
    verbose: bool,
}

impl Gorename {
    pub fn new() -> Self {
        Self::with_program(GORENAME)
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            verbose: false,
        }
    }

    /// Echo gorename's own report after each successful rename.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    fn has_directory(&self) -> bool {
        self.program.components().count() > 1
    }
}

impl Default for Gorename {
    fn default() -> Self {
        Self::new()
    }
}

impl RenameTool for Gorename {
    fn name(&self) -> &str {
        self.program.to_str().unwrap_or(GORENAME)
    }

    fn is_available(&self) -> bool {
        // A program given with a directory component is used as-is; a bare
        // name is looked up on the search path.
        if self.has_directory() {
            return is_executable(&self.program);
        }
        find_on_path(self.program.as_os_str(), std::env::var_os("PATH")).is_some()
    }

    fn searches_path(&self) -> bool {
        !self.has_directory()
    }

    fn rename(&self, from: &str, to: &str) -> Result<(), String> {
        let output = Command::new(&self.program)
            .arg("-from")
            .arg(from)
            .arg("-to")
            .arg(to)
            .output()
            .map_err(|err| err.to_string())?;

        if output.status.success() {
            if self.verbose {
                let report = String::from_utf8_lossy(&output.stderr);
                let report = report.trim();
                if !report.is_empty() {
                    eprintln!("{report}");
                }
            }
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        if stderr.is_empty() {
            Err(output.status.to_string())
        } else {
            Err(stderr.to_string())
        }
    }
}

/// Prints or applies a list of rename targets.
pub struct RenameExecutor {
    verbose: bool,
}

impl RenameExecutor {
    pub fn new() -> Self {
        Self { verbose: false }
    }

    /// Log each target before it is applied.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Writes one `from<TAB>to` line per target, in order.
    pub fn list<W: Write>(&self, targets: &RenameTargets, out: &mut W) -> io::Result<()> {
        for target in targets {
            writeln!(out, "{}\t{}", target.from(), target.to())?;
        }
        out.flush()
    }

    /// Applies every target through `tool`, stopping at the first failure.
    /// Returns the number of targets applied.
    pub fn apply<T: RenameTool + ?Sized>(
        &self,
        tool: &T,
        targets: &RenameTargets,
    ) -> Result<usize, ExecutorError> {
        if !tool.is_available() {
            return Err(ExecutorError::ToolMissing {
                tool: tool.name().to_string(),
                searched_path: tool.searches_path(),
                install: GORENAME_INSTALL,
            });
        }

        for (index, target) in targets.iter().enumerate() {
            self.apply_one(tool, index, target)?;
        }
        Ok(targets.len())
    }

    fn apply_one<T: RenameTool + ?Sized>(
        &self,
        tool: &T,
        index: usize,
        target: &RenameTarget,
    ) -> Result<(), ExecutorError> {
        if self.verbose {
            eprintln!("renaming target {} to {}", target.from(), target.to());
        }
        tool.rename(target.from(), target.to())
            .map_err(|reason| ExecutorError::RenameFailed {
                index,
                from: target.from().to_string(),
                to: target.to().to_string(),
                reason,
            })
    }
}

impl Default for RenameExecutor {
    fn default() -> Self {
        Self::new()
    }
}

/// First executable named `program` in the directories of `path_var`.
pub fn find_on_path(program: &std::ffi::OsStr, path_var: Option<OsString>) -> Option<PathBuf> {
    if program.is_empty() {
        return None;
    }
    let paths = path_var?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate))
}

fn is_executable(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        path.metadata()
            .map(|meta| meta.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }
    #[cfg(not(unix))]
    {
        true
    }
}
