use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::build::BuildContext;
use crate::parsers::{GoParser, ParsedFile};

/// The in-package source files of one Go package, test files included.
#[derive(Debug, Clone)]
pub struct Package {
    pub name: String,
    pub dir: PathBuf,
    pub files: Vec<ParsedFile>,
    /// Number of `<name>_test` files skipped as a separate package.
    pub external_test_files: usize,
}

impl Package {
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// Resolves a package specifier to a directory and parses its files.
///
/// Specifiers that look like paths (`.`, `./x`, `../x`, `/abs`) name a
/// directory. Anything else is an import path looked up in the enclosing
/// module, then `$GOROOT/src`, then each `$GOPATH/src`. Files built only
/// for another platform or tag set are left out.
pub struct PackageLoader {
    working_dir: PathBuf,
    goroot: Option<PathBuf>,
    gopath: Vec<PathBuf>,
    build: BuildContext,
    module_line: Regex,
}

impl PackageLoader {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            goroot: None,
            gopath: Vec::new(),
            build: BuildContext::default(),
            module_line: Regex::new(r#"(?m)^\s*module\s+"?([^\s"]+)"?"#)
                .expect("module pattern is valid"),
        }
    }

    /// Loader configured from the process environment: current directory,
    /// `GOROOT`, `GOPATH` (defaulting to `$HOME/go`), and the target platform
    /// from `GOOS`/`GOARCH`/`CGO_ENABLED`.
    pub fn from_env() -> Result<Self> {
        let working_dir =
            std::env::current_dir().context("failed to determine the working directory")?;

        let gopath: Vec<PathBuf> = match std::env::var_os("GOPATH") {
            Some(paths) if !paths.is_empty() => std::env::split_paths(&paths)
                .filter(|p| !p.as_os_str().is_empty())
                .collect(),
            _ => std::env::var_os("HOME")
                .map(|home| vec![PathBuf::from(home).join("go")])
                .unwrap_or_default(),
        };
        let goroot = std::env::var_os("GOROOT")
            .filter(|root| !root.is_empty())
            .map(PathBuf::from);

        let mut loader = Self::new(working_dir)
            .with_gopath(gopath)
            .with_build_context(BuildContext::from_env());
        if let Some(goroot) = goroot {
            loader = loader.with_goroot(goroot);
        }
        Ok(loader)
    }

    pub fn with_goroot(mut self, goroot: impl Into<PathBuf>) -> Self {
        self.goroot = Some(goroot.into());
        self
    }

    pub fn with_gopath(mut self, gopath: Vec<PathBuf>) -> Self {
        self.gopath = gopath;
        self
    }

    pub fn with_build_context(mut self, build: BuildContext) -> Self {
        self.build = build;
        self
    }

    pub fn build_context(&self) -> &BuildContext {
        &self.build
    }

    pub fn load(&self, package_spec: &str) -> Result<Package> {
        let dir = self.resolve_dir(package_spec)?;
        self.load_dir(&dir)
    }

    pub fn resolve_dir(&self, package_spec: &str) -> Result<PathBuf> {
        if package_spec.is_empty() {
            anyhow::bail!("invalid package specifier: empty string");
        }

        if is_local_spec(package_spec) {
            let dir = self.working_dir.join(package_spec);
            if !dir.is_dir() {
                anyhow::bail!("cannot find package \"{}\" in:\n\t{}", package_spec, dir.display());
            }
            return Ok(dir);
        }

        let candidates = self.import_path_candidates(package_spec);
        if let Some(dir) = candidates.iter().find(|dir| dir.is_dir()) {
            return Ok(dir.clone());
        }

        let searched: Vec<String> = candidates
            .iter()
            .map(|dir| format!("\t{}", dir.display()))
            .collect();
        anyhow::bail!(
            "cannot find package \"{}\" in any of:\n{}",
            package_spec,
            searched.join("\n")
        )
    }

    fn import_path_candidates(&self, import_path: &str) -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        if let Some((module_root, module_path)) = self.enclosing_module() {
            if import_path == module_path {
                candidates.push(module_root);
            } else if let Some(rest) = import_path
                .strip_prefix(module_path.as_str())
                .and_then(|rest| rest.strip_prefix('/'))
            {
                candidates.push(module_root.join(rest));
            }
        }

        if let Some(goroot) = &self.goroot {
            candidates.push(goroot.join("src").join(import_path));
        }
        for entry in &self.gopath {
            candidates.push(entry.join("src").join(import_path));
        }

        candidates
    }

    /// Nearest `go.mod` at or above the working directory, with its module path.
    fn enclosing_module(&self) -> Option<(PathBuf, String)> {
        for dir in self.working_dir.ancestors() {
            let go_mod = dir.join("go.mod");
            if !go_mod.is_file() {
                continue;
            }
            let contents = fs::read_to_string(&go_mod).ok()?;
            let module_path = self.module_line.captures(&contents)?.get(1)?.as_str();
            return Some((dir.to_path_buf(), module_path.to_string()));
        }
        None
    }

    /// Parses the buildable files of `dir` into a single package.
    pub fn load_dir(&self, dir: &Path) -> Result<Package> {
        let mut parser = GoParser::new()?;
        let mut sources = Vec::new();
        let mut tests = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.with_context(|| format!("failed to read {}", dir.display()))?;
            let Some(file_name) = entry.file_name().to_str() else {
                continue;
            };
            if !entry.file_type().is_file()
                || !is_candidate_name(file_name)
                || !self.build.matches_file_name(file_name)
            {
                continue;
            }

            let path = entry.path();
            let source = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            if !self
                .build
                .matches_header(&source)
                .with_context(|| format!("{}: invalid build constraint", path.display()))?
            {
                continue;
            }

            let parsed = parser.parse_source(&source, path)?;
            if parsed.is_test() {
                tests.push(parsed);
            } else {
                sources.push(parsed);
            }
        }

        let name = match sources.first() {
            Some(first) => first.package.clone(),
            None => anyhow::bail!("no buildable Go source files in {}", dir.display()),
        };

        if let Some(other) = sources.iter().find(|file| file.package != name) {
            anyhow::bail!(
                "found packages {} ({}) and {} ({}) in {}",
                name,
                sources[0].file_name(),
                other.package,
                other.file_name(),
                dir.display()
            );
        }

        // In-package tests join the package; `<name>_test` files form a
        // separate external test package and are left out.
        let external_test_name = format!("{name}_test");
        let mut external_test_files = 0;
        let mut files = sources;
        for file in tests {
            if file.package == name {
                files.push(file);
            } else if file.package == external_test_name {
                external_test_files += 1;
            } else {
                anyhow::bail!(
                    "found packages {} ({}) and {} ({}) in {}",
                    name,
                    files[0].file_name(),
                    file.package,
                    file.file_name(),
                    dir.display()
                );
            }
        }

        Ok(Package {
            name,
            dir: dir.to_path_buf(),
            files,
            external_test_files,
        })
    }
}

fn is_local_spec(spec: &str) -> bool {
    spec == "."
        || spec == ".."
        || spec.starts_with("./")
        || spec.starts_with("../")
        || Path::new(spec).is_absolute()
}

fn is_candidate_name(name: &str) -> bool {
    name.ends_with(".go") && !name.starts_with('_') && !name.starts_with('.')
}
