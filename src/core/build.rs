//! Target platform and build-tag matching for Go source files.
//!
//! A file takes part in a build only when its name suffix (`_linux.go`,
//! `_arm64.go`, `_windows_amd64.go`) and its header constraints
//! (`//go:build`, or legacy `// +build` lines) agree with the target
//! `GOOS`/`GOARCH` and the enabled tags.

use anyhow::Result;
use regex::Regex;

const KNOWN_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "js", "linux",
    "nacl", "netbsd", "openbsd", "plan9", "solaris", "wasip1", "windows", "zos",
];

const KNOWN_ARCH: &[&str] = &[
    "386", "amd64", "amd64p32", "arm", "armbe", "arm64", "arm64be", "loong64", "mips", "mipsle",
    "mips64", "mips64le", "mips64p32", "mips64p32le", "ppc", "ppc64", "ppc64le", "riscv",
    "riscv64", "s390", "s390x", "sparc", "sparc64", "wasm",
];

const UNIX_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "linux",
    "netbsd", "openbsd", "solaris",
];

/// The platform and tags a package is loaded for.
#[derive(Debug, Clone)]
pub struct BuildContext {
    goos: String,
    goarch: String,
    cgo_enabled: bool,
    tags: Vec<String>,
    go_build_line: Regex,
    plus_build_line: Regex,
    expr_token: Regex,
}

impl BuildContext {
    pub fn new(goos: impl Into<String>, goarch: impl Into<String>) -> Self {
        Self {
            goos: goos.into(),
            goarch: goarch.into(),
            cgo_enabled: false,
            tags: Vec::new(),
            go_build_line: Regex::new(r"^//go:build(?:\s+(.*))?$")
                .expect("go:build pattern is valid"),
            plus_build_line: Regex::new(r"^//\s*\+build(?:\s+(.*))?$")
                .expect("+build pattern is valid"),
            expr_token: Regex::new(r"\|\||&&|!|\(|\)|[\p{L}\p{N}_.]+|\S")
                .expect("expression token pattern is valid"),
        }
    }

    /// The platform this binary runs on, with cgo enabled as for a native build.
    pub fn host() -> Self {
        Self::new(go_os(std::env::consts::OS), go_arch(std::env::consts::ARCH)).with_cgo(true)
    }

    /// [`BuildContext::host`] with `GOOS`, `GOARCH` and `CGO_ENABLED` overrides.
    pub fn from_env() -> Self {
        let mut context = Self::host();
        if let Some(goos) = non_empty_var("GOOS") {
            context.goos = goos;
        }
        if let Some(goarch) = non_empty_var("GOARCH") {
            context.goarch = goarch;
        }
        if let Some(cgo) = non_empty_var("CGO_ENABLED") {
            context.cgo_enabled = cgo == "1";
        }
        context
    }

    pub fn with_cgo(mut self, enabled: bool) -> Self {
        self.cgo_enabled = enabled;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    pub fn goos(&self) -> &str {
        &self.goos
    }

    pub fn goarch(&self) -> &str {
        &self.goarch
    }

    /// Applies the `_GOOS`, `_GOARCH` and `_GOOS_GOARCH` file name suffixes.
    /// Everything up to the first `_` is ignored, so `linux.go` is unrestricted.
    pub fn matches_file_name(&self, file_name: &str) -> bool {
        let stem = file_name.strip_suffix(".go").unwrap_or(file_name);
        let Some(index) = stem.find('_') else {
            return true;
        };

        let mut parts: Vec<&str> = stem[index..].split('_').collect();
        if parts.last() == Some(&"test") {
            parts.pop();
        }

        let n = parts.len();
        if n >= 2 && KNOWN_OS.contains(&parts[n - 2]) && KNOWN_ARCH.contains(&parts[n - 1]) {
            return self.match_tag(parts[n - 2]) && self.match_tag(parts[n - 1]);
        }
        if n >= 1 && (KNOWN_OS.contains(&parts[n - 1]) || KNOWN_ARCH.contains(&parts[n - 1])) {
            return self.match_tag(parts[n - 1]);
        }
        true
    }

    /// Evaluates the build constraints in the comment header above the
    /// package clause. A `//go:build` line takes precedence over `// +build`
    /// lines; several `// +build` lines must all hold.
    pub fn matches_header(&self, source: &str) -> Result<bool> {
        let mut go_build = None;
        let mut plus_build = Vec::new();
        let mut in_block_comment = false;

        for line in source.lines() {
            let line = line.trim();
            if in_block_comment {
                in_block_comment = !line.contains("*/");
                continue;
            }
            if line.is_empty() {
                continue;
            }
            if line.starts_with("/*") {
                in_block_comment = !line.contains("*/");
                continue;
            }
            if !line.starts_with("//") {
                break;
            }

            if let Some(captures) = self.go_build_line.captures(line) {
                if go_build.is_none() {
                    let expr = captures.get(1).map(|m| m.as_str()).unwrap_or("");
                    go_build = Some(expr.to_string());
                }
            } else if let Some(captures) = self.plus_build_line.captures(line) {
                let expr = captures.get(1).map(|m| m.as_str()).unwrap_or("");
                plus_build.push(expr.to_string());
            }
        }

        if let Some(expr) = go_build {
            return self.eval_go_build(&expr);
        }
        Ok(plus_build.iter().all(|line| self.eval_plus_build(line)))
    }

    /// `// +build a,!b c`: space-separated options are ORed, comma-separated
    /// terms within an option are ANDed.
    fn eval_plus_build(&self, line: &str) -> bool {
        line.split_whitespace().any(|option| {
            option.split(',').all(|term| match term.strip_prefix('!') {
                Some(tag) => !tag.is_empty() && !self.match_tag(tag),
                None => !term.is_empty() && self.match_tag(term),
            })
        })
    }

    fn eval_go_build(&self, expr: &str) -> Result<bool> {
        let tokens: Vec<&str> = self.expr_token.find_iter(expr).map(|m| m.as_str()).collect();
        if tokens.is_empty() {
            anyhow::bail!("invalid //go:build line: empty expression");
        }

        let mut parser = ExprParser {
            tokens: &tokens,
            pos: 0,
            context: self,
        };
        let value = parser.or_expr()?;
        if let Some(token) = parser.peek() {
            anyhow::bail!("invalid //go:build line: unexpected {token:?} in {expr:?}");
        }
        Ok(value)
    }

    pub fn match_tag(&self, tag: &str) -> bool {
        if self.tags.iter().any(|t| t == tag) {
            return true;
        }
        match tag {
            "cgo" => self.cgo_enabled,
            "gc" => true,
            "unix" => UNIX_OS.contains(&self.goos.as_str()),
            _ if tag == self.goos || tag == self.goarch => true,
            "linux" => self.goos == "android",
            "solaris" => self.goos == "illumos",
            "darwin" => self.goos == "ios",
            // Release tags: assume a toolchain new enough for any go1.N.
            _ => is_release_tag(tag),
        }
    }
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::host()
    }
}

/// Recursive descent over `||`, `&&`, `!` and parentheses.
struct ExprParser<'a> {
    tokens: &'a [&'a str],
    pos: usize,
    context: &'a BuildContext,
}

impl<'a> ExprParser<'a> {
    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<&'a str> {
        let token = self.tokens.get(self.pos).copied();
        self.pos += 1;
        token
    }

    fn or_expr(&mut self) -> Result<bool> {
        let mut value = self.and_expr()?;
        while self.peek() == Some("||") {
            self.pos += 1;
            let rhs = self.and_expr()?;
            value = value || rhs;
        }
        Ok(value)
    }

    fn and_expr(&mut self) -> Result<bool> {
        let mut value = self.not_expr()?;
        while self.peek() == Some("&&") {
            self.pos += 1;
            let rhs = self.not_expr()?;
            value = value && rhs;
        }
        Ok(value)
    }

    fn not_expr(&mut self) -> Result<bool> {
        if self.peek() == Some("!") {
            self.pos += 1;
            return Ok(!self.not_expr()?);
        }
        self.atom()
    }

    fn atom(&mut self) -> Result<bool> {
        match self.next() {
            Some("(") => {
                let value = self.or_expr()?;
                match self.next() {
                    Some(")") => Ok(value),
                    other => anyhow::bail!("invalid //go:build line: expected ')', found {other:?}"),
                }
            }
            Some(tag) if is_tag(tag) => Ok(self.context.match_tag(tag)),
            other => anyhow::bail!("invalid //go:build line: unexpected {other:?}"),
        }
    }
}

fn is_tag(token: &str) -> bool {
    token
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '.')
}

fn is_release_tag(tag: &str) -> bool {
    tag.strip_prefix("go1.")
        .map(|minor| !minor.is_empty() && minor.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false)
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

/// Go's name for a Rust `target_os`.
pub fn go_os(os: &str) -> &str {
    match os {
        "macos" => "darwin",
        "wasi" => "wasip1",
        other => other,
    }
}

/// Go's name for a Rust `target_arch`.
pub fn go_arch(arch: &str) -> &str {
    let little = cfg!(target_endian = "little");
    match arch {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        "loongarch64" => "loong64",
        "powerpc" => "ppc",
        "powerpc64" if little => "ppc64le",
        "powerpc64" => "ppc64",
        "mips" if little => "mipsle",
        "mips64" if little => "mips64le",
        "wasm32" => "wasm",
        other => other,
    }
}
