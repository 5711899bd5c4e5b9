use std::fmt;

/// A proposed rename of one package-level declaration, in the form gorename
/// accepts: `from` is the qualified reference `"<package>".<Name>`, `to` the
/// bare replacement identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameTarget {
    from: String,
    to: String,
    original: String,
}

impl RenameTarget {
    pub fn new(package_spec: &str, original: &str, to: impl Into<String>) -> Self {
        Self {
            from: format!("\"{}\".{}", package_spec, original),
            to: to.into(),
            original: original.to_string(),
        }
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    /// The unqualified identifier being replaced.
    pub fn original(&self) -> &str {
        &self.original
    }
}

impl fmt::Display for RenameTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.from, self.to)
    }
}

/// Append-only accumulator of rename targets in discovery order.
#[derive(Debug, Clone, Default)]
pub struct RenameTargets {
    targets: Vec<RenameTarget>,
}

impl RenameTargets {
    pub fn new() -> Self {
        Self {
            targets: Vec::with_capacity(16),
        }
    }

    pub fn push(&mut self, target: RenameTarget) {
        self.targets.push(target);
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RenameTarget> {
        self.targets.iter()
    }

    pub fn as_slice(&self) -> &[RenameTarget] {
        &self.targets
    }
}

impl<'a> IntoIterator for &'a RenameTargets {
    type Item = &'a RenameTarget;
    type IntoIter = std::slice::Iter<'a, RenameTarget>;

    fn into_iter(self) -> Self::IntoIter {
        self.targets.iter()
    }
}

impl IntoIterator for RenameTargets {
    type Item = RenameTarget;
    type IntoIter = std::vec::IntoIter<RenameTarget>;

    fn into_iter(self) -> Self::IntoIter {
        self.targets.into_iter()
    }
}

impl FromIterator<RenameTarget> for RenameTargets {
    fn from_iter<I: IntoIterator<Item = RenameTarget>>(iter: I) -> Self {
        Self {
            targets: iter.into_iter().collect(),
        }
    }
}
