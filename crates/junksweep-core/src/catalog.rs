/// The junk catalog — the single source of truth for "what counts as junk".
///
/// A [`JunkCatalog`] maps directory basenames to [`JunkKind`] entries via
/// exact-name or simple `*` glob patterns. The catalog is an immutable value
/// built once at startup and passed by reference into the scanner, so
/// classification stays a pure function of (catalog, name) and tests can
/// inject their own catalogs.
///
/// Construction fails fast if two entries claim the same pattern: catalog
/// order is the classification tie-break, and an overlap would silently
/// misclassify every directory matching the later entry.
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One category of disposable development artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JunkKind {
    /// Stable snake_case identifier, e.g. `"python_venv"`.
    pub id: String,
    /// Human-readable name, e.g. `"Python Venv"`.
    pub display_name: String,
    /// Basename patterns, matched in order. Either literal names or simple
    /// globs where `*` matches any run of characters within the basename.
    pub patterns: Vec<String>,
}

impl JunkKind {
    pub fn new(id: &str, display_name: &str, patterns: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Check whether a directory basename matches this kind.
    ///
    /// Matching is case-sensitive and covers the *full* basename — a
    /// directory named `my-build-archive` must not match `build`.
    pub fn matches_name(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| pattern_matches(p, name))
    }
}

impl std::fmt::Display for JunkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name)
    }
}

/// Ordered, conflict-checked registry of [`JunkKind`] entries.
#[derive(Debug, Clone)]
pub struct JunkCatalog {
    kinds: Vec<JunkKind>,
}

impl JunkCatalog {
    /// Build a catalog from the given kinds.
    ///
    /// Returns [`Error::CatalogConflict`] if any two entries share a
    /// pattern string.
    pub fn new(kinds: Vec<JunkKind>) -> Result<Self> {
        let mut seen: HashMap<&str, &str> = HashMap::new();
        for kind in &kinds {
            for pattern in &kind.patterns {
                if let Some(first) = seen.insert(pattern.as_str(), kind.id.as_str()) {
                    return Err(Error::CatalogConflict {
                        pattern: pattern.clone(),
                        first: first.to_string(),
                        second: kind.id.clone(),
                    });
                }
            }
        }
        Ok(Self { kinds })
    }

    /// The built-in catalog of well-known development junk directories.
    pub fn default_catalog() -> Self {
        // Patterns are mutually exclusive by construction; `new` re-checks.
        Self::new(vec![
            JunkKind::new("python_venv", "Python Venv", &[".venv", "venv"]),
            JunkKind::new("python_tox", "Python Tox", &[".tox"]),
            JunkKind::new("python_cache", "Python Cache", &["__pycache__"]),
            JunkKind::new("mypy_cache", "Mypy Cache", &[".mypy_cache"]),
            JunkKind::new("pytest_cache", "Pytest Cache", &[".pytest_cache"]),
            JunkKind::new("node_modules", "Node Modules", &["node_modules"]),
            JunkKind::new("rust_target", "Rust Target", &["target"]),
            JunkKind::new("build_dir", "Build Dir", &["build"]),
            JunkKind::new("dist_dir", "Dist Dir", &["dist"]),
            JunkKind::new("out_dir", "Out Dir", &["out"]),
            JunkKind::new("go_vendor", "Go Vendor", &["vendor"]),
            JunkKind::new("next_dir", "Next.js", &[".next"]),
            JunkKind::new("nuxt_dir", "Nuxt.js", &[".nuxt"]),
        ])
        .expect("built-in catalog patterns must not overlap")
    }

    /// Classify a directory basename.
    ///
    /// Returns the first matching kind in catalog order, or `None`.
    /// Pure: the same name always yields the same answer.
    pub fn classify(&self, name: &str) -> Option<&JunkKind> {
        self.kinds.iter().find(|k| k.matches_name(name))
    }

    /// All kinds, in catalog (tie-break) order.
    pub fn kinds(&self) -> &[JunkKind] {
        &self.kinds
    }

    /// Look up a kind by its stable id.
    pub fn get(&self, id: &str) -> Option<&JunkKind> {
        self.kinds.iter().find(|k| k.id == id)
    }
}

impl Default for JunkCatalog {
    fn default() -> Self {
        Self::default_catalog()
    }
}

/// Match `name` against `pattern`, where `*` matches any (possibly empty)
/// run of characters. Anchored at both ends; case-sensitive.
fn pattern_matches(pattern: &str, name: &str) -> bool {
    if !pattern.contains('*') {
        return pattern == name;
    }
    let mut segments = pattern.split('*');
    // The first segment is anchored at the start, the last at the end;
    // the rest must appear in order in between.
    let first = segments.next().unwrap_or("");
    let Some(rest) = name.strip_prefix(first) else {
        return false;
    };
    let segments: Vec<&str> = segments.collect();
    let mut remaining = rest;
    for (i, seg) in segments.iter().enumerate() {
        if seg.is_empty() {
            continue;
        }
        if i == segments.len() - 1 {
            match remaining.strip_suffix(seg) {
                Some(_) => return true,
                None => return false,
            }
        }
        match remaining.find(seg) {
            Some(pos) => remaining = &remaining[pos + seg.len()..],
            None => return false,
        }
    }
    true
}
