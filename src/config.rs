//! Runtime options, config-file loading, and the whitelist.

use rustc_hash::FxHashSet;
use serde::Deserialize;
use std::path::Path;

use crate::error::Error;
use crate::mangle::IdentKind;

/// Options for a mangling run.
///
/// Loadable from a TOML file:
///
/// ```toml
/// whitelist = ["#logo", ".js-hook"]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Identifiers exempt from renaming, each either `#name` (an id) or
    /// `.name` (a class). Whitelisted names are never rewritten and are
    /// never produced as generated names.
    pub whitelist: Vec<String>,
}

impl Options {
    /// Load and validate options from a TOML file.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text =
            std::fs::read_to_string(path).map_err(|err| Error::Io(path.to_path_buf(), err))?;
        let options: Self = toml::from_str(&text)?;
        options.validate()?;
        Ok(options)
    }

    /// Check that every whitelist entry can actually match something.
    ///
    /// An entry without a `#`/`.` prefix, or with nothing after the
    /// prefix, silently protects nothing; that is always a configuration
    /// mistake, so it is rejected rather than ignored.
    pub fn validate(&self) -> Result<(), Error> {
        for entry in &self.whitelist {
            let valid = (entry.starts_with('#') || entry.starts_with('.')) && entry.len() > 1;
            if !valid {
                return Err(Error::Config(format!(
                    "whitelist entry `{entry}` must name an id (`#name`) or a class (`.name`)"
                )));
            }
        }
        Ok(())
    }
}

/// Parsed whitelist, partitioned by identifier kind.
///
/// Built once per [`crate::Mangler`] from [`Options::whitelist`]. Entries
/// without a recognized prefix are skipped here; [`Options::validate`]
/// is where they are reported.
#[derive(Debug, Clone, Default)]
pub struct Whitelist {
    ids: FxHashSet<String>,
    classes: FxHashSet<String>,
}

impl Whitelist {
    /// Parse `#name` / `.name` entries into per-kind sets.
    pub fn from_entries(entries: &[String]) -> Self {
        let mut ids = FxHashSet::default();
        let mut classes = FxHashSet::default();
        for entry in entries {
            if let Some(name) = entry.strip_prefix('#') {
                ids.insert(name.to_string());
            } else if let Some(name) = entry.strip_prefix('.') {
                classes.insert(name.to_string());
            }
        }
        Self { ids, classes }
    }

    /// Is `name` (without prefix) whitelisted for `kind`?
    pub fn contains(&self, kind: IdentKind, name: &str) -> bool {
        match kind {
            IdentKind::Id => self.ids.contains(name),
            IdentKind::Class => self.classes.contains(name),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty() && self.classes.is_empty()
    }
}
