//! Kernel `.config` state lookup.
//!
//! A built kernel configuration assigns each symbol one of `y`, `n`, or `m`.
//! The renderer uses this only to colorize symbols; it never influences tree
//! structure or search results.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::warn;

/// Resolved state of one configuration symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolState {
    Enabled,
    Disabled,
    Module,
    /// Not present in the state file.
    Unknown,
}

/// Per-symbol states loaded from a `.config`-style file.
#[derive(Debug, Default)]
pub struct ConfigStates {
    states: HashMap<String, SymbolState>,
}

impl ConfigStates {
    /// Loads states from `path`.
    ///
    /// Malformed assignment lines are skipped with a warning; comments and
    /// anything else that does not look like `CONFIG_NAME=y|n|m` are
    /// silently ignored.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("cannot read config state file {}", path.display()))?;
        Ok(Self::parse(&content))
    }

    fn parse(content: &str) -> Self {
        let mut states = HashMap::new();
        for line in content.lines() {
            let line = line.trim_end_matches('\r');
            let Some(rest) = line.strip_prefix("CONFIG_") else {
                continue;
            };
            let Some((name, value)) = rest.split_once('=') else {
                warn!("skipping malformed config state line: {line}");
                continue;
            };
            let state = match value {
                "y" => SymbolState::Enabled,
                "n" => SymbolState::Disabled,
                "m" => SymbolState::Module,
                other => {
                    warn!("skipping config state {name}={other}");
                    continue;
                }
            };
            states.insert(name.to_string(), state);
        }
        Self { states }
    }

    /// State of `name`; absent entries resolve to [`SymbolState::Unknown`].
    pub fn get(&self, name: &str) -> SymbolState {
        self.states
            .get(name)
            .copied()
            .unwrap_or(SymbolState::Unknown)
    }
}
