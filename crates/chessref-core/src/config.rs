//! Settings that downstream crates can serialize/deserialize.
//!
//! Layering (lowest to highest priority): `Default`, `from_env`, the
//! pipeline document's `config:` block, then CLI flags.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Field delimiter for CSV input and output.
    pub delimiter: u8,

    /// Prefix exported CSV files with a UTF-8 byte-order mark.
    pub write_bom: bool,

    /// Parse numeric-looking CSV fields into `Int`/`Float` instead of text.
    pub infer_types: bool,

    /// Load empty CSV fields as `Null` instead of empty text.
    pub empty_as_null: bool,

    /// Number of moves per game fed into a move tree.
    pub trie_max_depth: usize,

    /// Nodes visited fewer times than this are dropped from exported move trees.
    pub trie_min_count: u64,

    /// Column of a games table holding the space-separated move list.
    pub moves_column: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delimiter: b',',
            write_bom: true,
            infer_types: false,
            empty_as_null: false,
            trie_max_depth: 5,
            trie_min_count: 1,
            moves_column: "moves".to_string(),
        }
    }
}

impl Config {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `CHESSREF_DELIMITER`: single-byte field delimiter
    /// - `CHESSREF_WRITE_BOM`: `true`/`false`
    /// - `CHESSREF_INFER_TYPES`: `true`/`false`
    /// - `CHESSREF_EMPTY_AS_NULL`: `true`/`false`
    /// - `CHESSREF_TRIE_MAX_DEPTH`: move tree depth
    /// - `CHESSREF_TRIE_MIN_COUNT`: move tree pruning threshold
    /// - `CHESSREF_MOVES_COLUMN`: games column holding moves
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(s) = lookup("CHESSREF_DELIMITER") {
            if let [b] = s.as_bytes() {
                cfg.delimiter = *b;
            }
        }

        if let Some(s) = lookup("CHESSREF_WRITE_BOM") {
            if let Ok(v) = s.parse::<bool>() {
                cfg.write_bom = v;
            }
        }

        if let Some(s) = lookup("CHESSREF_INFER_TYPES") {
            if let Ok(v) = s.parse::<bool>() {
                cfg.infer_types = v;
            }
        }

        if let Some(s) = lookup("CHESSREF_EMPTY_AS_NULL") {
            if let Ok(v) = s.parse::<bool>() {
                cfg.empty_as_null = v;
            }
        }

        if let Some(s) = lookup("CHESSREF_TRIE_MAX_DEPTH") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.trie_max_depth = v;
            }
        }

        if let Some(s) = lookup("CHESSREF_TRIE_MIN_COUNT") {
            if let Ok(v) = s.parse::<u64>() {
                cfg.trie_min_count = v;
            }
        }

        if let Some(s) = lookup("CHESSREF_MOVES_COLUMN") {
            cfg.moves_column = s;
        }

        cfg
    }

    pub fn validate(&self) -> Result<()> {
        if matches!(self.delimiter, b'"' | b'\n' | b'\r') {
            return Err(Error::Config(format!(
                "delimiter {:?} cannot be used in CSV",
                self.delimiter as char
            )));
        }
        if self.trie_max_depth == 0 {
            return Err(Error::Config("trie_max_depth must be at least 1".into()));
        }
        if self.moves_column.is_empty() {
            return Err(Error::Config("moves_column must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn env_overrides_defaults_and_ignores_garbage() {
        let vars: HashMap<&str, &str> = [
            ("CHESSREF_DELIMITER", ";"),
            ("CHESSREF_WRITE_BOM", "false"),
            ("CHESSREF_TRIE_MAX_DEPTH", "not-a-number"),
            ("CHESSREF_MOVES_COLUMN", "san"),
        ]
        .into_iter()
        .collect();
        let cfg = Config::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.delimiter, b';');
        assert!(!cfg.write_bom);
        assert_eq!(cfg.trie_max_depth, 5);
        assert_eq!(cfg.moves_column, "san");
    }

    #[test]
    fn zero_depth_is_rejected() {
        let cfg = Config {
            trie_max_depth: 0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(Error::Config(_))));
        assert!(Config::default().validate().is_ok());
    }
}
