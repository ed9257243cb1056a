//! Vernacular translation of category sets (setrans).
//!
//! A setrans file maps MLS levels to human-readable markings:
//!
//! ```text
//! # level          marking          detail
//! s0               = SystemLow
//! s0:c90,c99       = CUI//LEI/INV   # Law enforcement investigation
//! ```
//!
//! Every data line passes through the dual-path gate before it is admitted.
//! The table is keyed by the category bitmask, so `c90,c99` and `c99,c90`
//! resolve to the same entry. Each bitmask holds one entry per sensitivity,
//! so `s1 = Confidential` and `s2 = Secret` coexist under the empty set.
//! A later line for the same level replaces the earlier one. After
//! construction the table is read-only.
//!
//! Lookups that find nothing fall back to the canonical level string so a
//! rendering is never empty and never hides a category.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::OnceLock;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::TranslationConfig;
use crate::error::LabelError;
use crate::gate;
use crate::label::{CategorySet, MlsLevel, SensitivityLevel};

mod line;

use line::ParsedLine;

type LinePath = fn(&[u8]) -> Result<ParsedLine, LabelError>;

/// Failures while building a translation table.
#[derive(Debug, Error)]
pub enum TranslationError {
    /// The source could not be read, or held no usable line.
    #[error("failed to load translation table from {origin}: {reason}")]
    LoadFailure {
        /// File path or other description of the source.
        origin: String,
        /// What went wrong.
        reason: String,
    },
    /// Strict mode: the two line parsers disagreed.
    #[error("translation line {line} failed dual-path verification")]
    IntegrityMismatch {
        /// 1-based line number.
        line: usize,
    },
}

/// One admitted marking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationEntry {
    /// Level the marking was declared at.
    pub level: MlsLevel,
    /// Human-readable marking, e.g. `CUI//LEI/INV`.
    pub name: String,
    /// Trailing `#` comment, if any.
    pub detail: Option<String>,
    /// 1-based source line.
    pub line: usize,
}

type EntryKey = (CategorySet, SensitivityLevel);

/// Immutable bitmask-indexed marking table.
#[derive(Debug, Clone, Default)]
pub struct TranslationTable {
    entries: BTreeMap<CategorySet, BTreeMap<SensitivityLevel, TranslationEntry>>,
    by_marking: BTreeMap<String, Vec<EntryKey>>,
    origin: String,
    load_failure: Option<String>,
}

impl TranslationTable {
    /// Load a setrans file.
    ///
    /// # Errors
    ///
    /// [`TranslationError::LoadFailure`] if the file cannot be read or has
    /// data lines of which none parse; [`TranslationError::IntegrityMismatch`]
    /// in strict mode when the line parsers disagree.
    pub fn load(path: &Path, strict: bool) -> Result<Self, TranslationError> {
        let origin = path.display().to_string();
        let file = File::open(path).map_err(|e| TranslationError::LoadFailure {
            origin: origin.clone(),
            reason: e.to_string(),
        })?;
        Self::from_reader(BufReader::new(file), strict, &origin)
    }

    /// Build from any buffered reader. `origin` is used in logs and errors.
    ///
    /// # Errors
    ///
    /// As [`TranslationTable::load`].
    pub fn from_reader<R: BufRead>(
        reader: R,
        strict: bool,
        origin: &str,
    ) -> Result<Self, TranslationError> {
        Self::ingest(reader, strict, origin, line::declared, line::scanned)
    }

    fn ingest<R: BufRead>(
        reader: R,
        strict: bool,
        origin: &str,
        declared: LinePath,
        scanned: LinePath,
    ) -> Result<Self, TranslationError> {
        let mut table = Self {
            origin: origin.to_owned(),
            ..Self::default()
        };
        let mut data_lines = 0usize;
        let mut parsed_lines = 0usize;

        for (index, chunk) in reader.split(b'\n').enumerate() {
            let line_no = index.saturating_add(1);
            let mut raw = chunk.map_err(|e| TranslationError::LoadFailure {
                origin: origin.to_owned(),
                reason: format!("line {line_no}: {e}"),
            })?;
            if raw.last() == Some(&b'\r') {
                raw.pop();
            }
            match raw.iter().find(|&&b| b != b' ' && b != b'\t') {
                None | Some(b'#') => continue,
                Some(_) => data_lines = data_lines.saturating_add(1),
            }

            match gate::adjudicate("translation line", &raw, declared, scanned) {
                Ok(parsed) => {
                    parsed_lines = parsed_lines.saturating_add(1);
                    table.admit(parsed, line_no);
                }
                Err(e) if strict && e.is_integrity_mismatch() => {
                    return Err(TranslationError::IntegrityMismatch { line: line_no });
                }
                Err(e) => {
                    warn!(origin, line = line_no, error = %e, "rejected translation line");
                }
            }
        }

        if data_lines > 0 && parsed_lines == 0 {
            return Err(TranslationError::LoadFailure {
                origin: origin.to_owned(),
                reason: format!("none of {data_lines} data lines could be parsed"),
            });
        }
        info!(
            origin,
            entries = table.len(),
            data_lines,
            "translation table loaded"
        );
        Ok(table)
    }

    /// Empty table that remembers why loading failed. Every render falls
    /// back to the raw level.
    pub fn raw_only(reason: impl Into<String>) -> Self {
        Self {
            load_failure: Some(reason.into()),
            ..Self::default()
        }
    }

    fn admit(&mut self, parsed: ParsedLine, line: usize) {
        let ParsedLine {
            range,
            name,
            detail,
        } = parsed;
        if !range.is_single() {
            debug!(line, range = %range, "skipping range translation");
            return;
        }
        let level = range.low().clone();
        let key = (level.categories().clone(), level.sensitivity());
        let entry = TranslationEntry {
            level,
            name: name.clone(),
            detail,
            line,
        };
        let previous = self
            .entries
            .entry(key.0.clone())
            .or_default()
            .insert(key.1, entry);
        if let Some(previous) = previous {
            warn!(
                origin = %self.origin,
                line,
                previous_line = previous.line,
                key = %previous.level,
                "duplicate translation replaces earlier line"
            );
            self.forget_marking(&previous.name, &key);
        }
        self.by_marking.entry(name).or_default().push(key);
    }

    fn forget_marking(&mut self, name: &str, key: &EntryKey) {
        if let Some(keys) = self.by_marking.get_mut(name) {
            keys.retain(|k| k != key);
            if keys.is_empty() {
                self.by_marking.remove(name);
            }
        }
    }

    /// Entry for this category set. When several sensitivities carry a
    /// marking for the set, the lowest one is returned.
    pub fn lookup(&self, categories: &CategorySet) -> Option<&TranslationEntry> {
        self.entries.get(categories)?.values().next()
    }

    /// Entry declared for exactly `level`.
    pub fn lookup_level(&self, level: &MlsLevel) -> Option<&TranslationEntry> {
        self.entries
            .get(level.categories())?
            .get(&level.sensitivity())
    }

    /// Marking for `level`, or its canonical string when no entry exists at
    /// that sensitivity. Never empty.
    pub fn render(&self, level: &MlsLevel) -> String {
        match self.lookup_level(level) {
            Some(entry) => entry.name.clone(),
            None => level.to_string(),
        }
    }

    /// Detail text attached to the entry [`lookup`](Self::lookup) returns.
    pub fn detail(&self, categories: &CategorySet) -> Option<&str> {
        self.lookup(categories).and_then(|e| e.detail.as_deref())
    }

    /// Reverse lookup: canonical levels (with detail) carrying `name`, in
    /// table order.
    pub fn lookup_by_marking(&self, name: &str) -> Vec<(String, Option<&str>)> {
        self.by_marking
            .get(name)
            .into_iter()
            .flatten()
            .filter_map(|(categories, sensitivity)| {
                self.entries.get(categories)?.get(sensitivity)
            })
            .map(|entry| (entry.level.to_string(), entry.detail.as_deref()))
            .collect()
    }

    /// Every entry whose level `level` dominates.
    pub fn readable_markings(&self, level: &MlsLevel) -> Vec<&TranslationEntry> {
        self.entries()
            .filter(|entry| level.dominates(&entry.level))
            .collect()
    }

    /// All entries in bitmask order, then by sensitivity.
    pub fn entries(&self) -> impl Iterator<Item = &TranslationEntry> {
        self.entries.values().flat_map(BTreeMap::values)
    }

    /// Number of admitted entries.
    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    /// True when no entry was admitted.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when this table stands in for one that failed to load.
    pub fn is_raw_only(&self) -> bool {
        self.load_failure.is_some()
    }

    /// Why loading failed, for raw-only tables.
    pub fn load_failure(&self) -> Option<&str> {
        self.load_failure.as_deref()
    }

    /// Where the table was loaded from.
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

// ── Process-wide table ──────────────────────────────────────────

static GLOBAL: OnceLock<TranslationTable> = OnceLock::new();

fn build(config: &TranslationConfig) -> TranslationTable {
    match TranslationTable::load(&config.path, config.strict) {
        Ok(table) => table,
        Err(e) => {
            error!(error = %e, "translation table unavailable, rendering raw levels");
            TranslationTable::raw_only(e.to_string())
        }
    }
}

/// Initialise the process-wide table from `config`.
///
/// Only the first call loads; later calls return the existing table and
/// ignore their argument. A load failure yields a raw-only table.
pub fn init_global(config: &TranslationConfig) -> &'static TranslationTable {
    GLOBAL.get_or_init(|| build(config))
}

/// The process-wide table, loading the default setrans path on first use.
pub fn global() -> &'static TranslationTable {
    GLOBAL.get_or_init(|| build(&TranslationConfig::default()))
}
