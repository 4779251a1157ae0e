//! Extractor configuration.
//!
//! The alias table and thresholds are built once (defaults, JSON file or
//! environment) and handed to the engine as an immutable value.
//!
//! ```json
//! {
//!   "date": ["date", "value date"],
//!   "description": ["narration"],
//!   "withdrawal": ["debit"],
//!   "deposit": ["credit"]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};
use crate::models::Field;

/// Similarity a first-column cell must exceed to mark a header candidate.
pub const DEFAULT_HEADER_THRESHOLD: u8 = 80;

/// Similarity a header cell must exceed to claim a field.
pub const DEFAULT_FIELD_THRESHOLD: u8 = 80;

/// Day-month-year layouts tried for textual dates, in order.
///
/// `%y` layouts precede `%Y`: chrono's `%Y` reads `24` as year 0024.
pub const DEFAULT_DATE_FORMATS: &[&str] = &[
    "%d-%m-%y",
    "%d/%m/%y",
    "%d-%m-%Y",
    "%d/%m/%Y",
    "%d.%m.%Y",
    "%d-%b-%Y",
    "%d %b %Y",
];

/// Default HTTP port for `serve`.
pub const DEFAULT_PORT: u16 = 3000;

// =============================================================================
// Alias Table
// =============================================================================

/// Known header variants per semantic field, in priority order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AliasTable {
    aliases: BTreeMap<Field, Vec<String>>,
}

impl Default for AliasTable {
    fn default() -> Self {
        let mut aliases = BTreeMap::new();
        aliases.insert(
            Field::Date,
            strings(&["date", "transaction date", "value date", "Txn Date", "Expense Date"]),
        );
        aliases.insert(
            Field::Description,
            strings(&["description", "particulars", "payment name", "narration"]),
        );
        aliases.insert(
            Field::Withdrawal,
            strings(&["debit", "withdrawal", "amount withdrawn"]),
        );
        aliases.insert(
            Field::Deposit,
            strings(&["credit", "deposit", "amount deposited"]),
        );
        Self { aliases }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl AliasTable {
    /// Build a table, rejecting fields without aliases.
    pub fn new(aliases: BTreeMap<Field, Vec<String>>) -> ConfigResult<Self> {
        let table = Self { aliases };
        table.validate()?;
        Ok(table)
    }

    /// Load a table from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let aliases: BTreeMap<Field, Vec<String>> = serde_json::from_str(json)?;
        Self::new(aliases)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn get(&self, field: Field) -> &[String] {
        self.aliases.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    fn validate(&self) -> ConfigResult<()> {
        for field in Field::ALL {
            if self.get(field).iter().all(|a| a.trim().is_empty()) {
                return Err(ConfigError::EmptyAliases(field.name().to_string()));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Extractor Configuration
// =============================================================================

/// Everything the engine needs besides the file itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    pub aliases: AliasTable,
    pub header_threshold: u8,
    pub field_threshold: u8,
    pub date_formats: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            aliases: AliasTable::default(),
            header_threshold: DEFAULT_HEADER_THRESHOLD,
            field_threshold: DEFAULT_FIELD_THRESHOLD,
            date_formats: strings(DEFAULT_DATE_FORMATS),
        }
    }
}

impl ExtractorConfig {
    pub fn with_aliases(mut self, aliases: AliasTable) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn with_thresholds(mut self, header: u8, field: u8) -> Self {
        self.header_threshold = header;
        self.field_threshold = field;
        self
    }
}

// =============================================================================
// Environment Settings
// =============================================================================

/// Process settings read from the environment (after `.env` is loaded).
///
/// | Variable                        | Meaning                      |
/// |---------------------------------|------------------------------|
/// | `LEDGERLIFT_ALIASES`            | JSON alias table path        |
/// | `LEDGERLIFT_HEADER_THRESHOLD`   | header candidate threshold   |
/// | `LEDGERLIFT_FIELD_THRESHOLD`    | field match threshold        |
/// | `LEDGERLIFT_PORT`               | HTTP port                    |
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub aliases_path: Option<PathBuf>,
    pub header_threshold: u8,
    pub field_threshold: u8,
    pub port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            aliases_path: None,
            header_threshold: DEFAULT_HEADER_THRESHOLD,
            field_threshold: DEFAULT_FIELD_THRESHOLD,
            port: DEFAULT_PORT,
        }
    }
}

impl Settings {
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup; used by `from_env` and tests.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let defaults = Self::default();
        Ok(Self {
            aliases_path: lookup("LEDGERLIFT_ALIASES")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            header_threshold: parse_threshold(
                "LEDGERLIFT_HEADER_THRESHOLD",
                lookup("LEDGERLIFT_HEADER_THRESHOLD"),
                defaults.header_threshold,
            )?,
            field_threshold: parse_threshold(
                "LEDGERLIFT_FIELD_THRESHOLD",
                lookup("LEDGERLIFT_FIELD_THRESHOLD"),
                defaults.field_threshold,
            )?,
            port: match lookup("LEDGERLIFT_PORT") {
                Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidPort {
                    name: "LEDGERLIFT_PORT".into(),
                    value: raw,
                })?,
                None => defaults.port,
            },
        })
    }

    /// Resolve the extractor configuration these settings describe.
    ///
    /// `aliases_override` takes precedence over `LEDGERLIFT_ALIASES`.
    pub fn extractor_config(&self, aliases_override: Option<&Path>) -> ConfigResult<ExtractorConfig> {
        let aliases = match aliases_override.or(self.aliases_path.as_deref()) {
            Some(path) => AliasTable::from_file(path)?,
            None => AliasTable::default(),
        };
        Ok(ExtractorConfig::default()
            .with_aliases(aliases)
            .with_thresholds(self.header_threshold, self.field_threshold))
    }
}

fn parse_threshold(name: &str, raw: Option<String>, default: u8) -> ConfigResult<u8> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<u8>() {
        Ok(v) if v <= 100 => Ok(v),
        _ => Err(ConfigError::InvalidThreshold {
            name: name.to_string(),
            value: raw,
        }),
    }
}
