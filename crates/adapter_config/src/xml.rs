//! Run-configuration XML reader.
//!
//! Reads the top-level configuration groups described in the external
//! interfaces: `setup`, `markets`, `curves`, `npv`, `cashflow`, `simulation`,
//! `xva`, `sensitivity`. Every group is a flat set of name/value pairs; the
//! `active` key (when present) gates whether the stage runs.
//!
//! Expected shape (case-insensitive group/key names):
//!
//! ```xml
//! <Configuration>
//!   <Setup>
//!     <asofDate>2024-01-02</asofDate>
//!     <portfolioFile>portfolio.xml</portfolioFile>
//!   </Setup>
//!   <Xva active="Y">
//!     <active>Y</active>
//!     <cvaSpreadSensiShiftSize>0.0001</cvaSpreadSensiShiftSize>
//!   </Xva>
//! </Configuration>
//! ```

use std::collections::HashMap;
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::ConfigError;

/// A single flat configuration group: `active` gate plus name/value pairs.
#[derive(Debug, Clone, Default)]
pub struct ConfigGroup {
    /// Whether this stage is enabled. Defaults to `true` if the group has no
    /// explicit `active` key (matches the spec's "all optional but `setup`"
    /// framing — a present-but-silent group is assumed active).
    pub active: bool,
    entries: HashMap<String, String>,
}

impl ConfigGroup {
    fn from_entries(entries: HashMap<String, String>) -> Self {
        let active = entries
            .get("active")
            .map(|v| v.eq_ignore_ascii_case("Y") || v.eq_ignore_ascii_case("true"))
            .unwrap_or(true);
        Self { active, entries }
    }

    /// Fetch a required key, erroring if absent.
    pub fn require(&self, group: &str, key: &str) -> Result<&str, ConfigError> {
        self.entries
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| ConfigError::MissingKey {
                group: group.to_string(),
                key: key.to_string(),
            })
    }

    /// Fetch an optional key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Fetch an optional key parsed as bool (`"Y"`/`"N"` or `"true"`/`"false"`).
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key)
            .map(|v| v.eq_ignore_ascii_case("Y") || v.eq_ignore_ascii_case("true"))
    }
}

/// The fully parsed run configuration.
#[derive(Debug, Clone, Default)]
pub struct RunConfiguration {
    /// `setup` group — the only group required to be present.
    pub setup: ConfigGroup,
    /// `markets` group.
    pub markets: Option<ConfigGroup>,
    /// `curves` group.
    pub curves: Option<ConfigGroup>,
    /// `npv` group.
    pub npv: Option<ConfigGroup>,
    /// `cashflow` group.
    pub cashflow: Option<ConfigGroup>,
    /// `simulation` group.
    pub simulation: Option<ConfigGroup>,
    /// `xva` group.
    pub xva: Option<ConfigGroup>,
    /// `sensitivity` group.
    pub sensitivity: Option<ConfigGroup>,
}

const GROUP_NAMES: [&str; 8] = [
    "setup",
    "markets",
    "curves",
    "npv",
    "cashflow",
    "simulation",
    "xva",
    "sensitivity",
];

impl RunConfiguration {
    /// Parse a run configuration from an XML string.
    pub fn parse(xml: &str) -> Result<Self, ConfigError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut groups: HashMap<String, ConfigGroup> = HashMap::new();
        let mut current_group: Option<String> = None;
        let mut current_entries: HashMap<String, String> = HashMap::new();
        let mut current_key: Option<String> = None;
        let mut buf = Vec::new();

        loop {
            match reader
                .read_event_into(&mut buf)
                .map_err(|e| ConfigError::MalformedXml(e.to_string()))?
            {
                Event::Eof => break,
                Event::Start(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_lowercase();
                    if current_group.is_none() && GROUP_NAMES.contains(&name.as_str()) {
                        current_group = Some(name);
                        current_entries = HashMap::new();
                    } else if current_group.is_some() {
                        current_key = Some(name);
                    }
                }
                Event::Text(t) => {
                    if let Some(key) = &current_key {
                        let text = t
                            .unescape()
                            .map_err(|e| ConfigError::MalformedXml(e.to_string()))?
                            .trim()
                            .to_string();
                        current_entries.insert(key.clone(), text);
                    }
                }
                Event::End(e) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_lowercase();
                    if Some(&name) == current_group.as_ref() {
                        groups.insert(name.clone(), ConfigGroup::from_entries(current_entries));
                        current_entries = HashMap::new();
                        current_group = None;
                    } else if current_key.as_deref() == Some(name.as_str()) {
                        current_key = None;
                    }
                }
                _ => {}
            }
            buf.clear();
        }

        let setup = groups
            .remove("setup")
            .ok_or_else(|| ConfigError::MissingKey {
                group: "configuration".to_string(),
                key: "setup".to_string(),
            })?;

        Ok(RunConfiguration {
            setup,
            markets: groups.remove("markets"),
            curves: groups.remove("curves"),
            npv: groups.remove("npv"),
            cashflow: groups.remove("cashflow"),
            simulation: groups.remove("simulation"),
            xva: groups.remove("xva"),
            sensitivity: groups.remove("sensitivity"),
        })
    }

    /// Read and parse a run configuration from a file path.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let xml = std::fs::read_to_string(path)?;
        Self::parse(&xml)
    }
}
