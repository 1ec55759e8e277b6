use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity/benefit scale used for both risk and benefit ratings
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Level {
    #[default]
    Low,
    Medium,
    High,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Low => write!(f, "Low"),
            Level::Medium => write!(f, "Medium"),
            Level::High => write!(f, "High"),
        }
    }
}

impl Level {
    /// Parse a level from a string. Unrecognized values fall back to `Low`
    /// so that older or hand-edited exports never fail to load.
    pub fn parse_or_low(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "medium" => Level::Medium,
            "high" => Level::High,
            _ => Level::Low,
        }
    }

    /// All levels in ascending order, for building selection widgets
    pub fn all() -> [Level; 3] {
        [Level::Low, Level::Medium, Level::High]
    }
}

/// The structured details attached to one service within a release record
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceEntry {
    /// Service name; the key under `services` on the wire
    pub service: String,

    /// True when the release touches configuration only
    pub config_only: bool,

    /// Risk carried by the change
    pub risk_level: Level,

    /// Benefit delivered by the change
    pub benefit_level: Level,

    /// Version being released
    pub version: String,

    /// Multi-line description of what changed
    pub change_description: String,

    /// Known issues, risks and mitigations
    pub known_issues: String,

    pub pr_links: Vec<String>,
    pub design_links: Vec<String>,
    pub code_quality_links: Vec<String>,
    pub additional_links: Vec<String>,
}

impl ServiceEntry {
    /// Creates an empty entry for the named service with all fields at
    /// their defaults
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            ..Default::default()
        }
    }
}

/// One release note's full structured content
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReleaseRecord {
    /// Date of the release. `None` only for decoded input whose date was
    /// missing or unparseable; a freshly opened form always has a date.
    pub release_date: Option<NaiveDate>,

    /// Point of contact, drawn from the configured contact list
    pub contact: String,

    /// Per-service details, in the order the services were selected.
    /// Service names are unique within a record.
    pub services: Vec<ServiceEntry>,
}

impl ReleaseRecord {
    /// Creates an empty record dated today
    pub fn new() -> Self {
        Self {
            release_date: Some(chrono::Local::now().date_naive()),
            contact: String::new(),
            services: Vec::new(),
        }
    }

    /// Gets a service entry by name
    pub fn service(&self, name: &str) -> Option<&ServiceEntry> {
        self.services.iter().find(|s| s.service == name)
    }

    /// Service names in selection order
    pub fn service_names(&self) -> Vec<&str> {
        self.services.iter().map(|s| s.service.as_str()).collect()
    }

    /// Adds a service entry, replacing any existing entry with the same
    /// name in place so selection order is preserved
    pub fn add_service(&mut self, entry: ServiceEntry) {
        if let Some(existing) = self.services.iter_mut().find(|s| s.service == entry.service) {
            *existing = entry;
        } else {
            self.services.push(entry);
        }
    }
}

impl Default for ReleaseRecord {
    fn default() -> Self {
        Self::new()
    }
}

/// Splits multi-line link text into one trimmed link per non-blank line
pub fn parse_links(text: &str) -> Vec<String> {
    text.lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .map(|l| l.to_string())
        .collect()
}

/// Joins parsed links back into the multi-line text a form field holds.
/// Inverse of [`parse_links`] for already-trimmed input.
pub fn join_links(links: &[String]) -> String {
    links.join("\n")
}

/// Prefix check used only to decide whether a link is rendered clickable
pub fn looks_like_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}
