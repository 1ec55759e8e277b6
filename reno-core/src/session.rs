use chrono::NaiveDate;
use std::collections::HashMap;

use crate::codec::{self, CodecError};
use crate::models::{join_links, parse_links, Level, ReleaseRecord, ServiceEntry};

/// Raw form state for one service, held exactly as typed. Link lists stay
/// multi-line text here and are only parsed when the record is assembled.
#[derive(Debug, Clone, Default)]
pub struct ServiceFormState {
    pub config_only: bool,
    pub risk_level: Level,
    pub benefit_level: Level,
    pub version: String,
    pub change_description: String,
    pub known_issues: String,
    pub pr_links_text: String,
    pub design_links_text: String,
    pub code_quality_links_text: String,
    pub additional_links_text: String,
}

impl ServiceFormState {
    fn from_entry(entry: &ServiceEntry) -> Self {
        Self {
            config_only: entry.config_only,
            risk_level: entry.risk_level,
            benefit_level: entry.benefit_level,
            version: entry.version.clone(),
            change_description: entry.change_description.clone(),
            known_issues: entry.known_issues.clone(),
            pr_links_text: join_links(&entry.pr_links),
            design_links_text: join_links(&entry.design_links),
            code_quality_links_text: join_links(&entry.code_quality_links),
            additional_links_text: join_links(&entry.additional_links),
        }
    }

    fn to_entry(&self, service: &str) -> ServiceEntry {
        ServiceEntry {
            service: service.to_string(),
            config_only: self.config_only,
            risk_level: self.risk_level,
            benefit_level: self.benefit_level,
            version: self.version.clone(),
            change_description: self.change_description.clone(),
            known_issues: self.known_issues.clone(),
            pr_links: parse_links(&self.pr_links_text),
            design_links: parse_links(&self.design_links_text),
            code_quality_links: parse_links(&self.code_quality_links_text),
            additional_links: parse_links(&self.additional_links_text),
        }
    }
}

/// Per-session form state for the note editor.
///
/// Input widgets bind to the fields of this struct at the start of a render
/// pass and must not have their bound values replaced mid-pass. Loading a
/// previously exported record therefore goes through a two-state protocol:
/// [`FormSession::import`] stages the decoded record in a holding slot
/// without touching any widget state, and [`FormSession::begin_pass`] -
/// called at the very start of the next pass, before any widget reads the
/// session - unpacks the slot into the bound fields. The caller forces a
/// fresh pass after a successful import; skip either half and the loaded
/// values appear one interaction late or not at all.
#[derive(Debug, Clone)]
pub struct FormSession {
    pub release_date: NaiveDate,
    pub contact: String,
    /// Selected services, in selection order
    pub selected_services: Vec<String>,
    service_state: HashMap<String, ServiceFormState>,
    pending_load: Option<ReleaseRecord>,
}

impl FormSession {
    /// Creates a session at first-open defaults: dated today, nothing
    /// selected
    pub fn new() -> Self {
        Self {
            release_date: chrono::Local::now().date_naive(),
            contact: String::new(),
            selected_services: Vec::new(),
            service_state: HashMap::new(),
            pending_load: None,
        }
    }

    /// Decodes a portable string and stages the record for the next render
    /// pass. On decode failure the error is returned and no session state
    /// changes; on success the caller must force a fresh pass so
    /// [`begin_pass`](Self::begin_pass) can apply the staged record.
    pub fn import(&mut self, portable: &str) -> Result<(), CodecError> {
        let record = codec::decode(portable)?;
        self.pending_load = Some(record);
        Ok(())
    }

    /// Stages an already decoded record for the next render pass
    pub fn request_load(&mut self, record: ReleaseRecord) {
        self.pending_load = Some(record);
    }

    /// True when a staged record is waiting for the next pass
    pub fn has_pending_load(&self) -> bool {
        self.pending_load.is_some()
    }

    /// Applies any staged record. Must run at the very start of a render
    /// pass, before any input widget reads the session.
    pub fn begin_pass(&mut self) {
        let Some(record) = self.pending_load.take() else {
            return;
        };

        // An absent or unparseable imported date keeps the prior value.
        if let Some(date) = record.release_date {
            self.release_date = date;
        }
        self.contact = record.contact.clone();

        self.selected_services = record
            .service_names()
            .into_iter()
            .map(String::from)
            .collect();
        for entry in &record.services {
            self.service_state
                .insert(entry.service.clone(), ServiceFormState::from_entry(entry));
        }
    }

    /// Form state for one service, created at defaults on first access
    pub fn service_state_mut(&mut self, service: &str) -> &mut ServiceFormState {
        self.service_state.entry(service.to_string()).or_default()
    }

    /// Toggles a service in or out of the selection, preserving the order
    /// the remaining selections were made in
    pub fn toggle_service(&mut self, service: &str) {
        if let Some(pos) = self.selected_services.iter().position(|s| s == service) {
            self.selected_services.remove(pos);
        } else {
            self.selected_services.push(service.to_string());
        }
    }

    pub fn is_selected(&self, service: &str) -> bool {
        self.selected_services.iter().any(|s| s == service)
    }

    /// Projects the current form state into a record. Pure: no session
    /// state changes, and calling it twice in one pass yields identical
    /// output. Services a state entry was never created for come out with
    /// all fields at their defaults.
    pub fn assemble(&self) -> ReleaseRecord {
        let default_state = ServiceFormState::default();
        let services = self
            .selected_services
            .iter()
            .map(|name| {
                self.service_state
                    .get(name)
                    .unwrap_or(&default_state)
                    .to_entry(name)
            })
            .collect();

        ReleaseRecord {
            release_date: Some(self.release_date),
            contact: self.contact.clone(),
            services,
        }
    }

    /// Resets everything to first-open defaults, dropping any staged load
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}

impl Default for FormSession {
    fn default() -> Self {
        Self::new()
    }
}
