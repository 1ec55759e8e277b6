use uuid::Uuid;

use crate::codec;
use crate::models::{looks_like_url, ReleaseRecord, ServiceEntry};

/// One collated release note: a decoded record plus the identifier used for
/// targeted deletion. The id is generated fresh on every add and is never
/// part of the portable string, so pasting the same note twice yields two
/// distinct entries.
#[derive(Debug, Clone)]
pub struct CollatorEntry {
    pub id: Uuid,
    pub record: ReleaseRecord,
}

/// Outcome of one multi-line ingest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub added: usize,
    pub failed: usize,
}

/// Ordered collection of collated release notes
#[derive(Debug, Clone, Default)]
pub struct Collator {
    entries: Vec<CollatorEntry>,
}

impl Collator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[CollatorEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Decodes one portable string per non-blank line and appends the
    /// successes, in input order, to the end of the collection. A bad line
    /// never blocks its siblings; the report carries the aggregate counts.
    pub fn ingest(&mut self, text: &str) -> IngestReport {
        let mut report = IngestReport::default();

        // Replace the collection wholesale rather than mutating in place,
        // so a render pass holding the previous slice is never invalidated.
        let mut next = self.entries.clone();
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            match codec::decode(line) {
                Ok(record) => {
                    next.push(CollatorEntry {
                        id: Uuid::new_v4(),
                        record,
                    });
                    report.added += 1;
                }
                Err(_) => report.failed += 1,
            }
        }
        self.entries = next;

        report
    }

    /// Removes the entry with the given id. No-op when absent.
    pub fn remove(&mut self, id: Uuid) {
        let mut next = self.entries.clone();
        next.retain(|e| e.id != id);
        self.entries = next;
    }

    pub fn clear(&mut self) {
        self.entries = Vec::new();
    }
}

/// One item in a list-valued detail field; `is_url` decides whether the
/// renderer shows it as a hyperlink or plain text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkItem {
    pub text: String,
    pub is_url: bool,
}

/// One populated field of a service's detail listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailField {
    Text { label: &'static str, value: String },
    Links { label: &'static str, items: Vec<LinkItem> },
}

/// Detail rows for one service within a card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDetail {
    pub service: String,
    pub fields: Vec<DetailField>,
}

/// Display summary for one collated entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardSummary {
    pub id: Uuid,
    /// Headline: release date and contact
    pub headline: String,
    /// Pipe-joined service names, in record order
    pub service_line: String,
    pub details: Vec<ServiceDetail>,
}

/// Derives the card view model for one entry. Levels are always listed;
/// empty text fields, empty link lists and an unset config-only flag are
/// omitted rather than shown blank, which is how entries decoded from
/// older-schema exports stay readable.
pub fn summarize(entry: &CollatorEntry) -> CardSummary {
    let record = &entry.record;

    let date = record
        .release_date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "unknown date".to_string());
    let headline = if record.contact.is_empty() {
        date.clone()
    } else {
        format!("{} - {}", date, record.contact)
    };

    let service_line = record.service_names().join(" | ");

    CardSummary {
        id: entry.id,
        headline,
        service_line,
        details: record.services.iter().map(service_detail).collect(),
    }
}

fn service_detail(entry: &ServiceEntry) -> ServiceDetail {
    let mut fields = Vec::new();

    if entry.config_only {
        fields.push(DetailField::Text {
            label: "Config only",
            value: "yes".to_string(),
        });
    }
    fields.push(DetailField::Text {
        label: "Risk level",
        value: entry.risk_level.to_string(),
    });
    fields.push(DetailField::Text {
        label: "Benefit level",
        value: entry.benefit_level.to_string(),
    });

    push_text(&mut fields, "Version", &entry.version);
    push_text(&mut fields, "Change description", &entry.change_description);
    push_text(&mut fields, "Known issues", &entry.known_issues);

    push_links(&mut fields, "PR links", &entry.pr_links);
    push_links(&mut fields, "Design links", &entry.design_links);
    push_links(&mut fields, "Code quality links", &entry.code_quality_links);
    push_links(&mut fields, "Additional links", &entry.additional_links);

    ServiceDetail {
        service: entry.service.clone(),
        fields,
    }
}

fn push_text(fields: &mut Vec<DetailField>, label: &'static str, value: &str) {
    if !value.is_empty() {
        fields.push(DetailField::Text {
            label,
            value: value.to_string(),
        });
    }
}

fn push_links(fields: &mut Vec<DetailField>, label: &'static str, links: &[String]) {
    if links.is_empty() {
        return;
    }
    fields.push(DetailField::Links {
        label,
        items: links
            .iter()
            .map(|l| LinkItem {
                text: l.clone(),
                is_url: looks_like_url(l),
            })
            .collect(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode;
    use crate::models::Level;
    use chrono::NaiveDate;

    fn sample_record(contact: &str) -> ReleaseRecord {
        let mut record = ReleaseRecord {
            release_date: Some(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
            contact: contact.to_string(),
            services: Vec::new(),
        };
        let mut billing = ServiceEntry::new("Billing");
        billing.risk_level = Level::High;
        billing.pr_links = vec![
            "https://x/1".to_string(),
            "see ticket RENO-42".to_string(),
        ];
        record.add_service(billing);
        record.add_service(ServiceEntry::new("Auth"));
        record
    }

    #[test]
    fn test_ingest_isolates_line_failures() {
        let mut collator = Collator::new();
        let text = format!(
            "{}\nnot a portable string\n{}",
            encode(&sample_record("Alice")),
            encode(&sample_record("Bob")),
        );

        let report = collator.ingest(&text);
        assert_eq!(report, IngestReport { added: 2, failed: 1 });

        // The two valid entries keep their relative input order.
        assert_eq!(collator.entries()[0].record.contact, "Alice");
        assert_eq!(collator.entries()[1].record.contact, "Bob");
    }

    #[test]
    fn test_ingest_skips_blank_lines() {
        let mut collator = Collator::new();
        let text = format!("\n  \n{}\n\n", encode(&sample_record("Alice")));
        let report = collator.ingest(&text);
        assert_eq!(report, IngestReport { added: 1, failed: 0 });
    }

    #[test]
    fn test_ingest_appends_after_existing_entries() {
        let mut collator = Collator::new();
        collator.ingest(&encode(&sample_record("Alice")));
        collator.ingest(&encode(&sample_record("Bob")));
        assert_eq!(collator.entries()[0].record.contact, "Alice");
        assert_eq!(collator.entries()[1].record.contact, "Bob");
    }

    #[test]
    fn test_identical_lines_get_distinct_ids() {
        let mut collator = Collator::new();
        let portable = encode(&sample_record("Alice"));
        collator.ingest(&format!("{portable}\n{portable}"));

        assert_eq!(collator.len(), 2);
        assert_ne!(collator.entries()[0].id, collator.entries()[1].id);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut collator = Collator::new();
        collator.ingest(&encode(&sample_record("Alice")));
        let id = collator.entries()[0].id;

        collator.remove(Uuid::new_v4());
        assert_eq!(collator.len(), 1);

        collator.remove(id);
        assert!(collator.is_empty());

        collator.remove(id);
        assert!(collator.is_empty());
    }

    #[test]
    fn test_clear_empties_the_collection() {
        let mut collator = Collator::new();
        collator.ingest(&encode(&sample_record("Alice")));
        collator.clear();
        assert!(collator.is_empty());
    }

    #[test]
    fn test_summarize_headline_and_service_line() {
        let entry = CollatorEntry {
            id: Uuid::new_v4(),
            record: sample_record("Alice"),
        };
        let card = summarize(&entry);
        assert_eq!(card.headline, "2024-03-01 - Alice");
        assert_eq!(card.service_line, "Billing | Auth");
        assert_eq!(card.details.len(), 2);
    }

    #[test]
    fn test_summarize_omits_empty_fields() {
        let entry = CollatorEntry {
            id: Uuid::new_v4(),
            record: sample_record("Alice"),
        };
        let card = summarize(&entry);

        // Auth was left at defaults: only the two level rows survive.
        let auth = &card.details[1];
        assert_eq!(auth.fields.len(), 2);
        assert!(auth.fields.iter().all(|f| matches!(
            f,
            DetailField::Text { label: "Risk level" | "Benefit level", .. }
        )));
    }

    #[test]
    fn test_summarize_flags_non_url_link_items() {
        let entry = CollatorEntry {
            id: Uuid::new_v4(),
            record: sample_record("Alice"),
        };
        let card = summarize(&entry);

        let billing = &card.details[0];
        let pr_links = billing
            .fields
            .iter()
            .find_map(|f| match f {
                DetailField::Links { label: "PR links", items } => Some(items),
                _ => None,
            })
            .unwrap();
        assert!(pr_links[0].is_url);
        assert!(!pr_links[1].is_url);
    }

    #[test]
    fn test_summarize_missing_date() {
        let mut record = sample_record("Alice");
        record.release_date = None;
        let entry = CollatorEntry {
            id: Uuid::new_v4(),
            record,
        };
        assert_eq!(summarize(&entry).headline, "unknown date - Alice");
    }
}
