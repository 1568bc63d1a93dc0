//! Search criteria and their IMAP SEARCH representation.

use chrono::NaiveDate;

use crate::config::FilterConfig;

/// Conjunctive message filter: recipient, subject substring, minimum date.
///
/// Every field is optional; present fields are ANDed. With no fields at
/// all the query degenerates to `ALL`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCriteria {
    /// Recipient address (`TO`).
    pub to: Option<String>,
    /// Subject substring (`SUBJECT`).
    pub subject: Option<String>,
    /// Earliest received date (`SINCE`), day granularity.
    pub since: Option<NaiveDate>,
}

impl SearchCriteria {
    /// Build criteria from the config filter section.
    pub fn from_filter(filter: &FilterConfig) -> Self {
        Self {
            to: non_empty(&filter.to),
            subject: non_empty(&filter.subject),
            since: filter.since,
        }
    }

    /// Render the IMAP SEARCH expression.
    ///
    /// SINCE takes the `DD-MMM-YYYY` form the protocol requires; the
    /// server compares at day granularity.
    pub fn to_query(&self) -> String {
        let mut parts = Vec::new();

        if let Some(ref to) = self.to {
            parts.push(format!("TO {}", quote(to)));
        }
        if let Some(ref subject) = self.subject {
            parts.push(format!("SUBJECT {}", quote(subject)));
        }
        if let Some(since) = self.since {
            parts.push(format!("SINCE {}", since.format("%d-%b-%Y")));
        }

        if parts.is_empty() {
            "ALL".to_string()
        } else {
            parts.join(" ")
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Quote a search value per RFC 3501 (double quotes, escaped specials).
fn quote(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_criteria_query() {
        let criteria = SearchCriteria {
            to: Some("billing@example.com".to_string()),
            subject: Some("Invoice".to_string()),
            since: NaiveDate::from_ymd_opt(2025, 6, 5),
        };
        assert_eq!(
            criteria.to_query(),
            "TO \"billing@example.com\" SUBJECT \"Invoice\" SINCE 05-Jun-2025"
        );
    }

    #[test]
    fn test_since_uses_imap_date_form() {
        let criteria = SearchCriteria {
            since: NaiveDate::from_ymd_opt(2024, 12, 1),
            ..Default::default()
        };
        assert_eq!(criteria.to_query(), "SINCE 01-Dec-2024");
    }

    #[test]
    fn test_empty_criteria_degenerates_to_all() {
        assert_eq!(SearchCriteria::default().to_query(), "ALL");
    }

    #[test]
    fn test_quote_escapes_specials() {
        let criteria = SearchCriteria {
            subject: Some("say \"hi\"".to_string()),
            ..Default::default()
        };
        assert_eq!(criteria.to_query(), "SUBJECT \"say \\\"hi\\\"\"");
    }

    #[test]
    fn test_from_filter_drops_blank_fields() {
        let filter = FilterConfig {
            to: "  ".to_string(),
            subject: "Invoice".to_string(),
            since: None,
        };
        let criteria = SearchCriteria::from_filter(&filter);
        assert!(criteria.to.is_none());
        assert_eq!(criteria.subject.as_deref(), Some("Invoice"));
    }
}
