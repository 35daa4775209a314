//! List operations backing the console views
//!
//! Filtering, sorting, and pagination all run client-side over a snapshot
//! from [`EventLedger::entries`](crate::ledger_store::EventLedger::entries),
//! exactly as the dashboard table did. Nothing here touches the store.

use std::str::FromStr;

use crate::errors::LedgerError;
use crate::ledger::{EventCategory, LogEntry};

/// Predicate applied to each entry of a snapshot
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Keep entries of this category only
    pub category: Option<EventCategory>,
    /// Case-insensitive substring match over the action text and the
    /// serialized metadata
    pub search: Option<String>,
}

impl EventFilter {
    pub fn matches(&self, entry: &LogEntry) -> bool {
        if let Some(category) = self.category {
            if entry.category != category {
                return false;
            }
        }
        if let Some(needle) = &self.search {
            let needle = needle.to_lowercase();
            let in_action = entry.action.to_lowercase().contains(&needle);
            let in_metadata = entry.metadata_json().to_lowercase().contains(&needle);
            if !in_action && !in_metadata {
                return false;
            }
        }
        true
    }
}

/// Column a view sorts by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Timestamp,
    Category,
    Action,
}

impl Default for SortField {
    fn default() -> Self {
        SortField::Timestamp
    }
}

impl FromStr for SortField {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "timestamp" => Ok(SortField::Timestamp),
            "category" => Ok(SortField::Category),
            "action" => Ok(SortField::Action),
            other => Err(LedgerError::validation(
                "sort",
                format!("unknown sort field '{other}'"),
            )),
        }
    }
}

/// Sort direction; the console defaults to newest first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDir {
    Asc,
    Desc,
}

impl Default for SortDir {
    fn default() -> Self {
        SortDir::Desc
    }
}

impl FromStr for SortDir {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDir::Asc),
            "desc" => Ok(SortDir::Desc),
            other => Err(LedgerError::validation(
                "order",
                format!("unknown sort order '{other}'"),
            )),
        }
    }
}

/// One page of a filtered, sorted snapshot
#[derive(Debug, Clone)]
pub struct Page {
    pub items: Vec<LogEntry>,
    /// 1-based page number that was requested
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
}

/// Apply a filter to a snapshot, preserving order
pub fn filter_entries(entries: &[LogEntry], filter: &EventFilter) -> Vec<LogEntry> {
    entries
        .iter()
        .filter(|entry| filter.matches(entry))
        .cloned()
        .collect()
}

/// Sort in place; string fields compare case-insensitively, ties keep their
/// existing relative order
pub fn sort_entries(entries: &mut [LogEntry], field: SortField, dir: SortDir) {
    entries.sort_by(|a, b| {
        let ord = match field {
            SortField::Timestamp => a.timestamp.cmp(&b.timestamp),
            SortField::Category => a.category.label().cmp(b.category.label()),
            SortField::Action => a.action.to_lowercase().cmp(&b.action.to_lowercase()),
        };
        match dir {
            SortDir::Asc => ord,
            SortDir::Desc => ord.reverse(),
        }
    });
}

/// Slice out one fixed-size page (1-based). Out-of-range page numbers come
/// back empty but still report the true totals.
pub fn paginate(entries: &[LogEntry], page: usize, page_size: usize) -> Page {
    let total = entries.len();
    if page_size == 0 {
        return Page {
            items: Vec::new(),
            page,
            page_count: 0,
            total,
        };
    }

    let page_count = total.div_ceil(page_size);
    if page == 0 {
        return Page {
            items: Vec::new(),
            page,
            page_count,
            total,
        };
    }

    let start = (page - 1).saturating_mul(page_size);
    let items = if start < total {
        entries[start..(start + page_size).min(total)].to_vec()
    } else {
        Vec::new()
    };

    Page {
        items,
        page,
        page_count,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn sample_entries() -> Vec<LogEntry> {
        let mut meta = Map::new();
        meta.insert("wallet".to_string(), json!("0xDEADBEEF"));

        vec![
            LogEntry::new(EventCategory::Security, "login verified"),
            LogEntry::new(EventCategory::Financial, "Withdrawal requested").with_metadata(meta),
            LogEntry::new(EventCategory::System, "node online"),
            LogEntry::new(EventCategory::Financial, "payout confirmed"),
        ]
    }

    #[test]
    fn filter_by_category() {
        let entries = sample_entries();
        let filter = EventFilter {
            category: Some(EventCategory::Financial),
            search: None,
        };
        let kept = filter_entries(&entries, &filter);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|e| e.category == EventCategory::Financial));
    }

    #[test]
    fn search_is_case_insensitive_and_covers_metadata() {
        let entries = sample_entries();

        let by_action = EventFilter {
            category: None,
            search: Some("WITHDRAWAL".to_string()),
        };
        assert_eq!(filter_entries(&entries, &by_action).len(), 1);

        // the wallet address only exists inside serialized metadata
        let by_metadata = EventFilter {
            category: None,
            search: Some("deadbeef".to_string()),
        };
        assert_eq!(filter_entries(&entries, &by_metadata).len(), 1);

        let no_match = EventFilter {
            category: None,
            search: Some("absent".to_string()),
        };
        assert!(filter_entries(&entries, &no_match).is_empty());
    }

    #[test]
    fn combined_category_and_search() {
        let entries = sample_entries();
        let filter = EventFilter {
            category: Some(EventCategory::Financial),
            search: Some("payout".to_string()),
        };
        let kept = filter_entries(&entries, &filter);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].action, "payout confirmed");
    }

    #[test]
    fn sort_by_action_ignores_case() {
        let mut entries = sample_entries();
        sort_entries(&mut entries, SortField::Action, SortDir::Asc);
        let actions: Vec<&str> = entries.iter().map(|e| e.action.as_str()).collect();
        assert_eq!(
            actions,
            vec![
                "login verified",
                "node online",
                "payout confirmed",
                "Withdrawal requested"
            ]
        );

        sort_entries(&mut entries, SortField::Action, SortDir::Desc);
        assert_eq!(entries[0].action, "Withdrawal requested");
    }

    #[test]
    fn sort_by_category_groups_labels() {
        let mut entries = sample_entries();
        sort_entries(&mut entries, SortField::Category, SortDir::Asc);
        let labels: Vec<&str> = entries.iter().map(|e| e.category.label()).collect();
        assert_eq!(
            labels,
            vec!["FINANCIAL", "FINANCIAL", "SECURITY", "SYSTEM"]
        );
        // stable: equal categories keep insertion order
        assert_eq!(entries[0].action, "Withdrawal requested");
        assert_eq!(entries[1].action, "payout confirmed");
    }

    #[test]
    fn pagination_boundaries() {
        let entries = sample_entries();

        let first = paginate(&entries, 1, 3);
        assert_eq!(first.items.len(), 3);
        assert_eq!(first.page_count, 2);
        assert_eq!(first.total, 4);

        let last = paginate(&entries, 2, 3);
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.items[0].action, "payout confirmed");

        let past_end = paginate(&entries, 3, 3);
        assert!(past_end.items.is_empty());
        assert_eq!(past_end.page_count, 2);
        assert_eq!(past_end.total, 4);

        let zero_page = paginate(&entries, 0, 3);
        assert!(zero_page.items.is_empty());
        assert_eq!(zero_page.page_count, 2);
        assert_eq!(zero_page.total, 4);
    }

    #[test]
    fn extreme_page_numbers_stay_empty() {
        let entries = sample_entries();

        let far = paginate(&entries, usize::MAX, 10);
        assert!(far.items.is_empty());
        assert_eq!(far.page_count, 1);
        assert_eq!(far.total, 4);

        // a wrapping offset would land this one back on the first page
        let wrapped = paginate(&entries, usize::MAX / 2 + 2, 10);
        assert!(wrapped.items.is_empty());
        assert_eq!(wrapped.page_count, 1);
        assert_eq!(wrapped.total, 4);
    }

    #[test]
    fn parse_sort_arguments() {
        assert_eq!("Timestamp".parse::<SortField>().unwrap(), SortField::Timestamp);
        assert_eq!("ACTION".parse::<SortField>().unwrap(), SortField::Action);
        assert!("severity".parse::<SortField>().is_err());

        assert_eq!("asc".parse::<SortDir>().unwrap(), SortDir::Asc);
        assert_eq!("DESC".parse::<SortDir>().unwrap(), SortDir::Desc);
        assert!("down".parse::<SortDir>().is_err());
    }
}
