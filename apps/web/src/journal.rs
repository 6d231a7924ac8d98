use std::collections::VecDeque;

use chrono::{DateTime, NaiveDate, Utc};
use contact_core::ContactForm;
use serde::{Deserialize, Serialize};

use crate::transport::Delivery;

pub const JOURNAL_CAPACITY: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JournalEntry {
    pub timestamp: DateTime<Utc>,
    pub form: ContactForm,
    pub urgent: bool,
    pub delivery: Delivery,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct JournalSummary {
    pub total: usize,
    pub urgent: usize,
    pub today: usize,
}

/// Recent successful submissions, newest first, bounded to the last 50.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactJournal {
    entries: VecDeque<JournalEntry>,
}

impl ContactJournal {
    pub fn record(&mut self, entry: JournalEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(JOURNAL_CAPACITY);
    }

    pub fn entries(&self) -> impl Iterator<Item = &JournalEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn summary(&self, today: NaiveDate) -> JournalSummary {
        JournalSummary {
            total: self.entries.len(),
            urgent: self.entries.iter().filter(|e| e.urgent).count(),
            today: self
                .entries
                .iter()
                .filter(|e| e.timestamp.date_naive() == today)
                .count(),
        }
    }
}
