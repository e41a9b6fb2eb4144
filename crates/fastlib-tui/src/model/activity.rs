use std::collections::VecDeque;

use chrono::{DateTime, Local};

/// Entries kept in the activity panel.
const MAX_ENTRIES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityLevel {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct ActivityEntry {
    pub at: DateTime<Local>,
    pub level: ActivityLevel,
    pub message: String,
}

impl ActivityEntry {
    /// `HH:MM:SS message`
    pub fn line(&self) -> String {
        format!("{} {}", self.at.format("%H:%M:%S"), self.message)
    }
}

/// Rolling log of user-visible events (saves, failures, creations).
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    entries: VecDeque<ActivityEntry>,
}

impl ActivityLog {
    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ActivityLevel::Info, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ActivityLevel::Error, message.into());
    }

    fn push(&mut self, level: ActivityLevel, message: String) {
        if self.entries.len() >= MAX_ENTRIES {
            self.entries.pop_front();
        }
        self.entries.push_back(ActivityEntry {
            at: Local::now(),
            level,
            message,
        });
    }

    /// Newest first.
    pub fn recent(&self) -> impl Iterator<Item = &ActivityEntry> {
        self.entries.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
