// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! Resolved cron entries and their tab-separated rendering.

use chrono::{DateTime, Local};

use crate::error::{Error, Result};
use crate::hms::{seconds_to_coarse_hms, seconds_to_hms};

/// Redirections hidden from the command column unless `--redir` is given.
/// Longer forms come first so `2> /dev/null` is not left as `2`.
const REDIRECTS: [&str; 7] = [
    "2> /dev/null",
    "2>/dev/null",
    "1> /dev/null",
    "1>/dev/null",
    "> /dev/null",
    ">/dev/null",
    "2>&1",
];

/// Timestamp column format (local time).
const TIMESTAMP_FORMAT: &str = "%a %b %d %H:%M:%S %Z %Y";

/// Which columns to print. Built once, before any input is read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayOptions {
    pub delta_seconds: bool,
    pub delta_hms: bool,
    pub delta_coarse: bool,
    pub timestamp: bool,
    pub cron_spec: bool,
    pub redirect_details: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        DisplayOptions {
            delta_seconds: false,
            delta_hms: false,
            delta_coarse: false,
            timestamp: true,
            cron_spec: false,
            redirect_details: false,
        }
    }
}

impl DisplayOptions {
    /// Rejects `delta_hms` together with `delta_coarse`.
    pub fn validate(self) -> Result<Self> {
        if self.delta_hms && self.delta_coarse {
            return Err(Error::ConfigurationConflict);
        }
        Ok(self)
    }
}

/// One schedule line resolved to its next run.
#[derive(Clone, Debug)]
pub struct CronEntry {
    pub raw_line: String,
    pub fields: Vec<String>,
    /// How many leading `fields` make up the schedule (5, or 1 for `@descriptor`).
    pub schedule_len: usize,
    pub next_run: DateTime<Local>,
    pub label: Option<String>,
}

impl CronEntry {
    /// The schedule as written, fields joined by single spaces.
    pub fn scheduling_part(&self) -> String {
        self.fields[..self.schedule_len].join(" ")
    }

    /// The label if non-empty, otherwise the command with redirections elided
    /// (unless `redirect_details`).
    pub fn command_part(&self, redirect_details: bool) -> String {
        if let Some(label) = self.label.as_deref().filter(|l| !l.is_empty()) {
            return label.to_string();
        }
        let command = self.fields[self.schedule_len..].join(" ");
        if redirect_details {
            command
        } else {
            strip_redirects(&command)
        }
    }

    /// Seconds from `now` until the next run.
    pub fn delta_seconds(&self, now: &DateTime<Local>) -> i64 {
        self.next_run.timestamp() - now.timestamp()
    }

    /// Tab-joined columns for this entry, in the fixed column order.
    pub fn show(&self, opts: &DisplayOptions, now: &DateTime<Local>) -> String {
        let delta = self.delta_seconds(now);
        let mut cols: Vec<String> = Vec::new();
        if opts.delta_seconds {
            cols.push(delta.to_string());
        }
        if opts.delta_coarse {
            cols.push(seconds_to_coarse_hms(delta));
        } else if opts.delta_hms {
            cols.push(seconds_to_hms(delta));
        }
        if opts.timestamp {
            cols.push(self.next_run.format(TIMESTAMP_FORMAT).to_string());
        }
        if opts.cron_spec {
            cols.push(self.scheduling_part());
        }
        cols.push(self.command_part(opts.redirect_details));
        cols.join("\t")
    }
}

/// Removes every occurrence of the known `/dev/null` and `2>&1` redirections.
pub fn strip_redirects(command: &str) -> String {
    REDIRECTS
        .iter()
        .fold(command.to_string(), |acc, r| acc.replace(r, ""))
}

/// Orders entries by next run; equal times keep input order.
pub fn sort_entries(entries: &mut [CronEntry]) {
    entries.sort_by_key(|e| e.next_run.timestamp());
}

/// Sorts and renders every entry, one output line each.
pub fn render(entries: &mut [CronEntry], opts: &DisplayOptions, now: &DateTime<Local>) -> Vec<String> {
    sort_entries(entries);
    entries.iter().map(|e| e.show(opts, now)).collect()
}
