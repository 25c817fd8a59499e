// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! Schedule evaluation: the five-field prefix of a crontab line, or a named
//! `@descriptor`, resolved to its next trigger after a reference instant.

use std::fmt;

use chrono::{DateTime, Local};
use croner::Cron;

use crate::error::{Error, Result};

/// Number of whitespace-separated fields in a standard schedule expression.
pub const SCHEDULE_FIELDS: usize = 5;

/// Named shorthands and the five-field expression each stands for.
const DESCRIPTORS: [(&str, &str); 7] = [
    ("@yearly", "0 0 1 1 *"),
    ("@annually", "0 0 1 1 *"),
    ("@monthly", "0 0 1 * *"),
    ("@weekly", "0 0 * * 0"),
    ("@daily", "0 0 * * *"),
    ("@midnight", "0 0 * * *"),
    ("@hourly", "0 * * * *"),
];

/// True if the token is written in descriptor form (`@...`), recognized or not.
pub fn is_descriptor(token: &str) -> bool {
    token.starts_with('@')
}

fn expand_descriptor(word: &str) -> Option<&'static str> {
    DESCRIPTORS
        .iter()
        .find(|(name, _)| *name == word)
        .map(|(_, expr)| *expr)
}

/// A parsed schedule; `spec` is the text as written in the crontab.
#[derive(Clone)]
pub struct Schedule {
    spec: String,
    cron: Cron,
}

impl fmt::Debug for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Schedule").field(&self.spec).finish()
    }
}

impl Schedule {
    /// Parses `spec` (five fields joined by single spaces, or a descriptor).
    /// `line` is the raw crontab line, carried into the error for reporting.
    pub fn parse(line: &str, spec: &str) -> Result<Self> {
        let parse_error = |reason: String| Error::ScheduleParse {
            line: line.to_string(),
            schedule: spec.to_string(),
            reason,
        };
        let expr = if is_descriptor(spec) {
            expand_descriptor(spec)
                .ok_or_else(|| parse_error("unrecognized descriptor".to_string()))?
        } else {
            spec
        };
        let cron = Cron::new(expr)
            .parse()
            .map_err(|e| parse_error(e.to_string()))?;
        Ok(Schedule {
            spec: spec.to_string(),
            cron,
        })
    }

    pub fn spec(&self) -> &str {
        &self.spec
    }

    /// Earliest trigger strictly after `now`. A schedule that can never fire
    /// (e.g. `0 0 31 2 *`) is reported as a parse error against `line`.
    pub fn next_after(&self, line: &str, now: &DateTime<Local>) -> Result<DateTime<Local>> {
        self.cron
            .find_next_occurrence(now, false)
            .map_err(|e| Error::ScheduleParse {
                line: line.to_string(),
                schedule: self.spec.clone(),
                reason: e.to_string(),
            })
    }
}
