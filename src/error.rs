// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! Fatal conditions. Nothing here is recovered locally; `main` reports and exits 1.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// `--deltahms` and `--deltacoarse` both enabled.
    #[error("cannot use --deltahms and --deltacoarse at the same time")]
    ConfigurationConflict,

    /// A line that is not blank, a directive, a comment or an assignment, with too few fields.
    #[error("invalid cron entry, too few fields: {line}")]
    MalformedEntryLine { line: String },

    /// The schedule prefix of an entry line was rejected by the cron grammar.
    #[error("could not parse cron part of {line}: {schedule}: {reason}")]
    ScheduleParse {
        line: String,
        schedule: String,
        reason: String,
    },

    #[error("reading input: {0}")]
    InputRead(#[from] std::io::Error),

    #[error("writing output: {0}")]
    Output(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
