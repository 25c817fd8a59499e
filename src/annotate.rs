// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! Line classification and the `## UNINTERESTING` / `## LABEL` annotation state.
//!
//! | Line                        | Effect                                              |
//! |-----------------------------|-----------------------------------------------------|
//! | blank                       | clears suppression and any pending label            |
//! | `## UNINTERESTING`          | suppress entries until the next blank line          |
//! | `## LABEL text...`          | stop suppressing; label the next entry line `text`  |
//! | `# ...`                     | comment, ignored                                    |
//! | `NAME=value`                | variable assignment, ignored                        |
//! | anything else               | cron entry (five schedule fields or `@descriptor`)  |

use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::schedule::{is_descriptor, SCHEDULE_FIELDS};

static COMMENT_RE: OnceLock<Regex> = OnceLock::new();
static ASSIGNMENT_RE: OnceLock<Regex> = OnceLock::new();

/// First token starts a comment.
fn comment_re() -> &'static Regex {
    COMMENT_RE.get_or_init(|| Regex::new(r"\A\s*#").expect("comment pattern"))
}

/// First token looks like `NAME=` (shell variable setting).
fn assignment_re() -> &'static Regex {
    ASSIGNMENT_RE.get_or_init(|| Regex::new(r"\A\s*\w+\s*=").expect("assignment pattern"))
}

/// What a single input line turned out to be.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Line {
    Blank,
    Uninteresting,
    Label,
    Comment,
    Assignment,
    /// A schedule line; the first `schedule_len` fields are the schedule, the rest the command.
    Entry {
        fields: Vec<String>,
        schedule_len: usize,
    },
}

/// Outcome of consuming the annotation state for one entry line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Claim {
    /// Inside an `## UNINTERESTING` block: drop the entry.
    Suppressed,
    /// Keep the entry, with the pending label if one was set.
    Keep(Option<String>),
}

/// Annotation state carried from line to line; reset by blank lines.
#[derive(Clone, Debug, Default)]
pub struct Annotator {
    suppressing: bool,
    pending_label: Option<String>,
}

impl Annotator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies `raw` and applies directive/blank-line transitions.
    /// Entry lines leave the state alone until [`Annotator::claim`] is called.
    pub fn classify(&mut self, raw: &str) -> Result<Line> {
        let fields: Vec<&str> = raw.split_whitespace().collect();
        let Some(first) = fields.first().copied() else {
            if self.suppressing || self.pending_label.is_some() {
                trace!("blank line resets annotation state");
            }
            self.suppressing = false;
            self.pending_label = None;
            return Ok(Line::Blank);
        };
        if first == "##" && fields.get(1) == Some(&"UNINTERESTING") {
            debug!("entering uninteresting block");
            self.suppressing = true;
            return Ok(Line::Uninteresting);
        }
        if first == "##" && fields.get(1) == Some(&"LABEL") {
            let label = fields[2..].join(" ");
            if let Some(prev) = &self.pending_label {
                debug!(previous = %prev, "label replaced before use");
            }
            debug!(label = %label, "label set for next entry");
            self.suppressing = false;
            self.pending_label = Some(label);
            return Ok(Line::Label);
        }
        if comment_re().is_match(first) {
            return Ok(Line::Comment);
        }
        if assignment_re().is_match(first) {
            return Ok(Line::Assignment);
        }
        if fields.len() < SCHEDULE_FIELDS {
            return Err(Error::MalformedEntryLine {
                line: raw.to_string(),
            });
        }
        let schedule_len = if is_descriptor(first) { 1 } else { SCHEDULE_FIELDS };
        Ok(Line::Entry {
            fields: fields.into_iter().map(String::from).collect(),
            schedule_len,
        })
    }

    /// Consumes the pending label for an entry line whose schedule parsed.
    /// The label is cleared whether or not the entry is kept.
    pub fn claim(&mut self) -> Claim {
        let label = self.pending_label.take();
        if self.suppressing {
            if let Some(label) = label {
                debug!(label = %label, "label discarded on uninteresting entry");
            }
            return Claim::Suppressed;
        }
        Claim::Keep(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTRY: &str = "* * * * * /usr/local/bin/foo --bar >/dev/null 2>&1";

    #[test]
    fn test_blank_lines() {
        let mut a = Annotator::new();
        assert_eq!(a.classify("").unwrap(), Line::Blank);
        assert_eq!(a.classify("   \t ").unwrap(), Line::Blank);
    }

    #[test]
    fn test_blank_resets_state() {
        let mut a = Annotator::new();
        a.classify("## UNINTERESTING").unwrap();
        assert!(a.suppressing);
        a.classify("").unwrap();
        assert!(!a.suppressing);

        a.classify("## LABEL hello").unwrap();
        assert_eq!(a.pending_label.as_deref(), Some("hello"));
        a.classify("").unwrap();
        assert_eq!(a.pending_label.as_deref(), None);
    }

    #[test]
    fn test_uninteresting_keeps_label() {
        let mut a = Annotator::new();
        a.classify("## LABEL x").unwrap();
        assert_eq!(a.classify("## UNINTERESTING").unwrap(), Line::Uninteresting);
        assert!(a.suppressing);
        assert_eq!(a.pending_label.as_deref(), Some("x"));
    }

    #[test]
    fn test_label_stops_suppression() {
        let mut a = Annotator::new();
        a.classify("## UNINTERESTING").unwrap();
        assert_eq!(a.classify("  ##   LABEL  custom   label ").unwrap(), Line::Label);
        assert!(!a.suppressing);
        assert_eq!(a.pending_label.as_deref(), Some("custom label"));
    }

    #[test]
    fn test_empty_label_is_still_set() {
        let mut a = Annotator::new();
        a.classify("## LABEL").unwrap();
        assert_eq!(a.pending_label.as_deref(), Some(""));
        assert_eq!(a.claim(), Claim::Keep(Some(String::new())));
    }

    #[test]
    fn test_second_label_overwrites_first() {
        let mut a = Annotator::new();
        a.classify("## LABEL first").unwrap();
        a.classify("## LABEL second").unwrap();
        assert_eq!(a.claim(), Claim::Keep(Some("second".to_string())));
    }

    #[test]
    fn test_label_applies_once() {
        let mut a = Annotator::new();
        a.classify("## LABEL once").unwrap();
        assert!(matches!(a.classify(ENTRY).unwrap(), Line::Entry { .. }));
        assert_eq!(a.claim(), Claim::Keep(Some("once".to_string())));
        a.classify(ENTRY).unwrap();
        assert_eq!(a.claim(), Claim::Keep(None));
    }

    #[test]
    fn test_suppressed_entry_discards_label() {
        let mut a = Annotator::new();
        a.classify("## LABEL lost").unwrap();
        a.classify("## UNINTERESTING").unwrap();
        a.classify(ENTRY).unwrap();
        assert_eq!(a.claim(), Claim::Suppressed);
        assert_eq!(a.pending_label.as_deref(), None);
        a.classify("").unwrap();
        a.classify(ENTRY).unwrap();
        assert_eq!(a.claim(), Claim::Keep(None));
    }

    #[test]
    fn test_other_double_hash_is_comment() {
        let mut a = Annotator::new();
        assert_eq!(a.classify("## something else").unwrap(), Line::Comment);
        assert_eq!(a.classify("##").unwrap(), Line::Comment);
        assert_eq!(a.classify("#* * * * * disabled").unwrap(), Line::Comment);
        assert_eq!(a.classify("   # indented").unwrap(), Line::Comment);
        assert!(!a.suppressing);
    }

    #[test]
    fn test_assignments() {
        let mut a = Annotator::new();
        assert_eq!(a.classify("MAILTO=root").unwrap(), Line::Assignment);
        assert_eq!(a.classify("PATH=/usr/bin:/bin").unwrap(), Line::Assignment);
        assert_eq!(a.classify("SHELL= /bin/bash").unwrap(), Line::Assignment);
    }

    #[test]
    fn test_entry_fields() {
        let mut a = Annotator::new();
        match a.classify(ENTRY).unwrap() {
            Line::Entry { fields, schedule_len } => {
                assert_eq!(schedule_len, 5);
                assert_eq!(fields.len(), 9);
                assert_eq!(fields[5], "/usr/local/bin/foo");
            }
            other => panic!("expected entry, got {:?}", other),
        }
    }

    #[test]
    fn test_schedule_only_entry_is_accepted() {
        let mut a = Annotator::new();
        assert!(matches!(
            a.classify("0 5 * * 1").unwrap(),
            Line::Entry { ref fields, .. } if fields.len() == 5
        ));
    }

    #[test]
    fn test_descriptor_entry() {
        let mut a = Annotator::new();
        assert!(matches!(
            a.classify("@daily /usr/bin/backup --all --quiet now").unwrap(),
            Line::Entry { schedule_len: 1, .. }
        ));
        assert!(a.classify("@daily").is_err());
        let err = a.classify("@daily /usr/bin/backup --all").unwrap_err();
        assert!(matches!(err, Error::MalformedEntryLine { ref line } if line == "@daily /usr/bin/backup --all"));
    }

    #[test]
    fn test_too_few_fields_is_fatal() {
        let mut a = Annotator::new();
        let err = a.classify("5 4 /bin/true").unwrap_err();
        assert!(matches!(err, Error::MalformedEntryLine { ref line } if line == "5 4 /bin/true"));
        assert!(err.to_string().contains("5 4 /bin/true"));
    }

    #[test]
    fn test_too_few_fields_fatal_even_when_suppressing() {
        let mut a = Annotator::new();
        a.classify("## UNINTERESTING").unwrap();
        assert!(a.classify("* * *").is_err());
    }
}
