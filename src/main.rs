// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! # prettycrontab: crontab viewer
//!
//! Reads a crontab dump (`crontab -l | prettycrontab`) and lists its entries
//! from the next to run to the last, one tab-separated line each.
//!
//! ## Directives
//!
//! | Line               | Effect |
//! |--------------------|--------|
//! | `## UNINTERESTING` | Hide every entry up to the next blank line. |
//! | `## LABEL text`    | Show `text` instead of the command for the next entry only. |
//!
//! ## Columns
//!
//! | Option           | Column |
//! |------------------|--------|
//! | `--deltaseconds` | Seconds until next run. |
//! | `--deltacoarse`  | Rough time until next run ("3hr", "a day"). |
//! | `--deltahms`     | Exact time until next run ("1h 5m 30s"). |
//! | `--timestamp`    | Next run as a local timestamp (on by default). |
//! | `--spec`         | The schedule fields as written. |
//! | (always)         | Label, or the command with `/dev/null` redirects hidden unless `--redir`. |

mod annotate;
mod entry;
mod error;
mod hms;
mod schedule;

use chrono::{DateTime, Local};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

use annotate::{Annotator, Claim, Line};
use entry::{render, CronEntry, DisplayOptions};
use error::{Error, Result};
use schedule::Schedule;

/// Environment variable holding the log filter (e.g. `debug`, `prettycrontab=trace`).
const LOG_ENV: &str = "PRETTYCRONTAB_LOG";

#[derive(Debug, Parser)]
#[command(
    name = "prettycrontab",
    about = "Shows the next run time of interesting cron entries, soonest first",
    version
)]
struct Cli {
    /// Show seconds until next run, before the delta and timestamp columns.
    #[arg(long, env = "PRETTYCRONTAB_DELTASECONDS", default_value_t = false,
          action = ArgAction::Set, num_args = 0..=1, require_equals = true,
          default_missing_value = "true", value_parser = BoolishValueParser::new())]
    deltaseconds: bool,
    /// Show exact d/h/m/s until next run, before the timestamp.
    #[arg(long, env = "PRETTYCRONTAB_DELTAHMS", default_value_t = false,
          action = ArgAction::Set, num_args = 0..=1, require_equals = true,
          default_missing_value = "true", value_parser = BoolishValueParser::new())]
    deltahms: bool,
    /// Show a coarse time until next run ("3hr", "a day"), before the timestamp.
    #[arg(long, env = "PRETTYCRONTAB_DELTACOARSE", default_value_t = false,
          action = ArgAction::Set, num_args = 0..=1, require_equals = true,
          default_missing_value = "true", value_parser = BoolishValueParser::new())]
    deltacoarse: bool,
    /// Show the next run timestamp, before the cron spec.
    #[arg(long, env = "PRETTYCRONTAB_TIMESTAMP", default_value_t = true,
          action = ArgAction::Set, num_args = 0..=1, require_equals = true,
          default_missing_value = "true", value_parser = BoolishValueParser::new())]
    timestamp: bool,
    /// Show the schedule fields ("* * * * *") as written.
    #[arg(long, env = "PRETTYCRONTAB_SPEC", default_value_t = false,
          action = ArgAction::Set, num_args = 0..=1, require_equals = true,
          default_missing_value = "true", value_parser = BoolishValueParser::new())]
    spec: bool,
    /// Keep redirects (">/dev/null", "2>&1") in the command column.
    #[arg(long, env = "PRETTYCRONTAB_REDIR", default_value_t = false,
          action = ArgAction::Set, num_args = 0..=1, require_equals = true,
          default_missing_value = "true", value_parser = BoolishValueParser::new())]
    redir: bool,
    /// Log at debug level to stderr (overridden by PRETTYCRONTAB_LOG).
    #[arg(long)]
    verbose: bool,
    /// Print the manual page in groff format and exit.
    #[arg(long)]
    manpage: bool,
    /// Crontab file to read; stdin when absent or "-".
    file: Option<PathBuf>,
}

impl TryFrom<&Cli> for DisplayOptions {
    type Error = Error;

    fn try_from(cli: &Cli) -> Result<Self> {
        DisplayOptions {
            delta_seconds: cli.deltaseconds,
            delta_hms: cli.deltahms,
            delta_coarse: cli.deltacoarse,
            timestamp: cli.timestamp,
            cron_spec: cli.spec,
            redirect_details: cli.redir,
        }
        .validate()
    }
}

/// Groff man page source for `--manpage`.
fn manpage_content() -> &'static str {
    r###".TH PRETTYCRONTAB 1 "October 2026" "" "prettycrontab"
.SH NAME
prettycrontab \- list crontab entries by next run time
.SH SYNOPSIS
.B crontab -l |
.B prettycrontab
.RI [ options ]
.PP
.B prettycrontab
.RI [ options ]
.I file
.SH DESCRIPTION
.B prettycrontab
reads a crontab, computes when each entry runs next and prints the entries
soonest first, one line each, columns separated by tabs.
Comments and variable assignments are skipped.
.SH DIRECTIVES
.TP
.B ## UNINTERESTING
Hide every following entry up to the next blank line.
.TP
.BI "## LABEL " text
Show
.I text
instead of the command for the next entry only.
.SH OPTIONS
Every option takes an optional value, e.g.
.BR --timestamp=false .
.TP
.B --deltaseconds
Seconds until next run.
.TP
.B --deltahms
Exact time until next run (months of 30 days shown as [nM]).
.TP
.B --deltacoarse
Rough time until next run. Cannot be combined with --deltahms.
.TP
.B --timestamp
Next run timestamp. On by default.
.TP
.B --spec
The schedule fields as written.
.TP
.B --redir
Keep ">/dev/null", "2>&1" and similar redirects in the command.
.TP
.B --verbose
Debug logging on stderr.
.TP
.B --manpage
Print this page in groff format.
.SH EXAMPLES
.nf
* * * * * /usr/local/bin/foo --bar >/dev/null 2>&1     # shown as-is
## UNINTERESTING
* * * * * /usr/local/bin/foo --bar >/dev/null 2>&1     # not shown
* * * * * /usr/local/bin/foo --bar >/dev/null 2>&1     # not shown either

* * * * * /usr/local/bin/foo --bar >/dev/null 2>&1     # shown, blank line ended the block
## LABEL foo --bar
* * * * * /usr/local/bin/foo --bar >/dev/null 2>&1     # shown as "foo --bar"
* * * * * /usr/local/bin/foo --bar >/dev/null 2>&1     # shown as-is, labels apply once
.fi
.SH ENVIRONMENT
.TP
.B PRETTYCRONTAB_LOG
Log filter for stderr diagnostics (default: warn).
.TP
.BR PRETTYCRONTAB_DELTASECONDS ", " PRETTYCRONTAB_DELTAHMS ", " PRETTYCRONTAB_DELTACOARSE ", " PRETTYCRONTAB_TIMESTAMP ", " PRETTYCRONTAB_SPEC ", " PRETTYCRONTAB_REDIR
Defaults for the matching options (true/false).
.SH EXIT STATUS
0 on success; 1 on conflicting options, a malformed entry line, an
unparseable schedule, or an input error.
"###
}

/// Output the manual page to stdout.
fn cmd_manpage() -> Result<()> {
    let mut out = io::stdout();
    if let Err(e) = out.write_all(manpage_content().as_bytes()) {
        if e.kind() != io::ErrorKind::BrokenPipe {
            return Err(Error::Output(e));
        }
    }
    let _ = out.flush();
    Ok(())
}

/// Installs the stderr subscriber; `PRETTYCRONTAB_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(io::stderr)
        .init();
}

/// Opens the crontab source: the named file, or stdin for `None` / `-`.
fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    match path {
        Some(p) if p != Path::new("-") => {
            let f = fs::File::open(p)
                .map_err(|e| io::Error::new(e.kind(), format!("{}: {}", p.display(), e)))?;
            Ok(Box::new(BufReader::new(f)))
        }
        _ => Ok(Box::new(io::stdin().lock())),
    }
}

/// Walks every input line through the annotator and resolves the kept entries against `now`.
fn collect_entries<R: BufRead>(input: R, now: &DateTime<Local>) -> Result<Vec<CronEntry>> {
    let mut annotator = Annotator::new();
    let mut entries = Vec::new();
    for line in input.lines() {
        let line = line?;
        let Line::Entry { fields, schedule_len } = annotator.classify(&line)? else {
            continue;
        };
        let schedule = Schedule::parse(&line, &fields[..schedule_len].join(" "))?;
        let label = match annotator.claim() {
            Claim::Suppressed => {
                debug!(raw = %line, "skipping uninteresting entry");
                continue;
            }
            Claim::Keep(label) => label,
        };
        let next_run = schedule.next_after(&line, now)?;
        let entry = CronEntry {
            raw_line: line,
            fields,
            schedule_len,
            next_run,
            label,
        };
        trace!(raw = %entry.raw_line, schedule = schedule.spec(), next_run = %entry.next_run, "resolved entry");
        entries.push(entry);
    }
    debug!(count = entries.len(), "collected entries");
    Ok(entries)
}

/// Reads, resolves and prints. Nothing is written until every line has been processed.
fn run(cli: &Cli) -> Result<()> {
    if cli.manpage {
        return cmd_manpage();
    }
    let opts = DisplayOptions::try_from(cli)?;
    let now = Local::now();
    debug!(?opts, now = %now, "starting");
    let input = open_input(cli.file.as_deref())?;
    let mut entries = collect_entries(input, &now)?;
    let mut out = io::BufWriter::new(io::stdout().lock());
    for line in render(&mut entries, &opts, &now) {
        writeln!(out, "{}", line).map_err(Error::Output)?;
    }
    out.flush().map_err(Error::Output)
}

fn main() {
    // Die quietly on a closed pipe (`prettycrontab | head`).
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Err(e) = run(&cli) {
        eprintln!("prettycrontab: {}", e);
        process::exit(1);
    }
}
