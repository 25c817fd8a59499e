// Copyright (c) 2025 Robert August Vincent II <pillarsdotnet@gmail.com>
// Co-author: Cursor-AI.

//! Human-readable durations for the delta columns.
//!
//! Both forms work on the absolute second count; months are always 30 days.

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;
const MONTH: u64 = 30 * DAY;

/// A second count split into calendar-agnostic units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Breakdown {
    months: u64,
    days: u64,
    hours: u64,
    minutes: u64,
    seconds: u64,
}

impl Breakdown {
    fn of(seconds: i64) -> Self {
        let a = seconds.unsigned_abs();
        Breakdown {
            months: a / MONTH,
            days: (a % MONTH) / DAY,
            hours: (a % DAY) / HOUR,
            minutes: (a % HOUR) / MINUTE,
            seconds: a % MINUTE,
        }
    }
}

/// Exact breakdown, e.g. `[1M] 2d 3h 4m 5s`. Zero components are omitted; `0` yields `""`.
pub fn seconds_to_hms(seconds: i64) -> String {
    let b = Breakdown::of(seconds);
    let mut parts: Vec<String> = Vec::new();
    if b.months != 0 {
        parts.push(format!("[{}M]", b.months));
    }
    if b.days != 0 {
        parts.push(format!("{}d", b.days));
    }
    if b.hours != 0 {
        parts.push(format!("{}h", b.hours));
    }
    if b.minutes != 0 {
        parts.push(format!("{}m", b.minutes));
    }
    if b.seconds != 0 {
        parts.push(format!("{}s", b.seconds));
    }
    parts.join(" ")
}

/// Single-phrase summary ("a day", "3hr", "11 mins"), falling back to [`seconds_to_hms`]
/// beyond six months and at ten minutes or less.
pub fn seconds_to_coarse_hms(seconds: i64) -> String {
    let b = Breakdown::of(seconds);
    if b.months != 0 {
        return match b.months {
            m if m > 6 => seconds_to_hms(seconds),
            m if m > 1 => format!("{}M", m),
            _ => "a month".to_string(),
        };
    }
    if b.days != 0 {
        return if b.days > 1 {
            format!("{}d", b.days)
        } else {
            "a day".to_string()
        };
    }
    if b.hours != 0 {
        return if b.hours > 1 {
            format!("{}hr", b.hours)
        } else {
            "an hour".to_string()
        };
    }
    if b.minutes > 10 {
        return format!("{} mins", b.minutes);
    }
    seconds_to_hms(seconds)
}
