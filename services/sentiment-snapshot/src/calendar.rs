//! FOMC meeting calendar

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::types::NextMeeting;

/// One scheduled policy decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingEntry {
    pub date: NaiveDate,
    pub label: String,
    pub time: String,
}

/// Static calendar row, converted into `MeetingEntry` at startup
struct Scheduled {
    year: i32,
    month: u32,
    day: u32,
    label: &'static str,
}

const DECISION_TIME: &str = "16:00";

static FOMC_2025_2026: &[Scheduled] = &[
    Scheduled { year: 2025, month: 1, day: 29, label: "28-29 Jan 2025" },
    Scheduled { year: 2025, month: 3, day: 19, label: "18-19 Mar 2025" },
    Scheduled { year: 2025, month: 5, day: 7, label: "6-7 May 2025" },
    Scheduled { year: 2025, month: 6, day: 18, label: "17-18 Jun 2025" },
    Scheduled { year: 2025, month: 7, day: 30, label: "29-30 Jul 2025" },
    Scheduled { year: 2025, month: 9, day: 17, label: "16-17 Sep 2025" },
    Scheduled { year: 2025, month: 11, day: 5, label: "4-5 Nov 2025" },
    Scheduled { year: 2025, month: 12, day: 17, label: "16-17 Dec 2025" },
    Scheduled { year: 2026, month: 1, day: 28, label: "27-28 Jan 2026" },
    Scheduled { year: 2026, month: 3, day: 18, label: "17-18 Mar 2026" },
    Scheduled { year: 2026, month: 5, day: 6, label: "5-6 May 2026" },
    Scheduled { year: 2026, month: 6, day: 17, label: "16-17 Jun 2026" },
    Scheduled { year: 2026, month: 7, day: 29, label: "28-29 Jul 2026" },
    Scheduled { year: 2026, month: 9, day: 16, label: "15-16 Sep 2026" },
    Scheduled { year: 2026, month: 11, day: 4, label: "3-4 Nov 2026" },
    Scheduled { year: 2026, month: 12, day: 16, label: "15-16 Dec 2026" },
];

/// Built-in 2025-2026 schedule, oldest first
pub fn default_meetings() -> Vec<MeetingEntry> {
    FOMC_2025_2026
        .iter()
        .filter_map(|m| {
            Some(MeetingEntry {
                date: NaiveDate::from_ymd_opt(m.year, m.month, m.day)?,
                label: m.label.to_string(),
                time: DECISION_TIME.to_string(),
            })
        })
        .collect()
}

/// First meeting strictly after `now`, or the last entry once the table is exhausted
///
/// Meeting dates are compared at midnight UTC. `days_until` is the ceiling of the
/// remaining days, and 0 for the terminal fallback. Returns `None` for an empty table.
pub fn next_meeting(meetings: &[MeetingEntry], now: DateTime<Utc>) -> Option<NextMeeting> {
    for meeting in meetings {
        let starts = meeting.date.and_hms_opt(0, 0, 0)?.and_utc();
        if starts > now {
            let remaining = starts - now;
            let whole = remaining.num_days();
            // any partial day (down to nanoseconds) counts as one more
            let days_until = if remaining > Duration::days(whole) { whole + 1 } else { whole };
            return Some(to_next(meeting, days_until));
        }
    }

    meetings.last().map(|last| to_next(last, 0))
}

fn to_next(meeting: &MeetingEntry, days_until: i64) -> NextMeeting {
    NextMeeting {
        date: meeting.date,
        label: meeting.label.clone(),
        time: meeting.time.clone(),
        days_until,
    }
}
