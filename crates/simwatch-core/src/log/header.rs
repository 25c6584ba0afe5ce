//! Log header: start timestamp and process id.

use std::io::BufRead;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

use crate::domain::HeaderMarker;

/// Header timestamp layout: time-of-day followed by the date.
const START_FORMAT: &str = "%H:%M:%S %b %d %Y";

/// Values taken from the header block at the top of a solver log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogHeader {
    pub start: Option<DateTime<Utc>>,
    pub process_id: Option<u32>,
}

impl LogHeader {
    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.process_id.is_some()
    }
}

/// Combine the header `Time` and `Date` values into a UTC instant.
///
/// The header is written in the local time of the machine running the solver.
pub fn parse_start(time_of_day: &str, date: &str) -> Option<DateTime<Utc>> {
    let naive =
        NaiveDateTime::parse_from_str(&format!("{time_of_day} {date}"), START_FORMAT).ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Scan at most `limit` lines forward for the header values.
///
/// `known_pid` short-circuits the process id search (it is never replaced).
/// Scanning stops once the start time and a process id are both known.
pub fn scan_header<R: BufRead>(
    mut reader: R,
    limit: usize,
    known_pid: Option<u32>,
) -> std::io::Result<LogHeader> {
    let mut header = LogHeader::default();
    let mut date: Option<String> = None;
    let mut time_of_day: Option<String> = None;
    let mut buf = Vec::new();

    for _ in 0..limit {
        if header.start.is_some() && (header.process_id.is_some() || known_pid.is_some()) {
            break;
        }
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);

        match HeaderMarker::find(&line) {
            Some((HeaderMarker::Date, value)) => date = Some(value.to_string()),
            Some((HeaderMarker::TimeOfDay, value)) => time_of_day = Some(value.to_string()),
            Some((HeaderMarker::ProcessId, value)) => {
                if header.process_id.is_none() {
                    header.process_id = value.parse().ok();
                }
            }
            None => {}
        }

        if header.start.is_none()
            && let (Some(d), Some(t)) = (&date, &time_of_day)
        {
            header.start = parse_start(t, d);
        }
    }

    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    const HEADER: &str = "\
/*---------------------------------------------------------------------------*\\
Build  : v2312 OPENFOAM=2312
Exec   : icoFoam -parallel
Date   : Jan 01 2024
Time   : 00:00:05
Host   : node01
PID    : 12345
I/O    : uncollated
\\*---------------------------------------------------------------------------*/
Create time

Time = 0.005

Courant Number mean: 0 max: 0
";

    fn local(text: &str) -> DateTime<Utc> {
        let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").unwrap();
        Local
            .from_local_datetime(&naive)
            .earliest()
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn parses_openfoam_header() {
        let header = scan_header(HEADER.as_bytes(), 200, None).unwrap();
        assert_eq!(header.process_id, Some(12345));
        assert_eq!(header.start, Some(local("2024-01-01 00:00:05")));
        assert!(header.is_complete());
    }

    #[test]
    fn start_is_local_wall_clock() {
        let start = parse_start("13:45:10", "Mar 15 2023").unwrap();
        let local_start = start.with_timezone(&Local);
        assert_eq!(local_start.year(), 2023);
        assert_eq!(local_start.month(), 3);
        assert_eq!(local_start.day(), 15);
        assert_eq!(local_start.hour(), 13);
        assert_eq!(local_start.second(), 10);
    }

    #[test]
    fn date_after_time_still_combines() {
        let text = "Time = 00:00:05\nDate : Jan 01 2024\nPID : 9\n";
        let header = scan_header(text.as_bytes(), 200, None).unwrap();
        assert_eq!(header.start, Some(local("2024-01-01 00:00:05")));
        assert_eq!(header.process_id, Some(9));
    }

    #[test]
    fn progress_lines_do_not_count_as_header_time() {
        let text = "Date : Jan 01 2024\nTime = 0.5\nTime = 1\n";
        let header = scan_header(text.as_bytes(), 200, None).unwrap();
        assert_eq!(header.start, None);
    }

    #[test]
    fn malformed_pid_is_left_unset() {
        let text = "PID : abc\n";
        let header = scan_header(text.as_bytes(), 200, None).unwrap();
        assert_eq!(header.process_id, None);
    }

    #[test]
    fn scan_is_bounded() {
        let text = "x\nx\nx\nDate : Jan 01 2024\nTime : 00:00:05\n";
        let header = scan_header(text.as_bytes(), 3, None).unwrap();
        assert_eq!(header, LogHeader::default());
    }

    #[test]
    fn known_pid_skips_pid_search() {
        let text = "Date : Jan 01 2024\nTime : 00:00:05\nPID : 12345\n";
        let header = scan_header(text.as_bytes(), 200, Some(1)).unwrap();
        assert!(header.start.is_some());
        assert_eq!(header.process_id, None);
    }
}
