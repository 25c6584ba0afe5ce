//! Solver log reading: header block and newest-first tail scan.

mod header;
mod reverse;

pub use header::{LogHeader, parse_start, scan_header};
pub use reverse::ReverseLines;

use std::io::{self, Read, Seek};

use crate::domain::TailMarker;

/// Walk back from the end of the log until a marker is found.
///
/// At most `max_lines` lines and `max_bytes` bytes are examined; the first
/// marker reached is the most recent one and wins.
pub fn scan_tail<R: Read + Seek>(
    reader: R,
    max_lines: usize,
    max_bytes: u64,
) -> io::Result<Option<TailMarker>> {
    let lines = ReverseLines::new(reader)?.byte_limit(max_bytes);
    for line in lines.take(max_lines) {
        if let Some(marker) = TailMarker::classify(&line?) {
            return Ok(Some(marker));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn scan(text: &str, limit: usize) -> Option<TailMarker> {
        scan_tail(Cursor::new(text.as_bytes().to_vec()), limit, u64::MAX).unwrap()
    }

    #[test]
    fn newest_progress_wins() {
        let log = "Time = 1\nExecutionTime = 0.1 s  ClockTime = 0 s\nTime = 2\nExecutionTime = 0.2 s  ClockTime = 1 s\n";
        assert_eq!(scan(log, 100), Some(TailMarker::Progress(2.0)));
    }

    #[test]
    fn error_after_progress_wins() {
        let log = "Time = 1\n\n--> FOAM FATAL ERROR: \nbad things\n";
        assert_eq!(scan(log, 100), Some(TailMarker::FatalError));
    }

    #[test]
    fn progress_after_cancel_wins() {
        let log = "CANCELLED\nTime = 3\n";
        assert_eq!(scan(log, 100), Some(TailMarker::Progress(3.0)));
    }

    #[test]
    fn limit_bounds_the_scan() {
        let log = "Time = 1\nx\nx\nx\n";
        assert_eq!(scan(log, 3), None);
        assert_eq!(scan(log, 4), Some(TailMarker::Progress(1.0)));
    }

    #[test]
    fn byte_limit_ends_a_runaway_line() {
        let log = format!("Time = 5\n{}", "x".repeat(8 * 1024 * 1024));
        let bytes = log.into_bytes();

        let capped = scan_tail(Cursor::new(bytes.clone()), 100, 1024 * 1024).unwrap();
        assert_eq!(capped, None);

        let whole = scan_tail(Cursor::new(bytes), 100, 16 * 1024 * 1024).unwrap();
        assert_eq!(whole, Some(TailMarker::Progress(5.0)));
    }
}
