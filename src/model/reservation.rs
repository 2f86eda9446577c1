//! Time windows and reservation records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::spot::SpotId;

/// Half-open time window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Create a window. `start` and `end` are swapped if given in reverse.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        if end < start {
            Self {
                start: end,
                end: start,
            }
        } else {
            Self { start, end }
        }
    }

    /// Check if `t` falls inside the window.
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start <= t && t < self.end
    }

    /// Check if two windows share any instant.
    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// Reservation status as stored by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Active,
    Completed,
    Cancelled,
    #[serde(other)]
    Other,
}

/// Lifecycle phase of a reservation relative to now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationPhase {
    Pending,
    Active,
    Completed,
    Cancelled,
}

/// A reservation overlapping the queried window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    #[serde(default)]
    pub spot_id: Option<SpotId>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub status: Option<ReservationStatus>,
}

impl Reservation {
    /// Create a reservation without status or spot.
    pub fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            spot_id: None,
            start_time,
            end_time,
            status: None,
        }
    }

    /// Check if the reservation was cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.status == Some(ReservationStatus::Cancelled)
    }

    /// Reserved window.
    pub fn window(&self) -> TimeWindow {
        TimeWindow::new(self.start_time, self.end_time)
    }

    /// Lifecycle phase at `now`. The end instant still counts as active.
    pub fn phase(&self, now: DateTime<Utc>) -> ReservationPhase {
        if self.is_cancelled() {
            ReservationPhase::Cancelled
        } else if now < self.start_time {
            ReservationPhase::Pending
        } else if now <= self.end_time {
            ReservationPhase::Active
        } else {
            ReservationPhase::Completed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_window_half_open() {
        let window = TimeWindow::new(at(9), at(11));
        assert!(window.contains(at(9)));
        assert!(window.contains(at(10)));
        assert!(!window.contains(at(11)));
    }

    #[test]
    fn test_window_reversed() {
        let window = TimeWindow::new(at(11), at(9));
        assert_eq!(window.start, at(9));
        assert_eq!(window.end, at(11));
    }

    #[test]
    fn test_window_overlaps() {
        let a = TimeWindow::new(at(9), at(11));
        assert!(a.overlaps(&TimeWindow::new(at(10), at(12))));
        assert!(!a.overlaps(&TimeWindow::new(at(11), at(12))));
    }

    #[test]
    fn test_reservation_phase() {
        let mut r = Reservation::new(at(9), at(11));
        assert_eq!(r.phase(at(8)), ReservationPhase::Pending);
        assert_eq!(r.phase(at(9)), ReservationPhase::Active);
        assert_eq!(r.phase(at(11)), ReservationPhase::Active);
        assert_eq!(r.phase(at(12)), ReservationPhase::Completed);
        r.status = Some(ReservationStatus::Cancelled);
        assert_eq!(r.phase(at(10)), ReservationPhase::Cancelled);
    }

    #[test]
    fn test_reservation_deserialize() {
        let r: Reservation = serde_json::from_str(
            r#"{"spotId":"WST01-0003","startTime":"2025-04-01T09:00:00Z","endTime":"2025-04-01T11:00:00Z","status":"active","user":"u1"}"#,
        )
        .unwrap();
        assert_eq!(r.start_time, at(9));
        assert_eq!(r.status, Some(ReservationStatus::Active));
    }
}
