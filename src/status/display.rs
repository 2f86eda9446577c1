//! Reservation-derived display status for the spot detail panel.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::Reservation;

/// Status shown in the spot detail panel. Informational only; never gates
/// selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStatus {
    Available,
    Reserved,
    Occupied,
    Unknown,
}

impl std::fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayStatus::Available => write!(f, "Available"),
            DisplayStatus::Reserved => write!(f, "Reserved"),
            DisplayStatus::Occupied => write!(f, "Occupied"),
            DisplayStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Pick the reservation that decides the display status: the earliest-starting
/// one that is not cancelled and has not ended yet.
pub fn match_active_reservation(reservations: &[Reservation], now: DateTime<Utc>) -> Option<&Reservation> {
    reservations
        .iter()
        .filter(|r| !r.is_cancelled() && r.end_time > now)
        .min_by_key(|r| r.start_time)
}

/// Display status at `now` given the matched reservation and the slot flag
/// reported by the availability service.
pub fn display_status(
    now: DateTime<Utc>,
    reservation: Option<&Reservation>,
    slot_available: bool,
) -> DisplayStatus {
    match reservation {
        Some(r) if r.window().contains(now) => DisplayStatus::Occupied,
        Some(r) if now < r.start_time => DisplayStatus::Reserved,
        None if slot_available => DisplayStatus::Available,
        _ => DisplayStatus::Unknown,
    }
}
