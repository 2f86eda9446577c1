//! Data model types for lots, spots, availability and reservations.

mod availability;
mod lot;
mod reservation;
mod spot;

pub use availability::{AvailabilityIndex, LotAvailability, SpotAvailability};
pub use lot::{Lot, LotDetails};
pub use reservation::{Reservation, ReservationPhase, ReservationStatus, TimeWindow};
pub use spot::{spot_label_index, Spot, SpotId, SpotStatus};
