pub mod booking;
pub mod space;

pub use booking::{Booking, BookingDraft, BookingStatus};
pub use space::{Space, SpaceDraft, SpaceType};
