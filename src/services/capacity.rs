//! Conflict and load computation for a single space on a single day.
//!
//! A booking occupies its space for the active duration plus the trailing
//! break. Intervals are half-open: one ending exactly when another starts
//! is not an overlap. Over-capacity is advisory; callers decide what to do
//! with it and saving is never blocked here.

use serde::{Deserialize, Serialize};

use crate::models::{Booking, BookingStatus};
use crate::services::clock::{self, TimeError, MIN_DURATION_MINUTES};

/// Candidate interval as edited in the booking form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSlot {
    pub space_id: String,
    pub date: String,
    pub start_time: String,
    pub duration_minutes: i32,
    #[serde(default)]
    pub break_minutes: i32,
    #[serde(default)]
    pub pax: i32,
}

/// Result of a capacity assessment. Borrows the overlapping bookings from
/// the existing set; never mutates its inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport<'a> {
    pub overlapping: Vec<&'a Booking>,
    pub current_load: i32,
    pub total_load: i32,
    pub remaining_capacity: i32,
    pub is_over_capacity: bool,
}

/// Compute which existing bookings overlap the candidate interval and
/// whether the combined headcount would exceed the space's capacity.
///
/// Canceled bookings never count. When `exclude_id` is set (editing an
/// existing booking), that booking's prior record is skipped so it cannot
/// conflict with itself. Bookings for other spaces or other dates are
/// ignored even if present in `existing`.
pub fn assess_load<'a>(
    capacity: i32,
    candidate: &CandidateSlot,
    exclude_id: Option<&str>,
    existing: &'a [Booking],
) -> Result<LoadReport<'a>, TimeError> {
    let start = clock::time_to_minutes(&candidate.start_time)?;
    let end = start + candidate.duration_minutes + candidate.break_minutes.max(0);

    let mut overlapping = Vec::new();
    let mut current_load = 0;

    for booking in existing {
        if booking.space_id != candidate.space_id || booking.date != candidate.date {
            continue;
        }
        if exclude_id.is_some_and(|id| id == booking.id) {
            continue;
        }
        if booking.status == BookingStatus::Canceled {
            continue;
        }

        let other_start = clock::time_to_minutes(&booking.start_time)?;
        let other_end = other_start + booking.duration_minutes + booking.break_minutes.max(0);

        // Half-open intersection; touching endpoints do not overlap.
        if start < other_end && end > other_start {
            current_load += booking.pax.max(1);
            overlapping.push(booking);
        }
    }

    let pax = candidate.pax.max(1);
    let total_load = current_load + pax;

    Ok(LoadReport {
        overlapping,
        current_load,
        total_load,
        remaining_capacity: (capacity - current_load).max(0),
        is_over_capacity: total_load > capacity,
    })
}

/// A start/duration pair kept mutually consistent with its derived end.
///
/// Editing any one of start, duration, or end recomputes the others; the
/// duration floor wins over the literal end time the user picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotTimes {
    start: i32,
    duration: i32,
}

impl SlotTimes {
    pub fn new(start: i32, duration: i32) -> Self {
        SlotTimes {
            start,
            duration: duration.max(MIN_DURATION_MINUTES),
        }
    }

    pub fn parse(start_time: &str, duration: i32) -> Result<Self, TimeError> {
        Ok(Self::new(clock::time_to_minutes(start_time)?, duration))
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn duration(&self) -> i32 {
        self.duration
    }

    pub fn end(&self) -> i32 {
        self.start + self.duration
    }

    /// Move the start, keeping the duration (end shifts with it).
    pub fn with_start(self, start: i32) -> Self {
        SlotTimes { start, ..self }
    }

    /// Change the duration, clamped to the floor (end moves).
    pub fn with_duration(self, duration: i32) -> Self {
        SlotTimes {
            duration: duration.max(MIN_DURATION_MINUTES),
            ..self
        }
    }

    /// Pick a new end time; duration is derived and clamped, so the
    /// effective end may land later than requested.
    pub fn with_end(self, end: i32) -> Self {
        self.with_duration(end - self.start)
    }
}

/// Derive a duration from two clock strings, clamped to the floor.
pub fn duration_between(start_time: &str, end_time: &str) -> Result<i32, TimeError> {
    let start = clock::time_to_minutes(start_time)?;
    let end = clock::time_to_minutes(end_time)?;
    Ok((end - start).max(MIN_DURATION_MINUTES))
}
