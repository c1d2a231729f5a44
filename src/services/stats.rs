//! Daily aggregates for the dashboard view.

use serde::Serialize;

use crate::models::{Booking, BookingStatus};
use crate::services::clock::{CLOSING_HOUR, OPENING_HOUR};

/// Flat estimate of 1.50 per active service minute.
const REVENUE_PER_MINUTE: f64 = 1.5;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    pub total_bookings: usize,
    pub confirmed: usize,
    pub revenue: f64,
    /// Active minutes over the open window across all spaces, in percent.
    pub occupancy_rate: i32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: BookingStatus,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HourBucket {
    pub hour: i32,
    pub count: usize,
}

/// Canceled bookings stay in `total_bookings` (they are part of the day's
/// record) but contribute nothing to revenue or occupancy.
pub fn daily_stats(bookings: &[Booking], space_count: usize) -> DailyStats {
    let total_bookings = bookings.len();
    let confirmed = bookings
        .iter()
        .filter(|b| b.status == BookingStatus::Confirmed)
        .count();

    let active_minutes: i64 = bookings
        .iter()
        .filter(|b| b.status != BookingStatus::Canceled)
        .map(|b| i64::from(b.duration_minutes))
        .sum();

    let revenue = active_minutes as f64 * REVENUE_PER_MINUTE;

    let open_window = i64::from(CLOSING_HOUR - OPENING_HOUR) * 60 * space_count as i64;
    let occupancy_rate = if open_window > 0 {
        ((active_minutes as f64 / open_window as f64) * 100.0).round() as i32
    } else {
        0
    };

    DailyStats {
        total_bookings,
        confirmed,
        revenue,
        occupancy_rate,
    }
}

/// Count per status, fixed status order, empty statuses omitted.
pub fn status_distribution(bookings: &[Booking]) -> Vec<StatusCount> {
    BookingStatus::all()
        .into_iter()
        .filter_map(|status| {
            let count = bookings.iter().filter(|b| b.status == status).count();
            (count > 0).then_some(StatusCount { status, count })
        })
        .collect()
}

/// Bookings starting within each opening hour. Starts outside the open
/// window are not bucketed.
pub fn hourly_activity(bookings: &[Booking]) -> Vec<HourBucket> {
    let mut buckets: Vec<HourBucket> = (OPENING_HOUR..CLOSING_HOUR)
        .map(|hour| HourBucket { hour, count: 0 })
        .collect();

    for booking in bookings {
        let Ok(start) = crate::services::clock::time_to_minutes(&booking.start_time) else {
            continue;
        };
        let hour = start / 60;
        if (OPENING_HOUR..CLOSING_HOUR).contains(&hour) {
            buckets[(hour - OPENING_HOUR) as usize].count += 1;
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(start: &str, duration: i32, status: BookingStatus) -> Booking {
        Booking {
            id: "b".to_string(),
            space_id: "sp-1".to_string(),
            customer_name: "Alice".to_string(),
            service_name: "Sauna".to_string(),
            date: "2025-06-16".to_string(),
            start_time: start.to_string(),
            duration_minutes: duration,
            break_minutes: 0,
            pax: 1,
            status,
            notes: None,
        }
    }

    #[test]
    fn test_daily_stats_revenue_and_confirmed() {
        let bookings = [
            booking("09:00", 60, BookingStatus::Confirmed),
            booking("10:00", 40, BookingStatus::Pending),
            booking("11:00", 60, BookingStatus::Canceled),
        ];
        let stats = daily_stats(&bookings, 2);
        assert_eq!(stats.total_bookings, 3);
        assert_eq!(stats.confirmed, 1);
        // Canceled minutes excluded: (60 + 40) * 1.5
        assert_eq!(stats.revenue, 150.0);
    }

    #[test]
    fn test_occupancy_rate() {
        // One space open 8-21 = 780 minutes; 390 active minutes = 50%.
        let bookings = [booking("09:00", 390, BookingStatus::Confirmed)];
        let stats = daily_stats(&bookings, 1);
        assert_eq!(stats.occupancy_rate, 50);
    }

    #[test]
    fn test_occupancy_zero_spaces() {
        let bookings = [booking("09:00", 60, BookingStatus::Confirmed)];
        assert_eq!(daily_stats(&bookings, 0).occupancy_rate, 0);
    }

    #[test]
    fn test_status_distribution_omits_empty() {
        let bookings = [
            booking("09:00", 60, BookingStatus::Confirmed),
            booking("10:00", 60, BookingStatus::Confirmed),
            booking("11:00", 60, BookingStatus::Blocked),
        ];
        let dist = status_distribution(&bookings);
        assert_eq!(dist.len(), 2);
        assert_eq!(dist[0].status, BookingStatus::Confirmed);
        assert_eq!(dist[0].count, 2);
        assert_eq!(dist[1].status, BookingStatus::Blocked);
        assert_eq!(dist[1].count, 1);
    }

    #[test]
    fn test_hourly_activity_buckets() {
        let bookings = [
            booking("09:00", 60, BookingStatus::Confirmed),
            booking("09:45", 30, BookingStatus::Confirmed),
            booking("20:30", 30, BookingStatus::Confirmed),
            // Outside the open window; not bucketed.
            booking("07:00", 30, BookingStatus::Confirmed),
        ];
        let buckets = hourly_activity(&bookings);
        assert_eq!(buckets.len(), (CLOSING_HOUR - OPENING_HOUR) as usize);
        assert_eq!(buckets[0].hour, OPENING_HOUR);
        assert_eq!(buckets[1].hour, 9);
        assert_eq!(buckets[1].count, 2);
        assert_eq!(buckets.last().unwrap().hour, 20);
        assert_eq!(buckets.last().unwrap().count, 1);
        assert_eq!(buckets[0].count, 0);
    }
}
