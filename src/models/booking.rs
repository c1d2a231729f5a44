use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::services::clock::{self, MIN_DURATION_MINUTES};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub space_id: String,
    pub customer_name: String,
    pub service_name: String,
    /// Calendar day, `YYYY-MM-DD`.
    pub date: String,
    /// Clock time, `HH:MM` 24-hour.
    pub start_time: String,
    pub duration_minutes: i32,
    #[serde(default)]
    pub break_minutes: i32,
    pub pax: i32,
    pub status: BookingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Confirmed,
    Pending,
    Canceled,
    Maintenance,
    Blocked,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Pending => "pending",
            BookingStatus::Canceled => "canceled",
            BookingStatus::Maintenance => "maintenance",
            BookingStatus::Blocked => "blocked",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "confirmed" => BookingStatus::Confirmed,
            "canceled" => BookingStatus::Canceled,
            "maintenance" => BookingStatus::Maintenance,
            "blocked" => BookingStatus::Blocked,
            _ => BookingStatus::Pending,
        }
    }

    pub fn all() -> [BookingStatus; 5] {
        [
            BookingStatus::Confirmed,
            BookingStatus::Pending,
            BookingStatus::Canceled,
            BookingStatus::Maintenance,
            BookingStatus::Blocked,
        ]
    }
}

/// In-progress form state before submission: a booking without identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    pub space_id: String,
    pub customer_name: String,
    pub service_name: String,
    pub date: String,
    pub start_time: String,
    pub duration_minutes: i32,
    #[serde(default)]
    pub break_minutes: i32,
    #[serde(default = "default_pax")]
    pub pax: i32,
    #[serde(default = "default_status")]
    pub status: BookingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn default_pax() -> i32 {
    1
}

fn default_status() -> BookingStatus {
    BookingStatus::Confirmed
}

impl BookingDraft {
    /// Clamp fields to their floors: pax >= 1, duration >= 15, break >= 0.
    pub fn normalized(mut self) -> Self {
        self.pax = self.pax.max(1);
        self.duration_minutes = self.duration_minutes.max(MIN_DURATION_MINUTES);
        self.break_minutes = self.break_minutes.max(0);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.customer_name.trim().is_empty() {
            return Err("customer name is required".to_string());
        }
        if self.service_name.trim().is_empty() {
            return Err("service name is required".to_string());
        }
        if NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").is_err() {
            return Err(format!("date must be YYYY-MM-DD, got {:?}", self.date));
        }
        clock::time_to_minutes(&self.start_time).map_err(|e| e.to_string())?;
        if self.duration_minutes < 1 {
            return Err("duration must be a positive number of minutes".to_string());
        }
        if self.break_minutes < 0 {
            return Err("break must not be negative".to_string());
        }
        Ok(())
    }

    pub fn into_booking(self, id: String) -> Booking {
        Booking {
            id,
            space_id: self.space_id,
            customer_name: self.customer_name,
            service_name: self.service_name,
            date: self.date,
            start_time: self.start_time,
            duration_minutes: self.duration_minutes,
            break_minutes: self.break_minutes,
            pax: self.pax,
            status: self.status,
            notes: self.notes,
        }
    }
}

impl From<&Booking> for BookingDraft {
    fn from(b: &Booking) -> Self {
        BookingDraft {
            space_id: b.space_id.clone(),
            customer_name: b.customer_name.clone(),
            service_name: b.service_name.clone(),
            date: b.date.clone(),
            start_time: b.start_time.clone(),
            duration_minutes: b.duration_minutes,
            break_minutes: b.break_minutes,
            pax: b.pax,
            status: b.status,
            notes: b.notes.clone(),
        }
    }
}
