use rusqlite::{params, Connection};

use crate::models::{Booking, BookingStatus, Space, SpaceType};

// ── Spaces ──

pub fn list_spaces(conn: &Connection) -> anyhow::Result<Vec<Space>> {
    let mut stmt =
        conn.prepare("SELECT id, name, type, capacity FROM spaces ORDER BY name ASC")?;

    let rows = stmt.query_map([], |row| Ok(parse_space_row(row)))?;

    let mut spaces = vec![];
    for row in rows {
        spaces.push(row??);
    }
    Ok(spaces)
}

pub fn get_space(conn: &Connection, id: &str) -> anyhow::Result<Option<Space>> {
    let result = conn.query_row(
        "SELECT id, name, type, capacity FROM spaces WHERE id = ?1",
        params![id],
        |row| Ok(parse_space_row(row)),
    );

    match result {
        Ok(space) => Ok(Some(space?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn insert_space(conn: &Connection, space: &Space) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO spaces (id, name, type, capacity) VALUES (?1, ?2, ?3, ?4)",
        params![space.id, space.name, space.kind.as_str(), space.capacity],
    )?;
    Ok(())
}

pub fn update_space(conn: &Connection, space: &Space) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE spaces SET name = ?1, type = ?2, capacity = ?3 WHERE id = ?4",
        params![space.name, space.kind.as_str(), space.capacity, space.id],
    )?;
    Ok(count > 0)
}

pub fn delete_space(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM spaces WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

pub fn count_bookings_for_space(conn: &Connection, space_id: &str) -> anyhow::Result<i64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM bookings WHERE space_id = ?1",
        params![space_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

fn parse_space_row(row: &rusqlite::Row) -> anyhow::Result<Space> {
    let id: String = row.get(0)?;
    let name: String = row.get(1)?;
    let kind: String = row.get(2)?;
    let capacity: i32 = row.get(3)?;

    Ok(Space {
        id,
        name,
        kind: SpaceType::parse(&kind),
        capacity,
    })
}

// ── Bookings ──

const BOOKING_COLUMNS: &str = "id, space_id, customer_name, service_name, date, start_time, \
     duration_minutes, break_minutes, pax, status, notes";

pub fn bookings_on_date(conn: &Connection, date: &str) -> anyhow::Result<Vec<Booking>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE date = ?1 ORDER BY start_time ASC",
    ))?;

    let rows = stmt.query_map(params![date], |row| Ok(parse_booking_row(row)))?;

    let mut bookings = vec![];
    for row in rows {
        bookings.push(row??);
    }
    Ok(bookings)
}

pub fn get_booking(conn: &Connection, id: &str) -> anyhow::Result<Option<Booking>> {
    let result = conn.query_row(
        &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
        params![id],
        |row| Ok(parse_booking_row(row)),
    );

    match result {
        Ok(booking) => Ok(Some(booking?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn insert_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO bookings (id, space_id, customer_name, service_name, date, start_time, \
         duration_minutes, break_minutes, pax, status, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            booking.id,
            booking.space_id,
            booking.customer_name,
            booking.service_name,
            booking.date,
            booking.start_time,
            booking.duration_minutes,
            booking.break_minutes,
            booking.pax,
            booking.status.as_str(),
            booking.notes,
        ],
    )?;
    Ok(())
}

/// Full-replace update; there is no partial-field patch.
pub fn update_booking(conn: &Connection, booking: &Booking) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET space_id = ?1, customer_name = ?2, service_name = ?3, date = ?4, \
         start_time = ?5, duration_minutes = ?6, break_minutes = ?7, pax = ?8, status = ?9, \
         notes = ?10 WHERE id = ?11",
        params![
            booking.space_id,
            booking.customer_name,
            booking.service_name,
            booking.date,
            booking.start_time,
            booking.duration_minutes,
            booking.break_minutes,
            booking.pax,
            booking.status.as_str(),
            booking.notes,
            booking.id,
        ],
    )?;
    Ok(count > 0)
}

pub fn delete_booking(conn: &Connection, id: &str) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM bookings WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

fn parse_booking_row(row: &rusqlite::Row) -> anyhow::Result<Booking> {
    let id: String = row.get(0)?;
    let space_id: String = row.get(1)?;
    let customer_name: String = row.get(2)?;
    let service_name: String = row.get(3)?;
    let date: String = row.get(4)?;
    let start_time: String = row.get(5)?;
    let duration_minutes: i32 = row.get(6)?;
    let break_minutes: i32 = row.get(7)?;
    let pax: i32 = row.get(8)?;
    let status_str: String = row.get(9)?;
    let notes: Option<String> = row.get(10)?;

    Ok(Booking {
        id,
        space_id,
        customer_name,
        service_name,
        date,
        start_time,
        duration_minutes,
        break_minutes,
        pax,
        status: BookingStatus::parse(&status_str),
        notes,
    })
}
