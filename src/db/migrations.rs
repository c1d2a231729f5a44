use anyhow::Context;
use rusqlite::Connection;

// Embedded so the binary carries its own schema; each entry runs once and
// is recorded in _migrations.
const MIGRATIONS: &[(&str, &str)] = &[
    (
        "0001_create_spaces",
        "CREATE TABLE spaces (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            type TEXT NOT NULL,
            capacity INTEGER NOT NULL
        );",
    ),
    (
        "0002_create_bookings",
        "CREATE TABLE bookings (
            id TEXT PRIMARY KEY,
            space_id TEXT NOT NULL,
            customer_name TEXT NOT NULL,
            service_name TEXT NOT NULL,
            date TEXT NOT NULL,
            start_time TEXT NOT NULL,
            duration_minutes INTEGER NOT NULL,
            break_minutes INTEGER NOT NULL DEFAULT 0,
            pax INTEGER NOT NULL DEFAULT 1,
            status TEXT NOT NULL,
            notes TEXT
        );
        CREATE INDEX idx_bookings_date ON bookings(date);
        CREATE INDEX idx_bookings_space ON bookings(space_id);",
    ),
];

pub fn run_migrations(conn: &Connection) -> anyhow::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS _migrations (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )
    .context("failed to create migrations table")?;

    for (name, sql) in MIGRATIONS {
        let already_applied: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM _migrations WHERE name = ?1",
                [name],
                |row| row.get(0),
            )
            .context("failed to check migration status")?;

        if already_applied {
            continue;
        }

        conn.execute_batch(sql)
            .with_context(|| format!("failed to apply migration: {name}"))?;

        conn.execute("INSERT INTO _migrations (name) VALUES (?1)", [name])
            .with_context(|| format!("failed to record migration: {name}"))?;

        tracing::info!("applied migration: {name}");
    }

    Ok(())
}
