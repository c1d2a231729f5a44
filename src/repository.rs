//! Persistence collaborator behind a trait so the planner can be driven
//! by an in-memory fake in tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::Connection;
use uuid::Uuid;

use crate::db::queries;
use crate::models::{Booking, BookingDraft, Space, SpaceDraft};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("space still has bookings and cannot be deleted")]
    SpaceInUse,

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn list_spaces(&self) -> Result<Vec<Space>, RepositoryError>;
    async fn insert_space(&self, draft: SpaceDraft) -> Result<Space, RepositoryError>;
    async fn update_space(&self, space: Space) -> Result<(), RepositoryError>;
    async fn delete_space(&self, id: &str) -> Result<(), RepositoryError>;

    async fn bookings_on(&self, date: &str) -> Result<Vec<Booking>, RepositoryError>;
    async fn insert_booking(&self, draft: BookingDraft) -> Result<Booking, RepositoryError>;
    async fn update_booking(&self, id: &str, draft: BookingDraft)
        -> Result<Booking, RepositoryError>;
    async fn delete_booking(&self, id: &str) -> Result<(), RepositoryError>;
}

pub struct SqliteRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl BookingRepository for SqliteRepository {
    async fn list_spaces(&self) -> Result<Vec<Space>, RepositoryError> {
        let conn = self.conn.lock().unwrap();
        Ok(queries::list_spaces(&conn)?)
    }

    async fn insert_space(&self, draft: SpaceDraft) -> Result<Space, RepositoryError> {
        let space = draft.into_space(Uuid::new_v4().to_string());
        let conn = self.conn.lock().unwrap();
        queries::insert_space(&conn, &space)?;
        Ok(space)
    }

    async fn update_space(&self, space: Space) -> Result<(), RepositoryError> {
        let conn = self.conn.lock().unwrap();
        if !queries::update_space(&conn, &space)? {
            return Err(RepositoryError::NotFound(space.id));
        }
        Ok(())
    }

    /// Refuses while any booking still references the space; no cascade.
    async fn delete_space(&self, id: &str) -> Result<(), RepositoryError> {
        let conn = self.conn.lock().unwrap();
        if queries::count_bookings_for_space(&conn, id)? > 0 {
            return Err(RepositoryError::SpaceInUse);
        }
        if !queries::delete_space(&conn, id)? {
            return Err(RepositoryError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn bookings_on(&self, date: &str) -> Result<Vec<Booking>, RepositoryError> {
        let conn = self.conn.lock().unwrap();
        Ok(queries::bookings_on_date(&conn, date)?)
    }

    async fn insert_booking(&self, draft: BookingDraft) -> Result<Booking, RepositoryError> {
        let booking = draft.into_booking(Uuid::new_v4().to_string());
        let conn = self.conn.lock().unwrap();
        queries::insert_booking(&conn, &booking)?;
        Ok(booking)
    }

    async fn update_booking(
        &self,
        id: &str,
        draft: BookingDraft,
    ) -> Result<Booking, RepositoryError> {
        let booking = draft.into_booking(id.to_string());
        let conn = self.conn.lock().unwrap();
        if !queries::update_booking(&conn, &booking)? {
            return Err(RepositoryError::NotFound(id.to_string()));
        }
        Ok(booking)
    }

    async fn delete_booking(&self, id: &str) -> Result<(), RepositoryError> {
        let conn = self.conn.lock().unwrap();
        if !queries::delete_booking(&conn, id)? {
            return Err(RepositoryError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
