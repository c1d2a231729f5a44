//! Application state controller: the in-memory working set of spaces and
//! the selected day's bookings, with every mutation run through an
//! optimistic-update protocol.
//!
//! Each mutation applies a local patch first, then issues the repository
//! call; the patch carries enough to revert, and a failed call rolls the
//! local state back before the error is surfaced. Date-switch fetches are
//! tagged with a monotonic token so an out-of-order completion can never
//! overwrite a newer day's data.

use std::sync::Arc;

use uuid::Uuid;

use crate::models::{Booking, BookingDraft, Space, SpaceDraft};
use crate::repository::{BookingRepository, RepositoryError};

pub struct Planner {
    repo: Arc<dyn BookingRepository>,
    spaces: Vec<Space>,
    bookings: Vec<Booking>,
    selected_date: String,
    fetch_seq: u64,
}

/// Handle for an in-flight day fetch. Stale tickets are rejected on
/// completion.
#[derive(Debug)]
pub struct FetchTicket {
    token: u64,
    pub date: String,
}

/// Inverse of an optimistic local mutation.
enum Patch {
    Nothing,
    BookingInserted { id: String },
    BookingReplaced { prev: Booking },
    BookingRemoved { prev: Booking },
    SpaceReplaced { prev: Space },
    SpaceRemoved { prev: Space, pruned: Vec<Booking> },
}

impl Planner {
    pub fn new(repo: Arc<dyn BookingRepository>, initial_date: impl Into<String>) -> Self {
        Self {
            repo,
            spaces: Vec::new(),
            bookings: Vec::new(),
            selected_date: initial_date.into(),
            fetch_seq: 0,
        }
    }

    /// Populate the working set from the repository.
    pub async fn load(&mut self) -> Result<(), RepositoryError> {
        self.spaces = self.repo.list_spaces().await?;
        self.bookings = self.repo.bookings_on(&self.selected_date).await?;
        Ok(())
    }

    pub fn repo(&self) -> Arc<dyn BookingRepository> {
        Arc::clone(&self.repo)
    }

    pub fn spaces(&self) -> &[Space] {
        &self.spaces
    }

    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    pub fn selected_date(&self) -> &str {
        &self.selected_date
    }

    pub fn space(&self, id: &str) -> Option<&Space> {
        self.spaces.iter().find(|s| s.id == id)
    }

    // ── Date selection ──

    /// Switch the selected date and issue a fetch ticket for it.
    pub fn begin_fetch(&mut self, date: &str) -> FetchTicket {
        self.fetch_seq += 1;
        self.selected_date = date.to_string();
        FetchTicket {
            token: self.fetch_seq,
            date: date.to_string(),
        }
    }

    /// Install a fetched day. Returns false (and changes nothing) when a
    /// newer fetch has been issued since this ticket.
    pub fn complete_fetch(&mut self, ticket: &FetchTicket, bookings: Vec<Booking>) -> bool {
        if ticket.token != self.fetch_seq {
            tracing::debug!(date = %ticket.date, "discarding stale day fetch");
            return false;
        }
        self.bookings = bookings;
        true
    }

    // ── Bookings ──

    /// Create or fully replace a booking. `editing` carries the id of the
    /// booking being edited, if any; a new booking gets a temporary local
    /// id that is reconciled to the repository-issued one on success.
    pub async fn submit_booking(
        &mut self,
        draft: BookingDraft,
        editing: Option<&str>,
    ) -> Result<Booking, RepositoryError> {
        let draft = draft.normalized();
        let on_selected_date = draft.date == self.selected_date;

        match editing {
            Some(id) => {
                let patch = if on_selected_date {
                    self.upsert_local(draft.clone().into_booking(id.to_string()))
                } else {
                    // Moved off the visible day; only the repository call
                    // keeps it alive.
                    self.remove_local(id)
                };

                match self.repo.update_booking(id, draft).await {
                    Ok(saved) => {
                        tracing::info!(booking = %saved.id, "booking updated");
                        Ok(saved)
                    }
                    Err(err) => {
                        tracing::warn!(booking = %id, error = %err, "update failed, reverting");
                        self.revert(patch);
                        Err(err)
                    }
                }
            }
            None => {
                let temp_id = format!("tmp-{}", Uuid::new_v4());
                let patch = if on_selected_date {
                    self.upsert_local(draft.clone().into_booking(temp_id.clone()))
                } else {
                    Patch::Nothing
                };

                match self.repo.insert_booking(draft).await {
                    Ok(saved) => {
                        if on_selected_date {
                            if let Some(local) =
                                self.bookings.iter_mut().find(|b| b.id == temp_id)
                            {
                                *local = saved.clone();
                            }
                            self.sort_bookings();
                        }
                        tracing::info!(booking = %saved.id, "booking created");
                        Ok(saved)
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "insert failed, reverting");
                        self.revert(patch);
                        Err(err)
                    }
                }
            }
        }
    }

    pub async fn delete_booking(&mut self, id: &str) -> Result<(), RepositoryError> {
        let patch = self.remove_local(id);

        match self.repo.delete_booking(id).await {
            Ok(()) => {
                tracing::info!(booking = %id, "booking deleted");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(booking = %id, error = %err, "delete failed, reverting");
                self.revert(patch);
                Err(err)
            }
        }
    }

    // ── Spaces ──

    pub async fn add_space(&mut self, draft: SpaceDraft) -> Result<Space, RepositoryError> {
        // Not optimistic: the replica gains the space only once the
        // repository has issued its id.
        let space = self.repo.insert_space(draft).await?;
        self.spaces.push(space.clone());
        self.sort_spaces();
        tracing::info!(space = %space.id, "space added");
        Ok(space)
    }

    pub async fn update_space(&mut self, space: Space) -> Result<(), RepositoryError> {
        let patch = match self.spaces.iter_mut().find(|s| s.id == space.id) {
            Some(local) => {
                let prev = std::mem::replace(local, space.clone());
                Patch::SpaceReplaced { prev }
            }
            None => return Err(RepositoryError::NotFound(space.id)),
        };
        self.sort_spaces();

        match self.repo.update_space(space).await {
            Ok(()) => Ok(()),
            Err(err) => {
                self.revert(patch);
                Err(err)
            }
        }
    }

    /// Remove a space. Local bookings for the space are pruned from the
    /// view only; the repository decides whether the delete is legal.
    pub async fn delete_space(&mut self, id: &str) -> Result<(), RepositoryError> {
        let Some(pos) = self.spaces.iter().position(|s| s.id == id) else {
            return Err(RepositoryError::NotFound(id.to_string()));
        };
        let prev = self.spaces.remove(pos);
        let (pruned, kept): (Vec<Booking>, Vec<Booking>) =
            std::mem::take(&mut self.bookings)
                .into_iter()
                .partition(|b| b.space_id == id);
        self.bookings = kept;

        match self.repo.delete_space(id).await {
            Ok(()) => {
                tracing::info!(space = %id, "space deleted");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(space = %id, error = %err, "space delete failed, reverting");
                self.revert(Patch::SpaceRemoved { prev, pruned });
                Err(err)
            }
        }
    }

    // ── Local patches ──

    fn upsert_local(&mut self, booking: Booking) -> Patch {
        let patch = match self.bookings.iter_mut().find(|b| b.id == booking.id) {
            Some(local) => {
                let prev = std::mem::replace(local, booking);
                Patch::BookingReplaced { prev }
            }
            None => {
                let id = booking.id.clone();
                self.bookings.push(booking);
                Patch::BookingInserted { id }
            }
        };
        self.sort_bookings();
        patch
    }

    fn remove_local(&mut self, id: &str) -> Patch {
        match self.bookings.iter().position(|b| b.id == id) {
            Some(pos) => Patch::BookingRemoved {
                prev: self.bookings.remove(pos),
            },
            None => Patch::Nothing,
        }
    }

    fn revert(&mut self, patch: Patch) {
        match patch {
            Patch::Nothing => {}
            Patch::BookingInserted { id } => {
                self.bookings.retain(|b| b.id != id);
            }
            Patch::BookingReplaced { prev } => {
                if let Some(local) = self.bookings.iter_mut().find(|b| b.id == prev.id) {
                    *local = prev;
                } else {
                    self.bookings.push(prev);
                }
                self.sort_bookings();
            }
            Patch::BookingRemoved { prev } => {
                self.bookings.push(prev);
                self.sort_bookings();
            }
            Patch::SpaceReplaced { prev } => {
                if let Some(local) = self.spaces.iter_mut().find(|s| s.id == prev.id) {
                    *local = prev;
                }
                self.sort_spaces();
            }
            Patch::SpaceRemoved { prev, pruned } => {
                self.spaces.push(prev);
                self.sort_spaces();
                self.bookings.extend(pruned);
                self.sort_bookings();
            }
        }
    }

    fn sort_bookings(&mut self) {
        self.bookings.sort_by(|a, b| a.start_time.cmp(&b.start_time));
    }

    fn sort_spaces(&mut self) {
        self.spaces.sort_by(|a, b| a.name.cmp(&b.name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::models::{BookingStatus, SpaceType};

    #[derive(Default)]
    struct FakeRepo {
        spaces: Mutex<Vec<Space>>,
        bookings: Mutex<Vec<Booking>>,
        fail_writes: AtomicBool,
        last_update: Mutex<Option<(String, BookingDraft)>>,
        next_id: AtomicUsize,
    }

    impl FakeRepo {
        fn assign_id(&self) -> String {
            format!("srv-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
        }

        fn check_writable(&self) -> Result<(), RepositoryError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                Err(RepositoryError::Backend(anyhow::anyhow!("write refused")))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl BookingRepository for FakeRepo {
        async fn list_spaces(&self) -> Result<Vec<Space>, RepositoryError> {
            Ok(self.spaces.lock().unwrap().clone())
        }

        async fn insert_space(&self, draft: SpaceDraft) -> Result<Space, RepositoryError> {
            self.check_writable()?;
            let space = draft.into_space(self.assign_id());
            self.spaces.lock().unwrap().push(space.clone());
            Ok(space)
        }

        async fn update_space(&self, space: Space) -> Result<(), RepositoryError> {
            self.check_writable()?;
            let mut spaces = self.spaces.lock().unwrap();
            match spaces.iter_mut().find(|s| s.id == space.id) {
                Some(local) => {
                    *local = space;
                    Ok(())
                }
                None => Err(RepositoryError::NotFound(space.id)),
            }
        }

        async fn delete_space(&self, id: &str) -> Result<(), RepositoryError> {
            self.check_writable()?;
            let referenced = self
                .bookings
                .lock()
                .unwrap()
                .iter()
                .any(|b| b.space_id == id);
            if referenced {
                return Err(RepositoryError::SpaceInUse);
            }
            self.spaces.lock().unwrap().retain(|s| s.id != id);
            Ok(())
        }

        async fn bookings_on(&self, date: &str) -> Result<Vec<Booking>, RepositoryError> {
            Ok(self
                .bookings
                .lock()
                .unwrap()
                .iter()
                .filter(|b| b.date == date)
                .cloned()
                .collect())
        }

        async fn insert_booking(&self, draft: BookingDraft) -> Result<Booking, RepositoryError> {
            self.check_writable()?;
            let booking = draft.into_booking(self.assign_id());
            self.bookings.lock().unwrap().push(booking.clone());
            Ok(booking)
        }

        async fn update_booking(
            &self,
            id: &str,
            draft: BookingDraft,
        ) -> Result<Booking, RepositoryError> {
            self.check_writable()?;
            *self.last_update.lock().unwrap() = Some((id.to_string(), draft.clone()));
            let booking = draft.into_booking(id.to_string());
            let mut bookings = self.bookings.lock().unwrap();
            match bookings.iter_mut().find(|b| b.id == id) {
                Some(local) => {
                    *local = booking.clone();
                    Ok(booking)
                }
                None => Err(RepositoryError::NotFound(id.to_string())),
            }
        }

        async fn delete_booking(&self, id: &str) -> Result<(), RepositoryError> {
            self.check_writable()?;
            let mut bookings = self.bookings.lock().unwrap();
            let before = bookings.len();
            bookings.retain(|b| b.id != id);
            if bookings.len() == before {
                return Err(RepositoryError::NotFound(id.to_string()));
            }
            Ok(())
        }
    }

    const DAY: &str = "2025-06-16";

    fn draft(start: &str) -> BookingDraft {
        BookingDraft {
            space_id: "srv-1".to_string(),
            customer_name: "Alice".to_string(),
            service_name: "Massage".to_string(),
            date: DAY.to_string(),
            start_time: start.to_string(),
            duration_minutes: 60,
            break_minutes: 0,
            pax: 1,
            status: BookingStatus::Confirmed,
            notes: None,
        }
    }

    async fn planner_with_space() -> (Planner, Arc<FakeRepo>) {
        let repo = Arc::new(FakeRepo::default());
        let mut planner = Planner::new(repo.clone(), DAY);
        planner
            .add_space(SpaceDraft {
                name: "Sauna".to_string(),
                kind: SpaceType::Sauna,
                capacity: 3,
            })
            .await
            .unwrap();
        (planner, repo)
    }

    #[tokio::test]
    async fn test_new_booking_reconciles_temp_id() {
        let (mut planner, _repo) = planner_with_space().await;

        let saved = planner.submit_booking(draft("10:00"), None).await.unwrap();
        assert_eq!(saved.id, "srv-2");
        assert_eq!(planner.bookings().len(), 1);
        assert_eq!(planner.bookings()[0].id, "srv-2");
        assert!(!planner.bookings().iter().any(|b| b.id.starts_with("tmp-")));
    }

    #[tokio::test]
    async fn test_failed_insert_rolls_back() {
        let (mut planner, repo) = planner_with_space().await;
        repo.fail_writes.store(true, Ordering::SeqCst);

        let err = planner.submit_booking(draft("10:00"), None).await;
        assert!(err.is_err());
        assert!(planner.bookings().is_empty());
        assert!(repo.bookings.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_edit_restores_previous_record() {
        let (mut planner, repo) = planner_with_space().await;
        let original = planner.submit_booking(draft("10:00"), None).await.unwrap();

        repo.fail_writes.store(true, Ordering::SeqCst);
        let mut edit = draft("11:30");
        edit.customer_name = "Mallory".to_string();
        let err = planner.submit_booking(edit, Some(&original.id)).await;
        assert!(err.is_err());

        assert_eq!(planner.bookings().len(), 1);
        assert_eq!(planner.bookings()[0], original);
    }

    #[tokio::test]
    async fn test_edit_to_other_date_leaves_the_view() {
        let (mut planner, repo) = planner_with_space().await;
        let original = planner.submit_booking(draft("10:00"), None).await.unwrap();

        let mut moved = draft("10:00");
        moved.date = "2025-06-17".to_string();
        planner
            .submit_booking(moved, Some(&original.id))
            .await
            .unwrap();

        assert!(planner.bookings().is_empty());
        // Still present in the repository, on the new date.
        assert_eq!(repo.bookings.lock().unwrap()[0].date, "2025-06-17");
    }

    #[tokio::test]
    async fn test_idempotent_resave_sends_equal_payload() {
        let (mut planner, repo) = planner_with_space().await;
        let original = planner.submit_booking(draft("10:00"), None).await.unwrap();

        let resave = BookingDraft::from(&original);
        planner
            .submit_booking(resave.clone(), Some(&original.id))
            .await
            .unwrap();

        let (updated_id, payload) = repo.last_update.lock().unwrap().clone().unwrap();
        assert_eq!(updated_id, original.id);
        assert_eq!(payload, resave);
        assert_eq!(planner.bookings().len(), 1);
        assert_eq!(planner.bookings()[0], original);
    }

    #[tokio::test]
    async fn test_stale_fetch_is_discarded() {
        let (mut planner, repo) = planner_with_space().await;
        planner.submit_booking(draft("10:00"), None).await.unwrap();

        let stale = planner.begin_fetch("2025-06-17");
        let fresh = planner.begin_fetch("2025-06-18");

        let fresh_day = repo.bookings_on("2025-06-18").await.unwrap();
        assert!(planner.complete_fetch(&fresh, fresh_day));

        let stale_day = repo.bookings_on("2025-06-17").await.unwrap();
        assert!(!planner.complete_fetch(&stale, stale_day));
        assert_eq!(planner.selected_date(), "2025-06-18");
    }

    #[tokio::test]
    async fn test_delete_space_refused_restores_state() {
        let (mut planner, _repo) = planner_with_space().await;
        planner.submit_booking(draft("10:00"), None).await.unwrap();
        let space_id = planner.spaces()[0].id.clone();

        let err = planner.delete_space(&space_id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::SpaceInUse));

        // Optimistic removal was reverted: space and booking both back.
        assert_eq!(planner.spaces().len(), 1);
        assert_eq!(planner.bookings().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_space_prunes_local_bookings_only() {
        let (mut planner, repo) = planner_with_space().await;
        let second = planner
            .add_space(SpaceDraft {
                name: "Pool".to_string(),
                kind: SpaceType::Pool,
                capacity: 8,
            })
            .await
            .unwrap();

        // Install a view holding a sauna booking the repository does not
        // know about; the repository will accept the delete, and only the
        // local view needs pruning.
        let phantom = draft("10:00").into_booking("local-only".to_string());
        let mut other = draft("12:00");
        other.space_id = second.id.clone();
        let other = other.into_booking("local-2".to_string());
        let ticket = planner.begin_fetch(DAY);
        assert!(planner.complete_fetch(&ticket, vec![phantom, other]));

        planner.delete_space("srv-1").await.unwrap();

        assert_eq!(planner.spaces().len(), 1);
        assert_eq!(planner.spaces()[0].name, "Pool");
        assert_eq!(planner.bookings().len(), 1);
        assert_eq!(planner.bookings()[0].space_id, second.id);
        assert!(!repo.spaces.lock().unwrap().iter().any(|s| s.id == "srv-1"));
    }

    #[tokio::test]
    async fn test_load_pulls_spaces_and_selected_day() {
        let repo = Arc::new(FakeRepo::default());
        repo.spaces.lock().unwrap().push(Space {
            id: "srv-9".to_string(),
            name: "Hammam".to_string(),
            kind: SpaceType::Hammam,
            capacity: 6,
        });
        repo.bookings
            .lock()
            .unwrap()
            .push(draft("09:00").into_booking("srv-10".to_string()));

        let mut planner = Planner::new(repo, DAY);
        planner.load().await.unwrap();
        assert_eq!(planner.spaces().len(), 1);
        assert_eq!(planner.bookings().len(), 1);
    }
}
