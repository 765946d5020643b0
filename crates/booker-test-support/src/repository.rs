//! Test repositories — in-memory and failing storage gateways.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use booker_core::error::{DomainError, Entity};
use booker_core::model::{Booking, BookingFields, Event, EventFields, User, UserFields};
use booker_core::repository::{
    BookingRepository, EventRepository, StorageLifecycle, UserRepository,
};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    events: BTreeMap<i64, Event>,
    bookings: BTreeMap<i64, Booking>,
    next_user_id: i64,
    next_event_id: i64,
    next_booking_id: i64,
    closed: bool,
}

impl Tables {
    fn ensure_open(&self) -> Result<(), DomainError> {
        if self.closed {
            return Err(DomainError::Storage("pool closed".into()));
        }
        Ok(())
    }

    fn ensure_unique_email(&self, email: &str, except: Option<i64>) -> Result<(), DomainError> {
        let taken = self
            .users
            .values()
            .any(|u| u.email == email && Some(u.id) != except);
        if taken {
            return Err(DomainError::Constraint("users_email_key".into()));
        }
        Ok(())
    }

    fn ensure_references(&self, fields: &BookingFields) -> Result<(), DomainError> {
        if !self.events.contains_key(&fields.event_id) {
            return Err(DomainError::Constraint("bookings_event_id_fkey".into()));
        }
        if !self.users.contains_key(&fields.user_id) {
            return Err(DomainError::Constraint("bookings_user_id_fkey".into()));
        }
        Ok(())
    }
}

/// A storage gateway that keeps rows in memory and enforces the same
/// constraints as the `PostgreSQL` schema: unique user emails, booking
/// foreign keys and cascading deletes. Identities start at 1 and are never
/// reused.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    tables: Mutex<Tables>,
    close_calls: AtomicUsize,
}

impl InMemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times `close` has been called.
    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UserRepository for InMemoryStorage {
    async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        let tables = self.tables.lock().unwrap();
        tables.ensure_open()?;
        Ok(tables.users.values().cloned().collect())
    }

    async fn get_user(&self, id: i64) -> Result<User, DomainError> {
        let tables = self.tables.lock().unwrap();
        tables.ensure_open()?;
        tables
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(Entity::User, id))
    }

    async fn create_user(&self, fields: &UserFields) -> Result<i64, DomainError> {
        let mut tables = self.tables.lock().unwrap();
        tables.ensure_open()?;
        tables.ensure_unique_email(&fields.email, None)?;
        tables.next_user_id += 1;
        let id = tables.next_user_id;
        tables.users.insert(id, fields.clone().into_user(id));
        Ok(id)
    }

    async fn update_user(&self, id: i64, fields: &UserFields) -> Result<(), DomainError> {
        let mut tables = self.tables.lock().unwrap();
        tables.ensure_open()?;
        if !tables.users.contains_key(&id) {
            return Err(DomainError::not_found(Entity::User, id));
        }
        tables.ensure_unique_email(&fields.email, Some(id))?;
        tables.users.insert(id, fields.clone().into_user(id));
        Ok(())
    }

    async fn delete_user(&self, id: i64) -> Result<(), DomainError> {
        let mut tables = self.tables.lock().unwrap();
        tables.ensure_open()?;
        if tables.users.remove(&id).is_none() {
            return Err(DomainError::not_found(Entity::User, id));
        }
        tables.bookings.retain(|_, b| b.user_id != id);
        Ok(())
    }
}

#[async_trait]
impl EventRepository for InMemoryStorage {
    async fn list_events(&self) -> Result<Vec<Event>, DomainError> {
        let tables = self.tables.lock().unwrap();
        tables.ensure_open()?;
        Ok(tables.events.values().cloned().collect())
    }

    async fn get_event(&self, id: i64) -> Result<Event, DomainError> {
        let tables = self.tables.lock().unwrap();
        tables.ensure_open()?;
        tables
            .events
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(Entity::Event, id))
    }

    async fn create_event(&self, fields: &EventFields) -> Result<i64, DomainError> {
        let mut tables = self.tables.lock().unwrap();
        tables.ensure_open()?;
        tables.next_event_id += 1;
        let id = tables.next_event_id;
        tables.events.insert(id, fields.clone().into_event(id));
        Ok(id)
    }

    async fn update_event(&self, id: i64, fields: &EventFields) -> Result<(), DomainError> {
        let mut tables = self.tables.lock().unwrap();
        tables.ensure_open()?;
        match tables.events.get_mut(&id) {
            Some(event) => {
                *event = fields.clone().into_event(id);
                Ok(())
            }
            None => Err(DomainError::not_found(Entity::Event, id)),
        }
    }

    async fn delete_event(&self, id: i64) -> Result<(), DomainError> {
        let mut tables = self.tables.lock().unwrap();
        tables.ensure_open()?;
        if tables.events.remove(&id).is_none() {
            return Err(DomainError::not_found(Entity::Event, id));
        }
        tables.bookings.retain(|_, b| b.event_id != id);
        Ok(())
    }
}

#[async_trait]
impl BookingRepository for InMemoryStorage {
    async fn list_bookings(&self) -> Result<Vec<Booking>, DomainError> {
        let tables = self.tables.lock().unwrap();
        tables.ensure_open()?;
        Ok(tables.bookings.values().cloned().collect())
    }

    async fn get_booking(&self, id: i64) -> Result<Booking, DomainError> {
        let tables = self.tables.lock().unwrap();
        tables.ensure_open()?;
        tables
            .bookings
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found(Entity::Booking, id))
    }

    async fn create_booking(&self, fields: &BookingFields) -> Result<i64, DomainError> {
        let mut tables = self.tables.lock().unwrap();
        tables.ensure_open()?;
        tables.ensure_references(fields)?;
        tables.next_booking_id += 1;
        let id = tables.next_booking_id;
        tables.bookings.insert(id, fields.into_booking(id));
        Ok(id)
    }

    async fn update_booking(&self, id: i64, fields: &BookingFields) -> Result<(), DomainError> {
        let mut tables = self.tables.lock().unwrap();
        tables.ensure_open()?;
        if !tables.bookings.contains_key(&id) {
            return Err(DomainError::not_found(Entity::Booking, id));
        }
        tables.ensure_references(fields)?;
        tables.bookings.insert(id, fields.into_booking(id));
        Ok(())
    }

    async fn delete_booking(&self, id: i64) -> Result<(), DomainError> {
        let mut tables = self.tables.lock().unwrap();
        tables.ensure_open()?;
        if tables.bookings.remove(&id).is_none() {
            return Err(DomainError::not_found(Entity::Booking, id));
        }
        Ok(())
    }
}

#[async_trait]
impl StorageLifecycle for InMemoryStorage {
    async fn ping(&self) -> Result<(), DomainError> {
        self.tables.lock().unwrap().ensure_open()
    }

    async fn close(&self) {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        self.tables.lock().unwrap().closed = true;
    }
}

/// A storage gateway whose every operation fails with
/// `DomainError::Storage`. Useful for testing error-handling paths.
#[derive(Debug)]
pub struct FailingStorage;

fn connection_refused<T>() -> Result<T, DomainError> {
    Err(DomainError::Storage("connection refused".into()))
}

#[async_trait]
impl UserRepository for FailingStorage {
    async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        connection_refused()
    }

    async fn get_user(&self, _id: i64) -> Result<User, DomainError> {
        connection_refused()
    }

    async fn create_user(&self, _fields: &UserFields) -> Result<i64, DomainError> {
        connection_refused()
    }

    async fn update_user(&self, _id: i64, _fields: &UserFields) -> Result<(), DomainError> {
        connection_refused()
    }

    async fn delete_user(&self, _id: i64) -> Result<(), DomainError> {
        connection_refused()
    }
}

#[async_trait]
impl EventRepository for FailingStorage {
    async fn list_events(&self) -> Result<Vec<Event>, DomainError> {
        connection_refused()
    }

    async fn get_event(&self, _id: i64) -> Result<Event, DomainError> {
        connection_refused()
    }

    async fn create_event(&self, _fields: &EventFields) -> Result<i64, DomainError> {
        connection_refused()
    }

    async fn update_event(&self, _id: i64, _fields: &EventFields) -> Result<(), DomainError> {
        connection_refused()
    }

    async fn delete_event(&self, _id: i64) -> Result<(), DomainError> {
        connection_refused()
    }
}

#[async_trait]
impl BookingRepository for FailingStorage {
    async fn list_bookings(&self) -> Result<Vec<Booking>, DomainError> {
        connection_refused()
    }

    async fn get_booking(&self, _id: i64) -> Result<Booking, DomainError> {
        connection_refused()
    }

    async fn create_booking(&self, _fields: &BookingFields) -> Result<i64, DomainError> {
        connection_refused()
    }

    async fn update_booking(&self, _id: i64, _fields: &BookingFields) -> Result<(), DomainError> {
        connection_refused()
    }

    async fn delete_booking(&self, _id: i64) -> Result<(), DomainError> {
        connection_refused()
    }
}

#[async_trait]
impl StorageLifecycle for FailingStorage {
    async fn ping(&self) -> Result<(), DomainError> {
        connection_refused()
    }

    async fn close(&self) {}
}
