use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Result, StoreError};
use crate::models::User;
use crate::service::UserService;

/// MockUserService is a simple in-memory implementation of UserService for testing
///
/// Besides storing users it counts calls per operation and can be told to
/// fail or panic on the next call, so transports can exercise their error
/// paths without a database.
#[derive(Default)]
pub struct MockUserService {
    users: Mutex<BTreeMap<i32, User>>,
    fail_next: Mutex<Option<String>>,
    panic_next: AtomicBool,
    list_calls: AtomicUsize,
    update_calls: AtomicUsize,
    create_calls: AtomicUsize,
}

impl MockUserService {
    /// Create a new empty MockUserService
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a MockUserService with initial test data
    pub fn with_data(users: Vec<User>) -> Self {
        let service = Self::new();
        {
            let mut stored = service.users.lock().unwrap();
            for user in users {
                stored.insert(user.id, user);
            }
        }
        service
    }

    /// The next call of any operation returns a store error with this message
    pub fn fail_next(&self, message: &str) {
        *self.fail_next.lock().unwrap() = Some(message.to_string());
    }

    /// The next call of any operation panics
    pub fn panic_next(&self) {
        self.panic_next.store(true, Ordering::SeqCst);
    }

    /// Snapshot of the stored users ordered by id
    pub fn users(&self) -> Vec<User> {
        self.users.lock().unwrap().values().cloned().collect()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    fn injected(&self, operation: &'static str) -> Result<()> {
        if self.panic_next.swap(false, Ordering::SeqCst) {
            panic!("injected panic in {}", operation);
        }
        match self.fail_next.lock().unwrap().take() {
            Some(message) => Err(StoreError::new(operation, sqlx::Error::Protocol(message))),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl UserService for MockUserService {
    async fn list_users(&self) -> Result<Vec<User>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.injected("UserService::list_users")?;
        Ok(self.users())
    }

    async fn update_user(&self, id: i32, mut user: User) -> Result<User> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.injected("UserService::update_user")?;

        user.id = id;
        // Like UPDATE ... WHERE, an unknown id changes nothing
        if let Some(stored) = self.users.lock().unwrap().get_mut(&id) {
            *stored = user.clone();
        }
        Ok(user)
    }

    async fn create_user(&self, mut user: User) -> Result<i32> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.injected("UserService::create_user")?;

        let mut users = self.users.lock().unwrap();
        let id = users.keys().next_back().copied().unwrap_or(0) + 1;
        user.id = id;
        users.insert(id, user);
        Ok(id)
    }
}
