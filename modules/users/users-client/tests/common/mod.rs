#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::oneshot;
use users_sdk::{NewUser, User, UserId, UserUpdate, UsersApi, UsersError};

/// In-memory API with the server's semantics, minus hashing.
#[derive(Default)]
pub struct FakeUsersApi {
    users: Mutex<Vec<User>>,
    pub fail_with: Mutex<Option<UsersError>>,
}

impl FakeUsersApi {
    fn check(&self) -> Result<(), UsersError> {
        match self.fail_with.lock().clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl UsersApi for FakeUsersApi {
    async fn list_users(&self) -> Result<Vec<User>, UsersError> {
        self.check()?;
        Ok(self.users.lock().clone())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, UsersError> {
        self.check()?;
        let mut users = self.users.lock();
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(UsersError::conflict(new_user.email));
        }
        let user = User {
            id: UserId::generate(),
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            email: new_user.email,
            gender: new_user.gender,
            hobbies: new_user.hobbies,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: UserId, update: UserUpdate) -> Result<User, UsersError> {
        self.check()?;
        let mut users = self.users.lock();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| UsersError::not_found(id))?;
        user.first_name = update.first_name;
        user.last_name = update.last_name;
        user.gender = update.gender;
        user.hobbies = update.hobbies;
        Ok(user.clone())
    }

    async fn delete_user(&self, id: UserId) -> Result<(), UsersError> {
        self.check()?;
        let mut users = self.users.lock();
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Err(UsersError::not_found(id));
        }
        Ok(())
    }
}

type Gate = oneshot::Receiver<Result<Vec<User>, UsersError>>;

/// API whose list calls block until the test releases them, in call order.
pub struct GatedUsersApi {
    calls: AtomicUsize,
    gates: Mutex<Vec<Option<Gate>>>,
}

impl GatedUsersApi {
    /// Gated API plus one sender per expected list call.
    pub fn new(
        n: usize,
    ) -> (
        Self,
        Vec<oneshot::Sender<Result<Vec<User>, UsersError>>>,
    ) {
        let (senders, receivers): (Vec<_>, Vec<_>) = (0..n)
            .map(|_| {
                let (tx, rx) = oneshot::channel();
                (tx, Some(rx))
            })
            .unzip();
        let api = Self {
            calls: AtomicUsize::new(0),
            gates: Mutex::new(receivers),
        };
        (api, senders)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UsersApi for GatedUsersApi {
    async fn list_users(&self) -> Result<Vec<User>, UsersError> {
        let idx = self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().get_mut(idx).and_then(Option::take);
        match gate {
            Some(rx) => rx.await.unwrap_or_else(|_| Err(UsersError::internal())),
            None => Err(UsersError::internal()),
        }
    }

    async fn create_user(&self, _new_user: NewUser) -> Result<User, UsersError> {
        Err(UsersError::internal())
    }

    async fn update_user(&self, _id: UserId, _update: UserUpdate) -> Result<User, UsersError> {
        Err(UsersError::internal())
    }

    async fn delete_user(&self, _id: UserId) -> Result<(), UsersError> {
        Err(UsersError::internal())
    }
}

pub fn user(first_name: &str, email: &str) -> User {
    User {
        id: UserId::generate(),
        first_name: first_name.into(),
        last_name: "Lee".into(),
        email: email.into(),
        gender: "female".into(),
        hobbies: vec!["reading".into(), "coding".into()],
    }
}

pub fn new_user(first_name: &str, email: &str) -> NewUser {
    NewUser {
        first_name: first_name.into(),
        last_name: "Lee".into(),
        email: email.into(),
        password: "secret1".into(),
        gender: "female".into(),
        hobbies: vec!["reading".into(), "coding".into()],
    }
}

pub async fn wait_for_calls(api: &GatedUsersApi, n: usize) {
    while api.calls() < n {
        tokio::task::yield_now().await;
    }
}
