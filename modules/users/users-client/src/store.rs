//! Client data store.
//!
//! Caches the user list together with the status of the request in flight.
//! Each action moves the state through pending and then fulfilled or
//! rejected. Dispatches may overlap; every dispatch takes a token from a
//! monotonically increasing counter and only the completion holding the
//! latest token may touch the state. Earlier completions are dropped.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, Instrument};
use users_sdk::{NewUser, User, UserId, UserUpdate, UsersApi, UsersError};

pub const FALLBACK_ERROR: &str = "Something went wrong";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsersState {
    pub users: Vec<User>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Result of a dispatch whose call succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The response was written to the state.
    Applied(T),
    /// A later dispatch was issued before this one completed; the state was left alone.
    Superseded(T),
}

impl<T> Outcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            Self::Applied(v) | Self::Superseded(v) => v,
        }
    }
}

struct Shared {
    seq: AtomicU64,
    state: watch::Sender<UsersState>,
}

#[derive(Clone)]
pub struct UsersStore {
    api: Arc<dyn UsersApi>,
    shared: Arc<Shared>,
}

impl UsersStore {
    pub fn new(api: Arc<dyn UsersApi>) -> Self {
        let (state, _) = watch::channel(UsersState::default());
        Self {
            api,
            shared: Arc::new(Shared {
                seq: AtomicU64::new(0),
                state,
            }),
        }
    }

    pub fn snapshot(&self) -> UsersState {
        self.shared.state.borrow().clone()
    }

    /// Receiver notified after every state transition.
    pub fn subscribe(&self) -> watch::Receiver<UsersState> {
        self.shared.state.subscribe()
    }

    /// Replace the cached list with the server's.
    pub async fn fetch_users(&self) -> Result<Outcome<Vec<User>>, UsersError> {
        let api = Arc::clone(&self.api);
        self.dispatch("fetch_users", async move { api.list_users().await }, |s, users| {
            s.users = users.clone();
        })
        .await
    }

    pub async fn add_user(&self, new_user: NewUser) -> Result<Outcome<User>, UsersError> {
        let api = Arc::clone(&self.api);
        self.dispatch("add_user", async move { api.create_user(new_user).await }, upsert)
            .await
    }

    pub async fn update_user(
        &self,
        id: UserId,
        update: UserUpdate,
    ) -> Result<Outcome<User>, UsersError> {
        let api = Arc::clone(&self.api);
        self.dispatch(
            "update_user",
            async move { api.update_user(id, update).await },
            upsert,
        )
        .await
    }

    pub async fn delete_user(&self, id: UserId) -> Result<Outcome<()>, UsersError> {
        let api = Arc::clone(&self.api);
        self.dispatch("delete_user", async move { api.delete_user(id).await }, move |s, _| {
            s.users.retain(|u| u.id != id);
        })
        .await
    }

    async fn dispatch<T, Fut, F>(
        &self,
        action: &'static str,
        call: Fut,
        apply: F,
    ) -> Result<Outcome<T>, UsersError>
    where
        Fut: Future<Output = Result<T, UsersError>>,
        F: FnOnce(&mut UsersState, &T),
    {
        let token = self.shared.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let span = tracing::debug_span!("users_client.store.dispatch", action, token);

        // pending
        self.shared.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });

        // Ends loading if this future is dropped before the call returns.
        let mut guard = PendingGuard {
            shared: &self.shared,
            token,
            armed: true,
        };
        let result = call.instrument(span.clone()).await;
        guard.armed = false;

        match result {
            Ok(value) => {
                let applied = self.complete(token, |s| {
                    s.is_loading = false;
                    apply(s, &value);
                });
                if applied {
                    Ok(Outcome::Applied(value))
                } else {
                    debug!(parent: &span, "Dropping stale response");
                    Ok(Outcome::Superseded(value))
                }
            }
            Err(e) => {
                let message = error_message(&e);
                let applied = self.complete(token, |s| {
                    s.is_loading = false;
                    s.error = Some(message);
                });
                if !applied {
                    debug!(parent: &span, error = %e, "Dropping stale failure");
                }
                Err(e)
            }
        }
    }

    /// Apply `f` only if `token` is still the latest one issued.
    fn complete(&self, token: u64, f: impl FnOnce(&mut UsersState)) -> bool {
        self.shared.state.send_if_modified(|s| {
            if self.shared.seq.load(Ordering::SeqCst) != token {
                return false;
            }
            f(s);
            true
        })
    }
}

/// Clears `is_loading` for an abandoned dispatch that still holds the latest token.
struct PendingGuard<'a> {
    shared: &'a Shared,
    token: u64,
    armed: bool,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let cleared = self.shared.state.send_if_modified(|s| {
            if self.shared.seq.load(Ordering::SeqCst) != self.token || !s.is_loading {
                return false;
            }
            s.is_loading = false;
            true
        });
        if cleared {
            debug!(token = self.token, "Dispatch abandoned, loading cleared");
        }
    }
}

fn upsert(state: &mut UsersState, user: &User) {
    match state.users.iter_mut().find(|u| u.id == user.id) {
        Some(existing) => *existing = user.clone(),
        None => state.users.push(user.clone()),
    }
}

fn error_message(e: &UsersError) -> String {
    let message = e.to_string();
    if message.trim().is_empty() {
        FALLBACK_ERROR.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_error_messages_fall_back() {
        assert_eq!(error_message(&UsersError::validation("")), FALLBACK_ERROR);
        assert_eq!(
            error_message(&UsersError::validation("All fields required")),
            "All fields required"
        );
    }

    #[test]
    fn outcome_accessors() {
        assert!(Outcome::Applied(1).is_applied());
        assert!(!Outcome::Superseded(1).is_applied());
        assert_eq!(Outcome::Superseded(7).into_inner(), 7);
    }
}
