//! # Session
//!
//! The authentication boundary and the state that depends on it.
//!
//! An [`Authenticator`] checks credentials. A [`Session`] owns the resulting
//! login state and tells interested parties about changes through explicit
//! [`Subscription`]s:
//!
//! - Events reach every live subscriber in the order the changes happened
//! - A subscriber only sees changes made after it subscribed
//! - A transition that changes nothing (logging out while logged out) emits
//!   no event
//! - Dropping a [`Subscription`] unsubscribes it

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::vault::Principal;

pub const DEFAULT_EMAIL: &str = "user@example.com";
pub const DEFAULT_PASSWORD: &str = "password123";

#[async_trait]
pub trait Authenticator: Send + Sync + Debug + 'static {
    /// Check a credential pair.
    async fn login(&self, email: &str, password: &str) -> bool;

    /// Register a credential pair. Returns whether it was accepted.
    async fn register(&self, email: &str, password: &str) -> bool;

    async fn logout(&self);
}

#[derive(Debug, Clone)]
struct Credentials {
    email: String,
    password: String,
}

/// Authenticator holding a single credential pair in memory.
///
/// Registering replaces the pair.
#[derive(Debug, Clone)]
pub struct MemoryAuthenticator {
    credentials: Arc<RwLock<Credentials>>,
}

impl MemoryAuthenticator {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            credentials: Arc::new(RwLock::new(Credentials {
                email: email.into(),
                password: password.into(),
            })),
        }
    }
}

impl Default for MemoryAuthenticator {
    fn default() -> Self {
        Self::new(DEFAULT_EMAIL, DEFAULT_PASSWORD)
    }
}

#[async_trait]
impl Authenticator for MemoryAuthenticator {
    async fn login(&self, email: &str, password: &str) -> bool {
        let credentials = self.credentials.read().await;
        credentials.email == email && credentials.password == password
    }

    async fn register(&self, email: &str, password: &str) -> bool {
        if email.is_empty() || password.is_empty() {
            return false;
        }
        let mut credentials = self.credentials.write().await;
        credentials.email = email.to_string();
        credentials.password = password.to_string();
        true
    }

    async fn logout(&self) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn(Principal),
    LoggedOut,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("registration rejected")]
    RegistrationRejected,
}

/// Receiving end of a session subscription.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    receiver: flume::Receiver<SessionEvent>,
}

impl Subscription {
    /// Next pending event, if any.
    pub fn try_recv(&self) -> Option<SessionEvent> {
        self.receiver.try_recv().ok()
    }

    /// Wait for the next event. Resolves to `None` once the session is gone.
    pub async fn recv(&self) -> Option<SessionEvent> {
        self.receiver.recv_async().await.ok()
    }

    /// All pending events, oldest first.
    pub fn drain(&self) -> Vec<SessionEvent> {
        self.receiver.drain().collect()
    }
}

#[derive(Debug)]
pub struct Session<A: Authenticator> {
    authenticator: A,
    principal: Option<Principal>,
    subscribers: Vec<(u64, flume::Sender<SessionEvent>)>,
    next_subscriber: u64,
}

impl<A: Authenticator> Session<A> {
    pub fn new(authenticator: A) -> Self {
        Self {
            authenticator,
            principal: None,
            subscribers: Vec::new(),
            next_subscriber: 0,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }

    /// The logged in principal.
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn subscribe(&mut self) -> Subscription {
        let (sender, receiver) = flume::unbounded();
        let id = self.next_subscriber;
        self.next_subscriber += 1;
        self.subscribers.push((id, sender));
        Subscription { id, receiver }
    }

    pub fn unsubscribe(&mut self, subscription: &Subscription) {
        self.subscribers.retain(|(id, _)| *id != subscription.id);
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<Principal, SessionError> {
        if !self.authenticator.login(email, password).await {
            tracing::warn!("login rejected for {}", email);
            return Err(SessionError::InvalidCredentials);
        }
        Ok(self.logged_in(Principal::new(email)))
    }

    /// Register and log in as the new principal.
    pub async fn register(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<Principal, SessionError> {
        if !self.authenticator.register(email, password).await {
            tracing::warn!("registration rejected for {:?}", email);
            return Err(SessionError::RegistrationRejected);
        }
        Ok(self.logged_in(Principal::new(email)))
    }

    pub async fn logout(&mut self) {
        if self.principal.is_none() {
            return;
        }
        self.authenticator.logout().await;
        if let Some(principal) = self.principal.take() {
            tracing::info!("logged out {}", principal);
        }
        self.emit(SessionEvent::LoggedOut);
    }

    fn logged_in(&mut self, principal: Principal) -> Principal {
        if self.principal.as_ref() != Some(&principal) {
            tracing::info!("logged in {}", principal);
            self.principal = Some(principal.clone());
            self.emit(SessionEvent::LoggedIn(principal.clone()));
        }
        principal
    }

    fn emit(&mut self, event: SessionEvent) {
        // drop senders whose subscription is gone
        self.subscribers
            .retain(|(_, sender)| sender.send(event.clone()).is_ok());
    }
}
