//! Session holder shared by every screen.
//!
//! [`SessionContext`] is created once at launch and handed to each screen
//! controller. It owns the gateway and the persisted store, and publishes a
//! [`SessionSnapshot`] through a `tokio::sync::watch` channel so views can
//! re-render on change without polling.
//!
//! Transitions follow `LoggedOut → LoggingIn → LoggedIn`, `LoggedIn →
//! LoggedOut` and `LoggedOut → Registering → LoggedOut`. Only one transition
//! may be in flight; a second attempt is refused with [`ClientError::Busy`].

use std::collections::BTreeSet;
use std::sync::Arc;

use backend::domain::validation::{
    FieldErrors, RegistrationDraft, validate_confirm_password, validate_registration,
};
use backend::domain::{LoginCredentials, UserProfile};
use backend::inbound::http::users::RegisterRequest;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::error::ClientError;
use crate::gateway::UserGateway;
use crate::navigation::{AppScreen, NavigationEvent};
use crate::store::SessionStore;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionPhase {
    /// Nobody is signed in.
    #[default]
    LoggedOut,
    /// A login request is in flight.
    LoggingIn,
    /// A user is signed in, or a remembered session was restored.
    LoggedIn,
    /// A registration request is in flight.
    Registering,
}

impl SessionPhase {
    /// Whether a request is still pending.
    pub const fn is_in_flight(self) -> bool {
        matches!(self, Self::LoggingIn | Self::Registering)
    }
}

/// Observable session state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Lifecycle phase.
    pub phase: SessionPhase,
    /// Persisted remember-session flag.
    pub remember_session: bool,
    /// Cached display name.
    pub user_full_name: Option<String>,
    /// Profile returned by the last successful login or profile save.
    pub user: Option<UserProfile>,
}

/// Registration form contents handed to [`SessionContext::register`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationCandidate {
    /// Full name as typed.
    pub full_name: String,
    /// Institutional email.
    pub email: String,
    /// Password.
    pub password: String,
    /// Password typed a second time.
    pub confirm_password: String,
    /// Optional phone; blank means none.
    pub phone: String,
    /// Selected favourite genres.
    pub favorite_genres: BTreeSet<String>,
}

impl RegistrationCandidate {
    /// Run every field rule, including the password confirmation.
    ///
    /// # Errors
    ///
    /// Returns every failing field.
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = validate_registration(&RegistrationDraft {
            full_name: &self.full_name,
            email: &self.email,
            password: &self.password,
            phone: Some(self.phone.as_str()),
            favorite_genres: &self.favorite_genres,
        })
        .err()
        .unwrap_or_default();
        errors.check(validate_confirm_password(
            &self.confirm_password,
            &self.password,
        ));
        errors.into_result()
    }

    fn to_request(&self) -> RegisterRequest {
        let phone = self.phone.trim();
        RegisterRequest {
            email: self.email.trim().to_owned(),
            full_name: self.full_name.trim().to_owned(),
            password: self.password.clone(),
            phone: (!phone.is_empty()).then(|| phone.to_owned()),
            favorite_genres: self.favorite_genres.clone(),
        }
    }
}

/// Explicitly passed session context.
#[derive(Clone)]
pub struct SessionContext {
    gateway: Arc<dyn UserGateway>,
    store: Arc<dyn SessionStore>,
    state: Arc<watch::Sender<SessionSnapshot>>,
}

impl SessionContext {
    /// Build the context from whatever the store holds at launch.
    ///
    /// A remembered session starts in [`SessionPhase::LoggedIn`] without a
    /// profile; the profile arrives with the next login.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Store`] when the store cannot be read.
    pub fn restore(
        gateway: Arc<dyn UserGateway>,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self, ClientError> {
        let record = store.load()?;
        let phase = if record.remember_session {
            SessionPhase::LoggedIn
        } else {
            SessionPhase::LoggedOut
        };
        let (state, _) = watch::channel(SessionSnapshot {
            phase,
            remember_session: record.remember_session,
            user_full_name: record.user_full_name,
            user: None,
        });
        Ok(Self {
            gateway,
            store,
            state: Arc::new(state),
        })
    }

    /// First screen to show: home for remembered sessions, welcome otherwise.
    pub fn start_route(&self) -> AppScreen {
        if self.state.borrow().remember_session {
            AppScreen::Home
        } else {
            AppScreen::Welcome
        }
    }

    /// Receive every future snapshot.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// Signed-in user's profile, if known.
    pub fn current_user(&self) -> Option<UserProfile> {
        self.state.borrow().user.clone()
    }

    /// Whether a login or registration is pending; views disable submit.
    pub fn is_busy(&self) -> bool {
        self.state.borrow().phase.is_in_flight()
    }

    /// Gateway used for account calls.
    pub fn gateway(&self) -> Arc<dyn UserGateway> {
        Arc::clone(&self.gateway)
    }

    /// Sign in.
    ///
    /// On success the display name is cached and, when `remember` is set, the
    /// remember-session flag is persisted. Unknown emails and wrong passwords
    /// both yield [`ClientError::InvalidCredentials`].
    ///
    /// # Errors
    ///
    /// [`ClientError::BlankCredentials`] before any request,
    /// [`ClientError::Busy`] while another transition runs, or the gateway's
    /// error.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        remember: bool,
    ) -> Result<UserProfile, ClientError> {
        let credentials = LoginCredentials::try_from_parts(email, password)
            .map_err(ClientError::BlankCredentials)?;
        let previous = self.begin(SessionPhase::LoggingIn)?;

        let user = match self
            .gateway
            .login(credentials.email(), credentials.password())
            .await
        {
            Ok(user) => user,
            Err(err) => {
                self.finish(previous);
                return Err(err);
            }
        };

        if remember {
            if let Err(err) = self.store.set_remember_session(true) {
                warn!(error = %err, "failed to persist remember-session flag");
            }
        }
        if let Err(err) = self.store.save_user_full_name(&user.full_name) {
            warn!(error = %err, "failed to persist display name");
        }
        self.state.send_modify(|snapshot| {
            snapshot.phase = SessionPhase::LoggedIn;
            snapshot.remember_session |= remember;
            snapshot.user_full_name = Some(user.full_name.clone());
            snapshot.user = Some(user.clone());
        });
        info!(user_id = %user.id, "logged in");
        Ok(user)
    }

    /// Sign out, forgetting the persisted session.
    ///
    /// The returned event shows the welcome screen and removes home from the
    /// back stack so an authenticated view cannot be reached with back.
    pub fn logout(&self) -> NavigationEvent {
        if let Err(err) = self.store.clear() {
            warn!(error = %err, "failed to clear session store");
        }
        self.state.send_replace(SessionSnapshot::default());
        info!("logged out");
        NavigationEvent::NavigateTo {
            route: AppScreen::Welcome,
            pop_up_to: Some(AppScreen::Home),
            inclusive: true,
            single_top: false,
        }
    }

    /// Create an account and return to the logged-out phase.
    ///
    /// # Errors
    ///
    /// [`ClientError::Validation`] listing every failing field before any
    /// request, [`ClientError::Busy`], [`ClientError::EmailAlreadyRegistered`]
    /// on a duplicate email, or another gateway error.
    pub async fn register(
        &self,
        candidate: &RegistrationCandidate,
    ) -> Result<UserProfile, ClientError> {
        candidate.validate()?;
        let previous = self.begin(SessionPhase::Registering)?;

        let result = self.gateway.register(&candidate.to_request()).await;
        let user = match result {
            Ok(user) => user,
            Err(err) => {
                self.finish(previous);
                return Err(err);
            }
        };

        if let Err(err) = self.store.save_user_full_name(&user.full_name) {
            warn!(error = %err, "failed to persist display name");
        }
        self.state.send_modify(|snapshot| {
            snapshot.phase = SessionPhase::LoggedOut;
            snapshot.user_full_name = Some(user.full_name.clone());
        });
        info!(user_id = %user.id, "registered");
        Ok(user)
    }

    /// Persist and publish a new display name.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Store`] when the store cannot be written; the
    /// published state is left unchanged in that case.
    pub fn update_display_name(&self, full_name: &str) -> Result<(), ClientError> {
        self.store.save_user_full_name(full_name)?;
        self.state.send_modify(|snapshot| {
            snapshot.user_full_name = Some(full_name.to_owned());
        });
        Ok(())
    }

    pub(crate) fn replace_user(&self, user: UserProfile) {
        self.state.send_modify(|snapshot| snapshot.user = Some(user));
    }

    /// Enter `next` unless a transition is already running.
    fn begin(&self, next: SessionPhase) -> Result<SessionPhase, ClientError> {
        let mut previous = None;
        self.state.send_if_modified(|snapshot| {
            if snapshot.phase.is_in_flight() {
                return false;
            }
            previous = Some(snapshot.phase);
            snapshot.phase = next;
            true
        });
        previous.ok_or(ClientError::Busy)
    }

    fn finish(&self, phase: SessionPhase) {
        self.state.send_modify(|snapshot| snapshot.phase = phase);
    }
}
