//! Registration form controller.
//!
//! Fields are validated as they change. Email availability is checked by a
//! delayed task: every email edit aborts the pending task and schedules a
//! new one [`EMAIL_CHECK_DEBOUNCE`] later, so a burst of keystrokes costs a
//! single lookup.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use backend::domain::validation::{
    Field, FieldError, FieldErrors, validate_confirm_password, validate_email, validate_name,
    validate_password, validate_phone,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::gateway::UserGateway;
use crate::navigation::{AppScreen, NavigationEvent};
use crate::session::{RegistrationCandidate, SessionContext};

/// Quiet period after the last email edit before the availability lookup.
pub const EMAIL_CHECK_DEBOUNCE: Duration = Duration::from_millis(800);

/// Genres offered on the registration form.
pub const AVAILABLE_GENRES: [&str; 7] = [
    "Acción",
    "RPG",
    "Estrategia",
    "Deportes",
    "Aventura",
    "Simulación",
    "Terror",
];

/// Observable form state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterFormState {
    /// Current field values.
    pub candidate: RegistrationCandidate,
    /// Error shown under each field.
    pub errors: BTreeMap<Field, FieldError>,
    /// An email availability check is scheduled or running.
    pub email_checking: bool,
    /// A registration request is in flight.
    pub submitting: bool,
}

impl RegisterFormState {
    /// Error currently shown for `field`.
    pub fn error(&self, field: Field) -> Option<FieldError> {
        self.errors.get(&field).copied()
    }

    fn set_outcome(&mut self, field: Field, outcome: Result<(), FieldError>) {
        match outcome {
            Ok(()) => {
                self.errors.remove(&field);
            }
            Err(err) => {
                self.errors.insert(field, err);
            }
        }
    }
}

/// Registration screen controller.
///
/// Setters take `&self` so callbacks can share the form behind an `Arc`.
pub struct RegisterForm {
    session: SessionContext,
    state: Arc<watch::Sender<RegisterFormState>>,
    email_check: Mutex<Option<JoinHandle<()>>>,
}

impl RegisterForm {
    /// Empty form bound to `session`.
    pub fn new(session: SessionContext) -> Self {
        let (state, _) = watch::channel(RegisterFormState::default());
        Self {
            session,
            state: Arc::new(state),
            email_check: Mutex::new(None),
        }
    }

    /// Receive every future state.
    pub fn subscribe(&self) -> watch::Receiver<RegisterFormState> {
        self.state.subscribe()
    }

    /// Copy of the current state.
    pub fn state(&self) -> RegisterFormState {
        self.state.borrow().clone()
    }

    /// Update the full name and validate it.
    pub fn set_full_name(&self, value: &str) {
        self.state.send_modify(|form| {
            form.candidate.full_name = value.to_owned();
            form.set_outcome(Field::FullName, validate_name(value));
        });
    }

    /// Update the password, validating it and any typed confirmation.
    pub fn set_password(&self, value: &str) {
        self.state.send_modify(|form| {
            form.candidate.password = value.to_owned();
            form.set_outcome(Field::Password, validate_password(value));
            if !form.candidate.confirm_password.is_empty() {
                let outcome = validate_confirm_password(&form.candidate.confirm_password, value);
                form.set_outcome(Field::ConfirmPassword, outcome);
            }
        });
    }

    /// Update the confirmation and compare it with the password.
    pub fn set_confirm_password(&self, value: &str) {
        self.state.send_modify(|form| {
            form.candidate.confirm_password = value.to_owned();
            let outcome = validate_confirm_password(value, &form.candidate.password);
            form.set_outcome(Field::ConfirmPassword, outcome);
        });
    }

    /// Update the optional phone and validate it.
    pub fn set_phone(&self, value: &str) {
        self.state.send_modify(|form| {
            form.candidate.phone = value.to_owned();
            form.set_outcome(Field::Phone, validate_phone(value));
        });
    }

    /// Select or deselect a genre; any genre error is cleared.
    pub fn toggle_genre(&self, genre: &str) {
        self.state.send_modify(|form| {
            let genres = &mut form.candidate.favorite_genres;
            if !genres.remove(genre) {
                genres.insert(genre.to_owned());
            }
            form.errors.remove(&Field::FavoriteGenres);
        });
    }

    /// Update the email and restart the debounced availability check.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn set_email(&self, value: &str) {
        self.state.send_modify(|form| {
            form.candidate.email = value.to_owned();
            form.errors.remove(&Field::Email);
            form.email_checking = true;
        });

        let task = tokio::spawn(check_email(
            self.session.gateway(),
            Arc::clone(&self.state),
            value.to_owned(),
        ));
        if let Some(previous) = self.pending_check().replace(task) {
            previous.abort();
        }
    }

    /// Validate everything and register.
    ///
    /// A pending email lookup is aborted first so it cannot flag the address
    /// that is being registered.
    ///
    /// On success the returned event shows the login screen and drops the
    /// registration form from history.
    ///
    /// # Errors
    ///
    /// [`ClientError::Busy`] while a submission is in flight,
    /// [`ClientError::Validation`] with every failing field, or the session's
    /// registration error.
    pub async fn submit(&self) -> Result<NavigationEvent, ClientError> {
        let mut candidate = None;
        self.state.send_if_modified(|form| {
            if form.submitting {
                return false;
            }
            form.submitting = true;
            candidate = Some(form.candidate.clone());
            true
        });
        let candidate = candidate.ok_or(ClientError::Busy)?;
        self.cancel_email_check();

        if let Err(errors) = candidate.validate() {
            self.finish_submit(Some(&errors));
            return Err(ClientError::Validation(errors));
        }

        let result = self.session.register(&candidate).await;
        match result {
            Ok(user) => {
                debug!(user_id = %user.id, "registration form submitted");
                self.finish_submit(None);
                Ok(NavigationEvent::NavigateTo {
                    route: AppScreen::Login,
                    pop_up_to: Some(AppScreen::Register),
                    inclusive: true,
                    single_top: false,
                })
            }
            Err(ClientError::EmailAlreadyRegistered) => {
                let mut errors = FieldErrors::new();
                errors.check(Err(FieldError::EmailAlreadyRegistered));
                self.finish_submit(Some(&errors));
                Err(ClientError::EmailAlreadyRegistered)
            }
            Err(err) => {
                self.finish_submit(None);
                Err(err)
            }
        }
    }

    fn finish_submit(&self, errors: Option<&FieldErrors>) {
        self.state.send_modify(|form| {
            form.submitting = false;
            for err in errors.into_iter().flat_map(FieldErrors::iter) {
                form.errors.insert(err.field(), *err);
            }
        });
    }

    /// Abort the delayed lookup; the submission result supersedes it.
    fn cancel_email_check(&self) {
        if let Some(task) = self.pending_check().take() {
            task.abort();
        }
        self.state
            .send_if_modified(|form| std::mem::replace(&mut form.email_checking, false));
    }

    fn pending_check(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.email_check.lock().unwrap_or_else(|err| err.into_inner())
    }
}

impl Drop for RegisterForm {
    fn drop(&mut self) {
        if let Some(task) = self.pending_check().take() {
            task.abort();
        }
    }
}

async fn check_email(
    gateway: Arc<dyn UserGateway>,
    state: Arc<watch::Sender<RegisterFormState>>,
    email: String,
) {
    tokio::time::sleep(EMAIL_CHECK_DEBOUNCE).await;

    let outcome = match validate_email(&email) {
        Err(err) => Err(err),
        Ok(()) => match gateway.email_registered(email.trim()).await {
            Ok(true) => Err(FieldError::EmailAlreadyRegistered),
            Ok(false) => Ok(()),
            Err(err) => {
                warn!(error = %err, "email availability check failed");
                Ok(())
            }
        },
    };

    state.send_if_modified(|form| {
        if form.candidate.email != email {
            return false;
        }
        form.email_checking = false;
        form.set_outcome(Field::Email, outcome);
        true
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::gateway::MockUserGateway;
    use crate::store::MemorySessionStore;
    use backend::domain::{UserId, UserProfile};
    use backend::inbound::http::users::RegisterRequest;
    use rstest::rstest;
    use tokio::time::Instant;

    fn form(gateway: MockUserGateway) -> RegisterForm {
        let session = SessionContext::restore(
            Arc::new(gateway),
            Arc::new(MemorySessionStore::new()),
        )
        .expect("restore");
        RegisterForm::new(session)
    }

    fn counting_lookup(taken: bool) -> (MockUserGateway, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut gateway = MockUserGateway::new();
        gateway.expect_email_registered().returning(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(taken)
        });
        (gateway, calls)
    }

    async fn settled(form: &RegisterForm) -> RegisterFormState {
        let mut rx = form.subscribe();
        let state = rx
            .wait_for(|state| !state.email_checking)
            .await
            .expect("form alive")
            .clone();
        state
    }

    fn fill_valid(form: &RegisterForm) {
        form.set_full_name("Ana Perez");
        form.set_password("Secret123!");
        form.set_confirm_password("Secret123!");
        form.toggle_genre("RPG");
        form.state.send_modify(|state| {
            state.candidate.email = "ana@duoc.cl".to_owned();
        });
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_email_edits_performs_one_lookup() {
        let (gateway, calls) = counting_lookup(true);
        let form = form(gateway);

        form.set_email("a");
        tokio::time::sleep(Duration::from_millis(300)).await;
        form.set_email("ana@duoc");
        tokio::time::sleep(Duration::from_millis(300)).await;
        let last_edit = Instant::now();
        form.set_email("ana@duoc.cl");

        let state = settled(&form).await;

        assert!(last_edit.elapsed() >= EMAIL_CHECK_DEBOUNCE);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            state.error(Field::Email),
            Some(FieldError::EmailAlreadyRegistered)
        );
    }

    #[rstest]
    #[case("ana@gmail.com", Some(FieldError::EmailNotInstitutional), 0)]
    #[case("ana@duoc.cl", None, 1)]
    #[tokio::test(start_paused = true)]
    async fn debounced_check_reports_format_then_availability(
        #[case] email: &str,
        #[case] expected: Option<FieldError>,
        #[case] lookups: usize,
    ) {
        let (gateway, calls) = counting_lookup(false);
        let form = form(gateway);

        form.set_email(email);
        assert!(form.state().email_checking);
        let state = settled(&form).await;

        assert_eq!(state.error(Field::Email), expected);
        assert_eq!(calls.load(Ordering::SeqCst), lookups);
    }

    #[rstest]
    fn setters_validate_inline() {
        let form = form(MockUserGateway::new());

        form.set_full_name("Ana 3");
        form.set_password("short1!");
        form.set_confirm_password("other");
        form.set_phone("12ab");

        let state = form.state();
        assert_eq!(
            state.error(Field::FullName),
            Some(FieldError::NameInvalidCharacters)
        );
        assert!(matches!(
            state.error(Field::Password),
            Some(FieldError::PasswordTooShort { .. })
        ));
        assert_eq!(
            state.error(Field::ConfirmPassword),
            Some(FieldError::PasswordMismatch)
        );
        assert_eq!(state.error(Field::Phone), Some(FieldError::PhoneInvalid));

        form.set_password("other");
        assert_eq!(form.state().error(Field::ConfirmPassword), None);
    }

    #[rstest]
    fn toggling_genres_clears_the_genre_error() {
        let form = form(MockUserGateway::new());
        form.state.send_modify(|state| {
            state.errors.insert(Field::FavoriteGenres, FieldError::GenresEmpty);
        });

        form.toggle_genre(AVAILABLE_GENRES[0]);
        form.toggle_genre("Terror");
        form.toggle_genre(AVAILABLE_GENRES[0]);

        let state = form.state();
        assert_eq!(state.error(Field::FavoriteGenres), None);
        assert_eq!(
            state.candidate.favorite_genres.iter().collect::<Vec<_>>(),
            vec!["Terror"]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn submit_marks_every_failing_field() {
        let form = form(MockUserGateway::new());

        let err = form.submit().await.expect_err("empty form");

        assert!(matches!(err, ClientError::Validation(_)));
        let state = form.state();
        assert!(!state.submitting);
        for field in [
            Field::FullName,
            Field::Email,
            Field::Password,
            Field::FavoriteGenres,
        ] {
            assert!(state.error(field).is_some(), "missing error for {field}");
        }
    }

    #[rstest]
    #[tokio::test]
    async fn submit_is_refused_while_submitting() {
        let form = form(MockUserGateway::new());
        form.state.send_modify(|state| state.submitting = true);

        let err = form.submit().await.expect_err("busy");

        assert!(matches!(err, ClientError::Busy));
    }

    fn created(request: &RegisterRequest) -> Result<UserProfile, ClientError> {
        Ok(UserProfile {
            id: UserId::new(1),
            email: request.email.clone(),
            full_name: request.full_name.clone(),
            phone: request.phone.clone(),
            favorite_genres: request.favorite_genres.clone(),
        })
    }

    #[rstest]
    #[tokio::test]
    async fn successful_submit_routes_to_login() {
        let mut gateway = MockUserGateway::new();
        gateway.expect_register().times(1).returning(created);
        let form = form(gateway);
        fill_valid(&form);

        let event = form.submit().await.expect("registered");

        assert_eq!(
            event,
            NavigationEvent::NavigateTo {
                route: AppScreen::Login,
                pop_up_to: Some(AppScreen::Register),
                inclusive: true,
                single_top: false,
            }
        );
        assert!(!form.state().submitting);
    }

    #[tokio::test(start_paused = true)]
    async fn submit_cancels_the_pending_email_check() {
        let (mut gateway, lookups) = counting_lookup(true);
        gateway.expect_register().times(1).returning(created);
        let form = form(gateway);
        fill_valid(&form);
        form.set_email("ana@duoc.cl");

        form.submit().await.expect("registered");
        assert!(!form.state().email_checking);

        tokio::time::sleep(EMAIL_CHECK_DEBOUNCE * 2).await;

        assert_eq!(lookups.load(Ordering::SeqCst), 0);
        let state = form.state();
        assert!(!state.email_checking);
        assert_eq!(state.error(Field::Email), None);
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_email_is_shown_on_the_email_field() {
        let mut gateway = MockUserGateway::new();
        gateway
            .expect_register()
            .returning(|_| Err(ClientError::EmailAlreadyRegistered));
        let form = form(gateway);
        fill_valid(&form);

        let err = form.submit().await.expect_err("duplicate");

        assert!(matches!(err, ClientError::EmailAlreadyRegistered));
        assert_eq!(
            form.state().error(Field::Email),
            Some(FieldError::EmailAlreadyRegistered)
        );
    }
}
