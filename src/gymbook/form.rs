//! Login form controller: field values, touched flags, validation errors and the
//! submit lifecycle.
//!
//! The controller mirrors a form-library handshake. Editing or blurring a field
//! revalidates the whole form, and an error is only shown for touched fields.
//! Submitting touches every field, validates, and then posts the credentials. With
//! the default [`SubmitPolicy::Unconditional`] the request is sent even while
//! field errors are outstanding.
//!
//! State sits behind a mutex that is never held across an `.await`, so several
//! submissions may be in flight on the same controller. Nothing orders them: the
//! response that resolves last decides which token ends up in storage.

use super::{
    client::AuthApi,
    errors::{FormError, LoginError},
    navigator::Navigator,
    routes,
    storage::{set_local_storage, KeyValueStore, StorageKey},
    types::Credentials,
    validation::{validate, Field, FieldErrors},
};
use std::{
    collections::BTreeSet,
    sync::{Mutex, MutexGuard, PoisonError},
};
use tracing::{debug, error, info, instrument};

/// Whether outstanding field errors stop a submission.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmitPolicy {
    /// Post the credentials regardless of validation.
    #[default]
    Unconditional,
    /// Skip the request while any field has an error.
    RequireValid,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Token stored, form reset, navigated to `route`.
    Succeeded { route: &'static str },
    /// The request failed; form state is unchanged.
    Failed,
    /// Not sent because of field errors (only under [`SubmitPolicy::RequireValid`]).
    Blocked,
}

/// Display state of one field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FieldMeta {
    pub touched: bool,
    pub error: Option<&'static str>,
}

impl FieldMeta {
    /// The error to show next to the field: only once it has been touched.
    #[must_use]
    pub const fn visible_error(&self) -> Option<&'static str> {
        if self.touched {
            self.error
        } else {
            None
        }
    }
}

/// Point-in-time copy of the form used for rendering.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormSnapshot {
    pub values: Credentials,
    pub errors: FieldErrors,
    pub touched: BTreeSet<Field>,
    pub is_submitting: bool,
}

impl FormSnapshot {
    #[must_use]
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Email => &self.values.email,
            Field::Password => &self.values.password,
        }
    }

    #[must_use]
    pub fn meta(&self, field: Field) -> FieldMeta {
        FieldMeta {
            touched: self.touched.contains(&field),
            error: self.errors.get(field),
        }
    }
}

#[derive(Debug, Default)]
struct FormState {
    values: Credentials,
    errors: FieldErrors,
    touched: BTreeSet<Field>,
    in_flight: usize,
    submit_count: u32,
}

impl FormState {
    fn revalidate(&mut self) -> FieldErrors {
        self.errors = validate(&self.values);
        self.errors
    }
}

pub struct LoginForm<A, S, N> {
    api: A,
    store: S,
    navigator: N,
    policy: SubmitPolicy,
    state: Mutex<FormState>,
}

impl<A, S, N> LoginForm<A, S, N>
where
    A: AuthApi,
    S: KeyValueStore,
    N: Navigator,
{
    #[must_use]
    pub fn new(api: A, store: S, navigator: N) -> Self {
        Self {
            api,
            store,
            navigator,
            policy: SubmitPolicy::default(),
            state: Mutex::new(FormState::default()),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: SubmitPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn policy(&self) -> SubmitPolicy {
        self.policy
    }

    fn state(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn values(&self) -> Credentials {
        self.state().values.clone()
    }

    /// Errors from the last validation pass, touched or not.
    pub fn errors(&self) -> FieldErrors {
        self.state().errors
    }

    pub fn is_touched(&self, field: Field) -> bool {
        self.state().touched.contains(&field)
    }

    pub fn field_meta(&self, field: Field) -> FieldMeta {
        let state = self.state();
        FieldMeta {
            touched: state.touched.contains(&field),
            error: state.errors.get(field),
        }
    }

    pub fn snapshot(&self) -> FormSnapshot {
        let state = self.state();
        FormSnapshot {
            values: state.values.clone(),
            errors: state.errors,
            touched: state.touched.clone(),
            is_submitting: state.in_flight > 0,
        }
    }

    /// Updates a field value and revalidates.
    pub fn set_field_value(&self, field: Field, value: impl Into<String>) {
        let mut state = self.state();
        let value = value.into();
        match field {
            Field::Email => state.values.email = value,
            Field::Password => state.values.password = value,
        }
        state.revalidate();
    }

    /// Marks a field as touched (blur) or untouched and revalidates.
    pub fn set_field_touched(&self, field: Field, touched: bool) {
        let mut state = self.state();
        if touched {
            state.touched.insert(field);
        } else {
            state.touched.remove(&field);
        }
        state.revalidate();
    }

    pub fn validate(&self) -> FieldErrors {
        self.state().revalidate()
    }

    /// Restores values, errors and touched flags to their initial state.
    pub fn reset(&self) {
        let mut state = self.state();
        state.values = Credentials::default();
        state.errors = FieldErrors::default();
        state.touched.clear();
    }

    /// True while at least one submission awaits its response.
    pub fn is_submitting(&self) -> bool {
        self.state().in_flight > 0
    }

    pub fn submit_count(&self) -> u32 {
        self.state().submit_count
    }

    /// Runs one submission.
    ///
    /// Failed requests are handled here: an API error has its message logged,
    /// anything else is dropped silently, and both return
    /// [`SubmitOutcome::Failed`] with the form left as it was.
    ///
    /// # Errors
    /// Returns [`FormError::ResponseShape`] if a successful response lacks the
    /// access token, or [`FormError::Storage`] if the token cannot be persisted.
    #[instrument(skip(self), fields(policy = ?self.policy))]
    pub async fn submit(&self) -> Result<SubmitOutcome, FormError> {
        let (credentials, errors) = {
            let mut state = self.state();
            state.submit_count += 1;
            state.touched.extend(Field::ALL);
            let errors = state.revalidate();
            (state.values.clone(), errors)
        };

        if !errors.is_empty() {
            if self.policy == SubmitPolicy::RequireValid {
                debug!("submission blocked by field errors");
                return Ok(SubmitOutcome::Blocked);
            }
            debug!("submitting with field errors: {:?}", errors);
        }

        debug!("posting login for {}", credentials.email);

        let result = {
            let _in_flight = InFlight::enter(&self.state);
            self.api.login(&credentials).await
        };

        let response = match result {
            Ok(response) => response,
            Err(LoginError::Api(err)) => {
                error!("{}", err.message);
                return Ok(SubmitOutcome::Failed);
            }
            // Transport and unrecognized HTTP failures are swallowed without output.
            Err(_) => return Ok(SubmitOutcome::Failed),
        };

        let token = response.access_token().ok_or(FormError::ResponseShape)?;
        set_local_storage(&self.store, StorageKey::AccessToken, token)
            .map_err(FormError::Storage)?;

        self.reset();
        self.navigator.navigate(routes::MEMBER);

        info!("signed in");

        Ok(SubmitOutcome::Succeeded {
            route: routes::MEMBER,
        })
    }
}

/// Counts a submission as in flight until dropped, including on cancellation.
struct InFlight<'a> {
    state: &'a Mutex<FormState>,
}

impl<'a> InFlight<'a> {
    fn enter(state: &'a Mutex<FormState>) -> Self {
        state.lock().unwrap_or_else(PoisonError::into_inner).in_flight += 1;
        Self { state }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}
