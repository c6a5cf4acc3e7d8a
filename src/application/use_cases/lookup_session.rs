use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use crate::application::{LookupPresenter, RunLookupUseCase};
use crate::domain::{
    build_prompt, Credential, DomainError, LookupFailure, LookupRequest, LookupResult,
    LookupState, WINE_PROMPT_TEMPLATE,
};

/// What to do when a lookup is submitted while another is still in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConcurrencyPolicy {
    /// Cancel the in-flight lookup; the newest one owns the state.
    #[default]
    Supersede,
    /// Refuse the new lookup with [`DomainError::Busy`].
    RejectWhileBusy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionPolicy {
    /// Reject requests with neither a wine name nor an image before any
    /// network call is made.
    pub require_input: bool,
    pub concurrency: ConcurrencyPolicy,
}

struct SessionInner {
    state: LookupState,
    generation: u64,
    in_flight: Option<CancellationToken>,
}

impl SessionInner {
    /// Close out a lookup whose future was dropped before it finished.
    fn abandon(&mut self, generation: u64, presenter: &dyn LookupPresenter) {
        if self.generation != generation {
            return;
        }
        debug!("Lookup dropped before completion; settling");
        self.in_flight = None;
        self.state.finish(LookupResult::Failure(LookupFailure::TransportFault(
            "lookup dropped before the response arrived".to_string(),
        )));
        presenter.render(&self.state);
        self.state.settle();
        presenter.render(&self.state);
    }
}

/// Settles the session if the owning `submit` future is dropped mid-flight.
struct SettleGuard {
    inner: Arc<Mutex<SessionInner>>,
    presenter: Arc<dyn LookupPresenter>,
    generation: u64,
    armed: bool,
}

impl SettleGuard {
    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for SettleGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let generation = self.generation;
        if let Ok(mut inner) = self.inner.try_lock() {
            inner.abandon(generation, self.presenter.as_ref());
            return;
        }

        // Lock is contended; finish the cleanup on the runtime.
        let inner = self.inner.clone();
        let presenter = self.presenter.clone();
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                inner.lock().await.abandon(generation, presenter.as_ref());
            });
        }
    }
}

/// Per-screen owner of the lookup state.
///
/// Each [`submit`](Self::submit) walks the state through Pending, a terminal
/// result, and back to idle, rendering every step through the presenter. At
/// most one lookup is in flight per session. Dropping a `submit` future
/// mid-flight still settles the state and frees the session.
pub struct LookupSession {
    run_lookup: Arc<RunLookupUseCase>,
    presenter: Arc<dyn LookupPresenter>,
    policy: SessionPolicy,
    template: String,
    inner: Arc<Mutex<SessionInner>>,
}

impl LookupSession {
    pub fn new(run_lookup: Arc<RunLookupUseCase>, presenter: Arc<dyn LookupPresenter>) -> Self {
        Self {
            run_lookup,
            presenter,
            policy: SessionPolicy::default(),
            template: WINE_PROMPT_TEMPLATE.to_string(),
            inner: Arc::new(Mutex::new(SessionInner {
                state: LookupState::idle(),
                generation: 0,
                in_flight: None,
            })),
        }
    }

    pub fn with_policy(mut self, policy: SessionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> SessionPolicy {
        self.policy
    }

    pub async fn state(&self) -> LookupState {
        self.inner.lock().await.state.clone()
    }

    pub async fn is_busy(&self) -> bool {
        self.inner.lock().await.in_flight.is_some()
    }

    /// Run one lookup to completion.
    ///
    /// Returns the terminal result, or an error when the request was refused
    /// up front (`InvalidInput`, `Busy`) or superseded by a newer submission
    /// (`Cancelled`). A superseded lookup leaves the state untouched.
    pub async fn submit(
        &self,
        request: &LookupRequest,
        credential: &Credential,
    ) -> Result<LookupResult, DomainError> {
        if self.policy.require_input && request.is_empty() {
            return Err(DomainError::invalid_input(
                "Forneça o nome ou imagem do vinho!",
            ));
        }

        let span = info_span!("lookup", id = %Uuid::new_v4());
        self.run(request, credential).instrument(span).await
    }

    async fn run(
        &self,
        request: &LookupRequest,
        credential: &Credential,
    ) -> Result<LookupResult, DomainError> {
        if let Some(image) = request.image() {
            debug!(
                "Label image {} attached; it is not sent to the chat service",
                image.path().display()
            );
        }

        let prompt = build_prompt(&self.template, request.wine_name());

        let (generation, token) = {
            let mut inner = self.inner.lock().await;

            if let Some(previous) = inner.in_flight.take() {
                match self.policy.concurrency {
                    ConcurrencyPolicy::RejectWhileBusy => {
                        inner.in_flight = Some(previous);
                        return Err(DomainError::busy("a lookup is already in progress"));
                    }
                    ConcurrencyPolicy::Supersede => {
                        info!("Superseding the in-flight lookup");
                        previous.cancel();
                    }
                }
            }

            let token = CancellationToken::new();
            inner.generation += 1;
            inner.in_flight = Some(token.clone());

            inner.state.begin();
            self.presenter.dismiss_input();
            self.presenter.render(&inner.state);

            (inner.generation, token)
        };

        let mut guard = SettleGuard {
            inner: self.inner.clone(),
            presenter: self.presenter.clone(),
            generation,
            armed: true,
        };

        // A ready response is preferred over a late cancellation; the
        // generation check below still discards it if it was superseded.
        let result = tokio::select! {
            biased;
            result = self.run_lookup.execute(&prompt, credential) => result,
            _ = token.cancelled() => {
                guard.disarm();
                debug!("Lookup cancelled before the response arrived");
                return Err(DomainError::cancelled("superseded by a newer lookup"));
            }
        };

        let mut inner = self.inner.lock().await;
        guard.disarm();
        if inner.generation != generation {
            debug!("Discarding result of a superseded lookup");
            return Err(DomainError::cancelled("superseded by a newer lookup"));
        }

        inner.in_flight = None;
        inner.state.finish(result.clone());
        self.presenter.render(&inner.state);

        inner.state.settle();
        self.presenter.render(&inner.state);

        Ok(result)
    }
}
