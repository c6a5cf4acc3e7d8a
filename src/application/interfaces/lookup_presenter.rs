use crate::domain::LookupState;

/// Renders lookup state. Called synchronously on every transition, in order.
pub trait LookupPresenter: Send + Sync {
    /// Drop any input focus before the request goes out.
    fn dismiss_input(&self) {}

    fn render(&self, state: &LookupState);
}

/// Presenter that shows nothing.
pub struct SilentPresenter;

impl LookupPresenter for SilentPresenter {
    fn render(&self, _state: &LookupState) {}
}
