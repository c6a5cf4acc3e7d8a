use std::path::{Path, PathBuf};

/// Shown when the account behind the credential has run out of quota.
pub const QUOTA_EXCEEDED_MESSAGE: &str =
    "Você excedeu sua cota atual. Verifique seu plano e detalhes de cobrança.";

/// Shown for every failure that carries no usable server message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Ocorreu um erro ao gerar a informação do vinho.";

/// Title used for every lookup alert.
pub const ALERT_TITLE: &str = "Erro";

/// Server error code that identifies an exhausted quota.
pub const QUOTA_ERROR_CODE: &str = "insufficient_quota";

/// Handle to a locally acquired label photo.
///
/// Accepted alongside the wine name but not transmitted to the chat service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference(PathBuf);

impl ImageReference {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

/// One user-triggered lookup. Both fields may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupRequest {
    wine_name: Option<String>,
    image: Option<ImageReference>,
}

impl LookupRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wine_name(mut self, name: impl Into<String>) -> Self {
        self.wine_name = Some(name.into());
        self
    }

    pub fn with_image(mut self, image: ImageReference) -> Self {
        self.image = Some(image);
        self
    }

    pub fn wine_name(&self) -> Option<&str> {
        self.wine_name.as_deref()
    }

    pub fn image(&self) -> Option<&ImageReference> {
        self.image.as_ref()
    }

    /// True when there is neither a non-blank name nor an image.
    pub fn is_empty(&self) -> bool {
        let has_name = self
            .wine_name
            .as_deref()
            .map(|n| !n.trim().is_empty())
            .unwrap_or(false);
        !has_name && self.image.is_none()
    }
}

/// Why a lookup ended in failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupFailure {
    QuotaExceeded,
    ServerRejected {
        code: Option<String>,
        message: Option<String>,
    },
    TransportFault(String),
}

impl LookupFailure {
    /// Text shown to the user. Transport details are never included.
    pub fn user_message(&self) -> &str {
        match self {
            LookupFailure::QuotaExceeded => QUOTA_EXCEEDED_MESSAGE,
            LookupFailure::ServerRejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.as_str(),
            LookupFailure::ServerRejected { .. } => GENERIC_FAILURE_MESSAGE,
            LookupFailure::TransportFault(_) => GENERIC_FAILURE_MESSAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResult {
    Pending,
    Success(String),
    Failure(LookupFailure),
}

impl LookupResult {
    pub fn is_pending(&self) -> bool {
        matches!(self, LookupResult::Pending)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            LookupResult::Success(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&LookupFailure> {
        match self {
            LookupResult::Failure(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Modal alert raised by a failed lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

/// Snapshot handed to the presenter after every transition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LookupState {
    loading: bool,
    result: Option<LookupResult>,
}

impl LookupState {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn result(&self) -> Option<&LookupResult> {
        self.result.as_ref()
    }

    /// Visible result text; empty unless the last lookup succeeded.
    pub fn result_text(&self) -> &str {
        self.result.as_ref().and_then(|r| r.text()).unwrap_or("")
    }

    pub fn alert(&self) -> Option<Alert> {
        self.result
            .as_ref()
            .and_then(|r| r.failure())
            .map(|failure| Alert {
                title: ALERT_TITLE.to_string(),
                message: failure.user_message().to_string(),
            })
    }

    /// Enter Pending: prior result is discarded and loading starts.
    pub(crate) fn begin(&mut self) {
        self.loading = true;
        self.result = Some(LookupResult::Pending);
    }

    pub(crate) fn finish(&mut self, result: LookupResult) {
        self.result = Some(result);
    }

    pub(crate) fn settle(&mut self) {
        self.loading = false;
    }
}
