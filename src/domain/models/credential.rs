use std::fmt;

use serde::{Deserialize, Serialize};

/// Name under which a credential is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CredentialKey {
    #[serde(rename = "chatApiKey")]
    ChatApiKey,
    #[serde(rename = "visionApiKey")]
    VisionApiKey,
}

impl CredentialKey {
    pub const ALL: [CredentialKey; 2] = [CredentialKey::ChatApiKey, CredentialKey::VisionApiKey];

    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialKey::ChatApiKey => "chatApiKey",
            CredentialKey::VisionApiKey => "visionApiKey",
        }
    }
}

impl fmt::Display for CredentialKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque bearer token.
///
/// No format is enforced and an empty value is legal: the remote service is
/// left to reject it. `Debug` and `Display` never print the secret.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Last four characters behind a mask, or `(not set)`.
    pub fn masked(&self) -> String {
        if self.0.is_empty() {
            return "(not set)".to_string();
        }
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 4 {
            return "*".repeat(chars.len());
        }
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{}", "*".repeat(8), tail)
    }
}

impl From<Option<String>> for Credential {
    fn from(value: Option<String>) -> Self {
        Self(value.unwrap_or_default())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&self.masked()).finish()
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.masked())
    }
}
