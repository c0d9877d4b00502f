use crate::model::ValueNode;
use ahash::AHashSet;

/// What the source system writes in place of a value it refuses to export.
pub const MASK_SENTINEL: &str = "******";

/// Property names that always hold secrets.
pub const DEFAULT_SECRET_NAMES: &[&str] = &[
    "accessToken",
    "apiKey",
    "apiSecret",
    "authToken",
    "clientSecret",
    "consumerSecret",
    "password",
    "privateKey",
    "secret",
    "secretKey",
    "sharedSecret",
    "signingKey",
    "token",
    "webhookSecret",
];

/// Property names that are never parameterized, whatever their shape.
pub const DEFAULT_EXCLUDED_NAMES: &[&str] = &[
    "button",
    "customAuth",
    "openId",
    "saml",
    "screenTemplateName",
    "skRedirectUri",
];

/// Name-based classification of attribute names. Matching is case-insensitive.
#[derive(Debug, Clone)]
pub struct PropertyClassifier {
    secret: AHashSet<String>,
    excluded: AHashSet<String>,
}

impl Default for PropertyClassifier {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET_NAMES
                .iter()
                .map(|n| n.to_ascii_lowercase())
                .collect(),
            excluded: DEFAULT_EXCLUDED_NAMES
                .iter()
                .map(|n| n.to_ascii_lowercase())
                .collect(),
        }
    }
}

impl PropertyClassifier {
    pub fn with_secret_names<S: AsRef<str>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.secret
            .extend(names.into_iter().map(|n| n.as_ref().to_ascii_lowercase()));
        self
    }

    pub fn with_excluded_names<S: AsRef<str>>(
        mut self,
        names: impl IntoIterator<Item = S>,
    ) -> Self {
        self.excluded
            .extend(names.into_iter().map(|n| n.as_ref().to_ascii_lowercase()));
        self
    }

    pub fn is_secret(&self, name: &str) -> bool {
        self.secret.contains(&name.to_ascii_lowercase())
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded.contains(&name.to_ascii_lowercase())
    }
}

/// True when the source redacted this value.
pub fn is_masked(value: &ValueNode) -> bool {
    value.as_str() == Some(MASK_SENTINEL)
}
