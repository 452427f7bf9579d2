use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Stable, opaque textual identifier of an authenticated caller.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Principal text must not be empty")]
pub struct EmptyPrincipal;

impl Principal {
    pub fn new(text: impl Into<String>) -> Result<Self, EmptyPrincipal> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(EmptyPrincipal);
        }
        Ok(Self(text))
    }

    /// Textual form shown to the user ("Logged in as ...").
    pub fn to_text(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for Principal {
    type Error = EmptyPrincipal;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Signed identity issued by the identity provider.
///
/// The controller never inspects the identity beyond its principal; every
/// remote call is scoped by it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    principal: Principal,
}

impl Identity {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }
}
