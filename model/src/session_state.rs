#[cfg(feature = "testing")]
use proptest_derive::Arbitrary;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

#[cfg_attr(feature = "testing", derive(Arbitrary))]
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    PartialEq,
    Eq,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "PascalCase")]
pub enum SessionState {
    #[default]
    Unauthenticated, // No credential, or the credential was revoked
    Authenticating, // Delegated handshake with the identity provider in progress
    Authenticated,  // Identity and principal obtained
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated)
    }

    pub fn transitions(&self) -> Vec<SessionState> {
        match self {
            SessionState::Unauthenticated => vec![
                SessionState::Authenticating,
                // Recovered credential on startup
                SessionState::Authenticated,
            ],
            SessionState::Authenticating => vec![
                SessionState::Authenticated,
                SessionState::Unauthenticated,
            ],
            SessionState::Authenticated => vec![SessionState::Unauthenticated],
        }
    }

    pub fn can_transition_to(&self, next: SessionState) -> bool {
        self.transitions().contains(&next)
    }

    pub fn invalid_transitions(&self) -> Vec<SessionState> {
        let valid = self.transitions();
        SessionState::iter()
            .filter(|s| *s != *self && !valid.contains(s))
            .collect()
    }
}
