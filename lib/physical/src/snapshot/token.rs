use crate::snapshot::{decode, encode};
use crate::{SavedOperator, SnapshotError};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// An opaque, URL-safe encoding of a [SavedOperator] that can be handed to remote clients.
///
/// Creating a token from a string never fails. Whether the token is valid is only known once it
/// is turned back into a snapshot with [ContinuationToken::to_snapshot].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContinuationToken(String);

impl ContinuationToken {
    pub fn from_snapshot(saved: &SavedOperator) -> Result<Self, SnapshotError> {
        Ok(Self(URL_SAFE_NO_PAD.encode(encode(saved)?)))
    }

    pub fn to_snapshot(&self) -> Result<SavedOperator, SnapshotError> {
        let data = URL_SAFE_NO_PAD.decode(self.0.trim())?;
        decode(&data)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl FromStr for ContinuationToken {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(Self(value.to_owned()))
    }
}

impl From<String> for ContinuationToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Display for ContinuationToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
