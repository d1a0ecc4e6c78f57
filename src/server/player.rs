use std::fmt;

/// The host's unique id for a connected player, usually their UUID.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for PlayerId {
    fn from(uuid: String) -> Self {
        Self(uuid)
    }
}

impl From<&str> for PlayerId {
    fn from(uuid: &str) -> Self {
        Self(uuid.to_string())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
