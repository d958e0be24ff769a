//! Intents recognised by the webhook.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A user request category, pre-classified by the conversational platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    /// Greeting that doubles as a store liveness check
    StartChat,
    /// Status of the latest request of a registration id
    GetRequestStatus,
    /// Course and subject listing that opens a new request
    NewRequest,
    /// Echo of the subjects picked by index
    SelectSubjects,
    /// Syllabus upload that finalizes the request
    ReceiveFile,
    /// Reset of the store to the reference dataset
    SeedDatabase,
}

impl Intent {
    pub const ALL: [Intent; 6] = [
        Intent::StartChat,
        Intent::GetRequestStatus,
        Intent::NewRequest,
        Intent::SelectSubjects,
        Intent::ReceiveFile,
        Intent::SeedDatabase,
    ];

    /// Display name of the intent on the dialogue platform.
    pub fn platform_name(&self) -> &'static str {
        match self {
            Intent::StartChat => "IniciarChat",
            Intent::GetRequestStatus => "GetStatusIsencao",
            Intent::NewRequest => "NovaIsencao",
            Intent::SelectSubjects => "ReceberMateria",
            Intent::ReceiveFile => "ReceiveFile",
            Intent::SeedDatabase => "PopularBD",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.platform_name())
    }
}

/// Intent names the webhook has no handler for.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntentError {
    #[error("No handler registered for intent '{0}'")]
    Unknown(String),
}

impl FromStr for Intent {
    type Err = IntentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Intent::ALL
            .iter()
            .copied()
            .find(|intent| intent.platform_name() == s)
            .ok_or_else(|| IntentError::Unknown(s.to_string()))
    }
}
