//! Entry/exit log records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Gate action recorded against a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryAction {
    Entry,
    Exit,
}

impl EntryAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryAction::Entry => "entry",
            EntryAction::Exit => "exit",
        }
    }
}

impl FromStr for EntryAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entry" => Ok(EntryAction::Entry),
            "exit" => Ok(EntryAction::Exit),
            other => Err(DomainError::invalid(format!("unknown entry action: {other}"))),
        }
    }
}

impl fmt::Display for EntryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable record of a guard or admin action. Never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryLog {
    pub id: Uuid,
    pub pass_id: Uuid,
    pub guard_user_id: Uuid,
    pub action: EntryAction,
    pub comment: Option<String>,
    pub action_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parse() {
        assert_eq!("entry".parse::<EntryAction>().unwrap(), EntryAction::Entry);
        assert_eq!("exit".parse::<EntryAction>().unwrap(), EntryAction::Exit);
        assert!("EXIT".parse::<EntryAction>().is_err());
    }
}
