use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Speaker role that replaces real participant names in a transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    Agent,
    Bot,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Customer, Role::Agent, Role::Bot];

    /// Canonical placeholder written into the transcript text
    pub fn token(&self) -> &'static str {
        match self {
            Role::Customer => "CUSTOMER",
            Role::Agent => "AGENT",
            Role::Bot => "BOT",
        }
    }

    /// Parse a canonical placeholder back into a role
    pub fn from_token(token: &str) -> Option<Self> {
        Role::ALL.into_iter().find(|r| r.token() == token)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A single speaker-attributed segment of a transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptMessage {
    pub sender: Role,
    pub text: String,
}

impl TranscriptMessage {
    pub fn new(sender: Role, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
        }
    }

    pub fn is_customer(&self) -> bool {
        self.sender == Role::Customer
    }
}

/// A sentence spoken by the customer; only the normalizer can produce one
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CustomerSentence(String);

impl CustomerSentence {
    pub(crate) fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CustomerSentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mapping of real speaker names to the role they play in the conversation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NameMapping {
    names: HashMap<String, Role>,
}

impl NameMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the usual customer/agent mapping; blank names are ignored
    pub fn customer_agent(customer: &str, agent: &str) -> Self {
        let mut mapping = Self::new();
        mapping.insert(customer, Role::Customer);
        mapping.insert(agent, Role::Agent);
        mapping
    }

    pub fn insert(&mut self, name: &str, role: Role) {
        let name = name.trim();
        if !name.is_empty() {
            self.names.insert(name.to_string(), role);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Role)> {
        self.names.iter().map(|(name, role)| (name.as_str(), *role))
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
