use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageId {
    Number(u64),
    /// Negative or fractional ids, kept exactly as the backend sent them.
    Other(serde_json::Number),
    Text(String),
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageId::Number(n) => write!(f, "{n}"),
            MessageId::Other(n) => write!(f, "{n}"),
            MessageId::Text(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Bot,
    User,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub from: Sender,
    pub text: String,
}

impl Message {
    pub fn is_user(&self) -> bool {
        self.from == Sender::User
    }
}

static LAST_SESSION_MILLIS: AtomicU64 = AtomicU64::new(0);

/// Opaque conversation identifier, either client-generated (`sess_<millis>`)
/// or issued by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// `sess_<epoch millis>`, bumped past the last generated id so two
    /// sessions started in the same millisecond still differ.
    pub fn generate() -> Self {
        let now = epoch_millis();
        let mut last = LAST_SESSION_MILLIS.load(Ordering::Relaxed);
        let stamp = loop {
            let next = now.max(last + 1);
            match LAST_SESSION_MILLIS.compare_exchange_weak(
                last,
                next,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break next,
                Err(actual) => last = actual,
            }
        };
        Self(format!("sess_{stamp}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: SessionId,
    #[serde(default)]
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub updated_at: Option<u64>,
}

impl SessionSummary {
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "New chat"
        } else {
            &self.title
        }
    }
}

/// Accepts epoch milliseconds or an RFC 3339 string.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Millis(u64),
        Float(f64),
        Text(String),
    }

    Ok(match Option::<RawTimestamp>::deserialize(deserializer)? {
        Some(RawTimestamp::Millis(ms)) => Some(ms),
        Some(RawTimestamp::Float(ms)) if ms >= 0.0 => Some(ms as u64),
        Some(RawTimestamp::Text(text)) => OffsetDateTime::parse(&text, &Rfc3339)
            .ok()
            .and_then(|dt| u64::try_from(dt.unix_timestamp_nanos() / 1_000_000).ok()),
        _ => None,
    })
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
    Ta,
    Ml,
    Bn,
    Mr,
}

impl Language {
    pub const ALL: [Language; 6] = [
        Language::En,
        Language::Hi,
        Language::Ta,
        Language::Ml,
        Language::Bn,
        Language::Mr,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Ta => "ta",
            Language::Ml => "ml",
            Language::Bn => "bn",
            Language::Mr => "mr",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Hi => "हिन्दी",
            Language::Ta => "தமிழ்",
            Language::Ml => "മലയാളം",
            Language::Bn => "বাংলা",
            Language::Mr => "मराठी",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|lang| lang.code() == code)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Farmer,
    Expert,
}

impl UserRole {
    pub fn label(self) -> &'static str {
        match self {
            UserRole::Farmer => "Farmer",
            UserRole::Expert => "Expert",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pincode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(
        default,
        alias = "soil_type",
        skip_serializing_if = "Option::is_none"
    )]
    pub soil_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl UserProfile {
    /// Backend stores farmers under the `user` role.
    pub fn display_role(&self) -> &str {
        match self.role.as_deref() {
            Some("user") => "farmer",
            Some(role) if !role.is_empty() => role,
            _ => "-",
        }
    }

    pub fn is_farmer(&self) -> bool {
        matches!(self.role.as_deref(), Some("user"))
    }
}

pub fn epoch_millis() -> u64 {
    u64::try_from(OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000).unwrap_or(0)
}
