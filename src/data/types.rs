//! Content records served by the remote API and stored in snapshots.
//!
//! Records pass through this layer unmodified. Each one wraps the JSON
//! object it was read from; the fields used for lookup and filtering are
//! read through typed accessors that treat `null` or an odd type as unset.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn field<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    fields.get(key).filter(|value| !value.is_null())
}

fn text<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    field(fields, key).and_then(Value::as_str)
}

fn flag(fields: &Map<String, Value>, key: &str) -> bool {
    field(fields, key).and_then(Value::as_bool).unwrap_or(false)
}

/// Declares a content record: a JSON object kept exactly as received.
macro_rules! record {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Map<String, Value>);

        impl $name {
            /// All fields, as received.
            pub const fn fields(&self) -> &Map<String, Value> {
                &self.0
            }

            pub fn into_fields(self) -> Map<String, Value> {
                self.0
            }

            /// A field, treating `null` as absent.
            pub fn get(&self, key: &str) -> Option<&Value> {
                field(&self.0, key)
            }
        }

        impl From<Map<String, Value>> for $name {
            fn from(fields: Map<String, Value>) -> Self {
                Self(fields)
            }
        }
    };
}

record! {
    /// An article, keyed by its slug.
    Article
}

impl Article {
    /// Unique lookup key (e.g., "rust-for-researchers"), empty if missing
    pub fn slug(&self) -> &str {
        text(&self.0, "slug").unwrap_or_default()
    }

    /// One of `computer-science`, `business`, `humanities`, or unset
    pub fn category(&self) -> Option<&str> {
        text(&self.0, "category")
    }

    pub fn featured(&self) -> bool {
        flag(&self.0, "featured")
    }

    /// Only `published` articles are ever snapshotted
    pub fn status(&self) -> Option<&str> {
        text(&self.0, "status")
    }

    /// ISO 8601 publish timestamp, the descending sort key
    pub fn published_date(&self) -> Option<&str> {
        text(&self.0, "publishedDate")
    }
}

record! {
    /// A team member. Only active members are surfaced.
    TeamMember
}

impl TeamMember {
    pub fn is_active(&self) -> bool {
        flag(&self.0, "isActive")
    }

    /// Display order, ascending
    pub fn order(&self) -> Option<i64> {
        self.get("order").and_then(Value::as_i64)
    }
}

record! {
    /// A researcher record.
    Researcher
}

impl Researcher {
    /// `active`, `alumni` or `inactive`
    pub fn status(&self) -> Option<&str> {
        text(&self.0, "status")
    }

    pub fn program(&self) -> Option<&str> {
        text(&self.0, "program")
    }
}

/// Tags are opaque; no filtering is ever applied to them.
pub type Tag = Map<String, Value>;

/// Metadata describing the snapshot build, stored in `build-info.json`.
///
/// The default value is `{ "timestamp": "", "version": "" }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    /// RFC 3339 build time, e.g. "2025-03-01T12:00:00.000Z"
    #[serde(default)]
    pub timestamp: String,

    #[serde(default)]
    pub version: String,

    /// Remote API base URL the snapshots were taken from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
}

/// Payload of a newsletter subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsletterSubscription {
    pub email: String,
}

/// Free-form application form payload, forwarded verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Application(pub Map<String, Value>);
