//! Schema definitions for lexicon SurrealDB tables
//!
//! Tables:
//! - terms: submitted slang entries with lifecycle state and scores
//! - votes: append-only vote ledger rows
//! - moderators: moderator accounts
//!
//! Row structs are the DB-facing shape; conversion to/from the
//! `storage_traits` records happens at the store boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Module for serializing chrono DateTime to SurrealDB datetime format
pub(crate) mod surreal_datetime {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};
    use surrealdb::sql::Datetime as SurrealDatetime;

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let sd = SurrealDatetime::from(*date);
        serde::Serialize::serialize(&sd, serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let sd = SurrealDatetime::deserialize(deserializer)?;
        Ok(DateTime::from(sd))
    }
}

/// Module for serializing optional chrono DateTime to SurrealDB datetime format
pub(crate) mod surreal_datetime_opt {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};
    use surrealdb::sql::Datetime as SurrealDatetime;

    pub fn serialize<S>(date: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => {
                let sd = SurrealDatetime::from(*d);
                serde::Serialize::serialize(&Some(sd), serializer)
            }
            None => serde::Serialize::serialize(&None::<SurrealDatetime>, serializer),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let sd = Option::<SurrealDatetime>::deserialize(deserializer)?;
        Ok(sd.map(DateTime::from))
    }
}

/// DB row for the `terms` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermRow {
    pub term_id: String,
    pub text: String,
    pub definition: String,
    pub example: String,
    pub score: i64,
    pub trending_score: f64,
    /// "pending" | "approved" | "rejected"
    pub status: String,
    #[serde(default)]
    pub moderation_note: Option<String>,
    #[serde(default, with = "surreal_datetime_opt")]
    pub moderated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub moderated_by: Option<String>,
    #[serde(with = "surreal_datetime")]
    pub created_at: DateTime<Utc>,
}

/// DB row for the `votes` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteRow {
    pub term_id: String,
    pub voter: String,
    pub value: i64,
    #[serde(with = "surreal_datetime")]
    pub created_at: DateTime<Utc>,
}

/// DB row for the `moderators` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeratorRow {
    pub moderator_id: String,
    pub username: String,
    pub password_hash: String,
    #[serde(with = "surreal_datetime")]
    pub created_at: DateTime<Utc>,
}
