//! SurrealDB-backed store implementation
//!
//! `SurrealGlossary` implements `TermStore`, `VoteLedger`, and
//! `ModeratorStore` over the `schema` row types, converting to/from
//! `storage_traits` records at the boundary.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use surrealdb::engine::any::Any;
use surrealdb::Surreal;
use tracing::{debug, info};

use crate::error::{StateError, StorageError};
use crate::migrations;
use crate::schema::{ModeratorRow, TermRow, VoteRow};
use crate::storage_traits::{
    ModerationUpdate, ModeratorId, ModeratorRecord, ModeratorStore, StorageResult, TermId,
    TermRecord, TermStatus, TermStore, VoteLedger, VoteRecord, VoteValue, VoterIdentity,
};

/// Marker thrown inside the cast-vote transaction when the duplicate check
/// trips. Also matched against unique-index violations from the backstop.
const DUPLICATE_VOTE_MARKER: &str = "duplicate_vote";

/// SurrealDB-backed implementation of the glossary storage traits.
pub struct SurrealGlossary {
    db: Surreal<Any>,
}

impl SurrealGlossary {
    /// Create an in-memory instance for testing.
    ///
    /// Connects to `mem://`, selects `lexicon/main`, and runs `init_schema`.
    pub async fn in_memory() -> crate::Result<Self> {
        let db = surrealdb::engine::any::connect("mem://")
            .await
            .map_err(|e| StateError::Connection(e.to_string()))?;

        db.use_ns("lexicon")
            .use_db("main")
            .await
            .map_err(|e| StateError::Connection(e.to_string()))?;

        migrations::init_schema(&db).await?;

        info!("SurrealGlossary connected (in-memory)");
        Ok(Self { db })
    }

    /// Create from environment variables.
    ///
    /// Uses `SURREALDB_URL` when set, otherwise local persistence under
    /// `.lexicon/db`.
    pub async fn from_env() -> crate::Result<Self> {
        if let Ok(url) = std::env::var("SURREALDB_URL") {
            let db = surrealdb::engine::any::connect(&url)
                .await
                .map_err(|e| StateError::Connection(e.to_string()))?;

            db.use_ns("lexicon")
                .use_db("main")
                .await
                .map_err(|e| StateError::Connection(e.to_string()))?;

            migrations::init_schema(&db).await?;
            info!("SurrealGlossary connected ({})", url);
            return Ok(Self { db });
        }

        let path = ".lexicon/db";
        std::fs::create_dir_all(path).map_err(|e| {
            StateError::Connection(format!(
                "Failed to create database directory {}: {}",
                path, e
            ))
        })?;
        let url = format!("surrealkv://{}", path);
        info!("SURREALDB_URL not set, using local persistence: {}", url);

        let db = surrealdb::engine::any::connect(&url)
            .await
            .map_err(|e| StateError::Connection(format!("Failed to connect to {}: {}", url, e)))?;

        db.use_ns("lexicon")
            .use_db("main")
            .await
            .map_err(|e| StateError::Connection(e.to_string()))?;

        migrations::init_schema(&db).await?;
        Ok(Self { db })
    }

    // -- private helpers -----------------------------------------------------

    /// Fetch a term row by ID, returning the DB row or TermNotFound.
    async fn fetch_term(&self, tid: &str) -> StorageResult<TermRow> {
        let tid_owned = tid.to_string();
        let mut res = self
            .db
            .query("SELECT * FROM terms WHERE term_id = $tid")
            .bind(("tid", tid_owned))
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let rows: Vec<TermRow> = res
            .take(0)
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        rows.into_iter()
            .next()
            .ok_or_else(|| StorageError::TermNotFound {
                term_id: tid.to_string(),
            })
    }

    /// Convert a `schema::TermRow` (DB row) into a `storage_traits::TermRecord`.
    fn row_to_term(row: TermRow) -> StorageResult<TermRecord> {
        let status = match row.status.as_str() {
            "pending" => TermStatus::Pending,
            "approved" => TermStatus::Approved,
            "rejected" => TermStatus::Rejected,
            other => {
                return Err(StorageError::Backend(format!(
                    "unknown term status: {other}"
                )))
            }
        };

        Ok(TermRecord {
            term_id: TermId(row.term_id),
            text: row.text,
            definition: row.definition,
            example: row.example,
            score: row.score,
            trending_score: row.trending_score,
            status,
            moderation_note: row.moderation_note,
            moderated_at: row.moderated_at,
            moderated_by: row.moderated_by.map(ModeratorId),
            created_at: row.created_at,
        })
    }

    fn status_str(status: TermStatus) -> &'static str {
        match status {
            TermStatus::Pending => "pending",
            TermStatus::Approved => "approved",
            TermStatus::Rejected => "rejected",
        }
    }

    fn row_to_vote(row: VoteRow) -> StorageResult<VoteRecord> {
        let value = VoteValue::try_from(row.value)
            .map_err(|v| StorageError::Backend(format!("invalid ledger value: {v}")))?;
        Ok(VoteRecord {
            term_id: TermId(row.term_id),
            voter: VoterIdentity(row.voter),
            value,
            timestamp: row.created_at,
        })
    }

    fn row_to_moderator(row: ModeratorRow) -> ModeratorRecord {
        ModeratorRecord {
            moderator_id: ModeratorId(row.moderator_id),
            username: row.username,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl TermStore for SurrealGlossary {
    async fn create_term(&self, term: TermRecord) -> StorageResult<TermRecord> {
        let row = TermRow {
            term_id: term.term_id.0.clone(),
            text: term.text.clone(),
            definition: term.definition.clone(),
            example: term.example.clone(),
            score: term.score,
            trending_score: term.trending_score,
            status: Self::status_str(term.status).to_string(),
            moderation_note: term.moderation_note.clone(),
            moderated_at: term.moderated_at,
            moderated_by: term.moderated_by.as_ref().map(|m| m.0.clone()),
            created_at: term.created_at,
        };

        debug!(term_id = %term.term_id, "creating term");

        let _created: Option<TermRow> = self
            .db
            .create("terms")
            .content(row)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        Ok(term)
    }

    async fn get_term(&self, term_id: &TermId) -> StorageResult<TermRecord> {
        let row = self.fetch_term(&term_id.0).await?;
        Self::row_to_term(row)
    }

    async fn review_queue(&self) -> StorageResult<Vec<TermRecord>> {
        let mut res = self
            .db
            .query("SELECT * FROM terms WHERE status = 'pending' ORDER BY created_at DESC")
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let rows: Vec<TermRow> = res
            .take(0)
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        rows.into_iter().map(Self::row_to_term).collect()
    }

    async fn list_approved(&self) -> StorageResult<Vec<TermRecord>> {
        let mut res = self
            .db
            .query("SELECT * FROM terms WHERE status = 'approved'")
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let rows: Vec<TermRow> = res
            .take(0)
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        rows.into_iter().map(Self::row_to_term).collect()
    }

    async fn apply_moderation(
        &self,
        term_id: &TermId,
        update: ModerationUpdate,
    ) -> StorageResult<TermRecord> {
        // Verify existence first so a missing term surfaces as TermNotFound
        // rather than a silent no-op UPDATE.
        self.fetch_term(&term_id.0).await?;

        let tid_owned = term_id.0.clone();
        let status = Self::status_str(update.status).to_string();
        let moderated_at = surrealdb::sql::Datetime::from(update.moderated_at);

        self.db
            .query(
                "UPDATE terms SET
                    status = $status,
                    moderation_note = $note,
                    moderated_at = $at,
                    moderated_by = $by
                 WHERE term_id = $tid",
            )
            .bind(("status", status))
            .bind(("note", update.note))
            .bind(("at", moderated_at))
            .bind(("by", update.moderator_id.0))
            .bind(("tid", tid_owned))
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let row = self.fetch_term(&term_id.0).await?;
        Self::row_to_term(row)
    }

    async fn set_trending_scores(&self, scores: &HashMap<TermId, f64>) -> StorageResult<()> {
        // Full projection refresh in ONE transaction: the reset and every
        // per-term write commit together, so a concurrent reader sees the
        // previous snapshot or the new one, never the transient zeros.
        let mut sql =
            String::from("BEGIN TRANSACTION;\nUPDATE terms SET trending_score = 0.0;\n");
        for i in 0..scores.len() {
            sql.push_str(&format!(
                "UPDATE terms SET trending_score = $s{i} WHERE term_id = $t{i};\n"
            ));
        }
        sql.push_str("COMMIT TRANSACTION;");

        let mut query = self.db.query(sql);
        for (i, (term_id, score)) in scores.iter().enumerate() {
            query = query
                .bind((format!("s{i}"), *score))
                .bind((format!("t{i}"), term_id.0.clone()));
        }

        let res = query
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        res.check()
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl VoteLedger for SurrealGlossary {
    async fn cast_vote(
        &self,
        term_id: &TermId,
        voter: &VoterIdentity,
        value: VoteValue,
    ) -> StorageResult<TermRecord> {
        // TermNotFound must win over DuplicateVote for a bogus ID.
        self.fetch_term(&term_id.0).await?;

        // One transaction: duplicate check, ledger append, score update.
        // The THROW aborts the whole block; the unique (term_id, voter)
        // index is the backstop if two transactions race past the check.
        let sql = format!(
            r#"
            BEGIN TRANSACTION;
            LET $existing = (SELECT * FROM votes WHERE term_id = $tid AND voter = $voter);
            IF array::len($existing) > 0 {{
                THROW "{DUPLICATE_VOTE_MARKER}";
            }};
            CREATE votes CONTENT {{
                term_id: $tid,
                voter: $voter,
                value: $value,
                created_at: $now
            }};
            UPDATE terms SET score = score + $value WHERE term_id = $tid;
            COMMIT TRANSACTION;
            "#
        );

        let tid_owned = term_id.0.clone();
        let voter_owned = voter.0.clone();
        let now = surrealdb::sql::Datetime::from(Utc::now());

        let mut res = self
            .db
            .query(sql)
            .bind(("tid", tid_owned))
            .bind(("voter", voter_owned))
            .bind(("value", value.as_i64()))
            .bind(("now", now))
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        // A failed transaction marks every statement with a generic
        // cancellation error; the THROW message lives on one of them, so
        // collect them all before matching the marker.
        let errors = res.take_errors();
        if !errors.is_empty() {
            let msg = errors
                .values()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ");
            if msg.contains(DUPLICATE_VOTE_MARKER) || msg.contains("idx_term_voter") {
                return Err(StorageError::DuplicateVote {
                    term_id: term_id.to_string(),
                    voter: voter.to_string(),
                });
            }
            return Err(StorageError::Backend(msg));
        }

        debug!(term_id = %term_id, voter = %voter, value = value.as_i64(), "vote recorded");

        let row = self.fetch_term(&term_id.0).await?;
        Self::row_to_term(row)
    }

    async fn votes_since(&self, cutoff: DateTime<Utc>) -> StorageResult<Vec<VoteRecord>> {
        let cutoff = surrealdb::sql::Datetime::from(cutoff);
        let mut res = self
            .db
            .query("SELECT * FROM votes WHERE created_at >= $cutoff")
            .bind(("cutoff", cutoff))
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let rows: Vec<VoteRow> = res
            .take(0)
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        rows.into_iter().map(Self::row_to_vote).collect()
    }

    async fn votes_for_term(&self, term_id: &TermId) -> StorageResult<Vec<VoteRecord>> {
        let tid_owned = term_id.0.clone();
        let mut res = self
            .db
            .query("SELECT * FROM votes WHERE term_id = $tid")
            .bind(("tid", tid_owned))
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let rows: Vec<VoteRow> = res
            .take(0)
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        rows.into_iter().map(Self::row_to_vote).collect()
    }
}

#[async_trait]
impl ModeratorStore for SurrealGlossary {
    async fn insert_moderator(&self, moderator: ModeratorRecord) -> StorageResult<ModeratorRecord> {
        let row = ModeratorRow {
            moderator_id: moderator.moderator_id.0.clone(),
            username: moderator.username.clone(),
            password_hash: moderator.password_hash.clone(),
            created_at: moderator.created_at,
        };

        let _created: Option<ModeratorRow> = self
            .db
            .create("moderators")
            .content(row)
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        Ok(moderator)
    }

    async fn find_moderator(&self, username: &str) -> StorageResult<ModeratorRecord> {
        let username_owned = username.to_string();
        let mut res = self
            .db
            .query("SELECT * FROM moderators WHERE username = $username")
            .bind(("username", username_owned))
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let rows: Vec<ModeratorRow> = res
            .take(0)
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        rows.into_iter()
            .next()
            .map(Self::row_to_moderator)
            .ok_or_else(|| StorageError::ModeratorNotFound {
                username: username.to_string(),
            })
    }
}
