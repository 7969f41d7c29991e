//! SurrealDB schema migrations and initialization
//!
//! Sets up the terms, votes, and moderators tables with the indexes the
//! store relies on. Safe to call multiple times (idempotent).

use surrealdb::engine::any::Any;
use surrealdb::Surreal;
use tracing::{debug, info};

use crate::Result;

/// Initialize all lexicon tables in SurrealDB.
///
/// Called once on connection by both store constructors.
pub async fn init_schema(db: &Surreal<Any>) -> Result<()> {
    info!("Initializing lexicon SurrealDB schema");

    init_terms_table(db).await?;
    init_votes_table(db).await?;
    init_moderators_table(db).await?;

    info!("Lexicon schema initialization complete");
    Ok(())
}

/// Initialize `terms` table
///
/// Schema:
/// ```text
/// TABLE terms {
///   term_id:          STRING (primary key, unique)
///   text:             STRING
///   definition:       STRING
///   example:          STRING
///   score:            INT
///   trending_score:   FLOAT
///   status:           STRING (enum: pending | approved | rejected)
///   moderation_note:  STRING?
///   moderated_at:     DATETIME?
///   moderated_by:     STRING?
///   created_at:       DATETIME (indexed)
/// }
/// ```
///
/// Constraints:
/// - `term_id` is unique
/// - Terms are never deleted (audit trail); delete permission is NONE
/// - `status` transitions enforced via app logic
async fn init_terms_table(db: &Surreal<Any>) -> Result<()> {
    debug!("Initializing terms table");

    let sql = r#"
        DEFINE TABLE terms
            SCHEMALESS
            PERMISSIONS
                FOR create FULL
                FOR select FULL
                FOR update FULL
                FOR delete NONE;

        DEFINE INDEX idx_term_id ON TABLE terms COLUMNS term_id UNIQUE;

        -- Index status for the review queue and the approved-only queries
        DEFINE INDEX idx_status ON TABLE terms COLUMNS status;

        -- Index created_at for newest-first review ordering
        DEFINE INDEX idx_created_at ON TABLE terms COLUMNS created_at;

        -- Composite index (status, score) for score-ranked listings
        DEFINE INDEX idx_status_score ON TABLE terms COLUMNS status, score;
    "#;

    db.query(sql).await?;
    info!("✓ terms table initialized");
    Ok(())
}

/// Initialize `votes` table
///
/// Schema:
/// ```text
/// TABLE votes {
///   term_id:     STRING (foreign key to terms.term_id)
///   voter:       STRING (coarse voter identity)
///   value:       INT (+1 | -1)
///   created_at:  DATETIME
/// }
/// ```
///
/// Constraints:
/// - `(term_id, voter)` is unique. This is the storage-layer backstop for
///   the one-vote-per-identity invariant; the primary enforcement is the
///   transactional check in `SurrealGlossary::cast_vote`.
/// - Ledger rows are immutable: update and delete permissions are NONE.
async fn init_votes_table(db: &Surreal<Any>) -> Result<()> {
    debug!("Initializing votes table");

    let sql = r#"
        DEFINE TABLE votes
            SCHEMALESS
            PERMISSIONS
                FOR create FULL
                FOR select FULL
                FOR update NONE
                FOR delete NONE;

        -- One vote per (term, voter): the critical ledger constraint
        DEFINE INDEX idx_term_voter ON TABLE votes COLUMNS term_id, voter UNIQUE;

        -- Index term_id for per-term recomputation audits
        DEFINE INDEX idx_vote_term_id ON TABLE votes COLUMNS term_id;

        -- Index created_at for the trending window scan
        DEFINE INDEX idx_vote_created_at ON TABLE votes COLUMNS created_at;
    "#;

    db.query(sql).await?;
    info!("✓ votes table initialized");
    Ok(())
}

/// Initialize `moderators` table
async fn init_moderators_table(db: &Surreal<Any>) -> Result<()> {
    debug!("Initializing moderators table");

    let sql = r#"
        DEFINE TABLE moderators
            SCHEMALESS
            PERMISSIONS
                FOR create FULL
                FOR select FULL
                FOR update FULL
                FOR delete NONE;

        DEFINE INDEX idx_moderator_id ON TABLE moderators COLUMNS moderator_id UNIQUE;
        DEFINE INDEX idx_username ON TABLE moderators COLUMNS username UNIQUE;
    "#;

    db.query(sql).await?;
    info!("✓ moderators table initialized");
    Ok(())
}
