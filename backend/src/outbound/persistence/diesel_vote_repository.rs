//! PostgreSQL-backed `VoteRepository`.
//!
//! `snippet_votes` is keyed by `(snippet_id, voter_id)`; casting upserts on
//! that key so a user never holds two votes on one snippet.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{VoteRepository, VoteRepositoryError};
use crate::domain::{SavedSnippetId, UserId, Vote, VoteKind};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewSnippetVoteRow, SnippetVoteRow};
use super::pool::DbPool;
use super::schema::snippet_votes;

/// Diesel-backed store for feed votes.
#[derive(Clone)]
pub struct DieselVoteRepository {
    pool: DbPool,
}

impl DieselVoteRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> VoteRepositoryError {
    map_diesel_error(
        error,
        VoteRepositoryError::query,
        VoteRepositoryError::connection,
    )
}

fn row_to_vote(row: SnippetVoteRow) -> Result<Vote, VoteRepositoryError> {
    let kind = row
        .kind
        .parse::<VoteKind>()
        .map_err(|err| VoteRepositoryError::corrupt(format!("vote on {}: {err}", row.snippet_id)))?;
    Ok(Vote {
        snippet_id: SavedSnippetId::from_uuid(row.snippet_id),
        voter: UserId::from_uuid(row.voter_id),
        kind,
    })
}

#[async_trait]
impl VoteRepository for DieselVoteRepository {
    async fn cast(&self, vote: &Vote) -> Result<(), VoteRepositoryError> {
        let row = NewSnippetVoteRow {
            snippet_id: *vote.snippet_id.as_uuid(),
            voter_id: *vote.voter.as_uuid(),
            kind: vote.kind.as_str(),
            updated_at: Utc::now(),
        };
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, VoteRepositoryError::connection))?;

        diesel::insert_into(snippet_votes::table)
            .values(&row)
            .on_conflict((snippet_votes::snippet_id, snippet_votes::voter_id))
            .do_update()
            .set((
                snippet_votes::kind.eq(excluded(snippet_votes::kind)),
                snippet_votes::updated_at.eq(excluded(snippet_votes::updated_at)),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_error)?;
        Ok(())
    }

    async fn retract(
        &self,
        snippet_id: &SavedSnippetId,
        voter: &UserId,
    ) -> Result<bool, VoteRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, VoteRepositoryError::connection))?;

        let removed = diesel::delete(
            snippet_votes::table
                .filter(snippet_votes::snippet_id.eq(snippet_id.as_uuid()))
                .filter(snippet_votes::voter_id.eq(voter.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_error)?;
        Ok(removed > 0)
    }

    async fn votes_for(
        &self,
        snippet_ids: &[SavedSnippetId],
    ) -> Result<Vec<Vote>, VoteRepositoryError> {
        if snippet_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = snippet_ids.iter().map(|id| *id.as_uuid()).collect();
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, VoteRepositoryError::connection))?;

        let rows: Vec<SnippetVoteRow> = snippet_votes::table
            .filter(snippet_votes::snippet_id.eq_any(ids))
            .select(SnippetVoteRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_error)?;
        rows.into_iter().map(row_to_vote).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn row(kind: &str) -> SnippetVoteRow {
        SnippetVoteRow {
            snippet_id: Uuid::new_v4(),
            voter_id: Uuid::new_v4(),
            kind: kind.to_owned(),
        }
    }

    #[rstest]
    #[case::up("up", VoteKind::Up)]
    #[case::down("down", VoteKind::Down)]
    fn stored_kinds_decode(#[case] stored: &str, #[case] expected: VoteKind) {
        let vote = row_to_vote(row(stored)).expect("valid row");
        assert_eq!(vote.kind, expected);
    }

    #[rstest]
    fn unknown_kind_is_corrupt() {
        let error = row_to_vote(row("meh")).expect_err("unknown kind");
        assert!(matches!(error, VoteRepositoryError::Corrupt { .. }));
    }
}
