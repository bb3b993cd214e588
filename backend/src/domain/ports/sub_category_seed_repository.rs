//! Port for the guarded, destructive reseed of the sub-category catalog.
//!
//! The reseed is guarded by a persisted [`InitializationFlag`]. Adapters must
//! claim the flag, wipe the collection, insert the new records, and mark the
//! flag initialised as one atomic step, so concurrent first boots cannot both
//! reseed and a failure never leaves the flag set over a partial catalog.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{InitializationFlag, SubCategory};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by sub-category seeding adapters.
    pub enum SubCategorySeedRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "sub-category seed connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "sub-category seed query failed: {message}",
    }
}

/// Result of attempting a reseed.
///
/// `AlreadySeeded` is not an error: it means the flag was already set when the
/// adapter claimed it, and nothing was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedingResult {
    /// The collection was wiped, reseeded, and the flag set.
    Applied,
    /// The flag was already set; the collection was left untouched.
    AlreadySeeded,
}

/// Records and timestamp for one reseed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubCategorySeedRequest {
    /// Every record to insert, with freshly generated identifiers.
    pub records: Vec<SubCategory>,
    /// Timestamp written to the flag's `last_updated` field.
    pub initialized_at: DateTime<Utc>,
}

/// Port for seeding the sub-category catalog.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubCategorySeedRepository: Send + Sync {
    /// Read the initialisation flag, if it has ever been written.
    async fn load_flag(&self) -> Result<Option<InitializationFlag>, SubCategorySeedRepositoryError>;

    /// Atomically claim the flag and, if it is not yet set, replace every
    /// sub-category with `request.records` and set the flag.
    async fn reseed(
        &self,
        request: SubCategorySeedRequest,
    ) -> Result<SeedingResult, SubCategorySeedRepositoryError>;
}

/// Fixture implementation that always reports an unseeded store and accepts
/// every reseed.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSubCategorySeedRepository;

#[async_trait]
impl SubCategorySeedRepository for FixtureSubCategorySeedRepository {
    async fn load_flag(&self) -> Result<Option<InitializationFlag>, SubCategorySeedRepositoryError> {
        Ok(None)
    }

    async fn reseed(
        &self,
        _request: SubCategorySeedRequest,
    ) -> Result<SeedingResult, SubCategorySeedRepositoryError> {
        Ok(SeedingResult::Applied)
    }
}
