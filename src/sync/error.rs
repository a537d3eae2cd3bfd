use thiserror::Error;

use crate::immich::error::ApiError;

/// Errors that abort a single reconciliation cycle.
///
/// None of these stop the scheduler: the failed cycle is logged and the next
/// one starts fresh after the configured interval.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("failed to fetch the person roster")]
    Roster(#[source] ApiError),

    #[error("no person named '{0}' exists on the server")]
    PersonNotFound(String),

    #[error("all {0} asset searches failed")]
    AllQueriesFailed(usize),

    #[error("failed to fetch members of album {album_id}")]
    MembershipFetch {
        album_id: String,
        #[source]
        source: ApiError,
    },

    #[error("failed to add {count} assets to album {album_id}")]
    Mutation {
        album_id: String,
        count: usize,
        #[source]
        source: ApiError,
    },
}
