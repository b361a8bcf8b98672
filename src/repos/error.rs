/*
 * Responsibility
 * - What the repos report upward
 * - Callers decide how to collapse these (authorization treats every variant as a denial)
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
    #[error("not found")]
    NotFound,
}

pub type RepoResult<T> = Result<T, RepoError>;
