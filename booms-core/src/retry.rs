//! Deadlock-retry wrapper around a pipeline's transactional body
//! (spec.md §5): up to `max_deadlock_retries` attempts with an
//! exponential backoff before surfacing `TransientContended`.

use crate::config::LedgerConfig;
use crate::errors::{BoomsError, BoomsResult};
use std::future::Future;
use tokio::time::sleep;

fn is_serialization_failure(err: &diesel::result::Error) -> bool {
    matches!(
        err,
        diesel::result::Error::DatabaseError(diesel::result::DatabaseErrorKind::SerializationFailure, _)
    )
}

/// Runs `attempt` up to `config.max_deadlock_retries + 1` times,
/// retrying only on a database serialization failure (the class
/// Postgres uses for both deadlocks and serializable-isolation
/// conflicts). Any other error is returned immediately.
pub async fn with_retry<T, F, Fut>(config: &LedgerConfig, mut attempt: F) -> BoomsResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, diesel::result::Error>>,
{
    let mut last_err = None;
    for attempt_number in 0..=config.max_deadlock_retries {
        match attempt().await {
            Ok(value) => return Ok(value),
            Err(err) if is_serialization_failure(&err) => {
                last_err = Some(err);
                if attempt_number < config.max_deadlock_retries {
                    sleep(config.retry_backoff(attempt_number)).await;
                }
            }
            Err(err) => return Err(BoomsError::from(err)),
        }
    }
    let _ = last_err;
    Err(BoomsError::TransientContended)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn succeeds_immediately_when_first_attempt_is_ok() {
        let config = LedgerConfig::default();
        let result: BoomsResult<i32> = with_retry(&config, || async { Ok(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test]
    async fn exhausts_retries_then_reports_contention() {
        let config = LedgerConfig { max_deadlock_retries: 2, ..LedgerConfig::default() };
        let result: BoomsResult<i32> = with_retry(&config, || async {
            Err(diesel::result::Error::DatabaseError(
                diesel::result::DatabaseErrorKind::SerializationFailure,
                Box::new(String::from("deadlock detected")),
            ))
        })
        .await;
        assert_eq!(result, Err(BoomsError::TransientContended));
    }

    #[tokio::test]
    async fn non_contention_errors_short_circuit() {
        let config = LedgerConfig::default();
        let result: BoomsResult<i32> =
            with_retry(&config, || async { Err(diesel::result::Error::NotFound) }).await;
        assert!(matches!(result, Err(BoomsError::Validation(_))));
    }
}
