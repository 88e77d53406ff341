//! Deadline race shared by every remote wait.

use std::future::Future;
use std::time::Duration;

use crate::domain::error::OrchestrationError;

/// Run `operation` against a deadline timer; whichever settles first wins.
///
/// The losing side is dropped on return, so a timed-out operation issues
/// no further calls. Nothing is cancelled on the remote side.
///
/// # Errors
///
/// Returns [`OrchestrationError::Timeout`] when the deadline fires first,
/// otherwise whatever `operation` resolved to.
pub async fn race_deadline<T, F>(deadline: Duration, operation: F) -> Result<T, OrchestrationError>
where
    F: Future<Output = Result<T, OrchestrationError>>,
{
    tokio::select! {
        biased;
        result = operation => result,
        () = tokio::time::sleep(deadline) => Err(OrchestrationError::Timeout { after: deadline }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn fast_operation_wins() {
        let result = race_deadline(Duration::from_secs(1), async { Ok::<_, OrchestrationError>(7) }).await;
        assert_eq!(result.unwrap(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_operation_times_out() {
        let result = race_deadline(Duration::from_millis(50), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok::<_, OrchestrationError>(())
        })
        .await;
        assert!(matches!(result, Err(OrchestrationError::Timeout { after }) if after == Duration::from_millis(50)));
    }
}
