//! Timeout utilities for page operations
//!
//! Bounds navigation and content retrieval so a hung page ends its own task
//! instead of stalling the batch.

use std::future::Future;
use std::time::Duration;

use crate::errors::{HarvestError, HarvestResult};

/// Run a page operation with an explicit timeout
///
/// # Arguments
/// * `operation` - The async operation to execute
/// * `timeout` - Upper bound for the operation
/// * `operation_name` - Human-readable name for error messages
///
/// # Returns
/// * `Ok(T)` - Operation completed successfully
/// * `Err(HarvestError::OperationTimeout)` - The timeout was reached
/// * `Err(_)` - The operation itself failed
pub async fn with_page_timeout<F, T>(
    operation: F,
    timeout: Duration,
    operation_name: &str,
) -> HarvestResult<T>
where
    F: Future<Output = HarvestResult<T>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(HarvestError::OperationTimeout {
            operation: operation_name.to_string(),
            timeout,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_times_out() {
        let result: HarvestResult<()> = with_page_timeout(
            async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            },
            Duration::from_secs(1),
            "navigation",
        )
        .await;

        assert!(matches!(
            result,
            Err(HarvestError::OperationTimeout { ref operation, timeout })
                if operation == "navigation" && timeout == Duration::from_secs(1)
        ));
    }

    #[tokio::test]
    async fn test_passes_through_result() {
        let ok = with_page_timeout(async { Ok(7) }, Duration::from_secs(1), "content").await;
        assert_eq!(ok.ok(), Some(7));

        let err: HarvestResult<u8> = with_page_timeout(
            async { Err(HarvestError::Browser("gone".to_string())) },
            Duration::from_secs(1),
            "content",
        )
        .await;
        assert!(matches!(err, Err(HarvestError::Browser(_))));
    }
}
