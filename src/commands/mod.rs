pub mod insights;
pub mod mood;
pub mod settings;
pub mod storage;

use std::future::Future;
use std::time::Duration;

use crate::errors::{PipelineError, PipelineResult};

/// Budget used when `VoiceSettings::timeout_secs` is zero.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn with_timeout<T, F>(budget: Duration, fut: F) -> PipelineResult<T>
where
    F: Future<Output = PipelineResult<T>>,
{
    match tokio::time::timeout(budget, fut).await {
        Ok(result) => result,
        Err(_) => {
            log::warn!("[Commands] Gave up after {:?}", budget);
            Err(PipelineError::Timeout(budget))
        }
    }
}
