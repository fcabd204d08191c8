//! Reasons a query can be aborted.

use stepwise_core::error::ProviderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Model returned non-JSON response {attempts} times in a row (last: {last})")]
    TooManyDecodeFailures { attempts: u32, last: String },

    #[error("Model broke the reply protocol {attempts} times in a row (last: {last})")]
    TooManyProtocolErrors { attempts: u32, last: String },
}
