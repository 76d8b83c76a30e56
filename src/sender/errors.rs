//! Error taxonomy for the batching and submission layer
//!
//! Errors fall into two broad classes that drive the resend loop in
//! [`crate::sender::submit`]:
//! - transient network conditions (timeouts, dropped transactions, blockhash
//!   expiry) which are retried up to a fixed ceiling, and
//! - logical rejections (simulation/program errors, oversized transactions)
//!   which are surfaced immediately and never retried.

use solana_client::client_error::{ClientError, ClientErrorKind};
use solana_rpc_client_api::request::RpcError;
use solana_sdk::signer::SignerError;
use solana_sdk::transaction::TransactionError;
use thiserror::Error;

/// Error type covering the batch planning and submission lifecycle
#[derive(Error, Debug)]
pub enum SenderError {
    /// Invalid caller-supplied parameter (e.g. a zero group size)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Failed to fetch a recent blockhash for batch assembly
    #[error("Blockhash fetch failed: {0}")]
    Blockhash(#[source] ClientError),

    /// Failed to sign a batch with the fee payer
    #[error("Signing failed: {0}")]
    Signing(#[from] SignerError),

    /// Simulation reported an on-chain-equivalent error; never retried
    #[error("Simulation failed: {err}")]
    Simulation {
        err: TransactionError,
        logs: Vec<String>,
    },

    /// RPC call failed outside the send/confirm cycle
    #[error("RPC error: {0}")]
    Rpc(#[source] ClientError),

    /// The cluster rejected the transaction with a non-retryable error
    /// (program failure, oversized serialization, invalid state)
    #[error("Transaction rejected: {0}")]
    Rejected(#[source] ClientError),

    /// The send/confirm cycle stayed transient past the resend ceiling
    #[error("Send failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: usize,
        #[source]
        source: ClientError,
    },
}

impl SenderError {
    /// Whether retrying the whole operation might succeed.
    ///
    /// Note this is about the operation as seen by the caller; the per-send
    /// retry decision inside the submit loop uses [`retryable_client_error`]
    /// on the raw client error instead.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Blockhash(_) | Self::Rpc(_) => true,
            Self::Configuration(_)
            | Self::Signing(_)
            | Self::Simulation { .. }
            | Self::Rejected(_)
            | Self::RetriesExhausted { .. } => false,
        }
    }

    /// Error category for metrics and log fields
    pub fn category(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "config",
            Self::Blockhash(_) => "blockhash",
            Self::Signing(_) => "signing",
            Self::Simulation { .. } => "simulation",
            Self::Rpc(_) => "rpc",
            Self::Rejected(_) => "rejected",
            Self::RetriesExhausted { .. } => "retries_exhausted",
        }
    }
}

/// Classify a client error from the send/confirm cycle.
///
/// Returns `true` for transient conditions worth resending the same signed
/// payload: transport failures, confirmation timeouts and blockhash expiry.
/// Preflight and execution program errors (which include "transaction too
/// large" rejections) are terminal.
pub fn retryable_client_error(err: &ClientError) -> bool {
    // A concrete TransactionError, whether from preflight or execution, is
    // terminal unless the cluster simply no longer knows the blockhash.
    if let Some(tx_err) = err.get_transaction_error() {
        return matches!(tx_err, TransactionError::BlockhashNotFound);
    }

    match &err.kind {
        ClientErrorKind::Io(_) | ClientErrorKind::Reqwest(_) => true,
        ClientErrorKind::RpcError(RpcError::ForUser(msg)) => {
            // send_and_confirm surfaces confirmation-window expiry this way
            msg.contains("unable to confirm transaction") || msg.contains("expired")
        }
        ClientErrorKind::RpcError(RpcError::RpcRequestError(_)) => true,
        _ => false,
    }
}
