//! Operator tooling for launching liquidity pools and alpha vaults
//!
//! Pool and vault creation routines assemble flat instruction lists; this
//! library batches them into transactions, injects priority fees, and
//! simulates or submits them with bounded retries. Configuration loading,
//! keypair handling and merkle proof publication round out the operator
//! surface.

pub mod config;
pub mod sender;
pub mod uploader;
pub mod wallet;

pub use config::LaunchConfig;
pub use sender::{
    PreparedTransaction, SendOptions, SenderError, SubmissionOutcome, TxSender,
};

// Re-export commonly used types
pub use solana_sdk::{pubkey::Pubkey, signature::Signature};
