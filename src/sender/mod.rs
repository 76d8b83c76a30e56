//! Transaction batching and submission layer
//!
//! Pool and vault creation routines produce flat lists of instructions that
//! rarely fit into a single transaction. This module turns such a list into
//! correctly sized, atomically applied transactions and drives them through
//! simulation or live submission:
//!
//! - **plan**: partition an ordered instruction list into fixed-size groups
//! - **assemble**: build one transaction per group with a fresh blockhash and
//!   a priority-fee instruction up front
//! - **fee**: rewrite (or append) the compute-unit-price instruction of an
//!   already built transaction, legacy or versioned
//! - **submit**: sequential simulate-or-send orchestration with bounded
//!   resends and fail-fast semantics across batches
//! - **errors**: error taxonomy with retryability classification
//!
//! Batches are executed strictly in planning order. Ordering across batches is
//! caller-significant (e.g. pool creation before liquidity seeding), so the
//! first failed batch aborts the remainder of the run.

pub mod assemble;
pub mod errors;
pub mod fee;
pub mod plan;
pub mod submit;

pub use assemble::{assemble_batch, TransactionBatch};
pub use errors::{retryable_client_error, SenderError};
pub use fee::PreparedTransaction;
pub use plan::plan_batches;
pub use submit::{SendOptions, SubmissionOutcome, TxSender, DEFAULT_SEND_TX_MAX_RETRIES};
