//! Submission orchestration: simulate or send assembled batches in order
//!
//! Batches run strictly sequentially; ordering across batches is part of the
//! caller's contract (pool creation must land before liquidity seeding). The
//! first failed batch aborts the run. Previously confirmed batches are not
//! undone, so a multi-batch operation is non-atomic across batches and fatal
//! on first error.

use std::sync::Arc;
use std::time::Duration;

use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    instruction::Instruction,
    signature::{Keypair, Signature},
    signer::Signer,
};
use tracing::{error, info, warn};

use crate::sender::assemble::{assemble_batch, TransactionBatch};
use crate::sender::errors::{retryable_client_error, SenderError};
use crate::sender::plan::plan_batches;

/// Resend ceiling for one batch's send/confirm cycle
pub const DEFAULT_SEND_TX_MAX_RETRIES: usize = 3;

/// Pause between resends of the same signed payload
const RESEND_DELAY: Duration = Duration::from_millis(500);

/// Per-invocation submission settings, built once from the loaded
/// configuration and passed explicitly (no ambient global).
#[derive(Debug, Clone)]
pub struct SendOptions {
    /// Simulate instead of submitting; no chain effect
    pub dry_run: bool,
    /// Priority fee applied uniformly to every batch of the invocation
    pub compute_unit_price_micro_lamports: u64,
    /// Maximum resends of one batch before escalating
    pub max_resends: usize,
}

impl SendOptions {
    pub fn new(dry_run: bool, compute_unit_price_micro_lamports: u64) -> Self {
        Self {
            dry_run,
            compute_unit_price_micro_lamports,
            max_resends: DEFAULT_SEND_TX_MAX_RETRIES,
        }
    }
}

/// Per-batch terminal result
#[derive(Debug)]
pub enum SubmissionOutcome {
    /// Dry run: simulation succeeded, no chain effect
    Simulated { logs: Vec<String> },
    /// Live run: confirmed on chain after `retries` resends
    Confirmed {
        signature: Signature,
        retries: usize,
    },
    /// Terminal failure; aborts any remaining batches
    Failed(SenderError),
}

/// Drives planned instruction batches through simulation or live submission.
///
/// The RPC connection and fee payer are shared read-only across all batches
/// of an invocation.
pub struct TxSender {
    rpc: Arc<RpcClient>,
    options: SendOptions,
}

impl TxSender {
    pub fn new(rpc: Arc<RpcClient>, options: SendOptions) -> Self {
        Self { rpc, options }
    }

    pub fn options(&self) -> &SendOptions {
        &self.options
    }

    /// Plan, assemble and execute `instructions` as batches of
    /// `instructions_per_tx`, in order, fail-fast.
    ///
    /// Each batch gets a fresh blockhash at assembly time. Returns the
    /// per-batch outcomes on success; the first failure is returned as an
    /// error after its diagnostics are logged, and no later batch is touched.
    pub async fn send_instructions(
        &self,
        instructions: Vec<Instruction>,
        instructions_per_tx: usize,
        payer: &Keypair,
        label: &str,
    ) -> Result<Vec<SubmissionOutcome>, SenderError> {
        let groups = plan_batches(instructions, instructions_per_tx)?;
        let total = groups.len();
        let mut outcomes = Vec::with_capacity(total);

        for (i, group) in groups.into_iter().enumerate() {
            let blockhash = self
                .rpc
                .get_latest_blockhash()
                .await
                .map_err(SenderError::Blockhash)?;
            let batch = assemble_batch(
                group,
                blockhash,
                payer.pubkey(),
                self.options.compute_unit_price_micro_lamports,
                i + 1,
                total,
            );

            match self.submit(batch, payer, label).await {
                SubmissionOutcome::Failed(err) => {
                    error!(
                        batch = i + 1,
                        total = total,
                        label = label,
                        category = err.category(),
                        error = %err,
                        "Batch failed, aborting remaining batches"
                    );
                    return Err(err);
                }
                outcome => outcomes.push(outcome),
            }
        }

        Ok(outcomes)
    }

    /// Execute one assembled batch to its terminal outcome.
    pub async fn submit(
        &self,
        mut batch: TransactionBatch,
        payer: &Keypair,
        label: &str,
    ) -> SubmissionOutcome {
        let blockhash = batch.tx.message.recent_blockhash;
        if let Err(err) = batch.tx.try_sign(&[payer], blockhash) {
            return SubmissionOutcome::Failed(SenderError::Signing(err));
        }

        if self.options.dry_run {
            self.simulate(&batch, label).await
        } else {
            self.send_and_confirm(&batch, label).await
        }
    }

    /// Dry run: surface any on-chain-equivalent error immediately, with its
    /// program log lines. Simulation failures are never retried.
    async fn simulate(&self, batch: &TransactionBatch, label: &str) -> SubmissionOutcome {
        info!(batch = batch.index, total = batch.total, label = label, "Simulating transaction");

        let response = match self.rpc.simulate_transaction(&batch.tx).await {
            Ok(response) => response,
            Err(err) => return SubmissionOutcome::Failed(SenderError::Rpc(err)),
        };

        let result = response.value;
        let logs = result.logs.unwrap_or_default();
        if let Some(err) = result.err {
            error!(
                batch = batch.index,
                label = label,
                error = ?err,
                "Simulate transaction failed"
            );
            for line in &logs {
                error!(batch = batch.index, log = %line, "Simulation log");
            }
            return SubmissionOutcome::Failed(SenderError::Simulation { err, logs });
        }

        info!(batch = batch.index, label = label, "Simulated transaction successfully");
        SubmissionOutcome::Simulated { logs }
    }

    /// Live run: bounded resend loop around send-and-confirm, reusing the
    /// same signed payload. Only transient classes are resent; rejections
    /// (program errors, oversized transactions) are terminal on first sight.
    async fn send_and_confirm(&self, batch: &TransactionBatch, label: &str) -> SubmissionOutcome {
        info!(
            batch = batch.index,
            total = batch.total,
            label = label,
            tx_size = batch.serialized_size,
            "Sending transaction"
        );

        let mut retries = 0usize;
        loop {
            match self.rpc.send_and_confirm_transaction(&batch.tx).await {
                Ok(signature) => {
                    info!(
                        batch = batch.index,
                        label = label,
                        signature = %signature,
                        retries = retries,
                        "Transaction confirmed"
                    );
                    return SubmissionOutcome::Confirmed { signature, retries };
                }
                Err(err) if !retryable_client_error(&err) => {
                    return SubmissionOutcome::Failed(SenderError::Rejected(err));
                }
                Err(err) => {
                    if retries >= self.options.max_resends {
                        return SubmissionOutcome::Failed(SenderError::RetriesExhausted {
                            attempts: retries + 1,
                            source: err,
                        });
                    }
                    retries += 1;
                    warn!(
                        batch = batch.index,
                        label = label,
                        retry = retries,
                        max = self.options.max_resends,
                        error = %err,
                        "Transient send failure, resending"
                    );
                    tokio::time::sleep(RESEND_DELAY).await;
                }
            }
        }
    }
}
