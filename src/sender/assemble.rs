//! Transaction assembly: one batch of instructions into one unsigned transaction
//!
//! Each assembled transaction carries a freshly built priority-fee instruction
//! ahead of its instruction group, a caller-supplied blockhash snapshot and a
//! designated fee payer. Serialized size is computed up front (signatures
//! still placeholder) purely for operator diagnostics; an oversized batch is
//! not rejected here and only surfaces as a cluster rejection at submission.

use solana_sdk::{
    compute_budget::ComputeBudgetInstruction, hash::Hash, instruction::Instruction,
    message::Message, pubkey::Pubkey, transaction::Transaction,
};
use tracing::{info, warn};

/// One planned transaction: an instruction group compiled against a blockhash
/// snapshot, plus its position in the run for progress reporting.
#[derive(Debug, Clone)]
pub struct TransactionBatch {
    /// 1-based position within the run, logging only
    pub index: usize,
    /// Total number of batches in the run, logging only
    pub total: usize,
    pub tx: Transaction,
    /// Serialized wire size with placeholder signatures, in bytes
    pub serialized_size: usize,
}

/// Build the transaction for one instruction group.
///
/// Exactly one compute-unit-price instruction is prepended; the group's
/// instructions follow in their original order.
pub fn assemble_batch(
    group: Vec<Instruction>,
    blockhash: Hash,
    fee_payer: Pubkey,
    compute_unit_price_micro_lamports: u64,
    index: usize,
    total: usize,
) -> TransactionBatch {
    let mut instructions =
        vec![ComputeBudgetInstruction::set_compute_unit_price(compute_unit_price_micro_lamports)];
    instructions.extend(group);

    let message = Message::new_with_blockhash(&instructions, Some(&fee_payer), &blockhash);
    let tx = Transaction::new_unsigned(message);

    // Placeholder signatures serialize at full width, so this matches the
    // signed wire size.
    let serialized_size = match bincode::serialized_size(&tx) {
        Ok(size) => size as usize,
        Err(err) => {
            warn!(batch = index, error = %err, "Failed to compute serialized transaction size");
            0
        }
    };
    info!(
        batch = index,
        total = total,
        tx_size = serialized_size,
        "Assembled transaction"
    );

    TransactionBatch {
        index,
        total,
        tx,
        serialized_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::{
        compute_budget, instruction::AccountMeta, signature::Keypair, signer::Signer,
    };

    fn opaque_ix(tag: u8) -> Instruction {
        Instruction::new_with_bytes(
            Pubkey::new_unique(),
            &[tag],
            vec![AccountMeta::new(Pubkey::new_unique(), false)],
        )
    }

    #[test]
    fn test_fee_instruction_comes_first() {
        let payer = Keypair::new();
        let batch = assemble_batch(
            vec![opaque_ix(1), opaque_ix(2)],
            Hash::new_unique(),
            payer.pubkey(),
            10_000,
            1,
            1,
        );

        let message = &batch.tx.message;
        assert_eq!(message.instructions.len(), 3);
        let first_program =
            message.account_keys[message.instructions[0].program_id_index as usize];
        assert_eq!(first_program, compute_budget::id());
        assert_eq!(
            message.instructions[0].data,
            ComputeBudgetInstruction::set_compute_unit_price(10_000).data
        );
    }

    #[test]
    fn test_group_order_preserved_after_fee() {
        let payer = Keypair::new();
        let group: Vec<Instruction> = (0..4).map(opaque_ix).collect();
        let batch = assemble_batch(
            group.clone(),
            Hash::new_unique(),
            payer.pubkey(),
            1,
            2,
            3,
        );

        let message = &batch.tx.message;
        for (offset, original) in group.iter().enumerate() {
            let compiled = &message.instructions[offset + 1];
            assert_eq!(compiled.data, original.data);
            assert_eq!(
                message.account_keys[compiled.program_id_index as usize],
                original.program_id
            );
        }
        assert_eq!(batch.index, 2);
        assert_eq!(batch.total, 3);
    }

    #[test]
    fn test_blockhash_and_payer_recorded() {
        let payer = Keypair::new();
        let blockhash = Hash::new_unique();
        let batch = assemble_batch(
            vec![opaque_ix(7)],
            blockhash,
            payer.pubkey(),
            500,
            1,
            1,
        );

        assert_eq!(batch.tx.message.recent_blockhash, blockhash);
        assert_eq!(batch.tx.message.account_keys[0], payer.pubkey());
        assert!(batch.serialized_size > 0);
    }

    #[test]
    fn test_serialized_size_matches_wire_encoding() {
        let payer = Keypair::new();
        let batch = assemble_batch(
            vec![opaque_ix(3)],
            Hash::new_unique(),
            payer.pubkey(),
            42,
            1,
            1,
        );
        let encoded = bincode::serialize(&batch.tx).expect("serialize");
        assert_eq!(batch.serialized_size, encoded.len());
    }
}
