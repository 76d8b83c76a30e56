//! Priority-fee instruction injection for already built transactions
//!
//! Pool and vault SDK helpers hand back fully constructed transactions, so the
//! compute-unit-price instruction has to be found and rewritten after the
//! fact. Legacy transactions can additionally grow a fee instruction when none
//! exists; versioned transactions are never mutated structurally after
//! compilation (their message layout is fixed), so absence is reported back to
//! the caller instead.

use solana_sdk::{
    compute_budget::{self, ComputeBudgetInstruction},
    instruction::CompiledInstruction,
    message::VersionedMessage,
    pubkey::Pubkey,
    transaction::{Transaction, VersionedTransaction},
};

/// First data byte of a ComputeBudget SetComputeUnitPrice instruction
const SET_COMPUTE_UNIT_PRICE_DISCRIMINANT: u8 = 3;

/// A built transaction in either wire shape, closed over the two variants the
/// cluster accepts so every call site handles both exhaustively.
#[derive(Debug, Clone)]
pub enum PreparedTransaction {
    Legacy(Transaction),
    Versioned(VersionedTransaction),
}

impl PreparedTransaction {
    /// Rewrite the transaction's compute-unit-price instruction in place, or
    /// append one when the transaction is legacy and carries none.
    ///
    /// Returns `true` when the transaction now carries `micro_lamports`;
    /// `false` only for a versioned transaction with no existing fee
    /// instruction, which is left untouched. Re-running with the same value is
    /// a no-op apart from the identical rewrite.
    pub fn set_compute_unit_price(&mut self, micro_lamports: u64) -> bool {
        let fee_ix = ComputeBudgetInstruction::set_compute_unit_price(micro_lamports);

        match self {
            Self::Legacy(tx) => {
                let message = &mut tx.message;
                if rewrite_fee_instruction(
                    &message.account_keys,
                    &mut message.instructions,
                    &fee_ix.data,
                ) {
                    return true;
                }

                // No fee instruction yet: append one. The compute budget
                // program takes no accounts, so the only message surgery is
                // registering its program id as a readonly unsigned key.
                let program_id_index = match message
                    .account_keys
                    .iter()
                    .position(|key| *key == fee_ix.program_id)
                {
                    Some(index) => index,
                    None => {
                        message.account_keys.push(fee_ix.program_id);
                        message.header.num_readonly_unsigned_accounts += 1;
                        message.account_keys.len() - 1
                    }
                };
                message.instructions.push(CompiledInstruction {
                    program_id_index: program_id_index as u8,
                    accounts: vec![],
                    data: fee_ix.data,
                });
                true
            }
            Self::Versioned(tx) => match &mut tx.message {
                VersionedMessage::Legacy(message) => rewrite_fee_instruction(
                    &message.account_keys,
                    &mut message.instructions,
                    &fee_ix.data,
                ),
                VersionedMessage::V0(message) => rewrite_fee_instruction(
                    &message.account_keys,
                    &mut message.instructions,
                    &fee_ix.data,
                ),
            },
        }
    }
}

/// Overwrite the payload of the first SetComputeUnitPrice instruction found.
/// Program ids are always static keys, so the lookup never needs address
/// tables even for v0 messages.
fn rewrite_fee_instruction(
    account_keys: &[Pubkey],
    instructions: &mut [CompiledInstruction],
    fee_data: &[u8],
) -> bool {
    for ix in instructions.iter_mut() {
        let Some(program_id) = account_keys.get(ix.program_id_index as usize) else {
            continue;
        };
        if *program_id == compute_budget::id()
            && ix.data.first() == Some(&SET_COMPUTE_UNIT_PRICE_DISCRIMINANT)
        {
            ix.data = fee_data.to_vec();
            return true;
        }
    }
    false
}
