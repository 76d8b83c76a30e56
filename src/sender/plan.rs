//! Batch planning: slice an ordered instruction list into transaction-sized groups
//!
//! The group size is chosen by the caller from its known per-instruction size
//! budget for the specific operation. This layer never recomputes serialized
//! sizes during planning; an overly optimistic group size is only discovered
//! at submission time as a cluster rejection.

use solana_sdk::instruction::Instruction;

use crate::sender::errors::SenderError;

/// Partition `instructions` into contiguous groups of at most
/// `instructions_per_tx`, preserving order.
///
/// Produces `ceil(n / instructions_per_tx)` groups; the last group may be
/// shorter. An empty input yields zero groups. No instruction is duplicated,
/// dropped or reordered.
pub fn plan_batches(
    instructions: Vec<Instruction>,
    instructions_per_tx: usize,
) -> Result<Vec<Vec<Instruction>>, SenderError> {
    if instructions_per_tx == 0 {
        return Err(SenderError::Configuration(
            "instructions_per_tx must be greater than zero".to_string(),
        ));
    }

    let mut groups = Vec::with_capacity(instructions.len().div_ceil(instructions_per_tx));
    let mut group = Vec::with_capacity(instructions_per_tx.min(instructions.len()));
    for ix in instructions {
        group.push(ix);
        if group.len() == instructions_per_tx {
            groups.push(std::mem::take(&mut group));
        }
    }
    if !group.is_empty() {
        groups.push(group);
    }

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::{instruction::AccountMeta, pubkey::Pubkey};

    fn opaque_ix(tag: u8) -> Instruction {
        Instruction::new_with_bytes(
            Pubkey::new_unique(),
            &[tag],
            vec![AccountMeta::new(Pubkey::new_unique(), false)],
        )
    }

    #[test]
    fn test_plan_empty_yields_zero_groups() {
        let groups = plan_batches(vec![], 10).expect("empty plan");
        assert!(groups.is_empty());
    }

    #[test]
    fn test_plan_zero_group_size_rejected() {
        let result = plan_batches(vec![opaque_ix(1)], 0);
        assert!(matches!(result, Err(SenderError::Configuration(_))));
    }

    #[test]
    fn test_plan_25_by_10_yields_10_10_5() {
        let instructions: Vec<Instruction> = (0..25).map(opaque_ix).collect();
        let groups = plan_batches(instructions, 10).expect("plan");

        let sizes: Vec<usize> = groups.iter().map(|g| g.len()).collect();
        assert_eq!(sizes, vec![10, 10, 5]);
    }

    #[test]
    fn test_plan_preserves_order_and_content() {
        let instructions: Vec<Instruction> = (0..23).map(opaque_ix).collect();
        let groups = plan_batches(instructions.clone(), 7).expect("plan");

        let flattened: Vec<Instruction> = groups.into_iter().flatten().collect();
        assert_eq!(flattened, instructions);
    }

    #[test]
    fn test_plan_exact_multiple() {
        let instructions: Vec<Instruction> = (0..20).map(opaque_ix).collect();
        let groups = plan_batches(instructions, 5).expect("plan");
        assert_eq!(groups.len(), 4);
        assert!(groups.iter().all(|g| g.len() == 5));
    }

    #[test]
    fn test_plan_group_larger_than_input() {
        let instructions: Vec<Instruction> = (0..3).map(opaque_ix).collect();
        let groups = plan_batches(instructions, 10).expect("plan");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 3);
    }
}
