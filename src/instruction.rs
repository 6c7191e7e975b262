//! Instruction payload building and transaction planning
//!
//! The `update_price` payload is a fixed, versionless 20-byte layout agreed
//! out-of-band with the on-chain program:
//!
//! | offset | len | field        | encoding            |
//! |--------|-----|--------------|---------------------|
//! | 0      | 8   | command tag  | opaque fixed bytes  |
//! | 8      | 8   | scaled price | i64 little-endian   |
//! | 16     | 4   | exponent     | i32 little-endian   |
//!
//! Instruction order within a transaction is significant: the ledger honors
//! it, and reordering the compute-budget directives changes observable
//! fee/compute semantics. The fixed order is compute-unit price, compute-unit
//! limit, then the domain instruction.

use num_bigint::BigInt;
use solana_sdk::{
    compute_budget::ComputeBudgetInstruction,
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

use crate::error::EncodingError;

/// Command tag selecting the `update_price` routine on the feed program.
pub const UPDATE_PRICE_TAG: [u8; 8] = [61, 34, 117, 155, 75, 34, 123, 208];

/// Total payload size: 8-byte tag + 8-byte price + 4-byte exponent.
pub const PAYLOAD_LEN: usize = 20;

/// Serialize the command tag, scaled price, and exponent into the fixed
/// payload layout.
///
/// Fails with [`EncodingError::Overflow`] when the scaled price does not fit
/// in a signed 64-bit two's-complement integer. Pure and deterministic.
pub fn build_update_price_data(
    tag: [u8; 8],
    amount: &BigInt,
    exponent: i32,
) -> Result<Vec<u8>, EncodingError> {
    let price = i64::try_from(amount).map_err(|_| EncodingError::Overflow {
        value: amount.to_string(),
    })?;

    let mut data = Vec::with_capacity(PAYLOAD_LEN);
    data.extend_from_slice(&tag);
    data.extend_from_slice(&price.to_le_bytes());
    data.extend_from_slice(&exponent.to_le_bytes());
    Ok(data)
}

/// Build the `update_price` instruction targeting one writable feed account.
pub fn update_price_instruction(program_id: Pubkey, feed: Pubkey, data: Vec<u8>) -> Instruction {
    Instruction {
        program_id,
        accounts: vec![AccountMeta::new(feed, false)],
        data,
    }
}

/// Plan the ordered instruction list for one price update.
///
/// Order is fixed: compute-unit price directive, compute-unit limit
/// directive, then the domain instruction. A zero fee or limit omits that
/// directive. Domain instruction contents are not validated here.
pub fn plan_update_instructions(
    priority_fee: u64,
    cu_limit: u32,
    update_ix: Instruction,
) -> Vec<Instruction> {
    // Maximum: cu_price + cu_limit + update = 3
    let mut instructions = Vec::with_capacity(3);

    if priority_fee > 0 {
        instructions.push(ComputeBudgetInstruction::set_compute_unit_price(
            priority_fee,
        ));
    }
    if cu_limit > 0 {
        instructions.push(ComputeBudgetInstruction::set_compute_unit_limit(cu_limit));
    }
    instructions.push(update_ix);

    instructions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::scale_decimal;
    use num_bigint::BigInt;

    fn payload_price(data: &[u8]) -> i64 {
        i64::from_le_bytes(data[8..16].try_into().unwrap())
    }

    fn payload_exponent(data: &[u8]) -> i32 {
        i32::from_le_bytes(data[16..20].try_into().unwrap())
    }

    #[test]
    fn test_payload_layout() {
        let amount = scale_decimal("123.45", -8).unwrap();
        let data = build_update_price_data(UPDATE_PRICE_TAG, &amount, -8).unwrap();

        assert_eq!(data.len(), PAYLOAD_LEN);
        assert_eq!(&data[0..8], &UPDATE_PRICE_TAG);
        assert_eq!(payload_price(&data), 12_345_000_000);
        assert_eq!(payload_exponent(&data), -8);
    }

    #[test]
    fn test_negative_price_two_complement() {
        let amount = BigInt::from(-42i64);
        let data = build_update_price_data(UPDATE_PRICE_TAG, &amount, -8).unwrap();
        assert_eq!(payload_price(&data), -42);
    }

    #[test]
    fn test_i64_boundaries() {
        let max = BigInt::from(i64::MAX);
        let data = build_update_price_data(UPDATE_PRICE_TAG, &max, -8).unwrap();
        assert_eq!(payload_price(&data), i64::MAX);

        let min = BigInt::from(i64::MIN);
        let data = build_update_price_data(UPDATE_PRICE_TAG, &min, -8).unwrap();
        assert_eq!(payload_price(&data), i64::MIN);
    }

    #[test]
    fn test_overflow_beyond_i64() {
        let too_big = BigInt::from(i64::MAX) + 1;
        let err = build_update_price_data(UPDATE_PRICE_TAG, &too_big, -8).unwrap_err();
        assert!(matches!(err, EncodingError::Overflow { .. }));

        let too_small = BigInt::from(i64::MIN) - 1;
        assert!(build_update_price_data(UPDATE_PRICE_TAG, &too_small, -8).is_err());
    }

    #[test]
    fn test_update_instruction_accounts() {
        let program_id = Pubkey::new_unique();
        let feed = Pubkey::new_unique();
        let data = build_update_price_data(UPDATE_PRICE_TAG, &BigInt::from(1), -8).unwrap();

        let ix = update_price_instruction(program_id, feed, data);
        assert_eq!(ix.program_id, program_id);
        assert_eq!(ix.accounts.len(), 1);
        assert_eq!(ix.accounts[0].pubkey, feed);
        assert!(ix.accounts[0].is_writable);
        assert!(!ix.accounts[0].is_signer);
    }

    #[test]
    fn test_plan_ordering() {
        let program_id = Pubkey::new_unique();
        let update_ix = Instruction::new_with_bytes(
            program_id,
            &[1, 2, 3],
            vec![AccountMeta::new(Pubkey::new_unique(), false)],
        );

        let plan = plan_update_instructions(10_000, 200_000, update_ix);

        assert_eq!(plan.len(), 3);
        assert_eq!(plan[0].program_id, solana_sdk::compute_budget::id());
        assert_eq!(plan[1].program_id, solana_sdk::compute_budget::id());
        assert_eq!(plan[2].program_id, program_id);
        // set_compute_unit_price carries a u64, set_compute_unit_limit a u32;
        // the data lengths distinguish them
        assert!(plan[0].data.len() > plan[1].data.len());
    }

    #[test]
    fn test_plan_skips_zero_directives() {
        let make_ix = || {
            Instruction::new_with_bytes(
                Pubkey::new_unique(),
                &[1],
                vec![AccountMeta::new(Pubkey::new_unique(), false)],
            )
        };

        assert_eq!(plan_update_instructions(0, 0, make_ix()).len(), 1);
        assert_eq!(plan_update_instructions(10_000, 0, make_ix()).len(), 2);
        assert_eq!(plan_update_instructions(0, 200_000, make_ix()).len(), 2);
    }
}
