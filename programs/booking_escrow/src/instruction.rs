//! Instruction definitions

use borsh::{BorshDeserialize, BorshSerialize};

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone)]
pub enum EscrowInstruction {
    /// Create the escrow account for a booking and deposit the payment
    ///
    /// Accounts expected:
    /// 0. `[writable]` Escrow account (PDA of "escrow", booking id, escort)
    /// 1. `[writable, signer]` Client (funds the deposit and the rent)
    /// 2. `[]` Escort
    /// 3. `[]` System program
    InitializeEscrow {
        booking_id: String,
        verify_code: String,
        amount: u64,
    },

    /// Release the held payment to the escort and close the account
    ///
    /// Accounts expected:
    /// 0. `[writable]` Escrow account (PDA)
    /// 1. `[signer]` Signer (must equal the stored escort)
    /// 2. `[writable]` Recipient (must equal the stored escort)
    /// 3. `[]` System program
    ReleaseEscrow { verify_code: String },
}
