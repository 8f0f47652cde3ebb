//! Account state definitions

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

/// Escrow account data, one per live (booking id, escort) pair.
///
/// Fixed-width fields come first so the serialized prefix has a stable
/// layout; the two length-prefixed strings follow. Account space is sized
/// exactly for the strings recorded at creation, so `try_from_slice`
/// round-trips against the full data buffer.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct EscrowAccount {
    /// Discriminator for account type
    pub discriminator: [u8; 8],
    /// Client who funded the escrow
    pub client: Pubkey,
    /// Escort entitled to trigger release
    pub escort: Pubkey,
    /// Lamports deposited, excluding the rent reserve
    pub amount: u64,
    /// PDA bump seed, stored so the address can be re-derived later
    pub bump: u8,
    /// Booking identifier, part of the PDA seed material
    pub booking_id: String,
    /// Verification code compared byte-for-byte at release
    pub verify_code: String,
}

impl EscrowAccount {
    pub const DISCRIMINATOR: [u8; 8] = [0x42, 0x4f, 0x4f, 0x4b, 0x45, 0x53, 0x43, 0x52]; // "BOOKESCR"

    pub fn new(
        client: Pubkey,
        escort: Pubkey,
        amount: u64,
        bump: u8,
        booking_id: String,
        verify_code: String,
    ) -> Self {
        Self {
            discriminator: Self::DISCRIMINATOR,
            client,
            escort,
            amount,
            bump,
            booking_id,
            verify_code,
        }
    }

    /// Exact serialized size for the given seed strings
    pub fn space(booking_id: &str, verify_code: &str) -> usize {
        8 + 32 + 32 + 8 + 1 + 4 + booking_id.len() + 4 + verify_code.len()
    }
}

/// Seeds for PDA derivation
pub mod seeds {
    pub const ESCROW_SEED: &[u8] = b"escrow";
}
