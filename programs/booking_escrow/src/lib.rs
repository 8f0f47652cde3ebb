//! Booking Escrow Program (Native Solana)
//!
//! This program holds a client's booking payment in escrow on Solana.
//! The deposit lives at a PDA derived from the booking id and the escort's
//! address, and is released to the escort when the presented verification
//! code matches the one recorded at deposit time.

pub mod error;
pub mod instruction;
pub mod processor;
pub mod state;

#[cfg(not(feature = "no-entrypoint"))]
mod entrypoint;

pub use solana_program;

// Re-export for tests
pub use error::EscrowError;
pub use instruction::EscrowInstruction;
pub use state::EscrowAccount;

/// Longest booking id accepted as PDA seed material, in bytes
pub const MAX_BOOKING_ID_LEN: usize = 32;

/// Longest verification code stored in an escrow account, in bytes
pub const MAX_VERIFY_CODE_LEN: usize = 6;
