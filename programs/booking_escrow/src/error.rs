//! Error types

use solana_program::program_error::ProgramError;
use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum EscrowError {
    #[error("Booking id, verify code or amount outside accepted bounds")]
    InvalidInput,

    #[error("Escrow already exists for this booking and escort")]
    DuplicateBooking,

    #[error("Client cannot cover the deposit and rent")]
    InsufficientFunds,

    #[error("No live escrow for this booking and escort")]
    EscrowNotFound,

    #[error("Signer is not the escort recorded in the escrow")]
    Unauthorized,

    #[error("Verification code does not match")]
    CodeMismatch,

    #[error("Invalid instruction data")]
    InvalidInstructionData,

    #[error("Invalid PDA")]
    InvalidPda,

    #[error("Invalid account owner")]
    InvalidAccountOwner,
}

impl From<EscrowError> for ProgramError {
    fn from(e: EscrowError) -> Self {
        ProgramError::Custom(e as u32)
    }
}
