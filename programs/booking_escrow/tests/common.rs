#![allow(dead_code)]
#![allow(deprecated)]

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program_test::{processor, BanksClientError, ProgramTest, ProgramTestContext};
use solana_sdk::system_instruction;
use solana_sdk::{
    instruction::{AccountMeta, Instruction, InstructionError},
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    transaction::{Transaction, TransactionError},
};

use booking_escrow::{
    error::EscrowError,
    instruction::EscrowInstruction,
    state::{seeds, EscrowAccount},
};

// ============================================================================
// TEST PROGRAM ID
// ============================================================================

/// Fixed program ID for testing. Actual deployed program ID is determined by
/// the deployment keypair, not this value.
pub fn test_program_id() -> Pubkey {
    solana_sdk::pubkey!("Escrow11111111111111111111111111111111111111")
}

// ============================================================================
// TEST HARNESS HELPERS
// ============================================================================

/// Helper: Build a ProgramTest instance with booking_escrow registered
pub fn program_test() -> ProgramTest {
    ProgramTest::new(
        "booking_escrow",
        test_program_id(),
        processor!(booking_escrow::processor::Processor::process),
    )
}

/// Helper: Send a transaction with a specific payer and signers
pub async fn send_tx(
    context: &mut ProgramTestContext,
    payer: &Keypair,
    instructions: &[Instruction],
    signers: &[&Keypair],
) {
    let blockhash = context.banks_client.get_latest_blockhash().await.unwrap();
    let mut all_signers = Vec::with_capacity(signers.len() + 1);
    all_signers.push(payer);
    for signer in signers {
        if signer.pubkey() != payer.pubkey() {
            all_signers.push(*signer);
        }
    }

    let tx = Transaction::new_signed_with_payer(
        instructions,
        Some(&payer.pubkey()),
        &all_signers,
        blockhash,
    );
    context.banks_client.process_transaction(tx).await.unwrap();
}

// ============================================================================
// PROGRAM HELPERS
// ============================================================================

/// Helper: Derive the escrow PDA for a (booking id, escort) pair
pub fn derive_escrow_pda(program_id: &Pubkey, booking_id: &str, escort: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[seeds::ESCROW_SEED, booking_id.as_bytes(), escort.as_ref()],
        program_id,
    )
}

/// Helper: Build an InitializeEscrow instruction
pub fn initialize_escrow_ix(
    program_id: Pubkey,
    booking_id: &str,
    verify_code: &str,
    amount: u64,
    client: Pubkey,
    escort: Pubkey,
) -> Instruction {
    let (escrow_pda, _bump) = derive_escrow_pda(&program_id, booking_id, &escort);

    Instruction {
        program_id,
        accounts: vec![
            AccountMeta::new(escrow_pda, false),
            AccountMeta::new(client, true),
            AccountMeta::new_readonly(escort, false),
            AccountMeta::new_readonly(solana_sdk::system_program::id(), false),
        ],
        data: EscrowInstruction::InitializeEscrow {
            booking_id: booking_id.to_string(),
            verify_code: verify_code.to_string(),
            amount,
        }
        .try_to_vec()
        .unwrap(),
    }
}

/// Helper: Build a ReleaseEscrow instruction
pub fn release_escrow_ix(
    program_id: Pubkey,
    verify_code: &str,
    escrow_pda: Pubkey,
    signer: Pubkey,
    recipient: Pubkey,
) -> Instruction {
    Instruction {
        program_id,
        accounts: vec![
            AccountMeta::new(escrow_pda, false),
            AccountMeta::new_readonly(signer, true),
            AccountMeta::new(recipient, false),
            AccountMeta::new_readonly(solana_sdk::system_program::id(), false),
        ],
        data: EscrowInstruction::ReleaseEscrow {
            verify_code: verify_code.to_string(),
        }
        .try_to_vec()
        .unwrap(),
    }
}

/// Helper: Read escrow state from account data
pub fn read_escrow(account: &solana_sdk::account::Account) -> EscrowAccount {
    EscrowAccount::try_from_slice(&account.data).unwrap()
}

/// Helper: Read a wallet's lamport balance
pub async fn get_lamports(context: &mut ProgramTestContext, address: Pubkey) -> u64 {
    context.banks_client.get_balance(address).await.unwrap()
}

/// Helper: Rent-exempt minimum for an escrow account with these seed strings
pub async fn escrow_rent(
    context: &mut ProgramTestContext,
    booking_id: &str,
    verify_code: &str,
) -> u64 {
    let rent = context.banks_client.get_rent().await.unwrap();
    rent.minimum_balance(EscrowAccount::space(booking_id, verify_code))
}

// ============================================================================
// TEST ENVIRONMENT
// ============================================================================

/// Test environment with a funded client and escort
pub struct TestEnv {
    pub program_id: Pubkey,
    pub client: Keypair,
    pub escort: Keypair,
}

/// Helper: Create a baseline environment used by most tests
pub async fn setup_basic_env(context: &mut ProgramTestContext) -> TestEnv {
    let payer = context.payer.insecure_clone();
    let payer_pubkey = payer.pubkey();
    let program_id = test_program_id();
    let client = Keypair::new();
    let escort = Keypair::new();

    // Fund client and escort
    let fund_client =
        system_instruction::transfer(&payer_pubkey, &client.pubkey(), 2_000_000_000);
    let fund_escort =
        system_instruction::transfer(&payer_pubkey, &escort.pubkey(), 2_000_000_000);
    send_tx(context, &payer, &[fund_client, fund_escort], &[]).await;

    TestEnv {
        program_id,
        client,
        escort,
    }
}

// ============================================================================
// BOOKING ID HELPERS
// ============================================================================

/// Helper: Generate a random booking id within the seed-length limit
pub fn generate_booking_id() -> String {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    (0..12).map(|_| rng.gen_range(b'a'..=b'z') as char).collect()
}

// ============================================================================
// ERROR CHECKING HELPERS
// ============================================================================

/// Helper: Assert that a transaction failed with the given program error
pub fn assert_escrow_error(result: Result<(), BanksClientError>, expected: EscrowError) {
    let err = result.expect_err("transaction should have failed").unwrap();
    assert_eq!(
        err,
        TransactionError::InstructionError(0, InstructionError::Custom(expected as u32))
    );
}
