use borsh::{BorshDeserialize, BorshSerialize};
use booking_escrow::{
    instruction::EscrowInstruction,
    state::{seeds, EscrowAccount},
};
use booking_escrow_cli::{parse_options, parse_u64, required_option};
use solana_client::rpc_client::RpcClient;
use solana_sdk::{
    instruction::{AccountMeta, Instruction},
    native_token::LAMPORTS_PER_SOL,
    pubkey::Pubkey,
    signature::{read_keypair_file, Keypair, Signer},
    transaction::Transaction,
};
use std::{collections::HashMap, env, error::Error, str::FromStr};

// ============================================================================
// CLI ENTRYPOINT
// ============================================================================

fn main() {
    if let Err(error) = run() {
        eprintln!("[booking_escrow_cli] Error: {error}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = env::args().skip(1).collect();
    if args.is_empty() {
        print_usage();
        return Ok(());
    }

    let command = args[0].as_str();
    let options = parse_options(&args[1..])?;

    let rpc_url = options
        .get("rpc")
        .cloned()
        .unwrap_or_else(|| "http://localhost:8899".to_string());
    let client = RpcClient::new(rpc_url);

    // Commands that don't require program-id
    if command == "get-balance" {
        return handle_get_balance(&client, &options);
    }

    // All other commands require program-id
    let program_id = match options.get("program-id") {
        Some(value) => parse_pubkey(value)?,
        None => {
            eprintln!("Error: --program-id is required for '{}'", command);
            print_usage();
            std::process::exit(1);
        }
    };

    match command {
        "initialize" => handle_initialize(&client, &options, program_id),
        "release" => handle_release(&client, &options, program_id),
        "show-escrow" => handle_show_escrow(&client, &options, program_id),
        _ => {
            print_usage();
            Ok(())
        }
    }
}

// ============================================================================
// COMMAND HANDLERS
// ============================================================================

fn handle_get_balance(
    client: &RpcClient,
    options: &HashMap<String, String>,
) -> Result<(), Box<dyn Error>> {
    let address = match options.get("keypair") {
        Some(path) => read_keypair_file(path)?.pubkey(),
        None => parse_pubkey(required_option(options, "address")?)?,
    };

    let balance = client.get_balance(&address)?;
    println!("Address: {address}");
    println!("Balance: {} SOL", balance as f64 / LAMPORTS_PER_SOL as f64);
    Ok(())
}

fn handle_initialize(
    client: &RpcClient,
    options: &HashMap<String, String>,
    program_id: Pubkey,
) -> Result<(), Box<dyn Error>> {
    let client_keypair = read_keypair(options, "keypair")?;
    let escort = parse_pubkey(required_option(options, "escort")?)?;
    let booking_id = required_option(options, "booking-id")?;
    let verify_code = required_option(options, "verify-code")?;
    let amount = parse_u64(required_option(options, "amount")?)?;

    let ix = build_initialize_ix(
        program_id,
        booking_id,
        verify_code,
        amount,
        client_keypair.pubkey(),
        escort,
    )?;

    let signature = send_tx(client, &[ix], &client_keypair, &[])?;
    let (escrow_pda, _) = derive_escrow_pda(&program_id, booking_id, &escort);

    println!("Initialize signature: {signature}");
    println!("Escrow PDA: {escrow_pda}");
    Ok(())
}

fn handle_release(
    client: &RpcClient,
    options: &HashMap<String, String>,
    program_id: Pubkey,
) -> Result<(), Box<dyn Error>> {
    let escort_keypair = read_keypair(options, "keypair")?;
    let booking_id = required_option(options, "booking-id")?;
    let verify_code = required_option(options, "verify-code")?;
    let recipient = options
        .get("recipient")
        .map(|value| parse_pubkey(value))
        .transpose()?
        .unwrap_or_else(|| escort_keypair.pubkey());

    let (escrow_pda, _) = derive_escrow_pda(&program_id, booking_id, &escort_keypair.pubkey());
    let ix = build_release_ix(
        program_id,
        verify_code,
        escrow_pda,
        escort_keypair.pubkey(),
        recipient,
    )?;

    let signature = send_tx(client, &[ix], &escort_keypair, &[])?;
    println!("Release signature: {signature}");
    Ok(())
}

fn handle_show_escrow(
    client: &RpcClient,
    options: &HashMap<String, String>,
    program_id: Pubkey,
) -> Result<(), Box<dyn Error>> {
    let escort = parse_pubkey(required_option(options, "escort")?)?;
    let booking_id = required_option(options, "booking-id")?;

    let (escrow_pda, _) = derive_escrow_pda(&program_id, booking_id, &escort);
    println!("Escrow PDA: {escrow_pda}");

    let account = match client.get_account(&escrow_pda) {
        Ok(account) => account,
        Err(_) => {
            println!("No live escrow for this booking and escort");
            return Ok(());
        }
    };
    let escrow = EscrowAccount::try_from_slice(&account.data)?;

    println!("Booking id: {}", escrow.booking_id);
    println!("Client: {}", escrow.client);
    println!("Escort: {}", escrow.escort);
    println!("Amount: {}", escrow.amount);
    println!("Account balance: {}", account.lamports);
    Ok(())
}

// ============================================================================
// INSTRUCTION BUILDERS
// ============================================================================

fn derive_escrow_pda(program_id: &Pubkey, booking_id: &str, escort: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[seeds::ESCROW_SEED, booking_id.as_bytes(), escort.as_ref()],
        program_id,
    )
}

fn build_initialize_ix(
    program_id: Pubkey,
    booking_id: &str,
    verify_code: &str,
    amount: u64,
    client: Pubkey,
    escort: Pubkey,
) -> Result<Instruction, Box<dyn Error>> {
    let (escrow_pda, _bump) = derive_escrow_pda(&program_id, booking_id, &escort);

    Ok(Instruction {
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
        .try_to_vec()?,
    })
}

fn build_release_ix(
    program_id: Pubkey,
    verify_code: &str,
    escrow_pda: Pubkey,
    signer: Pubkey,
    recipient: Pubkey,
) -> Result<Instruction, Box<dyn Error>> {
    Ok(Instruction {
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
        .try_to_vec()?,
    })
}

// ============================================================================
// TRANSACTION HELPERS
// ============================================================================

fn send_tx(
    client: &RpcClient,
    instructions: &[Instruction],
    payer: &Keypair,
    signers: &[&Keypair],
) -> Result<solana_sdk::signature::Signature, Box<dyn Error>> {
    let blockhash = client.get_latest_blockhash()?;
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
    let signature = client.send_and_confirm_transaction(&tx)?;
    Ok(signature)
}

// ============================================================================
// LOCAL HELPERS
// ============================================================================

fn read_keypair(
    options: &HashMap<String, String>,
    key: &str,
) -> Result<Keypair, Box<dyn Error>> {
    let path = required_option(options, key)?;
    Ok(read_keypair_file(path)?)
}

fn parse_pubkey(value: &str) -> Result<Pubkey, Box<dyn Error>> {
    Ok(Pubkey::from_str(value)?)
}

// ============================================================================
// USAGE
// ============================================================================

fn print_usage() {
    eprintln!(
        r#"Booking Escrow CLI

Usage:
  booking_escrow_cli <command> [--option value]...

Commands:
  get-balance   --keypair <file> | --address <pubkey> [--rpc <url>]
  initialize    --program-id <pubkey> --keypair <client-keyfile> --escort <pubkey>
                --booking-id <string> --verify-code <string> --amount <lamports> [--rpc <url>]
  release       --program-id <pubkey> --keypair <escort-keyfile> --booking-id <string>
                --verify-code <string> [--recipient <pubkey>] [--rpc <url>]
  show-escrow   --program-id <pubkey> --escort <pubkey> --booking-id <string> [--rpc <url>]
        "#
    );
}
