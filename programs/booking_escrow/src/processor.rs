//! Instruction processing

#![allow(deprecated)] // system_instruction deprecation - will migrate when solana_system_interface is stable

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program::{invoke, invoke_signed},
    program_error::ProgramError,
    pubkey::Pubkey,
    rent::Rent,
    system_instruction,
    sysvar::Sysvar,
};

use crate::{
    error::EscrowError,
    instruction::EscrowInstruction,
    state::{seeds, EscrowAccount},
    MAX_BOOKING_ID_LEN, MAX_VERIFY_CODE_LEN,
};

pub struct Processor;

impl Processor {
    pub fn process(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        instruction_data: &[u8],
    ) -> ProgramResult {
        let instruction = EscrowInstruction::try_from_slice(instruction_data)
            .map_err(|_| EscrowError::InvalidInstructionData)?;

        match instruction {
            EscrowInstruction::InitializeEscrow {
                booking_id,
                verify_code,
                amount,
            } => {
                msg!("Instruction: InitializeEscrow");
                Self::process_initialize_escrow(
                    program_id,
                    accounts,
                    booking_id,
                    verify_code,
                    amount,
                )
            }
            EscrowInstruction::ReleaseEscrow { verify_code } => {
                msg!("Instruction: ReleaseEscrow");
                Self::process_release_escrow(program_id, accounts, verify_code)
            }
        }
    }

    fn process_initialize_escrow(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        booking_id: String,
        verify_code: String,
        amount: u64,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let escrow_account = next_account_info(account_info_iter)?;
        let client = next_account_info(account_info_iter)?;
        let escort = next_account_info(account_info_iter)?;
        let system_program = next_account_info(account_info_iter)?;

        // Validate inputs
        if booking_id.is_empty() || booking_id.len() > MAX_BOOKING_ID_LEN {
            return Err(EscrowError::InvalidInput.into());
        }
        if verify_code.is_empty() || verify_code.len() > MAX_VERIFY_CODE_LEN {
            return Err(EscrowError::InvalidInput.into());
        }
        if amount == 0 {
            return Err(EscrowError::InvalidInput.into());
        }
        if !client.is_signer {
            return Err(ProgramError::MissingRequiredSignature);
        }

        // Derive escrow PDA
        let (escrow_pda, bump) = Pubkey::find_program_address(
            &[seeds::ESCROW_SEED, booking_id.as_bytes(), escort.key.as_ref()],
            program_id,
        );
        if escrow_pda != *escrow_account.key {
            return Err(EscrowError::InvalidPda.into());
        }

        // One live escrow per (booking id, escort): the PDA must be vacant
        if !escrow_account.data_is_empty() || escrow_account.lamports() > 0 {
            return Err(EscrowError::DuplicateBooking.into());
        }

        // Client pays the deposit plus the rent reserve
        let rent = Rent::get()?;
        let space = EscrowAccount::space(&booking_id, &verify_code);
        let rent_lamports = rent.minimum_balance(space);
        let required = amount
            .checked_add(rent_lamports)
            .ok_or(ProgramError::ArithmeticOverflow)?;
        if client.lamports() < required {
            return Err(EscrowError::InsufficientFunds.into());
        }

        // Create the escrow account at the PDA
        invoke_signed(
            &system_instruction::create_account(
                client.key,
                escrow_account.key,
                rent_lamports,
                space as u64,
                program_id,
            ),
            &[
                client.clone(),
                escrow_account.clone(),
                system_program.clone(),
            ],
            &[&[
                seeds::ESCROW_SEED,
                booking_id.as_bytes(),
                escort.key.as_ref(),
                &[bump],
            ]],
        )?;

        // Move the deposit from the client into the escrow account
        invoke(
            &system_instruction::transfer(client.key, escrow_account.key, amount),
            &[
                client.clone(),
                escrow_account.clone(),
                system_program.clone(),
            ],
        )?;

        // Record the booking
        let escrow = EscrowAccount::new(
            *client.key,
            *escort.key,
            amount,
            bump,
            booking_id,
            verify_code,
        );
        escrow.serialize(&mut &mut escrow_account.data.borrow_mut()[..])?;

        msg!(
            "Escrow created: booking_id={}, escort={}, amount={}",
            escrow.booking_id,
            escrow.escort,
            amount
        );
        Ok(())
    }

    fn process_release_escrow(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        verify_code: String,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let escrow_account = next_account_info(account_info_iter)?;
        let signer = next_account_info(account_info_iter)?;
        let recipient = next_account_info(account_info_iter)?;
        let _system_program = next_account_info(account_info_iter)?;

        // A vacant PDA means the booking was never funded or already released
        if escrow_account.data_is_empty() {
            return Err(EscrowError::EscrowNotFound.into());
        }
        if escrow_account.owner != program_id {
            return Err(EscrowError::InvalidAccountOwner.into());
        }
        {
            let data = escrow_account.data.borrow();
            if data.len() < 8 || data[..8] != EscrowAccount::DISCRIMINATOR {
                return Err(EscrowError::EscrowNotFound.into());
            }
        }
        let escrow = EscrowAccount::try_from_slice(&escrow_account.data.borrow())?;

        // The stored seeds and bump must reproduce this account's address
        let expected_pda = Pubkey::create_program_address(
            &[
                seeds::ESCROW_SEED,
                escrow.booking_id.as_bytes(),
                escrow.escort.as_ref(),
                &[escrow.bump],
            ],
            program_id,
        )
        .map_err(|_| EscrowError::InvalidPda)?;
        if expected_pda != *escrow_account.key {
            return Err(EscrowError::InvalidPda.into());
        }

        // Only the recorded escort may trigger release
        if !signer.is_signer {
            return Err(ProgramError::MissingRequiredSignature);
        }
        if escrow.escort != *signer.key {
            return Err(EscrowError::Unauthorized.into());
        }

        // Funds settle to the escort; the designated recipient must match
        if escrow.escort != *recipient.key {
            return Err(EscrowError::InvalidInput.into());
        }

        // Byte-for-byte comparison, case-sensitive, no normalization
        if escrow.verify_code != verify_code {
            return Err(EscrowError::CodeMismatch.into());
        }

        // Pay out the full balance (deposit plus rent reserve) and close the
        // account; the runtime reaps it once lamports hit zero
        let payout = escrow_account.lamports();
        let recipient_lamports = recipient
            .lamports()
            .checked_add(payout)
            .ok_or(ProgramError::ArithmeticOverflow)?;
        **recipient.try_borrow_mut_lamports()? = recipient_lamports;
        **escrow_account.try_borrow_mut_lamports()? = 0;
        escrow_account.data.borrow_mut().fill(0);

        msg!(
            "Escrow released: booking_id={}, escort={}, amount={}",
            escrow.booking_id,
            escrow.escort,
            escrow.amount
        );
        Ok(())
    }
}
