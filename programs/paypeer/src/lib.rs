#![cfg_attr(not(test), warn(unexpected_cfgs))]

use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

pub mod curve;

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

pub const DEFAULT_FEE_BPS: u64 = 30;
pub const MAX_FEE_BPS: u64 = 1_000;
pub const LP_DECIMALS: u8 = 6;

pub mod helpers {
    use super::*;

    pub fn deposit_from_user<'info>(
        amount: u64,
        from: &Account<'info, TokenAccount>,
        to: &Account<'info, TokenAccount>,
        owner: &Signer<'info>,
        token_program: &Program<'info, Token>,
    ) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        require!(from.amount >= amount, ErrorCode::NoFunds);
        anchor_spl::token::transfer(
            CpiContext::new(
                token_program.to_account_info(),
                anchor_spl::token::Transfer {
                    from: from.to_account_info(),
                    to: to.to_account_info(),
                    authority: owner.to_account_info(),
                },
            ),
            amount,
        )
    }

    pub fn pay_from_vault<'info>(
        amount: u64,
        vault: &Account<'info, TokenAccount>,
        to: &Account<'info, TokenAccount>,
        pool: &Account<'info, Pool>,
        token_program: &Program<'info, Token>,
        seeds: &[&[u8]],
    ) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        anchor_spl::token::transfer(
            CpiContext::new_with_signer(
                token_program.to_account_info(),
                anchor_spl::token::Transfer {
                    from: vault.to_account_info(),
                    to: to.to_account_info(),
                    authority: pool.to_account_info(),
                },
                &[seeds],
            ),
            amount,
        )
    }
}

#[program]
pub mod paypeer {
    use super::*;
    use crate::helpers::{deposit_from_user, pay_from_vault};

    pub fn initialize(ctx: Context<Initialize>) -> Result<()> {
        let config = &mut ctx.accounts.config;
        config.authority = ctx.accounts.authority.key();
        config.fee_recipient = ctx.accounts.authority.key();
        config.default_fee_bps = DEFAULT_FEE_BPS;
        config.pool_count = 0;
        config.bump = ctx.bumps.config;

        msg!("paypeer initialized by {}", config.authority);
        emit!(Initialized {
            authority: config.authority,
            default_fee_bps: config.default_fee_bps,
        });
        Ok(())
    }

    pub fn update_config(
        ctx: Context<UpdateConfig>,
        fee_recipient: Pubkey,
        default_fee_bps: u64,
    ) -> Result<()> {
        require!(default_fee_bps <= MAX_FEE_BPS, ErrorCode::BadFee);
        let config = &mut ctx.accounts.config;
        config.fee_recipient = fee_recipient;
        config.default_fee_bps = default_fee_bps;

        emit!(ConfigUpdated {
            fee_recipient,
            default_fee_bps,
        });
        Ok(())
    }

    pub fn create_pool(ctx: Context<CreatePool>, fee_bps: Option<u64>) -> Result<()> {
        let config = &mut ctx.accounts.config;
        let fee_bps = fee_bps.unwrap_or(config.default_fee_bps);
        require!(fee_bps <= MAX_FEE_BPS, ErrorCode::BadFee);
        config.pool_count = config.pool_count.checked_add(1).ok_or(ErrorCode::Overflow)?;

        let pool = &mut ctx.accounts.pool;
        pool.mint_a = ctx.accounts.mint_a.key();
        pool.mint_b = ctx.accounts.mint_b.key();
        pool.vault_a = ctx.accounts.vault_a.key();
        pool.vault_b = ctx.accounts.vault_b.key();
        pool.lp_mint = ctx.accounts.lp_mint.key();
        pool.fee_bps = fee_bps;
        pool.bump = ctx.bumps.pool;

        msg!("pool {} created: fee_bps={}", pool.key(), fee_bps);
        emit!(PoolCreated {
            pool: pool.key(),
            mint_a: pool.mint_a,
            mint_b: pool.mint_b,
            lp_mint: pool.lp_mint,
            fee_bps,
        });
        Ok(())
    }

    pub fn add_liquidity(
        ctx: Context<AddLiquidity>,
        max_amount_a: u64,
        max_amount_b: u64,
        min_lp_amount: u64,
    ) -> Result<()> {
        require!(max_amount_a > 0 && max_amount_b > 0, ErrorCode::ZeroAmount);

        let deposit = curve::deposit_amounts(
            max_amount_a,
            max_amount_b,
            ctx.accounts.vault_a.amount,
            ctx.accounts.vault_b.amount,
            ctx.accounts.lp_mint.supply,
        )
        .ok_or(ErrorCode::Overflow)?;
        require!(deposit.lp_amount > 0, ErrorCode::ZeroLiquidity);
        require!(deposit.lp_amount >= min_lp_amount, ErrorCode::SlippageExceeded);

        deposit_from_user(
            deposit.amount_a,
            &ctx.accounts.user_token_a,
            &ctx.accounts.vault_a,
            &ctx.accounts.owner,
            &ctx.accounts.token_program,
        )?;
        deposit_from_user(
            deposit.amount_b,
            &ctx.accounts.user_token_b,
            &ctx.accounts.vault_b,
            &ctx.accounts.owner,
            &ctx.accounts.token_program,
        )?;

        let pool = &ctx.accounts.pool;
        let bump = [pool.bump];
        let seeds: &[&[u8]] = &[b"pool", pool.mint_a.as_ref(), pool.mint_b.as_ref(), &bump];
        anchor_spl::token::mint_to(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                anchor_spl::token::MintTo {
                    mint: ctx.accounts.lp_mint.to_account_info(),
                    to: ctx.accounts.user_lp.to_account_info(),
                    authority: pool.to_account_info(),
                },
                &[seeds],
            ),
            deposit.lp_amount,
        )?;

        emit!(LiquidityAdded {
            pool: pool.key(),
            owner: ctx.accounts.owner.key(),
            amount_a: deposit.amount_a,
            amount_b: deposit.amount_b,
            lp_amount: deposit.lp_amount,
        });
        Ok(())
    }

    pub fn remove_liquidity(
        ctx: Context<RemoveLiquidity>,
        lp_amount: u64,
        min_amount_a: u64,
        min_amount_b: u64,
    ) -> Result<()> {
        require!(lp_amount > 0, ErrorCode::ZeroAmount);
        require!(
            ctx.accounts.user_lp.amount >= lp_amount,
            ErrorCode::InsufficientLiquidity
        );

        let (amount_a, amount_b) = curve::withdraw_amounts(
            lp_amount,
            ctx.accounts.vault_a.amount,
            ctx.accounts.vault_b.amount,
            ctx.accounts.lp_mint.supply,
        )
        .ok_or(ErrorCode::Overflow)?;
        require!(
            amount_a >= min_amount_a && amount_b >= min_amount_b,
            ErrorCode::SlippageExceeded
        );

        anchor_spl::token::burn(
            CpiContext::new(
                ctx.accounts.token_program.to_account_info(),
                anchor_spl::token::Burn {
                    mint: ctx.accounts.lp_mint.to_account_info(),
                    from: ctx.accounts.user_lp.to_account_info(),
                    authority: ctx.accounts.owner.to_account_info(),
                },
            ),
            lp_amount,
        )?;

        let pool = &ctx.accounts.pool;
        let bump = [pool.bump];
        let seeds: &[&[u8]] = &[b"pool", pool.mint_a.as_ref(), pool.mint_b.as_ref(), &bump];
        pay_from_vault(
            amount_a,
            &ctx.accounts.vault_a,
            &ctx.accounts.user_token_a,
            pool,
            &ctx.accounts.token_program,
            seeds,
        )?;
        pay_from_vault(
            amount_b,
            &ctx.accounts.vault_b,
            &ctx.accounts.user_token_b,
            pool,
            &ctx.accounts.token_program,
            seeds,
        )?;

        emit!(LiquidityRemoved {
            pool: pool.key(),
            owner: ctx.accounts.owner.key(),
            amount_a,
            amount_b,
            lp_amount,
        });
        Ok(())
    }

    pub fn swap(
        ctx: Context<Swap>,
        amount_in: u64,
        min_amount_out: u64,
        input_mint: Pubkey,
    ) -> Result<()> {
        require!(amount_in > 0, ErrorCode::ZeroAmount);
        let accounts = &ctx.accounts;
        let pool = &accounts.pool;

        let (vault_in, vault_out, user_in, user_out) = if input_mint == pool.mint_a {
            (&accounts.vault_a, &accounts.vault_b, &accounts.user_token_a, &accounts.user_token_b)
        } else if input_mint == pool.mint_b {
            (&accounts.vault_b, &accounts.vault_a, &accounts.user_token_b, &accounts.user_token_a)
        } else {
            return err!(ErrorCode::BadMint);
        };
        require_keys_eq!(accounts.fee_token_account.mint, input_mint, ErrorCode::BadMint);
        require!(user_in.amount >= amount_in, ErrorCode::NoFunds);
        require!(vault_in.amount > 0 && vault_out.amount > 0, ErrorCode::EmptyPool);

        let fee = curve::swap_fee(amount_in, pool.fee_bps).ok_or(ErrorCode::Overflow)?;
        let protocol_fee = curve::protocol_fee(fee);
        let amount_in_after_fee = amount_in.checked_sub(fee).ok_or(ErrorCode::Overflow)?;
        let amount_out = curve::swap_output(amount_in_after_fee, vault_in.amount, vault_out.amount)
            .ok_or(ErrorCode::Overflow)?;
        require!(amount_out > 0, ErrorCode::ZeroOutput);
        require!(amount_out >= min_amount_out, ErrorCode::SlippageExceeded);

        deposit_from_user(
            amount_in - protocol_fee,
            user_in,
            vault_in,
            &accounts.owner,
            &accounts.token_program,
        )?;
        deposit_from_user(
            protocol_fee,
            user_in,
            &accounts.fee_token_account,
            &accounts.owner,
            &accounts.token_program,
        )?;

        let bump = [pool.bump];
        let seeds: &[&[u8]] = &[b"pool", pool.mint_a.as_ref(), pool.mint_b.as_ref(), &bump];
        pay_from_vault(
            amount_out,
            vault_out,
            user_out,
            pool,
            &accounts.token_program,
            seeds,
        )?;

        msg!("swap: in={} fee={} out={}", amount_in, fee, amount_out);
        emit!(Swapped {
            pool: pool.key(),
            owner: accounts.owner.key(),
            input_mint,
            amount_in,
            amount_out,
            fee,
            protocol_fee,
        });
        Ok(())
    }
}

#[account]
pub struct Config {
    pub authority: Pubkey,
    pub fee_recipient: Pubkey,
    pub default_fee_bps: u64,
    pub pool_count: u64,
    pub bump: u8,
}

#[account]
pub struct Pool {
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    pub vault_a: Pubkey,
    pub vault_b: Pubkey,
    pub lp_mint: Pubkey,
    pub fee_bps: u64,
    pub bump: u8,
}

#[derive(Accounts)]
pub struct Initialize<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,
    #[account(
        init,
        payer = authority,
        space = 8 + 32 + 32 + 8 + 8 + 1,
        seeds = [b"config"],
        bump
    )]
    pub config: Account<'info, Config>,
    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct UpdateConfig<'info> {
    pub authority: Signer<'info>,
    #[account(
        mut,
        seeds = [b"config"],
        bump = config.bump,
        has_one = authority @ ErrorCode::Unauthorized
    )]
    pub config: Account<'info, Config>,
}

#[derive(Accounts)]
pub struct CreatePool<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,
    #[account(mut, seeds = [b"config"], bump = config.bump)]
    pub config: Account<'info, Config>,
    pub mint_a: Box<Account<'info, Mint>>,
    #[account(constraint = mint_a.key() < mint_b.key() @ ErrorCode::MintOrder)]
    pub mint_b: Box<Account<'info, Mint>>,
    #[account(
        init,
        payer = payer,
        space = 8 + 32 * 5 + 8 + 1,
        seeds = [b"pool", mint_a.key().as_ref(), mint_b.key().as_ref()],
        bump
    )]
    pub pool: Box<Account<'info, Pool>>,
    #[account(
        init,
        payer = payer,
        seeds = [b"vault", pool.key().as_ref(), mint_a.key().as_ref()],
        bump,
        token::mint = mint_a,
        token::authority = pool
    )]
    pub vault_a: Box<Account<'info, TokenAccount>>,
    #[account(
        init,
        payer = payer,
        seeds = [b"vault", pool.key().as_ref(), mint_b.key().as_ref()],
        bump,
        token::mint = mint_b,
        token::authority = pool
    )]
    pub vault_b: Box<Account<'info, TokenAccount>>,
    #[account(
        init,
        payer = payer,
        seeds = [b"lp_mint", pool.key().as_ref()],
        bump,
        mint::decimals = LP_DECIMALS,
        mint::authority = pool
    )]
    pub lp_mint: Box<Account<'info, Mint>>,
    pub system_program: Program<'info, System>,
    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct AddLiquidity<'info> {
    pub owner: Signer<'info>,
    #[account(
        has_one = vault_a @ ErrorCode::BadVault,
        has_one = vault_b @ ErrorCode::BadVault,
        has_one = lp_mint @ ErrorCode::BadMint
    )]
    pub pool: Box<Account<'info, Pool>>,
    #[account(mut)]
    pub vault_a: Box<Account<'info, TokenAccount>>,
    #[account(mut)]
    pub vault_b: Box<Account<'info, TokenAccount>>,
    #[account(mut)]
    pub lp_mint: Box<Account<'info, Mint>>,
    #[account(mut, constraint = user_token_a.mint == pool.mint_a @ ErrorCode::BadMint)]
    pub user_token_a: Box<Account<'info, TokenAccount>>,
    #[account(mut, constraint = user_token_b.mint == pool.mint_b @ ErrorCode::BadMint)]
    pub user_token_b: Box<Account<'info, TokenAccount>>,
    #[account(mut, constraint = user_lp.mint == lp_mint.key() @ ErrorCode::BadMint)]
    pub user_lp: Box<Account<'info, TokenAccount>>,
    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct RemoveLiquidity<'info> {
    pub owner: Signer<'info>,
    #[account(
        has_one = vault_a @ ErrorCode::BadVault,
        has_one = vault_b @ ErrorCode::BadVault,
        has_one = lp_mint @ ErrorCode::BadMint
    )]
    pub pool: Box<Account<'info, Pool>>,
    #[account(mut)]
    pub vault_a: Box<Account<'info, TokenAccount>>,
    #[account(mut)]
    pub vault_b: Box<Account<'info, TokenAccount>>,
    #[account(mut)]
    pub lp_mint: Box<Account<'info, Mint>>,
    #[account(mut, constraint = user_token_a.mint == pool.mint_a @ ErrorCode::BadMint)]
    pub user_token_a: Box<Account<'info, TokenAccount>>,
    #[account(mut, constraint = user_token_b.mint == pool.mint_b @ ErrorCode::BadMint)]
    pub user_token_b: Box<Account<'info, TokenAccount>>,
    #[account(
        mut,
        constraint = user_lp.mint == lp_mint.key() @ ErrorCode::BadMint,
        constraint = user_lp.owner == owner.key() @ ErrorCode::Unauthorized
    )]
    pub user_lp: Box<Account<'info, TokenAccount>>,
    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct Swap<'info> {
    pub owner: Signer<'info>,
    #[account(seeds = [b"config"], bump = config.bump)]
    pub config: Account<'info, Config>,
    #[account(
        has_one = vault_a @ ErrorCode::BadVault,
        has_one = vault_b @ ErrorCode::BadVault
    )]
    pub pool: Box<Account<'info, Pool>>,
    #[account(mut)]
    pub vault_a: Box<Account<'info, TokenAccount>>,
    #[account(mut)]
    pub vault_b: Box<Account<'info, TokenAccount>>,
    #[account(mut, constraint = user_token_a.mint == pool.mint_a @ ErrorCode::BadMint)]
    pub user_token_a: Box<Account<'info, TokenAccount>>,
    #[account(mut, constraint = user_token_b.mint == pool.mint_b @ ErrorCode::BadMint)]
    pub user_token_b: Box<Account<'info, TokenAccount>>,
    #[account(
        mut,
        constraint = fee_token_account.owner == config.fee_recipient @ ErrorCode::Unauthorized
    )]
    pub fee_token_account: Box<Account<'info, TokenAccount>>,
    pub token_program: Program<'info, Token>,
}

#[event]
pub struct Initialized {
    pub authority: Pubkey,
    pub default_fee_bps: u64,
}

#[event]
pub struct ConfigUpdated {
    pub fee_recipient: Pubkey,
    pub default_fee_bps: u64,
}

#[event]
pub struct PoolCreated {
    pub pool: Pubkey,
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    pub lp_mint: Pubkey,
    pub fee_bps: u64,
}

#[event]
pub struct LiquidityAdded {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub amount_a: u64,
    pub amount_b: u64,
    pub lp_amount: u64,
}

#[event]
pub struct LiquidityRemoved {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub amount_a: u64,
    pub amount_b: u64,
    pub lp_amount: u64,
}

#[event]
pub struct Swapped {
    pub pool: Pubkey,
    pub owner: Pubkey,
    pub input_mint: Pubkey,
    pub amount_in: u64,
    pub amount_out: u64,
    pub fee: u64,
    pub protocol_fee: u64,
}

#[error_code]
pub enum ErrorCode {
    #[msg("Unauthorized")]
    Unauthorized,
    #[msg("Math overflow")]
    Overflow,
    #[msg("No funds")]
    NoFunds,
    #[msg("Bad mint")]
    BadMint,
    #[msg("Bad vault")]
    BadVault,
    #[msg("Mints must be passed in ascending order")]
    MintOrder,
    #[msg("Bad fee")]
    BadFee,
    #[msg("Zero amount")]
    ZeroAmount,
    #[msg("Deposit too small to mint liquidity")]
    ZeroLiquidity,
    #[msg("Insufficient liquidity")]
    InsufficientLiquidity,
    #[msg("Pool is empty")]
    EmptyPool,
    #[msg("Swap output is zero")]
    ZeroOutput,
    #[msg("Slippage exceeded")]
    SlippageExceeded,
}
