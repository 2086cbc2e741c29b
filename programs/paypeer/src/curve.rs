// Constant-product math. `None` means overflow or division by zero.

pub const BPS_DENOM: u64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deposit {
    pub amount_a: u64,
    pub amount_b: u64,
    pub lp_amount: u64,
}

// rounds up
pub fn swap_fee(amount_in: u64, fee_bps: u64) -> Option<u64> {
    let scaled = (amount_in as u128).checked_mul(fee_bps as u128)?;
    let fee = scaled.checked_add(BPS_DENOM as u128 - 1)? / BPS_DENOM as u128;
    u64::try_from(fee).ok()
}

pub fn protocol_fee(fee: u64) -> u64 {
    fee / 2
}

pub fn swap_output(amount_in_after_fee: u64, reserve_in: u64, reserve_out: u64) -> Option<u64> {
    let numerator = (reserve_out as u128).checked_mul(amount_in_after_fee as u128)?;
    let denominator = (reserve_in as u128).checked_add(amount_in_after_fee as u128)?;
    let out = numerator.checked_div(denominator)?;
    u64::try_from(out).ok()
}

pub fn deposit_amounts(
    max_amount_a: u64,
    max_amount_b: u64,
    reserve_a: u64,
    reserve_b: u64,
    lp_supply: u64,
) -> Option<Deposit> {
    if lp_supply == 0 {
        let product = (max_amount_a as u128).checked_mul(max_amount_b as u128)?;
        return Some(Deposit {
            amount_a: max_amount_a,
            amount_b: max_amount_b,
            lp_amount: u64::try_from(isqrt(product)).ok()?,
        });
    }

    let supply = lp_supply as u128;
    let lp_from_a = (max_amount_a as u128).checked_mul(supply)?.checked_div(reserve_a as u128)?;
    let lp_from_b = (max_amount_b as u128).checked_mul(supply)?.checked_div(reserve_b as u128)?;
    let lp = lp_from_a.min(lp_from_b);

    Some(Deposit {
        amount_a: u64::try_from(div_ceil(lp.checked_mul(reserve_a as u128)?, supply)?).ok()?,
        amount_b: u64::try_from(div_ceil(lp.checked_mul(reserve_b as u128)?, supply)?).ok()?,
        lp_amount: u64::try_from(lp).ok()?,
    })
}

pub fn withdraw_amounts(
    lp_amount: u64,
    reserve_a: u64,
    reserve_b: u64,
    lp_supply: u64,
) -> Option<(u64, u64)> {
    if lp_amount > lp_supply {
        return None;
    }
    let supply = lp_supply as u128;
    let amount_a = (reserve_a as u128).checked_mul(lp_amount as u128)?.checked_div(supply)?;
    let amount_b = (reserve_b as u128).checked_mul(lp_amount as u128)?.checked_div(supply)?;
    Some((u64::try_from(amount_a).ok()?, u64::try_from(amount_b).ok()?))
}

fn div_ceil(numerator: u128, denominator: u128) -> Option<u128> {
    let quotient = numerator.checked_div(denominator)?;
    if numerator % denominator == 0 {
        Some(quotient)
    } else {
        quotient.checked_add(1)
    }
}

pub fn isqrt(value: u128) -> u128 {
    if value < 2 {
        return value;
    }
    let mut x = value;
    let mut y = x / 2 + x % 2;
    while y < x {
        x = y;
        y = (x + value / x) / 2;
    }
    x
}
