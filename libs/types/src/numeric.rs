//! Ether-denominated amounts
//!
//! Uses rust_decimal for deterministic arithmetic (no floating-point errors).
//! One unit is one ether; the smallest representable step is one wei
//! (18 decimal places).

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::AmountError;

/// Value moved by the substrate, in ether
pub type Amount = Decimal;

/// Decimal places of one wei
pub const WEI_SCALE: u32 = 18;

/// Parse a non-negative ether amount such as `"0.1"`.
///
/// Rejects negative values and anything finer than one wei.
pub fn parse_ether(input: &str) -> Result<Amount, AmountError> {
    let amount =
        Decimal::from_str(input.trim()).map_err(|_| AmountError::Invalid(input.to_string()))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AmountError::Negative(input.to_string()));
    }
    if amount.normalize().scale() > WEI_SCALE {
        return Err(AmountError::Invalid(input.to_string()));
    }
    Ok(amount)
}
