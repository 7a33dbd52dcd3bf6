//! Trimmed amounts - cross-chain amount scaling.
//!
//! The wire representation of any cross-chain amount carries at most
//! [`TRIMMED_DECIMALS`] significant decimal places: an amount is trimmed to
//! `min(local_decimals, peer_decimals, 8)` before it is encoded and untrimmed
//! back to local precision on the receiving side. Trimming is lossy; the
//! sending manager rejects any amount whose trim does not round-trip.

use cosmwasm_schema::cw_serde;

use crate::error::CodecError;

/// Maximum number of decimal places carried on the wire
pub const TRIMMED_DECIMALS: u8 = 8;

/// An amount scaled down to its wire precision
#[cw_serde]
#[derive(Copy, Eq, Default)]
pub struct TrimmedAmount {
    /// The scaled amount
    pub amount: u64,
    /// Number of decimal places `amount` is expressed in
    pub decimals: u8,
}

impl TrimmedAmount {
    pub fn new(amount: u64, decimals: u8) -> Self {
        Self { amount, decimals }
    }

    /// The wire precision for a transfer between chains with the given
    /// decimal configurations.
    pub fn trimmed_decimals(from_decimals: u8, to_decimals: u8) -> u8 {
        TRIMMED_DECIMALS.min(from_decimals).min(to_decimals)
    }

    /// Scale `amount` (expressed in `from_decimals`) down to the wire
    /// precision for a transfer towards a chain with `to_decimals`.
    ///
    /// Fails if the scaled amount does not fit in 64 bits.
    pub fn trim(amount: u128, from_decimals: u8, to_decimals: u8) -> Result<Self, CodecError> {
        let decimals = Self::trimmed_decimals(from_decimals, to_decimals);
        let scaled = scale_down(amount, from_decimals - decimals);
        let amount = u64::try_from(scaled).map_err(|_| CodecError::AmountOverflow)?;
        Ok(Self { amount, decimals })
    }

    /// Scale the trimmed amount back up to `to_decimals` decimal places.
    pub fn untrim(&self, to_decimals: u8) -> Result<u128, CodecError> {
        scale_up(
            u128::from(self.amount),
            to_decimals.saturating_sub(self.decimals),
        )
    }
}

fn scale_down(amount: u128, exponent: u8) -> u128 {
    match 10u128.checked_pow(u32::from(exponent)) {
        Some(divisor) => amount / divisor,
        // divisor exceeds u128::MAX, so any u128 amount scales to zero
        None => 0,
    }
}

fn scale_up(amount: u128, exponent: u8) -> Result<u128, CodecError> {
    10u128
        .checked_pow(u32::from(exponent))
        .and_then(|multiplier| amount.checked_mul(multiplier))
        .ok_or(CodecError::UntrimOverflow)
}
