//! Execute message handlers, split by concern:
//! - `transfer` - outbound transfer submission (direct and cw20 hook)
//! - `redeem` - attested inbound message termination
//! - `release` - deferred completion and cancellation of queued transfers
//! - `admin` - initialisation, peer registry, buckets, threshold, pause

mod admin;
mod redeem;
mod release;
mod transfer;

pub use admin::{
    execute_apply_change, execute_cancel_change, execute_hand_over_admin, execute_initialize,
    execute_pause, execute_set_peer, execute_set_rate_duration, execute_set_rate_limit,
    execute_set_threshold, execute_unpause,
};
pub use redeem::execute_receive_attested;
pub use release::{
    execute_cancel_outbound_queued, execute_complete_inbound_queued,
    execute_complete_outbound_queued,
};
pub use transfer::{execute_receive, execute_transfer};

use cosmwasm_std::{Binary, MessageInfo, Uint128};

use crate::error::ContractError;
use crate::state::Config;

/// Parse a 32-byte value from Binary input.
pub(crate) fn parse_bytes32(data: &Binary) -> Result<[u8; 32], ContractError> {
    data.to_vec()
        .try_into()
        .map_err(|_| ContractError::InvalidHashLength { got: data.len() })
}

/// Verify the caller is the admin.
pub(crate) fn ensure_admin(config: &Config, info: &MessageInfo) -> Result<(), ContractError> {
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized);
    }
    Ok(())
}

/// Sum the attached funds, rejecting any denom other than the fee denom.
pub(crate) fn paid_fee(info: &MessageInfo, fee_denom: &str) -> Result<Uint128, ContractError> {
    let mut total = Uint128::zero();
    for coin in &info.funds {
        if coin.denom != fee_denom {
            return Err(ContractError::UnsupportedFeeDenom {
                denom: coin.denom.clone(),
            });
        }
        total += coin.amount;
    }
    Ok(total)
}
