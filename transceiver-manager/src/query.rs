//! Query message handlers.

use cosmwasm_std::{Binary, Deps, Order, StdError, StdResult, Uint128};
use cw_storage_plus::Bound;
use ntt_messages::envelope::{message_digest, TransceiverEnvelope};
use ntt_messages::TransceiverInstruction;

use crate::execute::quote_delivery_prices;
use crate::msg::{
    AttestationCountResponse, ConfigResponse, DigestResponse, HandlerResponse, HandlersResponse,
    MessageStatusResponse, QuoteResponse,
};
use crate::state::{ATTESTATIONS, CONFIG, HANDLERS, TRANSCEIVERS};

/// Default page size for listing queries
const DEFAULT_LIMIT: u32 = 10;

/// Maximum page size for listing queries
const MAX_LIMIT: u32 = 30;

pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        fee_denom: config.fee_denom,
    })
}

pub fn query_handler(deps: Deps, handler: String) -> StdResult<HandlerResponse> {
    let handler = deps.api.addr_validate(&handler)?;
    let info = HANDLERS
        .may_load(deps.storage, &handler)?
        .ok_or_else(|| StdError::not_found("handler"))?;
    let transceivers = TRANSCEIVERS.load(deps.storage, &handler)?;
    Ok(HandlerResponse {
        handler,
        admin: info.admin,
        paused: info.paused,
        transceivers,
    })
}

pub fn query_handlers(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<HandlersResponse> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize;
    let start_after = start_after
        .map(|addr| deps.api.addr_validate(&addr))
        .transpose()?;
    let start = start_after.as_ref().map(Bound::exclusive);
    let handlers = HANDLERS
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| {
            let (handler, info) = item?;
            let transceivers = TRANSCEIVERS.load(deps.storage, &handler)?;
            Ok(HandlerResponse {
                handler,
                admin: info.admin,
                paused: info.paused,
                transceivers,
            })
        })
        .collect::<StdResult<Vec<_>>>()?;
    Ok(HandlersResponse { handlers })
}

pub fn query_message_attestations(
    deps: Deps,
    digest: Binary,
) -> StdResult<AttestationCountResponse> {
    let count = ATTESTATIONS
        .may_load(deps.storage, digest.as_slice())?
        .map(|record| record.attested.len() as u64)
        .unwrap_or_default();
    Ok(AttestationCountResponse { count })
}

pub fn query_message_status(deps: Deps, digest: Binary) -> StdResult<MessageStatusResponse> {
    let record = ATTESTATIONS.may_load(deps.storage, digest.as_slice())?;
    Ok(match record {
        Some(record) => MessageStatusResponse {
            attestations: record.attested.len() as u64,
            executed: record.executed,
            attested_by: record.attested,
        },
        None => MessageStatusResponse {
            attestations: 0,
            executed: false,
            attested_by: vec![],
        },
    })
}

pub fn query_quote_delivery_prices(
    deps: Deps,
    handler: String,
    message: Binary,
    instructions: Vec<TransceiverInstruction>,
) -> StdResult<QuoteResponse> {
    let handler = deps.api.addr_validate(&handler)?;
    let transceivers = TRANSCEIVERS
        .may_load(deps.storage, &handler)?
        .ok_or_else(|| StdError::not_found("handler"))?;
    let prices = quote_delivery_prices(deps, &transceivers, &message, &instructions)
        .map_err(|err| StdError::generic_err(err.to_string()))?;
    Ok(QuoteResponse {
        total: prices.iter().copied().sum::<Uint128>(),
    })
}

pub fn query_calculate_digest(source_chain: u16, message: Binary) -> StdResult<DigestResponse> {
    let envelope = TransceiverEnvelope::decode(message.as_slice())
        .map_err(|err| StdError::generic_err(err.to_string()))?;
    Ok(DigestResponse {
        digest: Binary::from(message_digest(source_chain, &envelope).to_vec()),
    })
}
