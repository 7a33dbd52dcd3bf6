//! Outbound fan-out: quote, fee enforcement, per-transceiver dispatch.

use cosmwasm_std::{
    coins, to_json_binary, Addr, Binary, CosmosMsg, Deps, DepsMut, MessageInfo, Response, Uint128,
    WasmMsg,
};
use ntt_messages::envelope::TransceiverEnvelope;
use ntt_messages::transceiver::{
    DeliveryPriceResponse, TransceiverExecuteMsg, TransceiverInstruction, TransceiverQueryMsg,
};
use ntt_messages::{bytes32_to_hex, to_universal};

use crate::error::ContractError;
use crate::state::{CONFIG, HANDLERS, TRANSCEIVERS};

/// Fan an outbound envelope out to the sending handler's transceivers.
///
/// The caller must be the envelope's source manager. The attached funds must
/// equal the re-quoted delivery total exactly; each transceiver is forwarded
/// its own quoted slice.
pub fn execute_send_message(
    deps: DepsMut,
    info: MessageInfo,
    message: Binary,
    instructions: Vec<TransceiverInstruction>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let envelope = TransceiverEnvelope::decode(message.as_slice())?;

    let handler = info.sender.clone();
    let handler_info = HANDLERS
        .may_load(deps.storage, &handler)?
        .ok_or(ContractError::MessageHandlerUnknown {
            handler: handler.to_string(),
        })?;
    if handler_info.paused {
        return Err(ContractError::HandlerPaused);
    }

    let caller_universal = to_universal(deps.api, &handler)?;
    if caller_universal != envelope.source_manager {
        return Err(ContractError::CallerNotSource);
    }

    let transceivers = TRANSCEIVERS.load(deps.storage, &handler)?;
    let prices = quote_delivery_prices(deps.as_ref(), &transceivers, &message, &instructions)?;
    let total: Uint128 = prices.iter().copied().sum();

    let paid = paid_fee(&info, &config.fee_denom)?;
    if paid != total {
        return Err(ContractError::IncorrectFeePayment {
            required: total,
            got: paid,
        });
    }

    let mut messages: Vec<CosmosMsg> = vec![];
    for (index, transceiver) in transceivers.iter().enumerate() {
        let funds = if prices[index].is_zero() {
            vec![]
        } else {
            coins(prices[index].u128(), &config.fee_denom)
        };
        messages.push(CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr: transceiver.to_string(),
            msg: to_json_binary(&TransceiverExecuteMsg::SendMessage {
                message: message.clone(),
                instruction: instruction_for(&instructions, index),
            })?,
            funds,
        }));
    }

    Ok(Response::new()
        .add_messages(messages)
        .add_attribute("action", "send_message")
        .add_attribute("handler", handler)
        .add_attribute("message_id", bytes32_to_hex(&envelope.message.id))
        .add_attribute("transceivers", transceivers.len().to_string())
        .add_attribute("delivery_price", total.to_string()))
}

/// Quote each transceiver in registration order and return the per-transceiver
/// prices.
///
/// The instruction array must address registered transceivers in strictly
/// increasing registration order.
pub fn quote_delivery_prices(
    deps: Deps,
    transceivers: &[Addr],
    message: &Binary,
    instructions: &[TransceiverInstruction],
) -> Result<Vec<Uint128>, ContractError> {
    validate_instructions(instructions, transceivers.len())?;

    let mut prices = Vec::with_capacity(transceivers.len());
    for (index, transceiver) in transceivers.iter().enumerate() {
        let response: DeliveryPriceResponse = deps.querier.query_wasm_smart(
            transceiver,
            &TransceiverQueryMsg::DeliveryPrice {
                message: message.clone(),
                instruction: instruction_for(instructions, index),
            },
        )?;
        prices.push(response.price);
    }
    Ok(prices)
}

/// Reject instruction arrays that reorder the transceiver list or address an
/// unknown index.
pub fn validate_instructions(
    instructions: &[TransceiverInstruction],
    transceiver_count: usize,
) -> Result<(), ContractError> {
    let mut last: Option<u8> = None;
    for instruction in instructions {
        if usize::from(instruction.index) >= transceiver_count {
            return Err(ContractError::UnorderedOrUnknownInstruction);
        }
        if let Some(previous) = last {
            if instruction.index <= previous {
                return Err(ContractError::UnorderedOrUnknownInstruction);
            }
        }
        last = Some(instruction.index);
    }
    Ok(())
}

fn instruction_for(instructions: &[TransceiverInstruction], index: usize) -> Option<Binary> {
    instructions
        .iter()
        .find(|instruction| usize::from(instruction.index) == index)
        .map(|instruction| instruction.payload.clone())
}

/// Sum the attached funds, rejecting any denom other than the fee denom.
fn paid_fee(info: &MessageInfo, fee_denom: &str) -> Result<Uint128, ContractError> {
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
