//! Outbound transfer submission.
//!
//! Two deposit paths share one flow:
//! - `Transfer` burns the amount from the caller's own allowance and takes
//!   the delivery fee from the attached native funds
//! - `Receive` accepts a cw20 send hook from the configured token and burns
//!   the custody-held tokens; no native fee can ride the hook
//!
//! In both cases the deposit is burned up front, whether the transfer
//! dispatches immediately or queues; cancelling a queued transfer mints the
//! deposit back.

use cosmwasm_std::{
    coins, from_json, to_json_binary, Addr, BankMsg, Binary, CosmosMsg, Deps, DepsMut, Env, Event,
    MessageInfo, Response, Uint128, Uint256, WasmMsg,
};
use cw20::{Cw20ExecuteMsg, Cw20ReceiveMsg};
use ntt_messages::envelope::{ManagerMessage, TransceiverEnvelope};
use ntt_messages::transfer::NativeTokenTransfer;
use ntt_messages::{
    bytes32_to_hex, is_zero_address, keccak256_parts, to_universal, TransceiverInstruction,
    TrimmedAmount,
};
use transceiver_manager::msg::{
    ExecuteMsg as AggregatorExecuteMsg, QueryMsg as AggregatorQueryMsg, QuoteResponse,
};

use crate::error::ContractError;
use crate::execute::{paid_fee, parse_bytes32};
use crate::msg::ReceiveMsg;
use crate::rate_limit::{
    capacity_of, consume_bucket, fill_bucket, inbound_bucket_id, outbound_bucket_id,
};
use crate::state::{
    Config, OutboundQueuedTransfer, Peer, CONFIG, OUTBOUND_QUEUE, PEERS, SEQUENCE, STATS,
};

/// How the deposit reaches the manager's custody
enum Deposit {
    /// Burn from the depositor's allowance
    Allowance,
    /// Burn tokens already transferred in by the cw20 send hook
    Custody,
}

struct TransferArgs {
    depositor: Addr,
    deposit: Deposit,
    amount: Uint128,
    to_chain: u16,
    recipient: [u8; 32],
    should_queue: bool,
    instructions: Vec<TransceiverInstruction>,
    fee_paid: Uint128,
}

/// Execute handler for direct transfers (allowance-based deposit).
#[allow(clippy::too_many_arguments)]
pub fn execute_transfer(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    amount: Uint128,
    to_chain: u16,
    recipient: Binary,
    should_queue: bool,
    instructions: Vec<TransceiverInstruction>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let fee_paid = paid_fee(&info, &config.fee_denom)?;
    transfer_impl(
        deps,
        env,
        config,
        TransferArgs {
            depositor: info.sender,
            deposit: Deposit::Allowance,
            amount,
            to_chain,
            recipient: parse_bytes32(&recipient)?,
            should_queue,
            instructions,
            fee_paid,
        },
    )
}

/// Execute handler for transfers arriving as a cw20 send hook.
///
/// The hook must originate from the configured NTT token: any other sender is
/// forging a deposit notification on someone else's behalf.
pub fn execute_receive(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    cw20_msg: Cw20ReceiveMsg,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let token = config.token()?;
    if info.sender != token.address {
        return Err(ContractError::UnauthorizedAssetSender);
    }
    let depositor = deps.api.addr_validate(&cw20_msg.sender)?;

    match from_json(&cw20_msg.msg)? {
        ReceiveMsg::Transfer {
            to_chain,
            recipient,
            should_queue,
            transceiver_instructions,
        } => transfer_impl(
            deps,
            env,
            config,
            TransferArgs {
                depositor,
                deposit: Deposit::Custody,
                amount: cw20_msg.amount,
                to_chain,
                recipient: parse_bytes32(&recipient)?,
                should_queue,
                instructions: transceiver_instructions,
                fee_paid: Uint128::zero(),
            },
        ),
    }
}

fn transfer_impl(
    deps: DepsMut,
    env: Env,
    config: Config,
    args: TransferArgs,
) -> Result<Response, ContractError> {
    if config.paused {
        return Err(ContractError::Paused);
    }
    let token = config.token()?.clone();

    if args.amount.is_zero() {
        return Err(ContractError::ZeroAmount);
    }
    if is_zero_address(&args.recipient) {
        return Err(ContractError::InvalidRecipient);
    }
    if args.to_chain == config.chain_id {
        return Err(ContractError::InvalidTargetChain {
            chain: args.to_chain,
        });
    }
    let peer = PEERS
        .may_load(deps.storage, args.to_chain)?
        .ok_or(ContractError::UnknownPeerChain {
            chain: args.to_chain,
        })?;

    let trimmed = TrimmedAmount::trim(args.amount.u128(), token.decimals, peer.decimals)?;
    if trimmed.untrim(token.decimals)? != args.amount.u128() {
        return Err(ContractError::DustNotAllowed {
            amount: args.amount,
        });
    }

    let manager_universal = to_universal(deps.api, &env.contract.address)?;
    let sequence = SEQUENCE.load(deps.storage)?;
    let message_id = keccak256_parts(&[&manager_universal, &sequence.to_be_bytes()]);
    SEQUENCE.save(deps.storage, &(sequence + 1))?;

    let burn: CosmosMsg = match args.deposit {
        Deposit::Allowance => CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr: token.address.to_string(),
            msg: to_json_binary(&Cw20ExecuteMsg::BurnFrom {
                owner: args.depositor.to_string(),
                amount: args.amount,
            })?,
            funds: vec![],
        }),
        Deposit::Custody => CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr: token.address.to_string(),
            msg: to_json_binary(&Cw20ExecuteMsg::Burn {
                amount: args.amount,
            })?,
            funds: vec![],
        }),
    };

    let mut stats = STATS.load(deps.storage)?;
    stats.total_outbound_transfers += 1;
    stats.total_burned += args.amount;
    STATS.save(deps.storage, &stats)?;

    let now = env.block.time.seconds();
    let outbound_id = outbound_bucket_id();
    let (_, capacity) = capacity_of(deps.storage, &outbound_id, now)?;
    let requested = Uint256::from(args.amount);

    if capacity < requested {
        if !args.should_queue {
            return Err(ContractError::InsufficientCapacity {
                capacity,
                amount: requested,
            });
        }
        OUTBOUND_QUEUE.save(
            deps.storage,
            &message_id,
            &OutboundQueuedTransfer {
                queued_at: now,
                untrimmed: args.amount,
                amount: trimmed,
                to_chain: args.to_chain,
                recipient: args.recipient,
                initiator: args.depositor.clone(),
                instructions: args.instructions,
            },
        )?;

        let mut response = Response::new()
            .add_message(burn)
            .add_event(
                Event::new("outbound_transfer_rate_limited")
                    .add_attribute("initiator", args.depositor.as_str())
                    .add_attribute("message_id", bytes32_to_hex(&message_id))
                    .add_attribute("current_capacity", capacity.to_string())
                    .add_attribute("amount", trimmed.amount.to_string()),
            )
            .add_attribute("action", "transfer")
            .add_attribute("queued", "true")
            .add_attribute("message_id", bytes32_to_hex(&message_id));
        // a queued transfer pays its delivery fee at completion time
        if !args.fee_paid.is_zero() {
            response = response.add_message(BankMsg::Send {
                to_address: args.depositor.to_string(),
                amount: coins(args.fee_paid.u128(), &config.fee_denom),
            });
        }
        return Ok(response);
    }

    let consumed = consume_bucket(deps.storage, &outbound_id, now, requested)?;
    let filled = fill_bucket(
        deps.storage,
        &inbound_bucket_id(args.to_chain),
        now,
        requested,
    )?;

    let envelope = build_envelope(
        deps.as_ref(),
        manager_universal,
        &peer,
        message_id,
        &args.depositor,
        trimmed,
        args.recipient,
        args.to_chain,
    )?;
    let message = Binary::from(envelope.encode()?);

    let (messages, delivery_price) = send_via_aggregator(
        deps.as_ref(),
        &config,
        &env.contract.address,
        message,
        &args.instructions,
        args.fee_paid,
        &args.depositor,
    )?;

    Ok(Response::new()
        .add_message(burn)
        .add_messages(messages)
        .add_event(consumed)
        .add_event(filled)
        .add_event(transfer_sent_event(
            &message_id,
            &args.recipient,
            args.to_chain,
            args.amount,
            delivery_price,
        ))
        .add_attribute("action", "transfer")
        .add_attribute("queued", "false")
        .add_attribute("sequence", sequence.to_string())
        .add_attribute("message_id", bytes32_to_hex(&message_id)))
}

/// Build the transceiver envelope for an outbound transfer.
#[allow(clippy::too_many_arguments)]
pub(crate) fn build_envelope(
    deps: Deps,
    manager_universal: [u8; 32],
    peer: &Peer,
    message_id: [u8; 32],
    initiator: &Addr,
    amount: TrimmedAmount,
    recipient: [u8; 32],
    to_chain: u16,
) -> Result<TransceiverEnvelope, ContractError> {
    let payload = NativeTokenTransfer {
        amount,
        source_token: [0u8; 32],
        recipient,
        to_chain,
    };
    Ok(TransceiverEnvelope {
        source_manager: manager_universal,
        recipient_manager: peer.address,
        message: ManagerMessage {
            id: message_id,
            sender: to_universal(deps.api, initiator)?,
            payload: payload.write_to().to_vec(),
        },
    })
}

/// Re-quote the delivery price, enforce the fee, and produce the aggregator
/// dispatch plus any excess refund.
pub(crate) fn send_via_aggregator(
    deps: Deps,
    config: &Config,
    manager: &Addr,
    message: Binary,
    instructions: &[TransceiverInstruction],
    fee_paid: Uint128,
    fee_payer: &Addr,
) -> Result<(Vec<CosmosMsg>, Uint128), ContractError> {
    let quote: QuoteResponse = deps.querier.query_wasm_smart(
        &config.aggregator,
        &AggregatorQueryMsg::QuoteDeliveryPrices {
            handler: manager.to_string(),
            message: message.clone(),
            instructions: instructions.to_vec(),
        },
    )?;
    if fee_paid < quote.total {
        return Err(ContractError::IncorrectFeePayment {
            required: quote.total,
            got: fee_paid,
        });
    }

    let mut messages = vec![CosmosMsg::Wasm(WasmMsg::Execute {
        contract_addr: config.aggregator.to_string(),
        msg: to_json_binary(&AggregatorExecuteMsg::SendMessage {
            message,
            instructions: instructions.to_vec(),
        })?,
        funds: if quote.total.is_zero() {
            vec![]
        } else {
            coins(quote.total.u128(), &config.fee_denom)
        },
    })];

    let excess = fee_paid - quote.total;
    if !excess.is_zero() {
        messages.push(CosmosMsg::Bank(BankMsg::Send {
            to_address: fee_payer.to_string(),
            amount: coins(excess.u128(), &config.fee_denom),
        }));
    }
    Ok((messages, quote.total))
}

pub(crate) fn transfer_sent_event(
    message_id: &[u8; 32],
    recipient: &[u8; 32],
    to_chain: u16,
    amount: Uint128,
    delivery_price: Uint128,
) -> Event {
    Event::new("transfer_sent")
        .add_attribute("message_id", bytes32_to_hex(message_id))
        .add_attribute("recipient", bytes32_to_hex(recipient))
        .add_attribute("chain", to_chain.to_string())
        .add_attribute("amount", amount.to_string())
        .add_attribute("delivery_price", delivery_price.to_string())
}
