#![allow(dead_code)]

//! Shared multi-contract test harness.
//!
//! Wires together the manager, the transceiver manager, a live cw20 token
//! (with the manager as minter) and one or more mock transceivers, mirroring
//! a production deployment on a single chain.

use cosmwasm_std::{coins, Addr, Binary, Uint128, Uint256};
use cw20::{BalanceResponse, Cw20Coin, Cw20ExecuteMsg, Cw20QueryMsg, MinterResponse, TokenInfoResponse};
use cw_multi_test::{
    App, AppBuilder, AppResponse, Contract, ContractWrapper, Executor, MockAddressGenerator,
    MockApiBech32, WasmKeeper,
};
use ntt_messages::envelope::{ManagerMessage, TransceiverEnvelope};
use ntt_messages::transfer::NativeTokenTransfer;
use ntt_messages::{to_universal, TrimmedAmount};

use ntt_manager::msg::{
    BucketResponse, BucketSelector, ExecuteMsg, InstantiateMsg, QueryMsg, SequenceResponse,
};
use transceiver_manager::msg as aggregator_msg;

pub const FEE_DENOM: &str = "uluna";
pub const LOCAL_CHAIN: u16 = 1;
pub const PEER_CHAIN: u16 = 2;
pub const TOKEN_DECIMALS: u8 = 6;
pub const PEER_DECIMALS: u8 = 2;
pub const OUTBOUND_LIMIT: u128 = 5_000_000;
pub const INBOUND_LIMIT: u128 = 5_000_000;
pub const RATE_DURATION: u64 = 604_800;
pub const USER_TOKENS: u128 = 100_000_000;

/// A minimal transceiver: quotes a fixed price, records the last envelope it
/// was asked to send, and forwards deliveries to the transceiver manager as
/// attestations.
pub mod mock_transceiver {
    use cosmwasm_schema::cw_serde;
    use cosmwasm_std::{
        to_json_binary, Binary, CosmosMsg, Deps, DepsMut, Env, MessageInfo, Response, StdResult,
        Uint128, WasmMsg,
    };
    use cw_storage_plus::Item;
    use ntt_messages::transceiver::DeliveryPriceResponse;

    #[cw_serde]
    pub struct InstantiateMsg {
        pub price: Uint128,
    }

    #[cw_serde]
    pub enum ExecuteMsg {
        SendMessage {
            message: Binary,
            instruction: Option<Binary>,
        },
        Deliver {
            aggregator: String,
            source_chain: u16,
            message: Binary,
        },
    }

    #[cw_serde]
    pub enum QueryMsg {
        DeliveryPrice {
            message: Binary,
            instruction: Option<Binary>,
        },
        LastMessage {},
        LastInstruction {},
    }

    const PRICE: Item<Uint128> = Item::new("price");
    const LAST_MESSAGE: Item<Option<Binary>> = Item::new("last_message");
    const LAST_INSTRUCTION: Item<Option<Binary>> = Item::new("last_instruction");

    pub fn instantiate(
        deps: DepsMut,
        _env: Env,
        _info: MessageInfo,
        msg: InstantiateMsg,
    ) -> StdResult<Response> {
        PRICE.save(deps.storage, &msg.price)?;
        LAST_MESSAGE.save(deps.storage, &None)?;
        LAST_INSTRUCTION.save(deps.storage, &None)?;
        Ok(Response::new())
    }

    pub fn execute(
        deps: DepsMut,
        _env: Env,
        _info: MessageInfo,
        msg: ExecuteMsg,
    ) -> StdResult<Response> {
        match msg {
            ExecuteMsg::SendMessage {
                message,
                instruction,
            } => {
                LAST_MESSAGE.save(deps.storage, &Some(message))?;
                LAST_INSTRUCTION.save(deps.storage, &instruction)?;
                Ok(Response::new().add_attribute("action", "send_message"))
            }
            ExecuteMsg::Deliver {
                aggregator,
                source_chain,
                message,
            } => Ok(Response::new().add_message(CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr: aggregator,
                msg: to_json_binary(&transceiver_manager::msg::ExecuteMsg::AttestationReceived {
                    source_chain,
                    message,
                })?,
                funds: vec![],
            }))),
        }
    }

    pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
        match msg {
            QueryMsg::DeliveryPrice { .. } => to_json_binary(&DeliveryPriceResponse {
                price: PRICE.load(deps.storage)?,
            }),
            QueryMsg::LastMessage {} => to_json_binary(&LAST_MESSAGE.load(deps.storage)?),
            QueryMsg::LastInstruction {} => to_json_binary(&LAST_INSTRUCTION.load(deps.storage)?),
        }
    }
}

fn contract_manager() -> Box<dyn Contract<cosmwasm_std::Empty>> {
    Box::new(ContractWrapper::new(
        ntt_manager::contract::execute,
        ntt_manager::contract::instantiate,
        ntt_manager::contract::query,
    ))
}

fn contract_aggregator() -> Box<dyn Contract<cosmwasm_std::Empty>> {
    Box::new(ContractWrapper::new(
        transceiver_manager::contract::execute,
        transceiver_manager::contract::instantiate,
        transceiver_manager::contract::query,
    ))
}

fn contract_cw20() -> Box<dyn Contract<cosmwasm_std::Empty>> {
    Box::new(ContractWrapper::new(
        cw20_base::contract::execute,
        cw20_base::contract::instantiate,
        cw20_base::contract::query,
    ))
}

fn contract_mock_transceiver() -> Box<dyn Contract<cosmwasm_std::Empty>> {
    Box::new(ContractWrapper::new(
        mock_transceiver::execute,
        mock_transceiver::instantiate,
        mock_transceiver::query,
    ))
}

pub struct TestEnv {
    pub app: App,
    pub manager: Addr,
    pub aggregator: Addr,
    pub token: Addr,
    pub transceivers: Vec<Addr>,
    pub admin: Addr,
    pub user: Addr,
    pub relayer: Addr,
    pub peer_contract: [u8; 32],
}

/// One transceiver quoting 100, threshold 1.
pub fn setup() -> TestEnv {
    setup_with(1, &[100])
}

pub fn setup_with(threshold: u8, transceiver_prices: &[u128]) -> TestEnv {
    build(threshold, transceiver_prices, true)
}

/// A full deployment whose manager has not yet been bound to a token.
pub fn setup_uninitialized() -> TestEnv {
    build(1, &[100], false)
}

fn build(threshold: u8, transceiver_prices: &[u128], initialize: bool) -> TestEnv {
    let mut app: App<_, MockApiBech32> = AppBuilder::new()
        .with_api(MockApiBech32::new("cosmwasm"))
        .with_wasm(WasmKeeper::default().with_address_generator(MockAddressGenerator))
        .build(|_, _, _| {});
    let admin = app.api().addr_make("admin");
    let user = app.api().addr_make("user");
    let relayer = app.api().addr_make("relayer");

    app.init_modules(|router, _, storage| {
        router
            .bank
            .init_balance(storage, &user, coins(1_000_000_000, FEE_DENOM))
            .unwrap();
        router
            .bank
            .init_balance(storage, &relayer, coins(1_000_000_000, FEE_DENOM))
            .unwrap();
    });

    let aggregator_code = app.store_code(contract_aggregator());
    let manager_code = app.store_code(contract_manager());
    let token_code = app.store_code(contract_cw20());
    let transceiver_code = app.store_code(contract_mock_transceiver());

    let aggregator = app
        .instantiate_contract(
            aggregator_code,
            admin.clone(),
            &aggregator_msg::InstantiateMsg {
                fee_denom: FEE_DENOM.to_string(),
            },
            &[],
            "transceiver-manager",
            None,
        )
        .unwrap();

    let manager = app
        .instantiate_contract(
            manager_code,
            admin.clone(),
            &InstantiateMsg {
                admin: admin.to_string(),
                chain_id: LOCAL_CHAIN,
                aggregator: aggregator.to_string(),
                threshold,
                fee_denom: FEE_DENOM.to_string(),
                outbound_limit: Uint256::from(OUTBOUND_LIMIT),
                rate_duration: RATE_DURATION,
            },
            &[],
            "ntt-manager",
            None,
        )
        .unwrap();

    let token = app
        .instantiate_contract(
            token_code,
            admin.clone(),
            &cw20_base::msg::InstantiateMsg {
                name: "NTT Token".to_string(),
                symbol: "NTT".to_string(),
                decimals: TOKEN_DECIMALS,
                initial_balances: vec![Cw20Coin {
                    address: user.to_string(),
                    amount: Uint128::new(USER_TOKENS),
                }],
                mint: Some(MinterResponse {
                    minter: manager.to_string(),
                    cap: None,
                }),
                marketing: None,
            },
            &[],
            "ntt-token",
            None,
        )
        .unwrap();

    if initialize {
        app.execute_contract(
            admin.clone(),
            manager.clone(),
            &ExecuteMsg::Initialize {
                token: token.to_string(),
            },
            &[],
        )
        .unwrap();
    }

    let mut transceivers = vec![];
    for (index, price) in transceiver_prices.iter().enumerate() {
        let transceiver = app
            .instantiate_contract(
                transceiver_code,
                admin.clone(),
                &mock_transceiver::InstantiateMsg {
                    price: Uint128::new(*price),
                },
                &[],
                format!("transceiver-{index}"),
                None,
            )
            .unwrap();
        // registration requires the manager to be a known handler
        if initialize {
            app.execute_contract(
                admin.clone(),
                aggregator.clone(),
                &aggregator_msg::ExecuteMsg::AddTransceiver {
                    handler: manager.to_string(),
                    transceiver: transceiver.to_string(),
                },
                &[],
            )
            .unwrap();
        }
        transceivers.push(transceiver);
    }

    let peer_contract = [0xAB; 32];
    app.execute_contract(
        admin.clone(),
        manager.clone(),
        &ExecuteMsg::SetPeer {
            chain: PEER_CHAIN,
            address: Binary::from(peer_contract.to_vec()),
            decimals: PEER_DECIMALS,
            inbound_limit: Uint256::from(INBOUND_LIMIT),
        },
        &[],
    )
    .unwrap();

    app.execute_contract(
        user.clone(),
        token.clone(),
        &Cw20ExecuteMsg::IncreaseAllowance {
            spender: manager.to_string(),
            amount: Uint128::new(USER_TOKENS),
            expires: None,
        },
        &[],
    )
    .unwrap();

    TestEnv {
        app,
        manager,
        aggregator,
        token,
        transceivers,
        admin,
        user,
        relayer,
        peer_contract,
    }
}

/// An arbitrary non-zero recipient on the peer chain.
pub fn remote_recipient() -> Binary {
    Binary::from([0xDE; 32].to_vec())
}

impl TestEnv {
    /// Submit a transfer from the default user.
    pub fn transfer(
        &mut self,
        amount: u128,
        fee: u128,
        should_queue: bool,
    ) -> anyhow::Result<AppResponse> {
        let funds = if fee > 0 {
            coins(fee, FEE_DENOM)
        } else {
            vec![]
        };
        self.app.execute_contract(
            self.user.clone(),
            self.manager.clone(),
            &ExecuteMsg::Transfer {
                amount: Uint128::new(amount),
                to_chain: PEER_CHAIN,
                recipient: remote_recipient(),
                should_queue,
                transceiver_instructions: vec![],
            },
            &funds,
        )
    }

    pub fn token_balance(&self, addr: &Addr) -> Uint128 {
        let response: BalanceResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                &self.token,
                &Cw20QueryMsg::Balance {
                    address: addr.to_string(),
                },
            )
            .unwrap();
        response.balance
    }

    pub fn token_supply(&self) -> Uint128 {
        let response: TokenInfoResponse = self
            .app
            .wrap()
            .query_wasm_smart(&self.token, &Cw20QueryMsg::TokenInfo {})
            .unwrap();
        response.total_supply
    }

    pub fn fee_balance(&self, addr: &Addr) -> Uint128 {
        self.app.wrap().query_balance(addr, FEE_DENOM).unwrap().amount
    }

    pub fn sequence(&self) -> u64 {
        let response: SequenceResponse = self
            .app
            .wrap()
            .query_wasm_smart(&self.manager, &QueryMsg::Sequence {})
            .unwrap();
        response.sequence
    }

    pub fn bucket(&self, bucket: BucketSelector) -> BucketResponse {
        self.app
            .wrap()
            .query_wasm_smart(&self.manager, &QueryMsg::Bucket { bucket })
            .unwrap()
    }

    pub fn last_sent(&self, transceiver_index: usize) -> Option<Binary> {
        self.app
            .wrap()
            .query_wasm_smart(
                &self.transceivers[transceiver_index],
                &mock_transceiver::QueryMsg::LastMessage {},
            )
            .unwrap()
    }

    pub fn advance_time(&mut self, seconds: u64) {
        self.app.update_block(|block| {
            block.time = block.time.plus_seconds(seconds);
        });
    }

    /// Build an inbound envelope as the registered peer would emit it.
    pub fn inbound_envelope(&self, id_byte: u8, amount: TrimmedAmount, recipient: &Addr) -> Binary {
        let payload = NativeTokenTransfer {
            amount,
            source_token: [0u8; 32],
            recipient: to_universal(self.app.api(), recipient).unwrap(),
            to_chain: LOCAL_CHAIN,
        };
        let envelope = TransceiverEnvelope {
            source_manager: self.peer_contract,
            recipient_manager: to_universal(self.app.api(), &self.manager).unwrap(),
            message: ManagerMessage {
                id: [id_byte; 32],
                sender: [0x77; 32],
                payload: payload.write_to().to_vec(),
            },
        };
        Binary::from(envelope.encode().unwrap())
    }

    /// Have a transceiver deliver an attestation for an envelope.
    pub fn deliver(
        &mut self,
        transceiver_index: usize,
        message: &Binary,
    ) -> anyhow::Result<AppResponse> {
        self.deliver_from(transceiver_index, PEER_CHAIN, message)
    }

    pub fn deliver_from(
        &mut self,
        transceiver_index: usize,
        source_chain: u16,
        message: &Binary,
    ) -> anyhow::Result<AppResponse> {
        self.app.execute_contract(
            self.relayer.clone(),
            self.transceivers[transceiver_index].clone(),
            &mock_transceiver::ExecuteMsg::Deliver {
                aggregator: self.aggregator.to_string(),
                source_chain,
                message: message.clone(),
            },
            &[],
        )
    }

    /// Execute an attested message (permissionless).
    pub fn execute_message(&mut self, message: &Binary) -> anyhow::Result<AppResponse> {
        self.execute_message_from(PEER_CHAIN, message)
    }

    pub fn execute_message_from(
        &mut self,
        source_chain: u16,
        message: &Binary,
    ) -> anyhow::Result<AppResponse> {
        self.app.execute_contract(
            self.relayer.clone(),
            self.aggregator.clone(),
            &aggregator_msg::ExecuteMsg::ExecuteMessage {
                source_chain,
                message: message.clone(),
            },
            &[],
        )
    }

    pub fn digest(&self, message: &Binary) -> Binary {
        let response: aggregator_msg::DigestResponse = self
            .app
            .wrap()
            .query_wasm_smart(
                &self.aggregator,
                &aggregator_msg::QueryMsg::CalculateDigest {
                    source_chain: PEER_CHAIN,
                    message: message.clone(),
                },
            )
            .unwrap();
        response.digest
    }
}

/// Extract an attribute from a named wasm event.
pub fn event_attr(res: &AppResponse, event: &str, key: &str) -> Option<String> {
    let ty = format!("wasm-{event}");
    res.events
        .iter()
        .filter(|e| e.ty == ty)
        .flat_map(|e| &e.attributes)
        .find(|a| a.key == key)
        .map(|a| a.value.clone())
}
