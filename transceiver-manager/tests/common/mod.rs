#![allow(dead_code)]

//! Shared test harness: the transceiver manager wired to a mock handler and
//! mock transceivers.

use cosmwasm_std::{coins, Addr, Binary, Uint128};
use cw_multi_test::{
    App, AppBuilder, AppResponse, Contract, ContractWrapper, Executor, MockAddressGenerator,
    MockApiBech32, WasmKeeper,
};
use ntt_messages::envelope::{ManagerMessage, TransceiverEnvelope};
use ntt_messages::to_universal;

use transceiver_manager::msg::{ExecuteMsg, HandlerResponse, InstantiateMsg, QueryMsg};

pub const FEE_DENOM: &str = "uluna";
pub const SOURCE_CHAIN: u16 = 7;

/// A minimal transceiver: fixed quote, records sends, forwards deliveries as
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

/// A minimal message handler: exposes a threshold, registers itself, counts
/// dispatched messages and can forward sends with attached fees.
pub mod mock_handler {
    use cosmwasm_schema::cw_serde;
    use cosmwasm_std::{
        to_json_binary, Binary, CosmosMsg, Deps, DepsMut, Env, MessageInfo, Response, StdResult,
        WasmMsg,
    };
    use cw_storage_plus::Item;
    use ntt_messages::handler::ThresholdResponse;
    use ntt_messages::{AttestedMessage, TransceiverInstruction};

    #[cw_serde]
    pub struct InstantiateMsg {
        pub threshold: u8,
    }

    #[cw_serde]
    pub enum ExecuteMsg {
        Register {
            aggregator: String,
            admin: String,
        },
        Send {
            aggregator: String,
            message: Binary,
            instructions: Vec<TransceiverInstruction>,
        },
        ReceiveAttestedMessage(AttestedMessage),
    }

    #[cw_serde]
    pub enum QueryMsg {
        Threshold {},
        Received {},
    }

    #[cw_serde]
    pub struct ReceivedResponse {
        pub count: u64,
        pub last: Option<AttestedMessage>,
    }

    const THRESHOLD: Item<u8> = Item::new("threshold");
    const RECEIVED_COUNT: Item<u64> = Item::new("received_count");
    const LAST_RECEIVED: Item<Option<AttestedMessage>> = Item::new("last_received");

    pub fn instantiate(
        deps: DepsMut,
        _env: Env,
        _info: MessageInfo,
        msg: InstantiateMsg,
    ) -> StdResult<Response> {
        THRESHOLD.save(deps.storage, &msg.threshold)?;
        RECEIVED_COUNT.save(deps.storage, &0u64)?;
        LAST_RECEIVED.save(deps.storage, &None)?;
        Ok(Response::new())
    }

    pub fn execute(
        deps: DepsMut,
        _env: Env,
        info: MessageInfo,
        msg: ExecuteMsg,
    ) -> StdResult<Response> {
        match msg {
            ExecuteMsg::Register { aggregator, admin } => {
                Ok(Response::new().add_message(CosmosMsg::Wasm(WasmMsg::Execute {
                    contract_addr: aggregator,
                    msg: to_json_binary(
                        &transceiver_manager::msg::ExecuteMsg::RegisterHandler { admin },
                    )?,
                    funds: vec![],
                })))
            }
            ExecuteMsg::Send {
                aggregator,
                message,
                instructions,
            } => Ok(Response::new().add_message(CosmosMsg::Wasm(WasmMsg::Execute {
                contract_addr: aggregator,
                msg: to_json_binary(&transceiver_manager::msg::ExecuteMsg::SendMessage {
                    message,
                    instructions,
                })?,
                funds: info.funds,
            }))),
            ExecuteMsg::ReceiveAttestedMessage(attested) => {
                let count = RECEIVED_COUNT.load(deps.storage)? + 1;
                RECEIVED_COUNT.save(deps.storage, &count)?;
                LAST_RECEIVED.save(deps.storage, &Some(attested))?;
                Ok(Response::new().add_attribute("action", "receive_attested_message"))
            }
        }
    }

    pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
        match msg {
            QueryMsg::Threshold {} => to_json_binary(&ThresholdResponse {
                threshold: THRESHOLD.load(deps.storage)?,
            }),
            QueryMsg::Received {} => to_json_binary(&ReceivedResponse {
                count: RECEIVED_COUNT.load(deps.storage)?,
                last: LAST_RECEIVED.load(deps.storage)?,
            }),
        }
    }
}

fn contract_aggregator() -> Box<dyn Contract<cosmwasm_std::Empty>> {
    Box::new(ContractWrapper::new(
        transceiver_manager::contract::execute,
        transceiver_manager::contract::instantiate,
        transceiver_manager::contract::query,
    ))
}

fn contract_mock_transceiver() -> Box<dyn Contract<cosmwasm_std::Empty>> {
    Box::new(ContractWrapper::new(
        mock_transceiver::execute,
        mock_transceiver::instantiate,
        mock_transceiver::query,
    ))
}

fn contract_mock_handler() -> Box<dyn Contract<cosmwasm_std::Empty>> {
    Box::new(ContractWrapper::new(
        mock_handler::execute,
        mock_handler::instantiate,
        mock_handler::query,
    ))
}

pub struct TestEnv {
    pub app: App,
    pub aggregator: Addr,
    pub handler: Addr,
    pub transceivers: Vec<Addr>,
    pub admin: Addr,
    pub anyone: Addr,
}

/// One transceiver quoting 100, handler threshold 1.
pub fn setup() -> TestEnv {
    setup_with(1, &[100])
}

pub fn setup_with(threshold: u8, transceiver_prices: &[u128]) -> TestEnv {
    let mut app: App<_, MockApiBech32> = AppBuilder::new()
        .with_api(MockApiBech32::new("cosmwasm"))
        .with_wasm(WasmKeeper::default().with_address_generator(MockAddressGenerator))
        .build(|_, _, _| {});
    let admin = app.api().addr_make("admin");
    let anyone = app.api().addr_make("anyone");

    app.init_modules(|router, _, storage| {
        router
            .bank
            .init_balance(storage, &admin, coins(1_000_000_000, FEE_DENOM))
            .unwrap();
        router
            .bank
            .init_balance(storage, &anyone, coins(1_000_000_000, FEE_DENOM))
            .unwrap();
    });

    let aggregator_code = app.store_code(contract_aggregator());
    let handler_code = app.store_code(contract_mock_handler());
    let transceiver_code = app.store_code(contract_mock_transceiver());

    let aggregator = app
        .instantiate_contract(
            aggregator_code,
            admin.clone(),
            &InstantiateMsg {
                fee_denom: FEE_DENOM.to_string(),
            },
            &[],
            "transceiver-manager",
            None,
        )
        .unwrap();

    let handler = app
        .instantiate_contract(
            handler_code,
            admin.clone(),
            &mock_handler::InstantiateMsg { threshold },
            &[],
            "mock-handler",
            None,
        )
        .unwrap();

    app.execute_contract(
        admin.clone(),
        handler.clone(),
        &mock_handler::ExecuteMsg::Register {
            aggregator: aggregator.to_string(),
            admin: admin.to_string(),
        },
        &[],
    )
    .unwrap();

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
        app.execute_contract(
            admin.clone(),
            aggregator.clone(),
            &ExecuteMsg::AddTransceiver {
                handler: handler.to_string(),
                transceiver: transceiver.to_string(),
            },
            &[],
        )
        .unwrap();
        transceivers.push(transceiver);
    }

    TestEnv {
        app,
        aggregator,
        handler,
        transceivers,
        admin,
        anyone,
    }
}

impl TestEnv {
    /// Build an envelope addressed to the mock handler.
    pub fn envelope(&self, id_byte: u8) -> Binary {
        self.envelope_from_source(id_byte, [0x11; 32])
    }

    pub fn envelope_from_source(&self, id_byte: u8, source_manager: [u8; 32]) -> Binary {
        let envelope = TransceiverEnvelope {
            source_manager,
            recipient_manager: to_universal(self.app.api(), &self.handler).unwrap(),
            message: ManagerMessage {
                id: [id_byte; 32],
                sender: [0x55; 32],
                payload: vec![0xEE; 16],
            },
        };
        Binary::from(envelope.encode().unwrap())
    }

    /// An envelope the handler itself can send (source = handler).
    pub fn outbound_envelope(&self, id_byte: u8) -> Binary {
        self.envelope_from_source(
            id_byte,
            to_universal(self.app.api(), &self.handler).unwrap(),
        )
    }

    pub fn deliver(
        &mut self,
        transceiver_index: usize,
        message: &Binary,
    ) -> anyhow::Result<AppResponse> {
        self.app.execute_contract(
            self.anyone.clone(),
            self.transceivers[transceiver_index].clone(),
            &mock_transceiver::ExecuteMsg::Deliver {
                aggregator: self.aggregator.to_string(),
                source_chain: SOURCE_CHAIN,
                message: message.clone(),
            },
            &[],
        )
    }

    pub fn execute_message(&mut self, message: &Binary) -> anyhow::Result<AppResponse> {
        self.app.execute_contract(
            self.anyone.clone(),
            self.aggregator.clone(),
            &ExecuteMsg::ExecuteMessage {
                source_chain: SOURCE_CHAIN,
                message: message.clone(),
            },
            &[],
        )
    }

    pub fn handler_info(&self) -> HandlerResponse {
        self.app
            .wrap()
            .query_wasm_smart(
                &self.aggregator,
                &QueryMsg::Handler {
                    handler: self.handler.to_string(),
                },
            )
            .unwrap()
    }

    pub fn received_count(&self) -> u64 {
        let response: mock_handler::ReceivedResponse = self
            .app
            .wrap()
            .query_wasm_smart(&self.handler, &mock_handler::QueryMsg::Received {})
            .unwrap();
        response.count
    }

    pub fn fee_balance(&self, addr: &Addr) -> Uint128 {
        self.app.wrap().query_balance(addr, FEE_DENOM).unwrap().amount
    }
}

/// Extract an attribute from the flat wasm events of a response.
pub fn wasm_attr(res: &AppResponse, key: &str) -> Option<String> {
    res.events
        .iter()
        .filter(|e| e.ty == "wasm")
        .flat_map(|e| &e.attributes)
        .find(|a| a.key == key)
        .map(|a| a.value.clone())
}
