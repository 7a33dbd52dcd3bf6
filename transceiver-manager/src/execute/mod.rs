//! Execute message handlers, split by concern:
//! - `handlers` - handler registration, transceiver sets, pause switch
//! - `send` - outbound fan-out with fee splitting
//! - `attestation` - attestation accounting and threshold-gated execution

mod attestation;
mod handlers;
mod send;

pub use attestation::{execute_attestation_received, execute_execute_message};
pub use handlers::{
    execute_add_transceiver, execute_register_handler, execute_remove_transceiver,
    execute_set_handler_paused,
};
pub use send::{execute_send_message, quote_delivery_prices, validate_instructions};
