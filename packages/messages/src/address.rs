//! Universal cross-chain address encoding.
//!
//! All addresses cross the chain boundary as opaque 32-byte values. For local
//! addresses the universal form is the canonical address left-padded to 32
//! bytes; remote addresses are never decoded locally. Decoding tries the full
//! 32-byte canonical first and falls back to the 20-byte tail for chains with
//! short canonical addresses.

use cosmwasm_std::{Addr, Api, CanonicalAddr, StdError, StdResult};

/// Encode a local address into its 32-byte universal form.
pub fn to_universal(api: &dyn Api, addr: &Addr) -> StdResult<[u8; 32]> {
    let canonical = api.addr_canonicalize(addr.as_str())?;
    let bytes = canonical.as_slice();
    if bytes.len() > 32 {
        return Err(StdError::generic_err(format!(
            "Canonical address too long for universal encoding: {} bytes",
            bytes.len()
        )));
    }
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(bytes);
    Ok(out)
}

/// Decode a 32-byte universal address back into a local address.
pub fn from_universal(api: &dyn Api, bytes: &[u8; 32]) -> StdResult<Addr> {
    if let Ok(addr) = api.addr_humanize(&CanonicalAddr::from(bytes.as_slice())) {
        return Ok(addr);
    }
    if bytes[..12].iter().all(|byte| *byte == 0) {
        if let Ok(addr) = api.addr_humanize(&CanonicalAddr::from(&bytes[12..])) {
            return Ok(addr);
        }
    }
    Err(StdError::generic_err(
        "Universal address is not a local address",
    ))
}

/// Whether a universal address is the all-zeros value.
pub fn is_zero_address(bytes: &[u8; 32]) -> bool {
    bytes.iter().all(|byte| *byte == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cw_multi_test::MockApiBech32;

    #[test]
    fn round_trip_local_address() {
        let api = MockApiBech32::new("cosmwasm");
        let addr = api.addr_make("alice");
        let universal = to_universal(&api, &addr).unwrap();
        assert_eq!(from_universal(&api, &universal).unwrap(), addr);
    }

    #[test]
    fn distinct_addresses_encode_differently() {
        let api = MockApiBech32::new("cosmwasm");
        let alice = to_universal(&api, &api.addr_make("alice")).unwrap();
        let bob = to_universal(&api, &api.addr_make("bob")).unwrap();
        assert_ne!(alice, bob);
    }

    #[test]
    fn zero_address_detection() {
        assert!(is_zero_address(&[0u8; 32]));
        let mut nonzero = [0u8; 32];
        nonzero[31] = 1;
        assert!(!is_zero_address(&nonzero));
    }
}
