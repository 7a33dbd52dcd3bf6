//! The native token transfer payload.
//!
//! Fixed 79-byte layout, big-endian throughout:
//!
//! ```text
//! offset  size   field
//! 0       4      prefix = 0x994E5454 ("NTT")
//! 4       1      from_decimals
//! 5       8      from_amount (trimmed, u64)
//! 13      32     source_token (all-zeros is conventional)
//! 45      32     recipient
//! 77      2      to_chain
//! ```

use crate::error::CodecError;
use crate::trimmed_amount::TrimmedAmount;

/// Payload prefix: 0x99 followed by ASCII "NTT"
pub const NTT_PREFIX: [u8; 4] = [0x99, 0x4E, 0x54, 0x54];

/// Total encoded size in bytes
pub const NATIVE_TOKEN_TRANSFER_LEN: usize = 79;

/// A token movement between a local chain and a remote peer chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeTokenTransfer {
    /// Amount at wire precision
    pub amount: TrimmedAmount,
    /// Token address on the source chain (all-zeros conventional)
    pub source_token: [u8; 32],
    /// Recipient address on the destination chain
    pub recipient: [u8; 32],
    /// Destination chain id
    pub to_chain: u16,
}

impl NativeTokenTransfer {
    pub fn write_to(&self) -> [u8; NATIVE_TOKEN_TRANSFER_LEN] {
        let mut data = [0u8; NATIVE_TOKEN_TRANSFER_LEN];
        data[0..4].copy_from_slice(&NTT_PREFIX);
        data[4] = self.amount.decimals;
        data[5..13].copy_from_slice(&self.amount.amount.to_be_bytes());
        data[13..45].copy_from_slice(&self.source_token);
        data[45..77].copy_from_slice(&self.recipient);
        data[77..79].copy_from_slice(&self.to_chain.to_be_bytes());
        data
    }

    pub fn read_from(data: &[u8]) -> Result<Self, CodecError> {
        if data.len() < NATIVE_TOKEN_TRANSFER_LEN {
            return Err(CodecError::UnexpectedEnd {
                offset: 0,
                need: NATIVE_TOKEN_TRANSFER_LEN,
                have: data.len(),
            });
        }
        if data[0..4] != NTT_PREFIX {
            return Err(CodecError::IncorrectPrefix {
                expected: hex::encode(NTT_PREFIX),
                got: hex::encode(&data[0..4]),
            });
        }
        if data.len() > NATIVE_TOKEN_TRANSFER_LEN {
            return Err(CodecError::TrailingBytes {
                count: data.len() - NATIVE_TOKEN_TRANSFER_LEN,
            });
        }

        let decimals = data[4];
        let mut amount = [0u8; 8];
        amount.copy_from_slice(&data[5..13]);
        let mut source_token = [0u8; 32];
        source_token.copy_from_slice(&data[13..45]);
        let mut recipient = [0u8; 32];
        recipient.copy_from_slice(&data[45..77]);
        let to_chain = u16::from_be_bytes([data[77], data[78]]);

        Ok(Self {
            amount: TrimmedAmount::new(u64::from_be_bytes(amount), decimals),
            source_token,
            recipient,
            to_chain,
        })
    }
}
