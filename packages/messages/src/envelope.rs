//! The transceiver envelope and the manager message it carries.
//!
//! The envelope is what an attestation channel actually transports:
//!
//! ```text
//! offset  size   field
//! 0       4      prefix = 0x9945FF10
//! 4       32     source_manager (sending handler on the source chain)
//! 36      32     recipient_manager (target handler on the destination chain)
//! 68      2      manager message length
//! 70      ?      manager message = id(32) || sender(32) || len(2) || payload
//! ?       2      transceiver payload length (zero)
//! ```
//!
//! The digest over a received envelope is the attestation key: two
//! semantically distinct messages must never collide.

use crate::error::CodecError;
use crate::hash::keccak256_parts;

/// Envelope prefix
pub const ENVELOPE_PREFIX: [u8; 4] = [0x99, 0x45, 0xFF, 0x10];

/// A message emitted by a handler, wrapped for transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagerMessage {
    /// 32-byte message id assigned by the sending manager
    pub id: [u8; 32],
    /// Universal address of the user who initiated the message
    pub sender: [u8; 32],
    /// Handler-specific payload (a native token transfer for the manager)
    pub payload: Vec<u8>,
}

impl ManagerMessage {
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let len = u16::try_from(self.payload.len())
            .map_err(|_| CodecError::PayloadTooLong {
                len: self.payload.len(),
            })?;
        let mut data = Vec::with_capacity(66 + self.payload.len());
        data.extend_from_slice(&self.id);
        data.extend_from_slice(&self.sender);
        data.extend_from_slice(&len.to_be_bytes());
        data.extend_from_slice(&self.payload);
        Ok(data)
    }

    pub fn decode(data: &[u8]) -> Result<Self, CodecError> {
        let mut reader = Reader::new(data);
        let id = reader.read_bytes32()?;
        let sender = reader.read_bytes32()?;
        let len = reader.read_u16()?;
        let payload = reader.read_slice(usize::from(len))?.to_vec();
        reader.finish()?;
        Ok(Self { id, sender, payload })
    }
}

/// The envelope fanned out to transceivers and received back as attestations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransceiverEnvelope {
    /// Universal address of the sending handler
    pub source_manager: [u8; 32],
    /// Universal address of the target handler on the destination chain
    pub recipient_manager: [u8; 32],
    /// The wrapped handler message
    pub message: ManagerMessage,
}

impl TransceiverEnvelope {
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let message = self.message.encode()?;
        let len = u16::try_from(message.len())
            .map_err(|_| CodecError::PayloadTooLong { len: message.len() })?;
        let mut data = Vec::with_capacity(72 + message.len());
        data.extend_from_slice(&ENVELOPE_PREFIX);
        data.extend_from_slice(&self.source_manager);
        data.extend_from_slice(&self.recipient_manager);
        data.extend_from_slice(&len.to_be_bytes());
        data.extend_from_slice(&message);
        // no transceiver-specific payload
        data.extend_from_slice(&0u16.to_be_bytes());
        Ok(data)
    }

    pub fn decode(data: &[u8]) -> Result<Self, CodecError> {
        let mut reader = Reader::new(data);
        let prefix = reader.read_slice(4)?;
        if prefix != ENVELOPE_PREFIX {
            return Err(CodecError::IncorrectPrefix {
                expected: hex::encode(ENVELOPE_PREFIX),
                got: hex::encode(prefix),
            });
        }
        let source_manager = reader.read_bytes32()?;
        let recipient_manager = reader.read_bytes32()?;
        let message_len = reader.read_u16()?;
        let message = ManagerMessage::decode(reader.read_slice(usize::from(message_len))?)?;
        let transceiver_len = reader.read_u16()?;
        reader.read_slice(usize::from(transceiver_len))?;
        reader.finish()?;
        Ok(Self {
            source_manager,
            recipient_manager,
            message,
        })
    }
}

/// Attestation key for a received envelope.
///
/// `keccak256(id || sender || source_chain || source_manager ||
/// recipient_manager || payload)`
pub fn message_digest(source_chain: u16, envelope: &TransceiverEnvelope) -> [u8; 32] {
    keccak256_parts(&[
        &envelope.message.id,
        &envelope.message.sender,
        &source_chain.to_be_bytes(),
        &envelope.source_manager,
        &envelope.recipient_manager,
        &envelope.message.payload,
    ])
}

struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn read_slice(&mut self, len: usize) -> Result<&'a [u8], CodecError> {
        let data = self.data;
        let end = self.offset.checked_add(len).filter(|end| *end <= data.len());
        let end = end.ok_or(CodecError::UnexpectedEnd {
            offset: self.offset,
            need: len,
            have: data.len().saturating_sub(self.offset),
        })?;
        let slice = &data[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    fn read_bytes32(&mut self) -> Result<[u8; 32], CodecError> {
        let slice = self.read_slice(32)?;
        let mut out = [0u8; 32];
        out.copy_from_slice(slice);
        Ok(out)
    }

    fn read_u16(&mut self) -> Result<u16, CodecError> {
        let slice = self.read_slice(2)?;
        Ok(u16::from_be_bytes([slice[0], slice[1]]))
    }

    fn finish(&self) -> Result<(), CodecError> {
        if self.offset != self.data.len() {
            return Err(CodecError::TrailingBytes {
                count: self.data.len() - self.offset,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::NativeTokenTransfer;
    use crate::trimmed_amount::TrimmedAmount;

    fn sample() -> TransceiverEnvelope {
        let payload = NativeTokenTransfer {
            amount: TrimmedAmount::new(500, 2),
            source_token: [0u8; 32],
            recipient: [0x11; 32],
            to_chain: 1,
        };
        TransceiverEnvelope {
            source_manager: [0x22; 32],
            recipient_manager: [0x33; 32],
            message: ManagerMessage {
                id: [0x44; 32],
                sender: [0x55; 32],
                payload: payload.write_to().to_vec(),
            },
        }
    }

    #[test]
    fn round_trip() {
        let envelope = sample();
        let bytes = envelope.encode().unwrap();
        assert_eq!(TransceiverEnvelope::decode(&bytes).unwrap(), envelope);
    }

    #[test]
    fn length_fields_are_computed() {
        let envelope = sample();
        let bytes = envelope.encode().unwrap();
        // manager message: 32 + 32 + 2 + 79 bytes
        assert_eq!(u16::from_be_bytes([bytes[68], bytes[69]]), 145);
        // trailing transceiver payload length is zero
        assert_eq!(&bytes[bytes.len() - 2..], &[0, 0]);
    }

    #[test]
    fn rejects_wrong_prefix() {
        let mut bytes = sample().encode().unwrap();
        bytes[3] = 0x11;
        assert!(matches!(
            TransceiverEnvelope::decode(&bytes),
            Err(CodecError::IncorrectPrefix { .. })
        ));
    }

    #[test]
    fn rejects_truncation_and_trailing_bytes() {
        let bytes = sample().encode().unwrap();
        assert!(matches!(
            TransceiverEnvelope::decode(&bytes[..bytes.len() - 3]),
            Err(CodecError::UnexpectedEnd { .. })
        ));
        let mut long = bytes.clone();
        long.push(7);
        assert!(matches!(
            TransceiverEnvelope::decode(&long),
            Err(CodecError::TrailingBytes { count: 1 })
        ));
    }

    #[test]
    fn digest_distinguishes_messages() {
        let envelope = sample();
        let mut other_id = envelope.clone();
        other_id.message.id = [0x45; 32];
        let mut other_source = envelope.clone();
        other_source.source_manager = [0x23; 32];

        let base = message_digest(7, &envelope);
        assert_ne!(base, message_digest(8, &envelope));
        assert_ne!(base, message_digest(7, &other_id));
        assert_ne!(base, message_digest(7, &other_source));
        // identical inputs agree
        assert_eq!(base, message_digest(7, &sample()));
    }
}
