//! Solana transaction wire format.
//!
//! Wallets that can only sign transactions prove ownership by signing a
//! transaction whose last instruction carries the challenge. This module parses
//! just enough of the wire format to check that proof:
//!
//! ```text
//! transaction := shortvec<signature[64]> message
//! message     := [version prefix] header shortvec<key[32]> blockhash[32]
//!                shortvec<instruction> [v0: shortvec<address table lookup>]
//! header      := num_required_signatures num_readonly_signed num_readonly_unsigned
//! instruction := program_id_index shortvec<u8 account index> shortvec<u8 data>
//! ```
//!
//! A `shortvec` length is a compact-u16: 7 bits per byte, little-endian, at
//! most 3 bytes, minimal encoding only.

use thiserror::Error;

/// Length of an ed25519 signature.
pub const SIGNATURE_LEN: usize = 64;

/// Length of a public key or blockhash.
pub const KEY_LEN: usize = 32;

const VERSION_PREFIX_MASK: u8 = 0x80;

/// Errors from parsing transaction bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    /// The input ended before a field was complete.
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// A compact-u16 length was overlong or out of range.
    #[error("invalid compact-u16 length")]
    InvalidLength,

    /// The message version is not supported.
    #[error("unsupported message version: {0}")]
    UnsupportedVersion(u8),

    /// Bytes remained after the message.
    #[error("{0} trailing bytes after message")]
    TrailingBytes(usize),
}

/// Result type for transaction parsing.
pub type Result<T> = std::result::Result<T, TransactionError>;

/// Message format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageVersion {
    /// Unprefixed legacy message.
    Legacy,
    /// Version 0, with address table lookups.
    V0,
}

/// Message header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
    /// Number of leading account keys that must sign.
    pub num_required_signatures: u8,
    /// Signed accounts that are read-only.
    pub num_readonly_signed_accounts: u8,
    /// Unsigned accounts that are read-only.
    pub num_readonly_unsigned_accounts: u8,
}

/// An instruction referencing accounts by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    /// Index of the program account.
    pub program_id_index: u8,
    /// Indexes of the instruction's accounts.
    pub accounts: Vec<u8>,
    /// Opaque instruction payload.
    pub data: Vec<u8>,
}

/// A v0 address lookup table reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressTableLookup {
    /// The lookup table account.
    pub account_key: [u8; KEY_LEN],
    /// Writable entries loaded from the table.
    pub writable_indexes: Vec<u8>,
    /// Read-only entries loaded from the table.
    pub readonly_indexes: Vec<u8>,
}

/// A transaction message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Wire version.
    pub version: MessageVersion,
    /// Header.
    pub header: MessageHeader,
    /// Static account keys; signers first.
    pub account_keys: Vec<[u8; KEY_LEN]>,
    /// Recent blockhash.
    pub recent_blockhash: [u8; KEY_LEN],
    /// Instructions, in execution order.
    pub instructions: Vec<CompiledInstruction>,
    /// Address table lookups (always empty for legacy messages).
    pub address_table_lookups: Vec<AddressTableLookup>,
}

/// A signed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// Signatures, one per required signer.
    pub signatures: Vec<[u8; SIGNATURE_LEN]>,
    /// The signed message.
    pub message: Message,
    message_bytes: Vec<u8>,
}

impl Transaction {
    /// Parse a serialized transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not exactly one well-formed
    /// transaction.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);

        let signature_count = reader.read_compact_u16()?;
        let capacity = usize::from(signature_count).min(reader.remaining() / SIGNATURE_LEN);
        let mut signatures = Vec::with_capacity(capacity);
        for _ in 0..signature_count {
            signatures.push(reader.read_array::<SIGNATURE_LEN>()?);
        }

        let message_start = reader.position();
        let message = Message::read(&mut reader)?;
        if reader.remaining() > 0 {
            return Err(TransactionError::TrailingBytes(reader.remaining()));
        }

        Ok(Self {
            signatures,
            message,
            message_bytes: bytes[message_start..].to_vec(),
        })
    }

    /// The serialized message, which is what each signature signs.
    #[must_use]
    pub fn message_bytes(&self) -> &[u8] {
        &self.message_bytes
    }

    /// The account key expected to produce signature `index`.
    #[must_use]
    pub fn signer(&self, index: usize) -> Option<&[u8; KEY_LEN]> {
        (index < usize::from(self.message.header.num_required_signatures))
            .then(|| self.message.account_keys.get(index))
            .flatten()
    }
}

impl Message {
    fn read(reader: &mut Reader<'_>) -> Result<Self> {
        let first = reader.read_u8()?;
        let (version, num_required_signatures) = if first & VERSION_PREFIX_MASK == 0 {
            (MessageVersion::Legacy, first)
        } else {
            match first & !VERSION_PREFIX_MASK {
                0 => (MessageVersion::V0, reader.read_u8()?),
                other => return Err(TransactionError::UnsupportedVersion(other)),
            }
        };

        let header = MessageHeader {
            num_required_signatures,
            num_readonly_signed_accounts: reader.read_u8()?,
            num_readonly_unsigned_accounts: reader.read_u8()?,
        };

        let key_count = reader.read_compact_u16()?;
        let account_keys = (0..key_count)
            .map(|_| reader.read_array::<KEY_LEN>())
            .collect::<Result<Vec<_>>>()?;

        let recent_blockhash = reader.read_array::<KEY_LEN>()?;

        let instruction_count = reader.read_compact_u16()?;
        let instructions = (0..instruction_count)
            .map(|_| -> Result<CompiledInstruction> {
                Ok(CompiledInstruction {
                    program_id_index: reader.read_u8()?,
                    accounts: reader.read_short_vec()?,
                    data: reader.read_short_vec()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let address_table_lookups = match version {
            MessageVersion::Legacy => Vec::new(),
            MessageVersion::V0 => {
                let lookup_count = reader.read_compact_u16()?;
                (0..lookup_count)
                    .map(|_| -> Result<AddressTableLookup> {
                        Ok(AddressTableLookup {
                            account_key: reader.read_array::<KEY_LEN>()?,
                            writable_indexes: reader.read_short_vec()?,
                            readonly_indexes: reader.read_short_vec()?,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?
            }
        };

        Ok(Self {
            version,
            header,
            account_keys,
            recent_blockhash,
            instructions,
            address_table_lookups,
        })
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    const fn position(&self) -> usize {
        self.pos
    }

    const fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(TransactionError::UnexpectedEof)?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut array = [0; N];
        array.copy_from_slice(self.read_bytes(N)?);
        Ok(array)
    }

    fn read_short_vec(&mut self) -> Result<Vec<u8>> {
        let len = self.read_compact_u16()?;
        Ok(self.read_bytes(usize::from(len))?.to_vec())
    }

    fn read_compact_u16(&mut self) -> Result<u16> {
        let mut value: u32 = 0;
        for i in 0..3 {
            let byte = self.read_u8()?;
            value |= u32::from(byte & 0x7f) << (i * 7);
            if byte & 0x80 == 0 {
                // A zero continuation byte means a non-minimal encoding.
                if byte == 0 && i > 0 {
                    return Err(TransactionError::InvalidLength);
                }
                return u16::try_from(value).map_err(|_| TransactionError::InvalidLength);
            }
        }
        Err(TransactionError::InvalidLength)
    }
}

#[cfg(any(test, feature = "test-utils"))]
mod encode {
    use ed25519_dalek::{Signer, SigningKey};

    use super::{Message, MessageVersion, Transaction, VERSION_PREFIX_MASK};

    #[allow(clippy::cast_possible_truncation)]
    fn write_compact_u16(out: &mut Vec<u8>, len: usize) {
        let mut value = u16::try_from(len).unwrap_or(u16::MAX);
        loop {
            let mut byte = (value & 0x7f) as u8;
            value >>= 7;
            if value == 0 {
                out.push(byte);
                return;
            }
            byte |= 0x80;
            out.push(byte);
        }
    }

    fn write_short_vec(out: &mut Vec<u8>, bytes: &[u8]) {
        write_compact_u16(out, bytes.len());
        out.extend_from_slice(bytes);
    }

    impl Message {
        /// A legacy message with `signers` as the required signers and one
        /// instruction carrying `data`.
        #[must_use]
        pub fn with_payload(signers: &[[u8; 32]], program: [u8; 32], data: &[u8]) -> Self {
            let mut account_keys = signers.to_vec();
            account_keys.push(program);
            let program_id_index = u8::try_from(signers.len()).unwrap_or(u8::MAX);

            Self {
                version: MessageVersion::Legacy,
                header: super::MessageHeader {
                    num_required_signatures: program_id_index,
                    num_readonly_signed_accounts: 0,
                    num_readonly_unsigned_accounts: 1,
                },
                account_keys,
                recent_blockhash: [0x42; 32],
                instructions: vec![super::CompiledInstruction {
                    program_id_index,
                    accounts: (0..program_id_index).collect(),
                    data: data.to_vec(),
                }],
                address_table_lookups: Vec::new(),
            }
        }

        /// Serialize to wire format.
        #[must_use]
        pub fn to_bytes(&self) -> Vec<u8> {
            let mut out = Vec::new();
            if self.version == MessageVersion::V0 {
                out.push(VERSION_PREFIX_MASK);
            }
            out.push(self.header.num_required_signatures);
            out.push(self.header.num_readonly_signed_accounts);
            out.push(self.header.num_readonly_unsigned_accounts);

            write_compact_u16(&mut out, self.account_keys.len());
            for key in &self.account_keys {
                out.extend_from_slice(key);
            }
            out.extend_from_slice(&self.recent_blockhash);

            write_compact_u16(&mut out, self.instructions.len());
            for instruction in &self.instructions {
                out.push(instruction.program_id_index);
                write_short_vec(&mut out, &instruction.accounts);
                write_short_vec(&mut out, &instruction.data);
            }

            if self.version == MessageVersion::V0 {
                write_compact_u16(&mut out, self.address_table_lookups.len());
                for lookup in &self.address_table_lookups {
                    out.extend_from_slice(&lookup.account_key);
                    write_short_vec(&mut out, &lookup.writable_indexes);
                    write_short_vec(&mut out, &lookup.readonly_indexes);
                }
            }
            out
        }
    }

    impl Transaction {
        /// Sign `message` with each key in order.
        #[must_use]
        pub fn signed(message: Message, signers: &[&SigningKey]) -> Self {
            let message_bytes = message.to_bytes();
            let signatures = signers
                .iter()
                .map(|key| key.sign(&message_bytes).to_bytes())
                .collect();
            Self {
                signatures,
                message,
                message_bytes,
            }
        }

        /// Serialize to wire format.
        #[must_use]
        pub fn to_bytes(&self) -> Vec<u8> {
            let mut out = Vec::new();
            write_compact_u16(&mut out, self.signatures.len());
            for signature in &self.signatures {
                out.extend_from_slice(signature);
            }
            out.extend_from_slice(&self.message_bytes);
            out
        }
    }

}
