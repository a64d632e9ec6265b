//! The raw transaction envelope outcomes are recorded for.

use bytes::Bytes;
use ethereum_types::H256;
use rlp::{Decodable, DecoderError, Rlp};
use rlp_derive::RlpEncodable;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::codec::decode_exact;

/// Errors encountered when building a [`RawTransaction`].
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
pub enum RawTransactionError {
    /// At least one required field was never set. Lists every missing field.
    #[error("Following field(s) are required but weren't set: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

/// A transaction as exchanged between nodes: the service it belongs to, the
/// transaction type within that service and an opaque payload.
///
/// On the wire a transaction is the RLP list
/// `[service_id, transaction_id, payload]`.
#[derive(Clone, Debug, Eq, Hash, PartialEq, RlpEncodable)]
pub struct RawTransaction {
    service_id: u16,
    transaction_id: u16,
    payload: Bytes,
}

impl RawTransaction {
    /// Starts building a transaction. All fields are required.
    pub fn builder() -> RawTransactionBuilder {
        RawTransactionBuilder::default()
    }

    /// The service the transaction belongs to.
    pub const fn service_id(&self) -> u16 {
        self.service_id
    }

    /// The transaction type within its service.
    pub const fn transaction_id(&self) -> u16 {
        self.transaction_id
    }

    /// The transaction payload.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// SHA-256 of the payload.
    pub fn hash(&self) -> H256 {
        H256::from_slice(Sha256::digest(&self.payload).as_slice())
    }

    /// RLP encodes the transaction.
    pub fn to_bytes(&self) -> Vec<u8> {
        rlp::encode(self).to_vec()
    }

    /// Decodes bytes produced by [`RawTransaction::to_bytes`]. Trailing bytes
    /// and lists of any other shape are rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecoderError> {
        decode_exact(bytes)
    }
}

impl Decodable for RawTransaction {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        if rlp.item_count()? != 3 {
            return Err(DecoderError::RlpIncorrectListLen);
        }

        Ok(Self {
            service_id: rlp.val_at(0)?,
            transaction_id: rlp.val_at(1)?,
            payload: rlp.val_at(2)?,
        })
    }
}

/// Builds a [`RawTransaction`]. Consumed by [`RawTransactionBuilder::build`].
#[derive(Clone, Debug, Default)]
pub struct RawTransactionBuilder {
    service_id: Option<u16>,
    transaction_id: Option<u16>,
    payload: Option<Bytes>,
}

impl RawTransactionBuilder {
    /// Sets the service the transaction belongs to.
    pub fn service_id(mut self, service_id: u16) -> Self {
        self.service_id = Some(service_id);
        self
    }

    /// Sets the transaction type within its service.
    pub fn transaction_id(mut self, transaction_id: u16) -> Self {
        self.transaction_id = Some(transaction_id);
        self
    }

    /// Sets the payload.
    pub fn payload(mut self, payload: impl Into<Bytes>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Creates the transaction.
    ///
    /// Returns an error naming every field that was not set.
    pub fn build(self) -> Result<RawTransaction, RawTransactionError> {
        match (self.service_id, self.transaction_id, self.payload) {
            (Some(service_id), Some(transaction_id), Some(payload)) => Ok(RawTransaction {
                service_id,
                transaction_id,
                payload,
            }),
            (service_id, transaction_id, payload) => {
                let missing = [
                    ("service_id", service_id.is_none()),
                    ("transaction_id", transaction_id.is_none()),
                    ("payload", payload.is_none()),
                ]
                .into_iter()
                .filter_map(|(name, is_missing)| is_missing.then_some(name))
                .collect();

                Err(RawTransactionError::MissingFields(missing))
            }
        }
    }
}
