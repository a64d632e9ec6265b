//! Status code records for [`TransactionOutcome`]s.
//!
//! An outcome is stored as a status code plus a description. Status codes
//! `0..=255` are user error codes, and the two codes right above that range
//! mark the outcomes the execution engine assigns itself. On the wire a
//! record is the RLP list `[status, description]`.

use log::trace;
use rlp::{Decodable, DecoderError, Rlp};
use rlp_derive::RlpEncodable;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::outcome::{TransactionOutcome, MAX_USER_DEFINED_ERROR_CODE};

/// Status code of a successfully applied transaction.
pub const SUCCESS_STATUS: u16 = 256;

/// Status code of a transaction that failed unexpectedly.
pub const UNEXPECTED_ERROR_STATUS: u16 = 257;

/// Errors encountered when decoding an [`OutcomeRecord`].
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum OutcomeCodecError {
    /// The status is neither a user error code nor one of the reserved codes.
    #[error("Transaction outcome record has an invalid status code: {0} (expected 0..=257)")]
    InvalidStatus(u16),

    /// The bytes are not an RLP encoded record.
    #[error("Unable to decode a transaction outcome record: {0}")]
    Rlp(#[from] rlp::DecoderError),
}

/// The persisted form of a [`TransactionOutcome`].
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, RlpEncodable, Serialize)]
pub struct OutcomeRecord {
    /// A user error code, [`SUCCESS_STATUS`] or [`UNEXPECTED_ERROR_STATUS`].
    pub status: u16,

    /// The error description, empty on success.
    pub description: String,
}

impl Decodable for OutcomeRecord {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        if rlp.item_count()? != 2 {
            return Err(DecoderError::RlpIncorrectListLen);
        }

        Ok(Self {
            status: rlp.val_at(0)?,
            description: rlp.val_at(1)?,
        })
    }
}

impl From<&TransactionOutcome> for OutcomeRecord {
    fn from(outcome: &TransactionOutcome) -> Self {
        let (status, description) = match outcome {
            TransactionOutcome::Success => (SUCCESS_STATUS, String::new()),
            TransactionOutcome::UserError(code, description) => {
                (u16::from(*code), description.clone())
            }
            TransactionOutcome::UnexpectedError(description) => {
                (UNEXPECTED_ERROR_STATUS, description.clone())
            }
        };

        Self {
            status,
            description,
        }
    }
}

impl TryFrom<OutcomeRecord> for TransactionOutcome {
    type Error = OutcomeCodecError;

    fn try_from(record: OutcomeRecord) -> Result<Self, Self::Error> {
        let OutcomeRecord {
            status,
            description,
        } = record;

        match status {
            // The range check makes the cast lossless.
            code @ 0..=MAX_USER_DEFINED_ERROR_CODE => Ok(Self::UserError(code as u8, description)),
            // Any description stored alongside a success is not part of the
            // outcome.
            SUCCESS_STATUS => Ok(Self::Success),
            UNEXPECTED_ERROR_STATUS => Ok(Self::UnexpectedError(description)),
            _ => {
                trace!("Rejecting transaction outcome record with status {}", status);
                Err(OutcomeCodecError::InvalidStatus(status))
            }
        }
    }
}

/// Decodes a single RLP item that must span all of `bytes`.
pub(crate) fn decode_exact<T: Decodable>(bytes: &[u8]) -> Result<T, DecoderError> {
    let rlp = Rlp::new(bytes);
    if rlp.payload_info()?.total() != bytes.len() {
        return Err(DecoderError::RlpIsTooBig);
    }

    rlp.as_val()
}

/// Converts `outcome` into its status code record.
pub fn encode(outcome: &TransactionOutcome) -> OutcomeRecord {
    outcome.into()
}

/// Converts a status code record back into an outcome.
pub fn decode(record: OutcomeRecord) -> Result<TransactionOutcome, OutcomeCodecError> {
    record.try_into()
}

/// RLP encodes the record of `outcome`.
pub fn to_bytes(outcome: &TransactionOutcome) -> Vec<u8> {
    rlp::encode(&encode(outcome)).to_vec()
}

/// Decodes bytes produced by [`to_bytes`].
///
/// Fails unless `bytes` hold exactly one RLP list of two items.
pub fn from_bytes(bytes: &[u8]) -> Result<TransactionOutcome, OutcomeCodecError> {
    decode(decode_exact(bytes)?)
}
