use cosmwasm_std::{OverflowError, StdError};
use cw_utils::PaymentError;
use streampay_types::stream::StreamError;
use streampay_utils::payment_checker::CustomPaymentError;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("{0}")]
    Payment(#[from] PaymentError),

    #[error("{0}")]
    CustomPayment(#[from] CustomPaymentError),

    #[error("{0}")]
    Stream(#[from] StreamError),

    #[error("Unauthorized")]
    Unauthorized {},

    #[error("Contract is frozen")]
    ContractIsFrozen {},

    #[error("Stream {stream_id} not found")]
    StreamNotFound { stream_id: u64 },

    #[error("Stream {stream_id} already exists")]
    StreamAlreadyExists { stream_id: u64 },

    #[error("Stream id {stream_id} belonged to a closed stream and cannot be reused")]
    StreamIdRetired { stream_id: u64 },

    #[error("Stream id must be provided")]
    MissingStreamId {},

    #[error("Stream ids are assigned by the ledger")]
    UnexpectedStreamId {},

    #[error("Batch must contain at least one stream")]
    EmptyBatch {},

    #[error("Cannot migrate from different contract type: {previous_contract}")]
    CannotMigrate { previous_contract: String },
}
