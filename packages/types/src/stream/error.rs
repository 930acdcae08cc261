use cosmwasm_std::{CheckedFromRatioError, CheckedMultiplyRatioError, OverflowError, Uint128};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum StreamError {
    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("{0}")]
    CheckedMultiplyRatio(#[from] CheckedMultiplyRatioError),

    #[error("{0}")]
    CheckedFromRatio(#[from] CheckedFromRatioError),

    #[error("Stream amount must be greater than zero")]
    InvalidAmount {},

    #[error("Stream end time must be after start time and respect the minimum duration")]
    InvalidDuration {},

    #[error("Only the recipient can claim from this stream")]
    NotRecipient {},

    #[error("Only the sender can cancel this stream")]
    NotSender {},

    #[error("Nothing to claim yet")]
    NothingToClaim {},

    #[error("Claim amount cannot be zero")]
    InvalidClaimAmount {},

    #[error("Claim amount exceeds claimable balance: {claimable}")]
    ClaimAmountExceedsClaimable { claimable: Uint128 },

    /// Accounting went wrong. Never a user error; the operation must abort.
    #[error("Stream invariant violated: {reason}")]
    InvariantViolation { reason: String },
}

impl StreamError {
    pub fn invariant(reason: impl Into<String>) -> Self {
        StreamError::InvariantViolation {
            reason: reason.into(),
        }
    }
}
