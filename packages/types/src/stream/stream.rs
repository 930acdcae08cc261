use crate::stream::StreamError;
use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Decimal256, Timestamp, Uint128, Uint256};

pub const NANOS_PER_SECOND: u64 = 1_000_000_000;
const FULL_PROGRESS: u64 = 100;

#[cw_serde]
pub struct Stream {
    /// Identifier, unique among live streams.
    pub id: u64,
    /// Funder of the stream. Only the sender can cancel.
    pub sender: Addr,
    /// Only the recipient can claim vested funds.
    pub recipient: Addr,
    /// Denom of the escrowed asset.
    pub denom: String,
    /// Amount escrowed at creation.
    pub total_amount: Uint128,
    /// Cumulative amount paid out to the recipient through claims.
    pub withdrawn: Uint128,
    /// Vesting starts at this time. Nothing is vested at or before it.
    pub start_time: Timestamp,
    /// Everything is vested at or after this time.
    pub end_time: Timestamp,
    /// Block time of creation.
    pub created_at: Timestamp,
}

#[cw_serde]
pub enum Status {
    /// Waiting for start time
    Waiting,
    Active,
    /// Fully vested, not yet fully claimed
    Ended,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Status::Waiting => write!(f, "waiting"),
            Status::Active => write!(f, "active"),
            Status::Ended => write!(f, "ended"),
        }
    }
}

/// Split of the unwithdrawn balance when a sender cancels.
#[cw_serde]
pub struct CancelOutcome {
    /// Unvested part returned to the sender.
    pub refunded: Uint128,
    /// Vested but unclaimed part paid to the recipient.
    pub recipient_received: Uint128,
}

/// Validates creation input. Checks run in a fixed order and the first failure wins.
pub fn validate_schedule(
    total_amount: Uint128,
    start_time: Timestamp,
    end_time: Timestamp,
    min_duration_seconds: u64,
) -> Result<(), StreamError> {
    if total_amount.is_zero() {
        return Err(StreamError::InvalidAmount {});
    }
    if end_time <= start_time {
        return Err(StreamError::InvalidDuration {});
    }
    let duration_seconds = (end_time.nanos() - start_time.nanos()) / NANOS_PER_SECOND;
    if duration_seconds < min_duration_seconds {
        return Err(StreamError::InvalidDuration {});
    }
    Ok(())
}

impl Stream {
    pub fn new(
        id: u64,
        sender: Addr,
        recipient: Addr,
        denom: String,
        total_amount: Uint128,
        start_time: Timestamp,
        end_time: Timestamp,
        created_at: Timestamp,
    ) -> Self {
        Stream {
            id,
            sender,
            recipient,
            denom,
            total_amount,
            withdrawn: Uint128::zero(),
            start_time,
            end_time,
            created_at,
        }
    }

    fn duration_nanos(&self) -> u64 {
        self.end_time.nanos().saturating_sub(self.start_time.nanos())
    }

    /// Amount vested at `now`, floored.
    pub fn vested_amount(&self, now: Timestamp) -> Result<Uint128, StreamError> {
        if now >= self.end_time {
            return Ok(self.total_amount);
        }
        if now <= self.start_time {
            return Ok(Uint128::zero());
        }
        let elapsed = now.nanos() - self.start_time.nanos();
        // Rounds toward zero so withdrawn can never run ahead of the exact vested value.
        let vested = self
            .total_amount
            .checked_multiply_ratio(elapsed, self.duration_nanos())?;
        Ok(vested)
    }

    /// Vested but not yet withdrawn. Saturates at zero when `now` is behind a previous claim.
    pub fn claimable_amount(&self, now: Timestamp) -> Result<Uint128, StreamError> {
        Ok(self.vested_amount(now)?.saturating_sub(self.withdrawn))
    }

    /// Amount the sender would get back on cancellation at `now`.
    pub fn refundable_amount(&self, now: Timestamp) -> Result<Uint128, StreamError> {
        Ok(self.total_amount.checked_sub(self.vested_amount(now)?)?)
    }

    /// Funds still held in escrow for this stream.
    pub fn escrowed_amount(&self) -> Result<Uint128, StreamError> {
        Ok(self.total_amount.checked_sub(self.withdrawn)?)
    }

    /// Elapsed share of the schedule in whole percent, floored.
    pub fn progress_percent(&self, now: Timestamp) -> Result<u64, StreamError> {
        if now >= self.end_time {
            return Ok(FULL_PROGRESS);
        }
        if now <= self.start_time {
            return Ok(0);
        }
        let elapsed = now.nanos() - self.start_time.nanos();
        let percent =
            u128::from(elapsed) * u128::from(FULL_PROGRESS) / u128::from(self.duration_nanos());
        u64::try_from(percent).map_err(|_| StreamError::invariant("progress above 100 percent"))
    }

    /// Streaming rate in asset units per second.
    pub fn rate_per_second(&self) -> Result<Decimal256, StreamError> {
        let numerator =
            Uint256::from(self.total_amount).checked_mul(Uint256::from(NANOS_PER_SECOND))?;
        Ok(Decimal256::checked_from_ratio(
            numerator,
            self.duration_nanos(),
        )?)
    }

    pub fn status_at(&self, now: Timestamp) -> Status {
        match now {
            _ if now < self.start_time => Status::Waiting,
            _ if now < self.end_time => Status::Active,
            _ => Status::Ended,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.withdrawn == self.total_amount
    }

    /// Moves the claimable balance (or `amount` of it) to withdrawn and returns what must be
    /// paid to the recipient. Nothing is mutated on error.
    pub fn claim(
        &mut self,
        caller: &Addr,
        now: Timestamp,
        amount: Option<Uint128>,
    ) -> Result<Uint128, StreamError> {
        if *caller != self.recipient {
            return Err(StreamError::NotRecipient {});
        }
        let vested = self.vested_amount(now)?;
        let claimable = vested.saturating_sub(self.withdrawn);
        if claimable.is_zero() {
            return Err(StreamError::NothingToClaim {});
        }
        let claimed = match amount {
            None => claimable,
            Some(amount) if amount.is_zero() => return Err(StreamError::InvalidClaimAmount {}),
            Some(amount) if amount > claimable => {
                return Err(StreamError::ClaimAmountExceedsClaimable { claimable })
            }
            Some(amount) => amount,
        };

        let withdrawn = self.withdrawn.checked_add(claimed)?;
        if withdrawn > vested || vested > self.total_amount {
            return Err(StreamError::invariant(format!(
                "withdrawn {} exceeds vested {} of {}",
                withdrawn, vested, self.total_amount
            )));
        }
        self.withdrawn = withdrawn;
        Ok(claimed)
    }

    /// Splits the unwithdrawn balance into the recipient's vested part and the sender's
    /// refund. The record itself is left untouched; the ledger deletes it.
    pub fn cancel(&self, caller: &Addr, now: Timestamp) -> Result<CancelOutcome, StreamError> {
        if *caller != self.sender {
            return Err(StreamError::NotSender {});
        }
        let vested = self.vested_amount(now)?;
        let recipient_received = vested
            .checked_sub(self.withdrawn)
            .map_err(|_| StreamError::invariant("withdrawn exceeds vested at cancellation"))?;
        let refunded = self.total_amount.checked_sub(vested)?;

        let unwithdrawn = self.escrowed_amount()?;
        if refunded.checked_add(recipient_received)? != unwithdrawn {
            return Err(StreamError::invariant(format!(
                "cancel split {} + {} does not match unwithdrawn {}",
                refunded, recipient_received, unwithdrawn
            )));
        }

        Ok(CancelOutcome {
            refunded,
            recipient_received,
        })
    }
}
