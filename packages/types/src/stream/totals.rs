use crate::stream::{CancelOutcome, StreamError};
use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint128;

/// Running accounting of one denom across every stream the ledger has held.
#[cw_serde]
#[derive(Default)]
pub struct DenomTotals {
    /// Total escrowed by stream creation.
    pub deposited: Uint128,
    /// Total paid to recipients, by claims and by cancellations.
    pub withdrawn: Uint128,
    /// Total returned to senders by cancellations.
    pub refunded: Uint128,
    /// Number of live streams in this denom.
    pub active_streams: u64,
}

impl DenomTotals {
    pub fn record_deposit(&mut self, amount: Uint128) -> Result<(), StreamError> {
        self.deposited = self.deposited.checked_add(amount)?;
        self.active_streams = self
            .active_streams
            .checked_add(1)
            .ok_or_else(|| StreamError::invariant("active stream count overflow"))?;
        Ok(())
    }

    pub fn record_claim(&mut self, claimed: Uint128, settled: bool) -> Result<(), StreamError> {
        self.withdrawn = self.withdrawn.checked_add(claimed)?;
        if settled {
            self.close_stream()?;
        }
        Ok(())
    }

    pub fn record_cancel(&mut self, outcome: &CancelOutcome) -> Result<(), StreamError> {
        self.withdrawn = self.withdrawn.checked_add(outcome.recipient_received)?;
        self.refunded = self.refunded.checked_add(outcome.refunded)?;
        self.close_stream()
    }

    /// Funds currently held in escrow for live streams.
    pub fn locked(&self) -> Result<Uint128, StreamError> {
        let released = self.withdrawn.checked_add(self.refunded)?;
        self.deposited
            .checked_sub(released)
            .map_err(|_| StreamError::invariant("released more than deposited"))
    }

    fn close_stream(&mut self) -> Result<(), StreamError> {
        self.active_streams = self
            .active_streams
            .checked_sub(1)
            .ok_or_else(|| StreamError::invariant("no active stream to close"))?;
        Ok(())
    }
}
