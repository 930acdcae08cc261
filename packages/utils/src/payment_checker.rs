use cosmwasm_std::{Coin, StdError};
use cw_utils::NativeBalance;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum CustomPaymentError {
    #[error(transparent)]
    Std(#[from] StdError),
    #[error("Insufficient funds sent")]
    InsufficientFunds {
        expected: Vec<Coin>,
        actual: Vec<Coin>,
    },
}

/// Sums coins per denom, dropping zero entries.
pub fn to_balance(coins: &[Coin]) -> NativeBalance {
    let mut balance = NativeBalance::default();
    for coin in coins {
        balance += coin.clone();
    }
    balance.normalize();
    balance
}

/// Checks that the funds attached to a message are exactly the funds the ledger
/// expects to escrow. Expected coins may repeat a denom, e.g. one entry per
/// stream of a batch; they are summed before comparison.
pub fn check_payment(
    sent_funds: &[Coin],
    expected_funds: &[Coin],
) -> Result<(), CustomPaymentError> {
    let expected_balance = to_balance(expected_funds);
    let sent_balance = to_balance(sent_funds);

    if expected_balance != sent_balance {
        return Err(CustomPaymentError::InsufficientFunds {
            expected: expected_balance.into_vec(),
            actual: sent_funds.to_vec(),
        });
    }

    Ok(())
}
