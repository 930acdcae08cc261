pub use crate::error::ContractError;
pub mod contract;
mod error;
mod helpers;
pub mod state;
