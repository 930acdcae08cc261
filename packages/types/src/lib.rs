pub mod ledger;
pub mod stream;
