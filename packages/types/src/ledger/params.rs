use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Attribute};

/// Minimum stream duration in seconds applied when instantiation does not set one.
pub const DEFAULT_MIN_STREAM_DURATION: u64 = 10;

/// Who picks the id of a new stream.
#[cw_serde]
pub enum IdAllocation {
    /// The sender passes the id in the create message.
    CallerSupplied,
    /// The ledger assigns `last_stream_id + 1`.
    LedgerAssigned,
}

/// Whether the id of a settled or cancelled stream can be used again.
#[cw_serde]
pub enum IdReuse {
    Forbidden,
    AllowedAfterDeletion,
}

impl std::fmt::Display for IdAllocation {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            IdAllocation::CallerSupplied => write!(f, "caller_supplied"),
            IdAllocation::LedgerAssigned => write!(f, "ledger_assigned"),
        }
    }
}

impl std::fmt::Display for IdReuse {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            IdReuse::Forbidden => write!(f, "forbidden"),
            IdReuse::AllowedAfterDeletion => write!(f, "allowed_after_deletion"),
        }
    }
}

#[cw_serde]
pub struct Params {
    // Ledger admin, can update the params and freeze stream creation
    pub admin: Addr,
    // Minimum end_time - start_time of a new stream, in seconds
    pub min_stream_duration: u64,
    // Fixed at instantiation
    pub id_allocation: IdAllocation,
    // Fixed at instantiation
    pub id_reuse: IdReuse,
}

impl Params {
    // Converts Params to attributes
    pub fn to_attributes(&self) -> Vec<Attribute> {
        vec![
            Attribute::new("admin", self.admin.to_string()),
            Attribute::new("min_stream_duration", self.min_stream_duration.to_string()),
            Attribute::new("id_allocation", self.id_allocation.to_string()),
            Attribute::new("id_reuse", self.id_reuse.to_string()),
        ]
    }
}
