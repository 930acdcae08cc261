use crate::ledger::{IdAllocation, IdReuse};
use crate::stream::Status;
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Coin, Decimal256, Timestamp, Uint128};

#[cw_serde]
/// Message used to instantiate the ledger contract.
pub struct InstantiateMsg {
    /// The optional address of the ledger admin. Defaults to the sender.
    pub admin: Option<String>,
    /// Minimum end_time - start_time of a stream in seconds. Defaults to 10.
    pub min_stream_duration: Option<u64>,
    /// Whether stream ids come from the caller or from the ledger.
    pub id_allocation: IdAllocation,
    /// Whether ids of settled or cancelled streams may be used again. Defaults to forbidden.
    pub id_reuse: Option<IdReuse>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Escrows the attached funds and opens a stream vesting linearly from
    /// `start_time` to `end_time`.
    CreateStream { msg: CreateStreamMsg },
    /// Same as CreateStream with the schedule starting at the current block time.
    CreateStreamWithDuration {
        stream_id: Option<u64>,
        recipient: String,
        amount: Coin,
        /// Length of the schedule in seconds.
        duration: u64,
    },
    /// Creates every stream of the batch or none of them. Attached funds must
    /// cover the sum of all amounts per denom.
    CreateStreams { msgs: Vec<CreateStreamMsg> },
    /// Recipient withdraws vested funds. Without `amount` the whole claimable
    /// balance is paid out.
    Claim {
        stream_id: u64,
        amount: Option<Uint128>,
    },
    /// Sender stops the stream. Vested funds go to the recipient, the rest back
    /// to the sender, and the stream is deleted.
    CancelStream { stream_id: u64 },
    UpdateParams {
        admin: Option<String>,
        min_stream_duration: Option<u64>,
    },
    /// Stops stream creation. Claims and cancellations keep working.
    Freeze {},
    Unfreeze {},
}

#[cw_serde]
pub struct CreateStreamMsg {
    /// Required when ids are caller supplied, rejected when the ledger assigns them.
    pub stream_id: Option<u64>,
    /// Address allowed to claim.
    pub recipient: String,
    /// Asset and amount to escrow. Must match the attached funds.
    pub amount: Coin,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    /// Returns current configuration.
    #[returns(crate::ledger::Params)]
    Params {},
    #[returns(bool)]
    Freezestate {},
    #[returns(u64)]
    LastStreamId {},
    /// Returns a live stream, or none once it is settled or cancelled.
    #[returns(Option<StreamResponse>)]
    Stream { stream_id: u64 },
    #[returns(bool)]
    StreamExists { stream_id: u64 },
    /// Vested amount at `at`, defaulting to the block time.
    #[returns(Uint128)]
    Vested {
        stream_id: u64,
        at: Option<Timestamp>,
    },
    /// Vested minus withdrawn at `at`, defaulting to the block time.
    #[returns(Uint128)]
    Claimable {
        stream_id: u64,
        at: Option<Timestamp>,
    },
    /// Amount a cancellation at `at` would return to the sender.
    #[returns(Uint128)]
    Refundable {
        stream_id: u64,
        at: Option<Timestamp>,
    },
    /// Elapsed share of the schedule in whole percent.
    #[returns(u64)]
    Progress {
        stream_id: u64,
        at: Option<Timestamp>,
    },
    /// Returns live streams paginated by `start_after` and `limit`.
    #[returns(StreamsResponse)]
    ListStreams {
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(StreamsResponse)]
    StreamsBySender {
        sender: String,
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(StreamsResponse)]
    StreamsByRecipient {
        recipient: String,
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    /// Ledger wide accounting for one denom.
    #[returns(TotalsResponse)]
    Totals { denom: String },
}

#[cw_serde]
pub struct StreamResponse {
    pub id: u64,
    pub sender: String,
    pub recipient: String,
    pub denom: String,
    pub total_amount: Uint128,
    pub withdrawn: Uint128,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub created_at: Timestamp,
    /// Asset units released per second.
    pub rate_per_second: Decimal256,
    /// Values below are evaluated at the block time of the query.
    pub status: Status,
    pub vested: Uint128,
    pub claimable: Uint128,
    pub progress: u64,
}

#[cw_serde]
pub struct StreamsResponse {
    pub streams: Vec<StreamResponse>,
}

#[cw_serde]
pub struct TotalsResponse {
    pub denom: String,
    pub deposited: Uint128,
    pub withdrawn: Uint128,
    pub refunded: Uint128,
    /// Still held in escrow by live streams.
    pub locked: Uint128,
    pub active_streams: u64,
}

#[cw_serde]
pub struct MigrateMsg {}
