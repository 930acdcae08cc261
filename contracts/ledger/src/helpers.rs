use crate::state::{streams, FREEZESTATE, LAST_STREAM_ID, PARAMS, RETIRED_STREAM_IDS, TOTALS};
use crate::ContractError;
use cosmwasm_std::{
    Addr, Api, BankMsg, Coin, CosmosMsg, StdError, StdResult, Storage, Timestamp, Uint128,
};
use streampay_types::ledger::{
    CreateStreamMsg, IdAllocation, IdReuse, Params, StreamResponse, TotalsResponse,
};
use streampay_types::stream::{
    validate_schedule, DenomTotals, Stream, StreamError, NANOS_PER_SECOND,
};

pub fn ensure_not_frozen(storage: &dyn Storage) -> Result<(), ContractError> {
    if FREEZESTATE.load(storage)? {
        return Err(ContractError::ContractIsFrozen {});
    }
    Ok(())
}

/// Schedule of a stream starting now and lasting `duration` seconds.
pub fn schedule_from_duration(
    now: Timestamp,
    duration: u64,
) -> Result<(Timestamp, Timestamp), ContractError> {
    let end_nanos = duration
        .checked_mul(NANOS_PER_SECOND)
        .and_then(|nanos| now.nanos().checked_add(nanos))
        .ok_or(StreamError::InvalidDuration {})?;
    Ok((now, Timestamp::from_nanos(end_nanos)))
}

/// Validates a create request and builds the stream record without saving it.
/// Validation order: amount, schedule, minimum duration, then id.
pub fn prepare_stream(
    storage: &mut dyn Storage,
    api: &dyn Api,
    params: &Params,
    sender: &Addr,
    now: Timestamp,
    msg: CreateStreamMsg,
) -> Result<Stream, ContractError> {
    let CreateStreamMsg {
        stream_id,
        recipient,
        amount,
        start_time,
        end_time,
    } = msg;

    validate_schedule(
        amount.amount,
        start_time,
        end_time,
        params.min_stream_duration,
    )?;
    let stream_id = allocate_stream_id(storage, params, stream_id)?;
    let recipient = api.addr_validate(&recipient)?;

    Ok(Stream::new(
        stream_id,
        sender.clone(),
        recipient,
        amount.denom,
        amount.amount,
        start_time,
        end_time,
        now,
    ))
}

fn allocate_stream_id(
    storage: &mut dyn Storage,
    params: &Params,
    requested: Option<u64>,
) -> Result<u64, ContractError> {
    let stream_id = match params.id_allocation {
        IdAllocation::CallerSupplied => requested.ok_or(ContractError::MissingStreamId {})?,
        IdAllocation::LedgerAssigned => {
            if requested.is_some() {
                return Err(ContractError::UnexpectedStreamId {});
            }
            let stream_id = LAST_STREAM_ID
                .load(storage)?
                .checked_add(1)
                .ok_or_else(|| StdError::generic_err("stream id space exhausted"))?;
            LAST_STREAM_ID.save(storage, &stream_id)?;
            stream_id
        }
    };

    if streams().may_load(storage, stream_id)?.is_some() {
        return Err(ContractError::StreamAlreadyExists { stream_id });
    }
    if params.id_reuse == IdReuse::Forbidden && RETIRED_STREAM_IDS.has(storage, stream_id) {
        return Err(ContractError::StreamIdRetired { stream_id });
    }
    Ok(stream_id)
}

/// Inserts a new stream and books its deposit.
pub fn insert_stream(storage: &mut dyn Storage, stream: &Stream) -> Result<(), ContractError> {
    streams().save(storage, stream.id, stream)?;
    update_totals(storage, &stream.denom, |totals| {
        totals.record_deposit(stream.total_amount)
    })
}

pub fn load_stream(storage: &dyn Storage, stream_id: u64) -> Result<Stream, ContractError> {
    streams()
        .may_load(storage, stream_id)?
        .ok_or(ContractError::StreamNotFound { stream_id })
}

/// Deletes a settled or cancelled stream and retires its id when reuse is forbidden.
pub fn close_stream(
    storage: &mut dyn Storage,
    stream_id: u64,
    now: Timestamp,
) -> Result<(), ContractError> {
    streams().remove(storage, stream_id)?;
    let params = PARAMS.load(storage)?;
    if params.id_reuse == IdReuse::Forbidden {
        RETIRED_STREAM_IDS.save(storage, stream_id, &now)?;
    }
    Ok(())
}

pub fn update_totals<F>(storage: &mut dyn Storage, denom: &str, f: F) -> Result<(), ContractError>
where
    F: FnOnce(&mut DenomTotals) -> Result<(), StreamError>,
{
    TOTALS.update(storage, denom, |totals| -> Result<_, ContractError> {
        let mut totals = totals.unwrap_or_default();
        f(&mut totals)?;
        Ok(totals)
    })?;
    Ok(())
}

/// Bank transfer out of escrow. Zero amounts produce no message.
pub fn build_bank_send_msg(to_addr: &Addr, denom: &str, amount: Uint128) -> Option<CosmosMsg> {
    if amount.is_zero() {
        return None;
    }
    Some(CosmosMsg::Bank(BankMsg::Send {
        to_address: to_addr.to_string(),
        amount: vec![Coin {
            denom: denom.to_string(),
            amount,
        }],
    }))
}

pub fn from_semver(err: semver::Error) -> ContractError {
    ContractError::Std(StdError::generic_err(format!("Semver: {}", err)))
}

pub fn engine_err(err: StreamError) -> StdError {
    StdError::generic_err(err.to_string())
}

pub fn to_stream_response(stream: Stream, now: Timestamp) -> StdResult<StreamResponse> {
    let rate_per_second = stream.rate_per_second().map_err(engine_err)?;
    let vested = stream.vested_amount(now).map_err(engine_err)?;
    let claimable = stream.claimable_amount(now).map_err(engine_err)?;
    let progress = stream.progress_percent(now).map_err(engine_err)?;
    let status = stream.status_at(now);
    Ok(StreamResponse {
        id: stream.id,
        sender: stream.sender.into_string(),
        recipient: stream.recipient.into_string(),
        denom: stream.denom,
        total_amount: stream.total_amount,
        withdrawn: stream.withdrawn,
        start_time: stream.start_time,
        end_time: stream.end_time,
        created_at: stream.created_at,
        rate_per_second,
        status,
        vested,
        claimable,
        progress,
    })
}

pub fn to_totals_response(denom: String, totals: DenomTotals) -> StdResult<TotalsResponse> {
    let locked = totals.locked().map_err(engine_err)?;
    Ok(TotalsResponse {
        denom,
        deposited: totals.deposited,
        withdrawn: totals.withdrawn,
        refunded: totals.refunded,
        locked,
        active_streams: totals.active_streams,
    })
}
