use crate::helpers::{
    build_bank_send_msg, close_stream, engine_err, ensure_not_frozen, from_semver, insert_stream,
    load_stream, prepare_stream, schedule_from_duration, to_stream_response, to_totals_response,
    update_totals,
};
use crate::state::{streams, FREEZESTATE, LAST_STREAM_ID, PARAMS, TOTALS};
use crate::ContractError;
use cosmwasm_std::{
    attr, entry_point, to_json_binary, Binary, Coin, Deps, DepsMut, Env, MessageInfo, Order,
    Response, StdError, StdResult, Timestamp, Uint128,
};
use cw2::{get_contract_version, set_contract_version};
use cw_storage_plus::Bound;
use cw_utils::nonpayable;
use semver::Version;
use streampay_types::ledger::{
    CreateStreamMsg, ExecuteMsg, IdReuse, InstantiateMsg, MigrateMsg, Params, QueryMsg,
    StreamResponse, StreamsResponse, TotalsResponse, DEFAULT_MIN_STREAM_DURATION,
};
use streampay_types::stream::Stream;
use streampay_utils::payment_checker::check_payment;

// Version and contract info for migration
const CONTRACT_NAME: &str = "crates.io:streampay-ledger";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

const MAX_LIMIT: u32 = 30;

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let InstantiateMsg {
        admin,
        min_stream_duration,
        id_allocation,
        id_reuse,
    } = msg;

    let admin = deps
        .api
        .addr_validate(&admin.unwrap_or(info.sender.to_string()))?;

    let params = Params {
        admin,
        min_stream_duration: min_stream_duration.unwrap_or(DEFAULT_MIN_STREAM_DURATION),
        id_allocation,
        id_reuse: id_reuse.unwrap_or(IdReuse::Forbidden),
    };
    PARAMS.save(deps.storage, &params)?;

    // Initialize Freezestate
    FREEZESTATE.save(deps.storage, &false)?;

    // Initialize Last Stream ID
    LAST_STREAM_ID.save(deps.storage, &0)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attributes(params.to_attributes()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::CreateStream { msg } => execute_create_stream(deps, env, info, msg),
        ExecuteMsg::CreateStreamWithDuration {
            stream_id,
            recipient,
            amount,
            duration,
        } => execute_create_stream_with_duration(
            deps, env, info, stream_id, recipient, amount, duration,
        ),
        ExecuteMsg::CreateStreams { msgs } => execute_create_streams(deps, env, info, msgs),
        ExecuteMsg::Claim { stream_id, amount } => {
            execute_claim(deps, env, info, stream_id, amount)
        }
        ExecuteMsg::CancelStream { stream_id } => execute_cancel_stream(deps, env, info, stream_id),
        ExecuteMsg::UpdateParams {
            admin,
            min_stream_duration,
        } => execute_update_params(deps, info, admin, min_stream_duration),
        ExecuteMsg::Freeze {} => execute_freeze(deps, info),
        ExecuteMsg::Unfreeze {} => execute_unfreeze(deps, info),
    }
}

pub fn execute_create_stream(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: CreateStreamMsg,
) -> Result<Response, ContractError> {
    ensure_not_frozen(deps.storage)?;
    create_stream(deps, env, info, msg)
}

pub fn execute_create_stream_with_duration(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    stream_id: Option<u64>,
    recipient: String,
    amount: Coin,
    duration: u64,
) -> Result<Response, ContractError> {
    ensure_not_frozen(deps.storage)?;
    let (start_time, end_time) = schedule_from_duration(env.block.time, duration)?;
    let msg = CreateStreamMsg {
        stream_id,
        recipient,
        amount,
        start_time,
        end_time,
    };
    create_stream(deps, env, info, msg)
}

fn create_stream(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: CreateStreamMsg,
) -> Result<Response, ContractError> {
    let params = PARAMS.load(deps.storage)?;

    let stream = prepare_stream(
        deps.storage,
        deps.api,
        &params,
        &info.sender,
        env.block.time,
        msg,
    )?;

    // Escrow: attached funds must be exactly the stream amount
    let escrow = Coin {
        denom: stream.denom.clone(),
        amount: stream.total_amount,
    };
    check_payment(&info.funds, &[escrow])?;

    insert_stream(deps.storage, &stream)?;

    Ok(Response::new()
        .add_attribute("action", "create_stream")
        .add_attributes(stream_attributes(&stream)))
}

pub fn execute_create_streams(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msgs: Vec<CreateStreamMsg>,
) -> Result<Response, ContractError> {
    ensure_not_frozen(deps.storage)?;
    if msgs.is_empty() {
        return Err(ContractError::EmptyBatch {});
    }
    let params = PARAMS.load(deps.storage)?;

    let mut escrow: Vec<Coin> = Vec::with_capacity(msgs.len());
    let mut stream_ids: Vec<String> = Vec::with_capacity(msgs.len());
    for msg in msgs {
        let stream = prepare_stream(
            deps.storage,
            deps.api,
            &params,
            &info.sender,
            env.block.time,
            msg,
        )?;
        // Inserted right away so a repeated id later in the batch collides
        insert_stream(deps.storage, &stream)?;

        escrow.push(Coin {
            denom: stream.denom,
            amount: stream.total_amount,
        });
        stream_ids.push(stream.id.to_string());
    }

    check_payment(&info.funds, &escrow)?;

    Ok(Response::new()
        .add_attribute("action", "create_streams")
        .add_attribute("sender", info.sender)
        .add_attribute("stream_ids", stream_ids.join(","))
        .add_attribute("count", stream_ids.len().to_string()))
}

pub fn execute_claim(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    stream_id: u64,
    amount: Option<Uint128>,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    let mut stream = load_stream(deps.storage, stream_id)?;

    let claimed = stream.claim(&info.sender, env.block.time, amount)?;
    let settled = stream.is_settled();
    if settled {
        // Fully withdrawn streams are removed, later calls see StreamNotFound
        close_stream(deps.storage, stream_id, env.block.time)?;
    } else {
        streams().save(deps.storage, stream_id, &stream)?;
    }
    update_totals(deps.storage, &stream.denom, |totals| {
        totals.record_claim(claimed, settled)
    })?;

    let mut res = Response::new();
    if let Some(msg) = build_bank_send_msg(&stream.recipient, &stream.denom, claimed) {
        res = res.add_message(msg);
    }

    Ok(res.add_attributes(vec![
        attr("action", "claim"),
        attr("stream_id", stream_id.to_string()),
        attr("recipient", stream.recipient.to_string()),
        attr("claimed", claimed),
        attr("withdrawn", stream.withdrawn),
        attr("settled", settled.to_string()),
    ]))
}

pub fn execute_cancel_stream(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    stream_id: u64,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;
    let stream = load_stream(deps.storage, stream_id)?;

    // Conservation is verified inside cancel before any payout is built
    let outcome = stream.cancel(&info.sender, env.block.time)?;

    close_stream(deps.storage, stream_id, env.block.time)?;
    update_totals(deps.storage, &stream.denom, |totals| {
        totals.record_cancel(&outcome)
    })?;

    let messages = [
        build_bank_send_msg(&stream.recipient, &stream.denom, outcome.recipient_received),
        build_bank_send_msg(&stream.sender, &stream.denom, outcome.refunded),
    ];

    Ok(Response::new()
        .add_messages(messages.into_iter().flatten())
        .add_attribute("action", "cancel_stream")
        .add_attribute("stream_id", stream_id.to_string())
        .add_attribute("sender", stream.sender)
        .add_attribute("recipient", stream.recipient)
        .add_attribute("refunded", outcome.refunded)
        .add_attribute("recipient_received", outcome.recipient_received))
}

pub fn execute_update_params(
    deps: DepsMut,
    info: MessageInfo,
    admin: Option<String>,
    min_stream_duration: Option<u64>,
) -> Result<Response, ContractError> {
    let mut params = PARAMS.load(deps.storage)?;
    if info.sender != params.admin {
        return Err(ContractError::Unauthorized {});
    }

    if let Some(admin) = admin {
        params.admin = deps.api.addr_validate(&admin)?;
    }
    if let Some(min_stream_duration) = min_stream_duration {
        params.min_stream_duration = min_stream_duration;
    }

    PARAMS.save(deps.storage, &params)?;

    Ok(Response::new()
        .add_attribute("action", "update_params")
        .add_attributes(params.to_attributes()))
}

pub fn execute_freeze(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    let params = PARAMS.load(deps.storage)?;
    if info.sender != params.admin {
        return Err(ContractError::Unauthorized {});
    }
    FREEZESTATE.save(deps.storage, &true)?;
    Ok(Response::new().add_attribute("action", "freeze"))
}

pub fn execute_unfreeze(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    let params = PARAMS.load(deps.storage)?;
    if info.sender != params.admin {
        return Err(ContractError::Unauthorized {});
    }
    FREEZESTATE.save(deps.storage, &false)?;
    Ok(Response::new().add_attribute("action", "unfreeze"))
}

fn stream_attributes(stream: &Stream) -> Vec<cosmwasm_std::Attribute> {
    vec![
        attr("stream_id", stream.id.to_string()),
        attr("sender", stream.sender.to_string()),
        attr("recipient", stream.recipient.to_string()),
        attr("denom", stream.denom.clone()),
        attr("amount", stream.total_amount),
        attr("start_time", stream.start_time.to_string()),
        attr("end_time", stream.end_time.to_string()),
    ]
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let contract_info = get_contract_version(deps.storage)?;
    let storage_contract_name: String = contract_info.contract;
    let storage_version: Version = contract_info.version.parse().map_err(from_semver)?;
    let version: Version = CONTRACT_VERSION.parse().map_err(from_semver)?;

    if storage_contract_name != CONTRACT_NAME {
        return Err(ContractError::CannotMigrate {
            previous_contract: storage_contract_name,
        });
    }
    if storage_version < version {
        set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    }
    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", storage_version.to_string())
        .add_attribute("to_version", CONTRACT_VERSION))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    let now = env.block.time;
    match msg {
        QueryMsg::Params {} => to_json_binary(&PARAMS.load(deps.storage)?),
        QueryMsg::Freezestate {} => to_json_binary(&FREEZESTATE.load(deps.storage)?),
        QueryMsg::LastStreamId {} => to_json_binary(&LAST_STREAM_ID.load(deps.storage)?),
        QueryMsg::Stream { stream_id } => to_json_binary(&query_stream(deps, now, stream_id)?),
        QueryMsg::StreamExists { stream_id } => {
            to_json_binary(&streams().may_load(deps.storage, stream_id)?.is_some())
        }
        QueryMsg::Vested { stream_id, at } => {
            let stream = query_live_stream(deps, stream_id)?;
            to_json_binary(&stream.vested_amount(at.unwrap_or(now)).map_err(engine_err)?)
        }
        QueryMsg::Claimable { stream_id, at } => {
            let stream = query_live_stream(deps, stream_id)?;
            to_json_binary(&stream.claimable_amount(at.unwrap_or(now)).map_err(engine_err)?)
        }
        QueryMsg::Refundable { stream_id, at } => {
            let stream = query_live_stream(deps, stream_id)?;
            to_json_binary(&stream.refundable_amount(at.unwrap_or(now)).map_err(engine_err)?)
        }
        QueryMsg::Progress { stream_id, at } => {
            to_json_binary(&query_progress(deps, stream_id, at.unwrap_or(now))?)
        }
        QueryMsg::ListStreams { start_after, limit } => {
            to_json_binary(&list_streams(deps, now, start_after, limit)?)
        }
        QueryMsg::StreamsBySender {
            sender,
            start_after,
            limit,
        } => to_json_binary(&list_streams_by_sender(
            deps,
            now,
            sender,
            start_after,
            limit,
        )?),
        QueryMsg::StreamsByRecipient {
            recipient,
            start_after,
            limit,
        } => to_json_binary(&list_streams_by_recipient(
            deps,
            now,
            recipient,
            start_after,
            limit,
        )?),
        QueryMsg::Totals { denom } => to_json_binary(&query_totals(deps, denom)?),
    }
}

fn query_live_stream(deps: Deps, stream_id: u64) -> StdResult<Stream> {
    streams()
        .may_load(deps.storage, stream_id)?
        .ok_or_else(|| StdError::not_found(format!("stream {}", stream_id)))
}

pub fn query_stream(
    deps: Deps,
    now: Timestamp,
    stream_id: u64,
) -> StdResult<Option<StreamResponse>> {
    streams()
        .may_load(deps.storage, stream_id)?
        .map(|stream| to_stream_response(stream, now))
        .transpose()
}

pub fn query_progress(deps: Deps, stream_id: u64, at: Timestamp) -> StdResult<u64> {
    let stream = query_live_stream(deps, stream_id)?;
    stream.progress_percent(at).map_err(engine_err)
}

pub fn list_streams(
    deps: Deps,
    now: Timestamp,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<StreamsResponse> {
    let start = start_after.map(Bound::exclusive);
    let limit = limit.unwrap_or(MAX_LIMIT).min(MAX_LIMIT) as usize;
    let streams: StdResult<Vec<StreamResponse>> = streams()
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| {
            let (_, stream) = item?;
            to_stream_response(stream, now)
        })
        .collect();
    Ok(StreamsResponse { streams: streams? })
}

pub fn list_streams_by_sender(
    deps: Deps,
    now: Timestamp,
    sender: String,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<StreamsResponse> {
    let sender = deps.api.addr_validate(&sender)?;
    let start = start_after.map(Bound::exclusive);
    let limit = limit.unwrap_or(MAX_LIMIT).min(MAX_LIMIT) as usize;
    let streams: StdResult<Vec<StreamResponse>> = streams()
        .idx
        .sender
        .prefix(sender)
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| {
            let (_, stream) = item?;
            to_stream_response(stream, now)
        })
        .collect();
    Ok(StreamsResponse { streams: streams? })
}

pub fn list_streams_by_recipient(
    deps: Deps,
    now: Timestamp,
    recipient: String,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<StreamsResponse> {
    let recipient = deps.api.addr_validate(&recipient)?;
    let start = start_after.map(Bound::exclusive);
    let limit = limit.unwrap_or(MAX_LIMIT).min(MAX_LIMIT) as usize;
    let streams: StdResult<Vec<StreamResponse>> = streams()
        .idx
        .recipient
        .prefix(recipient)
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|item| {
            let (_, stream) = item?;
            to_stream_response(stream, now)
        })
        .collect();
    Ok(StreamsResponse { streams: streams? })
}

pub fn query_totals(deps: Deps, denom: String) -> StdResult<TotalsResponse> {
    let totals = TOTALS
        .may_load(deps.storage, &denom)?
        .unwrap_or_default();
    to_totals_response(denom, totals)
}
