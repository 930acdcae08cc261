#![cfg(test)]
use crate::helpers::mock_messages::{get_ledger_inst_msg, CreateStreamMsgBuilder};
use crate::helpers::suite::SuiteBuilder;
use cosmwasm_std::coin;
use cw_multi_test::Executor;
use streampay_ledger::ContractError;
use streampay_types::ledger::{ExecuteMsg, QueryMsg};

#[test]
fn ledger_freeze() {
    let mut suite = SuiteBuilder::default().build();
    let msg = get_ledger_inst_msg(&suite.test_accounts);
    let ledger = suite.instantiate_ledger(&msg);
    let now = suite.app.block_info().time;

    // When ledger is created, it is not frozen, Stream creation is allowed
    let create_stream_msg = CreateStreamMsgBuilder::new(
        suite.test_accounts.recipient.as_ref(),
        coin(1_000, "uusdc"),
        now,
        now.plus_seconds(100),
    )
    .stream_id(1)
    .build();
    suite
        .app
        .execute_contract(
            suite.test_accounts.sender.clone(),
            ledger.clone(),
            &create_stream_msg,
            &[coin(1_000, "uusdc")],
        )
        .unwrap();

    // Non-admin cannot freeze ledger
    let res = suite
        .app
        .execute_contract(
            suite.test_accounts.wrong_user.clone(),
            ledger.clone(),
            &ExecuteMsg::Freeze {},
            &[],
        )
        .unwrap_err();
    let err = res.source().unwrap();
    let error = err.downcast_ref::<ContractError>().unwrap();
    assert_eq!(*error, ContractError::Unauthorized {});

    // Admin can freeze ledger
    suite
        .app
        .execute_contract(
            suite.test_accounts.admin.clone(),
            ledger.clone(),
            &ExecuteMsg::Freeze {},
            &[],
        )
        .unwrap();
    let res: bool = suite
        .app
        .wrap()
        .query_wasm_smart(ledger.clone(), &QueryMsg::Freezestate {})
        .unwrap();
    assert!(res);

    // When ledger is frozen, Stream creation is not allowed
    let create_stream_msg = CreateStreamMsgBuilder::new(
        suite.test_accounts.recipient.as_ref(),
        coin(1_000, "uusdc"),
        now,
        now.plus_seconds(100),
    )
    .stream_id(2)
    .build();
    let res = suite
        .app
        .execute_contract(
            suite.test_accounts.sender.clone(),
            ledger.clone(),
            &create_stream_msg,
            &[coin(1_000, "uusdc")],
        )
        .unwrap_err();
    let err = res.source().unwrap();
    let error = err.downcast_ref::<ContractError>().unwrap();
    assert_eq!(*error, ContractError::ContractIsFrozen {});

    let res = suite
        .app
        .execute_contract(
            suite.test_accounts.sender.clone(),
            ledger.clone(),
            &ExecuteMsg::CreateStreams {
                msgs: vec![CreateStreamMsgBuilder::new(
                    suite.test_accounts.recipient.as_ref(),
                    coin(1_000, "uusdc"),
                    now,
                    now.plus_seconds(100),
                )
                .stream_id(3)
                .build_msg()],
            },
            &[coin(1_000, "uusdc")],
        )
        .unwrap_err();
    let err = res.source().unwrap();
    let error = err.downcast_ref::<ContractError>().unwrap();
    assert_eq!(*error, ContractError::ContractIsFrozen {});

    // Claims and cancellations keep working while frozen
    suite.set_time(now.plus_seconds(50));
    suite
        .app
        .execute_contract(
            suite.test_accounts.recipient.clone(),
            ledger.clone(),
            &ExecuteMsg::Claim {
                stream_id: 1,
                amount: None,
            },
            &[],
        )
        .unwrap();
    suite
        .app
        .execute_contract(
            suite.test_accounts.sender.clone(),
            ledger.clone(),
            &ExecuteMsg::CancelStream { stream_id: 1 },
            &[],
        )
        .unwrap();

    // Non-admin cannot unfreeze ledger
    let res = suite
        .app
        .execute_contract(
            suite.test_accounts.sender.clone(),
            ledger.clone(),
            &ExecuteMsg::Unfreeze {},
            &[],
        )
        .unwrap_err();
    let err = res.source().unwrap();
    let error = err.downcast_ref::<ContractError>().unwrap();
    assert_eq!(*error, ContractError::Unauthorized {});

    // Admin can unfreeze ledger, creation works again
    suite
        .app
        .execute_contract(
            suite.test_accounts.admin.clone(),
            ledger.clone(),
            &ExecuteMsg::Unfreeze {},
            &[],
        )
        .unwrap();
    suite
        .app
        .execute_contract(
            suite.test_accounts.sender.clone(),
            ledger,
            &create_stream_msg,
            &[coin(1_000, "uusdc")],
        )
        .unwrap();
}
