#[cfg(test)]
mod queries {
    use crate::helpers::mock_messages::{get_ledger_inst_msg, CreateStreamMsgBuilder};
    use crate::helpers::suite::{Suite, SuiteBuilder};
    use crate::helpers::utils::query_stream;
    use cosmwasm_std::{coin, Addr, Coin, Uint128};
    use cw_multi_test::Executor;
    use streampay_types::ledger::{QueryMsg, StreamsResponse};
    use streampay_types::stream::Status;

    fn create_stream(
        suite: &mut Suite,
        ledger: &Addr,
        stream_id: u64,
        sender: Addr,
        recipient: Addr,
        amount: Coin,
    ) {
        let now = suite.app.block_info().time;
        let create_stream_msg = CreateStreamMsgBuilder::new(
            recipient.as_ref(),
            amount.clone(),
            now.plus_seconds(100),
            now.plus_seconds(200),
        )
        .stream_id(stream_id)
        .build();
        suite
            .app
            .execute_contract(sender, ledger.clone(), &create_stream_msg, &[amount])
            .unwrap();
    }

    fn ids(res: StreamsResponse) -> Vec<u64> {
        res.streams.iter().map(|s| s.id).collect()
    }

    #[test]
    fn point_in_time_queries() {
        let mut suite = SuiteBuilder::default().build();
        let msg = get_ledger_inst_msg(&suite.test_accounts);
        let ledger = suite.instantiate_ledger(&msg);
        let now = suite.app.block_info().time;
        let sender = suite.test_accounts.sender.clone();
        let recipient = suite.test_accounts.recipient.clone();
        create_stream(&mut suite, &ledger, 1, sender, recipient, coin(1_000, "uusdc"));

        let start = now.plus_seconds(100);
        let cases = [
            (None, 0u128, 0u64),
            (Some(start), 0, 0),
            (Some(start.plus_seconds(25)), 250, 25),
            (Some(start.plus_seconds(99)), 990, 99),
            (Some(start.plus_seconds(100)), 1_000, 100),
            (Some(start.plus_seconds(5_000)), 1_000, 100),
        ];
        for (at, vested, progress) in cases {
            let res: Uint128 = suite
                .app
                .wrap()
                .query_wasm_smart(ledger.clone(), &QueryMsg::Vested { stream_id: 1, at })
                .unwrap();
            assert_eq!(res, Uint128::new(vested));

            let res: Uint128 = suite
                .app
                .wrap()
                .query_wasm_smart(ledger.clone(), &QueryMsg::Claimable { stream_id: 1, at })
                .unwrap();
            assert_eq!(res, Uint128::new(vested));

            let res: Uint128 = suite
                .app
                .wrap()
                .query_wasm_smart(ledger.clone(), &QueryMsg::Refundable { stream_id: 1, at })
                .unwrap();
            assert_eq!(res, Uint128::new(1_000 - vested));

            let res: u64 = suite
                .app
                .wrap()
                .query_wasm_smart(ledger.clone(), &QueryMsg::Progress { stream_id: 1, at })
                .unwrap();
            assert_eq!(res, progress);
        }

        // Block time drives the embedded views
        suite.set_time(start.plus_seconds(50));
        let stream = query_stream(&suite.app, &ledger, 1).unwrap();
        assert_eq!(stream.status, Status::Active);
        assert_eq!(stream.vested, Uint128::new(500));
        assert_eq!(stream.claimable, Uint128::new(500));
        assert_eq!(stream.progress, 50);

        suite.set_time(start.plus_seconds(100));
        let stream = query_stream(&suite.app, &ledger, 1).unwrap();
        assert_eq!(stream.status, Status::Ended);

        let exists: bool = suite
            .app
            .wrap()
            .query_wasm_smart(ledger.clone(), &QueryMsg::StreamExists { stream_id: 1 })
            .unwrap();
        assert!(exists);
        let exists: bool = suite
            .app
            .wrap()
            .query_wasm_smart(ledger.clone(), &QueryMsg::StreamExists { stream_id: 2 })
            .unwrap();
        assert!(!exists);

        // Unknown streams
        assert!(query_stream(&suite.app, &ledger, 2).is_none());
        let res: Result<Uint128, _> = suite.app.wrap().query_wasm_smart(
            ledger.clone(),
            &QueryMsg::Vested {
                stream_id: 2,
                at: None,
            },
        );
        assert!(res.is_err());
        let res: Result<u64, _> = suite.app.wrap().query_wasm_smart(
            ledger,
            &QueryMsg::Progress {
                stream_id: 2,
                at: None,
            },
        );
        assert!(res.is_err());
    }

    #[test]
    fn list_streams() {
        let mut suite = SuiteBuilder::default().build();
        let msg = get_ledger_inst_msg(&suite.test_accounts);
        let ledger = suite.instantiate_ledger(&msg);

        let sender = suite.test_accounts.sender.clone();
        let sender_2 = suite.test_accounts.sender_2.clone();
        let recipient = suite.test_accounts.recipient.clone();
        let recipient_2 = suite.test_accounts.recipient_2.clone();
        // Inserted out of order on purpose
        for (stream_id, from, to) in [
            (5, sender.clone(), recipient.clone()),
            (2, sender_2.clone(), recipient.clone()),
            (9, sender.clone(), recipient_2.clone()),
            (1, sender.clone(), recipient.clone()),
        ] {
            create_stream(&mut suite, &ledger, stream_id, from, to, coin(100, "uusdc"));
        }

        let res: StreamsResponse = suite
            .app
            .wrap()
            .query_wasm_smart(
                ledger.clone(),
                &QueryMsg::ListStreams {
                    start_after: None,
                    limit: None,
                },
            )
            .unwrap();
        assert_eq!(ids(res), vec![1, 2, 5, 9]);

        let res: StreamsResponse = suite
            .app
            .wrap()
            .query_wasm_smart(
                ledger.clone(),
                &QueryMsg::ListStreams {
                    start_after: Some(2),
                    limit: Some(1),
                },
            )
            .unwrap();
        assert_eq!(ids(res), vec![5]);

        let res: StreamsResponse = suite
            .app
            .wrap()
            .query_wasm_smart(
                ledger.clone(),
                &QueryMsg::StreamsBySender {
                    sender: sender.to_string(),
                    start_after: None,
                    limit: None,
                },
            )
            .unwrap();
        assert_eq!(ids(res), vec![1, 5, 9]);

        let res: StreamsResponse = suite
            .app
            .wrap()
            .query_wasm_smart(
                ledger.clone(),
                &QueryMsg::StreamsBySender {
                    sender: sender.to_string(),
                    start_after: Some(1),
                    limit: Some(1),
                },
            )
            .unwrap();
        assert_eq!(ids(res), vec![5]);

        let res: StreamsResponse = suite
            .app
            .wrap()
            .query_wasm_smart(
                ledger.clone(),
                &QueryMsg::StreamsByRecipient {
                    recipient: recipient.to_string(),
                    start_after: None,
                    limit: None,
                },
            )
            .unwrap();
        assert_eq!(ids(res), vec![1, 2, 5]);

        let res: StreamsResponse = suite
            .app
            .wrap()
            .query_wasm_smart(
                ledger.clone(),
                &QueryMsg::StreamsByRecipient {
                    recipient: suite.test_accounts.wrong_user.to_string(),
                    start_after: None,
                    limit: None,
                },
            )
            .unwrap();
        assert!(res.streams.is_empty());

        // Cancelled streams leave every listing
        suite
            .app
            .execute_contract(
                sender.clone(),
                ledger.clone(),
                &streampay_types::ledger::ExecuteMsg::CancelStream { stream_id: 5 },
                &[],
            )
            .unwrap();
        let res: StreamsResponse = suite
            .app
            .wrap()
            .query_wasm_smart(
                ledger.clone(),
                &QueryMsg::StreamsBySender {
                    sender: sender.to_string(),
                    start_after: None,
                    limit: None,
                },
            )
            .unwrap();
        assert_eq!(ids(res), vec![1, 9]);
        let res: StreamsResponse = suite
            .app
            .wrap()
            .query_wasm_smart(
                ledger,
                &QueryMsg::ListStreams {
                    start_after: None,
                    limit: None,
                },
            )
            .unwrap();
        assert_eq!(ids(res), vec![1, 2, 9]);
    }

    #[test]
    fn list_streams_limit_is_capped() {
        let mut suite = SuiteBuilder::default().build();
        let msg = get_ledger_inst_msg(&suite.test_accounts);
        let ledger = suite.instantiate_ledger(&msg);
        let sender = suite.test_accounts.sender.clone();
        let recipient = suite.test_accounts.recipient.clone();

        for stream_id in 1..=35 {
            create_stream(
                &mut suite,
                &ledger,
                stream_id,
                sender.clone(),
                recipient.clone(),
                coin(10, "uusdc"),
            );
        }

        let res: StreamsResponse = suite
            .app
            .wrap()
            .query_wasm_smart(
                ledger.clone(),
                &QueryMsg::ListStreams {
                    start_after: None,
                    limit: Some(100),
                },
            )
            .unwrap();
        assert_eq!(res.streams.len(), 30);

        let res: StreamsResponse = suite
            .app
            .wrap()
            .query_wasm_smart(
                ledger,
                &QueryMsg::ListStreams {
                    start_after: Some(30),
                    limit: None,
                },
            )
            .unwrap();
        assert_eq!(ids(res), vec![31, 32, 33, 34, 35]);
    }
}
