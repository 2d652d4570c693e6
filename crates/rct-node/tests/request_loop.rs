//! Request loop tests over in-memory channels and pipes.

use rct_ledger::prelude::*;
use rct_node::{serve, GenesisConfig, Node, ResponseEnvelope};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, oneshot};

fn account(byte: u8) -> String {
    AccountId::new([byte; 20]).to_hex()
}

/// Feed `input` line by line, close the input, collect every response.
async fn serve_all(node: &Node, input: &str) -> Vec<ResponseEnvelope> {
    let (tx, rx) = mpsc::channel(64);
    for line in input.lines() {
        tx.send(Ok(line.to_string())).await.unwrap();
    }
    drop(tx);

    let mut output = Vec::new();
    let summary = serve(node, rx, &mut output, std::future::pending())
        .await
        .unwrap();
    assert!(!summary.interrupted);

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

#[tokio::test]
async fn test_mint_transfer_and_query_session() {
    let node = Node::new(ServiceConfig::default(), &GenesisConfig::devnet()).unwrap();
    let (minter, alice, bob) = (account(0x02), account(0x0A), account(0x0B));

    let input = [
        format!(r#"{{"caller":"{minter}","height":1,"request":{{"op":"mint","amount":"1000000","recipient":"{alice}","metadata":"Reward for recycling 10kg plastic"}}}}"#),
        String::new(),
        format!(r#"{{"caller":"{alice}","height":2,"request":{{"op":"transfer","amount":"250000","sender":"{alice}","recipient":"{bob}"}}}}"#),
        format!(r#"{{"caller":"{bob}","request":{{"op":"get-balance","account":"{bob}"}}}}"#),
        format!(r#"{{"caller":"{bob}","request":{{"op":"get-total-supply"}}}}"#),
    ]
    .join("\n");

    let responses = serve_all(&node, &input).await;

    assert_eq!(responses.len(), 4);
    assert_eq!(responses[0].response, LedgerResponse::Id { id: 1 });
    assert_eq!(responses[0].height, 1);
    assert_eq!(responses[1].response, LedgerResponse::Ack);
    assert_eq!(responses[2].response, LedgerResponse::Balance { balance: 250_000 });
    assert_eq!(responses[3].response, LedgerResponse::Balance { balance: 1_000_000 });
    assert_eq!(responses[3].height, 2);
}

#[tokio::test]
async fn test_rejections_do_not_stop_the_loop() {
    let node = Node::new(ServiceConfig::default(), &GenesisConfig::devnet()).unwrap();
    let (minter, alice) = (account(0x02), account(0x0A));

    let input = [
        "garbage".to_string(),
        format!(r#"{{"caller":"{alice}","height":5,"request":{{"op":"burn","amount":"1"}}}}"#),
        format!(r#"{{"caller":"{minter}","height":4,"request":{{"op":"mint","amount":"1","recipient":"{alice}"}}}}"#),
        format!(r#"{{"caller":"{minter}","height":6,"request":{{"op":"mint","amount":"1","recipient":"{alice}"}}}}"#),
    ]
    .join("\n");

    let responses = serve_all(&node, &input).await;

    assert_eq!(responses[0].response.error_code(), Some(201));
    assert_eq!(responses[1].response.error_code(), Some(107));
    assert_eq!(responses[2].response.error_code(), Some(200));
    assert_eq!(responses[3].response, LedgerResponse::Id { id: 1 });
    assert_eq!(node.service().balance_of(&AccountId::new([0x0A; 20])), 1);
}

#[tokio::test]
async fn test_vesting_claim_over_heights() {
    let node = Node::new(ServiceConfig::default(), &GenesisConfig::devnet()).unwrap();
    let (minter, alice) = (account(0x02), account(0x0A));

    let input = [
        format!(r#"{{"caller":"{minter}","height":1000,"request":{{"op":"mint-with-vesting","amount":"1000000","recipient":"{alice}","duration":100}}}}"#),
        format!(r#"{{"caller":"{alice}","request":{{"op":"calculate-claimable","recipient":"{alice}","id":1,"height":1050}}}}"#),
        format!(r#"{{"caller":"{alice}","height":1050,"request":{{"op":"claim-vesting","id":1}}}}"#),
        format!(r#"{{"caller":"{alice}","height":1050,"request":{{"op":"claim-vesting","id":1}}}}"#),
    ]
    .join("\n");

    let responses = serve_all(&node, &input).await;

    assert_eq!(responses[0].response, LedgerResponse::Id { id: 1 });
    assert_eq!(responses[1].response, LedgerResponse::Amount { amount: 500_000 });
    assert_eq!(responses[2].response, LedgerResponse::Amount { amount: 500_000 });
    assert_eq!(responses[3].response.error_code(), Some(109));
    assert_eq!(node.service().events().len(), 2);
}

#[tokio::test]
async fn test_shutdown_stops_loop_while_input_open() {
    let node = Node::new(ServiceConfig::default(), &GenesisConfig::devnet()).unwrap();
    let (tx, rx) = mpsc::channel(8);
    let (client, server_side) = tokio::io::duplex(4096);
    let (stop_tx, stop_rx) = oneshot::channel::<()>();

    let shutdown = async {
        let _ = stop_rx.await;
    };
    let driver = async move {
        let line = format!(
            r#"{{"caller":"{}","request":{{"op":"get-name"}}}}"#,
            account(0x0A)
        );
        tx.send(Ok(line)).await.unwrap();

        let mut responses = BufReader::new(client).lines();
        let first = responses.next_line().await.unwrap().unwrap();
        stop_tx.send(()).unwrap();
        // Input stays open: the sender is returned, not dropped
        (first, tx)
    };

    let (summary, (first, _input)) = tokio::join!(serve(&node, rx, server_side, shutdown), driver);
    let summary = summary.unwrap();

    assert!(summary.interrupted);
    assert_eq!(summary.responses_written, 1);
    let response: ResponseEnvelope = serde_json::from_str(&first).unwrap();
    assert_eq!(response.response, LedgerResponse::name());
}
