//! End-to-end pipeline tests: raw transport bytes in, validated
//! commands and outcome events out.

use control_gateway::GatewayRuntime;
use domain::GatewayEvent;
use infrastructure::{DeviceSeed, DirectoryConfig, GatewayConfig};
use serde_json::json;

fn seed(id: &str, owner: &str, state_token: Option<&str>) -> DeviceSeed {
    DeviceSeed {
        id: id.to_string(),
        owner: owner.to_string(),
        parent: None,
        state_token: state_token.map(str::to_string),
        enabled: true,
    }
}

fn test_config() -> GatewayConfig {
    GatewayConfig {
        gateway_id: "gw-test".to_string(),
        directory: DirectoryConfig {
            backend: "memory".to_string(),
            database_url: None,
            devices: vec![
                seed("dev-1", "own-1", Some("v3")),
                seed("dev-2", "own-1", Some("v4")),
                seed("dev-3", "own-2", Some("v3")),
            ],
        },
        queue_capacity: 8,
        heartbeat_interval_secs: 30,
    }
}

fn raw_control(id: &str, device: &str, owner: &str, expected: &str) -> String {
    json!({
        "routing_key": "device.control",
        "origin": "cloud",
        "data": {
            "id": id,
            "control": "reset",
            "device": device,
            "owner": owner,
            "parent": null,
            "expected": expected,
        }
    })
    .to_string()
}

#[tokio::test]
async fn matching_precondition_reaches_the_dispatcher() {
    let mut runtime = GatewayRuntime::start(test_config()).await.unwrap();

    runtime
        .inbound
        .send(raw_control("a1", "dev-1", "own-1", "v3"))
        .await
        .unwrap();

    let command = runtime.commands.recv().await.expect("Command should be dispatched");
    assert_eq!(command.message.id, "a1");
    assert_eq!(command.message.device, "dev-1");
    assert_eq!(command.device.owner, "own-1");

    match runtime.events.recv().await.unwrap() {
        GatewayEvent::CommandDispatched { message_id, .. } => assert_eq!(message_id, "a1"),
        other => panic!("Expected CommandDispatched, got {:?}", other),
    }

    runtime.stop().await;
}

#[tokio::test]
async fn stale_precondition_is_rejected_with_both_tokens() {
    let mut runtime = GatewayRuntime::start(test_config()).await.unwrap();

    // dev-2 currently reports "v4"; the sender still believes "v3"
    runtime
        .inbound
        .send(raw_control("a2", "dev-2", "own-1", "v3"))
        .await
        .unwrap();

    match runtime.events.recv().await.unwrap() {
        GatewayEvent::CommandRejected { message_id, reason, .. } => {
            assert_eq!(message_id.as_deref(), Some("a2"));
            assert!(reason.contains("v3"), "reason should carry the expected token: {reason}");
            assert!(reason.contains("v4"), "reason should carry the actual token: {reason}");
        }
        other => panic!("Expected CommandRejected, got {:?}", other),
    }

    runtime.stop().await;
}

#[tokio::test]
async fn foreign_owner_is_rejected() {
    let mut runtime = GatewayRuntime::start(test_config()).await.unwrap();

    // dev-3 belongs to own-2
    runtime
        .inbound
        .send(raw_control("a3", "dev-3", "own-1", "v3"))
        .await
        .unwrap();

    match runtime.events.recv().await.unwrap() {
        GatewayEvent::CommandRejected { reason, .. } => {
            assert!(reason.contains("Owner mismatch"), "unexpected reason: {reason}");
        }
        other => panic!("Expected CommandRejected, got {:?}", other),
    }

    runtime.stop().await;
}

#[tokio::test]
async fn outcomes_arrive_in_submission_order() {
    let mut runtime = GatewayRuntime::start(test_config()).await.unwrap();

    for raw in [
        raw_control("b1", "dev-1", "own-1", "v3"),
        raw_control("b2", "dev-2", "own-1", "v3"),
        raw_control("b3", "dev-3", "own-1", "v3"),
    ] {
        runtime.inbound.send(raw).await.unwrap();
    }

    let kinds: Vec<String> = {
        let mut kinds = Vec::new();
        for _ in 0..3 {
            kinds.push(runtime.events.recv().await.unwrap().event_type().to_string());
        }
        kinds
    };
    assert_eq!(kinds, vec!["CommandDispatched", "CommandRejected", "CommandRejected"]);

    runtime.stop().await;
}

#[tokio::test]
async fn own_origin_messages_never_reach_the_dispatcher() {
    let mut runtime = GatewayRuntime::start(test_config()).await.unwrap();

    let own = json!({
        "routing_key": "device.control",
        "origin": "gw-test",
        "data": {
            "id": "c1",
            "control": "reset",
            "device": "dev-1",
            "owner": "own-1",
            "parent": null,
            "expected": "v3",
        }
    })
    .to_string();
    runtime.inbound.send(own).await.unwrap();

    // A following foreign message is the next thing the dispatcher sees
    runtime
        .inbound
        .send(raw_control("c2", "dev-1", "own-1", "v3"))
        .await
        .unwrap();

    let command = runtime.commands.recv().await.unwrap();
    assert_eq!(command.message.id, "c2");

    runtime.stop().await;
}

#[tokio::test]
async fn listener_stops_on_shutdown() {
    let runtime = GatewayRuntime::start(test_config()).await.unwrap();

    // Must return even though the inbound sender is still alive
    runtime.stop().await;
}
