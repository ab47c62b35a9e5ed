// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_helpers::{EventLog, RecordingHandler};
use craizy_core::test_support::{agent, created_event, killed_event};

fn dispatcher() -> Dispatcher {
    Dispatcher::new(Span::none())
}

#[tokio::test]
async fn publish_without_subscribers_is_a_no_op() {
    let dispatcher = dispatcher();
    dispatcher.publish(&killed_event("craizy-demo-claude-a")).await;
    assert_eq!(dispatcher.handler_count(EventKind::AgentKilled), 0);
}

#[tokio::test]
async fn subscribers_fire_in_subscription_order() {
    let dispatcher = dispatcher();
    let log = EventLog::default();
    dispatcher.subscribe(EventKind::AgentKilled, RecordingHandler::arc("first", &log));
    dispatcher.subscribe(EventKind::AgentKilled, RecordingHandler::arc("second", &log));

    dispatcher.publish(&killed_event("craizy-demo-claude-a")).await;

    assert_eq!(log.handlers(), vec!["first", "second"]);
}

#[tokio::test]
async fn subscribers_only_see_their_kind() {
    let dispatcher = dispatcher();
    let created = EventLog::default();
    let killed = EventLog::default();
    dispatcher.subscribe(EventKind::AgentCreated, RecordingHandler::arc("created", &created));
    dispatcher.subscribe(EventKind::AgentKilled, RecordingHandler::arc("killed", &killed));

    dispatcher.publish(&created_event(agent("demo", "claude", "a"))).await;

    assert_eq!(created.kinds(), vec![EventKind::AgentCreated]);
    assert!(killed.is_empty());
}

#[tokio::test]
async fn failing_handler_does_not_stop_later_handlers() {
    let dispatcher = dispatcher();
    let log = EventLog::default();
    dispatcher.subscribe(EventKind::AgentKilled, RecordingHandler::failing("broken", &log));
    dispatcher.subscribe(EventKind::AgentKilled, RecordingHandler::arc("after", &log));

    dispatcher.publish(&killed_event("craizy-demo-claude-a")).await;

    assert_eq!(log.handlers(), vec!["broken", "after"]);
}

#[tokio::test]
async fn handlers_complete_before_publish_returns() {
    let dispatcher = dispatcher();
    let log = EventLog::default();
    dispatcher.subscribe(EventKind::AgentKilled, RecordingHandler::slow("slow", &log));

    dispatcher.publish(&killed_event("craizy-demo-claude-a")).await;

    assert_eq!(log.handlers(), vec!["slow"]);
}

#[tokio::test]
async fn concurrent_subscribe_and_publish() {
    let dispatcher = Arc::new(dispatcher());
    let log = EventLog::default();
    let mut tasks = Vec::new();
    for i in 0..8 {
        let dispatcher = Arc::clone(&dispatcher);
        let log = log.clone();
        tasks.push(tokio::spawn(async move {
            if i % 2 == 0 {
                dispatcher.subscribe(EventKind::AgentKilled, RecordingHandler::arc("h", &log));
            } else {
                dispatcher.publish(&killed_event("craizy-demo-claude-a")).await;
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }
    assert_eq!(dispatcher.handler_count(EventKind::AgentKilled), 4);
}
