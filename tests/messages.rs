// tests/messages.rs

use serde_json::json;
use taskd::api::messages::{ExecuteResponse, PollResponse, STATUS_IN_PROGRESS};
use taskd::engine::{ExecutionResult, PollResult};
use taskd::types::ExecutionId;

#[test]
fn in_progress_poll_omits_result_fields() {
    let resp = PollResponse::from(PollResult::InProgress {
        id: ExecutionId::from("ab"),
    });
    assert_eq!(resp.status, STATUS_IN_PROGRESS);
    assert_eq!(
        serde_json::to_value(&resp).unwrap(),
        json!({"id": "ab", "status": "In Progress"})
    );
}

#[test]
fn completed_poll_carries_everything() {
    let resp = PollResponse::from(PollResult::Completed {
        id: ExecutionId::from("ab"),
        command: "ls".to_string(),
        output: String::new(),
        error: "exit status: 1".to_string(),
    });
    assert!(resp.is_completed());
    assert_eq!(
        serde_json::to_value(&resp).unwrap(),
        json!({
            "id": "ab",
            "status": "Completed",
            "command": "ls",
            "output": "",
            "error": "exit status: 1"
        })
    );
}

#[test]
fn execute_responses_are_told_apart_by_shape() {
    let long: ExecuteResponse =
        serde_json::from_value(json!({"command": "sleep 9", "id": "ff"})).unwrap();
    assert_eq!(
        long,
        ExecuteResponse::from(ExecutionResult::Started {
            id: ExecutionId::from("ff"),
            command: "sleep 9".to_string(),
        })
    );

    let short: ExecuteResponse =
        serde_json::from_value(json!({"command": "ls", "output": "a\n", "error": ""})).unwrap();
    assert!(matches!(short, ExecuteResponse::Short { ref output, .. } if output == "a\n"));
}
