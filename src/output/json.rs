//! JSON output formatting

use crate::output::formatter::Outcome;
use serde_json::{json, Value};

pub fn format_json(outcome: &Outcome) -> String {
    let data: Value = match outcome {
        Outcome::Completed(report) => json!({
            "status": "completed",
            "report": serde_json::to_value(report).unwrap_or(json!(null)),
        }),
        Outcome::Planned(plan) => json!({
            "status": "planned",
            "plan": serde_json::to_value(plan).unwrap_or(json!(null)),
        }),
    };

    serde_json::to_string_pretty(&data).unwrap_or_else(|_| "{}".to_string())
}
