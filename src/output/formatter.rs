//! Output formatting

use crate::output::human::format_human;
use crate::output::json::format_json;
use crate::wrapper::{RunPlan, RunReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

/// What gets printed once the wrapper is done
#[derive(Debug, Clone)]
pub enum Outcome {
    Completed(RunReport),
    Planned(RunPlan),
}

pub fn format_output(outcome: &Outcome, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Human => format_human(outcome),
        OutputFormat::Json => format_json(outcome),
    }
}
