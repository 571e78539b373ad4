use super::AggregationOutput;
use crate::core::Result;

pub fn render_aggregation(output: &AggregationOutput) -> Result<String> {
    Ok(serde_json::to_string_pretty(output)?)
}
