use anyhow::Result;
use std::fmt::Write as _;

use crate::core::ClassMode;
use crate::formatting::Styler;
use crate::model::ConditionModel;

/// One line per input value: the value and its class label, or `-`.
pub fn classify_values(
    model: &ConditionModel,
    kpi: &str,
    year: u16,
    mode: ClassMode,
    values: &[String],
    styler: &Styler,
) -> Result<String> {
    let rule = model.rule(kpi, year)?;
    let width = values.iter().map(|v| v.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    for raw in values {
        let value = raw.trim().parse::<f64>().ok();
        let class = match rule.classify(value, mode) {
            Some(class) => styler.class(class, class.label()),
            None => styler.dim("-"),
        };
        let _ = writeln!(out, "{:<width$}  {}", raw, class);
    }
    Ok(out)
}
