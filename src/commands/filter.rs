use anyhow::{bail, Context, Result};

use crate::cli::PredicateFormat;
use crate::core::{ClassMode, ConditionClass};
use crate::model::ConditionModel;
use crate::predicate::{ChartSelection, FilterSpec, Predicate, PredicateSerializer, SqlWhere};

/// Parse `region:<name>:<class>` or `category:<key>:<class>`.
///
/// Region names may themselves contain `:`; the class is taken from the
/// last segment.
pub fn parse_selection(text: &str, kpi: &str, year: u16) -> Result<ChartSelection> {
    let Some((kind, rest)) = text.split_once(':') else {
        bail!("selection '{}' must look like region:<name>:<class>", text);
    };
    let Some((group, class)) = rest.rsplit_once(':') else {
        bail!("selection '{}' is missing its condition class", text);
    };
    let class: ConditionClass = class
        .parse()
        .map_err(anyhow::Error::msg)
        .with_context(|| format!("in selection '{}'", text))?;
    if group.trim().is_empty() {
        bail!("selection '{}' names no group", text);
    }

    match kind.trim() {
        "region" => Ok(ChartSelection::region(group, class, kpi, year)),
        "category" => Ok(ChartSelection::category(group.trim(), class, kpi, year)),
        other => bail!("unknown selection kind '{}' (expected region or category)", other),
    }
}

/// Filter predicate for `spec`, narrowed by any chart selections.
pub fn build_where(
    model: &ConditionModel,
    spec: &FilterSpec,
    selections: &[String],
    kpi: Option<&str>,
    mode: ClassMode,
) -> Result<Predicate> {
    let filter = model.build_predicate(spec);
    if selections.is_empty() {
        return Ok(filter);
    }

    let Some(kpi) = kpi else {
        bail!("--kpi is required with --select");
    };
    model.kpis().require(kpi)?;

    let mut chosen = model.selections();
    for text in selections {
        chosen.insert(parse_selection(text, kpi, spec.year)?)?;
    }
    let selected = model.build_selection_predicate(chosen.as_slice(), mode);
    Ok(Predicate::and([filter, selected]))
}

pub fn render_where(predicate: &Predicate, format: PredicateFormat) -> Result<String> {
    Ok(match format {
        PredicateFormat::Sql => SqlWhere.serialize(predicate),
        PredicateFormat::Json => serde_json::to_string_pretty(predicate)?,
    })
}
