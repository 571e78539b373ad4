use std::fmt::Write as _;

use super::{AggregationOutput, GroupRow};
use crate::core::ConditionClass;
use crate::formatting::Styler;

const CLASS_WIDTH: usize = 10;

pub fn render_aggregation(output: &AggregationOutput, styler: &Styler) -> String {
    let classes = output.mode.classes();
    let label_width = output
        .groups
        .iter()
        .map(|g| g.label.chars().count())
        .chain([output.group_by.len(), output.overall.label.len()])
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        styler.header(&format!(
            "{} {} by {}",
            output.kpi_label, output.year, output.group_by
        ))
    );

    let mut header = format!("{:<label_width$}", capitalize(&output.group_by));
    for class in classes {
        let _ = write!(header, " {:>w$}", class.label(), w = CLASS_WIDTH);
    }
    let _ = write!(header, " {:>w$} {:>8}", "Fair+", "Total", w = CLASS_WIDTH);
    let _ = writeln!(out, "{}", styler.header(&header));

    for group in &output.groups {
        let _ = writeln!(out, "{}", table_row(group, classes, label_width, styler));
    }
    let _ = writeln!(out, "{}", styler.dim(&"-".repeat(header.chars().count())));
    let _ = writeln!(
        out,
        "{}",
        table_row(&output.overall, classes, label_width, styler)
    );

    if output.groups.iter().any(|g| g.value_statistics.is_some()) {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", styler.header("Value statistics"));
        let _ = writeln!(
            out,
            "{:<label_width$} {:>7} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9}",
            "", "n", "min", "p25", "median", "p75", "max", "mean"
        );
        for group in &output.groups {
            let Some(stats) = &group.value_statistics else {
                continue;
            };
            let pct = |p| {
                stats
                    .percentile(p)
                    .map(|v| format!("{:.2}", v))
                    .unwrap_or_else(|| "-".to_string())
            };
            let _ = writeln!(
                out,
                "{:<label_width$} {:>7} {:>9.2} {:>9} {:>9} {:>9} {:>9.2} {:>9.2}",
                group.label,
                stats.count,
                stats.min,
                pct(25),
                pct(50),
                pct(75),
                stats.max,
                stats.mean
            );
        }
    }

    let s = &output.statistics;
    let mut footer = format!(
        "{} records, {} classified, {} without a usable value",
        s.records_processed, s.records_classified, s.missing_value
    );
    if s.unresolved_group > 0 {
        let _ = write!(footer, ", {} dropped (no {})", s.unresolved_group, output.group_by);
        let _ = writeln!(out, "{}", styler.warning(&footer));
    } else {
        let _ = writeln!(out, "{}", styler.dim(&footer));
    }
    out
}

fn table_row(
    group: &GroupRow,
    classes: &[ConditionClass],
    label_width: usize,
    styler: &Styler,
) -> String {
    let mut line = format!("{:<label_width$}", group.label);
    for &class in classes {
        let cell = format!(" {:>w$.1}%", group.percentages.get(class), w = CLASS_WIDTH - 1);
        line.push_str(&styler.class(class, &cell));
    }
    let _ = write!(
        line,
        " {:>w$.1}% {:>8}",
        group.percentages.fair_or_better,
        group.total,
        w = CLASS_WIDTH - 1
    );
    line
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
