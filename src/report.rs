use crate::metrics::{CentralTendency, SummaryTable, VarComparison, WealthPath};
use anyhow::{Context, Result};
use indexmap::IndexMap;
use prettytable::{Cell, Row, Table};
use std::path::Path;

fn header(first: &str, assets: impl Iterator<Item = impl AsRef<str>>) -> Row {
    let mut cells = vec![Cell::new(first)];
    cells.extend(assets.map(|name| Cell::new(name.as_ref())));
    Row::new(cells)
}

fn value(v: f64) -> Cell {
    Cell::new(&format!("{:.6}", v))
}

//metrics as rows, assets as columns
pub fn summary_table(summary: &SummaryTable) -> Table {
    let mut table = Table::new();
    table.add_row(header("Metric", summary.keys()));

    for (i, name) in crate::metrics::SummaryStats::METRIC_NAMES.iter().enumerate() {
        let mut cells = vec![Cell::new(name)];
        cells.extend(summary.values().map(|stats| value(stats.metrics()[i].1)));
        table.add_row(Row::new(cells));
    }

    table
}

pub fn var_comparison_table(comparison: &IndexMap<String, VarComparison>, level: f64) -> Table {
    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Asset"),
        Cell::new(&format!("Gaussian ({}%)", level)),
        Cell::new(&format!("Cornish-Fisher ({}%)", level)),
        Cell::new(&format!("Historic ({}%)", level)),
    ]));

    for (asset, var) in comparison {
        table.add_row(Row::new(vec![
            Cell::new(asset),
            value(var.gaussian),
            value(var.cornish_fisher),
            value(var.historic),
        ]));
    }

    table
}

//one column per value map, rows sorted ascending by the first map
pub fn ranked_table(title: &str, columns: &[(&str, &IndexMap<String, f64>)]) -> Table {
    let mut table = Table::new();
    table.add_row(header(title, columns.iter().map(|(name, _)| *name)));

    let Some((_, first)) = columns.first() else {
        return table;
    };

    let mut assets: Vec<(&String, f64)> = first.iter().map(|(k, v)| (k, *v)).collect();
    assets.sort_by(|a, b| a.1.total_cmp(&b.1));

    for (asset, _) in assets {
        let mut cells = vec![Cell::new(asset)];
        cells.extend(columns.iter().map(|(_, values)| {
            values.get(asset).map(|v| value(*v)).unwrap_or_else(|| Cell::new("-"))
        }));
        table.add_row(Row::new(cells));
    }

    table
}

pub fn normality_table(verdicts: &IndexMap<String, bool>) -> Table {
    let mut table = Table::new();
    table.add_row(Row::new(vec![Cell::new("Asset"), Cell::new("Normal")]));
    for (asset, normal) in verdicts {
        table.add_row(Row::new(vec![Cell::new(asset), Cell::new(&normal.to_string())]));
    }
    table
}

pub fn central_tendency_table(values: &IndexMap<String, CentralTendency>) -> Table {
    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Asset"),
        Cell::new("Mean"),
        Cell::new("Median"),
        Cell::new("Mean > Median"),
    ]));
    for (asset, ct) in values {
        table.add_row(Row::new(vec![
            Cell::new(asset),
            value(ct.mean),
            value(ct.median),
            Cell::new(&ct.mean_exceeds_median.to_string()),
        ]));
    }
    table
}

pub fn drawdown_table(asset: &str, path: &WealthPath) -> Table {
    let mut table = Table::new();
    table.add_row(Row::new(vec![Cell::new("Metric"), Cell::new(asset)]));
    table.add_row(Row::new(vec![
        Cell::new("Initial Wealth"),
        Cell::new(&format!("{:.2}", path.initial_wealth)),
    ]));
    table.add_row(Row::new(vec![
        Cell::new("Final Wealth"),
        Cell::new(&format!("{:.2}", path.final_wealth())),
    ]));
    table.add_row(Row::new(vec![
        Cell::new("Max Drawdown"),
        Cell::new(&format!("{:.2}%", path.max_drawdown() * 100.0)),
    ]));
    let trough = path
        .trough()
        .map(|p| p.period.to_string())
        .unwrap_or_else(|| "-".to_string());
    table.add_row(Row::new(vec![Cell::new("Trough"), Cell::new(&trough)]));
    table
}

//writes period, wealth, peak and drawdown columns
pub fn write_wealth_path_csv(path: &WealthPath, output: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(output)
        .context(format!("Failed to create CSV file: {:?}", output))?;

    writer.write_record(["period", "wealth", "peak", "drawdown"])?;
    for point in &path.points {
        writer.write_record([
            point.period.to_string(),
            point.wealth.to_string(),
            point.peak.to_string(),
            point.drawdown.to_string(),
        ])?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ReturnSeries, ReturnTable};
    use crate::metrics::{drawdown, summary_stats_table};

    #[test]
    fn summary_table_has_a_row_per_metric() {
        let table = ReturnTable::from_columns(vec![
            ("a", ReturnSeries::from_values(vec![0.01, -0.02, 0.03, -0.01, 0.02])),
            ("b", ReturnSeries::from_values(vec![-0.05, -0.01, 0.0, 0.02, 0.04])),
        ])
        .unwrap();

        let rendered = summary_table(&summary_stats_table(&table).unwrap());
        assert_eq!(rendered.len(), 9);
        assert_eq!(rendered.get_row(0).unwrap().len(), 3);
        assert!(rendered.to_string().contains("Semideviation"));
    }

    #[test]
    fn ranked_table_sorts_by_first_column() {
        let mut skew = IndexMap::new();
        skew.insert("high".to_string(), 1.0);
        skew.insert("low".to_string(), -1.0);

        let rendered = ranked_table("Asset", &[("Skewness", &skew)]);
        let text = rendered.to_string();
        assert!(text.find("low").unwrap() < text.find("high").unwrap());
    }

    #[test]
    fn wealth_path_csv_has_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("dd.csv");
        let path = drawdown(&ReturnSeries::from_values(vec![0.1, -0.5]), 1000.0).unwrap();

        write_wealth_path_csv(&path, &output).unwrap();
        let contents = std::fs::read_to_string(&output).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "period,wealth,peak,drawdown");
        assert_eq!(lines.len(), 3);
        assert!(lines[2].starts_with("1970-02,"));
        assert!(lines[2].ends_with(",-0.5"));
    }
}
