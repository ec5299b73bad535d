//! Code for the `tablefilter` executable.
use std::io::{Write, stdout};
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use eyre::{Context, Result, bail};
use itertools::Itertools;
use libtablefilter::{
    FilterChange, FilterConfig, FilterId, MemoryTable, TableFilter, logs, parse_delimited,
};
use serde::Serialize;
use tokio::runtime::Builder;
use tracing::info;

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Delimited text file. The first line holds the headers, a header
    /// starting with `!` leaves its column unfiltered.
    file: Utf8PathBuf,
    /// Cell delimiter
    #[clap(long, short, default_value_t = ',')]
    delimiter: char,
    /// Choose an option of a selection filter. COLUMN is a header label or a zero-based index.
    #[clap(long = "select", value_name = "COLUMN=OPTION", value_parser = parse_assignment)]
    selections: Vec<(String, String)>,
    /// Type a pattern into a free-text filter
    #[clap(long = "text", value_name = "COLUMN=PATTERN", value_parser = parse_assignment)]
    patterns: Vec<(String, String)>,
    /// TOML file overriding the default filter configuration
    #[clap(long)]
    config: Option<Utf8PathBuf>,
    /// Print the column profiles instead of the rows
    #[clap(long)]
    profiles: bool,
    /// Print JSON instead of delimited text
    #[clap(long)]
    json: bool,
}

fn parse_assignment(arg: &str) -> std::result::Result<(String, String), String> {
    arg.split_once('=')
        .map(|(column, value)| (column.trim().to_string(), value.to_string()))
        .ok_or_else(|| format!("expected COLUMN=VALUE, got '{arg}'"))
}

#[derive(Serialize)]
struct RowsOutput<'a> {
    headers: Vec<&'a str>,
    rows: Vec<RowOutput<'a>>,
}

#[derive(Serialize)]
struct RowOutput<'a> {
    row: usize,
    cells: Vec<&'a str>,
}

fn main() -> Result<()> {
    simple_eyre::install()?;
    logs::start_logging()?;

    let runtime = Builder::new_current_thread().enable_all().build()?;

    let args = Args::parse();
    let mut out = stdout().lock();
    runtime.block_on(run(args, &mut out))
}

async fn run(args: Args, out: &mut impl Write) -> Result<()> {
    // Every change is known up front, so there is nothing to wait for.
    let config = FilterConfig::load(args.config.as_deref().map(Utf8Path::as_std_path))
        .context("Failed to load filter configuration")?
        .with_debounce(Duration::ZERO);

    let text = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file))?;
    let mut table = TableFilter::attach(parse_delimited(&text, args.delimiter), config);
    if !table.is_attached() {
        bail!("{} has no header line", args.file);
    }

    for (column, option) in &args.selections {
        let id = resolve_filter(&table, column)?;
        table.on_filter_changed(id, FilterChange::option(option))?;
    }
    for (column, pattern) in &args.patterns {
        let id = resolve_filter(&table, column)?;
        table.on_filter_changed(id, FilterChange::text(pattern))?;
    }
    while table.process_next().await.is_some() {}

    if args.profiles {
        write_profiles(&table, args.json, out)
    } else {
        write_rows(&table, args.delimiter, args.json, out)
    }
}

/// Finds the filter of a column given by header label or index.
fn resolve_filter(table: &TableFilter<MemoryTable>, column: &str) -> Result<FilterId> {
    let labels = table.surface().header_labels();
    let Some(index) = labels
        .iter()
        .position(|label| *label == column)
        .or_else(|| column.parse().ok().filter(|index| *index < labels.len()))
    else {
        bail!("No column '{column}', expected one of: {}", labels.iter().join(", "));
    };

    let id = FilterId(index);
    if table.registry().filter(id).is_none() {
        bail!("Column '{}' has no filter", labels[index]);
    }
    Ok(id)
}

fn write_rows(
    table: &TableFilter<MemoryTable>,
    delimiter: char,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let surface = table.surface();
    let headers = surface.header_labels();
    let rows = surface
        .visible_rows()
        .into_iter()
        .filter_map(|row| {
            let cells = surface
                .row(row)?
                .cells
                .iter()
                .map(|cell| cell.markup.as_str())
                .collect();
            Some(RowOutput { row, cells })
        })
        .collect_vec();
    info!(
        visible = rows.len(),
        total = surface.rows().count(),
        "filtered rows"
    );

    if json {
        serde_json::to_writer_pretty(&mut *out, &RowsOutput { headers, rows })?;
        writeln!(out)?;
    } else {
        let separator = delimiter.to_string();
        writeln!(out, "{}", headers.iter().join(&separator))?;
        for row in rows {
            writeln!(out, "{}", row.cells.iter().join(&separator))?;
        }
    }
    Ok(())
}

fn write_profiles(
    table: &TableFilter<MemoryTable>,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let labels = table.surface().header_labels();
    if json {
        serde_json::to_writer_pretty(&mut *out, table.profiles())?;
        writeln!(out)?;
        return Ok(());
    }

    for profile in table.profiles() {
        let label = labels.get(profile.column_index).copied().unwrap_or_default();
        let control = if profile.filterable {
            profile.strategy.to_string()
        } else {
            "none".to_string()
        };
        writeln!(
            out,
            "{label}\t{control}\t{}\t{}",
            profile.distinct_count(),
            profile.distinct_values.iter().join(", ")
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELEASES: &str = "\
!Id,Product,Years,Owner
1,Alpha,2019<br>2020,ann
2,Beta,2020,bob
3,Gamma,,cid
4,Delta,2021,dan
5,Epsilon,2022,eve
";

    fn temp_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .expect("temp file");
        file.write_all(content.as_bytes()).expect("write");
        file
    }

    fn path_of(file: &tempfile::NamedTempFile) -> String {
        file.path().to_str().expect("utf-8 path").to_string()
    }

    async fn run_with(extra: &[&str]) -> Result<String> {
        let file = temp_file(".csv", RELEASES);
        let path = path_of(&file);

        let args = Args::try_parse_from(
            ["tablefilter", path.as_str()]
                .into_iter()
                .chain(extra.iter().copied()),
        )
        .expect("arguments");
        let mut out = vec![];
        run(args, &mut out).await?;
        Ok(String::from_utf8(out).expect("utf-8 output"))
    }

    #[test]
    fn assignments_split_on_first_equals() {
        assert_eq!(
            parse_assignment("Owner=a=b"),
            Ok(("Owner".to_string(), "a=b".to_string()))
        );
        assert!(parse_assignment("Owner").is_err());
    }

    #[tokio::test]
    async fn prints_every_row_without_filters() {
        let output = run_with(&[]).await.expect("run");
        assert_eq!(output.lines().count(), 6);
        assert_eq!(output.lines().next(), Some("Id,Product,Years,Owner"));
    }

    #[tokio::test]
    async fn selection_by_label_and_index() {
        let by_label = run_with(&["--select", "Years=2020"]).await.expect("run");
        let by_index = run_with(&["--select", "2=2020"]).await.expect("run");
        assert_eq!(by_label, by_index);
        assert_eq!(
            by_label.lines().skip(1).collect_vec(),
            vec!["1,Alpha,2019<br>2020,ann", "2,Beta,2020,bob"]
        );
    }

    #[tokio::test]
    async fn text_patterns_are_applied() {
        let config = temp_file(".toml", "max_distinct_values = 4\n");
        let config_path = path_of(&config);
        let output = run_with(&[
            "--config",
            config_path.as_str(),
            "--text",
            "Product=LTA",
            "--text",
            "Owner=d",
        ])
        .await
        .expect("run");
        assert_eq!(output.lines().skip(1).collect_vec(), vec!["4,Delta,2021,dan"]);
    }

    #[tokio::test]
    async fn text_pattern_on_selection_column_fails() {
        let error = run_with(&["--text", "Owner=e"]).await.expect_err("mismatch");
        assert!(error.to_string().contains("cannot take this change"));
    }

    #[tokio::test]
    async fn json_rows() {
        let output = run_with(&["--json", "--select", "Years=Empty Only"])
            .await
            .expect("run");
        let value: serde_json::Value = serde_json::from_str(&output).expect("json");
        assert_eq!(value["rows"].as_array().map(Vec::len), Some(1));
        assert_eq!(value["rows"][0]["row"], 2);
        assert_eq!(value["headers"][0], "Id");
    }

    #[tokio::test]
    async fn profiles_are_listed() {
        let output = run_with(&["--profiles"]).await.expect("run");
        let lines = output.lines().collect_vec();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Product\tselection\t5\t"));
        assert!(lines[1].starts_with("Years\tselection\t5\t"));
    }

    #[tokio::test]
    async fn unfiltered_column_is_rejected() {
        let error = run_with(&["--select", "Id=1"]).await.expect_err("no filter");
        assert!(error.to_string().contains("has no filter"));

        let error = run_with(&["--select", "Colour=Red"]).await.expect_err("no column");
        assert!(error.to_string().contains("No column 'Colour'"));
    }
}
