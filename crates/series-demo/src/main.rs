// File: crates/series-demo/src/main.rs
// Summary: Demo loads a CSV item source, builds a chart from a JSON description, runs the update
// pass and writes the generated segments, labels and canvas commands as JSON.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::json;
use series_core::{AnimationProgress, Chart, ChartDescription, Item, RecordingCanvas, Value};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Accept paths from CLI or fall back to the bundled sample
    let mut args = std::env::args().skip(1);
    let csv_raw = args.next().unwrap_or_else(|| "data/quarterly.csv".to_string());
    let desc_raw = args.next().unwrap_or_else(|| "data/quarterly.json".to_string());

    let csv_path = resolve_path(&csv_raw)?;
    let desc_path = resolve_path(&desc_raw)?;
    info!(csv = %csv_path.display(), description = %desc_path.display(), "inputs");

    let items = load_csv_items(&csv_path).with_context(|| format!("failed to load CSV '{}'", csv_path.display()))?;
    if items.is_empty() {
        anyhow::bail!("no rows loaded, check headers/delimiter.");
    }
    info!(rows = items.len(), "loaded items");

    let text = std::fs::read_to_string(&desc_path).with_context(|| format!("reading {}", desc_path.display()))?;
    let desc = ChartDescription::from_json_str(&text).with_context(|| format!("parsing {}", desc_path.display()))?;
    let mut chart = Chart::from_description(&desc)?;
    for i in 0..chart.series_count() {
        chart.set_items(i, items.iter().cloned());
    }

    let updated = chart.update();
    info!(updated, "update pass finished");
    for s in chart.iter_series() {
        if s.store().is_empty() {
            warn!(series = s.name(), "series has no data; check its binding paths");
        }
    }

    let mut canvas = RecordingCanvas::new();
    chart.draw(&mut canvas, AnimationProgress::DONE);

    let dump = json!({
        "title": chart.title,
        "plot": chart.frame().map(|f| f.plot),
        "series": chart.iter_series().map(|s| json!({
            "name": s.name(),
            "kind": s.kind(),
            "rows": s.store().len(),
            "segments": s.segments(),
            "labels": s.labels(),
        })).collect::<Vec<_>>(),
        "legend": chart.legend_items(),
        "commands": canvas.commands,
    });
    let out = out_name_with(&csv_path)?;
    std::fs::write(&out, serde_json::to_string_pretty(&dump)?).with_context(|| format!("writing {}", out.display()))?;
    info!(path = %out.display(), commands = canvas.len(), "wrote dump");
    Ok(())
}

/// Resolve a path as given, then relative to this crate.
fn resolve_path(raw: &str) -> Result<PathBuf> {
    let p = Path::new(raw);
    if p.exists() {
        return Ok(p.to_path_buf());
    }
    let alt = Path::new(env!("CARGO_MANIFEST_DIR")).join(raw);
    if alt.exists() {
        return Ok(alt);
    }
    anyhow::bail!("file not found: {}", p.display());
}

/// Output file name like target/out/series_<stem>.json
fn out_name_with(input: &Path) -> Result<PathBuf> {
    let stem = input.file_stem().and_then(|s| s.to_str()).unwrap_or("chart");
    let mut out = PathBuf::from("target/out");
    std::fs::create_dir_all(&out).with_context(|| format!("creating {}", out.display()))?;
    out.push(format!("series_{stem}.json"));
    Ok(out)
}

/// Load a headed CSV into record items keyed by lower-cased header.
fn load_csv_items(path: &Path) -> Result<Vec<Item>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = rdr.headers()?.iter().map(|h| h.to_lowercase()).collect::<Vec<_>>();
    info!(?headers, "csv headers");

    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let fields = headers.iter().zip(rec.iter()).map(|(h, cell)| (h.clone(), cell_value(cell)));
        out.push(Arc::new(Value::record(fields)));
    }
    Ok(out)
}

/// Numbers, booleans, `;`-separated sample lists, ISO dates, otherwise text.
fn cell_value(cell: &str) -> Value {
    if cell.is_empty() {
        return Value::Null;
    }
    if let Ok(n) = cell.parse::<f64>() {
        return Value::from(n);
    }
    if let Ok(b) = cell.parse::<bool>() {
        return Value::from(b);
    }
    if cell.contains(';') {
        let parts: Option<Vec<Value>> = cell.split(';').map(|s| s.trim().parse::<f64>().ok().map(Value::from)).collect();
        if let Some(list) = parts {
            return Value::List(list);
        }
    }
    Value::from(serde_json::Value::String(cell.to_string()))
}
