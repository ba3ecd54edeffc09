//! Clarke CLI Library
//!
//! CSV / demo samples → zone tally → JSON report + SVG grid

pub mod demo_data;
pub mod samples_csv;

use anyhow::{Context, Result};
use clarke_core::{GridRenderer, StyleConfig, SvgExporter, ZoneReport, ZoneTally};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub use demo_data::{generate_demo_data, DemoData};
pub use samples_csv::{parse_paired_csv, read_paired_csv, PairedColumns, ParseStats};

/// Report file written next to the plot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Where the samples came from (file path or "demo")
    pub source: String,
    /// Creation time (RFC3339)
    pub generated_at: String,
    #[serde(flatten)]
    pub zones: ZoneReport,
}

/// Outputs requested for one run
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    pub style: StyleConfig,
    pub title: Option<String>,
    pub svg_out: Option<PathBuf>,
    pub report_out: Option<PathBuf>,
}

/// Load a style file; `.yaml`/`.yml` is read as YAML, anything else as JSON.
pub fn load_style(path: &Path) -> Result<StyleConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read style file: {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let style = if is_yaml {
        StyleConfig::from_yaml(&text)
    } else {
        StyleConfig::from_json(&text)
    };
    style.with_context(|| format!("Invalid style file: {}", path.display()))
}

/// Classify, then write whatever outputs were requested.
pub fn run_analysis(
    source: &str,
    reference: &[f64],
    prediction: &[f64],
    options: &AnalysisOptions,
) -> Result<ZoneTally> {
    let renderer = GridRenderer::new(options.style.clone()).context("Invalid style")?;
    let (surface, tally) = renderer
        .render_with_zones(reference, prediction, options.title.as_deref())
        .context("Failed to analyze samples")?;

    if let Some(svg_path) = &options.svg_out {
        let svg = SvgExporter::default()
            .export(&surface)
            .context("Failed to render SVG")?;
        write_output(svg_path, &svg)?;
    }

    if let Some(report_path) = &options.report_out {
        let report = AnalysisReport {
            source: source.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            zones: ZoneReport::from_tally(&tally),
        };
        let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        write_output(report_path, &json)?;
    }

    Ok(tally)
}

/// Grid backdrop without samples
pub fn write_grid(style: StyleConfig, svg_path: &Path) -> Result<()> {
    let renderer = GridRenderer::new(style).context("Invalid style")?;
    let mut surface = renderer.new_surface();
    renderer.draw_grid(&mut surface);
    let svg = SvgExporter::default()
        .export(&surface)
        .context("Failed to render SVG")?;
    write_output(svg_path, &svg)
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}
