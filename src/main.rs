mod app;
mod cli;
mod color;
mod state;
mod ui;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;

use app::ThermoWheelApp;
use cli::{Cli, Commands};
use thermo_wheel::config::AnalysisConfig;
use thermo_wheel::data::loader::load_file;
use thermo_wheel::report::{self, DEFAULT_REPORT_FILE, ReportFormat, ReportSummary};
use thermo_wheel::{Analyzer, Cutoff, ExtraColumns};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = AnalysisConfig::load(cli.config.as_deref())?;
    if let Some(model) = cli.model {
        config.model_path = model;
    }
    if let Some(cutoff) = cli.cutoff {
        config.cutoff = Cutoff::new(cutoff)?;
    }

    match cli.command {
        None => run_gui(config),
        Some(Commands::Analyze {
            input,
            output,
            format,
            passthrough,
        }) => {
            if passthrough {
                config.extra_columns = ExtraColumns::Passthrough;
            }
            analyze(&config, &input, output, format)
        }
    }
}

fn run_gui(config: AnalysisConfig) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Thermo Wheel – Thermal Profile Analysis",
        options,
        Box::new(|_cc| Ok(Box::new(ThermoWheelApp::new(config)))),
    )
    .map_err(|e| anyhow::anyhow!("window failed: {e}"))
}

fn analyze(
    config: &AnalysisConfig,
    input: &Path,
    output: Option<PathBuf>,
    format: Option<ReportFormat>,
) -> Result<()> {
    // Explicit flag, then the output extension, then the config.
    let format = format
        .or_else(|| {
            output
                .as_deref()
                .and_then(|p| p.extension())
                .and_then(|e| e.to_str())
                .and_then(|e| e.parse().ok())
        })
        .unwrap_or(config.report_format);
    let output = output
        .unwrap_or_else(|| Path::new(DEFAULT_REPORT_FILE).with_extension(format.extension()));

    let dataset = load_file(input)?;
    let analyzer = Analyzer::new(config.model_path.clone(), config.options());
    let report = analyzer.run(&dataset).context("analysis failed")?;

    let bytes = report::export(&report, format)?;
    std::fs::write(&output, bytes)
        .with_context(|| format!("writing report to {}", output.display()))?;

    let summary = ReportSummary::from_report(&report);
    println!(
        "{} rows analysed at cut-off {}: {} {}, {} {}",
        summary.total(),
        config.cutoff,
        summary.positive,
        config.labels.positive,
        summary.negative,
        config.labels.negative
    );
    println!("Report written to {}", output.display());
    Ok(())
}
