//! Score command implementation for the SA2 CLI.

use std::collections::BTreeSet;
use std::io::{BufWriter, Write};

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use sa2_fs::create_utf8_file;
use sa2_scorer::{ScoringConfig, ScoringReport, score_regions};
use serde::{Deserialize, Serialize};

use crate::input::{DecodeSummary, load_bundle};
use crate::output::write_table;
use crate::{
    ARG_FORMAT, ARG_MIN_POPULATION, ARG_OUTPUT, ARG_SCORE_BUNDLE, ARG_ZONES, CliError,
    ENV_SCORE_BUNDLE, OutputFormat,
};

/// CLI arguments for the `score` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Score every SA2 region in a prepared input bundle. The \
                 bundle is a JSON document holding regions, population, \
                 businesses, stops, catchments, points of interest and \
                 income, with GeoJSON geometries. Options can come from CLI \
                 flags, configuration files, or environment variables.",
    about = "Rank SA2 regions by how well-resourced they are"
)]
#[ortho_config(prefix = "SA2")]
pub(crate) struct ScoreArgs {
    /// Path to the JSON input bundle.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) bundle: Option<Utf8PathBuf>,
    /// Write the table here instead of standard output.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
    /// Table encoding.
    #[arg(long = ARG_FORMAT, value_enum)]
    #[serde(default)]
    pub(crate) format: Option<OutputFormat>,
    /// Minimum resident population for a region to be scored.
    #[arg(long = ARG_MIN_POPULATION, value_name = "count")]
    #[serde(default)]
    pub(crate) min_population: Option<u64>,
    /// Comma-separated SA4 zones to restrict the run to.
    #[arg(long = ARG_ZONES, value_name = "names")]
    #[serde(default)]
    pub(crate) zones: Option<String>,
}

impl ScoreArgs {
    pub(crate) fn into_config(self) -> Result<ScoreConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ScoreConfig::try_from(merged)
    }
}

/// Resolved `score` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScoreConfig {
    /// Path to the input bundle.
    pub(crate) bundle: Utf8PathBuf,
    /// Output file, or `None` for standard output.
    pub(crate) output: Option<Utf8PathBuf>,
    /// Table encoding.
    pub(crate) format: OutputFormat,
    /// Engine parameters.
    pub(crate) scoring: ScoringConfig,
}

impl ScoreConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        Self::require_existing(&self.bundle, ARG_SCORE_BUNDLE)
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match sa2_fs::file_is_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::SourcePathNotFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                Err(CliError::MissingSourceFile {
                    field,
                    path: path.to_path_buf(),
                })
            }
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

impl TryFrom<ScoreArgs> for ScoreConfig {
    type Error = CliError;

    fn try_from(args: ScoreArgs) -> Result<Self, Self::Error> {
        let bundle = args.bundle.ok_or(CliError::MissingArgument {
            field: ARG_SCORE_BUNDLE,
            env: ENV_SCORE_BUNDLE,
        })?;
        let defaults = ScoringConfig::default();
        let scoring = ScoringConfig {
            min_population: args.min_population.unwrap_or(defaults.min_population),
            zones: args.zones.as_deref().map(parse_zones),
            ..defaults
        };
        Ok(Self {
            bundle,
            output: args.output,
            format: args.format.unwrap_or_default(),
            scoring,
        })
    }
}

/// Split a comma-separated zone list, dropping blank entries.
pub(crate) fn parse_zones(raw: &str) -> BTreeSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|zone| !zone.is_empty())
        .map(str::to_owned)
        .collect()
}

pub(super) fn run_score(args: ScoreArgs) -> Result<(), CliError> {
    let config = resolve_score_config(args)?;
    match &config.output {
        Some(path) => {
            let file = create_utf8_file(path).map_err(|source| CliError::CreateOutput {
                path: path.clone(),
                source,
            })?;
            let mut writer = BufWriter::new(file);
            execute_score(&config, &mut writer)?;
            writer.flush().map_err(CliError::WriteOutput)?;
            info!("Wrote score table to {path}");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            execute_score(&config, &mut stdout)?;
        }
    }
    Ok(())
}

fn resolve_score_config(args: ScoreArgs) -> Result<ScoreConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

/// Result of one `score` run: the engine report plus the bundle records that
/// never reached the engine.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScoreRun {
    pub(crate) report: ScoringReport,
    pub(crate) decoded: DecodeSummary,
}

/// Load the bundle, score it and write the table to `writer`.
pub(super) fn execute_score(
    config: &ScoreConfig,
    writer: &mut dyn Write,
) -> Result<ScoreRun, CliError> {
    let (inputs, decoded) = load_bundle(&config.bundle)?.into_inputs();
    let report = score_regions(inputs, &config.scoring)?;
    for zone in report.zone_summaries() {
        info!(
            "Zone {}: {} regions, median score {:.3}",
            zone.zone, zone.regions, zone.median_score
        );
    }
    if let Some(correlation) = report.income_correlation() {
        info!("Score and median income correlation: {correlation:.3}");
    }
    write_table(writer, &report.table, config.format)?;
    Ok(ScoreRun { report, decoded })
}
