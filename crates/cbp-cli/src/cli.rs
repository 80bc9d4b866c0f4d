//! CLI argument definitions for the clinical export.

use std::path::PathBuf;

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;

use cbp_transform::MergeOptions;

use crate::logging::{LogConfig, LogFormat};
use crate::pipeline::RunConfig;

#[derive(Parser)]
#[command(
    name = "cbp-clinical",
    version,
    about = "Prepare cBioPortal clinical data for trial matching",
    long_about = "Merge a cBioPortal clinical sample file with its patient file.\n\n\
                  Writes one CSV row per sample with the trial-match clinical columns,\n\
                  stamped with the study identifier from meta_study.txt."
)]
pub struct Cli {
    /// Clinical sample file (tab-delimited, 4-line preamble).
    #[arg(
        short = 's',
        long = "sample-file",
        value_name = "PATH",
        required_unless_present = "study_dir"
    )]
    pub sample_file: Option<PathBuf>,

    /// Clinical patient file (tab-delimited, 4-line preamble).
    #[arg(
        short = 'p',
        long = "patient-file",
        value_name = "PATH",
        required_unless_present = "study_dir"
    )]
    pub patient_file: Option<PathBuf>,

    /// Study metadata file containing `cancer_study_identifier`.
    #[arg(
        long = "study-file",
        visible_alias = "st",
        value_name = "PATH",
        required_unless_present = "study_dir"
    )]
    pub study_file: Option<PathBuf>,

    /// Output CSV path.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        required_unless_present = "study_dir"
    )]
    pub output: Option<PathBuf>,

    /// cBioPortal study folder; supplies default paths for any file flag not given.
    #[arg(long = "study-dir", value_name = "DIR")]
    pub study_dir: Option<PathBuf>,

    /// Accept repeated PATIENT_ID values in the patient file (rows fan out).
    #[arg(long = "allow-duplicate-patients")]
    pub allow_duplicate_patients: bool,

    /// Enable debug logging (same as --log-level debug).
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Append logs to a file instead of stderr (created if absent).
    #[arg(short = 'l', long = "logto", value_name = "PATH")]
    pub logto: Option<PathBuf>,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q and --debug).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Allow patient-level values in TRACE logs.
    #[arg(long = "log-data")]
    pub log_data: bool,

    /// Do not print the summary table after a successful run.
    #[arg(long = "quiet-summary")]
    pub quiet_summary: bool,
}

impl Cli {
    /// Resolve file paths: explicit flags win over `--study-dir` defaults.
    pub fn run_config(&self) -> RunConfig {
        let base = self.study_dir.clone().unwrap_or_default();
        let mut config = RunConfig::for_study_dir(&base);
        if let Some(path) = &self.sample_file {
            config.sample_file = path.clone();
        }
        if let Some(path) = &self.patient_file {
            config.patient_file = path.clone();
        }
        if let Some(path) = &self.study_file {
            config.study_file = path.clone();
        }
        if let Some(path) = &self.output {
            config.output = path.clone();
        }
        config.with_merge_options(
            MergeOptions::default().with_allow_duplicate_patients(self.allow_duplicate_patients),
        )
    }

    /// Logging configuration from the flags.
    ///
    /// Level precedence: `--log-level`, then `--debug`, then `-v/-q`. `RUST_LOG`
    /// is honoured only when none of them is given.
    pub fn log_config(&self) -> LogConfig {
        let mut config = LogConfig {
            level_filter: self.verbosity.tracing_level_filter(),
            ..LogConfig::default()
        };
        config.use_env_filter =
            !(self.verbosity.is_present() || self.log_level.is_some() || self.debug);
        if self.debug {
            config.level_filter = LevelFilter::DEBUG;
        }
        if let Some(level) = self.log_level {
            config.level_filter = match level {
                LogLevelArg::Error => LevelFilter::ERROR,
                LogLevelArg::Warn => LevelFilter::WARN,
                LogLevelArg::Info => LevelFilter::INFO,
                LogLevelArg::Debug => LevelFilter::DEBUG,
                LogLevelArg::Trace => LevelFilter::TRACE,
            };
        }
        config.format = match self.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        };
        config.log_file = self.logto.clone();
        config.log_data = self.log_data;
        config.with_ansi = match self.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.logto.is_none() && io::stderr().is_terminal(),
        };
        config
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
