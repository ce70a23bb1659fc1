//! CLI argument definitions for the division generator.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "divgen",
    version,
    about = "Split a tournament registration CSV into per-division roster workbooks",
    long_about = "Split a tournament registration CSV into per-division roster workbooks.\n\n\
                  Writes one workbook per belt bucket and gender (one sheet per division)\n\
                  plus one workbook per bonus division into output_<timestamp>/."
)]
pub struct Cli {
    /// Registration export (CSV with a header row).
    #[arg(value_name = "CSV")]
    pub file_in: PathBuf,

    /// Directory under which output_<timestamp>/ is created.
    #[arg(long = "dir-out-root", value_name = "DIR", default_value = ".")]
    pub dir_out_root: PathBuf,

    /// Plan and report without writing any files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Prefix log lines with a timestamp.
    #[arg(long = "log-timestamps")]
    pub log_timestamps: bool,

    /// Include the emitting module path in log lines.
    #[arg(long = "log-target")]
    pub log_target: bool,
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

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_source_and_flags() {
        let cli = Cli::try_parse_from([
            "divgen",
            "registrations.csv",
            "--dir-out-root",
            "/tmp/rosters",
            "--dry-run",
            "--log-format",
            "json",
        ])
        .expect("parse");

        assert_eq!(cli.file_in, PathBuf::from("registrations.csv"));
        assert_eq!(cli.dir_out_root, PathBuf::from("/tmp/rosters"));
        assert!(cli.dry_run);
        assert!(matches!(cli.log_format, LogFormatArg::Json));
        assert!(cli.log_level.is_none());
        assert!(!cli.log_timestamps);
        assert!(!cli.log_target);
    }

    #[test]
    fn parses_log_decoration_flags() {
        let cli = Cli::try_parse_from([
            "divgen",
            "registrations.csv",
            "--log-timestamps",
            "--log-target",
        ])
        .expect("parse");

        assert!(cli.log_timestamps);
        assert!(cli.log_target);
    }

    #[test]
    fn source_path_is_required() {
        assert!(Cli::try_parse_from(["divgen"]).is_err());
    }
}
