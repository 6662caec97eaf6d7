//! CLI argument definitions for the matching tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "intern-match",
    version,
    about = "Rank internship postings for a candidate profile",
    long_about = "Rank internship postings for a candidate profile using a \
                  declarative rule document.\n\n\
                  Hard rules gate eligibility, soft rules produce a weighted \
                  score, fairness boosts are applied under a cap, and every \
                  match carries a full explain payload."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Rank a candidate pool for one profile.
    Rank(RankArgs),

    /// Evaluate a single profile/posting pair and print the breakdown.
    Explain(ExplainArgs),

    /// Validate a rule document and list its rules.
    Rules(RulesArgs),
}

#[derive(Parser)]
pub struct RankArgs {
    /// Candidate profile (JSON).
    #[arg(long = "profile", value_name = "PATH")]
    pub profile: PathBuf,

    /// Candidate pool (JSON array or CSV).
    #[arg(long = "pool", value_name = "PATH")]
    pub pool: PathBuf,

    /// Rule document (TOML or JSON); built-in rules when omitted.
    #[arg(long = "rules", value_name = "PATH")]
    pub rules: Option<PathBuf>,

    /// Maximum number of matches to return.
    #[arg(long = "limit", default_value_t = 10)]
    pub limit: usize,

    /// Emit the ranked matches as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,

    /// Feed the pool to the engine without the verified/active/deadline
    /// pre-filter. The engine itself never checks these.
    #[arg(long = "no-prefilter")]
    pub no_prefilter: bool,
}

#[derive(Parser)]
pub struct ExplainArgs {
    /// Candidate profile (JSON).
    #[arg(long = "profile", value_name = "PATH")]
    pub profile: PathBuf,

    /// A single posting (JSON).
    #[arg(long = "candidate", value_name = "PATH")]
    pub candidate: PathBuf,

    /// Rule document (TOML or JSON); built-in rules when omitted.
    #[arg(long = "rules", value_name = "PATH")]
    pub rules: Option<PathBuf>,

    /// Emit the evaluation as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Parser)]
pub struct RulesArgs {
    /// Rule document (TOML or JSON); built-in rules when omitted.
    #[arg(long = "rules", value_name = "PATH")]
    pub rules: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
