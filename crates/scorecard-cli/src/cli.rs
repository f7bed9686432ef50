//! CLI argument definitions for the score card reconciler.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use scorecard_cli::config::Settings;
use scorecard_combine::MissingPolicy;
use scorecard_report::{ReportFieldsLayout, Section};

#[derive(Parser)]
#[command(
    name = "scorecard",
    version,
    about = "Score card parameter reconciler - join PMML, schema and spreadsheet inputs",
    long_about = "Reconcile credit score card parameters across a PMML model, a schema\n\
                  text file and a method spreadsheet, then generate the runtime,\n\
                  audit, integration and report-field code for every card."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
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
    /// Reconcile the inputs and print the generated code.
    Generate(GenerateArgs),

    /// Reconcile the inputs and print a summary without generating code.
    Check(InputArgs),

    /// Show what the schema and the spreadsheet know about one parameter.
    Lookup(LookupArgs),
}

/// Input directory and run settings shared by `generate` and `check`.
#[derive(Args)]
pub struct InputArgs {
    /// Directory holding the spreadsheet, the schema .txt and the .pmml files.
    #[arg(value_name = "DIR")]
    pub input_dir: PathBuf,

    /// Settings file (default: scorecard.toml in DIR when present).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Layout of the report-fields section.
    #[arg(long = "report-fields", value_enum)]
    pub report_fields: Option<ReportFieldsArg>,

    /// Line number preceding the first advanced report field.
    #[arg(long = "report-line-start", value_name = "N")]
    pub report_line_start: Option<u32>,

    /// What to do with a parameter missing from the schema.
    #[arg(long = "missing-type", value_enum)]
    pub missing_type: Option<MissingPolicyArg>,

    /// What to do with a parameter without a spreadsheet method.
    #[arg(long = "missing-method", value_enum)]
    pub missing_method: Option<MissingPolicyArg>,
}

impl InputArgs {
    /// Settings given on the command line; unset flags stay `None`.
    pub fn flag_settings(&self) -> Settings {
        Settings {
            report_fields: self.report_fields.map(ReportFieldsLayout::from),
            report_line_start: self.report_line_start,
            missing_type: self.missing_type.map(MissingPolicy::from),
            missing_method: self.missing_method.map(MissingPolicy::from),
        }
    }
}

#[derive(Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Print only this section of every card.
    #[arg(long = "section", value_enum)]
    pub section: Option<SectionArg>,
}

#[derive(Args)]
pub struct LookupArgs {
    /// Directory holding the spreadsheet and the schema .txt.
    #[arg(value_name = "DIR")]
    pub input_dir: PathBuf,

    /// Parameter name, matched without regard to case.
    #[arg(value_name = "NAME")]
    pub name: String,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFieldsArg {
    Standard,
    Advanced,
}

impl From<ReportFieldsArg> for ReportFieldsLayout {
    fn from(arg: ReportFieldsArg) -> Self {
        match arg {
            ReportFieldsArg::Standard => ReportFieldsLayout::Standard,
            ReportFieldsArg::Advanced => ReportFieldsLayout::Advanced,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum MissingPolicyArg {
    /// Reject the whole card.
    FailCard,
    /// Drop the parameter and keep the card.
    Skip,
}

impl From<MissingPolicyArg> for MissingPolicy {
    fn from(arg: MissingPolicyArg) -> Self {
        match arg {
            MissingPolicyArg::FailCard => MissingPolicy::FailCard,
            MissingPolicyArg::Skip => MissingPolicy::Skip,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SectionArg {
    RuntimeLogic,
    AuditLogging,
    IntegrationGlue,
    ReportFields,
}

impl From<SectionArg> for Section {
    fn from(arg: SectionArg) -> Self {
        match arg {
            SectionArg::RuntimeLogic => Section::RuntimeLogic,
            SectionArg::AuditLogging => Section::AuditLogging,
            SectionArg::IntegrationGlue => Section::IntegrationGlue,
            SectionArg::ReportFields => Section::ReportFields,
        }
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_flags_parse() {
        let cli = Cli::try_parse_from([
            "scorecard",
            "generate",
            "inputs",
            "--report-fields",
            "advanced",
            "--missing-method",
            "skip",
            "--section",
            "report-fields",
        ])
        .unwrap();
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        let settings = args.input.flag_settings();
        assert_eq!(settings.report_fields, Some(ReportFieldsLayout::Advanced));
        assert_eq!(settings.missing_method, Some(MissingPolicy::Skip));
        assert_eq!(settings.missing_type, None);
        assert!(matches!(args.section, Some(SectionArg::ReportFields)));
    }

    #[test]
    fn test_lookup_requires_name() {
        assert!(Cli::try_parse_from(["scorecard", "lookup", "inputs"]).is_err());
    }
}
