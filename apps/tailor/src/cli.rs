use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tailor")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Tailor a resume to a job description under hard layout constraints", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where the job description comes from. Neither flag means the saved one.
#[derive(Args, Debug, Clone, Default)]
pub struct JobArgs {
    /// Job description text
    #[arg(long, conflicts_with = "jd_file")]
    pub jd: Option<String>,

    /// File holding the job description
    #[arg(long)]
    pub jd_file: Option<PathBuf>,

    /// Hiring company (detected from the job description when omitted)
    #[arg(long)]
    pub company: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline: generate, validate, render, quality, ATS
    Run {
        #[command(flatten)]
        job: JobArgs,

        /// Start from the saved document instead of generating one
        #[arg(long)]
        use_existing: bool,

        #[arg(long)]
        skip_validation: bool,

        #[arg(long)]
        skip_render: bool,

        #[arg(long)]
        skip_quality: bool,

        #[arg(long)]
        skip_ats: bool,

        /// Revision budget shared by validation and quality
        #[arg(long)]
        max_revisions: Option<u32>,

        #[arg(long)]
        max_quality_attempts: Option<u32>,

        /// Minimum acceptable quality score (out of 10)
        #[arg(long)]
        quality_threshold: Option<f64>,
    },

    /// Generate a document and save it as the current application
    Generate {
        #[command(flatten)]
        job: JobArgs,
    },

    /// Validate a document against the constraint schema
    Validate {
        /// Document to check (default: the current application)
        path: Option<PathBuf>,
    },

    /// Revise the current document with the given feedback
    Revise {
        #[arg(long, conflicts_with = "feedback_file", required_unless_present = "feedback_file")]
        feedback: Option<String>,

        #[arg(long)]
        feedback_file: Option<PathBuf>,
    },

    /// Render the current document to LaTeX (and PDF when an engine is configured)
    Render,

    /// Score the rendered document's content quality
    Quality,

    /// Score the rendered document's ATS compatibility
    Ats,

    /// Summarise past pipeline runs
    History,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_flags_parse() {
        let cli = Cli::parse_from([
            "tailor",
            "--verbose",
            "run",
            "--jd-file",
            "jd.txt",
            "--skip-ats",
            "--max-revisions",
            "2",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Commands::Run {
                job,
                skip_ats,
                skip_render,
                max_revisions,
                ..
            } => {
                assert_eq!(job.jd_file, Some(PathBuf::from("jd.txt")));
                assert!(skip_ats);
                assert!(!skip_render);
                assert_eq!(max_revisions, Some(2));
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_jd_sources_conflict() {
        assert!(Cli::try_parse_from(["tailor", "generate", "--jd", "x", "--jd-file", "y"]).is_err());
    }

    #[test]
    fn test_revise_needs_feedback() {
        assert!(Cli::try_parse_from(["tailor", "revise"]).is_err());
        assert!(Cli::try_parse_from(["tailor", "revise", "--feedback", "shorten summary"]).is_ok());
    }
}
