//! Command line argument parsing
//!
//! This module handles CLI argument parsing with subcommands:
//! - `plan`: Plan a JSON task document into execution tracks
//! - `show-config`: Show configuration discovery information

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// How the binary should run after argument parsing
#[derive(Debug)]
pub enum ExecutionMode {
    Plan(PlanInvocation),
    ShowConfig,
}

/// Everything the `plan` subcommand needs to run
#[derive(Debug, Clone)]
pub struct PlanInvocation {
    pub input: PathBuf,
    pub capacity: Option<u32>,
    pub team_size: Option<u32>,
    pub reserve: Option<u32>,
    pub time_per_point: Option<f64>,
    pub config_override: Option<PathBuf>,
    pub optimize: bool,
    pub pretty: bool,
    pub dry_run: bool,
    pub verbose: bool,
}

#[derive(Debug, Parser)]
#[command(name = "trackplan")]
#[command(author = "Trackplan Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A dependency-aware parallel work scheduler")]
#[command(long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Plan a task document into parallel execution tracks
    Plan {
        /// Path to the JSON task document
        #[arg(short = 'i', long = "input")]
        input: PathBuf,
        /// Total worker processes in the pool
        #[arg(long = "capacity")]
        capacity: Option<u32>,
        /// Worker processes per team
        #[arg(long = "team-size")]
        team_size: Option<u32>,
        /// Processes held back for coordination overhead
        #[arg(long = "reserve")]
        reserve: Option<u32>,
        /// Seconds of work per effort point for a single team
        #[arg(long = "time-per-point")]
        time_per_point: Option<f64>,
        /// Configuration file path
        #[arg(short = 'c', long = "config")]
        config: Option<PathBuf>,
        /// Split low-parallelism task sets before planning
        #[arg(long = "optimize")]
        optimize: bool,
        /// Pretty-print the plan document
        #[arg(short = 'p', long = "pretty")]
        pretty: bool,
        /// Validate the input without printing a plan
        #[arg(short = 'n', long = "dry-run")]
        dry_run: bool,
        /// Enable verbose output
        #[arg(short = 'v', long = "verbose")]
        verbose: bool,
    },
    /// Show configuration discovery information
    ShowConfig,
}

impl Args {
    pub fn parse() -> Self {
        Parser::parse()
    }

    pub fn mode(&self) -> ExecutionMode {
        match &self.command {
            Some(Commands::Plan {
                input,
                capacity,
                team_size,
                reserve,
                time_per_point,
                config,
                optimize,
                pretty,
                dry_run,
                verbose,
            }) => ExecutionMode::Plan(PlanInvocation {
                input: input.clone(),
                capacity: *capacity,
                team_size: *team_size,
                reserve: *reserve,
                time_per_point: *time_per_point,
                config_override: config.clone(),
                optimize: *optimize,
                pretty: *pretty,
                dry_run: *dry_run,
                verbose: *verbose,
            }),
            Some(Commands::ShowConfig) | None => ExecutionMode::ShowConfig,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_subcommand_parses_flags() {
        let args = <Args as Parser>::try_parse_from([
            "trackplan",
            "plan",
            "--input",
            "tasks.json",
            "--capacity",
            "500",
            "--team-size",
            "8",
            "--pretty",
        ])
        .unwrap();

        match args.mode() {
            ExecutionMode::Plan(invocation) => {
                assert_eq!(invocation.input, PathBuf::from("tasks.json"));
                assert_eq!(invocation.capacity, Some(500));
                assert_eq!(invocation.team_size, Some(8));
                assert_eq!(invocation.reserve, None);
                assert!(invocation.pretty);
                assert!(!invocation.dry_run);
            }
            other => panic!("expected Plan mode, got {:?}", other),
        }
    }

    #[test]
    fn test_show_config_subcommand() {
        let args = <Args as Parser>::try_parse_from(["trackplan", "show-config"]).unwrap();
        assert!(matches!(args.mode(), ExecutionMode::ShowConfig));
    }

    #[test]
    fn test_plan_requires_input() {
        let result = <Args as Parser>::try_parse_from(["trackplan", "plan"]);
        assert!(result.is_err());
    }
}
