// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "reclaim",
    version,
    about = "Allocate recycling emissions to output materials and destinations"
)]
pub struct Cli {
    /// Directory holding saved preferences (default: platform config dir)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Allocate invoices and write the JSON report
    Report(ReportArgs),
    /// Allocate invoices and print totals per region and category
    Summary(RunArgs),
    /// Check reference tables for missing files and inconsistent groups
    Check {
        /// Reference table directory
        #[arg(long)]
        data: Option<PathBuf>,
    },
    /// Show or save run preferences
    #[command(subcommand)]
    Config(ConfigCommand),
}

// Inputs shared by every allocating command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Reference table directory
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Invoice CSV file
    #[arg(long)]
    pub invoices: PathBuf,

    /// Allocate invoices on all cores
    #[arg(long)]
    pub parallel: bool,
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub run: RunArgs,

    /// Report destination
    #[arg(long, conflicts_with = "stdout")]
    pub output: Option<PathBuf>,

    /// Write the report to stdout
    #[arg(long)]
    pub stdout: bool,

    /// Exit non-zero if any invoice is rejected
    #[arg(long)]
    pub strict: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective preferences as JSON
    Show,
    /// Update and persist preferences
    Save {
        /// Reference table directory
        #[arg(long)]
        data: Option<PathBuf>,
        /// Report destination
        #[arg(long, conflicts_with = "stdout")]
        output: Option<PathBuf>,
        /// Send reports to stdout by default
        #[arg(long)]
        stdout: bool,
        /// Allocate in parallel by default
        #[arg(long)]
        parallel: Option<bool>,
        /// Reject runs with failed invoices by default
        #[arg(long)]
        strict: Option<bool>,
    },
}
