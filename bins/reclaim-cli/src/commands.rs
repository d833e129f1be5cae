// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Subcommand implementations.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use reclaim_app_core::config::ConfigService;
use reclaim_app_core::prefs::RunPrefs;
use reclaim_config_fs::FsConfigStore;
use reclaim_core::{rollup, Engine, InvoiceSource, RunReport};
use reclaim_csv::{tables, CsvInvoiceSource, CsvReferenceSource, JsonReportSink};
use tracing::{info, warn};

use crate::cli::{Cli, Command, ConfigCommand, ReportArgs, RunArgs};
use crate::summary_table;

pub fn dispatch(cli: Cli) -> Result<()> {
    let config_dir = cli.config_dir.as_deref();
    match cli.command {
        Command::Report(args) => report(args, &load_prefs(config_dir)),
        Command::Summary(args) => summary(&args, &load_prefs(config_dir)),
        Command::Check { data } => {
            let prefs = load_prefs(config_dir);
            check(data.as_deref().unwrap_or(&prefs.data_dir))
        }
        Command::Config(ConfigCommand::Show) => {
            let prefs = open_config(config_dir)?
                .run_prefs()
                .context("reading saved preferences")?;
            let mut out = io::stdout().lock();
            serde_json::to_writer_pretty(&mut out, &prefs)?;
            writeln!(out)?;
            Ok(())
        }
        Command::Config(ConfigCommand::Save {
            data,
            output,
            stdout,
            parallel,
            strict,
        }) => {
            let svc = open_config(config_dir)?;
            let mut prefs = svc.run_prefs().context("reading saved preferences")?;
            if let Some(data) = data {
                prefs.data_dir = data;
            }
            if stdout {
                prefs.output = None;
            } else if output.is_some() {
                prefs.output = output;
            }
            if let Some(parallel) = parallel {
                prefs.parallel = parallel;
            }
            if let Some(strict) = strict {
                prefs.strict = strict;
            }
            svc.save_run_prefs(&prefs).context("saving preferences")?;
            info!(?prefs, "preferences saved");
            writeln!(io::stdout().lock(), "preferences saved")?;
            Ok(())
        }
    }
}

fn open_config(dir: Option<&Path>) -> Result<ConfigService<FsConfigStore>> {
    let store = match dir {
        Some(dir) => FsConfigStore::at(dir),
        None => FsConfigStore::new(),
    }
    .context("opening preferences store")?;
    Ok(ConfigService::new(store))
}

/// Saved preferences; an unreadable store degrades to the defaults.
fn load_prefs(dir: Option<&Path>) -> RunPrefs {
    let loaded = open_config(dir)
        .and_then(|svc| svc.run_prefs().context("reading saved preferences"));
    match loaded {
        Ok(prefs) => prefs,
        Err(err) => {
            warn!("using default preferences: {err:#}");
            RunPrefs::default()
        }
    }
}

fn allocate(args: &RunArgs, prefs: &RunPrefs) -> Result<(Engine, RunReport)> {
    let data_dir = args.data.as_deref().unwrap_or(&prefs.data_dir);
    let engine = Engine::from_source(&CsvReferenceSource::new(data_dir))
        .with_context(|| format!("loading reference data from {}", data_dir.display()))?;
    let invoices = CsvInvoiceSource::new(&args.invoices)
        .invoices()
        .with_context(|| format!("loading invoices from {}", args.invoices.display()))?;

    let report = if args.parallel || prefs.parallel {
        engine.run_parallel(&invoices)
    } else {
        engine.run(&invoices)
    };
    Ok((engine, report))
}

fn report(args: ReportArgs, prefs: &RunPrefs) -> Result<()> {
    let (_, run) = allocate(&args.run, prefs)?;
    let output: Option<PathBuf> = if args.stdout {
        None
    } else {
        args.output.or_else(|| prefs.output.clone())
    };

    if let Some(path) = &output {
        let mut sink = JsonReportSink::create(path)
            .with_context(|| format!("creating report file {}", path.display()))?;
        run.emit(&mut sink)
            .with_context(|| format!("writing report to {}", path.display()))?;
        let stats = run.stats;
        writeln!(
            io::stdout().lock(),
            "wrote {} rows to {} ({} invoices: {} allocated, {} without rules, {} rejected)",
            stats.rows,
            path.display(),
            stats.invoices,
            stats.processed_invoices,
            stats.skipped_invoices,
            stats.failed_invoices,
        )?;
    } else {
        let mut sink = JsonReportSink::new(io::stdout().lock());
        run.emit(&mut sink).context("writing report to stdout")?;
    }

    if (args.strict || prefs.strict) && !run.is_clean() {
        let first = run.failures.first().map(ToString::to_string).unwrap_or_default();
        bail!(
            "{} of {} invoices rejected; first: {first}",
            run.stats.failed_invoices,
            run.stats.invoices
        );
    }
    Ok(())
}

fn summary(args: &RunArgs, prefs: &RunPrefs) -> Result<()> {
    let (engine, run) = allocate(args, prefs)?;
    let summaries = rollup::summarize(&run.rows, engine.index());
    writeln!(io::stdout().lock(), "{}", summary_table::render(&summaries))?;
    Ok(())
}

fn check(data_dir: &Path) -> Result<()> {
    if !data_dir.is_dir() {
        bail!("reference directory {} does not exist", data_dir.display());
    }
    let source = CsvReferenceSource::new(data_dir);
    let missing = source.missing_tables();
    if missing.len() == tables::ALL.len() {
        bail!("no reference tables found in {}", data_dir.display());
    }
    let engine = Engine::from_source(&source)
        .with_context(|| format!("loading reference data from {}", data_dir.display()))?;
    let diagnostics = engine.index().diagnostics();

    let mut out = io::stdout().lock();
    for name in &missing {
        writeln!(out, "missing table: {name}")?;
    }
    for diagnostic in &diagnostics {
        writeln!(out, "{diagnostic}")?;
    }
    if missing.is_empty() && diagnostics.is_empty() {
        writeln!(
            out,
            "reference data OK: {} tables in {}",
            tables::ALL.len(),
            data_dir.display()
        )?;
    }
    Ok(())
}
