mod commands;
mod logging;
mod progress;

use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context};
use chrono::Local;
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands, InventoryArgs, MirrorArgs};
use dir_mimic_core::{
    executor, inventory, scanner, AppConfig, IdentityLevel, MirrorEngine, MirrorOptions,
};
use dotenv::dotenv;
use progress::CliReporter;
use tracing::{error, info};

fn main() {
    dotenv().ok();

    let _guard = logging::init_logger();

    let config = match dir_mimic_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let args = Cli::parse();

    let result = match args.command {
        Some(Commands::Inventory(cmd)) => run_inventory(&config, cmd),
        Some(Commands::Mirror(cmd)) => run_mirror(&config, cmd),
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", config);
            Ok(())
        }
        None => {
            let _ = Cli::command().print_long_help();
            Ok(())
        }
    };

    if let Err(err) = result {
        error!("Error: {:#}", err);
        process::exit(1);
    }
}

fn run_inventory(config: &AppConfig, args: InventoryArgs) -> anyhow::Result<()> {
    let level = level_flag(args.level.or(config.default_level))?
        .unwrap_or(IdentityLevel::NameSize);

    let output = args.output.unwrap_or_else(default_inventory_filename);

    info!(
        "Creating level {} inventory of '{}'",
        level,
        args.source_dir.display()
    );

    let reporter = CliReporter::new();
    let records = scanner::scan_directory(
        &args.source_dir,
        level,
        &config.ignore_patterns,
        &reporter,
    )
    .context("scanning source directory")?;

    if args.verbose {
        for record in &records {
            info!("Inventoried: {}", record.relative_path());
        }
    }

    inventory::write(&output, &records, level).context("writing inventory")?;

    println!(
        "{} files inventoried to {}",
        format!("{}", records.len()).green(),
        output.display()
    );
    Ok(())
}

fn run_mirror(config: &AppConfig, args: MirrorArgs) -> anyhow::Result<()> {
    let engine = MirrorEngine::new(MirrorOptions {
        inventory_path: args.inventory.clone(),
        target_dir: args.target_dir.clone(),
        level: level_flag(args.level)?,
        delete_extra: args.delete_extra,
        echo_unchanged: args.verbose,
        ignore_patterns: config.ignore_patterns.clone(),
    });

    let reporter = CliReporter::new();
    let outcome = engine.plan(&reporter)?;
    let summary = outcome.summary;

    eprintln!();
    eprintln!("File analysis complete (level {}):", outcome.level);
    eprintln!("  Unchanged:           {}", format!("{}", summary.unchanged).green());
    eprintln!("  To copy:             {}", format!("{}", summary.to_copy).yellow());
    eprintln!("  Missing from target: {}", format!("{}", summary.missing).red());
    eprintln!("  Extra in target:     {}", format!("{}", summary.extra).red());
    info!(
        "Folded into {} moves, {} copies, {} deletes",
        summary.moves, summary.copies, summary.deletes
    );
    info!(
        "Load: {}, Scan: {}, Reconcile: {}",
        format!("{:.2}s", outcome.load_duration.as_secs_f64()).green(),
        format!("{:.2}s", outcome.scan_duration.as_secs_f64()).green(),
        format!("{:.2}s", outcome.reconcile_duration.as_secs_f64()).green(),
    );

    if args.doit {
        let applied = executor::apply(&outcome.plan, &args.target_dir, &reporter);
        if !applied.all_succeeded() {
            bail!(
                "{} of {} operations failed",
                applied.failed,
                applied.failed + applied.succeeded
            );
        }
        println!("Mirror operation completed successfully");
    } else {
        let lines = outcome.plan.render();
        if lines.is_empty() {
            info!("No actions needed.");
        }
        for line in lines {
            println!("{}", line);
        }
    }

    Ok(())
}

fn level_flag(flag: Option<u8>) -> anyhow::Result<Option<IdentityLevel>> {
    match flag {
        Some(n) => Ok(Some(IdentityLevel::from_number(n)?)),
        None => Ok(None),
    }
}

fn default_inventory_filename() -> PathBuf {
    PathBuf::from(format!(
        "inventory-{}.jsonl",
        Local::now().format("%Y%m%d-%H%M%S")
    ))
}
