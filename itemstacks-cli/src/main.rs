use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use itemstacks_core::{run, ItemStacksConfig, RunSettings};

#[derive(Debug, Parser)]
#[command(name = "itemstacks", version, about = "Rescale item stack sizes and weights")]
struct Args {
    /// Item database JSON to read.
    #[arg(long, required_unless_present = "write_default_config")]
    database: Option<PathBuf>,

    /// Where to write the modified database.
    #[arg(long, required_unless_present = "write_default_config")]
    output: Option<PathBuf>,

    /// Config file; defaults to the per-user config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    stack_multiplier: Option<f32>,

    #[arg(long)]
    weight_multiplier: Option<f32>,

    #[arg(long, default_value_t = false)]
    no_stack: bool,

    #[arg(long, default_value_t = false)]
    no_weight: bool,

    /// Comma-separated extra item names, replacing the config file's list.
    #[arg(long)]
    items: Option<String>,

    #[arg(long, default_value_t = false)]
    no_additional_items: bool,

    /// Number of database load events to simulate.
    #[arg(long, default_value_t = 1)]
    passes: usize,

    #[arg(long, default_value_t = false)]
    debug: bool,

    /// Write the default config to the config path and exit.
    #[arg(long, default_value_t = false)]
    write_default_config: bool,
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn apply_overrides(config: &mut ItemStacksConfig, args: &Args) {
    if let Some(m) = args.stack_multiplier {
        debug!(multiplier = m, "overriding stack size multiplier");
        config.item_multipliers.stack_size_multiplier = m;
    }
    if let Some(m) = args.weight_multiplier {
        debug!(multiplier = m, "overriding weight multiplier");
        config.item_multipliers.weight_multiplier = m;
    }
    if args.no_stack {
        debug!("stack size modification disabled");
        config.item_stack_size.enabled = false;
    }
    if args.no_weight {
        debug!("weight modification disabled");
        config.item_weight.enabled = false;
    }
    if let Some(items) = &args.items {
        debug!(items = %items, "overriding additional items");
        config.additional_items.items = items.clone();
    }
    if args.no_additional_items {
        debug!("additional items disabled");
        config.additional_items.enabled = false;
    }
}

fn main() {
    let args = Args::parse();
    init_logging(args.debug);

    let Some(config_path) = args.config.clone().or_else(ItemStacksConfig::default_path) else {
        eprintln!("Error: could not determine a config directory; pass --config");
        std::process::exit(1);
    };

    debug!(path = %config_path.display(), "resolved config path");

    if args.write_default_config {
        if let Err(err) = ItemStacksConfig::default().save(&config_path) {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
        println!("Wrote default config to {}", config_path.display());
        return;
    }

    let mut config = match ItemStacksConfig::load_or_default(&config_path) {
        Ok(cfg) => {
            info!(path = %config_path.display(), "loaded config");
            cfg
        }
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    };
    apply_overrides(&mut config, &args);

    let settings = RunSettings {
        config,
        // clap enforces both paths unless --write-default-config was given,
        // and that case has already returned.
        database_path: args
            .database
            .expect("database is required unless --write-default-config is used"),
        output_path: args
            .output
            .expect("output is required unless --write-default-config is used"),
        passes: args.passes,
    };

    match run(settings) {
        Ok(summary) => {
            println!(
                "scanned: {}, default: {}, additional: {}, skipped: {}, stack updated: {}, weight updated: {}, non-stackable: {}",
                summary.scanned,
                summary.default_items,
                summary.additional_items,
                summary.out_of_scope,
                summary.stack_updated,
                summary.weight_updated,
                summary.non_stackable,
            );
        }
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}
