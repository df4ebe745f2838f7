use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sideloadguard::config::Config;
use sideloadguard::error::GuardError;
use sideloadguard::heuristic::AccessibilityMatch;
use sideloadguard::output::OutputFormat;
use sideloadguard::{ScanMode, ScanOptions};

#[derive(Parser)]
#[command(
    name = "sideloadguard",
    about = "Detect sideloaded apps and third-party accessibility services",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a captured device snapshot
    Scan {
        /// Path to the device snapshot (JSON)
        path: PathBuf,

        /// Config file path
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Output format (console, json)
        #[arg(long, short = 'f', default_value = "console")]
        format: String,

        /// Evaluators to run (subject, fleet, all)
        #[arg(long, short = 'm', default_value = "all")]
        mode: String,

        /// Fleet accessibility attribution (prefix, package)
        #[arg(long)]
        accessibility_match: Option<String>,

        /// Write output to file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Print the effective installer allowlist
    Allowlist {
        /// Config file path
        #[arg(long, short = 'c', default_value = ".sideloadguard.toml")]
        config: PathBuf,

        /// Output format (table, json)
        #[arg(long, short = 'f', default_value = "table")]
        format: String,
    },

    /// Generate a starter .sideloadguard.toml config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Scan {
            path,
            config,
            format,
            mode,
            accessibility_match,
            output,
        } => cmd_scan(path, config, format, mode, accessibility_match, output),
        Commands::Allowlist { config, format } => cmd_allowlist(config, format),
        Commands::Init { force } => cmd_init(force),
    };

    match result {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(e.exit_code());
        }
    }
}

fn cmd_scan(
    path: PathBuf,
    config: Option<PathBuf>,
    format_str: String,
    mode_str: String,
    match_str: Option<String>,
    output_path: Option<PathBuf>,
) -> Result<i32, GuardError> {
    let format = OutputFormat::from_str_lenient(&format_str).unwrap_or_else(|| {
        eprintln!("Warning: unknown format '{}', using console", format_str);
        OutputFormat::Console
    });

    let mode = ScanMode::from_str_lenient(&mode_str).unwrap_or_else(|| {
        eprintln!("Warning: unknown mode '{}', using all", mode_str);
        ScanMode::All
    });

    let accessibility_match = match_str.and_then(|s| {
        let m = AccessibilityMatch::from_str_lenient(&s);
        if m.is_none() {
            eprintln!("Warning: unknown accessibility match '{}', using config default", s);
        }
        m
    });

    let options = ScanOptions {
        config_path: config,
        mode,
        accessibility_match_override: accessibility_match,
    };

    let report = sideloadguard::scan(&path, &options)?;
    let rendered = sideloadguard::render_report(&report, format)?;

    match output_path {
        Some(out) => std::fs::write(&out, &rendered)?,
        None => print!("{}", rendered),
    }

    // Exit code: 0 = pass, 1 = risk detected
    Ok(if report.pass { 0 } else { 1 })
}

fn cmd_allowlist(config_path: PathBuf, format_str: String) -> Result<i32, GuardError> {
    let config = Config::load(&config_path)?;
    let allowlist = config.allowlist();

    match format_str.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&allowlist)?;
            println!("{}", json);
        }
        _ => {
            println!("TRUSTED INSTALLER");
            println!("{}", "-".repeat(40));
            for installer in allowlist.get() {
                println!("{}", installer);
            }
        }
    }

    Ok(0)
}

fn cmd_init(force: bool) -> Result<i32, GuardError> {
    let path = PathBuf::from(".sideloadguard.toml");

    if path.exists() && !force {
        eprintln!(".sideloadguard.toml already exists. Use --force to overwrite.");
        return Ok(1);
    }

    std::fs::write(&path, Config::starter_toml())?;
    println!("Created .sideloadguard.toml");

    Ok(0)
}
