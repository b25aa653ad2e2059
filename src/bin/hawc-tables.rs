//! hawc-tables CLI - render HAWC report tables to Word documents

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use hawc_tables::{
    diagnostics::{check_table, format_diagnostics},
    RenderOptions, TableDescription, TableKind,
};
#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, Read, Write};
#[cfg(feature = "cli")]
use std::path::Path;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "hawc-tables")]
#[command(author = "HAWC")]
#[command(version)]
#[command(about = "Render HAWC table descriptions to .docx", long_about = None)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Render a table description to a .docx file
    Render {
        /// Input file (reads JSON from stdin if not provided)
        input: Option<String>,

        /// Output file path (writes to stdout if not provided)
        #[arg(short, long)]
        output: Option<String>,

        /// Base URL that relative hyperlinks resolve against
        #[arg(long)]
        base_url: Option<String>,

        /// Header cell fill, e.g. "#EEEEEE"
        #[arg(long)]
        header_shade: Option<String>,

        /// Force landscape pages
        #[arg(long)]
        landscape: bool,

        /// Heading placed above the table
        #[arg(long)]
        title: Option<String>,
    },

    /// Print the resolved cells of a table description as JSON
    Preview {
        /// Input file
        input: Option<String>,
    },

    /// Check a table description for layout and markup issues
    Check {
        /// Input file to check
        input: Option<String>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Print a starter description for a table type
    Default {
        /// Table type, e.g. generic or evidence-profile
        kind: String,
    },

    /// Show version and supported table types
    Info,
}

#[cfg(feature = "cli")]
fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    match cli.command {
        Commands::Render {
            input,
            output,
            base_url,
            header_shade,
            landscape,
            title,
        } => {
            let description = load_description(input.as_deref())?;
            let mut opts = RenderOptions::default().with_landscape(landscape);
            if let Some(base_url) = base_url {
                opts = opts.with_base_url(base_url);
            }
            if header_shade.is_some() {
                opts = opts.with_header_shade(header_shade.as_deref());
            }
            if let Some(title) = title {
                opts = opts.with_title(title);
            }

            let bytes = description.to_docx_bytes(&opts).unwrap_or_else(|e| fail(e));
            match output {
                Some(path) => {
                    fs::write(&path, &bytes)?;
                    log::info!("wrote {} bytes to {}", bytes.len(), path);
                }
                None => io::stdout().write_all(&bytes)?,
            }
        }

        Commands::Preview { input } => {
            let description = load_description(input.as_deref())?;
            let cells = description.to_dict().unwrap_or_else(|e| fail(e));
            let json = serde_json::to_string_pretty(&cells)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            println!("{}", json);
        }

        Commands::Check { input, no_color } => {
            let description = load_description(input.as_deref())?;
            let result = check_table(&description);
            let output = format_diagnostics(&result, !no_color);
            println!("{}", output);

            if result.has_errors() {
                std::process::exit(1);
            }
        }

        Commands::Default { kind } => {
            let kind: TableKind = kind.parse().unwrap_or_else(|e| fail(e));
            let json = TableDescription::build_default(kind)
                .to_json()
                .unwrap_or_else(|e| fail(e));
            println!("{}", json);
        }

        Commands::Info => {
            println!("hawc-tables - HAWC report table renderer");
            println!("Version: {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Table types:");
            for kind in TableKind::ALL {
                println!("  - {}", kind);
            }
            println!();
            println!("Input formats:");
            println!("  ✓ JSON");
            if cfg!(feature = "data-loading") {
                println!("  ✓ YAML, TOML");
            }
            println!();
        }
    }

    Ok(())
}

/// Read a description from a file, or JSON from stdin
#[cfg(feature = "cli")]
fn load_description(input: Option<&str>) -> io::Result<TableDescription> {
    let (content, extension) = match input {
        Some(path) => (
            fs::read_to_string(path)?,
            Path::new(path)
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_string),
        ),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            (buffer, None)
        }
    };
    Ok(TableDescription::from_str_with_extension(&content, extension.as_deref())
        .unwrap_or_else(|e| fail(e)))
}

#[cfg(feature = "cli")]
fn fail(err: impl std::fmt::Display) -> ! {
    eprintln!("error: {}", err);
    std::process::exit(1);
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install hawc-tables --features cli");
    eprintln!("  hawc-tables render [OPTIONS] [INPUT_FILE]");
}
