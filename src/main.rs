//! mis-formatter CLI
//!
//! Usage:
//!   mis-formatter [OPTIONS] [DOCUMENT] [VALUES]...
//!
//! Options:
//!   -t, --template <NAME>        Naming template to use
//!   -l, --load-template <FILE>   Merge a template declaration (YAML or TOML)
//!       --list-templates         Show registered templates and their fields
//!   -n, --dry-run                Print the generated name without writing
//!   -i, --interactive            Prompt for document, template and values
//!       --indent <N>             Indentation width of the written document
//!   -h, --help                   Print help

use std::path::PathBuf;

use clap::Parser;
use log::debug;

use mis_formatter::{ConsoleFrontend, Error, RelabelConfig, Session, TemplateRegistry};

#[derive(Parser)]
#[command(name = "mis-formatter")]
#[command(about = "Name flexImaging .mis sequences and their regions from a template")]
struct Cli {
    /// Acquisition sequence (.mis) to relabel
    document: Option<PathBuf>,

    /// Field values, in template order
    values: Vec<String>,

    /// Naming template to use (defaults to the first built-in)
    #[arg(short, long)]
    template: Option<String>,

    /// Template declaration file to merge (repeatable)
    #[arg(short = 'l', long = "load-template")]
    load_template: Vec<PathBuf>,

    /// Show registered templates and their fields
    #[arg(long)]
    list_templates: bool,

    /// Print the generated name without relabeling anything
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Prompt for document, template and values on the terminal
    #[arg(short, long)]
    interactive: bool,

    /// Indentation width of the written document
    #[arg(long, default_value_t = 2)]
    indent: usize,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e.describe());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Error> {
    let mut session = Session::with_config(RelabelConfig::new().with_indent_size(cli.indent));

    for path in &cli.load_template {
        let name = session.load_template(path)?;
        debug!("loaded template '{}' from {}", name, path.display());
    }

    if let Some(name) = &cli.template {
        session.select_template(name)?;
    }

    if cli.list_templates {
        print_templates(session.registry());
        return Ok(());
    }

    if let Some(document) = &cli.document {
        session.select_document(document);
    }

    if cli.interactive {
        let mut frontend = ConsoleFrontend::stdio();
        session.interact(&mut frontend);
        return Ok(());
    }

    if cli.dry_run {
        println!("{}", session.preview(&cli.values)?);
        return Ok(());
    }

    let outcome = session.run(&cli.values)?;
    println!("{}", outcome.output_path.display());
    Ok(())
}

fn print_templates(registry: &TemplateRegistry) {
    for def in registry.iter() {
        println!("{}", def.name);
        let last = def.fields.len().saturating_sub(1);
        for (idx, field) in def.fields.iter().enumerate() {
            let separator = if idx < last { field.separator.as_str() } else { "" };
            println!(
                "  {:<32} {:<8} {:?}",
                field.label,
                field.kind.to_string(),
                separator
            );
        }
    }
}
