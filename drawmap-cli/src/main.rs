//! Drawmap - Nmap to draw.io CLI
//!
//! Reads an Nmap report (XML, grepable or normal output) from a file or stdin and writes
//! a `.drawio` network diagram that diagrams.net opens directly.

mod logging;

use anyhow::Context;
use chrono::Utc;
use drawmap_core::{
    args::DrawArgs,
    diagram::build_diagram,
    output::{hosts_to_json, to_xml},
    Error,
};
use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, error, info};

/// Exit status when the input contained no hosts
const EXIT_NO_HOSTS: i32 = 2;

/// What a successful run produced
#[derive(Debug)]
struct Summary {
    output: PathBuf,
    hosts: usize,
}

fn main() {
    let args = match DrawArgs::from_iter_safe(env::args()) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    if args.help {
        print_help();
        return;
    }

    if args.version {
        println!("drawmap {}", env!("CARGO_PKG_VERSION"));
        return;
    }

    if let Err(e) = args.validate() {
        eprintln!("{}", e);
        eprintln!("Run 'drawmap --help' for usage.");
        process::exit(1);
    }

    logging::init_logging(args.verbose, args.quiet);

    match run(&args) {
        Ok(summary) => {
            println!(
                "Wrote {} ({} host(s)).",
                summary.output.display(),
                summary.hosts
            );
        }
        Err(e) => {
            error!("{:#}", e);
            process::exit(exit_code(&e));
        }
    }
}

/// Main application logic
fn run(args: &DrawArgs) -> anyhow::Result<Summary> {
    let (Some(input), Some(output)) = (args.input(), args.output()) else {
        anyhow::bail!("Both an input and an output path are required");
    };

    let text = read_input(input)?;
    debug!(bytes = text.len(), "read scan report");

    let hosts = drawmap_core::load_hosts(&text, args.sort_order())?;
    info!("Parsed {} host(s)", hosts.len());

    let options = args.diagram_options().modified_at(Utc::now());
    let diagram = build_diagram(&hosts, &options);
    write_file(output, &to_xml(&diagram))?;
    debug!(path = %output.display(), "wrote diagram");

    if let Some(path) = &args.hosts_json {
        write_file(path, &hosts_to_json(&hosts)?)?;
        info!("Host inventory written to {}", path.display());
    }

    Ok(Summary {
        output: output.to_path_buf(),
        hosts: hosts.len(),
    })
}

/// Reads the report from a path, or stdin for `-`; invalid UTF-8 is replaced
fn read_input(input: &str) -> anyhow::Result<String> {
    let bytes = if input == "-" {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read scan report from stdin")?;
        buf
    } else {
        fs::read(input).with_context(|| format!("Failed to read input file: {}", input))?
    };

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Writes `contents`, creating missing parent directories first
fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, contents)
        .with_context(|| format!("Failed to write output file: {}", path.display()))
}

fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<Error>() {
        Some(Error::NoHosts) => EXIT_NO_HOSTS,
        _ => 1,
    }
}

/// Print help message
fn print_help() {
    println!(
        r#"Drawmap - Nmap to draw.io v{}

USAGE:
    drawmap [OPTIONS] <input> <output>

ARGUMENTS:
    <input>                 Nmap report (-oX, -oG or -oN), or '-' for stdin
    <output>                Path of the .drawio file to write

DIAGRAM:
    --page-name <name>      Name of the draw.io page (default: Page-1)
    --no-edges              Omit the central Network node and its connectors
    --sort <order>          Host order: none, ip or name (default: none)

OUTPUT:
    --hosts-json <file>     Also write the parsed hosts as JSON

GENERAL:
    -v, --verbose           Debug logging
    -q, --quiet             Only warnings and errors
    -V, --version           Print version
    -h, --help              Print this help

Log filtering can be overridden with RUST_LOG.
"#,
        env!("CARGO_PKG_VERSION")
    );
}
