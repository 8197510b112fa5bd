//! CLI argument parsing and validation
//!
//! The command line takes two positionals (input, output) and a handful of options, each
//! accepted as `--opt value` or `--opt=value`. A lone `-` is a positional meaning stdin.
//!
//! # Examples
//!
//! ```
//! use drawmap_core::args::DrawArgs;
//!
//! let args = DrawArgs::from_iter_safe(["drawmap", "scan.xml", "out.drawio", "--no-edges"]).unwrap();
//! assert!(args.validate().is_ok());
//! assert_eq!(args.input(), Some("scan.xml"));
//! assert!(!args.diagram_options().hub);
//! ```

use crate::diagram::DiagramOptions;
use crate::error::{Error, Result};
use crate::ip_utils::SortOrder;
use std::path::{Path, PathBuf};

/// Parsed command-line arguments
#[derive(Debug, Clone, Default)]
pub struct DrawArgs {
    // ===== DIAGRAM =====
    /// Page name (--page-name)
    pub page_name: Option<String>,
    /// Leave out the central Network node and its edges (--no-edges)
    pub no_edges: bool,
    /// Host ordering (--sort)
    pub sort: SortOrder,

    // ===== EXTRA OUTPUT =====
    /// Write the host inventory as JSON (--hosts-json)
    pub hosts_json: Option<PathBuf>,

    // ===== VERBOSITY =====
    /// Debug logging (-v)
    pub verbose: bool,
    /// Warnings and errors only (-q)
    pub quiet: bool,

    // ===== HELP/VERSION =====
    /// Print version number (-V)
    pub version: bool,
    /// Print help summary (-h)
    pub help: bool,

    // ===== POSITIONAL =====
    /// Input path (or `-` for stdin) followed by output path
    pub positional: Vec<String>,
}

impl DrawArgs {
    /// Parse arguments from a command-line iterator; the first item is the program name
    ///
    /// # Examples
    ///
    /// ```
    /// use drawmap_core::args::DrawArgs;
    ///
    /// let args = DrawArgs::from_iter_safe(vec!["drawmap", "--sort", "ip", "-", "out.drawio"]);
    /// assert!(args.is_ok());
    /// ```
    pub fn from_iter_safe<I, S>(iter: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = iter.into_iter().map(|s| s.as_ref().to_string()).collect();
        if args.is_empty() {
            return Ok(Self::default());
        }
        Self::parse_args(&args[1..])
    }

    fn parse_args(tokens: &[String]) -> Result<Self> {
        let mut args = DrawArgs::default();
        let mut i = 0;

        while i < tokens.len() {
            let token = &tokens[i];

            if token.starts_with('-') && token != "-" {
                let cleaned = token.trim_start_matches('-');

                if let Some((key, value)) = cleaned.split_once('=') {
                    if !Self::is_valid_arg(key) || !Self::arg_needs_value(key) {
                        return Err(Error::InvalidInput(format!("Unknown argument: {}", key)));
                    }
                    Self::set_arg_value(&mut args, key, Some(value.to_string()))?;
                    i += 1;
                    continue;
                }

                if !Self::is_valid_arg(cleaned) {
                    return Err(Error::InvalidInput(format!(
                        "Unknown argument: {}",
                        cleaned
                    )));
                }

                Self::parse_single_arg(&mut args, cleaned, tokens, &mut i)?;
            } else {
                // Positional argument, including a standalone "-" for stdin
                args.positional.push(token.clone());
            }

            i += 1;
        }

        Ok(args)
    }

    fn parse_single_arg(
        args: &mut DrawArgs,
        arg: &str,
        tokens: &[String],
        i: &mut usize,
    ) -> Result<()> {
        if !Self::arg_needs_value(arg) {
            return Self::set_arg_value(args, arg, None);
        }

        match tokens.get(*i + 1) {
            Some(next) if !next.starts_with('-') || next == "-" => {
                *i += 1;
                Self::set_arg_value(args, arg, Some(next.clone()))
            }
            _ => Err(Error::InvalidInput(format!(
                "Argument --{} requires a value",
                arg
            ))),
        }
    }

    fn arg_needs_value(arg: &str) -> bool {
        matches!(arg, "page-name" | "sort" | "hosts-json")
    }

    fn is_valid_arg(arg: &str) -> bool {
        matches!(
            arg,
            // Diagram
            "page-name" | "no-edges" | "sort" |
            // Extra output
            "hosts-json" |
            // Verbosity
            "v" | "verbose" | "q" | "quiet" |
            // Help/version
            "V" | "version" | "h" | "help"
        )
    }

    fn set_arg_value(args: &mut DrawArgs, name: &str, value: Option<String>) -> Result<()> {
        match name {
            "page-name" => args.page_name = value,
            "no-edges" => args.no_edges = true,
            "sort" => {
                let raw = value.unwrap_or_default();
                args.sort = raw.parse().map_err(Error::InvalidInput)?;
            }
            "hosts-json" => args.hosts_json = value.map(PathBuf::from),
            "v" | "verbose" => args.verbose = true,
            "q" | "quiet" => args.quiet = true,
            "V" | "version" => args.version = true,
            "h" | "help" => args.help = true,
            _ => {
                return Err(Error::InvalidInput(format!("Unknown argument: {}", name)));
            }
        }
        Ok(())
    }

    /// Validates the parsed arguments
    ///
    /// Input and output are required unless help or version output was requested.
    ///
    /// ```
    /// use drawmap_core::args::DrawArgs;
    ///
    /// let args = DrawArgs::from_iter_safe(["drawmap", "scan.txt"]).unwrap();
    /// assert!(args.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        if self.help || self.version {
            return Ok(());
        }

        match self.positional.len() {
            0 => Err(Error::InvalidInput(
                "Missing input file (use '-' for stdin)".to_string(),
            )),
            1 => Err(Error::InvalidInput("Missing output .drawio path".to_string())),
            2 => {
                if self.page_name.as_deref().is_some_and(str::is_empty) {
                    return Err(Error::InvalidInput("Page name must not be empty".to_string()));
                }
                if self.verbose && self.quiet {
                    return Err(Error::InvalidInput(
                        "-v and -q cannot be used together".to_string(),
                    ));
                }
                Ok(())
            }
            _ => Err(Error::InvalidInput(format!(
                "Unexpected argument: {}",
                self.positional[2]
            ))),
        }
    }

    /// Input path, `-` meaning stdin
    pub fn input(&self) -> Option<&str> {
        self.positional.first().map(String::as_str)
    }

    /// Output `.drawio` path
    pub fn output(&self) -> Option<&Path> {
        self.positional.get(1).map(Path::new)
    }

    /// Returns true when the input should be read from stdin
    pub fn reads_stdin(&self) -> bool {
        self.input() == Some("-")
    }

    /// Host ordering requested with `--sort`
    pub fn sort_order(&self) -> SortOrder {
        self.sort
    }

    /// Diagram settings derived from the arguments; everything else keeps its default
    pub fn diagram_options(&self) -> DiagramOptions {
        let mut options = DiagramOptions {
            hub: !self.no_edges,
            ..DiagramOptions::default()
        };
        if let Some(name) = &self.page_name {
            options.page_name = name.clone();
        }
        options
    }
}
