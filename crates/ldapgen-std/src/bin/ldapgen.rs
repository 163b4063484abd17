//! Generate Rust types from LDAP schema files and a descriptor list.
//!
//! Usage: ldapgen -j objects.json [-o objects.rs] core.schema nis.schema

use anyhow::{bail, Context, Result};
use clap::Parser;
use ldapgen_std::{compile, is_up_to_date, CompileError, Config};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "ldapgen")]
#[command(about = "Generate Rust types from LDAP schema definitions", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON list of object descriptors
    #[arg(long, short = 'j')]
    objects: PathBuf,

    /// Output file (stdout when absent)
    #[arg(long, short)]
    out: Option<PathBuf>,

    /// Path of the runtime crate in generated code
    #[arg(long, default_value = ldapgen_std::ldapgen_core::codegen::DEFAULT_RUNTIME_PATH)]
    runtime_path: String,

    /// Derive serde traits on generated types
    #[arg(long)]
    derive_serde: bool,

    /// Exit with an error if the output file is stale instead of writing it
    #[arg(long, requires = "out")]
    check: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Schema files, joined in the order given
    #[arg(required = true)]
    schemas: Vec<PathBuf>,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let config = Config {
        schemas: cli.schemas,
        objects: cli.objects,
        runtime_path: cli.runtime_path,
        derive_serde: cli.derive_serde,
    };

    if cli.check {
        let Some(out) = cli.out.as_deref() else {
            bail!("--check needs --out");
        };
        if is_up_to_date(&config, out)? {
            log::info!("{} is up to date", out.display());
            return Ok(ExitCode::SUCCESS);
        }
        eprintln!("{} is stale; rerun ldapgen", out.display());
        return Ok(ExitCode::FAILURE);
    }

    let compilation = match compile(&config) {
        Ok(compilation) => compilation,
        Err(CompileError::Schema(messages)) => {
            for message in &messages {
                eprintln!("{message}");
            }
            bail!("{} schema diagnostic(s); nothing generated", messages.len());
        }
        Err(err) => return Err(err.into()),
    };

    let generated = &compilation.generated;
    for error in generated.errors() {
        eprintln!("error: {error}");
    }

    match cli.out {
        Some(path) => {
            fs::write(&path, &generated.source)
                .with_context(|| format!("writing {}", path.display()))?;
            log::info!(
                "wrote {} object(s) to {}",
                generated.objects.len(),
                path.display()
            );
        }
        None => print!("{}", generated.source),
    }

    Ok(if generated.is_complete() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_short_options() {
        let cli = Cli::try_parse_from(["ldapgen", "-j", "objects.json", "-o", "out.rs", "a.schema"])
            .unwrap();
        assert_eq!(cli.objects, PathBuf::from("objects.json"));
        assert_eq!(cli.out, Some(PathBuf::from("out.rs")));
        assert_eq!(cli.schemas, [PathBuf::from("a.schema")]);
        assert!(!cli.derive_serde);
    }
}
