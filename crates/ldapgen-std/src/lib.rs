//! ldapgen-std: Filesystem loader and CLI utilities
//!
//! Reads schema files and descriptor lists from disk, runs the
//! [`ldapgen_core`] compiler over them and stamps the output with an input
//! fingerprint.

pub mod fingerprint;
pub mod loader;

pub use ldapgen_core;

use fingerprint::{compute_fingerprint, header_line, read_fingerprint, Fingerprint};
use ldapgen_core::{generate_with_schema, EmitOptions, Generated};
use loader::{parse_descriptors, LoadError, SchemaSources};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error from a file-based generation run.
#[derive(Debug, Error)]
pub enum CompileError {
    /// An input file could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The schema has errors; each entry is a rendered diagnostic.
    #[error("invalid schema:\n{}", .0.join("\n"))]
    Schema(Vec<String>),

    /// Any other compiler error.
    #[error(transparent)]
    Core(ldapgen_core::Error),
}

/// Inputs of a file-based generation run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Schema files, joined in this order.
    pub schemas: Vec<PathBuf>,
    /// JSON descriptor list.
    pub objects: PathBuf,
    /// Runtime crate path used by generated code.
    pub runtime_path: String,
    /// Derive serde traits on generated types.
    pub derive_serde: bool,
}

impl Config {
    /// Create a configuration using the default runtime path.
    pub fn new(schemas: Vec<PathBuf>, objects: impl Into<PathBuf>) -> Self {
        Self {
            schemas,
            objects: objects.into(),
            runtime_path: EmitOptions::default().runtime_path,
            derive_serde: false,
        }
    }

    /// Emit options for this configuration, without a header.
    #[must_use]
    pub fn emit_options(&self) -> EmitOptions {
        EmitOptions {
            runtime_path: self.runtime_path.clone(),
            derive_serde: self.derive_serde,
            ..EmitOptions::default()
        }
    }
}

/// Result of a file-based generation run.
#[derive(Debug, Clone)]
pub struct Compilation {
    /// Generated module and per-descriptor failures.
    pub generated: Generated,
    /// Fingerprint of the inputs, also recorded in the module header.
    pub fingerprint: Fingerprint,
}

/// Fingerprint the inputs named by a configuration.
///
/// # Errors
///
/// Returns [`LoadError`] if an input cannot be read.
pub fn fingerprint_inputs(config: &Config) -> Result<Fingerprint, LoadError> {
    let read = |path: &Path| {
        fs::read(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })
    };
    let schemas = config
        .schemas
        .iter()
        .map(|p| Ok((p.display().to_string(), read(p)?)))
        .collect::<Result<Vec<_>, LoadError>>()?;
    let borrowed: Vec<(&str, &[u8])> = schemas
        .iter()
        .map(|(name, content)| (name.as_str(), content.as_slice()))
        .collect();
    let descriptors = read(&config.objects)?;
    Ok(compute_fingerprint(
        &config.emit_options(),
        &borrowed,
        &descriptors,
    ))
}

/// Check if an existing generated file was produced from the current inputs.
///
/// # Errors
///
/// Returns [`LoadError`] if an input cannot be read. A missing or unreadable
/// output file counts as stale.
pub fn is_up_to_date(config: &Config, output: &Path) -> Result<bool, LoadError> {
    let Ok(existing) = fs::read_to_string(output) else {
        return Ok(false);
    };
    let expected = fingerprint_inputs(config)?;
    Ok(read_fingerprint(&existing) == Some(expected))
}

/// Load inputs from disk and generate code.
///
/// # Errors
///
/// Returns [`CompileError`] if an input cannot be loaded or the schema has
/// errors. Descriptors that fail on their own are reported in
/// [`Generated::failures`].
pub fn compile(config: &Config) -> Result<Compilation, CompileError> {
    let sources = SchemaSources::read(&config.schemas)?;
    let objects = fs::read_to_string(&config.objects).map_err(|source| LoadError::Io {
        path: config.objects.clone(),
        source,
    })?;
    let descriptors = parse_descriptors(&objects).map_err(|source| LoadError::Json {
        path: config.objects.clone(),
        source,
    })?;

    let names: Vec<String> = sources.files().map(|(p, _)| p.display().to_string()).collect();
    let schemas: Vec<(&str, &[u8])> = names
        .iter()
        .zip(sources.files())
        .map(|(name, (_, text))| (name.as_str(), text.as_bytes()))
        .collect();
    let mut options = config.emit_options();
    let fingerprint = compute_fingerprint(&options, &schemas, objects.as_bytes());

    let (schema, warnings) = match ldapgen_core::build_schema(sources.source()) {
        Ok(built) => built,
        Err(ldapgen_core::Error::Schema(diagnostics)) => {
            return Err(CompileError::Schema(
                diagnostics.iter().map(|d| sources.render(d)).collect(),
            ));
        }
        Err(err) => return Err(CompileError::Core(err)),
    };
    for warning in &warnings {
        log::warn!("{}", sources.render(warning));
    }

    options.header = vec![header_line(&fingerprint)];
    let generated = generate_with_schema(&schema, &descriptors, &options);

    Ok(Compilation {
        generated,
        fingerprint,
    })
}
