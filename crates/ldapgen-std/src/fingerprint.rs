//! Input fingerprints for generated files.
//!
//! The fingerprint is a SHA-256 digest over the generator version, the
//! emit options that shape the output, each schema file (path and content,
//! in input order) and the descriptor list.
//! It is recorded in the generated file's header so a later run can tell
//! whether the output is stale without regenerating it.

use ldapgen_core::EmitOptions;
use sha2::{Digest, Sha256};

/// Prefix of the header line carrying the fingerprint.
pub const HEADER_PREFIX: &str = "ldapgen-fingerprint: ";

/// Generator version mixed into every fingerprint.
const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// A SHA-256 input fingerprint.
pub type Fingerprint = [u8; 32];

/// Compute the fingerprint of a generation run.
///
/// Schema order is significant: it is the order the files are joined in.
///
/// The options' header lines are not hashed; they carry the fingerprint.
#[must_use]
pub fn compute_fingerprint<S: AsRef<str>>(
    options: &EmitOptions,
    schemas: &[(S, &[u8])],
    descriptors: &[u8],
) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(GENERATOR_VERSION.as_bytes());
    hasher.update((options.runtime_path.len() as u64).to_le_bytes());
    hasher.update(options.runtime_path.as_bytes());
    hasher.update([u8::from(options.derive_serde)]);
    for (name, content) in schemas {
        let name = name.as_ref().as_bytes();
        hasher.update((name.len() as u64).to_le_bytes());
        hasher.update(name);
        hasher.update((content.len() as u64).to_le_bytes());
        hasher.update(content);
    }
    hasher.update((descriptors.len() as u64).to_le_bytes());
    hasher.update(descriptors);
    hasher.finalize().into()
}

/// Header line recording a fingerprint, without the comment marker.
#[must_use]
pub fn header_line(fingerprint: &Fingerprint) -> String {
    format!("{HEADER_PREFIX}{}", hex::encode(fingerprint))
}

/// Read the fingerprint from the leading comment lines of a generated file.
#[must_use]
pub fn read_fingerprint(generated: &str) -> Option<Fingerprint> {
    generated
        .lines()
        .take_while(|line| line.starts_with("//"))
        .find_map(|line| {
            let value = line.trim_start_matches('/').trim().strip_prefix(HEADER_PREFIX)?;
            let mut fingerprint = [0u8; 32];
            hex::decode_to_slice(value.trim(), &mut fingerprint).ok()?;
            Some(fingerprint)
        })
}
