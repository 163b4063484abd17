//! Build script generating object types from the fixture schemas.

use ldapgen_std::{compile, Config};
use std::path::Path;

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap();
    let manifest_dir = Path::new(&manifest_dir);
    let core_fixtures = manifest_dir.join("../ldapgen-core/tests/fixtures");

    let schemas = vec![
        core_fixtures.join("core.schema"),
        core_fixtures.join("nis.schema"),
        manifest_dir.join("schema/mail.schema"),
    ];
    let objects = manifest_dir.join("schema/objects.json");

    for path in schemas.iter().chain([&objects]) {
        println!("cargo:rerun-if-changed={}", path.display());
    }
    println!("cargo:rerun-if-changed=build.rs");

    let mut config = Config::new(schemas, objects);
    config.derive_serde = true;
    let compilation = compile(&config).unwrap_or_else(|err| panic!("{err}"));
    let generated = compilation.generated;
    if !generated.is_complete() {
        let errors: Vec<String> = generated.errors().map(|e| e.to_string()).collect();
        panic!("failed to generate fixtures:\n{}", errors.join("\n"));
    }

    let out_dir = std::env::var("OUT_DIR").unwrap();
    let out_file = Path::new(&out_dir).join("objects.rs");
    std::fs::write(&out_file, generated.source).expect("Failed to write generated objects");
}
