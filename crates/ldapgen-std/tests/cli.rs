//! Filesystem and command-line tests.

use ldapgen_std::loader::{load_descriptors, LoadError, SchemaSources};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const SCHEMA: &str = "\
# people
attributetype ( 2.5.4.3 NAME ( 'cn' 'commonName' ) )
attributetype ( 0.9.2342.19200300.100.1.1 NAME 'uid' )
attributetype ( 1.3.6.1.1.1.1.0 NAME 'uidNumber' SINGLE-VALUE )
objectclass ( 1.3.6.1.1.1.2.0 NAME 'posixAccount' AUXILIARY
    MUST ( cn $ uid $ uidNumber ) )
";

const OBJECTS: &str = r#"[
    {
        "Name": "Account",
        "Desc": "a simple account",
        "ObjectClasses": ["posixAccount"],
        "FilterObjectClass": "posixAccount",
        "DNFormat": "uid=%v,ou=people,dc=example,dc=com",
        "DNAttributes": ["uid"]
    }
]"#;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn ldapgen() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ldapgen"))
}

#[test]
fn test_read_schema_files_in_order() {
    let dir = TempDir::new().unwrap();
    let a = write(dir.path(), "a.schema", "attributetype ( 1.1 NAME 'a' )");
    let b = write(dir.path(), "b.schema", "attributetype ( 1.2 NAME 'b' )");

    let sources = SchemaSources::read(&[&b, &a]).unwrap();
    assert_eq!(sources.len(), 2);
    assert_eq!(
        sources.source(),
        "attributetype ( 1.2 NAME 'b' )\nattributetype ( 1.1 NAME 'a' )"
    );
    let first = sources.files().next().unwrap();
    assert_eq!(first.0, b.as_path());
}

#[test]
fn test_read_missing_schema() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.schema");
    let err = SchemaSources::read(&[&missing]).unwrap_err();
    assert!(matches!(err, LoadError::Io { ref path, .. } if path == &missing));
    assert!(err.to_string().starts_with(&missing.display().to_string()));
}

#[test]
fn test_load_descriptors() {
    let dir = TempDir::new().unwrap();
    let path = write(dir.path(), "objects.json", OBJECTS);
    let descriptors = load_descriptors(&path).unwrap();
    assert_eq!(descriptors[0].object_classes, ["posixAccount"]);
    assert_eq!(descriptors[0].dn_attributes, ["uid"]);

    let bad = write(dir.path(), "bad.json", "[{\"Name\": 1}]");
    assert!(matches!(load_descriptors(&bad), Err(LoadError::Json { .. })));
}

#[test]
fn test_cli_writes_stdout() {
    let dir = TempDir::new().unwrap();
    let schema = write(dir.path(), "nis.schema", SCHEMA);
    let objects = write(dir.path(), "objects.json", OBJECTS);

    let output = ldapgen().arg("--objects").arg(&objects).arg(&schema).output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("// @generated by ldapgen"));
    assert!(stdout.contains("// ldapgen-fingerprint: "));
    assert!(stdout.contains("pub struct Account {"));
    assert!(stdout.contains("impl ::ldapgen_runtime::Item for Account {"));
}

#[test]
fn test_cli_check() {
    let dir = TempDir::new().unwrap();
    let schema = write(dir.path(), "nis.schema", SCHEMA);
    let objects = write(dir.path(), "objects.json", OBJECTS);
    let out = dir.path().join("objects.rs");

    let check = |out: &Path| {
        ldapgen()
            .args(["--runtime-path", "crate::rt", "--objects"])
            .arg(&objects)
            .arg("--out")
            .arg(out)
            .arg("--check")
            .arg(&schema)
            .status()
            .unwrap()
    };

    assert!(!check(&out).success());

    let status = ldapgen()
        .args(["--runtime-path", "crate::rt", "--objects"])
        .arg(&objects)
        .arg("--out")
        .arg(&out)
        .arg(&schema)
        .status()
        .unwrap();
    assert!(status.success());
    assert!(fs::read_to_string(&out).unwrap().contains("impl crate::rt::Item for Account"));
    assert!(check(&out).success());

    let default_runtime = ldapgen()
        .args(["--check", "--objects"])
        .arg(&objects)
        .arg("--out")
        .arg(&out)
        .arg(&schema)
        .status()
        .unwrap();
    assert!(!default_runtime.success());

    fs::write(&objects, OBJECTS.replace("a simple account", "an account")).unwrap();
    assert!(!check(&out).success());
}

#[test]
fn test_cli_reports_schema_errors() {
    let dir = TempDir::new().unwrap();
    let schema = write(dir.path(), "broken.schema", "attributetype ( 1.1 NAME 'a'\nobjectclass");
    let objects = write(dir.path(), "objects.json", "[]");

    let output = ldapgen().arg("--objects").arg(&objects).arg(&schema).output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("broken.schema:2:"), "{stderr}");
    assert!(output.stdout.is_empty());
}

#[test]
fn test_cli_fails_on_bad_descriptor() {
    let dir = TempDir::new().unwrap();
    let schema = write(dir.path(), "nis.schema", SCHEMA);
    let objects = write(
        dir.path(),
        "objects.json",
        r#"[{"Name": "Person", "ObjectClasses": ["person"]}]"#,
    );

    let output = ldapgen().arg("--objects").arg(&objects).arg(&schema).output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Person: undefined object class person"), "{stderr}");
}

#[test]
fn test_cli_short_options() {
    let dir = TempDir::new().unwrap();
    let schema = write(dir.path(), "nis.schema", SCHEMA);
    let objects = write(dir.path(), "objects.json", OBJECTS);
    let out = dir.path().join("objects.rs");

    let status = ldapgen()
        .arg("-j")
        .arg(&objects)
        .arg("-o")
        .arg(&out)
        .arg("--derive-serde")
        .arg(&schema)
        .status()
        .unwrap();
    assert!(status.success());
    let generated = fs::read_to_string(&out).unwrap();
    assert!(generated.contains("::serde::Deserialize)]\n#[serde(default)]\npub struct Account {"));
}
