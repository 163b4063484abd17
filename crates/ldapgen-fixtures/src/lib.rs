//! ldapgen-fixtures: Object types generated from the fixture schemas
//!
//! `build.rs` runs the generator over `schema/objects.json` with serde
//! derives enabled; the tests in this crate exercise the generated code.

include!(concat!(env!("OUT_DIR"), "/objects.rs"));
