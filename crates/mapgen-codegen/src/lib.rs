//! Code generation for mapping projects.
//!
//! - [`generate_java`]: one Java compilation unit implementing the mapping
//!   framework's provider interface for a [`Project`](mapgen_model::Project).
//! - [`registration_statements`]: boilerplate table registration lines for a
//!   newline-delimited list of table names.

mod error;
mod java;
mod naming;
mod registration;

pub use error::{CodegenError, Result};
pub use java::{GeneratorOptions, generate_java, write_java};
pub use naming::{java_identifier, java_string_literal};
pub use registration::{read_table_names, registration_statements};
