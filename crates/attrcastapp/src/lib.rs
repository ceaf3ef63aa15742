//! # Attrcast Architecture
//!
//! Attrcast is a **declarative attribute-typing library**. A caller declares
//! the attributes a command-style object accepts, each with a filter kind and
//! options, and attrcast turns raw untyped input (parsed JSON, form fields)
//! into typed values, or into a precise per-attribute error.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Schema (schema.rs)                                         │
//! │  - Declarations → filters, once, at definition time         │
//! │  - One validation pass per input map                        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Registry (registry.rs)                                     │
//! │  - Filter kind → constructor                                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Filters (filters/*.rs)                                     │
//! │  - cast / clean / default semantics                         │
//! │  - object filter: lazy type binding, one re-resolution      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Types (types.rs, resolver.rs)                              │
//! │  - Named types and their membership predicates              │
//! │  - Name → type resolution against a namespace               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O in Core
//!
//! Apart from the file helpers in `schema` and `config`, nothing here touches
//! stdout, stderr or the process. Diagnostics go through `tracing`; failures
//! come back as values. The `attrcast` binary is one client of this crate.
//!
//! ## Error Scoping
//!
//! A failing attribute never aborts its siblings. Filters return a
//! [`FilterError`](error::FilterError); the schema records it into the pass's
//! [`AttributeContext`](context::AttributeContext) and moves on. Declaration
//! problems (unknown kinds, malformed nesting, impossible defaults) are
//! [`AttrcastError`](error::AttrcastError)s raised while the schema is built.
//!
//! ## Module Overview
//!
//! - [`value`]: the dynamic value model and JSON interop
//! - [`types`]: object types, namespaces, the global namespace
//! - [`resolver`]: `class` option / attribute name → type
//! - [`options`]: filter options and declarations
//! - [`filters`]: the `Filter` trait and every built-in kind
//! - [`registry`]: kind registration and filter construction
//! - [`context`]: per-pass values and errors
//! - [`schema`]: declared attribute sets and validation passes
//! - [`config`]: `attrcast.toml` / environment settings

pub mod config;
pub mod context;
pub mod error;
pub mod filters;
pub mod options;
pub mod registry;
pub mod resolver;
pub mod schema;
pub mod types;
pub mod value;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use context::{AttributeContext, AttributeError, ValidationErrors};
pub use error::{AttrcastError, FilterError, RegistryError, Result};
pub use filters::Filter;
pub use options::{ClassOption, DefaultValue, FilterOptions, FilterSpec};
pub use registry::Registry;
pub use schema::{Schema, SchemaFile};
pub use types::{global_types, ObjectType, TypeLookup, TypeNamespace};
pub use value::{Instance, Value};
