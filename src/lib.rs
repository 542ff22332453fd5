//! Generate C++ data beans from YAML schemas.
//!
//! `microgen` reads a declarative schema describing a bean (named, typed
//! properties with access modes, nested classes and optional JSON bindings),
//! checks it for one generation target, enriches it into an intermediate
//! representation and renders deterministic C++ sources.
//!
//! # Targets
//!
//! - `bean`: plain value classes with getters, setters and equality
//! - `qtbean`: `QObject` wrappers exposing a bean through `Q_PROPERTY`
//! - `factory`: a decoder building a bean from a `QJsonObject`
//!
//! # Pipeline
//!
//! [`schema::load_schema`] → [`validate::validate`] → [`transform::enrich`]
//! → [`codegen::generate`]. Validation stops at the first violation;
//! everything after it is infallible apart from file I/O.
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//!
//! use microgen::target::Target;
//!
//! let document = microgen::schema::load_schema(Path::new("person.yaml"))?;
//! let ir = microgen::transform::transform(&document, Target::Bean)?;
//! let stats = microgen::codegen::generate(&ir, "person", Path::new("output/"))?;
//! eprintln!("Wrote {} files for {} classes", stats.files_written, stats.classes_rendered);
//! # Ok::<(), microgen::error::Error>(())
//! ```

pub mod codegen;
pub mod error;
pub mod ir;
pub mod json_path;
pub mod naming;
pub mod schema;
pub mod target;
pub mod transform;
pub mod validate;
