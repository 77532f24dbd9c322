//! Functional-options builder generator for annotated Go struct types.
//!
//! Struct declarations documented with `+builder` get a constructor and one
//! option function per field, in the style used to assemble Kubernetes API
//! objects in tests:
//!
//! ```text
//! pod := NewPod(
//!     WithName("web"),
//!     WithLabel("app", "web"),
//!     WithServiceAccountName("deployer"),
//! )
//! ```
//!
//! ## Modules
//!
//! - [`scan`] - parses Go source and selects annotated struct types
//! - [`render`] - renders type expressions back to Go
//! - [`codegen`] - generates constructor and option functions
//! - [`output`] - assembles, validates and writes the generated file
//! - [`driver`] - discovers input files and runs the pipeline per file
//! - [`conventions`] - the overridable naming and literal table
//!
//! ## Example Usage
//!
//! ```
//! use gobuilder_lib::{Conventions, scan, synthesize};
//!
//! let source = r#"package v1alpha1
//!
//! // +builder
//! type PodSpec struct {
//!     RestartPolicy RestartPolicy
//! }
//! "#;
//!
//! let unit = scan(source).unwrap();
//! let generated = synthesize(&unit, &Conventions::default()).unwrap();
//! assert!(generated.to_source().contains(
//!     "func WithRestartPolicy(restartpolicy RestartPolicy) func(*PodSpec) {"
//! ));
//! ```

pub mod codegen;
pub mod conventions;
pub mod diagnostics;
pub mod driver;
pub mod error;
pub mod model;
pub mod output;
pub mod render;
pub mod scan;

pub use conventions::Conventions;
pub use diagnostics::Warning;
pub use driver::{FileOutcome, RunOptions, RunReport};
pub use error::BuilderGenError;
pub use model::{AnnotatedType, EmbeddedRelation, Field, ImportSpec, Member, SourceUnit, TypeExpr};
pub use output::{GeneratedUnit, synthesize};
pub use scan::{scan, scan_with};
