//! Definition resolution for PHP.
//!
//! Given a syntax node, the lexical context it sits in, and a request,
//! [`DefinitionResolver`] works out which declarations the node refers to
//! ("go to definition") or which classes its type refers to ("go to type
//! definition") and records them on the request.
//!
//! ```no_run
//! use phpantom_definition::{CodeBase, Context, DefinitionRequest, DefinitionResolver, Node};
//!
//! let codebase = CodeBase::from_json(r#"{ "classes": [] }"#).unwrap();
//! let resolver = DefinitionResolver::for_codebase(&codebase);
//! let mut request = DefinitionRequest::definition();
//! resolver.resolve(&Context::default(), &Node::name_ref("Foo"), &mut request);
//! let response = request.to_response(&codebase);
//! ```
//!
//! The parser, type inference, and symbol index are collaborators behind
//! the traits in [`oracle`]; [`CodeBase`] is an in-memory implementation
//! of all three.
pub mod codebase;
pub mod config;
pub mod definition;
pub mod error;
pub mod logging;
pub mod oracle;
pub mod request;
pub mod types;

pub use codebase::{CodeBase, Query, Snapshot};
pub use config::{Config, DefinitionConfig};
pub use definition::DefinitionResolver;
pub use error::ResolveError;
pub use oracle::{ContextResolver, SymbolIndex, TypeOracle};
pub use request::{DefinitionRequest, Record, ResultAccumulator};
pub use types::{Context, Declaration, Name, Node, NodeKind, UnionType, Variable};
