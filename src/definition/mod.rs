//! Go-to-definition / go-to-type-definition resolution.
//!
//! Given a syntax node and the lexical context it sits in, this module
//! determines which declaration(s) the node denotes and records them on a
//! [`ResultAccumulator`].  The dispatcher picks exactly one strategy by
//! node kind:
//!
//!   - `Foo` (class reference): `class.rs`
//!   - `$a->prop`, `Foo::$prop`, `$a->m()`, `Foo::m()`, `Foo::CONST`,
//!     `Foo::class`: `member.rs`
//!   - `foo()`, `$closure()`, `CONST`: `function.rs`
//!   - `$var` (type definition only): `variable.rs`
//!
//! Every strategy is a short pipeline: validate the node shape, ask the
//! oracles, collect candidates.  A strategy returns either all of its
//! targets or a [`ResolveError`]; the dispatcher records the former and
//! drops the latter.  Nothing a strategy does can make `resolve` fail.
mod class;
mod function;
mod member;
mod variable;

use crate::config::DefinitionConfig;
use crate::error::ResolveError;
use crate::oracle::{ContextResolver, SymbolIndex, TypeOracle};
use crate::request::ResultAccumulator;
use crate::types::{Context, Declaration, Node, NodeKind, Variable};

/// Something a strategy found.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Target {
    Declaration {
        declaration: Declaration,
        is_type_definition: bool,
    },
    VariableType(Variable),
}

impl Target {
    fn declaration(declaration: impl Into<Declaration>, is_type_definition: bool) -> Self {
        Self::Declaration {
            declaration: declaration.into(),
            is_type_definition,
        }
    }
}

type Resolution = Result<Vec<Target>, ResolveError>;

/// Stateless resolver over borrowed oracles.
///
/// Cheap to copy; one instance can serve any number of requests, from any
/// number of threads, as long as each call gets its own accumulator.
#[derive(Clone, Copy)]
pub struct DefinitionResolver<'a> {
    types: &'a dyn TypeOracle,
    index: &'a dyn SymbolIndex,
    members: &'a dyn ContextResolver,
    config: DefinitionConfig,
}

impl<'a> DefinitionResolver<'a> {
    pub fn new(
        types: &'a dyn TypeOracle,
        index: &'a dyn SymbolIndex,
        members: &'a dyn ContextResolver,
    ) -> Self {
        Self {
            types,
            index,
            members,
            config: DefinitionConfig::default(),
        }
    }

    /// Use one value for all three oracles.
    pub fn for_codebase<C>(codebase: &'a C) -> Self
    where
        C: TypeOracle + SymbolIndex + ContextResolver,
    {
        Self::new(codebase, codebase, codebase)
    }

    pub fn with_config(mut self, config: DefinitionConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolve `node` and record what it refers to on `request`.
    ///
    /// Never fails: any resolution failure leaves `request` untouched.
    pub fn resolve<R>(&self, context: &Context, node: &Node, request: &mut R)
    where
        R: ResultAccumulator + ?Sized,
    {
        let wants_type_definition = request.wants_type_definition();
        if !self.config.enabled || (wants_type_definition && !self.config.type_definition) {
            tracing::debug!(wants_type_definition, "definition requests are disabled");
            return;
        }

        let resolution = match &node.kind {
            NodeKind::NameRef { .. } => self.resolve_class_name(context, node),
            NodeKind::InstanceProp { .. } => self.resolve_property(context, node, false),
            NodeKind::StaticProp { .. } => self.resolve_property(context, node, true),
            NodeKind::InstanceMethodCall { method, .. } => {
                self.resolve_method(context, node, method, false)
            }
            NodeKind::StaticMethodCall { method, .. } => {
                self.resolve_method(context, node, method, true)
            }
            NodeKind::Call { callee } => self.resolve_function_call(context, callee),
            NodeKind::ClassConstAccess { class, constant } => {
                self.resolve_class_const(context, node, class, constant)
            }
            NodeKind::GlobalConstRef { .. } => self.resolve_global_const(context, node),
            NodeKind::VarRef { name } => {
                self.resolve_variable(context, name, wants_type_definition)
            }
            NodeKind::Other => return,
        };

        match resolution {
            Ok(targets) => {
                for target in targets {
                    match target {
                        Target::Declaration {
                            declaration,
                            is_type_definition,
                        } => request.record_declaration(&declaration, is_type_definition),
                        Target::VariableType(variable) => request.record_variable_type(&variable),
                    }
                }
            }
            Err(err) => {
                tracing::debug!(
                    node = node.kind.label(),
                    function = context.function.as_deref().unwrap_or_default(),
                    "no definition: {err}"
                );
            }
        }
    }
}
