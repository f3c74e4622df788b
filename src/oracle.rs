//! Read-only collaborators consulted by the definition resolver.
//!
//! The resolver itself never parses, infers, or indexes anything.  It asks
//! three oracles:
//!
//!   - [`TypeOracle`]: the possible static types of an expression.
//!   - [`SymbolIndex`]: declarations by canonical name.
//!   - [`ContextResolver`]: member / callable / constant lookups that
//!     depend on the lexical context (inheritance, traits, imports, and
//!     namespace fallback all live behind this trait).
//!
//! All three are `Send + Sync` so one set of oracles can serve concurrent
//! requests.  [`CodeBase`](crate::codebase::CodeBase) implements all three.
use crate::error::ResolveError;
use crate::types::*;

/// Infers the set of possible types of an expression.
pub trait TypeOracle: Send + Sync {
    fn union_type_of(&self, context: &Context, node: &Node) -> Result<UnionType, ResolveError>;
}

/// Declarations by canonical name.
pub trait SymbolIndex: Send + Sync {
    fn has_class(&self, fqsen: &ClassFqsen) -> bool;

    fn get_class(&self, fqsen: &ClassFqsen) -> Option<ClassDecl>;
}

/// Lookups that need both the node and its lexical context.
pub trait ContextResolver: Send + Sync {
    /// Resolve the property an `InstanceProp` / `StaticProp` node refers to.
    fn get_property(
        &self,
        context: &Context,
        node: &Node,
        is_static: bool,
    ) -> Result<PropertyDecl, ResolveError>;

    /// Resolve the method called by a method-call node.  `name` is the
    /// literal method name, already validated by the caller.
    fn get_method(
        &self,
        context: &Context,
        node: &Node,
        name: &str,
        is_static: bool,
    ) -> Result<MethodDecl, ResolveError>;

    /// Resolve the constant a `ClassConstAccess` node refers to.
    fn get_class_const(&self, context: &Context, node: &Node)
    -> Result<ClassConstDecl, ResolveError>;

    /// Resolve the constant a `GlobalConstRef` node refers to.
    fn get_const(&self, context: &Context, node: &Node) -> Result<GlobalConstDecl, ResolveError>;

    /// Enumerate the function-likes a call's callee may refer to.
    ///
    /// `node` is the callee expression.  A call through a variable whose
    /// type is a union of closures yields one candidate per closure.  The
    /// sequence may fail part-way; consumers must treat any `Err` item as a
    /// failure of the whole enumeration.
    fn functions_from_node<'a>(
        &'a self,
        context: &'a Context,
        node: &'a Node,
    ) -> Box<dyn Iterator<Item = Result<FunctionDecl, ResolveError>> + 'a>;
}
