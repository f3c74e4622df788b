/// Context-dependent lookups for the in-memory code base.
///
/// Every member lookup starts from the receiver expression (`$obj` in
/// `$obj->foo`, `Foo` in `Foo::bar()`), infers its classes, and asks each
/// class in union order for the member.  The first class that declares it
/// (directly or by inheritance) wins.
use std::iter;

use crate::error::ResolveError;
use crate::oracle::{ContextResolver, SymbolIndex, TypeOracle};
use crate::types::*;

use super::CodeBase;
use super::names::global_candidates;

impl CodeBase {
    /// The class-like types of a receiver expression, in union order.
    fn receiver_classes(
        &self,
        context: &Context,
        receiver: &Node,
    ) -> Result<Vec<ClassFqsen>, ResolveError> {
        let union = self.union_type_of(context, receiver)?;
        let classes: Vec<ClassFqsen> = union.class_types().collect();
        if classes.is_empty() {
            return Err(ResolveError::UnresolvedNode(format!(
                "{} of type `{union}` as an object",
                receiver.kind.label()
            )));
        }
        Ok(classes)
    }

    /// Ask each receiver class for a member; first hit wins.
    ///
    /// Fails with `MissingIndexEntry` when none of the classes is indexed,
    /// and with `UnresolvedSymbol` when they are but none declares it.
    fn first_member<T>(
        &self,
        classes: &[ClassFqsen],
        describe: impl Fn(&ClassFqsen) -> String,
        lookup: impl Fn(&ClassFqsen) -> Option<T>,
    ) -> Result<T, ResolveError> {
        let mut any_indexed = false;
        for class in classes {
            if !self.has_class(class) {
                tracing::trace!(%class, "receiver class is not indexed");
                continue;
            }
            any_indexed = true;
            if let Some(member) = lookup(class) {
                return Ok(member);
            }
        }

        match classes.first() {
            Some(first) if !any_indexed => Err(ResolveError::MissingIndexEntry(first.to_string())),
            Some(first) => Err(ResolveError::UnresolvedSymbol(describe(first))),
            None => Err(ResolveError::UnresolvedNode("member access without a receiver".to_string())),
        }
    }

    fn resolve_function(&self, context: &Context, name: &str) -> Result<FunctionDecl, ResolveError> {
        global_candidates(context, name)
            .iter()
            .find_map(|candidate| self.function(&FunctionFqsen::new(candidate)))
            .cloned()
            .ok_or_else(|| ResolveError::UnresolvedSymbol(format!("{name}()")))
    }
}

impl ContextResolver for CodeBase {
    fn get_property(
        &self,
        context: &Context,
        node: &Node,
        is_static: bool,
    ) -> Result<PropertyDecl, ResolveError> {
        let (receiver, property) = match &node.kind {
            NodeKind::InstanceProp { object, property } if !is_static => (object, property),
            NodeKind::StaticProp { class, property } if is_static => (class, property),
            other => {
                return Err(ResolveError::UnresolvedNode(format!(
                    "{} as a property access",
                    other.label()
                )));
            }
        };
        let name = property
            .literal()
            .ok_or(ResolveError::DynamicName("property"))?;

        let classes = self.receiver_classes(context, receiver)?;
        self.first_member(
            &classes,
            |class| format!("{class}::${name}"),
            |class| self.property(class, name, is_static),
        )
    }

    fn get_method(
        &self,
        context: &Context,
        node: &Node,
        name: &str,
        is_static: bool,
    ) -> Result<MethodDecl, ResolveError> {
        let receiver = match &node.kind {
            NodeKind::InstanceMethodCall { object, .. } if !is_static => object,
            NodeKind::StaticMethodCall { class, .. } if is_static => class,
            other => {
                return Err(ResolveError::UnresolvedNode(format!(
                    "{} as a method call",
                    other.label()
                )));
            }
        };

        let classes = self.receiver_classes(context, receiver)?;
        self.first_member(
            &classes,
            |class| format!("{class}::{name}()"),
            |class| self.method(class, name),
        )
    }

    fn get_class_const(
        &self,
        context: &Context,
        node: &Node,
    ) -> Result<ClassConstDecl, ResolveError> {
        let NodeKind::ClassConstAccess { class, constant } = &node.kind else {
            return Err(ResolveError::UnresolvedNode(format!(
                "{} as a class constant",
                node.kind.label()
            )));
        };
        let name = constant
            .literal()
            .ok_or(ResolveError::DynamicName("constant"))?;

        let classes = self.receiver_classes(context, class)?;
        self.first_member(
            &classes,
            |class| format!("{class}::{name}"),
            |class| self.class_const(class, name),
        )
    }

    fn get_const(&self, context: &Context, node: &Node) -> Result<GlobalConstDecl, ResolveError> {
        let NodeKind::GlobalConstRef { name } = &node.kind else {
            return Err(ResolveError::UnresolvedNode(format!(
                "{} as a constant",
                node.kind.label()
            )));
        };

        global_candidates(context, name)
            .iter()
            .find_map(|candidate| self.constant(&ConstFqsen::new(candidate)))
            .cloned()
            .ok_or_else(|| ResolveError::UnresolvedSymbol(name.clone()))
    }

    fn functions_from_node<'a>(
        &'a self,
        context: &'a Context,
        node: &'a Node,
    ) -> Box<dyn Iterator<Item = Result<FunctionDecl, ResolveError>> + 'a> {
        if let NodeKind::NameRef { name } = &node.kind {
            return Box::new(iter::once(self.resolve_function(context, name)));
        }

        // Anything else is called through its value: every closure in its
        // type is a candidate.
        match self.union_type_of(context, node) {
            Ok(union) => Box::new(union.into_iter().filter_map(move |ty| match ty {
                Type::Closure(fqsen) => Some(
                    self.function(&fqsen)
                        .cloned()
                        .ok_or_else(|| ResolveError::MissingIndexEntry(fqsen.to_string())),
                ),
                Type::Native(_) | Type::Class(_) => None,
            })),
            Err(err) => Box::new(iter::once(Err(err))),
        }
    }
}
