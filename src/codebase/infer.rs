/// Type inference for the in-memory code base.
///
/// Deliberately shallow: it answers what the definition resolver needs to
/// navigate (class names, `$this`, scope variables, declared member and
/// return types) and nothing more.  Variables take the type recorded in the
/// scope; there is no flow analysis.
use crate::error::ResolveError;
use crate::oracle::{ContextResolver, TypeOracle};
use crate::types::*;

use super::CodeBase;
use super::names::resolve_class_name;

impl CodeBase {
    /// The type a class name denotes in `context`.
    ///
    /// Handles `self` / `static` / `parent`, native type keywords, and
    /// regular names resolved through the namespace and import table.
    fn class_name_type(&self, context: &Context, name: &str) -> Result<Type, ResolveError> {
        match name.to_ascii_lowercase().as_str() {
            "self" | "static" => context
                .class
                .map(Type::Class)
                .ok_or_else(|| ResolveError::UnresolvedNode(format!("`{name}` outside a class"))),
            "parent" => {
                let class = context.class.ok_or_else(|| {
                    ResolveError::UnresolvedNode("`parent` outside a class".to_string())
                })?;
                let entry = self
                    .class(&class)
                    .ok_or_else(|| ResolveError::MissingIndexEntry(class.to_string()))?;
                entry
                    .parent
                    .map(Type::Class)
                    .ok_or_else(|| ResolveError::UnresolvedSymbol(format!("parent of {class}")))
            }
            _ => {
                if !name.contains('\\')
                    && let Some(native) = NativeType::from_name(name)
                {
                    return Ok(Type::Native(native));
                }
                Ok(Type::Class(resolve_class_name(context, name)))
            }
        }
    }

    fn variable_type(&self, context: &Context, name: &Name) -> Result<UnionType, ResolveError> {
        let name = name.literal().ok_or(ResolveError::DynamicName("variable"))?;
        context
            .variable_by_name(name)
            .map(|variable| variable.union_type.clone())
            .ok_or_else(|| ResolveError::UnresolvedSymbol(format!("${name}")))
    }
}

impl TypeOracle for CodeBase {
    fn union_type_of(&self, context: &Context, node: &Node) -> Result<UnionType, ResolveError> {
        match &node.kind {
            NodeKind::NameRef { name } => {
                Ok(UnionType::of([self.class_name_type(context, name)?]))
            }
            NodeKind::VarRef { name } => self.variable_type(context, name),
            NodeKind::InstanceProp { .. } => {
                Ok(self.get_property(context, node, false)?.union_type)
            }
            NodeKind::StaticProp { .. } => Ok(self.get_property(context, node, true)?.union_type),
            NodeKind::InstanceMethodCall { method, .. } => {
                let name = method.literal().ok_or(ResolveError::DynamicName("method"))?;
                Ok(self.get_method(context, node, name, false)?.return_type)
            }
            NodeKind::StaticMethodCall { method, .. } => {
                let name = method.literal().ok_or(ResolveError::DynamicName("method"))?;
                Ok(self.get_method(context, node, name, true)?.return_type)
            }
            NodeKind::Call { callee } => {
                let mut union = UnionType::empty();
                for function in self.functions_from_node(context, callee) {
                    union.merge(&function?.return_type);
                }
                Ok(union)
            }
            NodeKind::ClassConstAccess { constant, .. } => {
                let name = constant.literal().ok_or(ResolveError::DynamicName("constant"))?;
                if name.eq_ignore_ascii_case("class") {
                    return Ok(UnionType::of([Type::Native(NativeType::String)]));
                }
                // Constant values are not tracked; only check it exists.
                self.get_class_const(context, node)?;
                Ok(UnionType::empty())
            }
            NodeKind::GlobalConstRef { name } => {
                if let Some(native @ (NativeType::True | NativeType::False | NativeType::Null)) =
                    NativeType::from_name(name)
                {
                    return Ok(UnionType::of([Type::Native(native)]));
                }
                self.get_const(context, node)?;
                Ok(UnionType::empty())
            }
            NodeKind::Other => Ok(UnionType::empty()),
        }
    }
}
