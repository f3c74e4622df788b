/// Member-access resolution: properties, methods, and class constants.
///
/// Supported patterns:
///   - `$obj->prop`, `Foo::$prop`
///   - `$obj->method()`, `Foo::method()`, `parent::method()`
///   - `Foo::CONST`, `self::CONST`
///   - `Foo::class`: resolved exactly like the bare reference `Foo`
///
/// The member lookup itself (inheritance, traits, interfaces) belongs to the
/// [`ContextResolver`](crate::oracle::ContextResolver).  Properties and
/// methods are recorded with `is_type_definition = true` since their
/// declared type is navigable; constants are not.
use crate::error::ResolveError;
use crate::types::{Context, Name, Node};

use super::{DefinitionResolver, Resolution, Target};

/// The reflection pseudo-constant naming the class itself.
const CLASS_PSEUDO_CONSTANT: &str = "class";

impl DefinitionResolver<'_> {
    pub(super) fn resolve_property(
        &self,
        context: &Context,
        node: &Node,
        is_static: bool,
    ) -> Resolution {
        let property = self.members.get_property(context, node, is_static)?;
        Ok(vec![Target::declaration(property, true)])
    }

    pub(super) fn resolve_method(
        &self,
        context: &Context,
        node: &Node,
        method: &Name,
        is_static: bool,
    ) -> Resolution {
        let name = method
            .literal()
            .ok_or(ResolveError::DynamicName("method"))?;
        let method = self.members.get_method(context, node, name, is_static)?;
        Ok(vec![Target::declaration(method, true)])
    }

    pub(super) fn resolve_class_const(
        &self,
        context: &Context,
        node: &Node,
        class: &Node,
        constant: &Name,
    ) -> Resolution {
        let name = constant
            .literal()
            .ok_or(ResolveError::DynamicName("constant"))?;

        // `Foo::class` navigates to `Foo`.
        if name.eq_ignore_ascii_case(CLASS_PSEUDO_CONSTANT) {
            return self.resolve_class_name(context, class);
        }

        let constant = self.members.get_class_const(context, node)?;
        Ok(vec![Target::declaration(constant, false)])
    }
}
