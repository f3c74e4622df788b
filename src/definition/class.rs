/// Class-reference resolution (`Foo`, `self`, `parent`, and `Foo::class`).
///
/// For a bare class reference "definition" and "type definition" are the
/// same target: the class is its own type.  Class declarations are
/// therefore always recorded with `is_type_definition = false`.
use crate::types::{Context, Node};

use super::{DefinitionResolver, Resolution, Target};

impl DefinitionResolver<'_> {
    /// Record every indexed class in the node's inferred union type, in
    /// union order.  Native types and classes missing from the index are
    /// skipped without affecting the rest of the union.
    pub(super) fn resolve_class_name(&self, context: &Context, node: &Node) -> Resolution {
        let union_type = self.types.union_type_of(context, node)?;

        let mut targets = Vec::new();
        for ty in &union_type {
            let Some(fqsen) = ty.class_fqsen() else {
                continue;
            };
            if !self.index.has_class(&fqsen) {
                tracing::trace!(%fqsen, "class is not indexed");
                continue;
            }
            if let Some(class) = self.index.get_class(&fqsen) {
                targets.push(Target::declaration(class, false));
            }
        }
        Ok(targets)
    }
}
