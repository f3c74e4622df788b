/// Function-call and global-constant resolution.
use crate::types::{Context, Node};

use super::{DefinitionResolver, Resolution, Target};

impl DefinitionResolver<'_> {
    /// Record every function-like the callee may refer to, in the order
    /// the oracle yields them.
    ///
    /// The enumeration is all-or-nothing: if any candidate fails, the
    /// candidates already seen are discarded too.
    pub(super) fn resolve_function_call(&self, context: &Context, callee: &Node) -> Resolution {
        self.members
            .functions_from_node(context, callee)
            .map(|function| function.map(|function| Target::declaration(function, true)))
            .collect()
    }

    pub(super) fn resolve_global_const(&self, context: &Context, node: &Node) -> Resolution {
        let constant = self.members.get_const(context, node)?;
        Ok(vec![Target::declaration(constant, false)])
    }
}
