/// Variable resolution.
///
/// Only "go to type definition" is supported for `$variable`: the target
/// is the class of the variable's inferred type, which the accumulator
/// derives from the recorded variable.  Plain "go to definition" on a
/// variable would need the assignment site, which is out of reach without
/// flow analysis, so it records nothing.
use crate::error::ResolveError;
use crate::types::{Context, Name};

use super::{DefinitionResolver, Resolution, Target};

impl DefinitionResolver<'_> {
    pub(super) fn resolve_variable(
        &self,
        context: &Context,
        name: &Name,
        wants_type_definition: bool,
    ) -> Resolution {
        if !wants_type_definition {
            return Ok(Vec::new());
        }

        let name = name
            .literal()
            .ok_or(ResolveError::DynamicName("variable"))?;
        let variable = context
            .variable_by_name(name)
            .ok_or_else(|| ResolveError::UnresolvedSymbol(format!("${name}")))?;

        Ok(vec![Target::VariableType(variable.into_owned())])
    }
}
