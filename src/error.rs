/// Failure reasons for a single resolution attempt.
///
/// None of these ever reaches the caller of
/// [`DefinitionResolver::resolve`](crate::definition::DefinitionResolver::resolve):
/// the dispatcher turns every failure into "record nothing".  They exist so
/// that oracles can say *why* a lookup failed, which ends up in the debug log.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The node does not have the shape the attempted resolution needs
    /// (e.g. a property fetch on an expression that is not an object).
    #[error("cannot resolve {0}")]
    UnresolvedNode(String),

    /// The name is known but nothing declares it (e.g. an unknown method).
    #[error("no declaration for `{0}`")]
    UnresolvedSymbol(String),

    /// The type is class-like but the symbol index has no entry for it.
    #[error("`{0}` is not in the symbol index")]
    MissingIndexEntry(String),

    /// The name position is computed at runtime (`$obj->$name()`).
    #[error("{0} name is not a literal")]
    DynamicName(&'static str),
}
