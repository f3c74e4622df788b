/// PHP name resolution against a file's namespace and import table.
///
/// Class names never fall back to the global namespace; unqualified
/// function and constant names do.  See
/// <https://www.php.net/manual/en/language.namespaces.fallback.php>.
use crate::types::{ClassFqsen, Context};

/// Look up an import alias.  PHP aliases are case-insensitive; an exact
/// match wins, then the first case-insensitive match in key order.
fn lookup_alias<'a>(context: &'a Context, alias: &str) -> Option<&'a str> {
    context
        .use_map
        .get(alias)
        .or_else(|| {
            context
                .use_map
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(alias))
                .map(|(_, fqn)| fqn)
        })
        .map(String::as_str)
}

fn prefix_namespace(context: &Context, name: &str) -> String {
    match context.namespace.as_deref() {
        Some(ns) if !ns.is_empty() => format!("{ns}\\{name}"),
        _ => name.to_string(),
    }
}

/// Expand the first segment of a qualified name through the import table
/// (`OA\Endpoint` with `use Swagger\OpenAPI as OA;` → `Swagger\OpenAPI\Endpoint`),
/// or prefix the current namespace when no alias matches.
fn expand_qualified(context: &Context, name: &str) -> String {
    let first_segment = name.split('\\').next().unwrap_or(name);
    match lookup_alias(context, first_segment) {
        Some(prefix) => format!("{}{}", prefix, &name[first_segment.len()..]),
        None => prefix_namespace(context, name),
    }
}

/// Resolve a class name as written in source to its canonical name.
///
///   - `\Foo\Bar`: already fully qualified
///   - `Bar`: import table first, then the current namespace
///   - `Foo\Bar`: alias-expand the first segment, else namespace-prefix
pub(crate) fn resolve_class_name(context: &Context, name: &str) -> ClassFqsen {
    if let Some(stripped) = name.strip_prefix('\\') {
        return ClassFqsen::new(stripped);
    }

    if !name.contains('\\') {
        if let Some(fqn) = lookup_alias(context, name) {
            return ClassFqsen::new(fqn);
        }
        return ClassFqsen::new(&prefix_namespace(context, name));
    }

    ClassFqsen::new(&expand_qualified(context, name))
}

/// Candidate canonical names for a function or constant, in lookup order.
///
/// An unqualified name is tried in the current namespace first and then in
/// the global namespace.
pub(crate) fn global_candidates(context: &Context, name: &str) -> Vec<String> {
    if let Some(stripped) = name.strip_prefix('\\') {
        return vec![stripped.to_string()];
    }

    if name.contains('\\') {
        return vec![expand_qualified(context, name)];
    }

    let mut candidates = vec![prefix_namespace(context, name)];
    if !candidates.iter().any(|c| c == name) {
        candidates.push(name.to_string());
    }
    candidates
}
