//! In-memory code base: a reference implementation of every oracle.
//!
//! A `CodeBase` is built from a [`Snapshot`], a serde description of the
//! classes, functions, and constants of a project, usually loaded from
//! JSON. It answers the three oracle traits the definition resolver
//! consumes:
//!
//!   - [`TypeOracle`](crate::oracle::TypeOracle): see `infer.rs`
//!   - [`SymbolIndex`]: case-insensitive class / function lookup (here)
//!   - [`ContextResolver`](crate::oracle::ContextResolver): see `members.rs`
//!
//! Member lookup walks the class itself, then its traits, then the parent
//! chain (with each parent's traits), then interfaces.  The first
//! declaration found wins, which makes overrides shadow inherited members.
//!
//! # Snapshot format
//!
//! ```json
//! {
//!   "classes": [
//!     { "fqsen": "\\App\\User", "file": "file:///src/User.php", "line": 4,
//!       "parent": "\\App\\Model", "traits": ["\\App\\HasName"],
//!       "properties": [ { "name": "email", "line": 6, "type": "string" } ],
//!       "methods": [ { "name": "posts", "line": 9, "returns": "\\App\\Post" } ],
//!       "constants": [ { "name": "TABLE", "line": 5 } ] }
//!   ],
//!   "functions": [ { "fqsen": "\\App\\helper", "file": "file:///src/helpers.php", "line": 3 } ],
//!   "constants": [ { "fqsen": "\\App\\VERSION", "file": "file:///src/consts.php", "line": 2 } ]
//! }
//! ```
mod infer;
mod members;
pub(crate) mod names;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tower_lsp::lsp_types::{Location, Position, Range, Url};
use ustr::Ustr;

use crate::oracle::SymbolIndex;
use crate::types::*;

// ─── Snapshot ───────────────────────────────────────────────────────────────

/// Serialized description of a project's declarations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Snapshot {
    pub classes: Vec<ClassEntry>,
    pub functions: Vec<FunctionEntry>,
    pub constants: Vec<ConstantEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassEntry {
    pub fqsen: ClassFqsen,
    #[serde(default)]
    pub kind: ClassKind,
    pub file: Url,
    pub line: u32,
    #[serde(default)]
    pub parent: Option<ClassFqsen>,
    #[serde(default)]
    pub interfaces: Vec<ClassFqsen>,
    #[serde(default)]
    pub traits: Vec<ClassFqsen>,
    #[serde(default)]
    pub properties: Vec<PropertyEntry>,
    #[serde(default)]
    pub methods: Vec<MethodEntry>,
    #[serde(default)]
    pub constants: Vec<ClassConstEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PropertyEntry {
    /// With or without the `$` prefix.
    pub name: String,
    pub line: u32,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default, rename = "type")]
    pub union_type: UnionType,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MethodEntry {
    pub name: String,
    pub line: u32,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default, rename = "returns")]
    pub return_type: UnionType,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassConstEntry {
    pub name: String,
    pub line: u32,
}

/// A global function or a closure.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FunctionEntry {
    pub fqsen: FunctionFqsen,
    pub file: Url,
    pub line: u32,
    #[serde(default, rename = "returns")]
    pub return_type: UnionType,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstantEntry {
    pub fqsen: ConstFqsen,
    pub file: Url,
    pub line: u32,
}

/// A single resolution query: a node, the context it sits in, and the
/// request mode.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Query {
    #[serde(default)]
    pub context: Context,
    pub node: Node,
    #[serde(default)]
    pub type_definition: bool,
}

impl Query {
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let content = read(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Error loading a snapshot or query from disk.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn read(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// A zero-width location at the start of `line`.
fn line_location(file: &Url, line: u32) -> Location {
    let position = Position { line, character: 0 };
    Location {
        uri: file.clone(),
        range: Range {
            start: position,
            end: position,
        },
    }
}

// ─── CodeBase ───────────────────────────────────────────────────────────────

/// Indexed, immutable view of a [`Snapshot`].
#[derive(Debug, Clone, Default)]
pub struct CodeBase {
    classes: HashMap<ClassFqsen, ClassEntry>,
    functions: HashMap<FunctionFqsen, FunctionDecl>,
    constants: HashMap<ConstFqsen, GlobalConstDecl>,
}

impl CodeBase {
    /// Index a snapshot.  When a name is declared twice the first
    /// declaration wins.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut codebase = Self::default();

        for class in snapshot.classes {
            if codebase.classes.contains_key(&class.fqsen) {
                tracing::debug!(fqsen = %class.fqsen, "ignoring duplicate class declaration");
                continue;
            }
            codebase.classes.insert(class.fqsen, class);
        }

        for function in snapshot.functions {
            codebase
                .functions
                .entry(function.fqsen)
                .or_insert_with(|| FunctionDecl {
                    fqsen: function.fqsen,
                    return_type: function.return_type,
                    location: line_location(&function.file, function.line),
                });
        }

        for constant in snapshot.constants {
            codebase
                .constants
                .entry(constant.fqsen)
                .or_insert_with(|| GlobalConstDecl {
                    fqsen: constant.fqsen,
                    location: line_location(&constant.file, constant.line),
                });
        }

        codebase
    }

    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        Self::from_json(&read(path)?)
    }

    pub fn class(&self, fqsen: &ClassFqsen) -> Option<&ClassEntry> {
        self.classes.get(fqsen)
    }

    pub fn function(&self, fqsen: &FunctionFqsen) -> Option<&FunctionDecl> {
        self.functions.get(fqsen)
    }

    pub fn constant(&self, fqsen: &ConstFqsen) -> Option<&GlobalConstDecl> {
        self.constants.get(fqsen)
    }

    /// Find a property visible on `class`, honouring staticness.
    pub fn property(&self, class: &ClassFqsen, name: &str, is_static: bool) -> Option<PropertyDecl> {
        let name = name.trim_start_matches('$');
        self.find_member(class, false, |entry| {
            let property = entry
                .properties
                .iter()
                .find(|p| p.name.trim_start_matches('$') == name && p.is_static == is_static)?;
            Some(PropertyDecl {
                fqsen: PropertyFqsen {
                    class: entry.fqsen,
                    name: Ustr::from(name),
                },
                is_static: property.is_static,
                union_type: property.union_type.clone(),
                location: line_location(&entry.file, property.line),
            })
        })
    }

    /// Find a method visible on `class`.  Method names are case-insensitive.
    pub fn method(&self, class: &ClassFqsen, name: &str) -> Option<MethodDecl> {
        self.find_member(class, true, |entry| {
            let method = entry
                .methods
                .iter()
                .find(|m| m.name.eq_ignore_ascii_case(name))?;
            Some(MethodDecl {
                fqsen: MethodFqsen {
                    class: entry.fqsen,
                    name: Ustr::from(method.name.as_str()),
                },
                is_static: method.is_static,
                return_type: method.return_type.clone(),
                location: line_location(&entry.file, method.line),
            })
        })
    }

    /// Find a class constant (or enum case) visible on `class`.
    pub fn class_const(&self, class: &ClassFqsen, name: &str) -> Option<ClassConstDecl> {
        self.find_member(class, true, |entry| {
            let constant = entry.constants.iter().find(|c| c.name == name)?;
            Some(ClassConstDecl {
                fqsen: ClassConstFqsen {
                    class: entry.fqsen,
                    name: Ustr::from(name),
                },
                location: line_location(&entry.file, constant.line),
            })
        })
    }

    /// Run `pick` over `class` and its ancestors in lookup order and return
    /// the first hit.
    fn find_member<T>(
        &self,
        class: &ClassFqsen,
        include_interfaces: bool,
        pick: impl FnMut(&ClassEntry) -> Option<T>,
    ) -> Option<T> {
        let mut lineage = Vec::new();
        let mut visited = HashSet::new();
        self.collect_lineage(class, include_interfaces, &mut visited, &mut lineage);
        lineage.into_iter().find_map(pick)
    }

    /// Depth-first: the class, its traits, its parent chain, then (when
    /// asked) its interfaces.  `visited` guards against cyclic hierarchies.
    fn collect_lineage<'a>(
        &'a self,
        class: &ClassFqsen,
        include_interfaces: bool,
        visited: &mut HashSet<ClassFqsen>,
        lineage: &mut Vec<&'a ClassEntry>,
    ) {
        if !visited.insert(*class) {
            return;
        }
        let Some(entry) = self.classes.get(class) else {
            return;
        };
        lineage.push(entry);

        for used in &entry.traits {
            self.collect_lineage(used, include_interfaces, visited, lineage);
        }
        if let Some(parent) = &entry.parent {
            self.collect_lineage(parent, include_interfaces, visited, lineage);
        }
        if include_interfaces {
            for interface in &entry.interfaces {
                self.collect_lineage(interface, include_interfaces, visited, lineage);
            }
        }
    }
}

impl SymbolIndex for CodeBase {
    fn has_class(&self, fqsen: &ClassFqsen) -> bool {
        self.classes.contains_key(fqsen)
    }

    fn get_class(&self, fqsen: &ClassFqsen) -> Option<ClassDecl> {
        self.classes.get(fqsen).map(|entry| ClassDecl {
            fqsen: entry.fqsen,
            kind: entry.kind,
            location: line_location(&entry.file, entry.line),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codebase() -> CodeBase {
        CodeBase::from_json(
            r#"{
                "classes": [
                    { "fqsen": "\\App\\Model", "file": "file:///src/Model.php", "line": 2,
                      "interfaces": ["\\App\\Arrayable"],
                      "methods": [ { "name": "save", "line": 4 }, { "name": "toArray", "line": 6 } ],
                      "properties": [ { "name": "$table", "line": 3, "static": true } ] },
                    { "fqsen": "\\App\\Arrayable", "kind": "interface", "file": "file:///src/Arrayable.php", "line": 2,
                      "methods": [ { "name": "toArray", "line": 3 } ],
                      "constants": [ { "name": "FORMAT", "line": 4 } ] },
                    { "fqsen": "\\App\\HasName", "kind": "trait", "file": "file:///src/HasName.php", "line": 2,
                      "methods": [ { "name": "getName", "line": 5, "returns": "string" } ] },
                    { "fqsen": "\\App\\User", "file": "file:///src/User.php", "line": 7,
                      "parent": "\\App\\Model", "traits": ["\\App\\HasName"],
                      "methods": [ { "name": "save", "line": 12 } ] },
                    { "fqsen": "\\App\\Loop", "file": "file:///src/Loop.php", "line": 1, "parent": "\\App\\Loop" },
                    { "fqsen": "\\app\\user", "file": "file:///src/Duplicate.php", "line": 1 }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn overrides_shadow_inherited_methods() {
        let codebase = codebase();
        let user = ClassFqsen::new("App\\User");
        let save = codebase.method(&user, "SAVE").unwrap();
        assert_eq!(save.fqsen.to_string(), "\\App\\User::save");
        assert_eq!(save.location.range.start.line, 12);
    }

    #[test]
    fn traits_come_before_the_parent_chain() {
        let codebase = codebase();
        let user = ClassFqsen::new("App\\User");
        let method = codebase.method(&user, "getName").unwrap();
        assert_eq!(method.fqsen.class, ClassFqsen::new("App\\HasName"));
    }

    #[test]
    fn concrete_methods_win_over_interface_declarations() {
        let codebase = codebase();
        let user = ClassFqsen::new("App\\User");
        let method = codebase.method(&user, "toArray").unwrap();
        assert_eq!(method.fqsen.class, ClassFqsen::new("App\\Model"));
        let constant = codebase.class_const(&user, "FORMAT").unwrap();
        assert_eq!(constant.fqsen.to_string(), "\\App\\Arrayable::FORMAT");
    }

    #[test]
    fn properties_must_match_staticness() {
        let codebase = codebase();
        let user = ClassFqsen::new("App\\User");
        assert!(codebase.property(&user, "$table", true).is_some());
        assert!(codebase.property(&user, "table", false).is_none());
    }

    #[test]
    fn cyclic_hierarchies_terminate() {
        let codebase = codebase();
        assert!(codebase.method(&ClassFqsen::new("App\\Loop"), "missing").is_none());
    }

    #[test]
    fn first_declaration_wins() {
        let codebase = codebase();
        let class = codebase.get_class(&ClassFqsen::new("APP\\USER")).unwrap();
        assert_eq!(class.location.uri.path(), "/src/User.php");
        assert_eq!(class.fqsen.as_str(), "\\App\\User");
    }
}
