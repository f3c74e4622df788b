#![allow(dead_code)]

use phpantom_definition::types::Variable;
use phpantom_definition::{
    CodeBase, Context, DefinitionRequest, DefinitionResolver, Node, Record,
};

/// A small Laravel-flavoured project:
///
/// ```php
/// namespace App\Models;
/// abstract class Model implements Arrayable { static $connection; save(); newQuery(); toArray(); }
/// interface Arrayable { const FORMAT; toArray(); }
/// trait HasTimestamps { $createdAt; touch(); }
/// class User extends Model { use HasTimestamps; STATUS_ACTIVE; $name; $profile; profile(); save(); static find(); }
/// class Profile { $user; avatar(); }
/// class Post {}
/// class Builder {}
/// ```
pub const SNAPSHOT: &str = r#"{
    "classes": [
        { "fqsen": "\\App\\Models\\Model", "file": "file:///app/Models/Model.php", "line": 5,
          "interfaces": ["\\App\\Models\\Arrayable"],
          "properties": [ { "name": "$connection", "line": 7, "static": true, "type": "string|null" } ],
          "methods": [
            { "name": "save", "line": 10, "returns": "bool" },
            { "name": "newQuery", "line": 14, "returns": "\\App\\Models\\Builder" },
            { "name": "toArray", "line": 18, "returns": "array" }
          ] },
        { "fqsen": "\\App\\Models\\Arrayable", "kind": "interface", "file": "file:///app/Models/Arrayable.php", "line": 3,
          "methods": [ { "name": "toArray", "line": 5, "returns": "array" } ],
          "constants": [ { "name": "FORMAT", "line": 4 } ] },
        { "fqsen": "\\App\\Models\\HasTimestamps", "kind": "trait", "file": "file:///app/Models/HasTimestamps.php", "line": 3,
          "properties": [ { "name": "createdAt", "line": 5, "type": "\\App\\Support\\Carbon|null" } ],
          "methods": [ { "name": "touch", "line": 7, "returns": "bool" } ] },
        { "fqsen": "\\App\\Models\\User", "file": "file:///app/Models/User.php", "line": 8,
          "parent": "\\App\\Models\\Model", "traits": ["\\App\\Models\\HasTimestamps"],
          "constants": [ { "name": "STATUS_ACTIVE", "line": 10 } ],
          "properties": [
            { "name": "name", "line": 12, "type": "string" },
            { "name": "profile", "line": 13, "type": "\\App\\Models\\Profile|null" }
          ],
          "methods": [
            { "name": "profile", "line": 16, "returns": "\\App\\Models\\Profile" },
            { "name": "save", "line": 21, "returns": "bool" },
            { "name": "find", "line": 26, "static": true, "returns": "\\App\\Models\\User|null" }
          ] },
        { "fqsen": "\\App\\Models\\Profile", "file": "file:///app/Models/Profile.php", "line": 4,
          "properties": [ { "name": "user", "line": 6, "type": "\\App\\Models\\User" } ],
          "methods": [ { "name": "avatar", "line": 8, "returns": "string" } ] },
        { "fqsen": "\\App\\Models\\Post", "file": "file:///app/Models/Post.php", "line": 4 },
        { "fqsen": "\\App\\Models\\Builder", "file": "file:///app/Models/Builder.php", "line": 4 },
        { "fqsen": "\\App\\Support\\Carbon", "file": "file:///app/Support/Carbon.php", "line": 3 }
    ],
    "functions": [
        { "fqsen": "\\App\\Http\\current_user", "file": "file:///app/Http/helpers.php", "line": 5, "returns": "\\App\\Models\\User" },
        { "fqsen": "\\strlen", "file": "file:///stubs/standard.php", "line": 10, "returns": "int" },
        { "fqsen": "\\App\\Http\\{closure:12}", "file": "file:///app/Http/Controller.php", "line": 12, "returns": "\\App\\Models\\User" },
        { "fqsen": "\\App\\Http\\{closure:20}", "file": "file:///app/Http/Controller.php", "line": 20, "returns": "\\App\\Models\\Post" },
        { "fqsen": "\\App\\Http\\{closure:28}", "file": "file:///app/Http/Controller.php", "line": 28, "returns": "int" }
    ],
    "constants": [
        { "fqsen": "\\App\\Http\\VERSION", "file": "file:///app/Http/constants.php", "line": 3 },
        { "fqsen": "\\PHP_EOL", "file": "file:///stubs/core.php", "line": 2 }
    ]
}"#;

pub fn codebase() -> CodeBase {
    CodeBase::from_json(SNAPSHOT).expect("fixture snapshot should load")
}

/// `namespace App\Http; use App\Models\User; use App\Models\Profile;`
/// inside `class Controller`, with a handful of typed locals.
pub fn context() -> Context {
    Context::in_namespace("App\\Http")
        .with_class("App\\Http\\Controller")
        .with_use("User", "App\\Models\\User")
        .with_use("Profile", "App\\Models\\Profile")
        .with_use("Models", "App\\Models")
        .with_variable(var("user", "\\App\\Models\\User"))
        .with_variable(var("owner", "\\App\\Models\\User|\\App\\Models\\Profile"))
        .with_variable(var("count", "int"))
}

pub fn var(name: &str, ty: &str) -> Variable {
    Variable::new(name, ty.parse().expect("valid type"))
}

pub fn resolve(codebase: &CodeBase, context: &Context, node: &Node) -> DefinitionRequest {
    let mut request = DefinitionRequest::definition();
    DefinitionResolver::for_codebase(codebase).resolve(context, node, &mut request);
    request
}

pub fn resolve_type(codebase: &CodeBase, context: &Context, node: &Node) -> DefinitionRequest {
    let mut request = DefinitionRequest::type_definition();
    DefinitionResolver::for_codebase(codebase).resolve(context, node, &mut request);
    request
}

/// `(fqsen, is_type_definition)` for every recorded declaration, in order.
pub fn declarations(request: &DefinitionRequest) -> Vec<(String, bool)> {
    request
        .records()
        .iter()
        .filter_map(|record| match record {
            Record::Declaration {
                declaration,
                is_type_definition,
            } => Some((declaration.fqsen(), *is_type_definition)),
            Record::VariableType(_) => None,
        })
        .collect()
}

/// Names of every recorded variable type, in order.
pub fn variables(request: &DefinitionRequest) -> Vec<String> {
    request
        .records()
        .iter()
        .filter_map(|record| match record {
            Record::VariableType(variable) => Some(variable.name.clone()),
            Record::Declaration { .. } => None,
        })
        .collect()
}

/// `(path, line)` for every rendered location.
pub fn locations(codebase: &CodeBase, request: &DefinitionRequest) -> Vec<(String, u32)> {
    request
        .locations(codebase)
        .into_iter()
        .map(|location| (location.uri.path().to_string(), location.range.start.line))
        .collect()
}
