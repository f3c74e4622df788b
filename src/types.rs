//! Data types shared by the definition resolver and its oracles.
//!
//! This module contains the syntax-node model handed to the resolver
//! (`Node`, `NodeKind`, `Name`), the lexical `Context` it runs in, the
//! inferred-type model (`Type`, `UnionType`), canonical symbol names
//! (FQSENs) and the declaration records the symbol index hands back.
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::{Location, Range, Url};
use ustr::Ustr;

// ─── Canonical Names ────────────────────────────────────────────────────────

/// Normalise a (possibly relative) name to its canonical form with exactly
/// one leading `\`.
fn canonicalize(name: &str) -> Ustr {
    let trimmed = name.trim().trim_start_matches('\\');
    Ustr::from(format!("\\{trimmed}").as_str())
}

/// Return the last `\`-separated segment of a name.
pub(crate) fn short_name(name: &str) -> &str {
    name.rsplit('\\').next().unwrap_or(name)
}

/// Return the namespace part of a canonical name, without the leading `\`.
/// `None` for names in the global namespace.
fn namespace_of(name: &str) -> Option<&str> {
    let trimmed = name.trim_start_matches('\\');
    trimmed.rfind('\\').map(|idx| &trimmed[..idx])
}

macro_rules! global_fqsen {
    ($(#[$meta:meta])* $name:ident, case_insensitive = $ci:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub struct $name(Ustr);

        impl $name {
            pub fn new(name: &str) -> Self {
                Self(canonicalize(name))
            }

            /// The canonical name, including the leading `\`.
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }

            /// The unqualified trailing segment (e.g. `Foo` for `\App\Foo`).
            pub fn short_name(&self) -> &str {
                short_name(self.as_str())
            }

            pub fn namespace(&self) -> Option<&str> {
                namespace_of(self.as_str())
            }

            /// Key used for map lookups; honours the name's case rules.
            pub(crate) fn key(&self) -> Cow<'_, str> {
                if $ci {
                    Cow::Owned(self.0.to_ascii_lowercase())
                } else {
                    Cow::Borrowed(self.as_str())
                }
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                if $ci {
                    self.0.as_str().eq_ignore_ascii_case(other.0.as_str())
                } else {
                    self.0 == other.0
                }
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.key().hash(state);
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<&str> for $name {
            fn from(name: &str) -> Self {
                Self::new(name)
            }
        }

        impl From<String> for $name {
            fn from(name: String) -> Self {
                Self::new(&name)
            }
        }

        impl From<$name> for String {
            fn from(fqsen: $name) -> Self {
                fqsen.as_str().to_string()
            }
        }
    };
}

global_fqsen!(
    /// Canonical name of a class, interface, trait or enum (e.g. `\App\User`).
    /// Compared case-insensitively, like PHP class names.
    ClassFqsen,
    case_insensitive = true
);

global_fqsen!(
    /// Canonical name of a function or closure (e.g. `\App\helper`).
    /// Compared case-insensitively, like PHP function names.
    FunctionFqsen,
    case_insensitive = true
);

global_fqsen!(
    /// Canonical name of a global constant (e.g. `\App\VERSION`).
    ConstFqsen,
    case_insensitive = false
);

/// Canonical name of a method: `\App\User::getName`.
#[derive(Debug, Clone, Copy)]
pub struct MethodFqsen {
    pub class: ClassFqsen,
    pub name: Ustr,
}

impl PartialEq for MethodFqsen {
    fn eq(&self, other: &Self) -> bool {
        self.class == other.class && self.name.as_str().eq_ignore_ascii_case(other.name.as_str())
    }
}

impl Eq for MethodFqsen {}

impl fmt::Display for MethodFqsen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.class, self.name)
    }
}

/// Canonical name of a property: `\App\User::$name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyFqsen {
    pub class: ClassFqsen,
    pub name: Ustr,
}

impl fmt::Display for PropertyFqsen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::${}", self.class, self.name)
    }
}

/// Canonical name of a class constant: `\App\User::STATUS_ACTIVE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassConstFqsen {
    pub class: ClassFqsen,
    pub name: Ustr,
}

impl fmt::Display for ClassConstFqsen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.class, self.name)
    }
}

// ─── Types ──────────────────────────────────────────────────────────────────

/// Built-in PHP types.  None of these has a declaration to navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeType {
    Int,
    Float,
    String,
    Bool,
    True,
    False,
    Null,
    Array,
    Iterable,
    Callable,
    Object,
    Mixed,
    Void,
    Never,
}

impl NativeType {
    /// Parse a native type keyword (case-insensitive).  Returns `None` for
    /// anything that should be treated as a class name.
    pub fn from_name(name: &str) -> Option<Self> {
        let native = match name.to_ascii_lowercase().as_str() {
            "int" | "integer" => Self::Int,
            "float" | "double" => Self::Float,
            "string" => Self::String,
            "bool" | "boolean" => Self::Bool,
            "true" => Self::True,
            "false" => Self::False,
            "null" => Self::Null,
            "array" => Self::Array,
            "iterable" => Self::Iterable,
            "callable" => Self::Callable,
            "object" => Self::Object,
            "mixed" => Self::Mixed,
            "void" => Self::Void,
            "never" => Self::Never,
            _ => return None,
        };
        Some(native)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Bool => "bool",
            Self::True => "true",
            Self::False => "false",
            Self::Null => "null",
            Self::Array => "array",
            Self::Iterable => "iterable",
            Self::Callable => "callable",
            Self::Object => "object",
            Self::Mixed => "mixed",
            Self::Void => "void",
            Self::Never => "never",
        }
    }
}

/// A single entry of a union type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// A built-in scalar / array-like type.
    Native(NativeType),
    /// An instance of a declared class-like.
    Class(ClassFqsen),
    /// A closure bound to a known function-like declaration.  Class-like:
    /// its class is `\Closure`.
    Closure(FunctionFqsen),
}

impl Type {
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native(_))
    }

    /// The class this type is an instance of, or `None` for native types.
    pub fn class_fqsen(&self) -> Option<ClassFqsen> {
        match self {
            Self::Native(_) => None,
            Self::Class(fqsen) => Some(*fqsen),
            Self::Closure(_) => Some(ClassFqsen::new("Closure")),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native(native) => f.write_str(native.as_str()),
            Self::Class(fqsen) => write!(f, "{fqsen}"),
            Self::Closure(fqsen) => write!(f, "\\Closure({fqsen})"),
        }
    }
}

/// Error returned when a type expression in a snapshot cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid type expression `{0}`")]
pub struct ParseTypeError(pub String);

impl FromStr for Type {
    type Err = ParseTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseTypeError(s.to_string()));
        }

        const CLOSURE_PREFIX: &str = "Closure(";
        let unrooted = s.trim_start_matches('\\');
        if unrooted
            .get(..CLOSURE_PREFIX.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(CLOSURE_PREFIX))
        {
            let inner = unrooted[CLOSURE_PREFIX.len()..]
                .strip_suffix(')')
                .filter(|inner| !inner.trim().is_empty())
                .ok_or_else(|| ParseTypeError(s.to_string()))?;
            return Ok(Self::Closure(FunctionFqsen::new(inner)));
        }

        if !s.contains('\\')
            && let Some(native) = NativeType::from_name(s)
        {
            return Ok(Self::Native(native));
        }

        Ok(Self::Class(ClassFqsen::new(s)))
    }
}

/// The set of possible types of an expression.
///
/// Duplicate-free and iteration-stable: types come back in the order they
/// were first added.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UnionType {
    types: Vec<Type>,
}

impl UnionType {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn of(types: impl IntoIterator<Item = Type>) -> Self {
        let mut union = Self::empty();
        for ty in types {
            union.add(ty);
        }
        union
    }

    /// Add a type unless an equal one is already present.
    pub fn add(&mut self, ty: Type) {
        if !self.types.contains(&ty) {
            self.types.push(ty);
        }
    }

    pub fn merge(&mut self, other: &UnionType) {
        for ty in other {
            self.add(*ty);
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Type> {
        self.types.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Class-like members of the union, in order.
    pub fn class_types(&self) -> impl Iterator<Item = ClassFqsen> + '_ {
        self.types.iter().filter_map(Type::class_fqsen)
    }
}

impl<'a> IntoIterator for &'a UnionType {
    type Item = &'a Type;
    type IntoIter = std::slice::Iter<'a, Type>;

    fn into_iter(self) -> Self::IntoIter {
        self.types.iter()
    }
}

impl IntoIterator for UnionType {
    type Item = Type;
    type IntoIter = std::vec::IntoIter<Type>;

    fn into_iter(self) -> Self::IntoIter {
        self.types.into_iter()
    }
}

impl FromStr for UnionType {
    type Err = ParseTypeError;

    /// Parse `int|\App\User|?\App\Post`.  A leading `?` adds `null`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut union = Self::empty();
        if s.trim().is_empty() {
            return Ok(union);
        }
        for part in s.split('|') {
            let part = part.trim();
            if let Some(nullable) = part.strip_prefix('?') {
                union.add(nullable.parse()?);
                union.add(Type::Native(NativeType::Null));
            } else {
                union.add(part.parse()?);
            }
        }
        Ok(union)
    }
}

impl TryFrom<String> for UnionType {
    type Error = ParseTypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<UnionType> for String {
    fn from(union: UnionType) -> Self {
        union.to_string()
    }
}

impl fmt::Display for UnionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, ty) in self.types.iter().enumerate() {
            if idx > 0 {
                f.write_str("|")?;
            }
            write!(f, "{ty}")?;
        }
        Ok(())
    }
}

// ─── Syntax Nodes ───────────────────────────────────────────────────────────

/// A name position that is either written literally or computed at runtime
/// (`$obj->$name()`, `Foo::{$const}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Name {
    Literal(String),
    Dynamic(Box<Node>),
}

impl Name {
    /// The literal name, or `None` when the name is computed.
    pub fn literal(&self) -> Option<&str> {
        match self {
            Self::Literal(name) => Some(name),
            Self::Dynamic(_) => None,
        }
    }
}

impl From<&str> for Name {
    fn from(name: &str) -> Self {
        Self::Literal(name.to_string())
    }
}

/// The syntactic shape of a node, with the children each shape carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeKind {
    /// A bare class reference: `Foo` in `new Foo`, `Foo::bar()`, a type hint.
    NameRef { name: String },
    /// `$obj->prop`
    InstanceProp { object: Box<Node>, property: Name },
    /// `Foo::$prop`
    StaticProp { class: Box<Node>, property: Name },
    /// `$obj->method()`
    InstanceMethodCall { object: Box<Node>, method: Name },
    /// `Foo::method()`
    StaticMethodCall { class: Box<Node>, method: Name },
    /// `callee()`
    Call { callee: Box<Node> },
    /// `Foo::CONST` and `Foo::class`
    ClassConstAccess { class: Box<Node>, constant: Name },
    /// `CONST`
    GlobalConstRef { name: String },
    /// `$var`
    VarRef { name: Name },
    /// Anything the resolver does not navigate from.
    #[serde(other)]
    Other,
}

impl NodeKind {
    /// Short label for log output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NameRef { .. } => "name",
            Self::InstanceProp { .. } => "instance property",
            Self::StaticProp { .. } => "static property",
            Self::InstanceMethodCall { .. } => "instance method call",
            Self::StaticMethodCall { .. } => "static method call",
            Self::Call { .. } => "call",
            Self::ClassConstAccess { .. } => "class constant",
            Self::GlobalConstRef { .. } => "constant",
            Self::VarRef { .. } => "variable",
            Self::Other => "other",
        }
    }
}

/// A syntax-tree element and its source range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(flatten)]
    pub kind: NodeKind,
    #[serde(default)]
    pub range: Range,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            range: Range::default(),
        }
    }

    pub fn at(mut self, range: Range) -> Self {
        self.range = range;
        self
    }

    pub fn name_ref(name: &str) -> Self {
        Self::new(NodeKind::NameRef {
            name: name.to_string(),
        })
    }

    pub fn var(name: &str) -> Self {
        Self::new(NodeKind::VarRef {
            name: Name::Literal(name.trim_start_matches('$').to_string()),
        })
    }

    pub fn constant(name: &str) -> Self {
        Self::new(NodeKind::GlobalConstRef {
            name: name.to_string(),
        })
    }

    pub fn call(callee: Node) -> Self {
        Self::new(NodeKind::Call {
            callee: Box::new(callee),
        })
    }

    pub fn method_call(object: Node, method: impl Into<Name>) -> Self {
        Self::new(NodeKind::InstanceMethodCall {
            object: Box::new(object),
            method: method.into(),
        })
    }

    pub fn static_call(class: Node, method: impl Into<Name>) -> Self {
        Self::new(NodeKind::StaticMethodCall {
            class: Box::new(class),
            method: method.into(),
        })
    }

    pub fn prop(object: Node, property: impl Into<Name>) -> Self {
        Self::new(NodeKind::InstanceProp {
            object: Box::new(object),
            property: property.into(),
        })
    }

    pub fn static_prop(class: Node, property: impl Into<Name>) -> Self {
        Self::new(NodeKind::StaticProp {
            class: Box::new(class),
            property: property.into(),
        })
    }

    pub fn class_const(class: Node, constant: impl Into<Name>) -> Self {
        Self::new(NodeKind::ClassConstAccess {
            class: Box::new(class),
            constant: constant.into(),
        })
    }
}

// ─── Lexical Context ────────────────────────────────────────────────────────

const THIS_VARIABLE: &str = "this";

/// A local variable visible in the current scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// The variable name WITHOUT the `$` prefix.
    pub name: String,
    #[serde(default, rename = "type")]
    pub union_type: UnionType,
}

impl Variable {
    pub fn new(name: &str, union_type: UnionType) -> Self {
        Self {
            name: name.trim_start_matches('$').to_string(),
            union_type,
        }
    }
}

/// The variable table of the innermost function-like (or file) scope.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scope {
    variables: Vec<Variable>,
}

impl Scope {
    pub fn has_variable_with_name(&self, name: &str) -> bool {
        self.variable_by_name(name).is_some()
    }

    pub fn variable_by_name(&self, name: &str) -> Option<&Variable> {
        let name = name.trim_start_matches('$');
        self.variables.iter().find(|v| v.name == name)
    }

    /// Add a variable, replacing any earlier entry with the same name.
    pub fn add_variable(&mut self, variable: Variable) {
        match self.variables.iter_mut().find(|v| v.name == variable.name) {
            Some(existing) => *existing = variable,
            None => self.variables.push(variable),
        }
    }
}

/// The lexical environment a node is resolved in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Context {
    /// The file the node belongs to.
    pub file: Option<Url>,
    /// The current namespace, without leading `\` (e.g. `App\Models`).
    pub namespace: Option<String>,
    /// Import table: alias → fully-qualified name (from `use` statements).
    pub use_map: BTreeMap<String, String>,
    /// The enclosing class-like, if any.
    pub class: Option<ClassFqsen>,
    /// The enclosing function-like, if any (for log output only).
    pub function: Option<String>,
    pub scope: Scope,
}

impl Context {
    pub fn in_namespace(namespace: &str) -> Self {
        Self {
            namespace: Some(namespace.trim_matches('\\').to_string()),
            ..Self::default()
        }
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.class = Some(ClassFqsen::new(class));
        self
    }

    pub fn with_use(mut self, alias: &str, fqn: &str) -> Self {
        self.use_map
            .insert(alias.to_string(), fqn.trim_start_matches('\\').to_string());
        self
    }

    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.scope.add_variable(variable);
        self
    }

    /// Look up a variable visible here.  Inside a class, `$this` is bound
    /// to the enclosing class even when the scope does not list it.
    pub fn variable_by_name(&self, name: &str) -> Option<Cow<'_, Variable>> {
        let name = name.trim_start_matches('$');
        if name == THIS_VARIABLE
            && let Some(class) = self.class
        {
            return Some(Cow::Owned(Variable::new(
                THIS_VARIABLE,
                UnionType::of([Type::Class(class)]),
            )));
        }
        self.scope.variable_by_name(name).map(Cow::Borrowed)
    }
}

// ─── Declarations ───────────────────────────────────────────────────────────

/// The flavour of a class-like declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    Trait,
    Enum,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub fqsen: ClassFqsen,
    pub kind: ClassKind,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    pub fqsen: PropertyFqsen,
    pub is_static: bool,
    /// The declared (or documented) type of the property.
    pub union_type: UnionType,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub fqsen: MethodFqsen,
    pub is_static: bool,
    pub return_type: UnionType,
    pub location: Location,
}

/// A global function or a closure.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub fqsen: FunctionFqsen,
    pub return_type: UnionType,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassConstDecl {
    pub fqsen: ClassConstFqsen,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GlobalConstDecl {
    pub fqsen: ConstFqsen,
    pub location: Location,
}

/// Any declaration the resolver can report.
#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Class(ClassDecl),
    Property(PropertyDecl),
    Method(MethodDecl),
    Function(FunctionDecl),
    ClassConst(ClassConstDecl),
    GlobalConst(GlobalConstDecl),
}

impl Declaration {
    pub fn location(&self) -> &Location {
        match self {
            Self::Class(decl) => &decl.location,
            Self::Property(decl) => &decl.location,
            Self::Method(decl) => &decl.location,
            Self::Function(decl) => &decl.location,
            Self::ClassConst(decl) => &decl.location,
            Self::GlobalConst(decl) => &decl.location,
        }
    }

    /// The canonical name of the declared symbol, as a display string.
    pub fn fqsen(&self) -> String {
        match self {
            Self::Class(decl) => decl.fqsen.to_string(),
            Self::Property(decl) => decl.fqsen.to_string(),
            Self::Method(decl) => decl.fqsen.to_string(),
            Self::Function(decl) => decl.fqsen.to_string(),
            Self::ClassConst(decl) => decl.fqsen.to_string(),
            Self::GlobalConst(decl) => decl.fqsen.to_string(),
        }
    }

    /// The type a "go to type definition" request should follow, when the
    /// declaration has one.
    pub fn declared_type(&self) -> Option<&UnionType> {
        match self {
            Self::Property(decl) => Some(&decl.union_type),
            Self::Method(decl) => Some(&decl.return_type),
            Self::Function(decl) => Some(&decl.return_type),
            Self::Class(_) | Self::ClassConst(_) | Self::GlobalConst(_) => None,
        }
    }
}

impl From<ClassDecl> for Declaration {
    fn from(decl: ClassDecl) -> Self {
        Self::Class(decl)
    }
}

impl From<PropertyDecl> for Declaration {
    fn from(decl: PropertyDecl) -> Self {
        Self::Property(decl)
    }
}

impl From<MethodDecl> for Declaration {
    fn from(decl: MethodDecl) -> Self {
        Self::Method(decl)
    }
}

impl From<FunctionDecl> for Declaration {
    fn from(decl: FunctionDecl) -> Self {
        Self::Function(decl)
    }
}

impl From<ClassConstDecl> for Declaration {
    fn from(decl: ClassConstDecl) -> Self {
        Self::ClassConst(decl)
    }
}

impl From<GlobalConstDecl> for Declaration {
    fn from(decl: GlobalConstDecl) -> Self {
        Self::GlobalConst(decl)
    }
}
