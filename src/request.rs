//! Result accumulation for definition requests.
//!
//! The resolver reports what it finds through [`ResultAccumulator`].
//! [`DefinitionRequest`] is the stock accumulator: it keeps every record in
//! the order it arrived and renders them to LSP locations on demand.
use tower_lsp::lsp_types::{GotoDefinitionResponse, Location};

use crate::oracle::SymbolIndex;
use crate::types::{Declaration, UnionType, Variable};

/// The sink a resolution writes into.
pub trait ResultAccumulator {
    /// `true` for "go to type definition", `false` for "go to definition".
    fn wants_type_definition(&self) -> bool;

    /// Record a declaration.  `is_type_definition` marks declarations whose
    /// declared type is itself navigable (properties, methods, functions).
    fn record_declaration(&mut self, declaration: &Declaration, is_type_definition: bool);

    /// Record the inferred type of a local variable.  Only used for
    /// type-definition requests.
    fn record_variable_type(&mut self, variable: &Variable);
}

/// One thing a resolution reported.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Declaration {
        declaration: Declaration,
        is_type_definition: bool,
    },
    VariableType(Variable),
}

/// Accumulator for a single "go to (type) definition" request.
#[derive(Debug, Clone, Default)]
pub struct DefinitionRequest {
    wants_type_definition: bool,
    records: Vec<Record>,
}

impl DefinitionRequest {
    /// A "go to definition" request.
    pub fn definition() -> Self {
        Self::default()
    }

    /// A "go to type definition" request.
    pub fn type_definition() -> Self {
        Self {
            wants_type_definition: true,
            records: Vec::new(),
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Render the records to locations, in record order, without duplicates.
    ///
    /// Under a type-definition request a declaration recorded with
    /// `is_type_definition` is replaced by the class declarations of its
    /// declared type, and a variable-type record expands to the classes of
    /// the variable's type.  Native types and classes the index does not
    /// know are skipped.
    pub fn locations(&self, index: &dyn SymbolIndex) -> Vec<Location> {
        let mut locations: Vec<Location> = Vec::new();
        let mut push = |location: Location| {
            if !locations.contains(&location) {
                locations.push(location);
            }
        };

        for record in &self.records {
            match record {
                Record::Declaration {
                    declaration,
                    is_type_definition,
                } => {
                    let followed = if self.wants_type_definition && *is_type_definition {
                        declaration.declared_type()
                    } else {
                        None
                    };
                    match followed {
                        Some(union_type) => {
                            for location in class_locations(index, union_type) {
                                push(location);
                            }
                        }
                        None => push(declaration.location().clone()),
                    }
                }
                Record::VariableType(variable) => {
                    for location in class_locations(index, &variable.union_type) {
                        push(location);
                    }
                }
            }
        }

        locations
    }

    /// Build the LSP response: `Scalar` for one location, `Array` for
    /// several, `None` when nothing was found.
    pub fn to_response(&self, index: &dyn SymbolIndex) -> Option<GotoDefinitionResponse> {
        let mut locations = self.locations(index);
        match locations.len() {
            0 => None,
            1 => locations.pop().map(GotoDefinitionResponse::Scalar),
            _ => Some(GotoDefinitionResponse::Array(locations)),
        }
    }
}

fn class_locations<'a>(
    index: &'a dyn SymbolIndex,
    union_type: &'a UnionType,
) -> impl Iterator<Item = Location> + 'a {
    union_type
        .class_types()
        .filter_map(|fqsen| index.get_class(&fqsen))
        .map(|class| class.location)
}

impl ResultAccumulator for DefinitionRequest {
    fn wants_type_definition(&self) -> bool {
        self.wants_type_definition
    }

    fn record_declaration(&mut self, declaration: &Declaration, is_type_definition: bool) {
        tracing::trace!(
            fqsen = %declaration.fqsen(),
            is_type_definition,
            "recording declaration"
        );
        self.records.push(Record::Declaration {
            declaration: declaration.clone(),
            is_type_definition,
        });
    }

    fn record_variable_type(&mut self, variable: &Variable) {
        tracing::trace!(variable = %variable.name, ty = %variable.union_type, "recording variable type");
        self.records.push(Record::VariableType(variable.clone()));
    }
}
