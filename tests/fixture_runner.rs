//! Data-driven definition tests.
//!
//! Each `tests/fixtures/*.json` file holds a snapshot, a query, and the
//! records and locations the query must produce:
//!
//! ```json
//! {
//!   "snapshot": { "classes": [...] },
//!   "context": { "namespace": "App" },
//!   "node": { "kind": "name_ref", "name": "User" },
//!   "type_definition": false,
//!   "records": [ { "declaration": "\\App\\User", "type_definition": false } ],
//!   "locations": [ ["/src/User.php", 3] ]
//! }
//! ```
use std::path::Path;

use serde::Deserialize;

use phpantom_definition::{
    CodeBase, Context, DefinitionRequest, DefinitionResolver, Node, Record, Snapshot,
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Fixture {
    snapshot: Snapshot,
    #[serde(default)]
    context: Context,
    node: Node,
    #[serde(default)]
    type_definition: bool,
    records: Vec<ExpectedRecord>,
    #[serde(default)]
    locations: Option<Vec<(String, u32)>>,
}

#[derive(Debug, PartialEq, Deserialize)]
#[serde(untagged)]
enum ExpectedRecord {
    Declaration {
        declaration: String,
        type_definition: bool,
    },
    Variable {
        variable: String,
    },
}

impl From<&Record> for ExpectedRecord {
    fn from(record: &Record) -> Self {
        match record {
            Record::Declaration {
                declaration,
                is_type_definition,
            } => Self::Declaration {
                declaration: declaration.fqsen(),
                type_definition: *is_type_definition,
            },
            Record::VariableType(variable) => Self::Variable {
                variable: variable.name.clone(),
            },
        }
    }
}

fn run_fixture(path: &Path) -> datatest_stable::Result<()> {
    let content = std::fs::read_to_string(path)?;
    let fixture: Fixture = serde_json::from_str(&content)?;
    let codebase = CodeBase::from_snapshot(fixture.snapshot);

    let mut request = if fixture.type_definition {
        DefinitionRequest::type_definition()
    } else {
        DefinitionRequest::definition()
    };
    DefinitionResolver::for_codebase(&codebase).resolve(&fixture.context, &fixture.node, &mut request);

    let actual: Vec<ExpectedRecord> = request.records().iter().map(ExpectedRecord::from).collect();
    if actual != fixture.records {
        return Err(format!(
            "{}: records differ\n  expected: {:?}\n  actual:   {:?}",
            path.display(),
            fixture.records,
            actual
        )
        .into());
    }

    if let Some(expected) = fixture.locations {
        let actual: Vec<(String, u32)> = request
            .locations(&codebase)
            .into_iter()
            .map(|location| (location.uri.path().to_string(), location.range.start.line))
            .collect();
        if actual != expected {
            return Err(format!(
                "{}: locations differ\n  expected: {expected:?}\n  actual:   {actual:?}",
                path.display()
            )
            .into());
        }
    }

    Ok(())
}

datatest_stable::harness! {
    { test = run_fixture, root = "tests/fixtures", pattern = r"\.json$" },
}
