/// Per-record validation diagnostics
///
/// Local (pre-submission) and remote (server rejection) problems share this
/// shape so a single renderer displays both.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field path used for problems with the record as a whole
pub const WHOLE_RECORD: &str = "$";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub index: usize,
    pub field: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(index: usize, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            index,
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Diagnostics of a single record, in their original relative order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticGroup<'a> {
    pub index: usize,
    pub items: Vec<&'a Diagnostic>,
}

/// Groups diagnostics by record index, ascending. The input is left untouched.
pub fn group_by_index(diagnostics: &[Diagnostic]) -> Vec<DiagnosticGroup<'_>> {
    let mut groups: BTreeMap<usize, Vec<&Diagnostic>> = BTreeMap::new();
    for diagnostic in diagnostics {
        groups.entry(diagnostic.index).or_default().push(diagnostic);
    }
    groups
        .into_iter()
        .map(|(index, items)| DiagnosticGroup { index, items })
        .collect()
}

/// Plain-text rendering shared by local and server diagnostics
pub fn render_grouped(diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();
    for group in group_by_index(diagnostics) {
        out.push_str(&format!("Record #{}\n", group.index));
        for item in group.items {
            out.push_str(&format!("  - {}\n", item));
        }
    }
    out
}
