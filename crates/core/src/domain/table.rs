use std::fmt;

use serde::{Deserialize, Serialize};

/// Three-part warehouse table identifier: `project.dataset.table`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableRef {
    pub project: String,
    pub dataset: String,
    pub table: String,
}

impl TableRef {
    pub fn new(
        project: impl Into<String>,
        dataset: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self { project: project.into(), dataset: dataset.into(), table: table.into() }
    }

    pub fn qualified(&self) -> String {
        format!("{}.{}.{}", self.project, self.dataset, self.table)
    }

    /// The identifier as it appears in SQL text.
    pub fn quoted(&self) -> String {
        format!("`{}`", self.qualified())
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified())
    }
}
