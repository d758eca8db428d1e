use serde::{Deserialize, Serialize};

/// A scalar property on a class.
///
/// `accessor` is the key the loader reads from a flat record, formed as
/// `<class_lowercase>_<property>` (e.g. `article_title` for
/// `Article.title`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalarProperty {
    pub name: String,
    pub accessor: String,
}

/// A directed cross-reference from one class to another, e.g.
/// `Article.hasAuthors -> Author`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceProperty {
    pub name: String,
    pub target: String,
}

/// One class: scalars feed object creation, references feed edge creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSchema {
    pub name: String,
    pub scalars: Vec<ScalarProperty>,
    pub references: Vec<ReferenceProperty>,
}

/// The parsed store schema. Classes keep the document's order; that order
/// is also the loader's iteration order, which keeps object resolution
/// deterministic across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub classes: Vec<ClassSchema>,
}

impl Schema {
    pub fn class(&self, name: &str) -> Option<&ClassSchema> {
        self.classes.iter().find(|class| class.name == name)
    }
}
