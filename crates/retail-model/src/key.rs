use std::fmt;

/// Key chosen for deduplication or joining.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityKey {
    Single(String),
    Composite(Vec<String>),
}

impl EntityKey {
    pub fn single(column: impl Into<String>) -> Self {
        EntityKey::Single(column.into())
    }

    /// Key columns in the order they are compared.
    pub fn columns(&self) -> Vec<&str> {
        match self {
            EntityKey::Single(column) => vec![column.as_str()],
            EntityKey::Composite(columns) => columns.iter().map(String::as_str).collect(),
        }
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, EntityKey::Composite(_))
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKey::Single(column) => f.write_str(column),
            EntityKey::Composite(columns) => write!(f, "({})", columns.join(", ")),
        }
    }
}
