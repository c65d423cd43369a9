/// Placeholder table name replaced by the statement's table when quoted.
pub const CURRENT_TABLE: &str = "@@@table@@@";
/// Placeholder column name replaced by the schema's primary key when quoted.
pub const PRIMARY_KEY: &str = "@@@py@@@";

/// Reference to a column, optionally qualified by its table.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Table qualifier, empty when unqualified.
    pub table: String,
    pub name: String,
    pub alias: String,
    /// Write the name verbatim instead of quoting it.
    pub raw: bool,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
    pub fn qualified(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            name: name.into(),
            ..Default::default()
        }
    }
    pub fn raw(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw: true,
            ..Default::default()
        }
    }
    /// The primary key of the statement's schema.
    pub fn primary_key() -> Self {
        Self::new(PRIMARY_KEY)
    }
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }
    pub fn is_primary_key(&self) -> bool {
        self.name == PRIMARY_KEY
    }
}

impl From<&str> for Column {
    fn from(value: &str) -> Self {
        Column::new(value)
    }
}

/// Reference to a table with an optional alias.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub alias: String,
    pub raw: bool,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
    /// The statement's own table.
    pub fn current() -> Self {
        Self::new(CURRENT_TABLE)
    }
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }
    pub fn is_current(&self) -> bool {
        self.name == CURRENT_TABLE
    }
}

impl From<&str> for Table {
    fn from(value: &str) -> Self {
        Table::new(value)
    }
}
