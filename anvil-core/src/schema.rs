use convert_case::{Case, Casing};
use std::{borrow::Cow, fmt::Display};

/// Abstract type of a model field, mapped to a native column type by each dialect.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    Bool,
    #[default]
    Int,
    Uint,
    Float,
    String,
    Time,
    Bytes,
    /// Type name written verbatim.
    Custom(Cow<'static, str>),
}

impl DataType {
    pub fn as_str(&self) -> &str {
        match self {
            DataType::Bool => "bool",
            DataType::Int => "int",
            DataType::Uint => "uint",
            DataType::Float => "float",
            DataType::String => "string",
            DataType::Time => "time",
            DataType::Bytes => "bytes",
            DataType::Custom(v) => v,
        }
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Referential action for foreign key updates / deletes.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    #[default]
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

impl Action {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Action::NoAction => "NO ACTION",
            Action::Restrict => "RESTRICT",
            Action::Cascade => "CASCADE",
            Action::SetNull => "SET NULL",
            Action::SetDefault => "SET DEFAULT",
        }
    }
}

/// Foreign key target of a field.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub table: String,
    pub column: String,
    pub on_delete: Option<Action>,
    pub on_update: Option<Action>,
}

/// Declarative description of a model field and its column.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Field {
    /// Field name as declared in the model.
    pub name: String,
    /// Physical column name, filled by the [`Namer`] when empty.
    pub db_name: String,
    pub data_type: DataType,
    /// Bit size for numeric types, length for strings and bytes (0 means unspecified).
    ///
    /// [`Schema::parse`] turns an unspecified numeric size into 64.
    pub size: u32,
    pub precision: u32,
    pub scale: u32,
    pub primary_key: bool,
    pub auto_increment: bool,
    pub not_null: bool,
    pub unique: bool,
    /// Name of the index this field takes part in. Empty name means a generated one.
    pub index: Option<String>,
    /// Whether the index above is unique.
    pub unique_index: bool,
    pub comment: String,
    /// Default value expression, written verbatim after `DEFAULT`.
    pub default_value: Option<String>,
    /// Check constraint expression.
    pub check: Option<String>,
    pub references: Option<Reference>,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            ..Default::default()
        }
    }
    pub fn db_name(mut self, db_name: impl Into<String>) -> Self {
        self.db_name = db_name.into();
        self
    }
    pub fn size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }
    pub fn precision(mut self, precision: u32, scale: u32) -> Self {
        self.precision = precision;
        self.scale = scale;
        self
    }
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }
    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
    pub fn index(mut self) -> Self {
        self.index = Some(String::new());
        self
    }
    pub fn index_named(mut self, name: impl Into<String>) -> Self {
        self.index = Some(name.into());
        self
    }
    pub fn unique_index(mut self) -> Self {
        self.index.get_or_insert_with(String::new);
        self.unique_index = true;
        self
    }
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }
    pub fn check(mut self, constraint: impl Into<String>) -> Self {
        self.check = Some(constraint.into());
        self
    }
    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.references = Some(Reference {
            table: table.into(),
            column: column.into(),
            ..Default::default()
        });
        self
    }
    pub fn on_delete(mut self, action: Action) -> Self {
        if let Some(references) = &mut self.references {
            references.on_delete = Some(action);
        }
        self
    }
    pub fn on_update(mut self, action: Action) -> Self {
        if let Some(references) = &mut self.references {
            references.on_update = Some(action);
        }
        self
    }

    /// Whether the field takes part in any index or unique constraint.
    pub fn has_index(&self) -> bool {
        self.index.is_some() || self.unique
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Index {
    pub name: String,
    /// Index class, `UNIQUE` or empty.
    pub class: String,
    /// Column names in index order.
    pub fields: Vec<String>,
    /// Trailing options written verbatim.
    pub option: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct CheckConstraint {
    pub name: String,
    pub constraint: String,
    /// Column the check was declared on.
    pub field: String,
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub name: String,
    pub column: String,
    pub references: Reference,
}

/// Naming strategy turning model and field names into physical names.
pub trait Namer: Send + Sync {
    fn table_name(&self, model: &str) -> String {
        model.to_case(Case::Snake)
    }
    fn column_name(&self, _table: &str, field: &str) -> String {
        field.to_case(Case::Snake)
    }
    fn index_name(&self, table: &str, column: &str) -> String {
        format!("idx_{}_{}", table, column)
    }
    fn check_name(&self, table: &str, column: &str) -> String {
        format!("chk_{}_{}", table, column)
    }
    fn foreign_key_name(&self, table: &str, column: &str) -> String {
        format!("fk_{}_{}", table, column)
    }
}

/// Default snake case naming.
#[derive(Default, Debug, Clone, Copy)]
pub struct SnakeNamer;
impl Namer for SnakeNamer {}

/// Parsed model: table, fields and the indexes and constraints derived from them.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Schema {
    /// Model name.
    pub name: String,
    pub table: String,
    pub fields: Vec<Field>,
    pub indexes: Vec<Index>,
    pub checks: Vec<CheckConstraint>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl Schema {
    /// Build the schema of `model`, naming table, columns, indexes and constraints with `namer`.
    ///
    /// When no field is flagged as primary key, the field whose column is `id` becomes one.
    /// Integers and floats declared without a size are 64 bits wide.
    pub fn parse(namer: &dyn Namer, model: &str, fields: impl IntoIterator<Item = Field>) -> Self {
        let table = namer.table_name(model);
        let mut fields = fields
            .into_iter()
            .map(|mut field| {
                if field.db_name.is_empty() {
                    field.db_name = namer.column_name(&table, &field.name);
                }
                if field.size == 0
                    && matches!(
                        field.data_type,
                        DataType::Int | DataType::Uint | DataType::Float
                    )
                {
                    field.size = 64;
                }
                field
            })
            .collect::<Vec<_>>();
        if !fields.iter().any(|f| f.primary_key) {
            if let Some(id) = fields
                .iter_mut()
                .find(|f| f.db_name.eq_ignore_ascii_case("id"))
            {
                id.primary_key = true;
            }
        }
        let mut indexes: Vec<Index> = Vec::new();
        let mut checks = Vec::new();
        let mut foreign_keys = Vec::new();
        for field in &fields {
            if let Some(name) = &field.index {
                let name = if name.is_empty() {
                    namer.index_name(&table, &field.db_name)
                } else {
                    name.clone()
                };
                match indexes.iter_mut().find(|v| v.name == name) {
                    Some(index) => index.fields.push(field.db_name.clone()),
                    None => indexes.push(Index {
                        name,
                        class: if field.unique_index { "UNIQUE" } else { "" }.into(),
                        fields: vec![field.db_name.clone()],
                        option: String::new(),
                    }),
                }
            }
            if let Some(constraint) = &field.check {
                checks.push(CheckConstraint {
                    name: namer.check_name(&table, &field.db_name),
                    constraint: constraint.clone(),
                    field: field.db_name.clone(),
                });
            }
            if let Some(references) = &field.references {
                foreign_keys.push(ForeignKey {
                    name: namer.foreign_key_name(&table, &field.db_name),
                    column: field.db_name.clone(),
                    references: references.clone(),
                });
            }
        }
        Self {
            name: model.into(),
            table,
            fields,
            indexes,
            checks,
            foreign_keys,
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Find a field by model name first, then by column name.
    pub fn lookup_field(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .or_else(|| self.fields.iter().find(|f| f.db_name == name))
    }

    /// Find an index by name, or the first index covering the field called `name`.
    pub fn lookup_index(&self, name: &str) -> Option<&Index> {
        if let Some(index) = self.indexes.iter().find(|v| v.name == name) {
            return Some(index);
        }
        let field = self.lookup_field(name)?;
        self.indexes
            .iter()
            .find(|v| v.fields.iter().any(|c| *c == field.db_name))
    }

    pub fn lookup_check(&self, name: &str) -> Option<&CheckConstraint> {
        self.checks.iter().find(|v| v.name == name)
    }

    pub fn lookup_foreign_key(&self, name: &str) -> Option<&ForeignKey> {
        self.foreign_keys.iter().find(|v| v.name == name)
    }

    pub fn primary_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.primary_key)
    }

    /// The primary field used when a single column must stand for the primary key.
    ///
    /// It is the only primary field, or the primary field named `id` for composite keys.
    pub fn prioritized_primary_field(&self) -> Option<&Field> {
        let mut primary = self.primary_fields();
        let first = primary.next()?;
        if primary.next().is_none() {
            return Some(first);
        }
        self.primary_fields()
            .find(|f| f.db_name.eq_ignore_ascii_case("id"))
    }

    pub fn db_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.db_name.as_str())
    }

    /// Tables this schema points to through foreign keys, excluding itself.
    pub fn dependencies(&self) -> impl Iterator<Item = &str> {
        self.foreign_keys
            .iter()
            .map(|v| v.references.table.as_str())
            .filter(|v| *v != self.table)
    }
}

/// Order schemas so that every schema comes after the ones it references.
///
/// References to tables outside `schemas` are ignored. Cycles keep declaration order.
pub fn reorder_schemas<'s>(schemas: &[&'s Schema]) -> Vec<&'s Schema> {
    let mut result: Vec<&Schema> = Vec::with_capacity(schemas.len());
    let mut visiting = Vec::new();
    fn visit<'s>(
        schema: &'s Schema,
        schemas: &[&'s Schema],
        visiting: &mut Vec<&'s str>,
        result: &mut Vec<&'s Schema>,
    ) {
        if result.iter().any(|v| v.table == schema.table) || visiting.contains(&&*schema.table) {
            return;
        }
        visiting.push(&schema.table);
        for dependency in schema.dependencies() {
            if let Some(target) = schemas.iter().find(|v| v.table == dependency) {
                visit(target, schemas, visiting, result);
            }
        }
        visiting.pop();
        result.push(schema);
    }
    for schema in schemas {
        visit(schema, schemas, &mut visiting, &mut result);
    }
    result
}
