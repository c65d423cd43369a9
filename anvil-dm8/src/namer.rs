use anvil_core::Namer;
use convert_case::{Case, Casing};

/// Upper snake case names, the case DM8 folds unquoted identifiers to.
///
/// Index and constraint names are upper cased as well so that the catalog
/// lookups (`USER_INDEXES`, `USER_CONSTRAINTS`) find them by the same name.
#[derive(Default, Debug, Clone, Copy)]
pub struct Dm8Namer;

impl Namer for Dm8Namer {
    fn table_name(&self, model: &str) -> String {
        model.to_case(Case::UpperSnake)
    }
    fn column_name(&self, _table: &str, field: &str) -> String {
        field.to_case(Case::UpperSnake)
    }
    fn index_name(&self, table: &str, column: &str) -> String {
        format!("IDX_{}_{}", table, column).to_uppercase()
    }
    fn check_name(&self, table: &str, column: &str) -> String {
        format!("CHK_{}_{}", table, column).to_uppercase()
    }
    fn foreign_key_name(&self, table: &str, column: &str) -> String {
        format!("FK_{}_{}", table, column).to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upper_snake_names() {
        let namer = Dm8Namer;
        assert_eq!(namer.table_name("MenusUser"), "MENUS_USER");
        assert_eq!(namer.column_name("USER", "LoginName"), "LOGIN_NAME");
        assert_eq!(namer.index_name("USER", "PHONE"), "IDX_USER_PHONE");
        assert_eq!(namer.check_name("user", "age"), "CHK_USER_AGE");
    }
}
