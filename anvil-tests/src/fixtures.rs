use anvil::{DataType, Field, Namer, Schema};

/// Account model with unique, indexed and commented columns.
pub fn user(namer: &dyn Namer) -> Schema {
    Schema::parse(
        namer,
        "User",
        [
            Field::new("ID", DataType::Int).size(64).auto_increment(),
            Field::new("LoginName", DataType::String)
                .unique()
                .not_null()
                .index(),
            Field::new("Name", DataType::String).index(),
            Field::new("EncryptedPassword", DataType::String),
            Field::new("PasswordSalt", DataType::String),
            Field::new("RoleCode", DataType::Int).size(64),
            Field::new("Actived", DataType::Bool),
            Field::new("Source", DataType::Int).size(64),
            Field::new("TokenSince", DataType::Int).size(64),
            Field::new("LoginFailedTimes", DataType::Int).size(64),
            Field::new("LastLoginFailedAt", DataType::Time),
            Field::new("Phone", DataType::String)
                .index()
                .comment("Mobile number"),
            Field::new("Title", DataType::String),
            Field::new("MXUserID", DataType::Int).size(64),
            Field::new("MXDeptID", DataType::Int).size(64),
            Field::new("NoAuth", DataType::Bool),
        ],
    )
}

/// Join table between users and menus, without a primary key.
pub fn menus_user(namer: &dyn Namer) -> Schema {
    Schema::parse(
        namer,
        "MenusUser",
        [
            Field::new("UserID", DataType::Int)
                .size(64)
                .not_null()
                .index()
                .references(namer.table_name("User"), namer.column_name("", "ID"))
                .check("USER_ID > 0"),
            Field::new("MenuID", DataType::Int).size(64).index(),
        ],
    )
}
