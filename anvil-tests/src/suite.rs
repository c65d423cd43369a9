use crate::fixtures::{menus_user, user};
use anvil::{
    Assignment, Column, Db, Dialect, Driver, Executor, Expression, FromClause, Limit, Migrator,
    OrderBy, OrderByColumn, QUERY_CLAUSES, Select, Set, UPDATE_CLAUSES, Update, Where,
};

/// Create, alter and drop the fixture tables.
pub async fn migration<E: Executor, D: Driver>(db: &mut Db<E, D>) {
    let user = user(db.dialect().namer());
    let menus_user = menus_user(db.dialect().namer());
    let mut migrator = db.migrator();
    migrator
        .drop_table(&[&menus_user, &user])
        .await
        .expect("Failed to drop the fixture tables");
    migrator
        .create_table(&[&menus_user, &user])
        .await
        .expect("Failed to create the fixture tables");
    migrator
        .has_table(&user)
        .await
        .expect("Failed to check the User table");
    migrator
        .current_database()
        .await
        .expect("Failed to read the current database");

    // Columns
    migrator
        .alter_column(&user, "Title")
        .await
        .expect("Failed to alter the title column");
    migrator
        .rename_column(&user, "Title", "Position")
        .await
        .expect("Failed to rename the title column");
    migrator
        .rename_column(&user, "Position", "Title")
        .await
        .expect("Failed to restore the title column");
    migrator
        .has_column(&user, "Phone")
        .await
        .expect("Failed to check the phone column");
    assert!(
        migrator.add_column(&user, "Missing").await.is_err(),
        "Adding an unknown field must fail"
    );

    // Indexes and constraints
    migrator
        .has_index(&user, "Phone")
        .await
        .expect("Failed to check the phone index");
    migrator
        .drop_index(&user, "Phone")
        .await
        .expect("Failed to drop the phone index");
    migrator
        .create_index(&user, "Phone")
        .await
        .expect("Failed to create the phone index");
    let check = menus_user.checks[0].name.clone();
    migrator
        .create_constraint(&menus_user, &check)
        .await
        .expect("Failed to create the check constraint");
    migrator
        .drop_constraint(&menus_user, &check)
        .await
        .expect("Failed to drop the check constraint");

    migrator
        .auto_migrate(&[&user, &menus_user])
        .await
        .expect("Failed to migrate the fixture tables");
}

/// Render and run queries on the fixture tables.
pub async fn statements<E: Executor, D: Driver>(db: &mut Db<E, D>) {
    let user = user(db.dialect().namer());
    let name = user
        .lookup_field("Name")
        .map(|f| f.db_name.clone())
        .expect("User has a name field");

    let mut stmt = db.statement().with_schema(&user);
    stmt.add_clause(Select::default())
        .add_clause(FromClause::default())
        .add_clause(Where::new([Expression::eq(name.as_str(), "admin")]))
        .add_clause(OrderBy::new([OrderByColumn::desc(Column::primary_key())]))
        .add_clause(Limit::new(Some(10), 20));
    stmt.build(QUERY_CLAUSES);
    let query = stmt.finish().expect("Failed to build the select");
    assert_eq!(query.values.len(), 1);
    db.exec(query).await.expect("Failed to run the select");

    let mut stmt = db.statement().with_schema(&user);
    stmt.add_clause(Update::default())
        .add_clause(Set::new([Assignment::new(name.as_str(), "root")]))
        .add_clause(Where::new([Expression::eq(Column::primary_key(), 6)]));
    stmt.build(UPDATE_CLAUSES);
    let query = stmt.finish().expect("Failed to build the update");
    assert_eq!(query.values.len(), 2);
    db.exec(query).await.expect("Failed to run the update");

    db.save_point("before_delete")
        .await
        .expect("Failed to create the save point");
    db.rollback_to("before_delete")
        .await
        .expect("Failed to roll back to the save point");
}
