#[cfg(test)]
mod tests {
    use anvil_core::{DataType, Db, Field, Migrator, Schema, Value};
    use anvil_dm8::{Dm8Driver, Dm8Namer};
    use anvil_tests::{RecordingExecutor, init_logs, menus_user, silent_logs, user};
    use indoc::indoc;

    fn dm8_db(executor: RecordingExecutor) -> Db<RecordingExecutor, Dm8Driver> {
        init_logs();
        Dm8Driver::open("dm://SDP:111@127.0.0.1:5236").with_connection(executor)
    }

    #[tokio::test]
    async fn create_table_then_indexes() {
        let schema = menus_user(&Dm8Namer);
        let mut db = dm8_db(RecordingExecutor::new());
        db.migrator()
            .create_table(&[&schema])
            .await
            .expect("Failed to create the table");
        assert_eq!(
            db.executor.sql(),
            [
                indoc! {r#"
                    CREATE TABLE "MENUS_USER" ("USER_ID" bigint NOT NULL,"MENU_ID" bigint,
                    CONSTRAINT "FK_MENUS_USER_USER_ID" FOREIGN KEY ("USER_ID") REFERENCES "USER"("ID"),
                    CONSTRAINT "CHK_MENUS_USER_USER_ID" CHECK (USER_ID > 0))
                "#}
                .trim()
                .replace('\n', ""),
                r#"CREATE INDEX "IDX_MENUS_USER_USER_ID" ON "MENUS_USER" ("USER_ID")"#.into(),
                r#"CREATE INDEX "IDX_MENUS_USER_MENU_ID" ON "MENUS_USER" ("MENU_ID")"#.into(),
            ]
        );
    }

    #[tokio::test]
    async fn create_table_comments() {
        let schema = user(&Dm8Namer);
        let mut db = dm8_db(RecordingExecutor::new());
        db.migrator()
            .create_table(&[&schema])
            .await
            .expect("Failed to create the table");
        let sql = db.executor.sql();
        assert!(sql[0].starts_with(
            r#"CREATE TABLE "USER" ("ID" bigint IDENTITY(1,1),"LOGIN_NAME" varchar(256) NOT NULL UNIQUE,"NAME" varchar(256),"ENCRYPTED_PASSWORD" varchar(8188),"#
        ));
        assert!(sql[0].contains(r#""LAST_LOGIN_FAILED_AT" datetime NULL,"#));
        assert!(sql[0].ends_with(r#"PRIMARY KEY ("ID"))"#));
        assert_eq!(
            sql.last().copied(),
            Some(r#"COMMENT ON COLUMN "USER"."PHONE" IS 'Mobile number'"#)
        );
        assert_eq!(sql.iter().filter(|v| v.starts_with("CREATE INDEX")).count(), 3);
    }

    #[tokio::test]
    async fn unsized_numbers() {
        let schema = Schema::parse(
            &Dm8Namer,
            "Reading",
            [
                Field::new("ID", DataType::Int),
                Field::new("Level", DataType::Int).size(7),
                Field::new("Value", DataType::Float),
                Field::new("Ratio", DataType::Float).size(32),
            ],
        );
        let mut db = dm8_db(RecordingExecutor::new());
        db.migrator()
            .create_table(&[&schema])
            .await
            .expect("Failed to create the table");
        assert_eq!(
            db.executor.sql(),
            [r#"CREATE TABLE "READING" ("ID" bigint,"LEVEL" tinyint,"VALUE" double,"RATIO" float,PRIMARY KEY ("ID"))"#]
        );
    }

    #[tokio::test]
    async fn drop_tables() {
        let user = user(&Dm8Namer);
        let menus_user = menus_user(&Dm8Namer);
        let mut db = dm8_db(RecordingExecutor::new());
        db.migrator()
            .drop_table(&[&user, &menus_user])
            .await
            .expect("Failed to drop the tables");
        assert_eq!(
            db.executor.sql(),
            [
                "SET FOREIGN_KEY_CHECKS = 0;",
                r#"DROP TABLE IF EXISTS "MENUS_USER" CASCADE"#,
                r#"DROP TABLE IF EXISTS "USER" CASCADE"#,
                "SET FOREIGN_KEY_CHECKS = 1;",
            ]
        );
    }

    #[tokio::test]
    async fn drop_tables_failures() {
        let user = user(&Dm8Namer);
        let mut db = dm8_db(RecordingExecutor::new().fail_on("FOREIGN_KEY_CHECKS"));
        silent_logs! {
            db.migrator()
                .drop_table(&[&user])
                .await
                .expect("Foreign key checks failures are not fatal");
        }
        assert_eq!(db.executor.queries.len(), 3);

        let mut db = dm8_db(RecordingExecutor::new().fail_on("DROP TABLE"));
        let result;
        silent_logs! {
            result = db.migrator().drop_table(&[&user]).await;
        }
        assert!(matches!(result, Err(..)));
        assert_eq!(
            db.executor.sql(),
            [
                "SET FOREIGN_KEY_CHECKS = 0;",
                r#"DROP TABLE IF EXISTS "USER" CASCADE"#,
                "SET FOREIGN_KEY_CHECKS = 1;",
            ]
        );
    }

    #[tokio::test]
    async fn catalog_queries() {
        let user = user(&Dm8Namer);
        let mut db = dm8_db(RecordingExecutor::new()
            .answer("SDP")
            .answer(1_i64)
            .answer(0_i64)
            .answer(2_i64)
            .answer(1_i64));
        let mut migrator = db.migrator();
        assert_eq!(
            migrator
                .current_database()
                .await
                .expect("Failed to read the schema"),
            "SDP"
        );
        assert!(migrator.has_table(&user).await.expect("Failed to check the table"));
        assert!(
            !migrator
                .has_column(&user, "Phone")
                .await
                .expect("Failed to check the column")
        );
        assert!(migrator.has_index(&user, "Phone").await.expect("Failed to check the index"));
        assert!(
            migrator
                .has_constraint(&user, "CHK_USER_AGE")
                .await
                .expect("Failed to check the constraint")
        );
        assert!(!migrator.has_table(&user).await.expect("Failed to check the table"));
        drop(migrator);
        let queries = &db.executor.queries;
        assert_eq!(
            queries[0].sql,
            "SELECT SYS_CONTEXT ('userenv', 'current_schema') FROM DUAL"
        );
        assert_eq!(
            queries[1].sql,
            "SELECT COUNT(*) FROM USER_TABLES WHERE TABLE_NAME = ?"
        );
        assert_eq!(queries[1].values, [Value::from("USER")]);
        assert_eq!(
            queries[2].sql,
            "SELECT COUNT(*) FROM USER_TAB_COLUMNS WHERE TABLE_NAME = ? AND COLUMN_NAME = ?"
        );
        assert_eq!(queries[2].values, [Value::from("USER"), "PHONE".into()]);
        assert_eq!(
            queries[3].sql,
            "SELECT COUNT(*) FROM USER_INDEXES WHERE TABLE_NAME = ? AND INDEX_NAME = ?"
        );
        assert_eq!(queries[3].values, [Value::from("USER"), "IDX_USER_PHONE".into()]);
        assert_eq!(
            queries[4].sql,
            "SELECT COUNT(*) FROM USER_CONSTRAINTS WHERE TABLE_NAME = ? AND CONSTRAINT_NAME = ?"
        );
    }

    #[tokio::test]
    async fn columns() {
        let user = user(&Dm8Namer);
        let mut db = dm8_db(RecordingExecutor::new());
        let mut migrator = db.migrator();
        migrator
            .add_column(&user, "Title")
            .await
            .expect("Failed to add the column");
        migrator
            .alter_column(&user, "PHONE")
            .await
            .expect("Failed to alter the column");
        migrator
            .alter_column(&user, "LastLoginFailedAt")
            .await
            .expect("Failed to alter the column");
        migrator
            .rename_column(&user, "Title", "position")
            .await
            .expect("Failed to rename the column");
        migrator
            .drop_column(&user, "Phone")
            .await
            .expect("Failed to drop the column");
        let error = migrator
            .add_column(&user, "Missing")
            .await
            .expect_err("Unknown fields cannot be added");
        assert_eq!(error.to_string(), "failed to look up field with name: Missing");
        drop(migrator);
        assert_eq!(
            db.executor.sql(),
            [
                r#"ALTER TABLE "USER" ADD "TITLE" varchar(8188)"#,
                r#"ALTER TABLE "USER" MODIFY COLUMN "PHONE" varchar(256)"#,
                r#"ALTER TABLE "USER" MODIFY COLUMN "LAST_LOGIN_FAILED_AT" datetime NULL"#,
                r#"ALTER TABLE "USER" RENAME COLUMN "TITLE" TO "POSITION""#,
                r#"ALTER TABLE "USER" DROP COLUMN "PHONE""#,
            ]
        );
    }

    #[tokio::test]
    async fn indexes_and_constraints() {
        let user = user(&Dm8Namer);
        let menus_user = menus_user(&Dm8Namer);
        let mut db = dm8_db(RecordingExecutor::new().answer(1_i64).answer(0_i64));
        let mut migrator = db.migrator();
        migrator
            .drop_index(&user, "Phone")
            .await
            .expect("Failed to drop the index");
        migrator
            .create_index(&user, "IDX_USER_PHONE")
            .await
            .expect("Failed to create the index");
        migrator
            .drop_constraint(&menus_user, "CHK_MENUS_USER_USER_ID")
            .await
            .expect("Failed to drop the check");
        migrator
            .drop_constraint(&menus_user, "FK_MENUS_USER_USER_ID")
            .await
            .expect("Failed to drop the foreign key");
        migrator
            .create_constraint(&menus_user, "CHK_MENUS_USER_USER_ID")
            .await
            .expect("An existing constraint is left alone");
        migrator
            .create_constraint(&menus_user, "FK_MENUS_USER_USER_ID")
            .await
            .expect("Failed to create the foreign key");
        drop(migrator);
        assert_eq!(
            db.executor.sql(),
            [
                r#"DROP INDEX "IDX_USER_PHONE""#,
                r#"CREATE INDEX "IDX_USER_PHONE" ON "USER" ("PHONE")"#,
                r#"ALTER TABLE "MENUS_USER" DROP CHECK "CHK_MENUS_USER_USER_ID""#,
                r#"ALTER TABLE "MENUS_USER" DROP CONSTRAINT "FK_MENUS_USER_USER_ID""#,
                "SELECT COUNT(*) FROM USER_CONSTRAINTS WHERE TABLE_NAME = ? AND CONSTRAINT_NAME = ?",
                "SELECT COUNT(*) FROM USER_CONSTRAINTS WHERE TABLE_NAME = ? AND CONSTRAINT_NAME = ?",
                r#"ALTER TABLE "MENUS_USER" ADD CONSTRAINT "FK_MENUS_USER_USER_ID" FOREIGN KEY ("USER_ID") REFERENCES "USER"("ID")"#,
            ]
        );
    }
}
