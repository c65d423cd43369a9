#[cfg(test)]
mod tests {
    use anvil_core::{Dialect, Driver};
    use anvil_dm8::{Config, Dm8Driver};
    use anvil_tests::{RecordingExecutor, execute_tests, init_logs, silent_logs};

    const URL: &str = "dm://SDP:111@192.168.100.90:5236?appName=SDP";

    #[tokio::test]
    async fn initialize() {
        init_logs();
        let db = Dm8Driver::open(URL)
            .initialize::<RecordingExecutor>()
            .await
            .expect("Could not open the database");
        assert_eq!(db.executor.url, URL);
        assert_eq!(Dm8Driver::NAME, "dm");
        assert_eq!(db.dialect().name(), "dm");
        assert!(db.driver.migrator_config().create_index_after_create_table);
    }

    #[tokio::test]
    async fn initialize_wrong_scheme() {
        init_logs();
        let result;
        silent_logs! {
            result = Dm8Driver::open("mysql://root@localhost")
                .initialize::<RecordingExecutor>()
                .await;
        }
        assert!(matches!(result, Err(..)));
        let driver = Dm8Driver::new(Config {
            driver_name: "dameng".into(),
            dsn: "dameng://root@localhost".into(),
            default_string_size: 128,
            disable_foreign_key_constraints: true,
        });
        assert!(driver.migrator_config().disable_foreign_key_constraints);
        assert_eq!(driver.dialect().default_string_size, 128);
        let db = driver
            .initialize::<RecordingExecutor>()
            .await
            .expect("The scheme follows the driver name");
        assert_eq!(db.driver.config().driver_name(), "dameng");
    }

    #[tokio::test]
    async fn suite() {
        init_logs();
        let mut db = Dm8Driver::open(URL).with_connection(RecordingExecutor::new());
        execute_tests(&mut db).await;
        let sql = db.executor.sql();
        assert!(sql.contains(&"SET FOREIGN_KEY_CHECKS = 1;"));
        assert!(sql.iter().any(|v| v.ends_with(
            r#"ORDER BY "ID" DESC OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY"#
        )));
        assert!(sql.contains(&r#"UPDATE "USER" SET "NAME"=? WHERE "ID" = ?"#));
        assert_eq!(
            &sql[sql.len() - 2..],
            ["SAVEPOINT before_delete", "ROLLBACK TO SAVEPOINT before_delete"]
        );
    }
}
