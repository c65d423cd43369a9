#[cfg(test)]
mod tests {
    use anvil_core::{
        Assignment, CREATE_CLAUSES, Clause, Column, Dialect, Expression, FromClause, GroupBy,
        Insert, Join, JoinType, Limit, OnConflict, OrderBy, OrderByColumn, QUERY_CLAUSES, Query,
        Schema, Select, Set, Statement, Table, UPDATE_CLAUSES, Update, Value, Values, Where,
    };
    use anvil_dm8::{Dm8Dialect, Dm8Namer};
    use anvil_tests::user;

    const DIALECT: Dm8Dialect = Dm8Dialect::new(0);

    fn render(schema: Option<&Schema>, keywords: &[&str], clauses: Vec<Clause>) -> Query {
        let mut stmt = Statement::new(&DIALECT);
        stmt = match schema {
            Some(schema) => stmt.with_schema(schema),
            None => stmt.with_table("orders"),
        };
        for clause in clauses {
            stmt.add_clause(clause);
        }
        stmt.build(keywords);
        stmt.finish().expect("The statement must render")
    }

    #[test]
    fn where_swaps_and_wraps() {
        let schema = user(&Dm8Namer);
        let query = render(
            Some(&schema),
            &["WHERE"],
            vec![
                Where::new([
                    Expression::or([Expression::eq("name", "a")]),
                    Expression::expr("age > ? and age < ?", [Value::from(1), 2.into()]),
                    Expression::eq("phone", "x"),
                ])
                .into(),
            ],
        );
        assert_eq!(
            query.sql,
            r#"WHERE (AGE > ? AND AGE < ?) OR "NAME" = ? AND "PHONE" = ?"#
        );
        assert_eq!(
            query.values,
            [Value::from(1), 2.into(), "a".into(), "x".into()]
        );
    }

    #[test]
    fn where_wraps_on_substrings() {
        let query = render(
            None,
            &["WHERE"],
            vec![
                Where::new([
                    Expression::expr("color = ?", [Value::from("red")]),
                    Expression::eq(Column::new("id"), 3),
                ])
                .into(),
            ],
        );
        assert_eq!(query.sql, r#"WHERE (COLOR = ?) AND "ID" = ?"#);
        let query = render(
            None,
            &["WHERE"],
            vec![Where::new([Expression::expr("name = ?", [Value::from("x")])]).into()],
        );
        assert_eq!(query.sql, "WHERE NAME = ?");
    }

    #[test]
    fn where_single_element_groups() {
        let pair = || Expression::and([Expression::eq("x", 1), Expression::eq("y", 2)]);
        let query = render(
            None,
            &["WHERE"],
            vec![Where::new([Expression::or([pair()])]).into()],
        );
        assert_eq!(query.sql, r#"WHERE ("X" = ? AND "Y" = ?)"#);
        let query = render(
            None,
            &["WHERE"],
            vec![Where::new([Expression::or([pair()]), Expression::eq("z", 3)]).into()],
        );
        assert_eq!(query.sql, r#"WHERE "Z" = ? OR ("X" = ? AND "Y" = ?)"#);
        assert_eq!(query.values, [Value::from(3), 1.into(), 2.into()]);
        let query = render(
            None,
            &["WHERE"],
            vec![
                Where::new([
                    Expression::and([Expression::expr("a = 1 or b = 2", [])]),
                    Expression::eq("z", 3),
                ])
                .into(),
            ],
        );
        assert_eq!(query.sql, r#"WHERE (A = 1 OR B = 2) AND "Z" = ?"#);
        let query = render(
            None,
            &["WHERE"],
            vec![
                Where::new([
                    Expression::and([Expression::expr("name = ?", [Value::from("x")])]),
                    Expression::eq("z", 3),
                ])
                .into(),
            ],
        );
        assert_eq!(query.sql, r#"WHERE NAME = ? AND "Z" = ?"#);
    }

    #[test]
    fn where_flattens_lists() {
        let query = render(
            None,
            &["WHERE"],
            vec![Where::new([Expression::is_in("id", [Value::from(vec![1, 2, 3])])]).into()],
        );
        assert_eq!(query.sql, r#"WHERE "ID" IN (?,?,?)"#);
        assert_eq!(query.values.len(), 3);
    }

    #[test]
    fn limit_synthesizes_order() {
        let schema = user(&Dm8Namer);
        let query = render(
            Some(&schema),
            QUERY_CLAUSES,
            vec![
                Select::default().into(),
                FromClause::default().into(),
                Limit::new(Some(10), 20).into(),
            ],
        );
        assert_eq!(
            query.sql,
            r#"SELECT * FROM "USER" ORDER BY "ID" OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY"#
        );
        let query = render(
            None,
            QUERY_CLAUSES,
            vec![
                Select::default().into(),
                FromClause::default().into(),
                Limit::new(Some(5), 0).into(),
            ],
        );
        assert_eq!(
            query.sql,
            r#"SELECT * FROM "ORDERS" ORDER BY (SELECT NULL FROM DUAL) FETCH NEXT 5 ROWS ONLY"#
        );
    }

    #[test]
    fn limit_keeps_existing_order() {
        let schema = user(&Dm8Namer);
        let query = render(
            Some(&schema),
            QUERY_CLAUSES,
            vec![
                Select::default().into(),
                FromClause::default().into(),
                OrderBy::new([OrderByColumn::desc("name")]).into(),
                Limit::new(Some(1), 0).into(),
            ],
        );
        assert_eq!(
            query.sql,
            r#"SELECT * FROM "USER" ORDER BY "NAME" DESC FETCH NEXT 1 ROWS ONLY"#
        );
        let query = render(
            Some(&schema),
            QUERY_CLAUSES,
            vec![
                Select::default().into(),
                FromClause::default().into(),
                OrderBy::new([OrderByColumn::desc("name")]).into(),
                Limit::new(None, 0).into(),
            ],
        );
        assert_eq!(query.sql, r#"SELECT * FROM "USER" ORDER BY "NAME" DESC"#);
    }

    #[test]
    fn set_skips_identifiers() {
        let schema = user(&Dm8Namer);
        let query = render(
            Some(&schema),
            UPDATE_CLAUSES,
            vec![
                Update::default().into(),
                Set::new([
                    Assignment::new("id", 5),
                    Assignment::new("name", "bob"),
                    Assignment::new("ID", 6),
                ])
                .into(),
                Where::new([Expression::eq(Column::primary_key(), 1)]).into(),
            ],
        );
        assert_eq!(query.sql, r#"UPDATE "USER" SET "NAME"=? WHERE "ID" = ?"#);
        assert_eq!(query.values, [Value::from("bob"), 1.into()]);
        for set in [Set::default(), Set::new([Assignment::new("Id", 1)])] {
            let query = render(
                Some(&schema),
                UPDATE_CLAUSES,
                vec![Update::default().into(), set.into()],
            );
            assert_eq!(query.sql, r#"UPDATE "USER" SET "ID"="ID""#);
        }
    }

    #[test]
    fn select_columns() {
        let query = render(
            None,
            &["SELECT"],
            vec![
                Select::new([
                    Column::new("name"),
                    Column::qualified("u", "login_name").alias("login"),
                ])
                .distinct()
                .into(),
            ],
        );
        assert_eq!(query.sql, r#"SELECT DISTINCT "NAME","U"."LOGIN_NAME" AS "LOGIN""#);
    }

    #[test]
    fn from_with_joins() {
        let query = render(
            None,
            &["FROM"],
            vec![
                FromClause {
                    tables: vec![Table::new("user").alias("u")],
                    joins: vec![
                        Join::raw("left join menus_user m on m.user_id = u.id", []),
                        Join::on(
                            JoinType::Inner,
                            "menu",
                            [Expression::expr("menu.id = m.menu_id", [])],
                        ),
                    ],
                }
                .into(),
            ],
        );
        assert_eq!(
            query.sql,
            r#"FROM "USER" "U" LEFT JOIN MENUS_USER M ON M.USER_ID = U.ID INNER JOIN "MENU" ON menu.id = m.menu_id"#
        );
    }

    #[test]
    fn group_by_having() {
        let query = render(
            None,
            &["GROUP BY"],
            vec![
                GroupBy {
                    columns: vec!["role_code".into()],
                    having: vec![Expression::expr("count(*) > ?", [Value::from(1)])],
                }
                .into(),
            ],
        );
        assert_eq!(query.sql, r#"GROUP BY "ROLE_CODE" HAVING COUNT(*) > ?"#);
    }

    #[test]
    fn order_by_primary_key() {
        let schema = user(&Dm8Namer);
        let query = render(
            Some(&schema),
            &["ORDER BY"],
            vec![
                OrderBy::new([
                    OrderByColumn::asc(Column::primary_key()),
                    OrderByColumn::desc("name"),
                ])
                .into(),
            ],
        );
        assert_eq!(query.sql, r#"ORDER BY "ID","NAME" DESC"#);
    }

    #[test]
    fn insert_without_on_conflict() {
        let schema = user(&Dm8Namer);
        let query = render(
            Some(&schema),
            CREATE_CLAUSES,
            vec![
                Insert::default().into(),
                Values {
                    columns: vec!["name".into(), "phone".into()],
                    rows: vec![vec![Some("a".into()), None]],
                }
                .into(),
                OnConflict {
                    do_nothing: true,
                    ..Default::default()
                }
                .into(),
            ],
        );
        assert_eq!(
            query.sql,
            r#"INSERT INTO "USER" ("NAME","PHONE") VALUES (?,DEFAULT)"#
        );
    }

    #[test]
    fn explain_quotes_with_apostrophes() {
        assert_eq!(
            DIALECT.explain(
                "SELECT * FROM T WHERE A = ? AND B = ?",
                &[Value::from("it's"), Value::from(3)]
            ),
            "SELECT * FROM T WHERE A = 'it''s' AND B = 3"
        );
    }
}
