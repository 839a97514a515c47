use diesel::RunQueryDsl;
use diesel::sql_types::{BigInt, Integer};

mod common;

#[derive(diesel::QueryableByName)]
struct Pragma {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

#[derive(diesel::QueryableByName)]
struct RowCount {
    #[diesel(sql_type = BigInt)]
    count: i64,
}

#[test]
fn pooled_connections_enforce_foreign_keys() {
    let test_db = common::TestDb::new("pragmas.db");
    let mut conn = test_db.pool().get().unwrap();
    let pragma: Pragma = diesel::sql_query("PRAGMA foreign_keys")
        .get_result(&mut conn)
        .unwrap();
    assert_eq!(pragma.foreign_keys, 1);
}

#[test]
fn migrations_create_every_table() {
    let test_db = common::TestDb::new("tables.db");
    let mut conn = test_db.pool().get().unwrap();
    for table in ["profiles", "customers", "payments", "followups"] {
        let rows: RowCount = diesel::sql_query(format!("SELECT COUNT(*) AS count FROM {table}"))
            .get_result(&mut conn)
            .unwrap();
        assert_eq!(rows.count, 0, "{table} should start empty");
    }
}
