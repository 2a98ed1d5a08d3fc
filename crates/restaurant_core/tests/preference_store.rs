use restaurant_core::db::migrations::latest_version;
use restaurant_core::db::{open_db, open_db_in_memory, DbError};
use restaurant_core::{PrefError, PreferenceStore, SqlitePreferenceStore};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv_store");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = SqlitePreferenceStore::open(&path).err().expect("store must refuse newer schema");
    assert!(matches!(err, PrefError::Db(DbError::UnsupportedSchemaVersion { .. })));
}

#[tokio::test]
async fn overrides_survive_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.db");

    {
        let store = SqlitePreferenceStore::open(&path).unwrap();
        store.set("restaurant-showReviews-a", "false").await.unwrap();
        store.set("restaurant-showReviews-b", "true").await.unwrap();
        store.remove("restaurant-showReviews-b").await.unwrap();
    }

    let reopened = SqlitePreferenceStore::open(&path).unwrap();
    assert_eq!(
        reopened.get("restaurant-showReviews-a").await.unwrap().as_deref(),
        Some("false")
    );
    assert_eq!(reopened.get("restaurant-showReviews-b").await.unwrap(), None);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
