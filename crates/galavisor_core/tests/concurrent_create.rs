use galavisor_core::db::open_db;
use galavisor_core::{ActivityService, SqliteActivityRepository};
use std::path::Path;
use std::sync::{Arc, Barrier};
use std::thread;

const WORKERS: usize = 2;

fn add_from_own_connection(path: &Path, name: &str, barrier: &Barrier) -> bool {
    let conn = open_db(path).unwrap();
    let service = ActivityService::new(SqliteActivityRepository::try_new(&conn).unwrap());
    barrier.wait();
    let outcome = service.add_activity(name, None).unwrap();
    assert_eq!(outcome.activity.name, name);
    outcome.is_newly_created
}

#[test]
fn concurrent_adds_store_one_row_and_report_at_most_one_creation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("race.db");
    // Migrate once so workers only open, never migrate.
    drop(open_db(&path).unwrap());

    for round in 0..10 {
        let name = format!("Crater Diving {round}");
        let barrier = Arc::new(Barrier::new(WORKERS));

        let handles = (0..WORKERS)
            .map(|_| {
                let path = path.clone();
                let name = name.clone();
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || add_from_own_connection(&path, &name, &barrier))
            })
            .collect::<Vec<_>>();

        let created = handles
            .into_iter()
            .map(|handle| handle.join().expect("worker should not panic"))
            .filter(|created| *created)
            .count();
        assert!(created <= 1, "round {round}: {created} workers created");

        let conn = open_db(&path).unwrap();
        let stored: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM activities WHERE name = ?1;",
                [name.as_str()],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(stored, 1, "round {round}");
    }
}
