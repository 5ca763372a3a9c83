use galavisor_core::db::open_db_in_memory;
use galavisor_core::{
    Activity, ActivityService, ActivityServiceError, ActivityStore, ActivityValidationError,
    NewPlanet, PlanetRepository, SqliteActivityRepository, SqlitePlanetRepository,
};
use rusqlite::Connection;

/// Opens an in-memory catalogue with the planets these tests link to.
fn open_catalogue() -> Connection {
    let conn = open_db_in_memory().unwrap();
    let planets = SqlitePlanetRepository::try_new(&conn).unwrap();
    for name in ["Mars", "Venus", "Europa", "Pluto"] {
        planets.insert_planet(&NewPlanet::new(name)).unwrap();
    }
    conn
}

fn service(conn: &Connection) -> ActivityService<SqliteActivityRepository<'_>> {
    ActivityService::new(SqliteActivityRepository::try_new(conn).unwrap())
}

fn link_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM planet_activities;", [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn add_activity_is_insert_or_fetch() {
    let conn = open_catalogue();
    let service = service(&conn);

    let first = service.add_activity("Hiking", None).unwrap();
    let second = service.add_activity("Hiking", None).unwrap();

    assert!(first.is_newly_created);
    assert!(!second.is_newly_created);
    assert_eq!(first.activity.name, "Hiking");
    assert_eq!(second.activity.name, "Hiking");
    assert_eq!(service.get_all_activities().unwrap().len(), 1);
}

#[test]
fn add_activity_never_changes_existing_link() {
    let conn = open_catalogue();
    let service = service(&conn);
    service.add_activity("Hiking", Some("Mars")).unwrap();

    let again = service.add_activity("Hiking", Some("Venus")).unwrap();

    assert!(!again.is_newly_created);
    assert_eq!(again.activity, Activity::linked("Hiking", "Mars"));
    assert!(service.get_activities_by_planet("Venus").unwrap().is_empty());
}

#[test]
fn add_activity_with_empty_planet_creates_unlinked_activity() {
    let conn = open_catalogue();
    let service = service(&conn);

    let outcome = service.add_activity("Stargazing", Some("")).unwrap();

    assert!(outcome.is_newly_created);
    assert_eq!(outcome.activity.planet_name, None);
    assert_eq!(link_count(&conn), 0);
}

#[test]
fn add_activity_names_are_case_sensitive() {
    let conn = open_catalogue();
    let service = service(&conn);

    assert!(service.add_activity("Hiking", None).unwrap().is_newly_created);
    assert!(service.add_activity("hiking", None).unwrap().is_newly_created);
    assert_eq!(service.get_all_activities().unwrap().len(), 2);
}

#[test]
fn linking_same_pair_twice_is_idempotent() {
    let conn = open_catalogue();
    let service = service(&conn);
    service.add_activity("Hiking", None).unwrap();

    let first = service.link_activity_to_planet("Hiking", "Mars").unwrap();
    let second = service.link_activity_to_planet("Hiking", "Mars").unwrap();

    assert!(first.is_newly_linked);
    assert!(!second.is_newly_linked);
    assert_eq!(second.activity, Activity::linked("Hiking", "Mars"));
    assert_eq!(link_count(&conn), 1);
}

#[test]
fn relinking_moves_activity_to_new_planet() {
    let conn = open_catalogue();
    let service = service(&conn);
    service.add_activity("Hiking", None).unwrap();

    let to_mars = service.link_activity_to_planet("Hiking", "Mars").unwrap();
    let to_venus = service.link_activity_to_planet("Hiking", "Venus").unwrap();

    assert!(to_mars.is_newly_linked);
    assert!(to_venus.is_newly_linked);
    let repo = SqliteActivityRepository::try_new(&conn).unwrap();
    assert_eq!(
        repo.find_by_name("Hiking").unwrap(),
        Some(Activity::linked("Hiking", "Venus"))
    );
    assert!(service.get_activities_by_planet("Mars").unwrap().is_empty());
    assert_eq!(link_count(&conn), 1);
}

#[test]
fn linking_missing_activity_is_not_found_and_creates_nothing() {
    let conn = open_catalogue();
    let service = service(&conn);

    let err = service
        .link_activity_to_planet("Ghost", "Mars")
        .unwrap_err();

    assert!(matches!(err, ActivityServiceError::ActivityNotFound(name) if name == "Ghost"));
    assert!(service.get_all_activities().unwrap().is_empty());
}

#[test]
fn linking_requires_both_names() {
    let conn = open_catalogue();
    let service = service(&conn);
    service.add_activity("Hiking", None).unwrap();

    let err = service.link_activity_to_planet("", "Mars").unwrap_err();
    assert!(matches!(
        err,
        ActivityServiceError::Validation(ActivityValidationError::BlankName)
    ));
    let err = service.link_activity_to_planet("Hiking", "  ").unwrap_err();
    assert!(matches!(
        err,
        ActivityServiceError::Validation(ActivityValidationError::BlankPlanetName)
    ));
    assert_eq!(link_count(&conn), 0);
}

#[test]
fn linking_to_unknown_planet_is_planet_not_found_and_keeps_link() {
    let conn = open_catalogue();
    let service = service(&conn);
    service.add_activity("Hiking", Some("Mars")).unwrap();

    let err = service
        .link_activity_to_planet("Hiking", "Vulcan")
        .unwrap_err();

    assert!(matches!(err, ActivityServiceError::PlanetNotFound(name) if name == "Vulcan"));
    assert_eq!(
        service.get_all_activities().unwrap(),
        vec![Activity::linked("Hiking", "Mars")]
    );
}

#[test]
fn adding_activity_on_unknown_planet_creates_nothing() {
    let conn = open_catalogue();
    let service = service(&conn);

    let err = service.add_activity("Hiking", Some("Vulcan")).unwrap_err();

    assert!(matches!(err, ActivityServiceError::PlanetNotFound(name) if name == "Vulcan"));
    assert!(service.get_all_activities().unwrap().is_empty());
    assert_eq!(link_count(&conn), 0);
}

#[test]
fn rename_missing_activity_returns_false_and_leaves_store_untouched() {
    let conn = open_catalogue();
    let service = service(&conn);
    service.add_activity("Hiking", Some("Mars")).unwrap();
    let before = service.get_all_activities().unwrap();

    assert!(!service.update_activity("Ghost", "X").unwrap());
    assert_eq!(service.get_all_activities().unwrap(), before);
}

#[test]
fn rename_keeps_planet_link() {
    let conn = open_catalogue();
    let service = service(&conn);
    service.add_activity("Hiking", Some("Mars")).unwrap();

    assert!(service.update_activity("Hiking", "Trekking").unwrap());

    assert_eq!(
        service.get_activities_by_planet("Mars").unwrap(),
        vec![Activity::linked("Trekking", "Mars")]
    );
}

#[test]
fn rename_onto_existing_name_is_rejected_and_changes_nothing() {
    let conn = open_catalogue();
    let service = service(&conn);
    service.add_activity("Hiking", Some("Mars")).unwrap();
    service.add_activity("Swimming", Some("Europa")).unwrap();

    let err = service.update_activity("Hiking", "Swimming").unwrap_err();

    assert!(matches!(err, ActivityServiceError::NameConflict(name) if name == "Swimming"));
    assert_eq!(
        service.get_all_activities().unwrap(),
        vec![
            Activity::linked("Hiking", "Mars"),
            Activity::linked("Swimming", "Europa"),
        ]
    );
}

#[test]
fn rename_to_same_name_succeeds_without_change() {
    let conn = open_catalogue();
    let service = service(&conn);
    service.add_activity("Hiking", None).unwrap();

    assert!(service.update_activity("Hiking", "Hiking").unwrap());
    assert!(!service.update_activity("Ghost", "Ghost").unwrap());
}

#[test]
fn rename_to_blank_name_is_validation_error() {
    let conn = open_catalogue();
    let service = service(&conn);
    service.add_activity("Hiking", None).unwrap();

    let err = service.update_activity("Hiking", " ").unwrap_err();
    assert!(matches!(err, ActivityServiceError::Validation(_)));
}

#[test]
fn delete_removes_activity_and_link() {
    let conn = open_catalogue();
    let service = service(&conn);
    service.add_activity("Hiking", Some("Mars")).unwrap();
    service.add_activity("Swimming", None).unwrap();

    assert!(service.delete_activity("Hiking").unwrap());

    let remaining = service.get_all_activities().unwrap();
    assert!(remaining.iter().all(|activity| activity.name != "Hiking"));
    assert_eq!(remaining.len(), 1);
    assert_eq!(link_count(&conn), 0);
}

#[test]
fn delete_missing_activity_returns_false() {
    let conn = open_catalogue();
    let service = service(&conn);

    assert!(!service.delete_activity("Ghost").unwrap());
}

#[test]
fn activities_by_planet_lists_only_linked_rows_in_name_order() {
    let conn = open_catalogue();
    let service = service(&conn);
    service.add_activity("Swimming", Some("Mars")).unwrap();
    service.add_activity("Hiking", Some("Mars")).unwrap();
    service.add_activity("Skiing", Some("Pluto")).unwrap();
    service.add_activity("Reading", None).unwrap();

    let on_mars = service.get_activities_by_planet("Mars").unwrap();
    assert_eq!(
        on_mars,
        vec![
            Activity::linked("Hiking", "Mars"),
            Activity::linked("Swimming", "Mars"),
        ]
    );
    assert!(service.get_activities_by_planet("Venus").unwrap().is_empty());
    assert_eq!(service.get_all_activities().unwrap().len(), 4);
}
