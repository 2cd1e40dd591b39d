use rusqlite::Connection;
use std::time::{SystemTime, UNIX_EPOCH};
use vehicle_core::db::open_db_in_memory;
use vehicle_core::{
    Filter, FilterError, MemoryVehicleRepository, NewVehicle, Repository,
    SqliteVehicleRepository, Vehicle, VehicleField, VehiclePatch,
};

fn seed<R: Repository<Model = Vehicle, Create = NewVehicle>>(repo: &R) {
    repo.create(&NewVehicle::new("A", 2020).driveable(true)).unwrap();
    repo.create(&NewVehicle::new("B", 2020)).unwrap();
    repo.create(&NewVehicle::new("C", 2019).driveable(true)).unwrap();
}

fn names<R: Repository<Model = Vehicle>>(repo: &R, filter: &Filter<VehicleField>) -> Vec<String> {
    repo.list(filter)
        .unwrap()
        .into_iter()
        .map(|vehicle| vehicle.name)
        .collect()
}

fn now_ms() -> i64 {
    let elapsed = SystemTime::now().duration_since(UNIX_EPOCH).unwrap();
    i64::try_from(elapsed.as_millis()).unwrap()
}

fn sqlite_conn() -> Connection {
    open_db_in_memory().unwrap()
}

#[test]
fn mistyped_filter_values_are_rejected_before_any_engine() {
    let err = Filter::new()
        .with(VehicleField::IsDriveable, 1)
        .unwrap_err();
    assert_eq!(
        err,
        FilterError::InvalidValue {
            field: "is_driveable",
            value: "1".to_string(),
            expected: "boolean",
        }
    );

    let err = Filter::new()
        .with(VehicleField::ManufacturingYear, "2020")
        .unwrap_err();
    assert!(matches!(
        err,
        FilterError::InvalidValue {
            field: "manufacturing_year",
            expected: "integer",
            ..
        }
    ));

    assert!(Filter::new().with(VehicleField::Name, 2020).is_err());
}

#[test]
fn well_typed_filters_match_the_same_rows_on_both_engines() {
    let conn = sqlite_conn();
    let sqlite = SqliteVehicleRepository::try_new(&conn).unwrap();
    let memory = MemoryVehicleRepository::new();
    seed(&sqlite);
    seed(&memory);

    let filters = [
        Filter::new(),
        Filter::new().with(VehicleField::IsDriveable, true).unwrap(),
        Filter::new().with(VehicleField::IsDriveable, false).unwrap(),
        Filter::new()
            .with(VehicleField::ManufacturingYear, 2020)
            .unwrap(),
        Filter::new()
            .with(VehicleField::ManufacturingYear, 2020)
            .and_then(|filter| filter.with(VehicleField::IsDriveable, true))
            .unwrap(),
        Filter::new().with(VehicleField::Name, "C").unwrap(),
        Filter::parse([("is_driveable", "yes"), ("manufacturing_year", "2019")]).unwrap(),
    ];
    for filter in &filters {
        assert_eq!(names(&sqlite, filter), names(&memory, filter), "{filter:?}");
    }

    let year_2020 = Filter::new()
        .with(VehicleField::ManufacturingYear, 2020)
        .unwrap();
    assert_eq!(names(&sqlite, &year_2020), vec!["A", "B"]);
}

#[test]
fn timestamps_use_milliseconds_on_both_engines() {
    let conn = sqlite_conn();
    let sqlite = SqliteVehicleRepository::try_new(&conn).unwrap();
    let memory = MemoryVehicleRepository::new();
    let patch = VehiclePatch {
        name: Some("Renamed".to_string()),
        ..VehiclePatch::default()
    };

    let before = now_ms();
    let from_sqlite = sqlite.create(&NewVehicle::new("S", 2010)).unwrap();
    let from_memory = memory.create(&NewVehicle::new("M", 2010)).unwrap();
    let updated_sqlite = sqlite.update(from_sqlite.id, &patch).unwrap();
    let updated_memory = memory.update(from_memory.id, &patch).unwrap();
    let after = now_ms();

    for stamp in [
        from_sqlite.created_at,
        from_memory.created_at,
        updated_sqlite.updated_at.unwrap(),
        updated_memory.updated_at.unwrap(),
    ] {
        assert!(
            (before..=after).contains(&stamp),
            "{stamp} outside {before}..={after}"
        );
    }
}
