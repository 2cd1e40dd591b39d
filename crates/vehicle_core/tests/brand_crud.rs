use vehicle_core::db::open_db_in_memory;
use vehicle_core::model::brand::BrandField;
use vehicle_core::{
    BrandPatch, Filter, NewBrand, RepoError, RepoErrorKind, Repository, SqliteBrandRepository,
};

#[test]
fn storage_assigns_increasing_integer_ids() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBrandRepository::try_new(&conn).unwrap();

    let audi = repo.create(&NewBrand::new("Audi")).unwrap();
    let hyundai = repo.create(&NewBrand::new("Hyundai")).unwrap();
    assert_eq!(audi.id, 1);
    assert_eq!(hyundai.id, 2);
    assert_eq!(repo.get(hyundai.id).unwrap().name, "Hyundai");
}

#[test]
fn ids_are_not_reused_after_delete() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBrandRepository::try_new(&conn).unwrap();

    let first = repo.create(&NewBrand::new("Saab")).unwrap();
    repo.delete(first.id).unwrap();
    let second = repo.create(&NewBrand::new("Volvo")).unwrap();
    assert!(second.id > first.id);
}

#[test]
fn duplicate_name_is_constraint_violation() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBrandRepository::try_new(&conn).unwrap();

    repo.create(&NewBrand::new("Skoda")).unwrap();
    let err = repo.create(&NewBrand::new("Skoda")).unwrap_err();
    assert_eq!(err.kind(), RepoErrorKind::ConstraintViolation);
    assert!(matches!(err, RepoError::ConstraintViolation(ref message) if message.contains("UNIQUE")));

    let other = repo.create(&NewBrand::new("Seat")).unwrap();
    let rename = BrandPatch {
        name: Some("Skoda".to_string()),
    };
    let err = repo.update(other.id, &rename).unwrap_err();
    assert_eq!(err.kind(), RepoErrorKind::ConstraintViolation);
    assert_eq!(repo.get(other.id).unwrap().name, "Seat");
}

#[test]
fn list_filters_by_name() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBrandRepository::try_new(&conn).unwrap();

    for name in ["Kia", "Mazda", "Opel"] {
        repo.create(&NewBrand::new(name)).unwrap();
    }

    let found = repo
        .list(&Filter::new().with(BrandField::Name, "Mazda").unwrap())
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, 2);
    assert_eq!(repo.list(&Filter::new()).unwrap().len(), 3);
}

#[test]
fn missing_brand_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBrandRepository::try_new(&conn).unwrap();

    match repo.delete(42).unwrap_err() {
        RepoError::NotFound { entity, id } => {
            assert_eq!(entity, "brand");
            assert_eq!(id, "42");
        }
        other => panic!("unexpected error: {other}"),
    }
}
