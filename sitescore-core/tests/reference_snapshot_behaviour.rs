//! Behavioural tests for persisting prepared reference data.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

use geo::{Coord, LineString, MultiPolygon, Polygon};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use sitescore_core::{
    Amenity, AmenityCategory, CensusTract, FoodAccessRecord, GradeCluster, IndicatorFlags,
    IndicatorRecord, LayerSchema, ReferenceData, ReferenceStore, SchoolBoundaryLayer,
    SchoolRecord, SchoolZone, SnapshotError, TransitStop, load_reference_snapshot,
    write_reference_snapshot,
};
use tempfile::TempDir;

fn unit_square(min_x: f64, min_y: f64) -> MultiPolygon<f64> {
    MultiPolygon::new(vec![Polygon::new(
        LineString::from(vec![
            (min_x, min_y),
            (min_x + 1.0, min_y),
            (min_x + 1.0, min_y + 1.0),
            (min_x, min_y + 1.0),
            (min_x, min_y),
        ]),
        vec![],
    )])
}

/// Temporary directory holding the snapshot.
#[fixture]
pub fn workspace() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("create temporary directory: {err}"),
    }
}

/// Bundle written in the scenario.
#[fixture]
pub fn bundle() -> RefCell<ReferenceData> {
    RefCell::new(ReferenceData::default())
}

/// Path of the file under test.
#[fixture]
pub fn snapshot_path() -> RefCell<Option<PathBuf>> {
    RefCell::new(None)
}

/// Outcome of the last load.
#[fixture]
pub fn loaded() -> RefCell<Option<Result<ReferenceData, SnapshotError>>> {
    RefCell::new(None)
}

#[given("a reference bundle with transit, amenities, tracts and schools")]
fn given_bundle(#[from(bundle)] bundle: &RefCell<ReferenceData>) {
    let zone_attributes = HashMap::from([(String::from("ELEMENTARY"), String::from("Oak"))]);
    *bundle.borrow_mut() = ReferenceData {
        transit_stops: vec![TransitStop::new(Coord { x: -84.39, y: 33.75 }, true)],
        amenities: vec![Amenity::new(
            Coord { x: -84.38, y: 33.74 },
            AmenityCategory::GroceryStore,
        )],
        food_access: vec![FoodAccessRecord::from_raw("1", "1")],
        current_tracts: vec![CensusTract::new("1", unit_square(-85.0, 33.0))],
        school_layers: vec![SchoolBoundaryLayer::new(
            LayerSchema::administrative(),
            vec![SchoolZone::new(unit_square(-85.0, 33.0), zone_attributes)],
        )],
        schools: vec![
            SchoolRecord::new("Oak Elementary", GradeCluster::Elementary)
                .with_performance(2018, 81.0)
                .with_designation("Beating the Odds"),
        ],
        indicators: vec![IndicatorRecord::new(
            "1",
            IndicatorFlags::new([true, false, true, false, false]),
        )],
        ..ReferenceData::default()
    };
}

#[given("a file that starts with a foreign header")]
fn given_foreign_file(
    #[from(workspace)] workspace: &TempDir,
    #[from(snapshot_path)] snapshot_path: &RefCell<Option<PathBuf>>,
) {
    let path = workspace.path().join("foreign.bin");
    std::fs::write(&path, b"WSPI\x02\x00payload").expect("write foreign file");
    *snapshot_path.borrow_mut() = Some(path);
}

#[when("I write the bundle to a snapshot and load it back")]
fn write_and_load(
    #[from(workspace)] workspace: &TempDir,
    #[from(bundle)] bundle: &RefCell<ReferenceData>,
    #[from(loaded)] loaded: &RefCell<Option<Result<ReferenceData, SnapshotError>>>,
) {
    let path = workspace.path().join("reference.ssrd");
    write_reference_snapshot(&path, &bundle.borrow()).expect("write snapshot");
    *loaded.borrow_mut() = Some(load_reference_snapshot(&path));
}

#[when("I load the file as a snapshot")]
fn load_file(
    #[from(snapshot_path)] snapshot_path: &RefCell<Option<PathBuf>>,
    #[from(loaded)] loaded: &RefCell<Option<Result<ReferenceData, SnapshotError>>>,
) {
    let path = snapshot_path.borrow().clone().expect("path set");
    *loaded.borrow_mut() = Some(load_reference_snapshot(&path));
}

#[then("the loaded bundle equals the original")]
fn then_equal(
    #[from(bundle)] bundle: &RefCell<ReferenceData>,
    #[from(loaded)] loaded: &RefCell<Option<Result<ReferenceData, SnapshotError>>>,
) {
    let borrow = loaded.borrow();
    let data = borrow
        .as_ref()
        .expect("load attempted")
        .as_ref()
        .expect("snapshot loads");
    assert_eq!(*data, *bundle.borrow());
}

#[then("the loaded bundle builds a reference store")]
fn then_store(#[from(loaded)] loaded: &RefCell<Option<Result<ReferenceData, SnapshotError>>>) {
    let data = loaded
        .borrow_mut()
        .take()
        .expect("load attempted")
        .expect("snapshot loads");
    let store = ReferenceStore::new(data).expect("store builds");
    assert_eq!(store.transit_stops().len(), 1);
    assert_eq!(store.food_access().is_food_desert("1"), Some(true));
}

#[then("the load fails with an invalid magic error")]
fn then_invalid_magic(
    #[from(loaded)] loaded: &RefCell<Option<Result<ReferenceData, SnapshotError>>>,
) {
    let borrow = loaded.borrow();
    let outcome = borrow.as_ref().expect("load attempted");
    assert!(matches!(outcome, Err(SnapshotError::InvalidMagic { .. })));
}

#[scenario(path = "tests/features/reference_snapshot.feature", index = 0)]
fn scenario_round_trip(
    workspace: TempDir,
    bundle: RefCell<ReferenceData>,
    snapshot_path: RefCell<Option<PathBuf>>,
    loaded: RefCell<Option<Result<ReferenceData, SnapshotError>>>,
) {
    let _ = (workspace, bundle, snapshot_path, loaded);
}

#[scenario(path = "tests/features/reference_snapshot.feature", index = 1)]
fn scenario_foreign_header(
    workspace: TempDir,
    bundle: RefCell<ReferenceData>,
    snapshot_path: RefCell<Option<PathBuf>>,
    loaded: RefCell<Option<Result<ReferenceData, SnapshotError>>>,
) {
    let _ = (workspace, bundle, snapshot_path, loaded);
}
