//! Behavioural tests for walking-distance providers.
//!
//! Most scenarios use [`StubNetworkDistanceProvider`] so no OSRM service is
//! required; one exercises [`HttpNetworkDistanceProvider`] against an address
//! nothing listens on.

use std::cell::RefCell;
use std::sync::Arc;
use std::time::Duration;

use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use sitescore_core::{NetworkDistanceProvider, RoutingError};
use sitescore_data::routing::test_support::StubNetworkDistanceProvider;
use sitescore_data::{HttpNetworkDistanceConfig, HttpNetworkDistanceProvider};

/// Provider under test.
type ProviderCell = RefCell<Option<Box<dyn NetworkDistanceProvider>>>;

/// Result cell holding the outcome of a distance request.
type ResultCell = RefCell<Option<Result<f64, RoutingError>>>;

/// Stub kept alongside the boxed provider so call counts can be read.
type StubCell = RefCell<Option<Arc<StubNetworkDistanceProvider>>>;

const SITE: Coord<f64> = Coord {
    x: -84.39,
    y: 33.75,
};

const STOP: Coord<f64> = Coord {
    x: -84.388,
    y: 33.752,
};

struct Shared(Arc<StubNetworkDistanceProvider>);

impl NetworkDistanceProvider for Shared {
    fn walking_distance(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<f64, RoutingError> {
        self.0.walking_distance(origin, destination)
    }
}

#[fixture]
fn provider() -> ProviderCell {
    RefCell::new(None)
}

#[fixture]
fn stub() -> StubCell {
    RefCell::new(None)
}

#[fixture]
fn result() -> ResultCell {
    RefCell::new(None)
}

fn install(provider: &ProviderCell, stub: &StubCell, double: StubNetworkDistanceProvider) {
    let shared = Arc::new(double);
    *stub.borrow_mut() = Some(Arc::clone(&shared));
    *provider.borrow_mut() = Some(Box::new(Shared(shared)));
}

// --- Given steps ---

#[given("a routing service returning 0.4 miles")]
fn service_ok(#[from(provider)] provider: &ProviderCell, #[from(stub)] stub: &StubCell) {
    install(provider, stub, StubNetworkDistanceProvider::with_miles(0.4));
}

#[given("a routing service that times out")]
fn service_timeout(#[from(provider)] provider: &ProviderCell, #[from(stub)] stub: &StubCell) {
    install(
        provider,
        stub,
        StubNetworkDistanceProvider::with_error(RoutingError::Timeout {
            url: "http://example.com/route/v1/foot".to_string(),
            timeout_secs: 5,
        }),
    );
}

#[given("a routing service that finds no route")]
fn service_no_route(#[from(provider)] provider: &ProviderCell, #[from(stub)] stub: &StubCell) {
    install(
        provider,
        stub,
        StubNetworkDistanceProvider::with_error(RoutingError::NoRoute),
    );
}

#[given("an HTTP provider pointed at an unreachable service")]
fn unreachable_service(#[from(provider)] provider: &ProviderCell) {
    let config = HttpNetworkDistanceConfig::new("http://127.0.0.1:9")
        .with_timeout(Duration::from_millis(500));
    let http = HttpNetworkDistanceProvider::with_config(config).expect("provider should build");
    *provider.borrow_mut() = Some(Box::new(http));
}

// --- When steps ---

#[when("I request the walking distance to a nearby stop")]
fn request(#[from(provider)] provider: &ProviderCell, #[from(result)] result: &ResultCell) {
    let guard = provider.borrow();
    let current = guard.as_ref().expect("provider must be initialised");
    *result.borrow_mut() = Some(current.walking_distance(SITE, STOP));
}

// --- Then steps ---

#[then("0.4 miles is returned")]
fn then_distance(#[from(result)] result: &ResultCell) {
    let borrowed = result.borrow();
    assert_eq!(*borrowed, Some(Ok(0.4)));
}

#[then("the service was queried once")]
fn then_once(#[from(stub)] stub: &StubCell) {
    let borrowed = stub.borrow();
    let double = borrowed.as_ref().expect("stub installed");
    assert_eq!(double.calls(), 1);
}

#[then("a timeout error is returned")]
fn then_timeout(#[from(result)] result: &ResultCell) {
    let borrowed = result.borrow();
    assert!(
        matches!(&*borrowed, Some(Err(RoutingError::Timeout { .. }))),
        "expected Timeout error, got {borrowed:?}"
    );
}

#[then("a no-route error is returned")]
fn then_no_route(#[from(result)] result: &ResultCell) {
    let borrowed = result.borrow();
    assert_eq!(*borrowed, Some(Err(RoutingError::NoRoute)));
}

#[then("a transport error is returned")]
fn then_transport(#[from(result)] result: &ResultCell) {
    let borrowed = result.borrow();
    assert!(
        matches!(
            &*borrowed,
            Some(Err(RoutingError::Network { .. } | RoutingError::Timeout { .. }))
        ),
        "expected a transport error, got {borrowed:?}"
    );
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/walking_distance.feature", name = $title)]
        fn $fn_name(provider: ProviderCell, stub: StubCell, result: ResultCell) {
            let _ = (provider, stub, result);
        }
    };
}

register_scenario!(returning_a_distance, "returning a walking distance");
register_scenario!(handling_timeout, "handling a timeout");
register_scenario!(handling_missing_route, "handling a missing route");
register_scenario!(
    handling_unreachable_service,
    "handling an unreachable routing service"
);
