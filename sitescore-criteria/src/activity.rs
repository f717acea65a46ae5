//! Activity balance: nearby amenities minus undesirable land uses.

use std::collections::BTreeMap;

use serde::Serialize;
use sitescore_core::geo_math::{DegreeWindow, grid_degree_miles, haversine_miles};
use sitescore_core::{
    AmenityCategory, AmenityGroup, Assessment, Criterion, CriterionKind, EvaluationError,
    ReferenceStore, Site,
};

/// Radius of the amenity search, in grid-degree miles.
pub const SEARCH_RADIUS_MILES: f64 = 5.0;
/// A grocery store this close lifts the food-desert deduction.
pub const GROCERY_RADIUS_MILES: f64 = 0.25;
/// Undesirable sites this close are deducted.
pub const UNDESIRABLE_RADIUS_MILES: f64 = 0.25;
/// Points deducted for an unserved food desert.
pub const FOOD_DESERT_DEDUCTION: f64 = 2.0;
/// Points deducted per nearby undesirable site.
pub const UNDESIRABLE_DEDUCTION: f64 = 2.0;

/// The nearest amenity of one category and its award.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AmenityAward {
    /// Amenity category.
    pub category: AmenityCategory,
    /// Grid-degree distance to the nearest amenity of the category.
    pub distance_miles: f64,
    /// Points awarded.
    pub points: f64,
}

/// How an activity-balance score was reached.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActivityDetail {
    /// Whether the site lies in the rural area.
    pub is_rural: bool,
    /// One entry per category present within the search radius.
    pub amenities: Vec<AmenityAward>,
    /// Sum of the amenity awards.
    pub desirable_score: f64,
    /// Great-circle distance to the nearest grocery store.
    pub nearest_grocery_miles: Option<f64>,
    /// Current-vintage tract containing the site.
    pub tract_id: Option<String>,
    /// Whether that tract is flagged low-income, low-access.
    pub food_desert: bool,
    /// Food-desert deduction applied.
    pub food_desert_deduction: f64,
    /// Undesirable sites within [`UNDESIRABLE_RADIUS_MILES`].
    pub undesirable_count: u32,
    /// Undesirable deduction applied.
    pub undesirable_deduction: f64,
}

/// Scores the balance of desirable and undesirable activities near a site.
///
/// Amenities are measured with the grid-degree model, so diagonal neighbours
/// read slightly further away than their great-circle distance.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActivityBalance;

impl ActivityBalance {
    /// Construct the evaluator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn nearest_amenities(site: &Site, store: &ReferenceStore) -> BTreeMap<AmenityCategory, f64> {
        let origin = site.coord();
        let window = DegreeWindow::around(origin, SEARCH_RADIUS_MILES);
        let mut nearest: BTreeMap<AmenityCategory, f64> = BTreeMap::new();
        for amenity in store.amenities().within(&window) {
            let distance = grid_degree_miles(origin, amenity.location);
            if distance.is_nan() || distance > SEARCH_RADIUS_MILES {
                continue;
            }
            nearest
                .entry(amenity.category)
                .and_modify(|best| *best = best.min(distance))
                .or_insert(distance);
        }
        nearest
    }

    fn nearest_grocery(site: &Site, store: &ReferenceStore) -> Option<f64> {
        store
            .amenities()
            .of_category(AmenityCategory::GroceryStore)
            .map(|grocery| haversine_miles(site.coord(), grocery.location))
            .filter(|distance| !distance.is_nan())
            .reduce(f64::min)
    }

    fn undesirable_count(site: &Site, store: &ReferenceStore) -> u32 {
        store
            .undesirable_sites()
            .iter()
            .filter(|undesirable| {
                haversine_miles(site.coord(), undesirable.location) <= UNDESIRABLE_RADIUS_MILES
            })
            .fold(0_u32, |count, _| count.saturating_add(1))
    }
}

fn amenity_points(distance: f64, group: AmenityGroup, is_rural: bool) -> f64 {
    let (near, walkable, metro, rural) = match group {
        AmenityGroup::One => (2.5, 2.0, 1.5, 2.5),
        AmenityGroup::Two => (2.0, 1.5, 1.0, 1.0),
    };
    if distance <= 0.55 {
        near
    } else if distance <= 1.05 {
        walkable
    } else if !is_rural && distance <= 1.5 {
        metro
    } else if is_rural && distance <= 2.5 {
        rural
    } else {
        0.0
    }
}

impl Criterion for ActivityBalance {
    type Detail = ActivityDetail;

    fn kind(&self) -> CriterionKind {
        CriterionKind::ActivityBalance
    }

    #[expect(
        clippy::float_arithmetic,
        reason = "awards and deductions are summed as floating-point points"
    )]
    fn evaluate(
        &self,
        site: &Site,
        store: &ReferenceStore,
    ) -> Result<Assessment<ActivityDetail>, EvaluationError> {
        let is_rural = store
            .rural_boundary()
            .is_some_and(|boundary| boundary.contains(site.coord()));

        let amenities: Vec<AmenityAward> = Self::nearest_amenities(site, store)
            .into_iter()
            .map(|(category, distance_miles)| AmenityAward {
                category,
                distance_miles,
                points: amenity_points(distance_miles, category.group(), is_rural),
            })
            .collect();
        let desirable_score: f64 = amenities.iter().map(|award| award.points).sum();

        let nearest_grocery_miles = Self::nearest_grocery(site, store);
        let grocery_nearby = nearest_grocery_miles.is_some_and(|d| d <= GROCERY_RADIUS_MILES);
        let tract_id = store
            .current_tracts()
            .containing(site.coord())
            .map(|tract| tract.geoid.clone());
        let food_desert = match tract_id.as_deref() {
            Some(id) => store.food_access().is_food_desert(id).unwrap_or(false),
            None => {
                log::debug!(
                    "no current tract contains ({}, {}); skipping food-desert check",
                    site.latitude(),
                    site.longitude()
                );
                false
            }
        };
        let food_desert_deduction = if food_desert && !grocery_nearby {
            FOOD_DESERT_DEDUCTION
        } else {
            0.0
        };

        let undesirable_count = Self::undesirable_count(site, store);
        let undesirable_deduction = f64::from(undesirable_count) * UNDESIRABLE_DEDUCTION;

        let max = self.kind().max_score();
        let deductions = food_desert_deduction + undesirable_deduction;
        let score = (desirable_score - deductions).clamp(0.0, max);
        let detail = ActivityDetail {
            is_rural,
            amenities,
            desirable_score,
            nearest_grocery_miles,
            tract_id,
            food_desert,
            food_desert_deduction,
            undesirable_count,
            undesirable_deduction,
        };
        Assessment::checked(self.kind(), score, detail)
    }
}
