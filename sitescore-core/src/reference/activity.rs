//! Desirable amenities, undesirable land uses and food-access records.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use geo::Coord;
use rstar::{AABB, RTree, RTreeObject};
use serde::{Deserialize, Serialize};

use super::ReferenceError;
use crate::geo_math::DegreeWindow;

/// Award tier an amenity category belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmenityGroup {
    /// Essential services, awarded the higher tier.
    One,
    /// Secondary services.
    Two,
}

/// The seventeen desirable amenity categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[expect(missing_docs, reason = "variant names are the category keys")]
pub enum AmenityCategory {
    NationalBigBoxStore,
    GroceryStore,
    Hospital,
    MedicalClinic,
    Pharmacy,
    School,
    TownSquare,
    CommunityCenter,
    PublicPark,
    Library,
    RetailStore,
    Restaurant,
    TechnicalCollege,
    FirePoliceStation,
    Bank,
    PlaceOfWorship,
    PostOffice,
}

impl AmenityCategory {
    /// Every category, Group 1 first.
    pub const ALL: [Self; 17] = [
        Self::NationalBigBoxStore,
        Self::GroceryStore,
        Self::Hospital,
        Self::MedicalClinic,
        Self::Pharmacy,
        Self::School,
        Self::TownSquare,
        Self::CommunityCenter,
        Self::PublicPark,
        Self::Library,
        Self::RetailStore,
        Self::Restaurant,
        Self::TechnicalCollege,
        Self::FirePoliceStation,
        Self::Bank,
        Self::PlaceOfWorship,
        Self::PostOffice,
    ];

    /// The award group of this category.
    #[must_use]
    pub const fn group(self) -> AmenityGroup {
        match self {
            Self::NationalBigBoxStore
            | Self::GroceryStore
            | Self::Hospital
            | Self::MedicalClinic
            | Self::Pharmacy
            | Self::School
            | Self::TownSquare
            | Self::CommunityCenter
            | Self::PublicPark
            | Self::Library => AmenityGroup::One,
            Self::RetailStore
            | Self::Restaurant
            | Self::TechnicalCollege
            | Self::FirePoliceStation
            | Self::Bank
            | Self::PlaceOfWorship
            | Self::PostOffice => AmenityGroup::Two,
        }
    }

    /// The `amenity_key` spelling of this category.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::NationalBigBoxStore => "national_big_box_store",
            Self::GroceryStore => "grocery_store",
            Self::Hospital => "hospital",
            Self::MedicalClinic => "medical_clinic",
            Self::Pharmacy => "pharmacy",
            Self::School => "school",
            Self::TownSquare => "town_square",
            Self::CommunityCenter => "community_center",
            Self::PublicPark => "public_park",
            Self::Library => "library",
            Self::RetailStore => "retail_store",
            Self::Restaurant => "restaurant",
            Self::TechnicalCollege => "technical_college",
            Self::FirePoliceStation => "fire_police_station",
            Self::Bank => "bank",
            Self::PlaceOfWorship => "place_of_worship",
            Self::PostOffice => "post_office",
        }
    }
}

impl fmt::Display for AmenityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for AmenityCategory {
    type Err = ReferenceError;

    /// Parse an `amenity_key`, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.key() == key)
            .ok_or_else(|| ReferenceError::UnknownAmenityCategory { key: s.to_owned() })
    }
}

/// A desirable amenity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Amenity {
    /// Amenity position.
    pub location: Coord<f64>,
    /// Category of the amenity.
    pub category: AmenityCategory,
}

impl Amenity {
    /// Construct an amenity.
    #[must_use]
    pub const fn new(location: Coord<f64>, category: AmenityCategory) -> Self {
        Self { location, category }
    }
}

impl RTreeObject for Amenity {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.location.x, self.location.y])
    }
}

/// R\*-tree over every desirable amenity.
#[derive(Debug, Clone, Default)]
pub struct AmenityIndex {
    tree: RTree<Amenity>,
}

impl AmenityIndex {
    /// Bulk-load the index.
    #[must_use]
    pub fn new(amenities: Vec<Amenity>) -> Self {
        Self {
            tree: RTree::bulk_load(amenities),
        }
    }

    /// Amenities inside `window`, edges included.
    pub fn within(&self, window: &DegreeWindow) -> impl Iterator<Item = &Amenity> + '_ {
        let envelope = window.envelope();
        self.tree.locate_in_envelope_intersecting(&envelope)
    }

    /// Every amenity of `category`, regardless of distance.
    pub fn of_category(&self, category: AmenityCategory) -> impl Iterator<Item = &Amenity> + '_ {
        self.tree.iter().filter(move |amenity| amenity.category == category)
    }

    /// Number of indexed amenities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Report whether the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

/// An undesirable land use such as a hazardous-waste or toxic-release site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UndesirableSite {
    /// Site position.
    pub location: Coord<f64>,
    /// Free-text activity label.
    pub activity: String,
}

impl UndesirableSite {
    /// Construct an undesirable site.
    #[must_use]
    pub fn new(location: Coord<f64>, activity: impl Into<String>) -> Self {
        Self {
            location,
            activity: activity.into(),
        }
    }
}

/// Low-income, low-access status of one census tract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodAccessRecord {
    /// Tract identifier, trimmed.
    pub tract_id: String,
    /// `Some(true)` when flagged, `None` when the raw value was unrecognised.
    pub low_access: Option<bool>,
}

impl FoodAccessRecord {
    /// Construct a record from a typed flag.
    #[must_use]
    pub fn new(tract_id: &str, low_access: Option<bool>) -> Self {
        Self {
            tract_id: tract_id.trim().to_owned(),
            low_access,
        }
    }

    /// Construct a record from the raw textual flag.
    ///
    /// # Examples
    /// ```
    /// use sitescore_core::FoodAccessRecord;
    ///
    /// let record = FoodAccessRecord::from_raw(" 13121001100 ", "1.0");
    /// assert_eq!(record.tract_id, "13121001100");
    /// assert_eq!(record.low_access, Some(true));
    /// ```
    #[must_use]
    pub fn from_raw(tract_id: &str, raw_flag: &str) -> Self {
        Self::new(tract_id, parse_food_desert_flag(raw_flag))
    }
}

/// Interpret a raw food-desert flag.
///
/// `1`, `1.0` and `true` are flagged; `0`, `0.0` and `false` are not. Any
/// other value is unknown.
#[must_use]
pub fn parse_food_desert_flag(raw: &str) -> Option<bool> {
    let value = raw.trim();
    if value.eq_ignore_ascii_case("true") {
        return Some(true);
    }
    if value.eq_ignore_ascii_case("false") {
        return Some(false);
    }
    match value.parse::<f64>() {
        Ok(number) if number == 1.0 => Some(true),
        Ok(number) if number == 0.0 => Some(false),
        _ => None,
    }
}

/// Food-access records keyed by trimmed tract identifier.
///
/// The first record for a tract wins.
#[derive(Debug, Clone, Default)]
pub struct FoodAccessTable {
    records: HashMap<String, Option<bool>>,
}

impl FoodAccessTable {
    /// Build the lookup table.
    #[must_use]
    pub fn new(records: Vec<FoodAccessRecord>) -> Self {
        let mut table = HashMap::with_capacity(records.len());
        for record in records {
            table
                .entry(record.tract_id.trim().to_owned())
                .or_insert(record.low_access);
        }
        Self { records: table }
    }

    /// Food-desert status of a tract.
    ///
    /// Returns `None` when the tract has no record. Unknown flags read as
    /// `Some(false)`.
    #[must_use]
    pub fn is_food_desert(&self, tract_id: &str) -> Option<bool> {
        self.records
            .get(tract_id.trim())
            .map(|flag| flag.unwrap_or(false))
    }

    /// Number of tracts with a record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Report whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
