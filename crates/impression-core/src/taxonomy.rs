//! Impression map for the HoReCa niche (hotels, restaurants, cafes)
//!
//! Categories describe the main aspects of customer experience mentioned in
//! reviews. The taxonomy is closed: tags can only be built from the variants
//! below, and names coming from outside (stored records, manual submissions)
//! are parsed back through [`Category::from_name`] / [`Subcategory::from_name`].

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Top-level impression category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Service,
    Speed,
    Product,
    Price,
    Comfort,
    Process,
    /// Fallback when no specific aspect is recognised
    General,
}

impl Category {
    /// All categories in taxonomy order
    pub const ALL: [Category; 7] = [
        Category::Service,
        Category::Speed,
        Category::Product,
        Category::Price,
        Category::Comfort,
        Category::Process,
        Category::General,
    ];

    /// Display name used in persisted tags
    pub fn name(&self) -> &'static str {
        match self {
            Self::Service => "Service",
            Self::Speed => "Speed",
            Self::Product => "Product",
            Self::Price => "Price",
            Self::Comfort => "Comfort",
            Self::Process => "Process",
            Self::General => "General",
        }
    }

    /// Parse a display name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }

    /// Subcategories of this category; the first one is the default
    pub fn subcategories(&self) -> &'static [Subcategory] {
        use Subcategory::*;
        match self {
            Self::Service => &[
                ServiceStaff,
                Politeness,
                Rudeness,
                Attention,
                Competence,
                ProblemResolution,
                Communication,
                Upselling,
            ],
            Self::Speed => &[Waiting, ServiceSpeed],
            Self::Product => &[FoodCuisine, DrinksBar, QualityFreshness, Portions],
            Self::Price => &[PriceValue],
            Self::Comfort => &[InteriorAtmosphere, Cleanliness],
            Self::Process => &[
                Booking,
                FloorOrganization,
                OrderMistakes,
                Payment,
                Delivery,
                LocationParking,
            ],
            Self::General => &[GeneralImpression],
        }
    }

    /// Default subcategory used when nothing more specific matches
    pub fn default_subcategory(&self) -> Subcategory {
        self.subcategories()[0]
    }

    /// Whether `subcategory` belongs to this category
    pub fn contains(&self, subcategory: Subcategory) -> bool {
        self.subcategories().contains(&subcategory)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Subcategory within a [`Category`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Subcategory {
    // Service
    ServiceStaff,
    Politeness,
    Rudeness,
    Attention,
    Competence,
    ProblemResolution,
    Communication,
    Upselling,
    // Speed
    Waiting,
    ServiceSpeed,
    // Product
    FoodCuisine,
    DrinksBar,
    QualityFreshness,
    Portions,
    // Price
    PriceValue,
    // Comfort
    InteriorAtmosphere,
    Cleanliness,
    // Process
    Booking,
    FloorOrganization,
    OrderMistakes,
    Payment,
    Delivery,
    LocationParking,
    // General
    GeneralImpression,
}

impl Subcategory {
    /// Display name used in persisted tags
    pub fn name(&self) -> &'static str {
        match self {
            Self::ServiceStaff => "Service/staff",
            Self::Politeness => "Politeness/respect",
            Self::Rudeness => "Rudeness/conflict",
            Self::Attention => "Attention/engagement",
            Self::Competence => "Competence/menu knowledge",
            Self::ProblemResolution => "Problem resolution/guarantee",
            Self::Communication => "Communication/tone",
            Self::Upselling => "Pushiness/upselling",
            Self::Waiting => "Speed/waiting",
            Self::ServiceSpeed => "Service speed",
            Self::FoodCuisine => "Food/cuisine",
            Self::DrinksBar => "Drinks/bar",
            Self::QualityFreshness => "Quality/freshness",
            Self::Portions => "Portions/fullness",
            Self::PriceValue => "Price/value",
            Self::InteriorAtmosphere => "Interior/atmosphere",
            Self::Cleanliness => "Cleanliness/sanitation",
            Self::Booking => "Booking/table",
            Self::FloorOrganization => "Management/floor organization",
            Self::OrderMistakes => "Order/mistakes",
            Self::Payment => "Payment/checkout",
            Self::Delivery => "Delivery/takeaway",
            Self::LocationParking => "Location/parking",
            Self::GeneralImpression => "General impression",
        }
    }

    /// Category this subcategory belongs to
    pub fn category(&self) -> Category {
        match self {
            Self::ServiceStaff
            | Self::Politeness
            | Self::Rudeness
            | Self::Attention
            | Self::Competence
            | Self::ProblemResolution
            | Self::Communication
            | Self::Upselling => Category::Service,
            Self::Waiting | Self::ServiceSpeed => Category::Speed,
            Self::FoodCuisine | Self::DrinksBar | Self::QualityFreshness | Self::Portions => {
                Category::Product
            }
            Self::PriceValue => Category::Price,
            Self::InteriorAtmosphere | Self::Cleanliness => Category::Comfort,
            Self::Booking
            | Self::FloorOrganization
            | Self::OrderMistakes
            | Self::Payment
            | Self::Delivery
            | Self::LocationParking => Category::Process,
            Self::GeneralImpression => Category::General,
        }
    }

    /// Parse a display name
    pub fn from_name(name: &str) -> Option<Self> {
        all_subcategories().find(|s| s.name() == name)
    }
}

impl fmt::Display for Subcategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Flat list of every subcategory, in taxonomy order
pub fn all_subcategories() -> impl Iterator<Item = Subcategory> {
    Category::ALL
        .iter()
        .flat_map(|category| category.subcategories().iter().copied())
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Self::from_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown category '{}'", name)))
    }
}

impl Serialize for Subcategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Subcategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Self::from_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown subcategory '{}'", name)))
    }
}
