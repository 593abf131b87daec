//! Category markers and subcategory disambiguation
//!
//! A marker is a word whose lemma belongs to a category's marker set
//! ("waiter" → Service, "pizza" → Product). The subcategory of a marker is
//! chosen by looking at every lemma in the marker's neighbourhood against
//! per-subcategory tables.

use impression_core::{Category, CategoryMarker, Subcategory};
use std::collections::{HashMap, HashSet};

const SERVICE_MARKERS: &[&str] = &[
    "waiter", "waitress", "server", "staff", "service", "personnel", "employee", "bartender",
    "barista", "host", "hostess", "manager", "administrator", "admin", "cashier", "serve",
    "sommelier", "chef", "cook", "team", "crew", "girl", "guy", "lady", "attitude",
];

const SPEED_MARKERS: &[&str] = &[
    "wait", "speed", "delay", "minute", "hour", "queue", "line", "slow", "fast", "quick",
    "quickly", "promptly", "prompt", "forever", "ages", "instantly", "immediately",
];

const PRODUCT_MARKERS: &[&str] = &[
    "food", "dish", "meal", "menu", "cuisine", "taste", "tasty", "delicious", "deliciously",
    "flavor", "flavour", "yummy", "pizza", "pasta", "burger", "steak", "salad", "soup",
    "dessert", "cake", "bread", "fish", "meat", "chicken", "sushi", "roll", "breakfast",
    "lunch", "dinner", "brunch", "appetizer", "starter", "fries", "sauce", "coffee", "tea",
    "drink", "cocktail", "wine", "beer", "juice", "lemonade", "portion", "bland", "stale",
    "overcooked", "undercooked", "burnt", "greasy", "soggy", "tasteless", "fresh", "juicy",
    "crispy", "tender", "salty", "bar",
];

const PRICE_MARKERS: &[&str] = &[
    "price", "cost", "bill", "check", "money", "expensive", "cheap", "pricey", "overpriced",
    "affordable", "value", "dollar", "penny", "charge", "overcharge", "budget",
];

const COMFORT_MARKERS: &[&str] = &[
    "interior", "atmosphere", "ambience", "ambiance", "music", "decor", "design", "cozy",
    "cosy", "comfortable", "uncomfortable", "noisy", "loud", "quiet", "clean", "dirty",
    "filthy", "spotless", "toilet", "restroom", "bathroom", "washroom", "chair",
    "seat", "hall", "room", "terrace", "lighting", "smell", "smelly", "stuffy", "cramped",
    "spacious", "smoke", "smoking", "smoky", "smokey", "conditioner", "conditoner", "aircon", "ventilation",
    "temperature", "cockroach", "drip", "sticky",
];

const PROCESS_MARKERS: &[&str] = &[
    "booking", "book", "reservation", "reserve", "order", "payment", "pay", "card", "cash",
    "receipt", "tip", "delivery", "deliver", "takeaway", "takeout", "courier", "parking",
    "location", "entrance", "confirm", "mistake", "wrong", "mix", "table", "bill", "check",
];

const GENERAL_MARKERS: &[&str] = &[
    "place", "restaurant", "cafe", "establishment", "visit", "experience", "everything",
    "overall", "venue", "spot",
];

/// Subcategory lookup tables, checked against all lemmas near a marker
const SUBCATEGORY_LEMMAS: &[(Subcategory, &[&str])] = &[
    (
        Subcategory::Politeness,
        &["polite", "impolite", "courteous", "respect", "respectful", "disrespect", "kind",
          "friendly", "unfriendly", "welcoming", "greet", "smile", "smiling", "thank", "cheerful"],
    ),
    (
        Subcategory::Rudeness,
        &["rude", "yell", "shout", "arrogant", "condescending", "insult", "argue", "snap",
          "conflict", "scandal", "rudely", "attitude", "disrespect"],
    ),
    (
        Subcategory::Attention,
        &["attentive", "attention", "ignore", "notice", "forget", "care", "caring", "careless",
          "indifferent", "neglect", "approach", "nobody"],
    ),
    (
        Subcategory::Competence,
        &["knowledgeable", "competent", "incompetent", "professional", "unprofessional",
          "explain", "advise", "suggest", "recommendation", "know", "menu"],
    ),
    (
        Subcategory::ProblemResolution,
        &["apologize", "apologise", "apology", "compensate", "compensation", "replace",
          "refund", "complaint", "complain", "fix", "solve", "resolve", "guarantee"],
    ),
    (
        Subcategory::Communication,
        &["tone", "answer", "respond", "listen", "understand", "talk", "speak", "explain",
          "communication", "phone"],
    ),
    (
        Subcategory::Upselling,
        &["pushy", "impose", "upsell", "insist", "force", "persuade"],
    ),
    (
        Subcategory::Waiting,
        &["wait", "queue", "line", "hour", "minute", "forever", "ages", "delay"],
    ),
    (
        Subcategory::ServiceSpeed,
        &["speed", "slow", "fast", "quick", "quickly", "prompt", "promptly", "instantly",
          "immediately", "serve", "bring"],
    ),
    (
        Subcategory::FoodCuisine,
        &["food", "dish", "meal", "cuisine", "taste", "tasty", "delicious", "flavor", "flavour",
          "pizza", "pasta", "burger", "steak", "salad", "soup", "dessert", "cake", "bread",
          "fish", "meat", "chicken", "sushi", "roll", "breakfast", "lunch", "dinner", "brunch",
          "appetizer", "starter", "fries", "sauce", "chef", "cook", "bland", "tasteless",
          "yummy"],
    ),
    (
        Subcategory::DrinksBar,
        &["coffee", "tea", "drink", "cocktail", "wine", "beer", "juice", "lemonade", "bar",
          "bartender", "barista", "sommelier"],
    ),
    (
        Subcategory::QualityFreshness,
        &["fresh", "stale", "rotten", "sour", "spoil", "overcooked", "undercooked", "burnt",
          "raw", "frozen", "quality", "poisoning", "hair", "moldy", "mouldy"],
    ),
    (
        Subcategory::Portions,
        &["portion", "size", "tiny", "small", "huge", "big", "generous", "meager", "skimpy",
          "hungry", "full", "hearty"],
    ),
    (
        Subcategory::InteriorAtmosphere,
        &["interior", "atmosphere", "ambience", "ambiance", "music", "decor", "design",
          "cozy", "cosy", "comfortable", "uncomfortable", "noisy", "loud", "quiet", "lighting",
          "terrace", "hall", "room", "seat", "chair", "smoke", "smoking", "smoky", "smokey",
          "conditioner", "conditoner", "aircon", "ventilation", "temperature", "stuffy",
          "cramped", "spacious", "drip"],
    ),
    (
        Subcategory::Cleanliness,
        &["clean", "dirty", "filthy", "spotless", "toilet", "restroom", "bathroom", "washroom",
          "cockroach", "smell", "smelly", "sticky", "stain", "hygiene", "tidy", "mess", "messy"],
    ),
    (
        Subcategory::Booking,
        &["booking", "book", "reservation", "reserve", "confirm", "table"],
    ),
    (
        Subcategory::FloorOrganization,
        &["manager", "administrator", "admin", "organization", "organize", "chaos", "chaotic",
          "crowded", "host", "hostess"],
    ),
    (
        Subcategory::OrderMistakes,
        &["order", "mistake", "wrong", "mix", "missing", "forget"],
    ),
    (
        Subcategory::Payment,
        &["payment", "pay", "card", "cash", "receipt", "tip", "bill", "check", "overcharge"],
    ),
    (
        Subcategory::Delivery,
        &["delivery", "deliver", "takeaway", "takeout", "courier", "package"],
    ),
    (
        Subcategory::LocationParking,
        &["parking", "location", "entrance", "find", "street"],
    ),
    (Subcategory::PriceValue, &["price", "value", "cost", "money"]),
];

fn to_set(words: &[&str]) -> HashSet<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// Marker sets per category and lookup tables per subcategory
#[derive(Debug, Clone)]
pub struct CategoryLexicon {
    markers: Vec<(Category, HashSet<String>)>,
    subcategories: HashMap<Subcategory, HashSet<String>>,
}

impl CategoryLexicon {
    /// Built-in hospitality taxonomy
    pub fn horeca() -> Self {
        let markers = vec![
            (Category::Service, to_set(SERVICE_MARKERS)),
            (Category::Speed, to_set(SPEED_MARKERS)),
            (Category::Product, to_set(PRODUCT_MARKERS)),
            (Category::Price, to_set(PRICE_MARKERS)),
            (Category::Comfort, to_set(COMFORT_MARKERS)),
            (Category::Process, to_set(PROCESS_MARKERS)),
            (Category::General, to_set(GENERAL_MARKERS)),
        ];

        let subcategories = SUBCATEGORY_LEMMAS
            .iter()
            .map(|(sub, lemmas)| (*sub, to_set(lemmas)))
            .collect();

        Self {
            markers,
            subcategories,
        }
    }

    /// An empty taxonomy lexicon for substitution in tests
    pub fn empty() -> Self {
        Self {
            markers: Vec::new(),
            subcategories: HashMap::new(),
        }
    }

    /// Add marker lemmas for a category
    pub fn with_markers(mut self, category: Category, lemmas: &[&str]) -> Self {
        match self.markers.iter_mut().find(|(c, _)| *c == category) {
            Some((_, set)) => set.extend(lemmas.iter().map(|l| l.to_string())),
            None => self.markers.push((category, to_set(lemmas))),
        }
        self
    }

    /// Add lookup lemmas for a subcategory
    pub fn with_subcategory(mut self, subcategory: Subcategory, lemmas: &[&str]) -> Self {
        self.subcategories
            .entry(subcategory)
            .or_default()
            .extend(lemmas.iter().map(|l| l.to_string()));
        self
    }

    /// Every lemma used by the marker sets and lookup tables
    pub fn vocabulary(&self) -> impl Iterator<Item = &String> {
        self.markers
            .iter()
            .flat_map(|(_, set)| set.iter())
            .chain(self.subcategories.values().flat_map(|set| set.iter()))
    }

    /// Categories whose marker set holds `lemma`, in taxonomy order
    pub fn categories_of<'a>(&'a self, lemma: &'a str) -> impl Iterator<Item = Category> + 'a {
        self.markers
            .iter()
            .filter(move |(_, set)| set.contains(lemma))
            .map(|(category, _)| *category)
    }

    /// Markers for the given `(lemma, surface, offset)` words, in text order
    pub fn find_markers<'a>(
        &self,
        words: impl IntoIterator<Item = (&'a str, &'a str, usize)>,
    ) -> Vec<CategoryMarker> {
        let mut markers = Vec::new();
        for (lemma, surface, offset) in words {
            for category in self.categories_of(lemma) {
                markers.push(CategoryMarker::new(category, surface, offset));
            }
        }
        markers
    }

    /// Subcategories of `category` supported by lemmas of the surrounding text.
    ///
    /// Returns every matching subcategory in taxonomy order, or the category
    /// default when nothing matches.
    pub fn disambiguate(
        &self,
        category: Category,
        window_lemmas: &HashSet<String>,
    ) -> Vec<Subcategory> {
        let matched: Vec<Subcategory> = category
            .subcategories()
            .iter()
            .copied()
            .filter(|sub| {
                self.subcategories
                    .get(sub)
                    .is_some_and(|lemmas| !lemmas.is_disjoint(window_lemmas))
            })
            .collect();

        if matched.is_empty() {
            vec![category.default_subcategory()]
        } else {
            matched
        }
    }
}

impl Default for CategoryLexicon {
    fn default() -> Self {
        Self::horeca()
    }
}
