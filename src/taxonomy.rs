//! Static classification tables: category keyword sets, severity tiers,
//! sentiment word lists, and the city/district lookup. Loaded once, never
//! mutated at runtime.

use once_cell::sync::Lazy;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy)]
pub struct CategoryDef {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    /// Stronger complaint signals; weighted 1.5x for category scoring and
    /// 2x for sentiment negativity.
    pub negative_indicators: &'static [&'static str],
}

pub const FALLBACK_CATEGORY: &str = "Other";

const HOUSING_KEYWORDS: &[&str] = &[
    "apartment", "rent", "landlord", "tenant", "building", "elevator", "lift",
    "heating", "radiator", "air conditioning", "plumbing", "mold", "lease",
];
const HOUSING_NEGATIVE: &[&str] = &[
    "no heat", "no hot water", "leaking", "burst pipe", "freezing", "evicted",
    "unlivable",
];

const ROADS_KEYWORDS: &[&str] = &[
    "pothole", "road", "street", "asphalt", "pavement", "sidewalk",
    "crosswalk", "intersection", "bridge", "tunnel", "traffic light",
];
const ROADS_NEGATIVE: &[&str] = &[
    "damaged", "dangerous", "accident", "crumbling", "blocked", "collapsed",
];

const TRANSPORT_KEYWORDS: &[&str] = &[
    "subway", "bus", "train", "metro", "transit", "traffic", "parking",
    "commute", "station", "fare", "route",
];
const TRANSPORT_NEGATIVE: &[&str] = &[
    "delayed", "cancelled", "stranded", "overcrowded", "breakdown",
];

const SAFETY_KEYWORDS: &[&str] = &[
    "crime", "police", "theft", "safety", "unsafe", "lighting", "streetlight",
    "noise", "loud", "vandalism",
];
const SAFETY_NEGATIVE: &[&str] = &[
    "attacked", "threatened", "robbery", "assault", "shooting", "break-in",
];

const EDUCATION_KEYWORDS: &[&str] = &[
    "school", "teacher", "student", "classroom", "university", "college",
    "tuition", "education",
];
const EDUCATION_NEGATIVE: &[&str] = &["underfunded", "understaffed"];

const HEALTHCARE_KEYWORDS: &[&str] = &[
    "hospital", "clinic", "doctor", "nurse", "ambulance", "pharmacy",
    "healthcare", "emergency room",
];
const HEALTHCARE_NEGATIVE: &[&str] = &["misdiagnosed", "turned away", "wait time"];

const ENVIRONMENT_KEYWORDS: &[&str] = &[
    "trash", "garbage", "litter", "pollution", "sewage", "recycling", "park",
    "tree", "flooding", "air quality", "smell",
];
const ENVIRONMENT_NEGATIVE: &[&str] = &[
    "contaminated", "toxic", "overflowing", "infested", "dumping",
];

const URBAN_KEYWORDS: &[&str] = &[
    "construction", "zoning", "development", "permit", "demolition",
    "gentrification", "bike lane", "urban planning",
];
const URBAN_NEGATIVE: &[&str] = &["illegal construction", "abandoned", "eyesore"];

/// Declaration order is the tie-break order for category inference.
pub const CATEGORIES: &[CategoryDef] = &[
    CategoryDef {
        name: "Housing",
        keywords: HOUSING_KEYWORDS,
        negative_indicators: HOUSING_NEGATIVE,
    },
    CategoryDef {
        name: "Roads",
        keywords: ROADS_KEYWORDS,
        negative_indicators: ROADS_NEGATIVE,
    },
    CategoryDef {
        name: "Transport",
        keywords: TRANSPORT_KEYWORDS,
        negative_indicators: TRANSPORT_NEGATIVE,
    },
    CategoryDef {
        name: "Safety",
        keywords: SAFETY_KEYWORDS,
        negative_indicators: SAFETY_NEGATIVE,
    },
    CategoryDef {
        name: "Education",
        keywords: EDUCATION_KEYWORDS,
        negative_indicators: EDUCATION_NEGATIVE,
    },
    CategoryDef {
        name: "Healthcare",
        keywords: HEALTHCARE_KEYWORDS,
        negative_indicators: HEALTHCARE_NEGATIVE,
    },
    CategoryDef {
        name: "Environment",
        keywords: ENVIRONMENT_KEYWORDS,
        negative_indicators: ENVIRONMENT_NEGATIVE,
    },
    CategoryDef {
        name: "Urban Development",
        keywords: URBAN_KEYWORDS,
        negative_indicators: URBAN_NEGATIVE,
    },
];

pub fn is_known_category(name: &str) -> bool {
    name == FALLBACK_CATEGORY || CATEGORIES.iter().any(|c| c.name == name)
}

/* ------------------------------ Severity tiers ----------------------------- */

pub const SEVERITY_CRITICAL: &[&str] = &[
    "emergency", "fire", "explosion", "gas leak", "collapse", "flooded",
    "flooding", "no water", "no power", "injured", "injury", "death",
    "hazard",
];
pub const SEVERITY_HIGH: &[&str] = &[
    "damaged", "broken", "burst", "outage", "blackout", "accident", "unsafe",
    "theft", "stranded",
];
pub const SEVERITY_MEDIUM: &[&str] = &[
    "delayed", "dirty", "leak", "crack", "graffiti", "smell", "overflowing",
];
pub const SEVERITY_LOW: &[&str] = &[
    "minor", "small", "slight", "cosmetic", "occasional",
];

/// Urgency phrases; add to both the negativity score and the severity score.
pub const NEGATIVE_INTENSIFIERS: &[&str] = &[
    "asap", "urgent", "immediately", "unacceptable", "ridiculous", "fed up",
    "right now", "getting worse", "still not fixed",
];

/* ----------------------------- Sentiment words ----------------------------- */

pub const NEGATIVE_WORDS: &[&str] = &[
    "problem", "issue", "complaint", "terrible", "awful", "horrible", "worst",
    "bad", "annoying", "frustrating", "disgusting", "failure", "nightmare",
    "mess",
];
pub const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "improved", "improvement", "fixed",
    "resolved", "thank", "appreciate", "clean", "beautiful", "love", "nice",
    "happy",
];

/* ------------------------------- Stop words -------------------------------- */

pub static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "and", "for", "are", "was", "were", "been", "being", "but",
        "not", "you", "your", "all", "any", "can", "could", "should", "would",
        "will", "this", "that", "these", "those", "with", "have", "has",
        "had", "from", "they", "them", "their", "there", "here", "what",
        "when", "where", "which", "who", "why", "how", "about", "into",
        "over", "under", "out", "get", "got", "just", "like", "than", "then",
        "some", "its", "also", "very", "really", "too", "now", "only", "our",
    ]
    .into_iter()
    .collect()
});

/* --------------------------- Ingestion relevance --------------------------- */

/// A post must contain at least one of these to enter the pipeline.
pub const RELEVANCE_KEYWORDS: &[&str] = &[
    // general issues
    "problem", "issue", "complaint", "broken", "not working", "terrible",
    "awful", "dirty", "trash", "garbage", "maintenance", "repair", "fix",
    "flooding",
    // transport
    "traffic", "subway", "bus", "train", "parking", "road", "construction",
    "delayed", "cancelled", "metro", "transit",
    // city services
    "power outage", "blackout", "water", "heat", "heating",
    "air conditioning", "elevator", "lift", "building", "apartment", "rent",
    "landlord",
    // safety and lighting
    "lighting", "streetlight", "safety", "crime", "noise", "loud",
    // infrastructure
    "pothole", "sidewalk", "crosswalk", "bridge", "tunnel", "wifi",
    "internet", "cell service", "phone service",
];

/* ----------------------------- City resolution ----------------------------- */

#[derive(Debug, Clone, Copy)]
pub struct CityDef {
    /// Source channel identifier (subreddit), lowercased.
    pub key: &'static str,
    pub city: &'static str,
    pub districts: &'static [&'static str],
    pub coordinates: [f64; 2], // [lat, lng] city reference point
}

const NYC_DISTRICTS: &[&str] = &[
    "Manhattan", "Brooklyn", "Queens", "Bronx", "Staten Island",
];
const NYC_COORDINATES: [f64; 2] = [40.7128, -74.006];

pub const CITIES: &[CityDef] = &[
    CityDef {
        key: "nyc",
        city: "New York",
        districts: NYC_DISTRICTS,
        coordinates: NYC_COORDINATES,
    },
    CityDef {
        key: "newyorkcity",
        city: "New York",
        districts: NYC_DISTRICTS,
        coordinates: NYC_COORDINATES,
    },
    CityDef {
        key: "losangeles",
        city: "Los Angeles",
        districts: &["Hollywood", "Beverly Hills", "Santa Monica", "Downtown", "Venice"],
        coordinates: [34.0522, -118.2437],
    },
    CityDef {
        key: "chicago",
        city: "Chicago",
        districts: &["Loop", "North Side", "South Side", "West Side", "Lincoln Park"],
        coordinates: [41.8781, -87.6298],
    },
    CityDef {
        key: "sanfrancisco",
        city: "San Francisco",
        districts: &["Mission", "Castro", "SOMA", "Richmond", "Sunset"],
        coordinates: [37.7749, -122.4194],
    },
    CityDef {
        key: "boston",
        city: "Boston",
        districts: &["Back Bay", "North End", "South End", "Cambridge", "Somerville"],
        coordinates: [42.3601, -71.0589],
    },
    CityDef {
        key: "london",
        city: "London",
        districts: &["Westminster", "Camden", "Hackney", "Tower Hamlets", "Kensington"],
        coordinates: [51.5074, -0.1278],
    },
    CityDef {
        key: "toronto",
        city: "Toronto",
        districts: &["Downtown", "North York", "Scarborough", "Etobicoke", "York"],
        coordinates: [43.6532, -79.3832],
    },
    CityDef {
        key: "melbourne",
        city: "Melbourne",
        districts: &["CBD", "South Yarra", "Richmond", "St Kilda", "Brunswick"],
        coordinates: [-37.8136, 144.9631],
    },
    CityDef {
        key: "sydney",
        city: "Sydney",
        districts: &["CBD", "Bondi", "Manly", "Parramatta", "Newtown"],
        coordinates: [-33.8688, 151.2093],
    },
    CityDef {
        key: "seattle",
        city: "Seattle",
        districts: &["Capitol Hill", "Fremont", "Ballard", "Queen Anne", "Georgetown"],
        coordinates: [47.6062, -122.3321],
    },
    CityDef {
        key: "philadelphia",
        city: "Philadelphia",
        districts: &[
            "Center City", "South Philly", "Northern Liberties", "Fishtown",
            "University City",
        ],
        coordinates: [39.9526, -75.1652],
    },
];

pub const UNKNOWN_PLACE: &str = "Unknown";

/// Fallback reference point for unresolved channels (New York).
pub const DEFAULT_COORDINATES: [f64; 2] = NYC_COORDINATES;

pub fn lookup_city(subreddit: &str) -> Option<&'static CityDef> {
    let key = subreddit.to_lowercase();
    CITIES.iter().find(|c| c.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_city_is_case_insensitive() {
        let city = lookup_city("LosAngeles").unwrap();
        assert_eq!(city.city, "Los Angeles");
        assert_eq!(city.districts.len(), 5);
    }

    #[test]
    fn test_lookup_city_unresolved() {
        assert!(lookup_city("mildlyinfuriating").is_none());
    }

    #[test]
    fn test_category_names_are_unique() {
        let mut names: Vec<&str> = CATEGORIES.iter().map(|c| c.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), CATEGORIES.len());
    }

    #[test]
    fn test_fallback_is_known() {
        assert!(is_known_category(FALLBACK_CATEGORY));
        assert!(is_known_category("Roads"));
        assert!(!is_known_category("Potholes"));
    }
}
