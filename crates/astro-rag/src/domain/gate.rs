//! Keyword-based domain classification

use crate::config::DomainConfig;

/// Space-science vocabulary, all lowercase, matched as substrings
pub const VOCABULARY: &[&str] = &[
    // basic terms
    "space", "nasa", "astronomy", "telescope", "universe", "planet", "black hole", "cosmos",
    "galaxy", "mars", "moon", "satellite", "astro", "solar", "rocket", "spacecraft", "cosmology",
    // celestial objects
    "star", "sun", "jupiter", "saturn", "venus", "mercury", "neptune", "uranus", "pluto",
    "asteroid", "comet", "meteor", "nebula", "pulsar", "quasar", "supernova", "neutron star",
    "white dwarf", "earth",
    // missions and technology
    "james webb", "hubble", "voyager", "cassini", "curiosity", "perseverance", "apollo",
    "artemis", "spacex", "falcon", "dragon", "starship", "international space station", "iss",
    "spacewalk", "eva",
    // phenomena
    "orbit", "gravity", "gravitational", "light year", "parsec", "redshift", "cosmic",
    "interstellar", "intergalactic", "exoplanet", "habitable zone", "goldilocks", "dark matter",
    "dark energy", "big bang", "cosmic microwave background", "expansion",
    // subfields
    "astrophysics", "planetary science", "astrobiology", "astrochemistry", "stellar evolution",
    "galactic", "extragalactic", "cosmological",
    // popular terms
    "alien", "extraterrestrial", "ufo", "seti", "milky way", "andromeda", "solar system",
    "space exploration", "space travel", "quantum physics",
];

/// Whether the query mentions any vocabulary term (case-insensitive substring match)
///
/// Matching is by substring, so "iss" also matches "mission".
pub fn is_in_scope(query: &str) -> bool {
    let query = query.to_lowercase();
    VOCABULARY.iter().any(|term| query.contains(term))
}

/// Domain check with optional site-specific vocabulary on top of the built-in list
#[derive(Debug, Clone, Default)]
pub struct DomainGate {
    extra_terms: Vec<String>,
}

impl DomainGate {
    pub fn new<I, S>(extra_terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extra_terms: extra_terms
                .into_iter()
                .map(|t| t.as_ref().trim().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
        }
    }

    pub fn from_config(config: &DomainConfig) -> Self {
        Self::new(&config.extra_terms)
    }

    /// Same contract as [`is_in_scope`], including the extra terms
    pub fn allows(&self, query: &str) -> bool {
        if is_in_scope(query) {
            return true;
        }
        let query = query.to_lowercase();
        self.extra_terms.iter().any(|term| query.contains(term.as_str()))
    }
}
