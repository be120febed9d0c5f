//! Canned replies for out-of-domain queries

use rand::Rng;

/// Rejection replies, one picked per out-of-domain query
pub const REJECTION_MESSAGES: [&str; 30] = [
    "Sorry, I can only help with topics related to space science, astronomy, or astrophysics.",
    "I'm built specifically to answer questions about space, the universe, celestial bodies, and scientific space research.",
    "This assistant focuses solely on space science and astronomy. Please ask something within that domain.",
    "Oops! That question is outside my scope. Try something related to stars, planets, telescopes, or space missions.",
    "I specialize in space-related topics only. Ask me about the cosmos, NASA, black holes, or the solar system!",
    // formal
    "I'm designed exclusively for space science and astronomy topics. Please rephrase your question to focus on these areas.",
    "My expertise is limited to astronomical and space science subjects. Could you ask something about the universe instead?",
    "That falls outside my specialized domain of space science and astrophysics. Try asking about galaxies, nebulae, or space exploration.",
    "I'm programmed to discuss only space-related phenomena and research. Please ask about astronomical objects or space missions.",
    "My knowledge base covers space science exclusively. Consider asking about planetary science, stellar evolution, or cosmology.",
    // friendly
    "I'm your space science expert! Let's talk about something cosmic like supernovas, exoplanets, or the Big Bang instead.",
    "That's not in my wheelhouse, but I'd love to chat about anything space-related! How about Mars exploration or the Milky Way?",
    "I'm all about the stars and beyond! Ask me something about space telescopes, asteroid belts, or distant galaxies.",
    "Space is my thing! Try asking about rocket science, the International Space Station, or Jupiter's moons.",
    "I'm your go-to for all things astronomical! Let's explore topics like dark matter, space weather, or lunar missions.",
    // explanatory
    "As an astronomy-focused assistant, I can only address questions about space science, celestial mechanics, and astrophysical phenomena.",
    "My capabilities are specifically tailored for space science discussions. Please ask about topics like stellar formation, planetary atmospheres, or space technology.",
    "I'm specialized in astronomical and space science topics only. Try questions about quasars, satellite missions, or the search for extraterrestrial life.",
    "My programming centers on space science expertise. Ask me about cosmic radiation, space missions, or the structure of the universe.",
    "I focus exclusively on space and astronomy topics. Consider asking about meteor showers, space probes, or gravitational waves.",
    // redirective
    "That's outside my space science specialty, but I'd be happy to discuss anything from Saturn's rings to gamma-ray bursts!",
    "Let's keep it cosmic! Ask me about something like the Hubble Space Telescope, neutron stars, or the asteroid belt instead.",
    "I'm here for space talk only! How about we explore topics like the James Webb telescope, Mars rovers, or stellar nurseries?",
    "Space science is my domain! Try asking about things like orbital mechanics, the cosmic microwave background, or SpaceX missions.",
    "I'm built for the cosmos! Let's discuss something astronomical like binary star systems, the Kuiper Belt, or space colonization.",
    // enthusiastic
    "That's not my area, but I'm excited to talk about anything space-related! Think rockets, aliens, or the edge of the universe!",
    "I live and breathe space science! Ask me about something stellar like pulsars, wormholes, or the latest Mars discoveries.",
    "Space is where I shine! Let's blast off into topics like the solar wind, exoplanet hunting, or interstellar travel.",
    "I'm passionate about all things astronomical! Try asking about cosmic phenomena, space agencies, or the mysteries of dark energy.",
    "The universe is my playground! Ask me about anything from tiny asteroids to massive galaxy clusters!",
];

/// Rejection message at `index`, wrapping around the list
pub fn rejection_message(index: usize) -> &'static str {
    REJECTION_MESSAGES[index % REJECTION_MESSAGES.len()]
}

/// Uniformly random rejection message
pub fn random_rejection<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    rejection_message(rng.gen_range(0..REJECTION_MESSAGES.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_index_wraps() {
        assert_eq!(rejection_message(0), REJECTION_MESSAGES[0]);
        assert_eq!(rejection_message(30), REJECTION_MESSAGES[0]);
        assert_eq!(rejection_message(31), REJECTION_MESSAGES[1]);
    }

    #[test]
    fn test_messages_are_distinct_and_non_empty() {
        let unique: std::collections::HashSet<_> = REJECTION_MESSAGES.iter().collect();
        assert_eq!(unique.len(), REJECTION_MESSAGES.len());
        assert!(REJECTION_MESSAGES.iter().all(|m| !m.is_empty()));
    }

    #[test]
    fn test_random_rejection_is_from_list_and_seedable() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let message = random_rejection(&mut a);
            assert!(REJECTION_MESSAGES.contains(&message));
            assert_eq!(message, random_rejection(&mut b));
        }
    }
}
