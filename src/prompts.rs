//! Example prompts for users who want inspiration.

use rand::seq::SliceRandom;
use rand::Rng;

/// Fixed pool the "surprise me" helper draws from.
pub const EXAMPLE_PROMPTS: [&str; 30] = [
    "A magic forest with glowing plants and fairy homes among giant mushrooms",
    "An old steampunk airship floating through golden clouds at sunset",
    "A future Mars colony with glass domes and gardens against red mountains",
    "A dragon sleeping on gold coins in a crystal cave",
    "An underwater kingdom with merpeople and glowing coral buildings",
    "A floating island with waterfalls pouring into clouds below",
    "A witch's cottage in fall with magic herbs in the garden",
    "A robot painting in a sunny studio with art supplies around it",
    "A magical library with floating glowing books and spiral staircases",
    "A Japanese shrine during cherry blossom season with lanterns and misty mountains",
    "A cosmic beach with glowing sand and an aurora in the night sky",
    "A medieval marketplace with colorful tents and street performers",
    "A cyberpunk city with neon signs and flying cars at night",
    "A peaceful bamboo forest with a hidden ancient temple",
    "A giant turtle carrying a village on its back in the ocean",
    "A whimsical treehouse village nestled among giant glowing mushrooms in an enchanted forest",
    "A steampunk airship docking at a Victorian sky-city made of intricate clockwork",
    "A bioluminescent coral reef teeming with bizarre and colorful deep-sea creatures",
    "A desolate Martian landscape with a lone astronaut gazing at a swirling nebula",
    "A cozy hobbit hole built into a rolling green hill with a smoking chimney",
    "A surreal dreamscape with melting clocks and floating islands in a pastel sky",
    "A majestic ice dragon soaring above snow-capped mountains under a full moon",
    "A bustling alien cantina filled with diverse and strange extraterrestrial patrons",
    "A forgotten library overgrown with vines and filled with floating books",
    "A vibrant street art mural covering the side of a futuristic skyscraper",
    "A serene Japanese garden with a stone lantern and cherry blossoms in the rain",
    "A mystical portal opening up in the middle of a dense, fog-shrouded forest.",
    "A playful group of robotic animals exploring a lush, overgrown jungle",
    "A dramatic lightning storm over a dark and stormy ocean with a lone sailboat",
    "An ancient Egyptian tomb filled with hieroglyphs and golden treasures",
];

/// Picks an example prompt uniformly at random.
pub fn random_prompt() -> &'static str {
    random_prompt_with(&mut rand::thread_rng())
}

pub fn random_prompt_with<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    // The pool is a non-empty constant.
    EXAMPLE_PROMPTS.choose(rng).copied().unwrap_or(EXAMPLE_PROMPTS[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    #[test]
    fn covers_pool_roughly_uniformly() {
        let mut rng = StdRng::seed_from_u64(7);
        let draws = 30_000;
        let mut counts: HashMap<&str, usize> = HashMap::new();

        for _ in 0..draws {
            let prompt = random_prompt_with(&mut rng);
            assert!(EXAMPLE_PROMPTS.contains(&prompt));
            *counts.entry(prompt).or_default() += 1;
        }

        assert_eq!(counts.len(), EXAMPLE_PROMPTS.len());
        let expected = draws / EXAMPLE_PROMPTS.len();
        for (prompt, count) in counts {
            assert!(
                count > expected * 7 / 10 && count < expected * 13 / 10,
                "'{prompt}' drawn {count} times, expected about {expected}"
            );
        }
    }

    #[test]
    fn thread_rng_variant_stays_in_pool() {
        for _ in 0..100 {
            assert!(EXAMPLE_PROMPTS.contains(&random_prompt()));
        }
    }

    #[test]
    fn prompts_are_unique_and_non_empty() {
        let mut seen = std::collections::HashSet::new();
        for prompt in EXAMPLE_PROMPTS {
            assert!(!prompt.trim().is_empty());
            assert!(seen.insert(prompt), "duplicate prompt: {prompt}");
        }
    }
}
