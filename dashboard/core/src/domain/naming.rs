// Copyright (c) 2026 Agent Dashboard Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Placeholder names for agents created without one.
//!
//! Names look like `brave-otter-4821`. Collisions are possible and tolerated;
//! nothing here checks existing agents.

use rand::seq::IndexedRandom;
use rand::Rng;

const ADJECTIVES: &[&str] = &[
    "amber", "brave", "calm", "clever", "curious", "daring", "eager", "fancy", "gentle", "happy",
    "jolly", "keen", "lively", "lucky", "mellow", "nimble", "plucky", "quiet", "rapid", "sunny",
    "swift", "tidy", "vivid", "witty", "zesty",
];

const NOUNS: &[&str] = &[
    "badger", "beacon", "comet", "falcon", "fern", "gecko", "harbor", "heron", "lantern", "lynx",
    "maple", "meadow", "otter", "panda", "pebble", "quartz", "raven", "river", "sparrow", "summit",
    "tiger", "tulip", "walrus", "willow", "zephyr",
];

pub fn generate_placeholder_name() -> String {
    let mut rng = rand::rng();
    let adjective = ADJECTIVES.choose(&mut rng).copied().unwrap_or("new");
    let noun = NOUNS.choose(&mut rng).copied().unwrap_or("agent");
    let number: u16 = rng.random_range(1000..10000);
    format!("{}-{}-{}", adjective, noun, number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_shape() {
        for _ in 0..50 {
            let name = generate_placeholder_name();
            let parts: Vec<&str> = name.split('-').collect();
            assert_eq!(parts.len(), 3, "unexpected name {}", name);
            assert!(ADJECTIVES.contains(&parts[0]));
            assert!(NOUNS.contains(&parts[1]));
            let number: u16 = parts[2].parse().unwrap();
            assert!((1000..10000).contains(&number));
        }
    }
}
