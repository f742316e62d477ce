// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use rolodex_app::Person;
use std::collections::BTreeSet;
use std::path::PathBuf;

const FIRST_NAMES: [&str; 16] = [
    "Angel", "Clyde", "Elaine", "Genevieve", "Georgina", "Javier", "Joni", "Keith", "Krista",
    "Laurel", "Marshall", "Ronald", "Russell", "Sallie", "Sandy", "Ursula",
];

const LAST_NAMES: [&str; 16] = [
    "Alfred", "Ashmore", "Barlow", "Bright", "Calabrese", "Garay", "Guess", "Huffman", "Kemp",
    "Ketchum", "Mundy", "Osborn", "Pinckney", "Reeves", "Rosales", "Whyte",
];

const MIN_AGE: i64 = 18;
const MAX_AGE: i64 = 90;

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Generates people whose user names never repeat within one faker.
#[derive(Debug, Clone)]
pub struct PeopleFaker {
    rng: DeterministicRng,
    issued: BTreeSet<String>,
}

impl PeopleFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            issued: BTreeSet::new(),
        }
    }

    pub fn int_n(&mut self, n: usize) -> usize {
        self.rng.int_n(n)
    }

    pub fn person(&mut self) -> Person {
        let first_name = self.pick(&FIRST_NAMES);
        let last_name = self.pick(&LAST_NAMES);
        let span = usize::try_from(MAX_AGE - MIN_AGE + 1).unwrap_or(1);
        let age = MIN_AGE + i64::try_from(self.int_n(span)).unwrap_or(0);

        let base = format!("{first_name}{last_name}").to_lowercase();
        let mut user_name = base.clone();
        let mut suffix = 2;
        while self.issued.contains(&user_name) {
            user_name = format!("{base}{suffix}");
            suffix += 1;
        }
        self.issued.insert(user_name.clone());

        Person {
            user_name,
            first_name: first_name.to_owned(),
            last_name: last_name.to_owned(),
            age,
        }
    }

    pub fn people(&mut self, count: usize) -> Vec<Person> {
        (0..count).map(|_| self.person()).collect()
    }

    fn pick(&mut self, values: &[&'static str]) -> &'static str {
        values[self.int_n(values.len())]
    }
}

pub fn temp_db_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let db_path = dir.path().join("rolodex.db");
    Ok((dir, db_path))
}

pub fn first_names() -> &'static [&'static str] {
    &FIRST_NAMES
}

pub fn last_names() -> &'static [&'static str] {
    &LAST_NAMES
}

#[cfg(test)]
mod tests {
    use super::{PeopleFaker, first_names, last_names, temp_db_path};
    use std::collections::BTreeSet;

    #[test]
    fn new_deterministic_seed() {
        let mut left = PeopleFaker::new(42);
        let mut right = PeopleFaker::new(42);
        assert_eq!(left.people(5), right.people(5));
    }

    #[test]
    fn person_fields_come_from_the_name_lists() {
        let mut faker = PeopleFaker::new(1);
        let person = faker.person();

        assert!(first_names().contains(&person.first_name.as_str()));
        assert!(last_names().contains(&person.last_name.as_str()));
        assert!((18..=90).contains(&person.age));
        assert_eq!(
            person.user_name,
            format!("{}{}", person.first_name, person.last_name).to_lowercase()
        );
    }

    #[test]
    fn user_names_are_unique() {
        let mut faker = PeopleFaker::new(3);
        let people = faker.people(400);
        let names = people
            .iter()
            .map(|person| person.user_name.as_str())
            .collect::<BTreeSet<_>>();
        assert_eq!(names.len(), people.len());
    }

    #[test]
    fn variety_across_seeds() {
        let mut names = BTreeSet::new();
        for seed in 0_u64..20_u64 {
            let mut faker = PeopleFaker::new(seed);
            names.insert(faker.person().last_name);
        }
        assert!(names.len() >= 6, "got {}", names.len());
    }

    #[test]
    fn zero_seed_is_normalized() {
        let mut zero = PeopleFaker::new(0);
        let mut one = PeopleFaker::new(1);
        assert_eq!(zero.person(), one.person());
    }

    #[test]
    fn int_n() {
        let mut faker = PeopleFaker::new(42);
        for _ in 0..100 {
            assert!(faker.int_n(5) < 5);
        }
    }

    #[test]
    fn temp_db_path_lives_in_its_dir() -> anyhow::Result<()> {
        let (dir, path) = temp_db_path()?;
        assert!(path.starts_with(dir.path()));
        assert!(!path.exists());
        Ok(())
    }
}
