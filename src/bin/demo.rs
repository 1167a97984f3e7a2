//! Two-level cache walkthrough over a small movie catalogue.
//!
//! Run with: RUST_LOG=debug cargo run --features demo --bin tiercache-demo

use std::env;
use std::fmt;
use std::path::PathBuf;

use anyhow::{Result, bail};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;
use uuid::Uuid;

use tiercache::builder::{DurableTwoLevelCache, TwoLevelCacheBuilder};
use tiercache::dirs::remove_dir_best_effort;
use tiercache::traits::{Cache, Cacheable, Countable};

const FIRST_LEVEL_CAPACITY: usize = 3;
const SECOND_LEVEL_CAPACITY: usize = 10;
// Two entries leave level 1 each time it fills up.
const FIRST_LEVEL_EVICTION_FACTOR: f32 = 0.5;
const SECOND_LEVEL_EVICTION_FACTOR: f32 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Movie {
    title: String,
    year: u16,
    imdb: String,
}

impl Movie {
    fn new(title: &str, year: u16, imdb: &str) -> Self {
        Self {
            title: title.to_owned(),
            year,
            imdb: imdb.to_owned(),
        }
    }

    fn random() -> Self {
        let year = rand::rng().random_range(1930..2030);
        Self {
            title: Uuid::new_v4().to_string(),
            year,
            imdb: Uuid::new_v4().to_string(),
        }
    }
}

impl Cacheable<String> for Movie {
    fn identifier(&self) -> String {
        self.imdb.clone()
    }
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) [{}]", self.title, self.year, self.imdb)
    }
}

fn catalogue() -> Vec<Movie> {
    vec![
        Movie::new("Arrival", 2016, "tt2543164"),
        Movie::new("Aquaman", 2018, "tt1477834"),
        Movie::new("Inception", 2010, "tt1375666"),
        Movie::new("Interstellar", 2014, "tt0816692"),
        Movie::new("The Martian", 2015, "tt3659388"),
        Movie::new("Snowden", 2016, "tt3774114"),
    ]
}

type MovieCache = DurableTwoLevelCache<String, Movie>;

fn fill(cache: &mut MovieCache, level: &str, movies: &[Movie]) -> Result<()> {
    info!(level, "filling the cache");
    for movie in movies {
        info!(%movie, "adding movie");
        let evicted = cache.put_value(movie.clone())?;
        if !evicted.is_empty() {
            bail!("unexpected eviction while adding {movie}");
        }
    }
    Ok(())
}

fn probe(cache: &mut MovieCache, level: &str) -> Result<()> {
    info!(level, "probing the cache");
    for movie in catalogue() {
        let id = movie.identifier();
        match cache.get(&id)? {
            Some(found) => info!(movie = %found, "cache hit"),
            None => warn!(%movie, "cache miss"),
        }
    }
    Ok(())
}

fn bump_frequency(cache: &mut MovieCache) -> Result<()> {
    let id = catalogue()[0].identifier();
    let Some(movie) = cache.get(&id)? else {
        bail!("first level lost movie {id}");
    };
    info!(
        %movie,
        frequency = cache.frequency_of(&id)?,
        "frequency raised on first level"
    );
    Ok(())
}

fn fill_with_eviction(cache: &mut MovieCache) -> Result<()> {
    let total = FIRST_LEVEL_CAPACITY + SECOND_LEVEL_CAPACITY;
    let count = total.abs_diff(catalogue().len()) + 1;
    info!(count, "filling past capacity");
    for _ in 0..count {
        let movie = Movie::random();
        info!(%movie, "adding movie");
        for evicted in cache.put_value(movie)? {
            info!(movie = %evicted, "evicted from the cache");
        }
    }
    Ok(())
}

fn run(base_directory: PathBuf) -> Result<()> {
    info!(
        base_directory = %base_directory.display(),
        first_level_capacity = FIRST_LEVEL_CAPACITY,
        second_level_capacity = SECOND_LEVEL_CAPACITY,
        "initializing the cache"
    );
    let mut cache: MovieCache = TwoLevelCacheBuilder::new()
        .first_level_capacity(FIRST_LEVEL_CAPACITY)
        .first_level_eviction_factor(FIRST_LEVEL_EVICTION_FACTOR)
        .second_level_capacity(SECOND_LEVEL_CAPACITY)
        .second_level_eviction_factor(SECOND_LEVEL_EVICTION_FACTOR)
        .base_directory(base_directory)
        .build()?;

    let movies = catalogue();
    fill(&mut cache, "first", &movies[..FIRST_LEVEL_CAPACITY])?;
    probe(&mut cache, "first")?;
    bump_frequency(&mut cache)?;
    fill(&mut cache, "second", &movies[FIRST_LEVEL_CAPACITY..])?;
    probe(&mut cache, "second")?;
    fill_with_eviction(&mut cache)?;

    info!(
        size = cache.len(),
        first_level = cache.first_level().len(),
        second_level = cache.second_level().len(),
        "done"
    );
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let base_directory = env::temp_dir().join(format!("tiercache-demo-{}", Uuid::new_v4()));
    let result = run(base_directory.clone());
    remove_dir_best_effort(&base_directory);
    result
}
