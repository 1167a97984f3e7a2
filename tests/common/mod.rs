//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use tiercache::traits::Cacheable;

pub const SNOWDEN_IMDB: &str = "tt3774114";
pub const AQUAMAN_IMDB: &str = "tt1477834";
pub const INCEPTION_IMDB: &str = "tt1375666";
pub const INTERSTELLAR_IMDB: &str = "tt0816692";
pub const ARRIVAL_IMDB: &str = "tt2543164";
pub const MARTIAN_IMDB: &str = "tt3659388";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Movie {
    pub title: String,
    pub year: u16,
    pub imdb: String,
}

impl Movie {
    pub fn new(title: &str, year: u16, imdb: &str) -> Self {
        Self {
            title: title.to_owned(),
            year,
            imdb: imdb.to_owned(),
        }
    }
}

impl Cacheable<String> for Movie {
    fn identifier(&self) -> String {
        self.imdb.clone()
    }
}

pub fn snowden() -> Movie {
    Movie::new("Snowden", 2016, SNOWDEN_IMDB)
}

pub fn aquaman() -> Movie {
    Movie::new("Aquaman", 2018, AQUAMAN_IMDB)
}

pub fn inception() -> Movie {
    Movie::new("Inception", 2010, INCEPTION_IMDB)
}

pub fn interstellar() -> Movie {
    Movie::new("Interstellar", 2014, INTERSTELLAR_IMDB)
}

pub fn arrival() -> Movie {
    Movie::new("Arrival", 2016, ARRIVAL_IMDB)
}

pub fn martian() -> Movie {
    Movie::new("The Martian", 2015, MARTIAN_IMDB)
}

pub fn sorted(mut movies: Vec<Movie>) -> Vec<Movie> {
    movies.sort();
    movies
}
