pub mod hashmap;
pub mod traits;
