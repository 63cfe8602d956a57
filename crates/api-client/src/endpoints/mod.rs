//! Source adapters
//!
//! | Module | Upstream | Engine interface |
//! |--------|----------|------------------|
//! | `open_food_facts` | `GET /cgi/search.pl` | [`foodsearch_engine::ExternalFoodSource`] |
//! | `food_store` | `GET /{table}?{column}=eq.{term}` (PostgREST) | [`foodsearch_engine::LocalFoodStore`] |

pub mod food_store;
pub mod open_food_facts;

pub use food_store::PostgrestFoodStore;
pub use open_food_facts::OpenFoodFactsSource;
