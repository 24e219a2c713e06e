mod handler;
mod model;

pub use handler::{generate_excuse, search_excuses};
pub use model::{
    DEFAULT_CATEGORY, ExcuseGenerator, PAGE_SIZE, generate, search, warm_search_cache,
};
