use std::sync::Arc;

use crate::rate_limit::RateLimiter;
use crate::search::SearchIndex;

// app's shared state
pub struct AppState {
    pub rate_limiter: Arc<RateLimiter>, // shared with the sweeper task
    pub search_index: SearchIndex,      // read-only after startup
}

impl AppState {
    pub fn new(rate_limiter: RateLimiter, search_index: SearchIndex) -> Self {
        Self {
            rate_limiter: Arc::new(rate_limiter),
            search_index,
        }
    }
}
