use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::rate_limit::RateLimitPolicy;

// CLI argument structure, every flag can also come from the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "site-api")]
#[command(about = "API routes for the marketing site: analytics, search, feedback and contact")]
pub struct Args {
    // Address to bind
    #[arg(long, env = "SITE_API_HOST", default_value = "0.0.0.0")]
    pub host: String,

    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    // Chatbot analytics: max requests per client per window
    #[arg(long, env = "SITE_API_RATE_LIMIT", default_value_t = 30,
          value_parser = clap::value_parser!(u32).range(1..))]
    pub rate_limit: u32,

    // Rate limit window in milliseconds
    #[arg(long, env = "SITE_API_RATE_WINDOW_MS", default_value_t = 60_000,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub rate_window_ms: u64,

    // How often expired rate limit records are swept, in seconds
    #[arg(long, env = "SITE_API_SWEEP_INTERVAL", default_value_t = 60,
          value_parser = clap::value_parser!(u64).range(1..))]
    pub sweep_interval: u64,

    // JSON file with the search catalog; the built-in catalog is used when absent
    #[arg(long, env = "SITE_API_CONTENT_INDEX")]
    pub content_index: Option<PathBuf>,

    // Emit logs as JSON lines
    #[arg(long, env = "SITE_API_LOG_JSON")]
    pub log_json: bool,
}

impl Args {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn rate_limit_policy(&self) -> RateLimitPolicy {
        RateLimitPolicy {
            max_per_window: self.rate_limit,
            window: Duration::from_millis(self.rate_window_ms),
        }
    }

    pub fn sweep_every(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }
}
