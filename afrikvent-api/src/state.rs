use std::sync::Arc;
use afrikvent_banner::DisplayGateway;
use afrikvent_store::app_config::RateLimitConfig;
use afrikvent_store::RedisClient;

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<DisplayGateway>,
    /// `None` disables rate limiting.
    pub redis: Option<Arc<RedisClient>>,
    pub rate_limit: RateLimitConfig,
    pub default_limit: Option<usize>,
}

impl AppState {
    pub fn new(gateway: DisplayGateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
            redis: None,
            rate_limit: RateLimitConfig::default(),
            default_limit: None,
        }
    }
}
