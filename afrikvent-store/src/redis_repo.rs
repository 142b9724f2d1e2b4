use redis::RedisResult;

/// Fixed-window request counter keyed by client address.
#[derive(Clone)]
pub struct RedisClient {
    client: redis::Client,
}

impl RedisClient {
    pub async fn new(connection_string: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(connection_string)?;
        Ok(Self { client })
    }

    /// Count one request for `client_key`; `true` while still under `limit` for the window.
    /// The window starts with the first request and is not extended by later ones.
    pub async fn check_rate_limit(&self, client_key: &str, limit: i64, window_seconds: i64) -> RedisResult<bool> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let count: i64 = redis::Script::new(FIXED_WINDOW_SCRIPT)
            .key(rate_limit_key(client_key))
            .arg(window_seconds)
            .invoke_async(&mut conn)
            .await?;

        Ok(count <= limit)
    }
}

// EXPIRE only on the first hit of a window.
const FIXED_WINDOW_SCRIPT: &str = r#"
    local count = redis.call("INCR", KEYS[1])
    if count == 1 then
        redis.call("EXPIRE", KEYS[1], ARGV[1])
    end
    return count
"#;

fn rate_limit_key(client_key: &str) -> String {
    format!("afrikvent:ratelimit:{}", client_key)
}
