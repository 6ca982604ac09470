use crate::error::FetchError;

/// Cut `content` down to `limit` characters, ending in `...` when shortened
pub fn truncate(content: &str, limit: usize) -> String {
    if content.chars().count() <= limit {
        return content.to_string();
    }
    let kept: String = content.chars().take(limit.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Run a CPU-bound function on the blocking pool and await its result
pub async fn offload<F, T>(work: F) -> Result<T, FetchError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| FetchError::Worker(e.to_string()))
}

/// Format a number without a trailing `.0` when it is integral
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
