use anyhow::Result;
use tracing::Span;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[cfg(feature = "http-1")]
pub mod http_layer;

/// Install the global subscriber. `filter` is a RUST_LOG compatible
/// directive string. An unparsable filter is an error.
pub fn init(filter: String) -> Result<()> {
    let env_filter = EnvFilter::try_new(&filter)?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;

    tracing::info!(filter, "custom tracing installed");

    Ok(())
}

/// Record `value` into `field` of the current span. The field must have been
/// declared (usually as `tracing::field::Empty`) when the span was created.
pub fn record<T>(field: &str, value: T)
where
    T: std::fmt::Display,
{
    Span::current().record(field, &tracing::field::display(value));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparsable_filter() {
        assert!(init("check_ins=notalevel".to_string()).is_err());
    }
}
