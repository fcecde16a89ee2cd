use tracing_subscriber::EnvFilter;

/// Installs the stderr subscriber used by the binaries. `RUST_LOG` overrides
/// the default `info` level. Returns `false` when a global subscriber was
/// already installed, which is then left in place.
pub fn init() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        Ok(()) => true,
        Err(err) => {
            tracing::debug!(error = %err, "tracing subscriber already installed; keeping it");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_keeps_existing_subscriber() {
        init();
        assert!(!init());
    }
}
