use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber. `RUST_LOG` adds to the default `wiki_scrape=info`.
pub fn init() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("wiki_scrape=info".parse()?))
        .init();
    Ok(())
}
