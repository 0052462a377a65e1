//! # Tracing
//!
//! [`setup_tracing`] installs a compact `tracing_subscriber` formatter filtered by
//! `RUST_LOG`:
//!
//! ```bash
//! RUST_LOG=info cargo run              # one line per request outcome
//! RUST_LOG=debug cargo run -- phone    # full drafts and URLs
//! ```
//!
//! Service calls run inside `#[instrument]` spans, so a request's log lines carry the
//! product id they concern:
//!
//! ```text
//! INFO update{id="P1"}: Updating product
//! INFO Product updated id="P1"
//! INFO Loaded products count=12 kind=Load
//! ```

pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
