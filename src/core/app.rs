//! Application identity from Cargo.toml.

/// Application name (from Cargo.toml `package.name`).
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Application version (from Cargo.toml `package.version`).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent sent to the GitHub API, which rejects requests without one.
pub fn user_agent() -> String {
    format!("{}/{}", NAME, VERSION)
}
