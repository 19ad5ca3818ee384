//! Region resolution.
//!
//! An explicit region wins; then `AWS_REGION`, then `AWS_DEFAULT_REGION`;
//! then the first `region` line of `~/.aws/config`; then `us-east-1`.

use std::path::{Path, PathBuf};

use tracing::debug;

/// Region used when nothing else is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Resolve the region against the process environment.
#[must_use]
pub fn resolve_region(explicit: Option<&str>) -> String {
    resolve_region_with(
        explicit,
        |name| std::env::var(name).ok(),
        dyno_auth::home_dir(),
    )
}

/// Resolve the region with an explicit environment lookup and home directory.
pub fn resolve_region_with(
    explicit: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
    home: Option<PathBuf>,
) -> String {
    if let Some(region) = explicit.filter(|r| !r.is_empty()) {
        return region.to_owned();
    }

    for name in ["AWS_REGION", "AWS_DEFAULT_REGION"] {
        if let Some(region) = env(name).filter(|r| !r.is_empty()) {
            debug!(variable = name, region = %region, "region from environment");
            return region;
        }
    }

    if let Some(region) = home
        .map(|h| h.join(".aws").join("config"))
        .and_then(|path| read_config_region(&path))
    {
        debug!(region = %region, "region from shared config");
        return region;
    }

    DEFAULT_REGION.to_owned()
}

fn read_config_region(path: &Path) -> Option<String> {
    let text = std::fs::read_to_string(path).ok()?;
    parse_config_region(&text)
}

/// The value of the first `region = ...` line, regardless of profile.
#[must_use]
pub fn parse_config_region(text: &str) -> Option<String> {
    text.lines().find_map(|line| {
        let (key, value) = line.trim().split_once('=')?;
        (key.trim() == "region")
            .then(|| value.trim().to_owned())
            .filter(|v| !v.is_empty())
    })
}
