// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Expands a leading `~/` in configured paths.

use serde::Deserialize;
use std::path::PathBuf;

pub fn deserialize_expanded_path<'de, D>(deserializer: D) -> Result<Option<PathBuf>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.map(|s| expand_home(&s, std::env::var_os("HOME").map(PathBuf::from))))
}

fn expand_home(path: &str, home: Option<PathBuf>) -> PathBuf {
    match (path.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
