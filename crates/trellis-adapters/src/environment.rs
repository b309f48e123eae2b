//! Process environment as a property source.

use std::collections::BTreeMap;
use std::ffi::OsString;

use tracing::debug;

use trellis_core::domain::{
    ConfigurableEnvironment, MapPropertySource, PropertySource, StandardEnvironment,
};

/// Name of the source holding process environment variables.
pub const SYSTEM_ENVIRONMENT: &str = "systemEnvironment";

/// Build the system environment source from `vars`.
///
/// Every variable is also reachable under a relaxed name: lowercased with
/// `_` replaced by `.`, so `APP_NAME` answers `app.name`. Exact names win
/// over relaxed ones.
pub fn system_environment_from<I, K, V>(vars: I) -> PropertySource
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let exact: BTreeMap<String, String> = vars
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect();

    let mut properties = BTreeMap::new();
    for (key, value) in &exact {
        let relaxed = key.to_ascii_lowercase().replace('_', ".");
        if !exact.contains_key(&relaxed) {
            properties.insert(relaxed, value.clone());
        }
    }
    properties.extend(exact);

    MapPropertySource::new(SYSTEM_ENVIRONMENT, properties).into()
}

/// Build the system environment source from raw OS pairs.
///
/// Variables whose name or value is not valid Unicode are left out.
pub fn system_environment_from_os<I>(vars: I) -> PropertySource
where
    I: IntoIterator<Item = (OsString, OsString)>,
{
    system_environment_from(vars.into_iter().filter_map(|(key, value)| {
        match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => Some((key, value)),
            (key, _) => {
                let key = key.unwrap_or_else(|raw| raw.to_string_lossy().into_owned());
                debug!(variable = %key, "Skipping environment variable that is not valid Unicode");
                None
            }
        }
    }))
}

/// Snapshot of the current process environment.
pub fn system_environment() -> PropertySource {
    system_environment_from_os(std::env::vars_os())
}

/// A [`StandardEnvironment`] with the process environment as its last source.
pub fn standard_environment() -> StandardEnvironment {
    let mut environment = StandardEnvironment::new();
    environment
        .property_sources_mut()
        .add_last(system_environment());
    environment
}
