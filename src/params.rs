//! Plugin parameter parsing
//!
//! protoc passes everything after `--go-dep_out=` and before `:` as a single
//! string, e.g. `quiet,paths=source_relative,tenant_param=tenant`.

use crate::naming::PathsMode;
use std::collections::BTreeMap;

/// Parameter key suppressing non-fatal diagnostics
pub const QUIET: &str = "quiet";

/// Parameter key selecting the output path layout
pub const PATHS: &str = "paths";

/// Parameter key naming the chi route parameter that carries the tenant
pub const TENANT_PARAM: &str = "tenant_param";

/// Parameter key naming the request-context key of the `*sql.DB` handle
pub const DB_CONTEXT_KEY: &str = "db_context_key";

const DEFAULT_TENANT_PARAM: &str = "id";
const DEFAULT_DB_CONTEXT_KEY: &str = "db";

/// Split a parameter string into key/value pairs
///
/// Tokens are separated by `,` and split on their first `=`, so values may
/// contain `=`. Bare keys map to an empty value. Parsing never fails.
pub fn parse_parameter(param: &str) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    if param.is_empty() {
        return map;
    }

    for token in param.split(',') {
        let (key, value) = token.split_once('=').unwrap_or((token, ""));
        map.insert(key.to_string(), value.to_string());
    }

    map
}

/// Configuration for a single generator run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    /// Suppress non-fatal diagnostics
    pub quiet: bool,
    /// Output path layout
    pub paths: PathsMode,
    /// chi route parameter holding the tenant identifier
    pub tenant_param: String,
    /// Request-context key under which handlers find the `*sql.DB`
    pub db_context_key: String,
    /// Every parsed parameter, recognized or not
    pub params: BTreeMap<String, String>,
    /// Problems found while interpreting recognized keys
    pub warnings: Vec<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            quiet: false,
            paths: PathsMode::default(),
            tenant_param: DEFAULT_TENANT_PARAM.to_string(),
            db_context_key: DEFAULT_DB_CONTEXT_KEY.to_string(),
            params: BTreeMap::new(),
            warnings: Vec::new(),
        }
    }
}

impl GenerationConfig {
    /// Build the configuration from the raw plugin parameter
    pub fn from_parameter(param: &str) -> Self {
        let params = parse_parameter(param);
        let mut config = GenerationConfig {
            quiet: params.contains_key(QUIET),
            ..Default::default()
        };

        if let Some(value) = params.get(PATHS) {
            match PathsMode::parse(value) {
                Some(paths) => config.paths = paths,
                None => config.warnings.push(format!(
                    "unknown paths mode {:?}, falling back to \"import\"",
                    value
                )),
            }
        }

        if let Some(value) = params.get(TENANT_PARAM).filter(|v| !v.is_empty()) {
            config.tenant_param = value.clone();
        }

        if let Some(value) = params.get(DB_CONTEXT_KEY).filter(|v| !v.is_empty()) {
            config.db_context_key = value.clone();
        }

        config.params = params;
        config
    }

    /// Look up a raw parameter, including keys this generator does not use
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}
