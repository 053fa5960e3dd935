//! Request parameters
//!
//! The host passes the current request's parameters explicitly; nothing is
//! read from process-global state.

use crate::errors::ModuleError;
use ahash::AHashMap;
use tracing::debug;

/// Request parameter carrying the project id
pub const PROJECT_ID_PARAM: &str = "pid";
/// Request parameter carrying the event id
pub const EVENT_ID_PARAM: &str = "event_id";
/// Request parameter carrying the repeat instance number
pub const INSTANCE_PARAM: &str = "instance";

/// String-keyed parameters of the current request
#[derive(Debug, Clone, Default)]
pub struct RequestParams {
    values: AHashMap<String, String>,
}

impl RequestParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.values.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Integer value of a parameter; non-numeric text counts as absent
    pub fn get_id(&self, name: &str) -> Option<i64> {
        let raw = self.get(name)?;
        match raw.trim().parse::<i64>() {
            Ok(id) => Some(id),
            Err(_) => {
                debug!("Ignoring non-numeric '{}' parameter: {:?}", name, raw);
                None
            }
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RequestParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = RequestParams::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

/// Explicit value if given, else the request parameter, else nothing
pub fn detect(explicit: Option<i64>, params: &RequestParams, name: &str) -> Option<i64> {
    explicit.or_else(|| params.get_id(name))
}

/// Like [`detect`], but a missing value is an error
pub fn require(explicit: Option<i64>, params: &RequestParams, name: &str) -> Result<i64, ModuleError> {
    detect(explicit, params, name).ok_or_else(|| ModuleError::MissingRequiredParameter {
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_wins() {
        let params = RequestParams::new().with(PROJECT_ID_PARAM, "42");
        assert_eq!(detect(Some(7), &params, PROJECT_ID_PARAM), Some(7));
        assert_eq!(detect(None, &params, PROJECT_ID_PARAM), Some(42));
        assert_eq!(detect(None, &params, EVENT_ID_PARAM), None);
    }

    #[test]
    fn test_require_missing() {
        let err = require(None, &RequestParams::new(), INSTANCE_PARAM);
        assert!(matches!(
            err,
            Err(ModuleError::MissingRequiredParameter { ref name }) if name == "instance"
        ));
        assert!(err.is_err_and(|e| e.to_string().contains("You must supply")));
    }

    #[test]
    fn test_non_numeric_parameter_is_absent() {
        let params: RequestParams = [("pid", "abc"), ("event_id", " 12 ")].into_iter().collect();
        assert_eq!(params.get("pid"), Some("abc"));
        assert_eq!(params.get_id("pid"), None);
        assert_eq!(params.get_id("event_id"), Some(12));
    }
}
