use std::any::Any;
use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};

/// The per-request parameter bag.
///
/// It holds the values captured from `:name` segments of the matched route, and an application scoped
/// store through which middleware can forward data (e.g. an authenticated user) to the ones after it and
/// to the route handler.
///
/// A fresh bag is created on every match attempt and dropped when the request is done. The captured
/// values are read-only for everyone except the router.
///
/// # Examples
///
/// ```
/// use routetrie::Params;
///
/// let mut params = Params::new();
/// params.app_set("user_id", 42_u64);
///
/// assert_eq!(params.app_get::<u64>("user_id"), Some(&42));
/// assert!(!params.has("id"));
/// ```
#[derive(Default)]
pub struct Params {
    captured: HashMap<String, String>,
    app_data: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl Params {
    /// Creates an empty bag.
    pub fn new() -> Params {
        Params::default()
    }

    pub(crate) fn capture<N: Into<String>, V: Into<String>>(&mut self, name: N, value: V) {
        self.captured.insert(name.into(), value.into());
    }

    /// Returns the captured path value for the route param `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.captured.get(name).map(String::as_str)
    }

    /// Checks whether a value was captured for the route param `name`.
    pub fn has(&self, name: &str) -> bool {
        self.captured.contains_key(name)
    }

    /// Iterates over the captured `(name, value)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.captured.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of captured route params.
    pub fn len(&self) -> usize {
        self.captured.len()
    }

    /// Whether no route param was captured. Application data is not counted.
    pub fn is_empty(&self) -> bool {
        self.captured.is_empty()
    }

    /// Stores application data under `key`, replacing any previous value.
    pub fn app_set<K: Into<String>, T: Any + Send + Sync>(&mut self, key: K, val: T) {
        self.app_data.insert(key.into(), Box::new(val));
    }

    /// Returns the application data stored under `key` if it exists and is a `T`.
    pub fn app_get<T: Any + Send + Sync>(&self, key: &str) -> Option<&T> {
        self.app_data.get(key).and_then(|val| val.downcast_ref::<T>())
    }

    /// Mutable access to the application data stored under `key` if it exists and is a `T`.
    pub fn app_get_mut<T: Any + Send + Sync>(&mut self, key: &str) -> Option<&mut T> {
        self.app_data.get_mut(key).and_then(|val| val.downcast_mut::<T>())
    }

    /// Checks whether any application data is stored under `key`, whatever its type.
    pub fn app_has(&self, key: &str) -> bool {
        self.app_data.contains_key(key)
    }

    /// Removes and returns the application data stored under `key` if it is a `T`.
    pub fn app_remove<T: Any + Send + Sync>(&mut self, key: &str) -> Option<T> {
        match self.app_data.get(key) {
            Some(val) if val.is::<T>() => self
                .app_data
                .remove(key)
                .and_then(|val| val.downcast::<T>().ok())
                .map(|val| *val),
            _ => None,
        }
    }
}

impl Debug for Params {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.app_data.keys().collect();
        keys.sort();
        f.debug_struct("Params")
            .field("captured", &self.captured)
            .field("app_keys", &keys)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_return_captured_values() {
        let mut params = Params::new();
        params.capture("user", "vanng822");

        assert_eq!(params.get("user"), Some("vanng822"));
        assert!(params.has("user"));
        assert_eq!(params.get("id"), None);
        assert!(!params.has("id"));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn should_keep_app_data_apart_from_captured_values() {
        let mut params = Params::new();
        params.capture("id", "1");
        params.app_set("id", String::from("app"));

        assert_eq!(params.get("id"), Some("1"));
        assert_eq!(params.app_get::<String>("id").map(String::as_str), Some("app"));
    }

    #[test]
    fn should_downcast_app_data_by_type() {
        let mut params = Params::new();
        params.app_set("count", 3_u32);

        assert!(params.app_has("count"));
        assert_eq!(params.app_get::<u32>("count"), Some(&3));
        assert_eq!(params.app_get::<u64>("count"), None);

        *params.app_get_mut::<u32>("count").unwrap() += 1;
        assert_eq!(params.app_remove::<u64>("count"), None);
        assert_eq!(params.app_remove::<u32>("count"), Some(4));
        assert!(!params.app_has("count"));
    }
}
