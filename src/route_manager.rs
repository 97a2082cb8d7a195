use crate::Error;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

// Characters escaped inside a single path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Maps route names to path templates and builds urls back from them.
///
/// # Examples
///
/// ```
/// use routetrie::RouteManager;
///
/// let mut rm = RouteManager::new();
/// rm.set_base_url("https://example.com/");
/// rm.add("user", "/users/:id").unwrap();
///
/// let url = rm.url_for("user", [("id", "42"), ("tab", "repos")]).unwrap();
/// assert_eq!(url, "https://example.com/users/42?tab=repos");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteManager {
    base_url: String,
    routes: HashMap<String, String>,
}

impl RouteManager {
    /// Creates an empty manager without base url.
    pub fn new() -> RouteManager {
        RouteManager::default()
    }

    /// Prefix of every url built afterwards. Trailing slashes are dropped.
    pub fn set_base_url<S: AsRef<str>>(&mut self, base_url: S) {
        self.base_url = base_url.as_ref().trim_end_matches('/').to_owned();
    }

    /// Registers `path` under `name` and returns it, so registration can be chained into a route:
    /// `builder.get(rm.add("user", "/users/:id")?, handler)`.
    pub fn add<N: Into<String>, P: Into<String>>(&mut self, name: N, path: P) -> Result<&str, Error> {
        let name = name.into();
        if self.routes.contains_key(&name) {
            return Err(Error::DuplicateRouteName(name));
        }

        let path = path.into();
        debug!(name = %name, path = %path, "registered route name");
        Ok(self.routes.entry(name).or_insert(path).as_str())
    }

    /// The path template registered under `name`.
    pub fn path_for(&self, name: &str) -> Result<&str, Error> {
        self.routes
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownRouteName(name.to_owned()))
    }

    /// Builds the url of the route registered under `name`. See [`url_for_path`](#method.url_for_path).
    pub fn url_for<I, K, V>(&self, name: &str, params: I) -> Result<String, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.url_for_path(self.path_for(name)?, params)
    }

    /// Builds an url from a path template.
    ///
    /// Every `:key` segment takes the single value given for `key`; a key given zero or several times fails
    /// with [`Error::MissingParam`]. The remaining params become the query string, sorted by key.
    pub fn url_for_path<I, K, V>(&self, path: &str, params: I) -> Result<String, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut values: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (key, val) in params {
            values.entry(key.into()).or_default().push(val.into());
        }

        let mut parts = Vec::new();
        let mut used = Vec::new();
        for segment in path.split('/') {
            let key = match segment.strip_prefix(':') {
                Some(key) => key,
                None => {
                    parts.push(segment.to_owned());
                    continue;
                }
            };

            match values.get(key).map(Vec::as_slice) {
                Some([val]) => {
                    parts.push(utf8_percent_encode(val, SEGMENT).to_string());
                    used.push(key);
                }
                _ => {
                    return Err(Error::MissingParam {
                        path: path.to_owned(),
                        param: key.to_owned(),
                    })
                }
            }
        }
        for key in used {
            values.remove(key);
        }

        let mut url = format!("{}{}", self.base_url, parts.join("/"));
        if !values.is_empty() {
            let mut query = form_urlencoded::Serializer::new(String::new());
            for (key, vals) in &values {
                for val in vals {
                    query.append_pair(key, val);
                }
            }
            url.push('?');
            url.push_str(&query.finish());
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_fill_params() {
        let mut rm = RouteManager::new();
        rm.add("some::for", "/some/:key/for").unwrap();

        assert_eq!(rm.url_for("some::for", [("key", "100")]).unwrap(), "/some/100/for");
        assert_eq!(rm.url_for("some::for", [("key", "10.5")]).unwrap(), "/some/10.5/for");
        assert_eq!(rm.url_for("some::for", [("key", "thing")]).unwrap(), "/some/thing/for");
    }

    #[test]
    fn should_append_sorted_query() {
        let mut rm = RouteManager::new();
        rm.set_base_url("http://localhost:8080//");
        rm.add("repo", "/users/:user/repos/:repo").unwrap();

        let url = rm
            .url_for("repo", [("user", "alice"), ("zeta", "1"), ("repo", "x"), ("alpha", "a b"), ("zeta", "2")])
            .unwrap();
        assert_eq!(url, "http://localhost:8080/users/alice/repos/x?alpha=a+b&zeta=1&zeta=2");
    }

    #[test]
    fn should_escape_path_values() {
        let rm = RouteManager::new();
        assert_eq!(rm.url_for_path("/files/:name", [("name", "a/b c")]).unwrap(), "/files/a%2Fb%20c");
    }

    #[test]
    fn should_reuse_value_for_repeated_key() {
        let rm = RouteManager::new();
        let url = rm.url_for_path("/a/:id/b/:id", [("id", "9"), ("page", "2")]).unwrap();
        assert_eq!(url, "/a/9/b/9?page=2");
    }

    #[test]
    fn should_reject_missing_or_repeated_param() {
        let rm = RouteManager::new();
        let no_params: [(&str, &str); 0] = [];
        assert!(matches!(
            rm.url_for_path("/users/:id", no_params),
            Err(Error::MissingParam { ref param, .. }) if param == "id"
        ));
        assert!(matches!(
            rm.url_for_path("/users/:id", [("id", "1"), ("id", "2")]),
            Err(Error::MissingParam { .. })
        ));
    }

    #[test]
    fn should_reject_unknown_and_duplicate_names() {
        let mut rm = RouteManager::new();
        assert_eq!(rm.add("user", "/users/:id").unwrap(), "/users/:id");
        assert!(matches!(rm.add("user", "/other"), Err(Error::DuplicateRouteName(ref name)) if name == "user"));
        assert_eq!(rm.path_for("user").unwrap(), "/users/:id");
        assert!(matches!(rm.path_for("nope"), Err(Error::UnknownRouteName(_))));
    }
}
