use crate::constants::PARAM_MARKER;
use crate::helpers;
use crate::route::{Handler, Route};
use crate::types::Params;
use crate::RouteConflict;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};
use std::fmt::{self, Debug, Formatter, Write};
use std::future::Future;
use std::sync::Arc;

enum Segment {
    Static(String),
    Param(String),
}

struct Node<B, E> {
    segment: Segment,
    route: Option<Arc<Route<B, E>>>,
    // Only static children live here, the param child is kept apart so that a literal
    // match is always tried first.
    children: Vec<Node<B, E>>,
    param_child: Option<Box<Node<B, E>>>,
    template: String,
}

impl<B, E> Node<B, E> {
    fn new(segment: Segment, template: String) -> Node<B, E> {
        Node {
            segment,
            route: None,
            children: Vec::new(),
            param_child: None,
            template,
        }
    }

    fn find_static(&self, token: &str) -> Option<&Node<B, E>> {
        self.children
            .iter()
            .find(|child| matches!(&child.segment, Segment::Static(literal) if literal == token))
    }

    // Returns the registered child for `token`, creating it when absent.
    fn insert_child(&mut self, token: &str, path: &str) -> Result<&mut Node<B, E>, RouteConflict> {
        if let Some(name) = token.strip_prefix(PARAM_MARKER) {
            let name = name.trim();
            if name.is_empty() {
                return Err(RouteConflict::EmptyParamName { path: path.to_owned() });
            }

            let template = format!("{}/{}{}", self.template, PARAM_MARKER, name);
            let child = self
                .param_child
                .get_or_insert_with(|| Box::new(Node::new(Segment::Param(name.to_owned()), template)));

            if let Segment::Param(existing) = &child.segment {
                if existing != name {
                    return Err(RouteConflict::ParamNameConflict {
                        path: path.to_owned(),
                        existing: existing.clone(),
                        conflicting: name.to_owned(),
                    });
                }
            }
            return Ok(&mut **child);
        }

        let idx = match self
            .children
            .iter()
            .position(|child| matches!(&child.segment, Segment::Static(literal) if literal == token))
        {
            Some(idx) => idx,
            None => {
                let template = format!("{}/{}", self.template, token);
                self.children.push(Node::new(Segment::Static(token.to_owned()), template));
                self.children.len() - 1
            }
        };

        Ok(&mut self.children[idx])
    }

    fn dump(&self, depth: usize, out: &mut String) {
        let indent = " ".repeat(depth);
        let _ = writeln!(out, "{} |", indent);
        match &self.segment {
            Segment::Static(literal) => {
                let _ = write!(out, "{}  -- {}", indent, literal);
            }
            Segment::Param(name) => {
                let _ = write!(out, "{}  -- {}{}", indent, PARAM_MARKER, name);
            }
        }
        if let Some(ref route) = self.route {
            let _ = write!(out, " (<{}>)", route.path);
        }
        out.push('\n');

        for child in &self.children {
            child.dump(depth + 1, out);
        }
        if let Some(ref child) = self.param_child {
            child.dump(depth + 1, out);
        }
    }
}

/// The outcome of matching a path against a [`RouteTree`].
///
/// Three cases are distinguished:
///
/// * a handler was found: `route` is set and `params` holds the captured values.
/// * the path leads to a node without a handler (a prefix of some longer route): `route` is `None` but
///   `template` names that node.
/// * the path leaves the tree: `route` is `None`, `params` is empty and `template` is `""`.
pub struct RouteMatch<'a, B, E> {
    pub route: Option<&'a Arc<Route<B, E>>>,
    pub params: Params,
    pub template: &'a str,
}

impl<'a, B, E> RouteMatch<'a, B, E> {
    fn missing() -> RouteMatch<'a, B, E> {
        RouteMatch {
            route: None,
            params: Params::new(),
            template: "",
        }
    }

    /// Whether a handler was found for the path.
    pub fn is_found(&self) -> bool {
        self.route.is_some()
    }
}

impl<B, E> Debug for RouteMatch<'_, B, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMatch")
            .field("found", &self.route.is_some())
            .field("params", &self.params)
            .field("template", &self.template)
            .finish()
    }
}

/// A routing trie for a single http method.
///
/// Paths are split on `/` after trimming the leading and trailing slashes. Each segment is either static
/// (literal text) or a param (`:name`), which captures whatever text sits at its position. A node has at most
/// one param child and, while matching, a static child with the identical text always wins over it:
/// with `/users/:id` and `/users/list` registered, `/users/list` resolves to the static route.
///
/// Registration must be finished before the tree is shared between requests.
///
/// # Examples
///
/// ```
/// use http_body_util::Full;
/// use hyper::{body::Bytes, Response};
/// use routetrie::RouteTree;
/// use std::convert::Infallible;
///
/// let mut tree: RouteTree<(), Infallible> = RouteTree::new();
/// tree.add("/users/:user/events", |_req, params| async move {
///     let user = params.get("user").unwrap_or_default().to_owned();
///     Ok(Response::new(Full::new(Bytes::from(user))))
/// })
/// .unwrap();
///
/// let found = tree.find("/users/vanng822/events/");
/// assert!(found.is_found());
/// assert_eq!(found.params.get("user"), Some("vanng822"));
/// assert_eq!(found.template, "/users/:user/events");
/// ```
pub struct RouteTree<B, E> {
    root: Node<B, E>,
    root_route: Option<Arc<Route<B, E>>>,
}

impl<B, E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static> RouteTree<B, E> {
    /// Registers a handler for `path`.
    ///
    /// Fails with a [`RouteConflict`] when the exact path already has a handler, when a param segment has no
    /// name, or when a param with a different name already occupies the same position.
    pub fn add<H, R>(&mut self, path: &str, handler: H) -> Result<(), RouteConflict>
    where
        H: Fn(Request<B>, Params) -> R + Send + Sync + 'static,
        R: Future<Output = Result<Response<Full<Bytes>>, E>> + Send + 'static,
    {
        self.insert(path, Route::boxed_handler(handler)).map(|_| ())
    }
}

impl<B, E> RouteTree<B, E> {
    /// Creates a tree without any route.
    pub fn new() -> RouteTree<B, E> {
        RouteTree {
            root: Node::new(Segment::Static(String::new()), String::new()),
            root_route: None,
        }
    }

    pub(crate) fn insert(&mut self, path: &str, handler: Handler<B, E>) -> Result<&Arc<Route<B, E>>, RouteConflict> {
        let segments = match helpers::path_segments(path) {
            Some(segments) => segments,
            None => {
                if self.root_route.is_some() {
                    return Err(RouteConflict::DuplicateRoute { path: path.to_owned() });
                }
                let route = self.root_route.insert(Arc::new(Route {
                    path: "/".to_owned(),
                    handler,
                }));
                return Ok(&*route);
            }
        };

        // Nothing is inserted unless the whole path fits.
        self.check(segments.clone(), path)?;

        let mut node = &mut self.root;
        for token in segments {
            node = node.insert_child(token, path)?;
        }

        let template = node.template.clone();
        Ok(&*node.route.insert(Arc::new(Route {
            path: template,
            handler,
        })))
    }

    fn check(&self, segments: std::str::Split<'_, char>, path: &str) -> Result<(), RouteConflict> {
        let mut node = Some(&self.root);
        for token in segments {
            let next = match token.strip_prefix(PARAM_MARKER) {
                Some(name) => {
                    let name = name.trim();
                    if name.is_empty() {
                        return Err(RouteConflict::EmptyParamName { path: path.to_owned() });
                    }
                    match node.and_then(|node| node.param_child.as_deref()) {
                        Some(Node {
                            segment: Segment::Param(existing),
                            ..
                        }) if existing != name => {
                            return Err(RouteConflict::ParamNameConflict {
                                path: path.to_owned(),
                                existing: existing.clone(),
                                conflicting: name.to_owned(),
                            });
                        }
                        child => child,
                    }
                }
                None => node.and_then(|node| node.find_static(token)),
            };
            node = next;
        }

        match node {
            Some(node) if node.route.is_some() => Err(RouteConflict::DuplicateRoute { path: path.to_owned() }),
            _ => Ok(()),
        }
    }

    /// Resolves `path` to its route, capturing the values of param segments on the way.
    pub fn find(&self, path: &str) -> RouteMatch<'_, B, E> {
        let mut params = Params::new();

        let segments = match helpers::path_segments(path) {
            Some(segments) => segments,
            None => {
                return RouteMatch {
                    route: self.root_route.as_ref(),
                    params,
                    template: "/",
                }
            }
        };

        let mut node = &self.root;
        for token in segments {
            if let Some(child) = node.find_static(token) {
                node = child;
                continue;
            }

            match node.param_child.as_deref() {
                Some(child) => {
                    if let Segment::Param(name) = &child.segment {
                        params.capture(name.as_str(), token);
                    }
                    node = child;
                }
                None => return RouteMatch::missing(),
            }
        }

        RouteMatch {
            route: node.route.as_ref(),
            params,
            template: node.template.as_str(),
        }
    }

    /// Whether no route at all has been registered.
    pub fn is_empty(&self) -> bool {
        self.root_route.is_none() && self.root.children.is_empty() && self.root.param_child.is_none()
    }

    /// Renders the tree for debugging, one node per line and indented by depth. Param nodes are shown as
    /// `:name` and nodes carrying a handler are suffixed with their route template.
    ///
    /// The output is meant for humans, not a stable format.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        if self.root_route.is_some() {
            out.push_str("/ (</>)\n");
        }
        self.root.dump(0, &mut out);
        out
    }
}

impl<B, E> Default for RouteTree<B, E> {
    fn default() -> Self {
        RouteTree::new()
    }
}

impl<B, E> Debug for RouteTree<B, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    type Tree = RouteTree<(), Infallible>;

    fn add(tree: &mut Tree, path: &str) -> Result<(), RouteConflict> {
        tree.add(path, |_, _| async { Ok(Response::new(Full::new(Bytes::new()))) })
    }

    #[test]
    fn should_reject_duplicate_route() {
        let mut tree = Tree::new();
        add(&mut tree, "/users/:user/events").unwrap();

        let err = add(&mut tree, "/users/:user/events/").unwrap_err();
        assert!(matches!(err, RouteConflict::DuplicateRoute { .. }));
    }

    #[test]
    fn should_reject_different_param_name() {
        let mut tree = Tree::new();
        add(&mut tree, "/users/:username/following/:target_user").unwrap();

        let err = add(&mut tree, "/users/:user/events").unwrap_err();
        assert_eq!(
            err,
            RouteConflict::ParamNameConflict {
                path: "/users/:user/events".to_owned(),
                existing: "username".to_owned(),
                conflicting: "user".to_owned(),
            }
        );
    }

    #[test]
    fn should_reject_empty_param_name() {
        let mut tree = Tree::new();
        let err = add(&mut tree, "/users/:/following").unwrap_err();
        assert!(matches!(err, RouteConflict::EmptyParamName { .. }));

        let err = add(&mut tree, "/users/: ").unwrap_err();
        assert!(matches!(err, RouteConflict::EmptyParamName { .. }));
    }

    #[test]
    fn should_register_index_once() {
        let mut tree = Tree::new();
        add(&mut tree, "/").unwrap();
        assert!(tree.root_route.is_some());

        let err = add(&mut tree, "").unwrap_err();
        assert!(matches!(err, RouteConflict::DuplicateRoute { .. }));
    }

    #[test]
    fn should_match_params() {
        let mut tree = Tree::new();
        add(&mut tree, "/users/:user/events").unwrap();
        add(&mut tree, "/repos/:owner/:repo/pulls/:number").unwrap();

        let found = tree.find("/users/vanng822/events");
        assert!(found.is_found());
        assert_eq!(found.params.get("user"), Some("vanng822"));
        assert_eq!(found.params.len(), 1);
        assert_eq!(found.template, "/users/:user/events");

        let found = tree.find("/repos/rust-lang/rust/pulls/1");
        assert_eq!(found.params.get("owner"), Some("rust-lang"));
        assert_eq!(found.params.get("repo"), Some("rust"));
        assert_eq!(found.params.get("number"), Some("1"));
        assert_eq!(found.route.unwrap().path(), "/repos/:owner/:repo/pulls/:number");
    }

    #[test]
    fn should_match_index() {
        let mut tree = Tree::new();
        add(&mut tree, "/").unwrap();

        let found = tree.find("/");
        assert!(found.is_found());
        assert!(found.params.is_empty());
        assert_eq!(found.template, "/");
    }

    #[test]
    fn should_not_find_missing_index() {
        let mut tree = Tree::new();
        add(&mut tree, "/testing").unwrap();

        let found = tree.find("/");
        assert!(!found.is_found());
        assert_eq!(found.template, "/");
    }

    #[test]
    fn should_not_match_outside_the_tree() {
        let mut tree = Tree::new();
        add(&mut tree, "/users/:user/events").unwrap();

        let found = tree.find("/users/vanng822/orgs");
        assert!(!found.is_found());
        assert!(found.params.is_empty());
        assert_eq!(found.template, "");
    }

    #[test]
    fn should_keep_template_for_handlerless_prefix() {
        let mut tree = Tree::new();
        add(&mut tree, "/users/:user/events").unwrap();

        let found = tree.find("/users/vanng822");
        assert!(!found.is_found());
        assert_eq!(found.template, "/users/:user");
        assert_eq!(found.params.get("user"), Some("vanng822"));
    }

    #[test]
    fn should_prefer_static_over_param() {
        for order in [["/users/:id", "/users/list"], ["/users/list", "/users/:id"]] {
            let mut tree = Tree::new();
            add(&mut tree, order[0]).unwrap();
            add(&mut tree, order[1]).unwrap();

            let found = tree.find("/users/list");
            assert_eq!(found.route.unwrap().path(), "/users/list");
            assert!(!found.params.has("id"));

            let found = tree.find("/users/42");
            assert_eq!(found.route.unwrap().path(), "/users/:id");
            assert_eq!(found.params.get("id"), Some("42"));
        }
    }

    #[test]
    fn should_trim_slashes() {
        let mut tree = Tree::new();
        add(&mut tree, "/user/keys/").unwrap();

        assert_eq!(tree.find("/user/keys").template, "/user/keys");
        assert_eq!(tree.find("/user/keys/").template, "/user/keys");
        assert!(tree.find("user/keys").is_found());
    }

    #[test]
    fn should_allow_param_as_first_segment() {
        let mut tree = Tree::new();
        add(&mut tree, "/:page").unwrap();
        add(&mut tree, "/user/keys/:id").unwrap();

        assert_eq!(tree.find("/testing").params.get("page"), Some("testing"));
        assert_eq!(tree.find("/user/keys/testing").params.get("id"), Some("testing"));
        assert!(!tree.find("/user").is_found());
    }

    #[test]
    fn should_dump_tree() {
        let mut tree = Tree::new();
        add(&mut tree, "/:page").unwrap();

        assert!(tree.dump().contains(" |\n  -- \n  |\n   -- :page (</:page>)"));
    }

    #[test]
    fn should_leave_tree_untouched_on_conflict() {
        let mut tree = Tree::new();
        add(&mut tree, "/users/:id").unwrap();
        add(&mut tree, "/users/:id/repos").unwrap();
        let before = tree.dump();

        let err = add(&mut tree, "/new/path/:").unwrap_err();
        assert!(matches!(err, RouteConflict::EmptyParamName { .. }));
        assert_eq!(tree.find("/new/path").template, "");

        let err = add(&mut tree, "/users/:id/stars/: ").unwrap_err();
        assert!(matches!(err, RouteConflict::EmptyParamName { .. }));
        assert_eq!(tree.find("/users/7/stars").template, "");

        let err = add(&mut tree, "/users/:name/stars").unwrap_err();
        assert!(matches!(err, RouteConflict::ParamNameConflict { .. }));
        assert_eq!(tree.find("/users/7/stars").template, "");

        let err = add(&mut tree, "/users/:id/repos/").unwrap_err();
        assert!(matches!(err, RouteConflict::DuplicateRoute { .. }));

        assert_eq!(tree.dump(), before);
    }
}
