//! [`Router`](crate::Router) is a lightweight high performance request router.
//!
//! The router matches an incoming `(method, path)` pair against the routes
//! registered for that method and returns the stored handler values together
//! with the extracted parameters. Handlers are opaque to the router: it never
//! invokes them, so any value can be registered, from function pointers to
//! boxed closures.
//!
//! ```rust
//! use routetree::Router;
//! use hyper::Method;
//!
//! let router = Router::default()
//!     .get("/", "index")
//!     .get("/hello/:user", "hello");
//!
//! let m = router.lookup(Method::GET, "/hello/gordon").unwrap();
//! assert_eq!(m.handler, Some(&"hello"));
//! assert_eq!(m.params.get("user"), Some("gordon"));
//! ```
//!
//! The registered path, against which the router matches incoming requests,
//! can contain two types of parameters:
//! ```ignore
//!  Syntax    Type
//!  :name     named parameter
//!  *         catch-all parameter
//! ```
//!
//! Named parameters are dynamic path segments. They match anything until the
//! next '/' or the path end:
//! ```ignore
//!  Path: /blog/:category/:post
//!
//!  Requests:
//!   /blog/rust/request-routers            match: category="rust", post="request-routers"
//!   /blog/rust/                           no match
//!   /blog/rust/request-routers/comments   no match
//! ```
//!
//! The catch-all parameter matches anything until the path end and must
//! always be the final character of the pattern. Its capture is stored under
//! the key `"*"`:
//! ```ignore
//!  Path: /files/*
//!
//!  Requests:
//!   /files/LICENSE                      match: *="LICENSE"
//!   /files/templates/article.html       match: *="templates/article.html"
//! ```
//!
//! Incoming paths are normalized with [`clean`](crate::path::clean) before
//! matching, so `/abc//def` and `/abc/./def` both reach a route registered
//! as `/abc/def`.
//!
//! The routing of different request methods is independent: each method owns
//! its own tree, and a lookup for a method with no registered routes is
//! simply not found.

use crate::path::clean;
use crate::tree::{Match, Tree};

use std::collections::HashMap;

use hyper::Method;

/// Default bound on the byte length of a single captured parameter value.
pub const DEFAULT_MAX_PARAM_LENGTH: usize = 100;

/// Router maps `(method, path)` pairs to handler values via configurable
/// routes.
///
/// Registration and lookup are phase-separated by design: register every
/// route first, then share the router for lookups. Lookup never mutates, so
/// a fully built `Router` can serve concurrent lookups from many threads.
pub struct Router<T> {
    trees: HashMap<Method, Tree<T>>,
    max_param_length: usize,
}

impl<T> Router<T> {
    /// Insert a handler into the router for a specific path and method.
    /// ```rust
    /// use routetree::Router;
    /// use hyper::Method;
    ///
    /// let router = Router::default()
    ///     .handle("/teapot", Method::GET, "I am a teapot!");
    ///
    /// assert!(router.lookup(Method::GET, "/teapot").is_some());
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` does not begin with `/`, or if a `*` appears anywhere
    /// but its final position.
    pub fn handle(self, path: &str, method: Method, handler: T) -> Self {
        self.handle_chain(path, method, vec![handler])
    }

    /// Insert a handler chain: several handlers for one route, returned by
    /// lookup in registration order via [`Match::handlers`].
    /// ```rust
    /// use routetree::Router;
    /// use hyper::Method;
    ///
    /// let router = Router::default()
    ///     .handle_chain("/admin", Method::GET, vec!["auth", "admin"]);
    ///
    /// let m = router.lookup(Method::GET, "/admin").unwrap();
    /// assert_eq!(m.handler, None);
    /// assert_eq!(m.handlers, Some(&["auth", "admin"][..]));
    /// ```
    pub fn handle_chain(mut self, path: &str, method: Method, handlers: Vec<T>) -> Self {
        if !path.starts_with('/') {
            panic!("expect path beginning with '/', found: '{}'", path);
        }

        self.trees
            .entry(method)
            .or_insert_with(Tree::new)
            .insert(path, handlers);

        self
    }

    /// Manual lookup of the handler for a specific method and path. The path
    /// is normalized before matching. Returns `None` when the method has no
    /// routes or nothing matches.
    /// ```rust
    /// use routetree::Router;
    /// use hyper::Method;
    ///
    /// let router = Router::default().get("/home", "home");
    ///
    /// let m = router.lookup(Method::GET, "/home").unwrap();
    /// assert!(m.params.is_empty());
    /// assert!(router.lookup(Method::DELETE, "/home").is_none());
    /// ```
    pub fn lookup(&self, method: Method, path: impl AsRef<str>) -> Option<Match<'_, T>> {
        let cleaned = clean(path.as_ref());
        self.trees.get(&method)?.at(&cleaned, self.max_param_length)
    }

    /// Register a handler for `GET` requests
    pub fn get(self, path: &str, handler: T) -> Self {
        self.handle(path, Method::GET, handler)
    }

    /// Register a handler for `HEAD` requests
    pub fn head(self, path: &str, handler: T) -> Self {
        self.handle(path, Method::HEAD, handler)
    }

    /// Register a handler for `OPTIONS` requests
    pub fn options(self, path: &str, handler: T) -> Self {
        self.handle(path, Method::OPTIONS, handler)
    }

    /// Register a handler for `POST` requests
    pub fn post(self, path: &str, handler: T) -> Self {
        self.handle(path, Method::POST, handler)
    }

    /// Register a handler for `PUT` requests
    pub fn put(self, path: &str, handler: T) -> Self {
        self.handle(path, Method::PUT, handler)
    }

    /// Register a handler for `PATCH` requests
    pub fn patch(self, path: &str, handler: T) -> Self {
        self.handle(path, Method::PATCH, handler)
    }

    /// Register a handler for `DELETE` requests
    pub fn delete(self, path: &str, handler: T) -> Self {
        self.handle(path, Method::DELETE, handler)
    }

    /// Bound the byte length of a single captured parameter value; a lookup
    /// whose parameter exceeds the bound is not found. The catch-all capture
    /// is not bounded. Defaults to [`DEFAULT_MAX_PARAM_LENGTH`].
    /// ```rust
    /// use routetree::Router;
    /// use hyper::Method;
    ///
    /// let router = Router::default()
    ///     .max_param_length(3)
    ///     .get("/u/:id", "user");
    ///
    /// assert!(router.lookup(Method::GET, "/u/abc").is_some());
    /// assert!(router.lookup(Method::GET, "/u/abcd").is_none());
    /// ```
    pub fn max_param_length(mut self, limit: usize) -> Self {
        self.max_param_length = limit;
        self
    }

    /// Returns a list of the allowed methods for a specific path
    /// ```rust
    /// use routetree::Router;
    ///
    /// let router = Router::default()
    ///     .get("/home", "get_home")
    ///     .post("/home", "post_home");
    ///
    /// let allowed = router.allowed("/home");
    /// assert!(allowed.contains(&"GET"));
    /// assert!(allowed.contains(&"POST"));
    /// assert!(allowed.contains(&"OPTIONS"));
    /// # assert_eq!(allowed.len(), 3);
    /// ```
    pub fn allowed(&self, path: &str) -> Vec<&str> {
        let mut allowed = match path {
            "*" => self
                .trees
                .keys()
                .filter(|&method| method != Method::OPTIONS)
                .map(AsRef::as_ref)
                .collect::<Vec<_>>(),
            _ => {
                let cleaned = clean(path);
                self.trees
                    .keys()
                    .filter(|&method| method != Method::OPTIONS)
                    .filter(|&method| {
                        self.trees
                            .get(method)
                            .map(|tree| tree.at(&cleaned, self.max_param_length).is_some())
                            .unwrap_or(false)
                    })
                    .map(AsRef::as_ref)
                    .collect::<Vec<_>>()
            }
        };

        if !allowed.is_empty() {
            allowed.push("OPTIONS")
        }

        allowed
    }
}

/// The default router configuration
impl<T> Default for Router<T> {
    fn default() -> Self {
        Self {
            trees: HashMap::new(),
            max_param_length: DEFAULT_MAX_PARAM_LENGTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_method_is_not_found() {
        let router = Router::default().get("/anything", "h");

        assert!(router.lookup(Method::DELETE, "/anything").is_none());
    }

    #[test]
    fn methods_are_independent() {
        let router = Router::default()
            .get("/resource", "read")
            .post("/resource", "create");

        assert_eq!(
            router.lookup(Method::GET, "/resource").unwrap().handler,
            Some(&"read")
        );
        assert_eq!(
            router.lookup(Method::POST, "/resource").unwrap().handler,
            Some(&"create")
        );
        assert!(router.lookup(Method::PUT, "/resource").is_none());
    }

    #[test]
    fn custom_method_strings() {
        let method = Method::from_bytes(b"PURGE").unwrap();
        let router = Router::default().handle("/cache", method.clone(), "purge");

        assert_eq!(
            router.lookup(method, "/cache").unwrap().handler,
            Some(&"purge")
        );
    }

    #[test]
    fn lookup_normalizes_path() {
        let router = Router::default().get("/abc/def", "h");

        assert!(router.lookup(Method::GET, "/abc//def").is_some());
        assert!(router.lookup(Method::GET, "/abc/./def").is_some());
        assert!(router.lookup(Method::GET, "/x/../abc/def").is_some());
    }

    #[test]
    fn chain_and_single_are_distinguished() {
        let router = Router::default()
            .get("/single", "only")
            .handle_chain("/chain", Method::GET, vec!["first", "second"]);

        let single = router.lookup(Method::GET, "/single").unwrap();
        assert_eq!(single.handler, Some(&"only"));
        assert_eq!(single.handlers, None);

        let chain = router.lookup(Method::GET, "/chain").unwrap();
        assert_eq!(chain.handler, None);
        assert_eq!(chain.handlers, Some(&["first", "second"][..]));
    }

    #[test]
    fn allowed_lists_matching_methods() {
        let router = Router::default()
            .get("/home", "get")
            .post("/home", "post")
            .put("/other", "put");

        let allowed = router.allowed("/home");
        assert!(allowed.contains(&"GET"));
        assert!(allowed.contains(&"POST"));
        assert!(allowed.contains(&"OPTIONS"));
        assert!(!allowed.contains(&"PUT"));

        assert!(router.allowed("/missing").is_empty());

        let all = router.allowed("*");
        assert!(all.contains(&"PUT"));
    }

    #[test]
    #[should_panic(expected = "expect path beginning with '/'")]
    fn rejects_path_without_leading_slash() {
        let _ = Router::default().get("no-slash", "h");
    }
}
