//! # RouteTree
//!
//! RouteTree is a lightweight high performance request router.
//!
//! This router supports variables in the routing pattern and matches against
//! the request method. It also scales very well.
//!
//! The router is optimized for high performance and a small memory footprint.
//! It scales well even with very long paths and a large number of routes. A
//! compressing dynamic trie (radix tree) structure is used for efficient
//! matching: one tree per request method, with multi-byte node prefixes so
//! chains of single-child nodes collapse into one node.
//!
//! ## Features
//!
//! **Parameters in your routing pattern:** Stop parsing the requested URL
//! path, just give the path segment a name and the router delivers the
//! dynamic value to you. Because of the design of the router, path parameters
//! are very cheap.
//!
//! **Overlapping static and dynamic routes:** `/static/path` and
//! `/static/:id` can coexist for the same method. A static route always wins
//! over a parametric one for the paths it covers, and when a static descent
//! dead-ends the matcher backtracks into the parametric or catch-all branch
//! using precomputed fallback links, never by re-walking the tree.
//!
//! **Path normalization:** Superfluous path elements like `../` or `//` are
//! removed before matching, so `/..//foo` finds a route registered as `/foo`.
//!
//! **Opaque handlers:** The router stores any handler value you give it and
//! hands it back on lookup. It never invokes handlers, performs no I/O, and
//! has no opinion about your server stack.
//!
//! ## Usage
//!
//! Here is a simple example:
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
//! ### Named parameters
//!
//! As you can see, `:user` is a *named parameter*. The values are accessible
//! via [`Match::params`](crate::Match).
//!
//! Named parameters only match a single path segment:
//!
//! ```ignore
//! Pattern: /user/:user
//!
//!  /user/gordon              match
//!  /user/you                 match
//!  /user/gordon/profile      no match
//! ```
//!
//! ### Catch-all parameter
//!
//! The second type is the *catch-all* parameter, a trailing `*`. It matches
//! everything up to the path end, so it must always be the **last** character
//! of the pattern. The capture is stored under the key `"*"`:
//!
//! ```rust
//! use routetree::Router;
//! use hyper::Method;
//!
//! let router = Router::default().get("/src/*", "files");
//!
//! let m = router.lookup(Method::GET, "/src/subdir/somefile.go").unwrap();
//! assert_eq!(m.params.get("*"), Some("subdir/somefile.go"));
//! ```
//!
//! ### Handler chains
//!
//! A route can be registered with several handlers at once. Lookup then
//! returns them as a list, in registration order, so the caller can tell a
//! single endpoint from a middleware chain:
//!
//! ```rust
//! use routetree::Router;
//! use hyper::Method;
//!
//! let router = Router::default()
//!     .handle_chain("/admin", Method::GET, vec!["auth", "admin"]);
//!
//! let m = router.lookup(Method::GET, "/admin").unwrap();
//! assert_eq!(m.handlers, Some(&["auth", "admin"][..]));
//! ```
//!
//! ### Concurrency
//!
//! Register every route first, then share the router: lookups never mutate
//! the trees, so a fully built router can serve concurrent lookups from many
//! threads. Registering while lookups are in flight is not supported.

#![forbid(unsafe_code)]

pub mod path;

#[doc(hidden)]
pub mod router;

#[doc(hidden)]
pub mod tree;

#[doc(inline)]
pub use router::{Router, DEFAULT_MAX_PARAM_LENGTH};

#[doc(inline)]
pub use tree::{Match, Param, Params, Tree};
