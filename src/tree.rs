//! The compressed prefix tree (radix tree) that backs the router.
//!
//! A [`Tree`] holds the routes registered for a single request method. Each
//! node carries a multi-byte prefix rather than a single character, so chains
//! of single-child nodes are merged and a lookup touches at most O(path
//! length) nodes. Three node kinds exist: static nodes matched by literal
//! byte equality, parametric nodes (`:name`) capturing one path segment, and
//! a trailing match-all node (`*`) capturing the rest of the path.
//!
//! Nodes live in a flat arena ([`Vec`]) and refer to each other by index.
//! The two non-owning shortcuts a node carries (the cached wildcard child
//! and the parametric fallback link used for backtracking) are then plain
//! `Option<usize>` fields instead of shared pointers, and a node's identity
//! stays stable when an insertion splits it: the slot is reused for the
//! shortened prefix and the old content moves into a fresh child.

use std::collections::HashMap;
use std::mem;
use std::ops::Index;

type NodeId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Static,
    Parametric,
    MatchAll,
}

/// The handler bundle stored where a route terminates.
///
/// Exactly one of `handler`/`handlers` is populated: a route registered with
/// a single handler keeps it in `handler`, a route registered with several
/// (a middleware chain) keeps them in `handlers`. `param_names` lists the
/// parameter names collected along the pattern, in capture order.
#[derive(Debug)]
struct Endpoint<T> {
    handler: Option<T>,
    handlers: Option<Vec<T>>,
    param_names: Vec<String>,
}

#[derive(Debug)]
struct Node<T> {
    prefix: Vec<u8>,
    kind: NodeKind,
    children: HashMap<u8, NodeId>,
    // duplicate reference to the '*' child, if any, for O(1) fallback
    wildcard_child: Option<NodeId>,
    // nearest ':' child reachable from the ancestor chain; lets the matcher
    // fall back to a parametric branch without re-walking the tree
    parametric_brother: Option<NodeId>,
    endpoint: Option<Endpoint<T>>,
}

impl<T> Node<T> {
    fn new(prefix: Vec<u8>, kind: NodeKind) -> Self {
        Node {
            prefix,
            kind,
            children: HashMap::new(),
            wildcard_child: None,
            parametric_brother: None,
            endpoint: None,
        }
    }
}

/// A single URL parameter, consisting of a key and a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub key: String,
    pub value: String,
}

/// The parameter values extracted by a lookup, ordered as they appear in the
/// registered pattern.
///
/// ```rust
/// # use routetree::Tree;
/// let mut tree = Tree::new();
/// tree.insert("/blog/:category/:post", vec!["post"]);
///
/// let m = tree.at("/blog/rust/routers", 100).unwrap();
/// assert_eq!(m.params.get("category"), Some("rust"));
/// assert_eq!(m.params[1].value, "routers");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<Param>);

impl Params {
    /// Returns the value of the first parameter registered under the given key.
    pub fn get(&self, key: impl AsRef<str>) -> Option<&str> {
        self.0
            .iter()
            .find(|param| param.key == key.as_ref())
            .map(|param| param.value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Param> {
        self.0.iter()
    }
}

impl Index<usize> for Params {
    type Output = Param;

    fn index(&self, index: usize) -> &Param {
        &self.0[index]
    }
}

/// A successful lookup.
///
/// Exactly one of `handler`/`handlers` is `Some`, mirroring whether the route
/// was registered with a single handler or with a chain.
#[derive(Debug)]
pub struct Match<'a, T> {
    pub handler: Option<&'a T>,
    pub handlers: Option<&'a [T]>,
    pub params: Params,
}

/// The route tree for a single request method.
///
/// Handlers are opaque values: the tree stores them on registration and hands
/// back references on lookup, it never invokes them.
///
/// ```rust
/// use routetree::Tree;
///
/// let mut tree = Tree::new();
/// tree.insert("/home", vec!["home"]);
/// tree.insert("/user/:id", vec!["user"]);
///
/// let m = tree.at("/user/42", 100).unwrap();
/// assert_eq!(m.handler, Some(&"user"));
/// assert_eq!(m.params.get("id"), Some("42"));
/// ```
#[derive(Debug)]
pub struct Tree<T> {
    nodes: Vec<Node<T>>,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

const ROOT: NodeId = 0;

impl<T> Tree<T> {
    pub fn new() -> Self {
        Tree {
            nodes: vec![Node::new(b"/".to_vec(), NodeKind::Static)],
        }
    }

    /// Registers `handlers` under `pattern`.
    ///
    /// Literal characters match themselves, a `:name` segment captures
    /// anything up to the next `/` or the end of the path, and a trailing `*`
    /// captures the entire remaining path under the key `"*"`.
    ///
    /// Registering the same pattern twice replaces the previous handlers. An
    /// empty handler list leaves the tree untouched.
    ///
    /// # Panics
    ///
    /// Panics if `*` appears anywhere but the final position: a wildcard that
    /// is not trailing has no defined match semantics, so it is rejected here
    /// rather than silently truncated.
    pub fn insert(&mut self, pattern: impl AsRef<str>, handlers: Vec<T>) {
        let mut path: Vec<u8> = pattern.as_ref().as_bytes().to_vec();
        let mut param_names: Vec<String> = Vec::new();
        let mut i = 0;

        while i < path.len() {
            match path[i] {
                b':' => {
                    // the static text before the parameter, without a handler
                    self.insert_segment(&path[..i], NodeKind::Static, Vec::new(), Vec::new());

                    let name_start = i + 1;
                    let mut name_end = name_start;
                    while name_end < path.len() && path[name_end] != b'/' {
                        name_end += 1;
                    }
                    param_names
                        .push(String::from_utf8_lossy(&path[name_start..name_end]).into_owned());

                    // collapse the name, leaving the bare ':' placeholder
                    path.drain(name_start..name_end);
                    i = name_start;

                    if i == path.len() {
                        self.insert_segment(&path, NodeKind::Parametric, param_names, handlers);
                        return;
                    }

                    // intermediate parametric node, the handler attaches further down
                    self.insert_segment(&path[..i], NodeKind::Parametric, Vec::new(), Vec::new());
                }
                b'*' => {
                    if i + 1 != path.len() {
                        panic!(
                            "wildcard '*' must terminate the route pattern, found: '{}'",
                            pattern.as_ref()
                        );
                    }
                    self.insert_segment(&path[..i], NodeKind::Static, Vec::new(), Vec::new());
                    param_names.push("*".to_owned());
                    self.insert_segment(&path, NodeKind::MatchAll, param_names, handlers);
                    return;
                }
                _ => i += 1,
            }
        }

        self.insert_segment(&path, NodeKind::Static, param_names, handlers);
    }

    /// Walks from the root and inserts one decomposed pattern segment,
    /// splitting existing nodes where the longest common prefix ends short of
    /// a node's own prefix.
    fn insert_segment(
        &mut self,
        path: &[u8],
        kind: NodeKind,
        param_names: Vec<String>,
        handlers: Vec<T>,
    ) {
        let mut path = path;
        let mut current = ROOT;

        loop {
            let prefix_len = self.nodes[current].prefix.len();
            let lcp = longest_common_prefix(path, &self.nodes[current].prefix);

            if lcp < prefix_len {
                // the common prefix ends inside this node: split it. The slot
                // keeps the shortened prefix so references into it stay valid,
                // the old content moves into a new child.
                let moved = Node {
                    prefix: self.nodes[current].prefix[lcp..].to_vec(),
                    kind: self.nodes[current].kind,
                    children: mem::take(&mut self.nodes[current].children),
                    wildcard_child: self.nodes[current].wildcard_child.take(),
                    parametric_brother: None,
                    endpoint: self.nodes[current].endpoint.take(),
                };
                let moved = self.alloc(moved);
                let head = self.nodes[current].prefix[..lcp].to_vec();
                self.reset(current, head);
                self.add_child(current, moved);

                if lcp == path.len() {
                    // the route ends exactly at the split point
                    self.set_endpoint(current, handlers, param_names);
                    self.nodes[current].kind = kind;
                } else {
                    let tail = self.alloc(Node::new(path[lcp..].to_vec(), kind));
                    self.set_endpoint(tail, handlers, param_names);
                    self.add_child(current, tail);
                }
            } else if lcp < path.len() {
                path = &path[lcp..];
                if let Some(next) = self.find_by_label(current, path) {
                    current = next;
                    continue;
                }
                let node = self.alloc(Node::new(path.to_vec(), kind));
                self.set_endpoint(node, handlers, param_names);
                self.add_child(current, node);
            } else if !handlers.is_empty() {
                // the node already exists as an intermediate of an earlier
                // insertion: the route terminates here
                self.set_endpoint(current, handlers, param_names);
            }

            return;
        }
    }

    fn alloc(&mut self, node: Node<T>) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Attaches `child` under `parent` keyed by its label, then brings the
    /// parametric fallback links of every static descendant up to date.
    fn add_child(&mut self, parent: NodeId, child: NodeId) {
        let label = match self.nodes[child].kind {
            NodeKind::Static => self.nodes[child].prefix[0],
            NodeKind::Parametric => b':',
            NodeKind::MatchAll => {
                self.nodes[parent].wildcard_child = Some(child);
                b'*'
            }
        };
        self.nodes[parent].children.insert(label, child);

        // the nearest parametric branch seen from `parent`: its own ':'
        // child, else whatever its ancestors propagated down
        let brother = self.nodes[parent]
            .children
            .get(&b':')
            .copied()
            .or(self.nodes[parent].parametric_brother);

        let mut stack = vec![parent];
        while let Some(id) = stack.pop() {
            if self.nodes[id].kind != NodeKind::Static {
                continue;
            }
            if id != parent {
                self.nodes[id].parametric_brother =
                    brother.or(self.nodes[id].parametric_brother);
            }
            stack.extend(self.nodes[id].children.values().copied());
        }
    }

    /// Clears a node down to a bare static node with the given prefix. The
    /// parametric fallback link is deliberately left in place.
    fn reset(&mut self, id: NodeId, prefix: Vec<u8>) {
        let node = &mut self.nodes[id];
        node.prefix = prefix;
        node.kind = NodeKind::Static;
        node.children = HashMap::new();
        node.wildcard_child = None;
        node.endpoint = None;
    }

    /// Insertion-time child lookup: by first byte only, the caller guarantees
    /// prefix consistency.
    fn find_by_label(&self, id: NodeId, path: &[u8]) -> Option<NodeId> {
        self.nodes[id].children.get(path.first()?).copied()
    }

    /// Matching-time child lookup: a static child whose whole prefix
    /// literally prefixes `path` wins, then the parametric child, then the
    /// wildcard child. Children with neither descendants nor an endpoint are
    /// dead ends and never returned.
    fn find_matching_child(&self, id: NodeId, path: &[u8]) -> Option<NodeId> {
        if let Some(label) = path.first() {
            if let Some(&child) = self.nodes[id].children.get(label) {
                let node = &self.nodes[child];
                if (!node.children.is_empty() || node.endpoint.is_some())
                    && path.starts_with(&node.prefix)
                {
                    return Some(child);
                }
            }
        }

        for &label in &[b':', b'*'] {
            if let Some(&child) = self.nodes[id].children.get(&label) {
                let node = &self.nodes[child];
                if !node.children.is_empty() || node.endpoint.is_some() {
                    return Some(child);
                }
            }
        }

        None
    }

    fn set_endpoint(&mut self, id: NodeId, handlers: Vec<T>, param_names: Vec<String>) {
        if handlers.is_empty() {
            return;
        }

        let endpoint = if handlers.len() == 1 {
            Endpoint {
                handler: handlers.into_iter().next(),
                handlers: None,
                param_names,
            }
        } else {
            Endpoint {
                handler: None,
                handlers: Some(handlers),
                param_names,
            }
        };
        self.nodes[id].endpoint = Some(endpoint);
    }

    /// Looks up `path`, returning the registered handlers and the captured
    /// parameter values, or `None` if no route matches.
    ///
    /// `path` is expected in canonical form already (no `//`, `.` or `..`
    /// elements); see [`crate::path::clean`]. A single captured parameter
    /// longer than `max_param_length` bytes fails the lookup. The match-all
    /// capture is not bounded.
    pub fn at(&self, path: &str, max_param_length: usize) -> Option<Match<'_, T>> {
        let original = path.as_bytes();
        let mut current = ROOT;
        // the unconsumed path is always `original[start..]`
        let mut start = 0;
        let mut captured: Vec<(usize, usize)> = Vec::new();
        // last node with a wildcard child, and the unconsumed length there
        let mut wildcard: Option<(NodeId, usize)> = None;

        loop {
            let path = &original[start..];
            let node = &self.nodes[current];
            let prefix_len = node.prefix.len();

            // found the route
            if path.is_empty() || path == &node.prefix[..] {
                if let Some(endpoint) = &node.endpoint {
                    return Some(self.resolve(endpoint, original, &captured));
                }
            }

            let entry_start = start;
            let mut lcp = longest_common_prefix(path, &node.prefix);
            if lcp == prefix_len {
                start += lcp;
            }
            let mut path = &original[start..];

            let next = match self.find_matching_child(current, path) {
                Some(next) => next,
                None => match node.parametric_brother {
                    None => return self.resolve_wildcard(wildcard, original),
                    Some(brother) => {
                        // rewind to where this node was entered; when that is
                        // not a '/' boundary (the node was entered mid-segment
                        // after a split), rewind to the segment start instead,
                        // so the parametric branch sees the whole segment
                        start = if entry_start == 0 || original[entry_start - 1] == b'/' {
                            entry_start
                        } else {
                            original[..start]
                                .iter()
                                .rposition(|&b| b == b'/')
                                .map_or(0, |slash| slash + 1)
                        };
                        path = &original[start..];
                        lcp = prefix_len;
                        brother
                    }
                },
            };

            if self.nodes[next].kind == NodeKind::Static {
                if let Some(w) = node.wildcard_child {
                    wildcard = Some((w, original.len() - start));
                }
                current = next;
                continue;
            }

            // a parametric or wildcard child only applies once this node's
            // prefix has been consumed in full
            if lcp != prefix_len {
                return self.resolve_wildcard(wildcard, original);
            }

            if let Some(w) = node.wildcard_child {
                wildcard = Some((w, original.len() - start));
            }

            match self.nodes[next].kind {
                NodeKind::Parametric => {
                    let len = path.iter().position(|&b| b == b'/').unwrap_or(path.len());
                    if len > max_param_length {
                        return None;
                    }
                    captured.push((start, start + len));
                    start += len;
                    current = next;
                }
                NodeKind::MatchAll => {
                    captured.push((start, original.len()));
                    current = next;
                    start = original.len();
                }
                NodeKind::Static => unreachable!("static children descend above"),
            }
        }
    }

    /// Pairs the endpoint's parameter names with the captured values.
    fn resolve<'a>(
        &self,
        endpoint: &'a Endpoint<T>,
        original: &[u8],
        captured: &[(usize, usize)],
    ) -> Match<'a, T> {
        let mut params = Params::default();
        for (name, &(from, to)) in endpoint.param_names.iter().zip(captured) {
            params.0.push(Param {
                key: name.clone(),
                value: String::from_utf8_lossy(&original[from..to]).into_owned(),
            });
        }

        Match {
            handler: endpoint.handler.as_ref(),
            handlers: endpoint.handlers.as_deref(),
            params,
        }
    }

    /// Resolves the remembered wildcard fallback: the last `suffix_len` bytes
    /// of the path become the `"*"` capture.
    fn resolve_wildcard(
        &self,
        wildcard: Option<(NodeId, usize)>,
        original: &[u8],
    ) -> Option<Match<'_, T>> {
        let (id, suffix_len) = wildcard?;
        let endpoint = self.nodes[id].endpoint.as_ref()?;
        let suffix = &original[original.len() - suffix_len..];

        let mut params = Params::default();
        params.0.push(Param {
            key: "*".to_owned(),
            value: String::from_utf8_lossy(suffix).into_owned(),
        });

        Some(Match {
            handler: endpoint.handler.as_ref(),
            handlers: endpoint.handlers.as_deref(),
            params,
        })
    }
}

fn longest_common_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}
