//! URL path normalization.
//!
//! This is a port of the `CleanPath` function from Go's `path` package: it
//! returns the shortest equivalent path, eliminating `.` and `..` elements
//! and repeated slashes. The router runs every incoming path through
//! [`clean`] before matching, so registered routes only ever see paths in
//! this canonical form.

/// Returns the canonical form of `p`:
///
/// 1. multiple slashes collapse to one
/// 2. `.` path elements are dropped
/// 3. `..` path elements drop the non-`..` element before them
/// 4. `..` elements that would walk above the root are dropped
///
/// A trailing slash is preserved. The returned path always begins with `/`;
/// the clean form of an empty path is `/`.
///
/// ```rust
/// use routetree::path::clean;
///
/// assert_eq!(clean("/abc//def"), "/abc/def");
/// assert_eq!(clean("/abc/./../def"), "/def");
/// assert_eq!(clean(""), "/");
/// ```
pub fn clean(p: &str) -> String {
    if p.is_empty() {
        return "/".to_owned();
    }

    let s = p.as_bytes();
    let n = s.len();

    // lazily allocated; while it stays empty, `s[..w]` is the output so far
    let mut buf: Vec<u8> = Vec::new();

    // r is the next byte to process, w the next byte to write
    let mut r = 1;
    let mut w = 1;

    if s[0] != b'/' {
        r = 0;
        buf = vec![0; n + 1];
        buf[0] = b'/';
    }

    let mut trailing = n > 1 && s[n - 1] == b'/';

    while r < n {
        if s[r] == b'/' {
            // empty path element
            r += 1;
        } else if s[r] == b'.' && r + 1 == n {
            trailing = true;
            r += 1;
        } else if s[r] == b'.' && s[r + 1] == b'/' {
            // . element
            r += 2;
        } else if s[r] == b'.' && s[r + 1] == b'.' && (r + 2 == n || s[r + 2] == b'/') {
            // .. element: back up to the previous '/'
            r += 3;
            if w > 1 {
                w -= 1;
                if buf.is_empty() {
                    while w > 1 && s[w] != b'/' {
                        w -= 1;
                    }
                } else {
                    while w > 1 && buf[w] != b'/' {
                        w -= 1;
                    }
                }
            }
        } else {
            // real path element: add a slash if needed, then copy the element
            if w > 1 {
                buf_app(&mut buf, s, w, b'/');
                w += 1;
            }
            while r < n && s[r] != b'/' {
                buf_app(&mut buf, s, w, s[r]);
                w += 1;
                r += 1;
            }
        }
    }

    if trailing && w > 1 {
        buf_app(&mut buf, s, w, b'/');
        w += 1;
    }

    if buf.is_empty() {
        String::from_utf8_lossy(&s[..w]).into_owned()
    } else {
        String::from_utf8_lossy(&buf[..w]).into_owned()
    }
}

// Writes `c` at position `w`, allocating the buffer only once the output
// diverges from the input.
fn buf_app(buf: &mut Vec<u8>, s: &[u8], w: usize, c: u8) {
    if buf.is_empty() {
        if w < s.len() && s[w] == c {
            return;
        }
        buf.resize(s.len() + 1, 0);
        buf[..w].copy_from_slice(&s[..w]);
    }
    buf[w] = c;
}
