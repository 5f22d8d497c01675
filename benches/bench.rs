use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hyper::Method;
use routetree::path::clean;
use routetree::Router;

// (path, clean form)
fn clean_tests() -> Vec<(&'static str, &'static str)> {
    vec![
        ("/", "/"),
        ("/abc", "/abc"),
        ("/a/b/c", "/a/b/c"),
        ("abc/def", "/abc/def"),
        ("//", "/"),
        ("/abc//def//ghi", "/abc/def/ghi"),
        ("/abc/./def", "/abc/def"),
        ("/abc/def/ghi/../jkl", "/abc/def/jkl"),
        ("/abc/def/../../../ghi/jkl/../../../mno", "/mno"),
        ("abc/../../././../def", "/def"),
    ]
}

fn routes() -> Vec<&'static str> {
    vec![
        "/",
        "/cmd/:tool/:sub",
        "/cmd/:tool/",
        "/src/*",
        "/search/",
        "/search/:query",
        "/user_:name",
        "/user_:name/about",
        "/files/:dir/*",
        "/doc/",
        "/doc/go_faq.html",
        "/doc/go1.html",
        "/info/:user/public",
        "/info/:user/project/:project",
    ]
}

fn clean_benchmark(c: &mut Criterion) {
    let tests = clean_tests();

    c.bench_function("path_clean", |b| {
        b.iter(|| {
            for (path, cleaned) in &tests {
                black_box(clean(path));
                black_box(clean(cleaned));
            }
        })
    });
}

fn lookup_benchmark(c: &mut Criterion) {
    let mut router = Router::default();
    for route in routes() {
        router = router.get(route, route);
    }

    c.bench_function("lookup_static", |b| {
        b.iter(|| black_box(router.lookup(Method::GET, "/doc/go_faq.html")))
    });

    c.bench_function("lookup_parametric", |b| {
        b.iter(|| black_box(router.lookup(Method::GET, "/info/gordon/project/go")))
    });

    c.bench_function("lookup_wildcard", |b| {
        b.iter(|| black_box(router.lookup(Method::GET, "/src/some/file.png")))
    });

    c.bench_function("lookup_not_found", |b| {
        b.iter(|| black_box(router.lookup(Method::GET, "/missing/route")))
    });
}

criterion_group!(benches, clean_benchmark, lookup_benchmark);
criterion_main!(benches);
