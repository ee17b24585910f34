use license_expr::license::{
    is_license_ref_to, license_and, license_or, license_with, lookup_exception, lookup_license,
    normalize, parse, Expression, NormalizedForm, ParseCache, ParseError, DEFAULT_NAMESPACES,
};

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn engine_types_are_thread_safe() {
    assert_send_sync::<Expression>();
    assert_send_sync::<NormalizedForm>();
    assert_send_sync::<ParseCache>();
    assert_send_sync::<ParseError>();
}

#[test]
fn combinators_match_parsing() {
    let mit = lookup_license("MIT").unwrap();
    let apache = lookup_license("Apache-2.0").unwrap();
    let gpl = lookup_license("GPL-2.0-or-later").unwrap();
    let classpath = lookup_exception("Classpath-exception-2.0").unwrap();

    let built = license_and(
        mit,
        license_or(apache, license_with(gpl, classpath).unwrap()).unwrap(),
    )
    .unwrap();
    let parsed =
        parse("MIT AND (Apache-2.0 OR GPL-2.0-or-later WITH Classpath-exception-2.0)").unwrap();

    assert_eq!(built, parsed);
    assert_eq!(built.to_string(), parsed.to_string());
}

#[test]
fn normalized_clauses_for_policy_checks() {
    let form = normalize(&parse("MIT AND (Apache-2.0 OR BSD-3-Clause)").unwrap());
    let clauses: Vec<Vec<&str>> = form
        .clauses()
        .map(|clause| clause.terms().map(|term| term.id()).collect())
        .collect();
    assert_eq!(clauses, vec![vec!["Apache-2.0", "MIT"], vec!["BSD-3-Clause", "MIT"]]);

    // One clause fully inside an allowed set is enough.
    let allowed = ["MIT", "BSD-3-Clause"];
    assert!(form
        .clauses()
        .any(|clause| clause.terms().all(|term| allowed.contains(&term.id()))));
}

#[test]
fn scanner_references() {
    let check =
        |candidate: &str, name: &str| is_license_ref_to(candidate, name, true, DEFAULT_NAMESPACES);

    assert!(check("LicenseRef-scancode-public-domain", "public-domain"));
    assert!(check("LicenseRef-public-domain", "public-domain"));
    assert!(!check("LicenseRef-unknown-tool-public-domain", "public-domain"));
    assert!(!check("Public-domain", "public-domain"));
    assert!(!check("LicenseRef-public-domain", ""));
}

#[test]
fn parallel_parsing_agrees_with_serial() {
    let inputs = [
        "MIT",
        "MIT OR Apache-2.0",
        "GPL-2.0+ WITH Classpath-exception-2.0",
        "(MIT OR ISC) AND Zlib",
        "MIT AND",
    ];
    let cache = ParseCache::new();

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for input in inputs {
                    assert_eq!(cache.parse(input), parse(input));
                }
            });
        }
    });

    assert_eq!(cache.len(), inputs.len());
}
