//! Properties of dispatch and reverse lookup on hand-built tables.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use site_router::routing::{Dispatch, ReverseError, RoutingTable, SharedRoutes};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    AdminIndex,
    AdminUsers,
    Home,
    Items,
    H1,
    H2,
}

fn admin_router() -> RoutingTable<Page> {
    RoutingTable::builder()
        .route_named("users/", Page::AdminUsers, "users")
        .route_named("", Page::AdminIndex, "index")
        .build()
        .unwrap()
}

fn base_router() -> RoutingTable<Page> {
    RoutingTable::builder()
        .route_named("items/{id:int}/", Page::Items, "item-detail")
        .route_named("", Page::Home, "home")
        .build()
        .unwrap()
}

fn site() -> RoutingTable<Page> {
    RoutingTable::builder()
        .include_namespaced("admin/", admin_router(), "admin")
        .include("", base_router())
        .build()
        .unwrap()
}

#[test]
fn test_first_declared_match_wins() {
    // Every one of these patterns matches "a/b/c".
    let patterns = ["a/", "a/b/", "{x}/b/", "", "a/{y:path}"];

    for first in 0..patterns.len() {
        let mut builder = RoutingTable::builder();
        let order: Vec<usize> = (first..patterns.len()).chain(0..first).collect();
        for &i in &order {
            builder = builder.route(patterns[i], i);
        }
        let table = builder.build().unwrap();

        let m = table.dispatch("a/b/c").into_match().unwrap();
        assert_eq!(*m.endpoint, first, "order {order:?}");
        assert_eq!(m.trail, vec![0]);
    }
}

#[test]
fn test_not_found_when_nothing_matches() {
    let table = RoutingTable::builder()
        .route("items/", Page::Items)
        .include("admin/", admin_router())
        .build()
        .unwrap();

    for path in ["", "item/", "Items/", "/items/", "adm"] {
        assert!(matches!(table.dispatch(path), Dispatch::NotFound), "path {path:?}");
    }

    let empty: RoutingTable<Page> = RoutingTable::default();
    assert!(!empty.dispatch("").is_match());
}

#[test]
fn test_delegation_is_transparent() {
    let table = site();
    let admin = admin_router();

    for suffix in ["", "users/", "users/7/", "nothing/", "index"] {
        let path = format!("admin/{suffix}");
        let outer = table.dispatch(&path).into_match().unwrap();
        let inner = admin.dispatch(suffix).into_match().unwrap();

        assert_eq!(outer.endpoint, inner.endpoint, "suffix {suffix:?}");
        assert_eq!(outer.remaining, inner.remaining);
        assert_eq!(outer.params.as_pairs(), inner.params.as_pairs());
        assert_eq!(outer.name, inner.name);
    }

    let base = base_router();
    for path in ["items/3/", "items/3/x", "elsewhere"] {
        let outer = table.dispatch(path).into_match().unwrap();
        let inner = base.dispatch(path).into_match().unwrap();
        assert_eq!(outer.endpoint, inner.endpoint);
        assert_eq!(outer.remaining, inner.remaining);
    }
}

#[test]
fn test_admin_then_base_scenario() {
    let table = site();

    let m = table.dispatch("admin/").into_match().unwrap();
    assert_eq!(*m.endpoint, Page::AdminIndex);
    assert_eq!(m.remaining, "");
    assert_eq!(m.qualified_name().as_deref(), Some("admin:index"));

    let m = table.dispatch("admin/users/").into_match().unwrap();
    assert_eq!(*m.endpoint, Page::AdminUsers);

    let m = table.dispatch("about/").into_match().unwrap();
    assert_eq!(*m.endpoint, Page::Home);
    assert_eq!(m.remaining, "about/");
    assert!(m.namespaces.is_empty());

    // "administrator/" is not under "admin/".
    let m = table.dispatch("administrator/").into_match().unwrap();
    assert_eq!(*m.endpoint, Page::Home);
}

#[test]
fn test_inner_miss_does_not_fall_through() {
    let strict_admin = RoutingTable::builder()
        .route("users/", Page::AdminUsers)
        .build()
        .unwrap();
    let table = RoutingTable::builder()
        .include("admin/", strict_admin)
        .route("", Page::Home)
        .build()
        .unwrap();

    assert!(!table.dispatch("admin/groups/").is_match());
    assert_eq!(*table.dispatch("other/").into_match().unwrap().endpoint, Page::Home);
}

#[test]
fn test_shorter_prefix_shadows_longer() {
    let table = RoutingTable::builder()
        .route("a/", Page::H1)
        .route("a/b/", Page::H2)
        .build()
        .unwrap();

    let m = table.dispatch("a/b/c").into_match().unwrap();
    assert_eq!(*m.endpoint, Page::H1);
    assert_eq!(m.remaining, "b/c");

    let reordered = RoutingTable::builder()
        .route("a/b/", Page::H2)
        .route("a/", Page::H1)
        .build()
        .unwrap();
    let m = reordered.dispatch("a/b/c").into_match().unwrap();
    assert_eq!(*m.endpoint, Page::H2);
    assert_eq!(m.remaining, "c");
}

#[test]
fn test_reverse_then_dispatch_round_trip() {
    let table = site();

    let path = table.reverse("item-detail", &[("id", "42")]).unwrap();
    assert_eq!(path, "items/42/");

    let m = table.dispatch(&path).into_match().unwrap();
    assert_eq!(*m.endpoint, Page::Items);
    assert_eq!(m.params.get("id"), Some("42"));
    assert_eq!(m.params.parse::<u32>("id"), Some(42));
    assert_eq!(m.remaining, "");

    for name in ["admin:index", "admin:users", "home"] {
        let path = table.reverse(name, &[]).unwrap();
        let m = table.dispatch(&path).into_match().unwrap();
        assert_eq!(m.qualified_name().as_deref(), Some(name));
    }
}

#[test]
fn test_reverse_errors() {
    let table = site();

    assert_eq!(
        table.reverse("missing", &[]),
        Err(ReverseError::UnknownRoute {
            name: "missing".into()
        })
    );
    // Namespaced routes are only reachable through their namespace.
    assert!(matches!(
        table.reverse("index", &[]),
        Err(ReverseError::UnknownRoute { .. })
    ));
    assert!(matches!(
        table.reverse("item-detail", &[("id", "abc")]),
        Err(ReverseError::NoMatch { .. })
    ));
    assert!(matches!(
        table.reverse("item-detail", &[]),
        Err(ReverseError::NoMatch { .. })
    ));
}

#[test]
fn test_concurrent_dispatch_on_shared_table() {
    let table = Arc::new(site());

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let table = table.clone();
            thread::spawn(move || {
                for i in 0..1_000 {
                    let path = format!("items/{}/", t * 1_000 + i);
                    let m = table.dispatch(&path).into_match().unwrap();
                    assert_eq!(*m.endpoint, Page::Items);
                    assert_eq!(m.params.parse::<usize>("id"), Some(t * 1_000 + i));

                    let m = table.dispatch("admin/users/").into_match().unwrap();
                    assert_eq!(*m.endpoint, Page::AdminUsers);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_readers_see_whole_tables_during_replace() {
    let shared = Arc::new(SharedRoutes::new(site()));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let shared = shared.clone();
            thread::spawn(move || {
                for _ in 0..2_000 {
                    let table = shared.load();
                    let m = table.dispatch("admin/users/").into_match().unwrap();
                    // Either the old site or the replacement, never a mix.
                    match table.len() {
                        2 => assert_eq!(*m.endpoint, Page::AdminUsers),
                        1 => assert_eq!(*m.endpoint, Page::H1),
                        n => panic!("unexpected table with {n} rules"),
                    }
                }
            })
        })
        .collect();

    let replacement = RoutingTable::builder().route("", Page::H1).build().unwrap();
    let previous = shared.replace(replacement);
    assert_eq!(previous.len(), 2);
    assert_eq!(shared.generation(), 1);

    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(*shared.load().dispatch("x").into_match().unwrap().endpoint, Page::H1);
}

#[test]
fn test_long_non_matching_path_stays_fast() {
    let table = RoutingTable::builder()
        .route("{a}-{b}-{c}/end", Page::Items)
        .build()
        .unwrap();
    let path = "x-".repeat(1_500);

    let start = Instant::now();
    assert!(!table.dispatch(&path).is_match());
    let elapsed = start.elapsed();

    assert!(elapsed < Duration::from_secs(2), "dispatch took {elapsed:?}");
    assert!(table.dispatch(&format!("{path}z/end")).is_match());
}
