//! Concurrent resolutions sharing one cache

mod common;

use common::{Doubles, Farm};
use futures::future::join_all;
use std::sync::Arc;
use warden_cache::SecurityCache;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resolutions_converge() {
    warden_utils::tracing::init_for_tests();
    let farm = Arc::new(Farm::new());
    let doubles = Doubles::standard(&farm);
    let loader = Arc::new(doubles.loader(SecurityCache::default()));

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let loader = Arc::clone(&loader);
            let farm = Arc::clone(&farm);
            tokio::spawn(async move { loader.resolve_access(&farm.alice, &farm.doc).await })
        })
        .collect();

    let entries: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|joined| joined.unwrap().unwrap())
        .collect();

    assert!(entries.windows(2).all(|pair| pair[0] == pair[1]));
    let cache = loader.cache();
    assert_eq!(cache.len(), 8);
    assert_eq!(cache.stats().conflicts, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_resolutions_survive_concurrent_removals() {
    let farm = Arc::new(Farm::new());
    let doubles = Doubles::standard(&farm);
    let loader = Arc::new(doubles.loader(SecurityCache::default()));

    let readers: Vec<_> = (0..8)
        .map(|worker| {
            let loader = Arc::clone(&loader);
            let farm = Arc::clone(&farm);
            tokio::spawn(async move {
                for round in 0..50 {
                    let (user, entity) = match (worker + round) % 3 {
                        0 => (&farm.alice, &farm.doc),
                        1 => (&farm.bob, &farm.doc),
                        _ => (&farm.alice, &farm.other_doc),
                    };
                    if let Err(err) = loader.resolve_access(user, entity).await {
                        assert!(err.is_exhausted(), "unexpected error: {err}");
                    }
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();

    let removers: Vec<_> = (0..2)
        .map(|worker| {
            let cache = loader.cache().clone();
            let farm = Arc::clone(&farm);
            tokio::spawn(async move {
                for round in 0..100 {
                    let victim = match (worker + round) % 4 {
                        0 => &farm.wiki,
                        1 => &farm.space,
                        2 => &farm.admins,
                        _ => &farm.other_editors,
                    };
                    cache.remove(victim);
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();

    for joined in join_all(readers.into_iter().chain(removers)).await {
        joined.unwrap();
    }

    // Every surviving access entry still has its user and entity
    let cache = loader.cache();
    for (user, entity) in [
        (&farm.alice, &farm.doc),
        (&farm.bob, &farm.doc),
        (&farm.alice, &farm.other_doc),
    ] {
        if cache.get_access(user, entity).is_some() {
            assert!(cache.get(user).is_some(), "{user} outlived by its access");
            assert!(cache.get(entity).is_some(), "{entity} outlived by its access");
        }
    }
    if cache.get(&farm.alice).is_some() {
        assert!(cache.get(&farm.admins).is_some());
    }

    // Once the removals stop, loading succeeds again
    let entry = loader.resolve_access(&farm.alice, &farm.doc).await.unwrap();
    assert_eq!(entry.entity(), &farm.doc);
}
