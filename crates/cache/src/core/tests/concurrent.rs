//! Concurrent insertion and removal tests

use super::{access, add_chain, rules, Farm};
use crate::core::SecurityCache;
use crate::errors::Result;
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn test_concurrent_identical_insertions() {
    let farm = Arc::new(Farm::new());
    let cache = SecurityCache::default();
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = cache.clone();
            let farm = Arc::clone(&farm);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                add_chain(&cache, &farm.doc);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(cache.len(), 4);
    let stats = cache.stats();
    assert_eq!(stats.insertions, 4);
    assert_eq!(stats.duplicates, 28);
}

/// Insert the whole fixture, giving up at the first race
fn try_populate(cache: &SecurityCache, farm: &Farm) -> Result<()> {
    let users_space = farm.users.ancestors().into_iter().skip(2);
    for link in farm.doc.ancestors().into_iter().chain(users_space) {
        cache.add(rules(&link))?;
    }
    cache.add_user(rules(&farm.admins), vec![])?;
    cache.add_user(rules(&farm.alice), vec![farm.admins.clone()])?;
    cache.add_access(access(&farm.alice, &farm.doc))
}

#[test]
fn test_concurrent_insert_and_remove_keep_hierarchy_complete() {
    let farm = Arc::new(Farm::new());
    let cache = SecurityCache::default();
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let cache = cache.clone();
            let farm = Arc::clone(&farm);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for round in 0..200 {
                    if worker % 2 == 0 {
                        if let Err(err) = try_populate(&cache, &farm) {
                            assert!(err.is_parent_evicted(), "unexpected error: {err}");
                        }
                    } else {
                        let victim = match (worker + round) % 3 {
                            0 => &farm.wiki,
                            1 => &farm.space,
                            _ => &farm.admins,
                        };
                        cache.remove(victim);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let references = [
        &farm.farm,
        &farm.wiki,
        &farm.space,
        &farm.doc,
        &farm.users,
        &farm.admins,
        &farm.alice,
    ];
    let mut cached = 0;
    for reference in references {
        if cache.get(reference).is_some() {
            cached += 1;
            if let Some(parent) = reference.parent() {
                assert!(cache.get(parent).is_some(), "{reference} outlived its parent");
            }
        }
    }
    if cache.get(&farm.alice).is_some() {
        assert!(cache.get(&farm.admins).is_some());
    }
    if cache.get_access(&farm.alice, &farm.doc).is_some() {
        cached += 1;
        assert!(cache.get(&farm.alice).is_some());
        assert!(cache.get(&farm.doc).is_some());
    }

    // No disposed node is left behind in the store
    assert_eq!(cache.len(), cached);
}
