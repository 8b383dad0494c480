//! Integration Tests for the TTL cache
//!
//! Exercises the public cache handle end to end: expiry timing against the
//! reaper, concurrent callers, and repeated construction and teardown.

use std::time::Duration;

use bytes::Bytes;
use pokedex::{CacheConfig, TtlCache};
use tokio::time::{advance, sleep};

// == Expiry Scenarios ==

#[tokio::test(start_paused = true)]
async fn test_short_ttl_scenario() {
    let cache = TtlCache::new(Duration::from_millis(100));

    cache.put("a", "x").await;
    assert_eq!(cache.get("a").await, Some(Bytes::from_static(b"x")));

    sleep(Duration::from_millis(250)).await;
    assert_eq!(cache.get("a").await, None);

    cache.close().await;
}

#[tokio::test(start_paused = true)]
async fn test_overwrite_scenario_with_default_interval() {
    let cache = TtlCache::new(Duration::from_secs(5));

    cache.put("u1", "A").await;
    sleep(Duration::from_secs(1)).await;
    cache.put("u1", "B").await;
    assert_eq!(cache.get("u1").await, Some(Bytes::from_static(b"B")));

    sleep(Duration::from_secs(3)).await;
    assert_eq!(cache.get("u1").await, Some(Bytes::from_static(b"B")));

    // Sweeps run at t=5s (age 4s, kept) and t=10s (age 9s, removed)
    sleep(Duration::from_millis(6500)).await;
    assert_eq!(cache.get("u1").await, None);

    cache.close().await;
}

#[tokio::test(start_paused = true)]
async fn test_overwrite_scenario_with_one_second_interval() {
    let cache = TtlCache::with_config(
        CacheConfig::new(Duration::from_secs(5)).with_reap_interval(Duration::from_secs(1)),
    );

    cache.put("u1", "A").await;
    sleep(Duration::from_secs(1)).await;
    cache.put("u1", "B").await;
    assert_eq!(cache.get("u1").await, Some(Bytes::from_static(b"B")));

    sleep(Duration::from_secs(3)).await;
    assert_eq!(cache.get("u1").await, Some(Bytes::from_static(b"B")));

    // The t=7s sweep sees age 6s and removes it
    sleep(Duration::from_millis(3500)).await;
    assert_eq!(cache.get("u1").await, None);

    cache.close().await;
}

#[tokio::test(start_paused = true)]
async fn test_expiry_after_ttl_plus_one_interval() {
    for ttl_ms in [10u64, 100, 1_000, 60_000] {
        let ttl = Duration::from_millis(ttl_ms);
        let cache = TtlCache::new(ttl);

        // Stagger the write so it lands between sweeps
        sleep(ttl / 3).await;
        cache.put("k", "v").await;

        sleep(ttl * 2 + Duration::from_millis(1)).await;
        assert_eq!(cache.get("k").await, None, "ttl {:?}", ttl);

        cache.close().await;
    }
}

#[tokio::test(start_paused = true)]
async fn test_no_premature_expiry() {
    let cache = TtlCache::new(Duration::from_secs(5));

    for i in 0..50 {
        let key = format!("https://pokeapi.co/api/v2/pokemon/{}", i);
        cache.put(key.clone(), Bytes::from(vec![i as u8; 16])).await;
        assert_eq!(cache.get(&key).await, Some(Bytes::from(vec![i as u8; 16])));
        advance(Duration::from_millis(50)).await;
    }

    cache.close().await;
}

#[tokio::test(start_paused = true)]
async fn test_stale_reads_are_bounded_by_one_interval() {
    let cache = TtlCache::new(Duration::from_secs(1));

    cache.put("k", "v").await;
    // Past the ttl, but the only sweep so far saw age == ttl
    sleep(Duration::from_millis(1500)).await;
    assert_eq!(cache.get("k").await, Some(Bytes::from_static(b"v")));

    sleep(Duration::from_millis(1000)).await;
    assert_eq!(cache.get("k").await, None);

    let stats = cache.stats().await;
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.expirations, 1);

    cache.close().await;
}

#[tokio::test(start_paused = true)]
async fn test_empty_key_and_payload() {
    let cache = TtlCache::new(Duration::from_secs(5));

    cache.put("", Bytes::new()).await;

    assert_eq!(cache.get("").await, Some(Bytes::new()));
    cache.close().await;
}

// == Concurrency ==

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_callers_on_distinct_keys() {
    let cache = TtlCache::new(Duration::from_secs(60));
    let workers = 16;
    let keys_per_worker = 100;

    let handles: Vec<_> = (0..workers)
        .map(|worker| {
            let cache = cache.clone();
            tokio::spawn(async move {
                for i in 0..keys_per_worker {
                    let key = format!("worker{}/key{}", worker, i);
                    let payload = Bytes::from(format!("{}:{}", worker, i));
                    cache.put(key.clone(), payload.clone()).await;
                    assert_eq!(cache.get(&key).await, Some(payload));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(cache.len().await, workers * keys_per_worker);
    for worker in 0..workers {
        for i in 0..keys_per_worker {
            let key = format!("worker{}/key{}", worker, i);
            assert_eq!(
                cache.get(&key).await,
                Some(Bytes::from(format!("{}:{}", worker, i)))
            );
        }
    }

    cache.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_writes_to_one_key_are_atomic() {
    let cache = TtlCache::new(Duration::from_secs(60));
    let old = Bytes::from(vec![b'a'; 4096]);
    let new = Bytes::from(vec![b'b'; 4096]);
    cache.put("shared", old.clone()).await;

    let writer = {
        let cache = cache.clone();
        let (old, new) = (old.clone(), new.clone());
        tokio::spawn(async move {
            for i in 0..500 {
                let payload = if i % 2 == 0 { new.clone() } else { old.clone() };
                cache.put("shared", payload).await;
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let cache = cache.clone();
            let (old, new) = (old.clone(), new.clone());
            tokio::spawn(async move {
                for _ in 0..500 {
                    let seen = cache.get("shared").await.expect("key is never removed");
                    assert!(seen == old || seen == new, "observed a torn value");
                }
            })
        })
        .collect();

    writer.await.unwrap();
    for reader in readers {
        reader.await.unwrap();
    }

    cache.close().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_callers_race_with_busy_reaper() {
    // Sweeps every millisecond while callers write and read
    let cache = TtlCache::with_config(
        CacheConfig::new(Duration::from_secs(30)).with_reap_interval(Duration::from_millis(1)),
    );

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let cache = cache.clone();
            tokio::spawn(async move {
                for i in 0..200 {
                    let key = format!("{}-{}", worker, i);
                    cache.put(key.clone(), Bytes::from_static(b"fresh")).await;
                    assert!(cache.get(&key).await.is_some());
                    if i % 50 == 0 {
                        tokio::task::yield_now().await;
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(cache.len().await, 8 * 200);
    assert!(cache.health().alive);
    cache.close().await;
}

// == Lifecycle ==

#[tokio::test(start_paused = true)]
async fn test_repeated_construction_and_teardown() {
    let mut caches = Vec::new();
    for i in 0..50u64 {
        let cache = TtlCache::new(Duration::from_millis(10 + i));
        cache.put("k", "v").await;
        caches.push(cache);
    }

    sleep(Duration::from_millis(200)).await;

    for cache in &caches {
        assert!(cache.is_empty().await);
        assert!(cache.health().is_healthy());
        cache.close().await;
        assert!(!cache.health().alive);
    }
}

#[tokio::test(start_paused = true)]
async fn test_health_is_shared_across_clones() {
    let cache = TtlCache::new(Duration::from_secs(1));
    let clone = cache.clone();

    sleep(Duration::from_millis(3500)).await;
    assert_eq!(cache.health().sweeps, 3);
    assert_eq!(clone.health(), cache.health());

    clone.close().await;
    assert!(!cache.health().alive);
}
