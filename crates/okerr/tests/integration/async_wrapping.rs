//! Async wrappers: panics before and after the first suspension point.

use std::time::Duration;

use okerr::{Error, Outcome, Settle, wrap_async, wrap_async_throwable};

use crate::common::init_tracing;

async fn slow_double(n: u32) -> u32 {
    tokio::time::sleep(Duration::from_millis(5)).await;
    n * 2
}

async fn slow_panic(message: &'static str) -> u32 {
    tokio::time::sleep(Duration::from_millis(5)).await;
    panic!("{}", message)
}

#[tokio::test]
async fn test_wrap_async_ok() {
    let outcome = wrap_async(|| slow_double(21)).await;
    assert_eq!(outcome.unwrap(), 42);
}

#[tokio::test]
async fn test_wrap_async_panic_after_await() {
    init_tracing();
    let outcome = wrap_async(|| slow_panic("late failure")).await;
    assert_eq!(outcome.error().map(Error::message), Some("late failure"));
}

#[tokio::test]
async fn test_wrap_async_panic_before_future_exists() {
    let outcome = wrap_async(|| -> std::future::Ready<u32> { panic!("too early") }).await;
    assert_eq!(outcome.error().map(Error::message), Some("too early"));
}

#[tokio::test]
async fn test_wrap_async_throwable_keeps_parameters() {
    let scaled = wrap_async_throwable(|n: u32, factor: u32| async move {
        tokio::time::sleep(Duration::from_millis(1)).await;
        n * factor
    });
    assert_eq!(scaled((6, 7)).await.unwrap(), 42);
}

#[tokio::test]
async fn test_wrap_async_throwable_catches_sync_and_async_panics() {
    let checked = wrap_async_throwable(|n: u32| {
        if n == 0 {
            panic!("rejected before start");
        }
        slow_panic("rejected while running")
    });

    let early = checked((0,)).await;
    assert_eq!(early.error().map(Error::message), Some("rejected before start"));

    let late = checked((1,)).await;
    assert_eq!(late.error().map(Error::message), Some("rejected while running"));
}

#[tokio::test]
async fn test_wrap_async_throwable_future_can_be_spawned() {
    let doubled = wrap_async_throwable(slow_double);
    let handles: Vec<_> = (1..=3).map(|n| tokio::spawn(doubled((n,)))).collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap().unwrap());
    }
    assert_eq!(results, vec![2, 4, 6]);
}

#[tokio::test]
async fn test_wrap_async_throwable_future_is_nameable() {
    fn start(n: u32) -> Settle<std::future::Ready<u32>> {
        let checked = wrap_async_throwable(|n: u32| {
            if n == 0 {
                panic!("zero");
            }
            std::future::ready(n)
        });
        checked((n,))
    }

    let pending: Vec<Settle<std::future::Ready<u32>>> = vec![start(0), start(9)];
    let settled: Vec<Outcome<u32>> = futures::future::join_all(pending).await;
    assert_eq!(settled[0].error().map(Error::message), Some("zero"));
    assert_eq!(settled[1].ok(), Some(&9));
}

#[tokio::test(start_paused = true)]
async fn test_wrap_async_adds_no_delay() {
    let started = tokio::time::Instant::now();
    let outcome = wrap_async(|| slow_double(1)).await;
    assert_eq!(outcome.unwrap(), 2);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(5));
    assert!(elapsed < Duration::from_millis(10));
}
