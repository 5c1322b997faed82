/*!
 * Broadcast Tests
 * Fan-out delivery, probation and eviction through the public API
 */

use futures::StreamExt;
use gensync::broadcast::{BroadcastConfig, Broadcaster, Delivery};
use gensync::{ConsumerId, SyncError};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_fast_consumer_receives_every_value_in_order() {
    let broadcaster = Broadcaster::<u32>::new();
    let consumer = broadcaster.register_with(Delivery::Buffered(64));
    let (ingress, task) = broadcaster.ingress_with_handle().unwrap();

    for v in 0..50 {
        ingress.send_async(v).await.unwrap();
    }
    drop(ingress);
    assert_eq!(task.await.unwrap(), 50);

    let received: Vec<u32> = (0..50).map(|_| consumer.try_recv().unwrap().unwrap()).collect();
    assert_eq!(received, (0..50).collect::<Vec<_>>());
    assert!(broadcaster.is_registered(consumer.id()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_reader_with_stream() {
    let broadcaster = Broadcaster::<u32>::new();
    let consumer = broadcaster.register_with(Delivery::Buffered(16));
    let ingress = broadcaster.ingress().unwrap();

    let reader = tokio::spawn(async move {
        consumer.stream().take(10).collect::<Vec<_>>().await
    });

    for v in 0..10 {
        ingress.send_async(v).await.unwrap();
    }

    let received = reader.await.unwrap();
    assert_eq!(received, (0..10).collect::<Vec<_>>());
}

#[test]
fn test_idle_consumer_evicted_after_two_rounds() {
    let (dead_tx, dead_rx) = flume::unbounded();
    let broadcaster = Broadcaster::<&str>::builder()
        .with_dead_sink(dead_tx)
        .build();
    let idle = broadcaster.register();

    let first = broadcaster.publish("one");
    assert!(first.evicted.is_empty());
    assert!(broadcaster.is_on_probation(idle.id()));

    let second = broadcaster.publish("two");
    assert_eq!(second.evicted, vec![idle.id()]);

    // Nothing further is reported once it is gone
    broadcaster.publish("three");
    let dead: Vec<ConsumerId> = dead_rx.try_iter().collect();
    assert_eq!(dead, vec![idle.id()]);
    assert_eq!(broadcaster.consumer_count(), 0);
}

#[test]
fn test_single_stall_is_tolerated() {
    let broadcaster = Broadcaster::<u32>::new();
    let consumer = broadcaster.register_with(Delivery::Buffered(1));

    for round in 0..10u32 {
        let first = broadcaster.publish(round * 2);
        let second = broadcaster.publish(round * 2 + 1);

        assert_eq!(first.delivered, 1);
        assert_eq!(second.probation, vec![consumer.id()]);

        // Resume reading before a second consecutive miss
        assert_eq!(consumer.recv().unwrap(), round * 2);
    }

    assert!(broadcaster.is_registered(consumer.id()));
    assert_eq!(broadcaster.stats().evicted, 0);
}

/// The reader is a rendezvous consumer, so a value only reaches it while it
/// is parked in `recv_timeout`. It announces each read before blocking and
/// the publisher allows it a short grace period after that; this remains a
/// timing-dependent test on heavily loaded hosts.
#[test]
fn test_reader_and_idle_consumer_scenario() {
    let (dead_tx, dead_rx) = flume::unbounded();
    let broadcaster = Broadcaster::<u32>::builder()
        .with_dead_sink(dead_tx)
        .build();

    let reader = broadcaster.register();
    let idle = broadcaster.register_with(Delivery::Buffered(1));
    let reader_id = reader.id();
    let idle_id = idle.id();

    let (ready_tx, ready_rx) = flume::unbounded();
    let handle = thread::spawn(move || {
        (0..3)
            .map(|_| {
                ready_tx.send(()).unwrap();
                reader.recv_timeout(Duration::from_secs(5)).unwrap()
            })
            .collect::<Vec<u32>>()
    });

    let mut reports = Vec::new();
    for v in [1, 2, 3] {
        ready_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        thread::sleep(Duration::from_millis(50));
        reports.push(broadcaster.publish(v));
    }

    assert_eq!(handle.join().unwrap(), vec![1, 2, 3]);
    assert!(reports[0].probation.is_empty());
    assert_eq!(reports[1].probation, vec![idle_id]);
    assert_eq!(reports[2].evicted, vec![idle_id]);

    assert!(broadcaster.is_registered(reader_id));
    assert!(!broadcaster.is_registered(idle_id));
    assert_eq!(dead_rx.try_iter().collect::<Vec<_>>(), vec![idle_id]);

    // The value buffered before eviction is still readable
    assert_eq!(idle.try_recv().unwrap(), Some(1));
    assert!(matches!(idle.try_recv(), Err(SyncError::Disconnected(_))));
}

#[test]
fn test_overlapping_rounds_evict_idle_consumer_once() {
    for _ in 0..50 {
        let (dead_tx, dead_rx) = flume::unbounded();
        let broadcaster = Broadcaster::<u32>::builder()
            .with_dead_sink(dead_tx)
            .build();
        let idle = broadcaster.register();
        let barrier = Arc::new(Barrier::new(4));

        let publishers: Vec<_> = (0..4)
            .map(|_| {
                let broadcaster = broadcaster.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    broadcaster.publish(1)
                })
            })
            .collect();

        let reports: Vec<_> = publishers.into_iter().map(|p| p.join().unwrap()).collect();
        let probation: usize = reports.iter().map(|r| r.probation.len()).sum();
        let evicted: usize = reports.iter().map(|r| r.evicted.len()).sum();

        assert_eq!(probation, 1);
        assert_eq!(evicted, 1);
        assert!(!broadcaster.is_registered(idle.id()));
        assert_eq!(dead_rx.try_iter().collect::<Vec<_>>(), vec![idle.id()]);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_handler_runs_for_every_value_without_consumers() {
    let handled = Arc::new(AtomicUsize::new(0));
    let handled_clone = handled.clone();
    let broadcaster = Broadcaster::<usize>::builder()
        .with_handler(move |_| {
            handled_clone.fetch_add(1, Ordering::SeqCst);
        })
        .build();

    let (ingress, task) = broadcaster.ingress_with_handle().unwrap();
    for v in 0..20 {
        ingress.send_async(v).await.unwrap();
    }
    ingress.close();

    task.await.unwrap();
    assert_eq!(handled.load(Ordering::SeqCst), 20);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_closing_one_ingress_clone_keeps_dispatching() {
    let broadcaster = Broadcaster::<u8>::new();
    let consumer = broadcaster.register_with(Delivery::Buffered(8));
    let (ingress, task) = broadcaster.ingress_with_handle().unwrap();
    let second = ingress.clone();

    ingress.close();
    second.send_async(1).await.unwrap();
    second.send_async(2).await.unwrap();
    assert!(!second.is_closed());
    drop(second);

    assert_eq!(task.await.unwrap(), 2);
    assert_eq!(consumer.len(), 2);
}

#[test]
fn test_blocking_send_from_plain_thread() {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap();

    let broadcaster =
        Broadcaster::<u16>::builder().with_config(BroadcastConfig::buffered_consumers(4)).build();
    let consumer = broadcaster.register();
    assert_eq!(consumer.capacity(), 4);

    let (ingress, task) = broadcaster.ingress_on(runtime.handle());
    ingress.send(7).unwrap();
    ingress.send(8).unwrap();
    drop(ingress);

    assert_eq!(runtime.block_on(task).unwrap(), 2);
    assert_eq!(consumer.recv().unwrap(), 7);
    assert_eq!(consumer.recv().unwrap(), 8);
}

#[test]
fn test_invalid_delivery_arity_is_rejected() {
    let args: &[usize] = &[1, 2, 3];
    let err = Delivery::try_from(args).unwrap_err();
    assert!(matches!(err, SyncError::InvalidArgument(_)));
}

#[test]
fn test_registration_during_publishing() {
    let broadcaster = Broadcaster::<u64>::new();
    let publisher = {
        let broadcaster = broadcaster.clone();
        thread::spawn(move || {
            for v in 0..500 {
                broadcaster.publish(v);
            }
        })
    };

    let consumers: Vec<_> = (0..50)
        .map(|_| broadcaster.register_with(Delivery::Buffered(1024)))
        .collect();
    publisher.join().unwrap();

    // Large buffers never miss, so every consumer is still registered
    for consumer in &consumers {
        assert!(broadcaster.is_registered(consumer.id()));
    }
    let stats = broadcaster.stats();
    assert_eq!(stats.rounds, 500);
    assert_eq!(stats.evicted, 0);
    assert_eq!(stats.consumers, 50);
}
