use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use workpool::{PoolError, ThreadPool};

#[test]
fn zero_workers_is_a_configuration_error() {
    assert!(matches!(ThreadPool::new(0), Err(PoolError::ZeroWorkers)));
}

#[test]
fn submit_returns_the_callables_value() {
    let mut pool = ThreadPool::new(4).unwrap();
    pool.init().unwrap();

    let handle = pool.submit(|| 5 * 6).unwrap();
    assert_eq!(handle.get().unwrap(), 30);

    pool.shutdown().unwrap();
}

#[test]
fn owned_arguments_move_into_the_task() {
    let mut pool = ThreadPool::new(2).unwrap();
    pool.init().unwrap();

    let greeting = String::from("hello");
    let handle = pool.submit(move || format!("{greeting} pool")).unwrap();
    assert_eq!(handle.get().unwrap(), "hello pool");

    pool.shutdown().unwrap();
}

#[test]
fn a_thousand_tasks_all_run_exactly_once() {
    let mut pool = ThreadPool::new(4).unwrap();
    pool.init().unwrap();

    let counter = Arc::new(AtomicUsize::new(0));
    for _ in 0..1000 {
        let counter = Arc::clone(&counter);
        pool.submit(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
    }

    pool.shutdown().unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 1000);
}

#[test]
fn panicking_task_fails_its_own_handle_only() {
    let mut pool = ThreadPool::new(1).unwrap();
    pool.init().unwrap();

    let failing = pool
        .submit(|| -> u32 {
            let divisor = std::hint::black_box(0);
            1 / divisor
        })
        .unwrap();
    match failing.get() {
        Err(PoolError::TaskPanicked(msg)) => assert!(msg.contains("divide by zero")),
        other => panic!("expected TaskPanicked, got {other:?}"),
    }

    // The single worker survived the panic and keeps executing.
    let next = pool.submit(|| 7).unwrap();
    assert_eq!(next.get().unwrap(), 7);

    pool.shutdown().unwrap();
}

#[test]
fn submit_after_shutdown_is_rejected() {
    let mut pool = ThreadPool::new(2).unwrap();
    pool.init().unwrap();
    pool.shutdown().unwrap();

    assert!(matches!(pool.submit(|| 1), Err(PoolError::ShutDown)));
}

#[test]
fn submit_before_init_is_rejected() {
    let pool = ThreadPool::new(2).unwrap();
    assert!(matches!(pool.submit(|| 1), Err(PoolError::NotInitialized)));
}

#[test]
fn double_init_is_rejected() {
    let mut pool = ThreadPool::new(1).unwrap();
    pool.init().unwrap();
    assert!(matches!(pool.init(), Err(PoolError::AlreadyInitialized)));
    pool.shutdown().unwrap();
}

#[test]
fn double_shutdown_is_rejected() {
    let mut pool = ThreadPool::new(1).unwrap();
    pool.init().unwrap();
    pool.shutdown().unwrap();
    assert!(matches!(pool.shutdown(), Err(PoolError::AlreadyShutDown)));
}

#[test]
fn idle_pool_shuts_down_without_deadlock() {
    let mut pool = ThreadPool::new(1).unwrap();
    pool.init().unwrap();
    pool.shutdown().unwrap();
}

#[test]
fn shutdown_drains_every_queued_task() {
    let mut pool = ThreadPool::new(1).unwrap();
    pool.init().unwrap();

    let counter = Arc::new(AtomicUsize::new(0));

    // Occupy the single worker so the remaining tasks pile up queued.
    {
        let counter = Arc::clone(&counter);
        pool.submit(move || {
            thread::sleep(Duration::from_millis(100));
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
    }
    for _ in 0..50 {
        let counter = Arc::clone(&counter);
        pool.submit(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();
    }

    pool.shutdown().unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 51);
}

#[test]
fn concurrent_submitters_lose_no_tasks() {
    const SUBMITTERS: usize = 8;
    const PER_SUBMITTER: usize = 200;

    let mut pool = ThreadPool::new(4).unwrap();
    pool.init().unwrap();

    let counter = Arc::new(AtomicUsize::new(0));
    thread::scope(|s| {
        for _ in 0..SUBMITTERS {
            let pool = &pool;
            let counter = &counter;
            s.spawn(move || {
                for _ in 0..PER_SUBMITTER {
                    let counter = Arc::clone(counter);
                    pool.submit(move || {
                        counter.fetch_add(1, Ordering::SeqCst);
                    })
                    .unwrap();
                }
            });
        }
    });

    pool.shutdown().unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), SUBMITTERS * PER_SUBMITTER);
}

#[test]
fn handle_wait_and_is_finished_observe_completion() {
    let mut pool = ThreadPool::new(1).unwrap();
    pool.init().unwrap();

    let handle = pool
        .submit(|| {
            thread::sleep(Duration::from_millis(20));
            99
        })
        .unwrap();
    handle.wait();
    assert!(handle.is_finished());
    assert_eq!(handle.get().unwrap(), 99);

    pool.shutdown().unwrap();
}

#[test]
fn queued_tasks_is_bounded_by_submissions() {
    let mut pool = ThreadPool::new(1).unwrap();
    pool.init().unwrap();

    let started = Arc::new(AtomicUsize::new(0));
    {
        let started = Arc::clone(&started);
        pool.submit(move || {
            started.store(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(50));
        })
        .unwrap();
    }
    while started.load(Ordering::SeqCst) == 0 {
        thread::yield_now();
    }
    for _ in 0..10 {
        pool.submit(|| ()).unwrap();
    }
    // Snapshot only: at most the 10 tasks behind the sleeper are queued.
    assert!(pool.queued_tasks() <= 10);

    pool.shutdown().unwrap();
    assert_eq!(pool.queued_tasks(), 0);
    assert!(pool.is_idle());
}

#[test]
fn dropping_a_running_pool_drains_queued_work() {
    let counter = Arc::new(AtomicUsize::new(0));
    {
        let mut pool = ThreadPool::new(2).unwrap();
        pool.init().unwrap();
        for _ in 0..100 {
            let counter = Arc::clone(&counter);
            pool.submit(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        }
    }
    assert_eq!(counter.load(Ordering::SeqCst), 100);
}

#[test]
fn thread_count_reports_configured_size() {
    let pool = ThreadPool::new(3).unwrap();
    assert_eq!(pool.thread_count(), 3);
}

#[test]
fn default_sized_pool_works_end_to_end() {
    let mut pool = ThreadPool::with_default_size().unwrap();
    assert_eq!(pool.thread_count(), workpool::DEFAULT_WORKERS);
    pool.init().unwrap();
    let handle = pool.submit(|| 2 + 2).unwrap();
    assert_eq!(handle.get().unwrap(), 4);
    pool.shutdown().unwrap();
}
