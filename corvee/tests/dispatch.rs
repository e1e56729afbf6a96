use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

use corvee::{DispatcherBuilder, Promise, State, Task, dispatch, handler};

#[test]
fn test_single_worker_runs_in_submission_order() {
    let dispatcher = DispatcherBuilder::new().worker_threads(1).build();
    let events = Arc::new(Mutex::new(Vec::new()));

    let first = {
        let events = events.clone();
        Promise::with_dispatcher(
            Task::new(move || {
                // Stall so the second task is queued behind this one.
                thread::sleep(Duration::from_millis(50));
                events.lock().unwrap().push("first:run");
                Ok(())
            }),
            &dispatcher,
        )
    };
    {
        let events = events.clone();
        first
            .add_handler(handler::from_fns(
                move |_p: &Promise<()>, _v: &()| {
                    events.lock().unwrap().push("first:broadcast");
                },
                |_p, _c| {},
            ))
            .unwrap();
    }

    let (tx, rx) = mpsc::channel();
    let second = {
        let events = events.clone();
        Promise::with_dispatcher(
            Task::new(move || {
                events.lock().unwrap().push("second:run");
                Ok(())
            }),
            &dispatcher,
        )
    };
    second
        .add_handler(handler::from_fns(
            move |_p: &Promise<()>, _v: &()| tx.send(()).unwrap(),
            |_p, _c| {},
        ))
        .unwrap();

    first.start().unwrap();
    second.start().unwrap();

    rx.recv_timeout(Duration::from_secs(5)).unwrap();

    // The first promise's broadcast happens-before the second task begins:
    // a single worker processes strictly in submission order.
    assert_eq!(
        *events.lock().unwrap(),
        vec!["first:run", "first:broadcast", "second:run"]
    );
}

#[test]
fn test_multi_worker_completes_everything() {
    let dispatcher = DispatcherBuilder::new().worker_threads(4).build();

    let total = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = mpsc::channel();

    for i in 0..20 {
        let total = total.clone();
        let tx = tx.clone();
        let promise = Promise::with_dispatcher(
            Task::new(move || {
                total.fetch_add(i, Ordering::SeqCst);
                Ok(i)
            }),
            &dispatcher,
        );
        promise
            .add_handler(handler::from_fns(
                move |_p: &Promise<usize>, _v: &usize| tx.send(()).unwrap(),
                |_p, _c| {},
            ))
            .unwrap();
        promise.start().unwrap();
    }

    for _ in 0..20 {
        rx.recv_timeout(Duration::from_secs(5)).unwrap();
    }
    assert_eq!(total.load(Ordering::SeqCst), (0..20).sum());
}

#[test]
#[should_panic(expected = "worker_threads must be > 0")]
fn test_zero_worker_threads_panics() {
    let _ = DispatcherBuilder::new().worker_threads(0).build();
}

#[test]
fn test_installed_dispatcher_is_shared() {
    dispatch::install(DispatcherBuilder::new().worker_threads(2).build());

    // Promises built without an explicit dispatcher go through the
    // installed pool.
    let promise = Promise::new(Task::new(|| Ok(11)));
    let (tx, rx) = mpsc::channel();
    promise
        .add_handler(handler::from_fns(
            move |_p: &Promise<i32>, value: &i32| tx.send(*value).unwrap(),
            |_p, _c| {},
        ))
        .unwrap();
    promise.start().unwrap();

    assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 11);
    assert_eq!(promise.state(), State::Completed);
}

#[test]
fn test_drop_joins_workers_after_inflight_task() {
    let dispatcher = DispatcherBuilder::new().worker_threads(2).build();

    let promise = Promise::with_dispatcher(Task::new(|| Ok(5)), &dispatcher);
    let (tx, rx) = mpsc::channel();
    promise
        .add_handler(handler::from_fns(
            move |_p: &Promise<i32>, _v: &i32| tx.send(()).unwrap(),
            |_p, _c| {},
        ))
        .unwrap();
    promise.start().unwrap();
    rx.recv_timeout(Duration::from_secs(5)).unwrap();

    // All clones gone: the pool shuts down and joins its workers.
    drop(promise);
    drop(dispatcher);
}
