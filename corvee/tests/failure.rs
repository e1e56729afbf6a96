use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::time::Duration;

use corvee::{Cause, Promise, State, Task, handler};

#[test]
fn test_failure_routed_to_every_handler() {
    let _ = env_logger::builder().is_test(true).try_init();

    let promise = Promise::new(Task::new(|| -> Result<i32, Cause> { Err("boom".into()) }));

    let completions = Arc::new(AtomicUsize::new(0));
    let causes = Arc::new(Mutex::new(Vec::new()));

    for _ in 0..2 {
        let completions = completions.clone();
        let causes = causes.clone();
        promise
            .add_handler(handler::from_fns(
                move |_p: &Promise<i32>, _v: &i32| {
                    completions.fetch_add(1, Ordering::SeqCst);
                },
                move |_p, cause: &Cause| {
                    causes.lock().unwrap().push(cause.to_string());
                },
            ))
            .unwrap();
    }

    let (tx, rx) = mpsc::channel();
    promise
        .add_handler(handler::from_fns(
            move |_p: &Promise<i32>, _v: &i32| {},
            move |_p, _c| tx.send(()).unwrap(),
        ))
        .unwrap();

    promise.start().unwrap();
    rx.recv_timeout(Duration::from_secs(5)).unwrap();

    assert_eq!(promise.state(), State::Faulted);
    assert_eq!(completions.load(Ordering::SeqCst), 0);
    assert_eq!(*causes.lock().unwrap(), vec!["boom", "boom"]);
}

#[test]
fn test_panic_in_task_becomes_failure() {
    let promise = Promise::new(Task::new(|| -> Result<i32, Cause> {
        panic!("wires crossed");
    }));

    let (tx, rx) = mpsc::channel();
    promise
        .add_handler(handler::from_fns(
            |_p: &Promise<i32>, _v: &i32| panic!("task should not complete"),
            move |_p, cause: &Cause| tx.send(cause.to_string()).unwrap(),
        ))
        .unwrap();

    promise.start().unwrap();

    let message = rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert!(message.contains("wires crossed"), "got: {message}");
    assert_eq!(promise.state(), State::Faulted);
}

#[test]
fn test_panicking_handler_does_not_stop_broadcast() {
    let _ = env_logger::builder().is_test(true).try_init();

    let promise = Promise::new(Task::new(|| Ok(9)));

    promise
        .add_handler(handler::from_fns(
            |_p: &Promise<i32>, _v: &i32| panic!("misbehaving handler"),
            |_p, _c| {},
        ))
        .unwrap();

    let (tx, rx) = mpsc::channel();
    promise
        .add_handler(handler::from_fns(
            move |_p: &Promise<i32>, value: &i32| tx.send(*value).unwrap(),
            |_p, _c| {},
        ))
        .unwrap();

    promise.start().unwrap();

    // The second handler is still notified despite the first one panicking.
    assert_eq!(rx.recv_timeout(Duration::from_secs(5)).unwrap(), 9);
    assert_eq!(promise.state(), State::Completed);
}

#[test]
fn test_terminal_states_are_exclusive() {
    let succeeds = Promise::new(Task::new(|| Ok(())));
    let fails = Promise::new(Task::new(|| -> Result<(), Cause> { Err("no".into()) }));

    let (tx_ok, rx_ok) = mpsc::channel();
    succeeds
        .add_handler(handler::from_fns(
            move |_p: &Promise<()>, _v: &()| tx_ok.send(()).unwrap(),
            |_p, _c| {},
        ))
        .unwrap();

    let (tx_err, rx_err) = mpsc::channel();
    fails
        .add_handler(handler::from_fns(
            |_p: &Promise<()>, _v: &()| {},
            move |_p, _c| tx_err.send(()).unwrap(),
        ))
        .unwrap();

    succeeds.start().unwrap();
    fails.start().unwrap();

    rx_ok.recv_timeout(Duration::from_secs(5)).unwrap();
    rx_err.recv_timeout(Duration::from_secs(5)).unwrap();

    assert_eq!(succeeds.state(), State::Completed);
    assert_eq!(fails.state(), State::Faulted);
}
