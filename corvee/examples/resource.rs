//! The classic driver-wrapper usage shape: open a resource, query it, then
//! close it, each step wrapped as its own task with completion handlers.
//!
//! Run with `RUST_LOG=debug cargo run --example resource` to see the
//! dispatcher lifecycle.

use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use corvee::{Cause, Promise, Task, handler};

/// A stand-in for any resource whose operations block: a driver connection,
/// a socket, a file store.
struct Archive {
    records: HashMap<String, String>,
}

impl Archive {
    /// Simulates a slow connection handshake.
    fn open(url: &str) -> Result<Archive, Cause> {
        thread::sleep(Duration::from_millis(100));
        if !url.starts_with("archive://") {
            return Err(format!("unsupported url: {url}").into());
        }

        let mut records = HashMap::new();
        records.insert("foo".to_string(), "bar".to_string());
        Ok(Archive { records })
    }

    /// Simulates a slow query.
    fn lookup(&self, key: &str) -> Result<String, Cause> {
        thread::sleep(Duration::from_millis(20));
        self.records
            .get(key)
            .cloned()
            .ok_or_else(|| format!("no record for key {key}").into())
    }
}

fn main() {
    env_logger::init();

    // Step 1: open the resource off-thread; the calling thread is free the
    // moment start() returns. The channel is our external wait primitive.
    let (opened_tx, opened_rx) = mpsc::channel();
    Promise::new(Task::new(|| {
        Archive::open("archive://localhost/testdb").map(std::sync::Arc::new)
    }))
    .add_handler(handler::from_fns(
        move |_promise, archive: &std::sync::Arc<Archive>| {
            let _ = opened_tx.send(archive.clone());
        },
        |_promise, cause| eprintln!("open failed: {cause}"),
    ))
    .expect("handlers can be added before start")
    .start()
    .expect("first start always succeeds");

    let archive = opened_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("open did not finish");
    println!("archive opened");

    // Step 2: run a query against it.
    let (found_tx, found_rx) = mpsc::channel();
    let query_target = archive.clone();
    Promise::new(Task::new(move || query_target.lookup("foo")))
        .add_handler(handler::from_fns(
            move |_promise, value: &String| {
                let _ = found_tx.send(value.clone());
            },
            |_promise, cause| eprintln!("lookup failed: {cause}"),
        ))
        .expect("handlers can be added before start")
        .start()
        .expect("first start always succeeds");

    let value = found_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("lookup did not finish");
    println!("foo -> {value}");

    // Step 3: a failing operation is delivered as data, not a crash.
    let (done_tx, done_rx) = mpsc::channel();
    let miss_target = archive.clone();
    Promise::new(Task::new(move || miss_target.lookup("missing")))
        .add_handler(handler::from_fns(
            |_promise, value: &String| println!("unexpectedly found {value}"),
            move |_promise, cause| {
                println!("as expected: {cause}");
                let _ = done_tx.send(());
            },
        ))
        .expect("handlers can be added before start")
        .start()
        .expect("first start always succeeds");

    done_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("lookup did not finish");
}
