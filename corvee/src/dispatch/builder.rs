use super::Dispatcher;

/// Builder for configuring and creating a [`Dispatcher`].
///
/// `DispatcherBuilder` allows customizing the pool before constructing it.
/// Currently, it supports configuring the number of worker threads.
///
/// # Examples
///
/// ```rust,ignore
/// let dispatcher = DispatcherBuilder::new()
///     .worker_threads(4)
///     .build();
/// ```
pub struct DispatcherBuilder {
    /// Number of worker threads in the pool.
    worker_threads: usize,
}

impl DispatcherBuilder {
    /// Creates a new `DispatcherBuilder` with default configuration.
    ///
    /// The default is a single worker thread, which serializes all submitted
    /// tasks in submission order. This is the configuration the process-wide
    /// shared dispatcher is created with.
    pub fn new() -> Self {
        Self { worker_threads: 1 }
    }

    /// Sets the number of worker threads used by the dispatcher.
    ///
    /// With more than one worker, no execution-order guarantee holds across
    /// different promises.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn worker_threads(mut self, n: usize) -> Self {
        assert!(n > 0, "worker_threads must be > 0");

        self.worker_threads = n;
        self
    }

    /// Builds the dispatcher with the configured options.
    ///
    /// This spawns the worker threads immediately.
    pub fn build(self) -> Dispatcher {
        Dispatcher::new(self.worker_threads)
    }
}

impl Default for DispatcherBuilder {
    /// Creates a default `DispatcherBuilder`.
    fn default() -> Self {
        Self::new()
    }
}
