use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

/// Bounded fork-join pool with explicit slot accounting.
///
/// Slots track how many more units of work may be handed out. Callers ask
/// for slots without blocking and fall back to running inline when none are
/// free, which keeps deep recursion from flooding the pool.
pub struct WorkerPool {
    pool: ThreadPool,
    capacity: usize,
    available: AtomicUsize,
}

impl WorkerPool {
    pub fn new(threads: usize) -> Result<Self, ThreadPoolBuildError> {
        let threads = threads.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|index| format!("purefn-worker-{}", index))
            .build()?;
        Ok(Self {
            pool,
            capacity: threads,
            available: AtomicUsize::new(threads),
        })
    }

    /// Pool sized to the machine's available parallelism.
    pub fn with_default_size() -> Result<Self, ThreadPoolBuildError> {
        let threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        Self::new(threads)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn available(&self) -> usize {
        self.available.load(Ordering::Acquire)
    }

    /// Takes `slots` slots if that many are free. The slots return to the
    /// pool when the reservation is dropped.
    pub fn try_reserve(&self, slots: usize) -> Option<Reservation<'_>> {
        self.available
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |free| {
                free.checked_sub(slots)
            })
            .ok()
            .map(|_| Reservation { pool: self, slots })
    }

    /// Like [`try_reserve`](Self::try_reserve), but only succeeds while at
    /// least one further slot stays free afterwards.
    pub fn try_reserve_with_spare(&self, slots: usize) -> Option<Reservation<'_>> {
        self.available
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |free| {
                (free > slots).then(|| free - slots)
            })
            .ok()
            .map(|_| Reservation { pool: self, slots })
    }

    /// Runs `a` on the calling worker and makes `b` available for stealing,
    /// returning once both have finished.
    pub fn join<A, B, RA, RB>(&self, a: A, b: B) -> (RA, RB)
    where
        A: FnOnce() -> RA + Send,
        B: FnOnce() -> RB + Send,
        RA: Send,
        RB: Send,
    {
        self.pool.install(|| rayon::join(a, b))
    }
}

/// Slots held out of a [`WorkerPool`] until dropped.
pub struct Reservation<'a> {
    pool: &'a WorkerPool,
    slots: usize,
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        self.pool.available.fetch_add(self.slots, Ordering::AcqRel);
    }
}
