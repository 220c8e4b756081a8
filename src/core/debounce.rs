use std::{
    sync::{Mutex, PoisonError},
    time::Duration,
};

use tokio::{task::JoinHandle, time::sleep};

/// Trailing-edge debouncer.
///
/// Every [`Debouncer::call`] cancels the timer scheduled by the previous call.
/// Once a timer fires, its action is detached and runs to completion regardless of later calls.
pub struct Debouncer {
    delay: Duration,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub const fn new(delay: Duration) -> Self {
        Self { delay, timer: Mutex::new(None) }
    }

    pub fn call<F>(&self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let timer = tokio::spawn(async move {
            sleep(delay).await;
            tokio::spawn(action);
        });
        if let Some(previous) =
            self.timer.lock().unwrap_or_else(PoisonError::into_inner).replace(timer)
        {
            previous.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.get_mut().unwrap_or_else(PoisonError::into_inner).take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use super::*;

    type Calls = Arc<Mutex<Vec<usize>>>;

    async fn record(calls: Calls, value: usize) {
        calls.lock().unwrap().push(value);
    }

    #[tokio::test(start_paused = true)]
    async fn burst_collapses_to_last_call() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let calls = Calls::default();

        debouncer.call(record(Arc::clone(&calls), 1));
        sleep(Duration::from_millis(100)).await;
        debouncer.call(record(Arc::clone(&calls), 2));
        sleep(Duration::from_millis(100)).await;
        debouncer.call(record(Arc::clone(&calls), 3));
        sleep(Duration::from_millis(299)).await;
        assert!(calls.lock().unwrap().is_empty());

        sleep(Duration::from_secs(1)).await;
        assert_eq!(*calls.lock().unwrap(), [3]);
    }

    #[tokio::test(start_paused = true)]
    async fn settled_calls_fire_independently() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let calls = Calls::default();

        debouncer.call(record(Arc::clone(&calls), 1));
        sleep(Duration::from_millis(500)).await;
        debouncer.call(record(Arc::clone(&calls), 2));
        sleep(Duration::from_millis(500)).await;

        assert_eq!(*calls.lock().unwrap(), [1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_pending_timer() {
        let fired = Arc::new(AtomicUsize::new(0));
        {
            let debouncer = Debouncer::new(Duration::from_millis(300));
            let fired = Arc::clone(&fired);
            debouncer.call(async move {
                fired.fetch_add(1, Ordering::SeqCst);
            });
        }
        sleep(Duration::from_secs(1)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
