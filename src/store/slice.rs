use tokio::sync::watch;

/// Observable state container.
///
/// Every write is a single synchronous mutation followed by a notification of all subscribers.
pub struct Slice<S> {
    sender: watch::Sender<S>,
}

impl<S> Slice<S> {
    pub fn new(initial: S) -> Self {
        Self { sender: watch::Sender::new(initial) }
    }

    /// Apply the mutation and notify the subscribers.
    pub fn update<R>(&self, mutate: impl FnOnce(&mut S) -> R) -> R {
        let mut output = None;
        self.sender.send_modify(|state| output = Some(mutate(state)));
        output.unwrap_or_else(|| unreachable!("`send_modify` always calls the closure"))
    }

    /// Read a projection of the current state without cloning all of it.
    pub fn select<R>(&self, selector: impl FnOnce(&S) -> R) -> R {
        selector(&self.sender.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.sender.subscribe()
    }
}

impl<S: Clone> Slice<S> {
    pub fn snapshot(&self) -> S {
        self.sender.borrow().clone()
    }
}
