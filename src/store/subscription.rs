use std::time::Duration;

use super::{RealtimeStore, Snapshot, StoreError};

/// Live feed of store snapshots
///
/// Polls the store every `interval` and yields a snapshot only when it
/// differs from the previous one. The feed never ends on its own and cannot
/// be rewound; consumers act on the latest item and drop the rest. A failed
/// poll is yielded as an error and polling continues on the next call.
pub struct Subscription<S> {
    store: S,
    interval: Duration,
    last: Option<Snapshot>,
    polled: bool,
}

impl<S: RealtimeStore> Subscription<S> {
    pub fn new(store: S, interval: Duration) -> Self {
        Self {
            store,
            interval,
            last: None,
            polled: false,
        }
    }
}

impl<S: RealtimeStore> Iterator for Subscription<S> {
    type Item = Result<Snapshot, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.polled {
                std::thread::sleep(self.interval);
            }
            self.polled = true;

            match self.store.snapshot() {
                Ok(snapshot) if self.last.as_ref() == Some(&snapshot) => continue,
                Ok(snapshot) => {
                    self.last = Some(snapshot.clone());
                    return Some(Ok(snapshot));
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
