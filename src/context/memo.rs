use std::future::Future;

/// A value that is either not resolved yet or resolved exactly once.
///
/// The owner decides when to `invalidate`; until then every read is served
/// from the first resolution.
#[derive(Debug)]
pub struct Memo<T> {
    slot: Option<T>,
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<T> Memo<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn is_resolved(&self) -> bool {
        self.slot.is_some()
    }

    #[cfg(test)]
    pub fn get(&self) -> Option<&T> {
        self.slot.as_ref()
    }

    pub fn set(&mut self, value: T) -> &T {
        self.slot.insert(value)
    }

    pub fn invalidate(&mut self) {
        self.slot = None;
    }

    /// Returns the cached value, running `resolve` only when unresolved.
    pub async fn get_or_resolve<F, Fut>(&mut self, resolve: F) -> &T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let value = match self.slot.take() {
            Some(value) => value,
            None => resolve().await,
        };
        self.slot.insert(value)
    }
}
