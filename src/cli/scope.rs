//! Lifetime of a view and the work it started.
//!
//! A [`ViewScope`] is owned by whatever renders a view; background work (status
//! polls, slow requests) holds a [`ScopeToken`] and checks it before applying
//! any result. Dropping the scope cancels every token handed out from it.

use tokio::sync::watch;

#[derive(Debug)]
pub struct ViewScope {
    cancel: watch::Sender<bool>,
}

#[derive(Debug, Clone)]
pub struct ScopeToken {
    // `None` for detached work that no view owns.
    cancelled: Option<watch::Receiver<bool>>,
}

impl ViewScope {
    pub fn new() -> Self {
        let (cancel, _) = watch::channel(false);
        Self { cancel }
    }

    pub fn token(&self) -> ScopeToken {
        ScopeToken {
            cancelled: Some(self.cancel.subscribe()),
        }
    }

    pub fn cancel(&self) {
        self.cancel.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.cancel.borrow()
    }
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl ScopeToken {
    /// Token that is never cancelled, for work not tied to a view.
    pub fn detached() -> Self {
        Self { cancelled: None }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.as_ref().map(|rx| *rx.borrow()).unwrap_or(false)
    }

    /// Resolves once the owning scope is cancelled or dropped.
    pub async fn cancelled(&self) {
        let Some(rx) = &self.cancelled else {
            return std::future::pending().await;
        };
        let mut rx = rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                // Sender gone without an explicit cancel still ends the scope.
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_cancel_reaches_every_token() {
        let scope = ViewScope::new();
        let a = scope.token();
        let b = a.clone();
        assert!(!a.is_cancelled());

        scope.cancel();
        assert!(a.is_cancelled());
        assert!(b.is_cancelled());
        tokio::time::timeout(Duration::from_millis(100), b.cancelled())
            .await
            .expect("cancelled() should resolve after cancel");
    }

    #[tokio::test]
    async fn test_drop_cancels() {
        let scope = ViewScope::new();
        let token = scope.token();
        drop(scope);
        assert!(token.is_cancelled());
        token.cancelled().await;
    }

    #[tokio::test]
    async fn test_detached_never_cancels() {
        let token = ScopeToken::detached();
        assert!(!token.is_cancelled());
        let res = tokio::time::timeout(Duration::from_millis(20), token.cancelled()).await;
        assert!(res.is_err());
    }
}
