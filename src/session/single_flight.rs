use crate::error::RefreshError;
use crate::session::interface::TokenRefresher;
use async_trait::async_trait;
use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

type SharedRefresh = Shared<BoxFuture<'static, Result<String, RefreshError>>>;

struct Pending {
    id: u64,
    refresh: SharedRefresh,
    waiters: usize,
}

#[derive(Default)]
struct InFlight {
    next_id: u64,
    current: Option<Pending>,
}

/// Coalesces concurrent refreshes into one exchange.
///
/// Callers arriving while a refresh is pending await that same refresh and
/// get its result. The slot is emptied once the refresh settles, or once its
/// last waiter is dropped before it settles, so the next caller always starts
/// a fresh exchange rather than resuming an abandoned one.
pub struct SingleFlightRefresher {
    inner: Arc<dyn TokenRefresher>,
    in_flight: Mutex<InFlight>,
}

/// Registration of one caller on the pending refresh. Dropping it, whether
/// the caller finished or was cancelled, releases the caller's claim.
struct Waiter<'a> {
    owner: &'a SingleFlightRefresher,
    id: u64,
    settled: bool,
}

impl Drop for Waiter<'_> {
    fn drop(&mut self) {
        let mut in_flight = self.owner.lock();
        let Some(pending) = in_flight.current.as_mut() else {
            return;
        };
        if pending.id != self.id {
            return;
        }
        pending.waiters = pending.waiters.saturating_sub(1);
        if self.settled {
            in_flight.current = None;
        } else if pending.waiters == 0 {
            debug!("Token refresh #{} abandoned by all callers", self.id);
            in_flight.current = None;
        }
    }
}

impl SingleFlightRefresher {
    pub fn new(inner: Arc<dyn TokenRefresher>) -> Self {
        Self {
            inner,
            in_flight: Mutex::new(InFlight::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, InFlight> {
        self.in_flight.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn join_or_start(&self) -> (Waiter<'_>, SharedRefresh) {
        let mut in_flight = self.lock();
        if let Some(pending) = in_flight.current.as_mut() {
            debug!("Joining in-flight token refresh #{}", pending.id);
            pending.waiters += 1;
            let waiter = Waiter {
                owner: self,
                id: pending.id,
                settled: false,
            };
            return (waiter, pending.refresh.clone());
        }

        let id = in_flight.next_id;
        in_flight.next_id += 1;
        let inner = self.inner.clone();
        let refresh = async move { inner.refresh().await }.boxed().shared();
        in_flight.current = Some(Pending {
            id,
            refresh: refresh.clone(),
            waiters: 1,
        });
        debug!("Starting token refresh #{}", id);
        let waiter = Waiter {
            owner: self,
            id,
            settled: false,
        };
        (waiter, refresh)
    }
}

#[async_trait]
impl TokenRefresher for SingleFlightRefresher {
    async fn refresh(&self) -> Result<String, RefreshError> {
        let (mut waiter, refresh) = self.join_or_start();
        let result = refresh.await;
        waiter.settled = true;
        result
    }
}
