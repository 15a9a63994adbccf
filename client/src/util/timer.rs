//! One-shot delayed callbacks for simulated latency and session timers.

use std::time::Duration;

/// Run `f` once after `delay` on the browser event loop.
///
/// Server rendering never schedules anything, so outside `hydrate` the
/// callback is dropped.
pub fn after(delay: Duration, f: impl FnOnce() + 'static) {
    #[cfg(feature = "hydrate")]
    {
        leptos::task::spawn_local(async move {
            gloo_timers::future::sleep(delay).await;
            f();
        });
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (delay, f);
    }
}
