//! Fire-and-forget async work.
//!
//! In the browser this hands the future to the Leptos executor. Native builds
//! have no event loop to return to, so the future runs to completion inline.

use std::future::Future;

pub fn spawn_local<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    #[cfg(feature = "hydrate")]
    {
        leptos::task::spawn_local(future);
    }
    #[cfg(not(feature = "hydrate"))]
    {
        futures::executor::block_on(future);
    }
}
