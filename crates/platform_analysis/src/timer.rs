//! Cancelable-deferred timer service used by the debounce.

use futures::future::LocalBoxFuture;

/// Asynchronous one-shot sleep provider.
///
/// Injected into the pipeline so the debounce window is testable without a browser event loop.
pub trait TimerService {
    /// Resolves after roughly `ms` milliseconds.
    fn sleep_ms(&self, ms: u64) -> LocalBoxFuture<'static, ()>;
}

/// `setTimeout`-backed timer.
///
/// Outside the browser the sleep resolves immediately, which keeps native test runs
/// deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTimerService;

impl TimerService for BrowserTimerService {
    fn sleep_ms(&self, ms: u64) -> LocalBoxFuture<'static, ()> {
        Box::pin(imp::sleep_ms(ms))
    }
}

#[cfg(target_arch = "wasm32")]
mod imp {
    use wasm_bindgen::{closure::Closure, JsCast};

    pub async fn sleep_ms(ms: u64) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let (sender, receiver) = futures::channel::oneshot::channel::<()>();
        let callback = Closure::once(move || {
            let _ = sender.send(());
        });
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            ms as i32,
        ) {
            Ok(_) => callback.forget(),
            // Dropping the closure cancels the channel; resolve immediately.
            Err(_) => return,
        }
        let _ = receiver.await;
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    pub async fn sleep_ms(_ms: u64) {}
}
