use std::sync::Once;

pub fn set_panic_hook() {
    // When the `console_error_panic_hook` feature is enabled, we can call the
    // `set_panic_hook` function at least once during initialization, and then
    // we will get better error messages if our code ever panics.
    //
    // For more details see
    // https://github.com/rustwasm/console_error_panic_hook#readme
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

static TRACING: Once = Once::new();

// Routes `tracing` events to the browser console. Native builds have no subscriber.
pub fn init_tracing() {
    TRACING.call_once(|| {
        #[cfg(target_arch = "wasm32")]
        tracing_wasm::set_as_global_default();
    });
}
