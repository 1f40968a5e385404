//! Runtime effect-queue executor for reducer-emitted side effects.

use leptos::*;

use crate::runtime_context::DesktopRuntimeContext;

/// Installs the effect that drains queued [`crate::reducer::RuntimeEffect`] values in order.
pub fn install(runtime: DesktopRuntimeContext) {
    // Clear the queue before running the batch so dispatches made by an effect land in a fresh
    // batch instead of being overwritten by this drain.
    create_effect(move |_| {
        let queued = runtime.effects.get();
        if queued.is_empty() {
            return;
        }

        runtime.effects.set(Vec::new());

        let host = runtime.host.get_value();
        for effect in queued {
            host.run_runtime_effect(runtime, effect);
        }
    });
}
