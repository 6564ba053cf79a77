//! Debounced signals for search-as-you-type.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use wasm_bindgen_futures::spawn_local;

use super::cache::LatestOnly;

/// Returns a signal that takes `source`'s value once it has stayed unchanged
/// for `delay_ms` milliseconds.
pub fn use_debounced<T>(source: Signal<T>, delay_ms: u32) -> Signal<T>
where
	T: Clone + PartialEq + Send + Sync + 'static,
{
	let debounced = RwSignal::new(source.get_untracked());
	let latest = LatestOnly::new();

	Effect::new(move |_| {
		let value = source.get();
		let ticket = latest.issue();
		let latest = latest.clone();
		spawn_local(async move {
			TimeoutFuture::new(delay_ms).await;
			if latest.is_current(ticket) && debounced.with_untracked(|current| *current != value) {
				debounced.set(value);
			}
		});
	});

	debounced.into()
}
