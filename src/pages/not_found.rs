use leptos::prelude::*;
use leptos_router::components::A;

/// Fallback for unknown routes and unknown paper ids.
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="not-found">
			<h1>"Nothing out here"</h1>
			<p>"The page or paper you asked for is not in this collection."</p>
			<A href="/">"Back to the dashboard"</A>
		</div>
	}
}
