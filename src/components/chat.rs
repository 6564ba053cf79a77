//! Chat panel for asking the backend about one paper.

use std::sync::Arc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen_futures::spawn_local;

use crate::chat::{ChatMessage, ChatTranscript, Role, SAMPLE_QUESTIONS};
use crate::config::AppConfig;
use crate::search::SearchClient;

/// Transcript, input box and sample questions for the paper `article_id`.
#[component]
pub fn ChatPanel(
	/// Paper the questions are about.
	article_id: String,
	/// Paper title, used in the greeting.
	title: String,
) -> impl IntoView {
	let config = use_context::<Arc<AppConfig>>().unwrap_or_default();
	let transcript = RwSignal::new(ChatTranscript::new(&title));
	let input = RwSignal::new(String::new());

	let send = move || {
		let question = input.get_untracked();
		let Some(slot) = transcript.try_update(|t| t.push_user(&question)).flatten() else {
			return;
		};
		input.set(String::new());

		let (client, article_id) = (SearchClient::http(config.api_base_url.clone()), article_id.clone());
		spawn_local(async move {
			match client.generate_response(question.trim(), &article_id, None).await {
				Ok(reply) => transcript.update(|t| t.resolve(slot, reply.into_text())),
				Err(e) => {
					warn!("paperrag: chat reply for {} failed: {}", article_id, e);
					transcript.update(|t| t.fail(slot));
				}
			}
		});
	};

	view! {
		<section class="chat-panel">
			<ul class="chat-messages">
				<For
					each=move || transcript.with(|t| t.messages().iter().cloned().enumerate().collect::<Vec<_>>())
					key=|(idx, message)| (*idx, message.text.clone())
					children=move |(_, message): (usize, ChatMessage)| {
						view! {
							<li
								class="chat-message"
								class:user={message.role == Role::User}
								class:pending=message.pending
							>
								{message.text}
							</li>
						}
					}
				/>
			</ul>
			<div class="chat-samples">
				{SAMPLE_QUESTIONS
					.into_iter()
					.map(|question| {
						view! {
							<button class="chat-sample" on:click=move |_| input.set(question.to_string())>
								{question}
							</button>
						}
					})
					.collect_view()}
			</div>
			<form
				class="chat-input"
				on:submit=move |ev| {
					ev.prevent_default();
					send();
				}
			>
				<input
					type="text"
					placeholder="Ask about this paper..."
					prop:value=move || input.get()
					on:input=move |ev| input.set(event_target_value(&ev))
				/>
				<button type="submit">"Send"</button>
			</form>
		</section>
	}
}
