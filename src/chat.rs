//! Chat transcript for questions about one paper.

/// Placeholder shown while the backend composes a reply.
pub const THINKING: &str = "Thinking...";

/// Shown in place of a reply that never arrived.
pub const REPLY_FAILED: &str = "Sorry, I could not reach the research assistant. Please try again.";

/// Prompts offered under the chat box.
pub const SAMPLE_QUESTIONS: [&str; 3] = [
	"What is the main focus of this research?",
	"How does this research impact the field?",
	"What are the potential applications of this study?",
];

/// Who wrote a chat message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
	/// The reader.
	User,
	/// The backend.
	Assistant,
}

/// One entry in a [`ChatTranscript`].
#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessage {
	/// Author of the message.
	pub role: Role,
	/// Message body, or [`THINKING`] while pending.
	pub text: String,
	/// True while this is a placeholder awaiting the backend.
	pub pending: bool,
}

/// Append-only list of chat messages. Replies land in the placeholder that
/// was pushed with their question.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatTranscript {
	messages: Vec<ChatMessage>,
}

impl ChatTranscript {
	/// A transcript opened by an assistant greeting about `title`.
	pub fn new(title: &str) -> Self {
		Self {
			messages: vec![ChatMessage {
				role: Role::Assistant,
				text: format!(
					"I'm your AI assistant. I can help explain the research on \"{title}\". Feel free to ask me anything!"
				),
				pending: false,
			}],
		}
	}

	/// Messages in the order they were added.
	pub fn messages(&self) -> &[ChatMessage] {
		&self.messages
	}

	/// Appends a question and its pending reply. Returns the reply's index,
	/// or `None` for a blank question, which changes nothing.
	pub fn push_user(&mut self, text: &str) -> Option<usize> {
		let text = text.trim();
		if text.is_empty() {
			return None;
		}
		self.messages.push(ChatMessage {
			role: Role::User,
			text: text.to_string(),
			pending: false,
		});
		self.messages.push(ChatMessage {
			role: Role::Assistant,
			text: THINKING.to_string(),
			pending: true,
		});
		Some(self.messages.len() - 1)
	}

	/// Fills the pending reply at `index`. Anything else is left alone.
	pub fn resolve(&mut self, index: usize, text: impl Into<String>) {
		if let Some(message) = self.messages.get_mut(index).filter(|m| m.pending) {
			message.text = text.into();
			message.pending = false;
		}
	}

	/// Replaces the pending reply at `index` with an apology.
	pub fn fail(&mut self, index: usize) {
		self.resolve(index, REPLY_FAILED);
	}

	/// Whether any reply is still pending.
	pub fn is_waiting(&self) -> bool {
		self.messages.iter().any(|m| m.pending)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn opens_with_greeting_naming_the_paper() {
		let chat = ChatTranscript::new("Bone loss in orbit");
		assert_eq!(chat.messages().len(), 1);
		assert_eq!(chat.messages()[0].role, Role::Assistant);
		assert!(chat.messages()[0].text.contains("\"Bone loss in orbit\""));
	}

	#[test]
	fn blank_message_is_ignored() {
		let mut chat = ChatTranscript::new("t");
		assert_eq!(chat.push_user("   "), None);
		assert_eq!(chat.messages().len(), 1);
	}

	#[test]
	fn question_adds_pending_reply_then_resolves() {
		let mut chat = ChatTranscript::new("t");
		let idx = chat.push_user(" why? ").unwrap();
		assert_eq!(chat.messages()[1].text, "why?");
		assert_eq!(chat.messages()[idx].text, THINKING);
		assert!(chat.is_waiting());

		chat.resolve(idx, "because");
		assert_eq!(chat.messages()[idx].text, "because");
		assert!(!chat.is_waiting());

		// A late second reply does not overwrite the first.
		chat.resolve(idx, "again");
		assert_eq!(chat.messages()[idx].text, "because");
	}

	#[test]
	fn replies_land_in_their_own_slots() {
		let mut chat = ChatTranscript::new("t");
		let first = chat.push_user("one").unwrap();
		let second = chat.push_user("two").unwrap();
		chat.resolve(second, "answer two");
		chat.fail(first);
		assert_eq!(chat.messages()[first].text, REPLY_FAILED);
		assert_eq!(chat.messages()[second].text, "answer two");
	}

	#[test]
	fn resolving_a_non_pending_message_is_a_no_op() {
		let mut chat = ChatTranscript::new("t");
		chat.resolve(0, "hijack");
		chat.resolve(42, "nowhere");
		assert!(chat.messages()[0].text.starts_with("I'm your AI assistant"));
	}
}
