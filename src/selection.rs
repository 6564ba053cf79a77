//! The article picked in the graph.

use crate::articles::Article;

/// Either nothing is selected or exactly one article is.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Selection {
	/// Nothing picked yet, or the last click missed.
	#[default]
	None,
	/// The article of the last clicked node.
	Selected(Article),
}

impl Selection {
	/// Applies a graph click. A click that resolved to no article clears the
	/// selection.
	pub fn select(&mut self, article: Option<Article>) {
		*self = article.map_or(Selection::None, Selection::Selected);
	}

	/// Drops the selection.
	pub fn clear(&mut self) {
		*self = Selection::None;
	}

	/// The selected article, if any.
	pub fn article(&self) -> Option<&Article> {
		match self {
			Selection::None => None,
			Selection::Selected(article) => Some(article),
		}
	}

	/// Whether an article is selected.
	pub fn is_selected(&self) -> bool {
		matches!(self, Selection::Selected(_))
	}
}
