//! UI components shared by the pages.

pub mod chat;
pub mod force_graph;
