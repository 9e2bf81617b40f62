use std::collections::HashSet;

use crate::api::User;
use crate::graph::{self, is_popular};

#[derive(Clone, Debug, PartialEq)]
pub struct GraphNode {
	pub id: String,
	pub label: String,
	pub age: u32,
	pub score: f64,
}

impl GraphNode {
	pub fn popular(&self) -> bool {
		is_popular(self.score)
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct GraphLink {
	pub source: String,
	pub target: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// One node per user and one link per friendship whose ends are both known.
	pub fn from_users(users: &[User]) -> Self {
		let known: HashSet<&str> = users.iter().map(|u| u.id.as_str()).collect();
		let nodes = users
			.iter()
			.map(|u| GraphNode {
				id: u.id.clone(),
				label: u.username.clone(),
				age: u.age,
				score: u.popularity_score,
			})
			.collect();
		let links = graph::edges(users)
			.into_iter()
			.filter(|e| known.contains(e.a.as_str()) && known.contains(e.b.as_str()))
			.map(|e| GraphLink {
				source: e.a,
				target: e.b,
			})
			.collect();

		Self { nodes, links }
	}
}
