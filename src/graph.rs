//! Pure helpers over the user list: undirected edges, connection checks,
//! hobby lookups and summary stats.

use std::collections::{BTreeSet, HashSet};

use thiserror::Error;

use crate::api::User;

/// Scores strictly above this render as the "popular" node variant.
pub const POPULARITY_THRESHOLD: f64 = 5.0;

/// One undirected friendship, endpoints stored in sorted order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
	pub a: String,
	pub b: String,
}

impl Edge {
	pub fn new(x: &str, y: &str) -> Self {
		let (a, b) = if x <= y { (x, y) } else { (y, x) };
		Self {
			a: a.to_string(),
			b: b.to_string(),
		}
	}

	pub fn joins(&self, x: &str, y: &str) -> bool {
		(self.a == x && self.b == y) || (self.a == y && self.b == x)
	}
}

/// Collects every friendship once, in first-seen order.
pub fn edges(users: &[User]) -> Vec<Edge> {
	let mut seen = HashSet::new();
	let mut out = Vec::new();
	for user in users {
		for friend in &user.friends {
			let edge = Edge::new(&user.id, friend);
			if seen.insert(edge.clone()) {
				out.push(edge);
			}
		}
	}
	out
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ConnectionRejected {
	#[error("A user cannot be connected to themselves")]
	SelfLoop,
	#[error("Users are already connected")]
	AlreadyConnected,
}

/// Checks a proposed link against the edges currently on screen.
///
/// This is only a hint for the UI; the service has the final say.
pub fn validate_connection(
	source: &str,
	target: &str,
	edges: &[Edge],
) -> Result<(), ConnectionRejected> {
	if source == target {
		return Err(ConnectionRejected::SelfLoop);
	}
	if edges.iter().any(|e| e.joins(source, target)) {
		return Err(ConnectionRejected::AlreadyConnected);
	}
	Ok(())
}

/// Case-insensitive check, ignoring surrounding whitespace.
pub fn has_hobby(user: &User, hobby: &str) -> bool {
	let wanted = hobby.trim().to_lowercase();
	user.hobbies
		.iter()
		.any(|h| h.trim().to_lowercase() == wanted)
}

/// Every distinct hobby across all users, sorted.
pub fn all_hobbies(users: &[User]) -> Vec<String> {
	users
		.iter()
		.flat_map(|u| u.hobbies.iter().cloned())
		.collect::<BTreeSet<_>>()
		.into_iter()
		.collect()
}

pub fn hobby_count(users: &[User], hobby: &str) -> usize {
	users
		.iter()
		.filter(|u| u.hobbies.iter().any(|h| h == hobby))
		.count()
}

pub fn filter_hobbies(hobbies: &[String], term: &str) -> Vec<String> {
	let term = term.to_lowercase();
	hobbies
		.iter()
		.filter(|h| h.to_lowercase().contains(&term))
		.cloned()
		.collect()
}

pub fn is_popular(score: f64) -> bool {
	score > POPULARITY_THRESHOLD
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphStats {
	pub users: usize,
	pub connections: usize,
	pub popular: usize,
	pub average_score: f64,
}

impl GraphStats {
	pub fn from_users(users: &[User]) -> Self {
		let total: f64 = users.iter().map(|u| u.popularity_score).sum();
		Self {
			users: users.len(),
			connections: edges(users).len(),
			popular: users
				.iter()
				.filter(|u| is_popular(u.popularity_score))
				.count(),
			average_score: if users.is_empty() {
				0.0
			} else {
				total / users.len() as f64
			},
		}
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;

	pub(crate) fn user(id: &str, friends: &[&str], hobbies: &[&str]) -> User {
		User {
			id: id.into(),
			username: format!("user-{id}"),
			age: 30,
			hobbies: hobbies.iter().map(|h| h.to_string()).collect(),
			friends: friends.iter().map(|f| f.to_string()).collect(),
			created_at: None,
			popularity_score: 0.0,
		}
	}

	#[test]
	fn mutual_friendship_yields_one_edge() {
		let users = vec![user("a", &["b"], &[]), user("b", &["a"], &[])];
		assert_eq!(edges(&users), vec![Edge::new("a", "b")]);
	}

	#[test]
	fn edges_keep_first_seen_order() {
		let users = vec![
			user("c", &["a", "b"], &[]),
			user("a", &["c"], &[]),
			user("b", &["c"], &[]),
		];
		assert_eq!(
			edges(&users),
			vec![Edge::new("a", "c"), Edge::new("b", "c")]
		);
	}

	#[test]
	fn edge_is_order_independent() {
		assert_eq!(Edge::new("x", "y"), Edge::new("y", "x"));
		let edge = Edge::new("y", "x");
		assert_eq!((edge.a.as_str(), edge.b.as_str()), ("x", "y"));
	}

	#[test]
	fn self_connection_is_rejected() {
		assert_eq!(
			validate_connection("a", "a", &[]),
			Err(ConnectionRejected::SelfLoop)
		);
	}

	#[test]
	fn existing_edge_is_rejected_in_both_directions() {
		let existing = vec![Edge::new("a", "b")];
		assert_eq!(
			validate_connection("a", "b", &existing),
			Err(ConnectionRejected::AlreadyConnected)
		);
		assert_eq!(
			validate_connection("b", "a", &existing),
			Err(ConnectionRejected::AlreadyConnected)
		);
		assert_eq!(validate_connection("a", "c", &existing), Ok(()));
	}

	#[test]
	fn hobby_check_ignores_case() {
		let u = user("a", &[], &["chess"]);
		assert!(has_hobby(&u, "Chess"));
		assert!(has_hobby(&u, " CHESS "));
		assert!(!has_hobby(&u, "go"));
	}

	#[test]
	fn hobby_palette_is_sorted_and_unique() {
		let users = vec![
			user("a", &[], &["tennis", "chess"]),
			user("b", &[], &["chess", "Archery"]),
		];
		assert_eq!(all_hobbies(&users), vec!["Archery", "chess", "tennis"]);
		assert_eq!(hobby_count(&users, "chess"), 2);
		assert_eq!(hobby_count(&users, "Chess"), 0);
	}

	#[test]
	fn search_filters_by_substring() {
		let hobbies = vec!["Chess".to_string(), "Tennis".into(), "Table tennis".into()];
		assert_eq!(filter_hobbies(&hobbies, "TEN"), vec!["Tennis", "Table tennis"]);
		assert_eq!(filter_hobbies(&hobbies, ""), hobbies);
	}

	#[test]
	fn stats_summarise_users() {
		let mut a = user("a", &["b"], &[]);
		a.popularity_score = 8.0;
		let mut b = user("b", &["a"], &[]);
		b.popularity_score = 5.0;
		let stats = GraphStats::from_users(&[a, b]);
		assert_eq!(stats.users, 2);
		assert_eq!(stats.connections, 1);
		assert_eq!(stats.popular, 1);
		assert!((stats.average_score - 6.5).abs() < 1e-9);
	}

	#[test]
	fn empty_stats_have_zero_average() {
		assert_eq!(GraphStats::from_users(&[]), GraphStats::default());
	}
}
