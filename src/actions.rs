//! User-triggered workflows: call the service, then bring the stores in line.
//!
//! Every failure ends up as a toast here; nothing propagates back into the
//! event handler that started the workflow.

use log::{info, warn};

use crate::api::{ApiClient, ApiError, UpdateUserRequest, UserApi};
use crate::form::UserForm;
use crate::graph::{self, validate_connection};
use crate::state::{GraphStore, Notifications};

/// Workflows bound to the browser client, as provided through context.
pub type AppActions = Actions<ApiClient>;

#[derive(Clone)]
pub struct Actions<A> {
	api: A,
	graph: GraphStore,
	notes: Notifications,
}

impl<A: UserApi> Actions<A> {
	pub fn new(api: A, graph: GraphStore, notes: Notifications) -> Self {
		Self { api, graph, notes }
	}

	#[cfg(test)]
	pub fn api(&self) -> &A {
		&self.api
	}

	/// Refetches the whole graph, dropping the result if a newer refetch
	/// started in the meantime.
	async fn resync(&self) -> Result<(), ApiError> {
		let token = self.graph.begin_sync();
		let data = self.api.graph().await?;
		self.graph.finish_sync(token, data.users);
		Ok(())
	}

	/// Initial load on mount. Failure is kept in the store for the empty-state
	/// screen as well as toasted.
	pub async fn load_graph(&self) {
		self.graph.set_loading(true);
		match self.resync().await {
			Ok(()) => {
				self.graph.set_error(None);
				if self.graph.with(|s| s.users.is_empty()) {
					self.notes.info("No users yet. Use + to add one");
				}
			}
			Err(err) => {
				warn!("initial load failed: {}", err);
				self.graph.set_error(Some(err.to_string()));
				self.notes.error(format!("Failed to load data: {}", err));
			}
		}
		self.graph.set_loading(false);
	}

	pub async fn refresh_graph(&self) -> bool {
		self.graph.set_loading(true);
		let result = self.resync().await;
		self.graph.set_loading(false);
		match result {
			Ok(()) => {
				self.notes.success("Data refreshed successfully");
				true
			}
			Err(err) => {
				warn!("refresh failed: {}", err);
				self.notes.error(err.to_string());
				false
			}
		}
	}

	/// Links two users unless the current edges already join them, then
	/// refetches so both sides' friend lists come from the service.
	pub async fn link_users(&self, source: &str, target: &str) -> bool {
		let current = self.graph.with(|s| graph::edges(&s.users));
		if let Err(rejected) = validate_connection(source, target, &current) {
			self.notes.warning(rejected.to_string());
			return false;
		}

		let result = async {
			self.api.link_users(source, target).await?;
			self.resync().await
		}
		.await;

		match result {
			Ok(()) => {
				info!("linked {} and {}", source, target);
				self.notes.success("Users linked successfully!");
				true
			}
			Err(err) => {
				warn!("link {} -> {} failed: {}", source, target, err);
				self.notes.error(err.to_string());
				false
			}
		}
	}

	pub async fn unlink_users(&self, user_id: &str, friend_id: &str) -> bool {
		let result = async {
			self.api.unlink_users(user_id, friend_id).await?;
			self.resync().await
		}
		.await;

		match result {
			Ok(()) => {
				info!("unlinked {} and {}", user_id, friend_id);
				self.notes.success("Users unlinked");
				true
			}
			Err(err) => {
				warn!("unlink {} -> {} failed: {}", user_id, friend_id, err);
				self.notes.error(err.to_string());
				false
			}
		}
	}

	/// Appends `hobby` to the user's list and patches the store with the
	/// service's copy of the user. No full refetch.
	pub async fn add_hobby(&self, user_id: &str, hobby: &str) -> bool {
		let hobby = hobby.trim();
		if hobby.is_empty() {
			self.notes.warning("Please enter a hobby name");
			return false;
		}
		let Some(user) = self.graph.with(|s| s.user(user_id).cloned()) else {
			self.notes.error("User not found");
			return false;
		};
		if graph::has_hobby(&user, hobby) {
			self.notes.warning("User already has this hobby");
			return false;
		}

		let mut hobbies = user.hobbies.clone();
		hobbies.push(hobby.to_string());
		let req = UpdateUserRequest {
			hobbies: Some(hobbies),
			..Default::default()
		};

		match self.api.update_user(user_id, &req).await {
			Ok(updated) => {
				self.graph.update_user(updated);
				self.notes
					.success(format!("Added hobby \"{}\" to {}", hobby, user.username));
				true
			}
			Err(err) => {
				warn!("adding hobby to {} failed: {}", user_id, err);
				self.notes.error(err.to_string());
				false
			}
		}
	}

	/// Creates a user, or updates `editing` when set. Returns `true` when the
	/// form can be closed.
	pub async fn save_user(&self, editing: Option<&str>, form: &UserForm) -> bool {
		let req = match form.validate() {
			Ok(req) => req,
			Err(err) => {
				self.notes.warning(err.to_string());
				return false;
			}
		};

		self.graph.set_loading(true);
		let result = match editing {
			Some(id) => self
				.api
				.update_user(id, &req.into())
				.await
				.map(|user| {
					self.graph.update_user(user);
					"User updated successfully"
				}),
			None => self.api.create_user(&req).await.map(|user| {
				self.graph.add_user(user);
				"User created successfully"
			}),
		};
		self.graph.set_loading(false);

		match result {
			Ok(message) => {
				self.notes.success(message);
				true
			}
			Err(err) => {
				warn!("saving user failed: {}", err);
				self.notes.error(err.to_string());
				false
			}
		}
	}

	/// Deletes a user. The service refuses while friendships remain; that is
	/// not checked here.
	pub async fn delete_user(&self, id: &str) -> bool {
		self.graph.set_loading(true);
		let result = self.api.delete_user(id).await;
		self.graph.set_loading(false);

		match result {
			Ok(()) => {
				self.graph.delete_user(id);
				self.notes.success("User deleted successfully");
				true
			}
			Err(err) => {
				warn!("deleting {} failed: {}", id, err);
				self.notes.error(err.to_string());
				false
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;
	use std::rc::Rc;

	use futures::executor::block_on;
	use leptos::prelude::*;

	use super::*;
	use crate::api::{
		ApiOperation, CreateUserRequest, GraphResponse, Relationship, User,
	};
	use crate::graph::tests::user;
	use crate::state::{ManualTimer, Notification, Severity};

	/// In-memory relationship service that records each call.
	#[derive(Default)]
	struct MockApi {
		users: RefCell<Vec<User>>,
		calls: RefCell<Vec<&'static str>>,
		failing: RefCell<Option<ApiOperation>>,
	}

	impl MockApi {
		fn seeded(users: Vec<User>) -> Self {
			Self {
				users: RefCell::new(users),
				..Default::default()
			}
		}

		fn record(&self, call: &'static str, op: ApiOperation) -> Result<(), ApiError> {
			self.calls.borrow_mut().push(call);
			if *self.failing.borrow() == Some(op) {
				return Err(ApiError::failed(op, 400));
			}
			Ok(())
		}

		fn find(&self, id: &str) -> Result<User, ApiError> {
			self.users
				.borrow()
				.iter()
				.find(|u| u.id == id)
				.cloned()
				.ok_or(ApiError::failed(ApiOperation::GetUser, 404))
		}

		fn calls(&self) -> Vec<&'static str> {
			self.calls.borrow().clone()
		}
	}

	impl UserApi for MockApi {
		async fn list_users(&self) -> Result<Vec<User>, ApiError> {
			self.record("list", ApiOperation::ListUsers)?;
			Ok(self.users.borrow().clone())
		}

		async fn get_user(&self, id: &str) -> Result<User, ApiError> {
			self.record("get", ApiOperation::GetUser)?;
			self.find(id)
		}

		async fn create_user(&self, req: &CreateUserRequest) -> Result<User, ApiError> {
			self.record("create", ApiOperation::CreateUser)?;
			let id = format!("u{}", self.users.borrow().len() + 1);
			let created = User {
				id,
				username: req.username.clone(),
				age: req.age,
				hobbies: req.hobbies.clone(),
				friends: vec![],
				created_at: None,
				popularity_score: 0.0,
			};
			self.users.borrow_mut().push(created.clone());
			Ok(created)
		}

		async fn update_user(&self, id: &str, req: &UpdateUserRequest) -> Result<User, ApiError> {
			self.record("update", ApiOperation::UpdateUser)?;
			let mut users = self.users.borrow_mut();
			let user = users
				.iter_mut()
				.find(|u| u.id == id)
				.ok_or(ApiError::failed(ApiOperation::UpdateUser, 404))?;
			if let Some(name) = &req.username {
				user.username = name.clone();
			}
			if let Some(age) = req.age {
				user.age = age;
			}
			if let Some(hobbies) = &req.hobbies {
				user.hobbies = hobbies.clone();
			}
			Ok(user.clone())
		}

		async fn delete_user(&self, id: &str) -> Result<(), ApiError> {
			self.record("delete", ApiOperation::DeleteUser)?;
			self.users.borrow_mut().retain(|u| u.id != id);
			Ok(())
		}

		async fn link_users(&self, id: &str, friend_id: &str) -> Result<User, ApiError> {
			self.record("link", ApiOperation::LinkUsers)?;
			for u in self.users.borrow_mut().iter_mut() {
				if u.id == id {
					u.friends.push(friend_id.into());
				} else if u.id == friend_id {
					u.friends.push(id.into());
				}
			}
			self.find(id)
		}

		async fn unlink_users(&self, id: &str, friend_id: &str) -> Result<User, ApiError> {
			self.record("unlink", ApiOperation::UnlinkUsers)?;
			for u in self.users.borrow_mut().iter_mut() {
				u.friends.retain(|f| !(u.id == id && f == friend_id));
				u.friends.retain(|f| !(u.id == friend_id && f == id));
			}
			self.find(id)
		}

		async fn graph(&self) -> Result<GraphResponse, ApiError> {
			self.record("graph", ApiOperation::GraphData)?;
			let users = self.users.borrow().clone();
			let relationships = graph::edges(&users)
				.into_iter()
				.map(|e| Relationship {
					user_id1: e.a,
					user_id2: e.b,
				})
				.collect();
			Ok(GraphResponse {
				users,
				relationships,
			})
		}
	}

	struct Harness {
		_owner: Owner,
		actions: Actions<MockApi>,
		graph: GraphStore,
		notes: Notifications,
	}

	impl Harness {
		fn new(server: Vec<User>) -> Self {
			let owner = Owner::new();
			owner.set();
			let graph = GraphStore::new();
			let notes = Notifications::with_timer(Rc::new(ManualTimer::default()));
			let actions = Actions::new(MockApi::seeded(server), graph, notes);
			Self {
				_owner: owner,
				actions,
				graph,
				notes,
			}
		}

		fn api(&self) -> &MockApi {
			self.actions.api()
		}

		fn toasts(&self) -> Vec<Notification> {
			self.notes.list().get_untracked()
		}

		fn last_toast(&self) -> (Severity, String) {
			let last = self.toasts().pop().expect("no toast");
			(last.severity, last.message)
		}
	}

	fn pair() -> Vec<User> {
		vec![user("a", &[], &["chess"]), user("b", &[], &[])]
	}

	#[test]
	fn load_fills_store_and_clears_loading() {
		let h = Harness::new(pair());
		block_on(h.actions.load_graph());

		let state = h.graph.state().get_untracked();
		assert_eq!(state.users.len(), 2);
		assert!(!state.loading);
		assert_eq!(state.error, None);
		assert!(h.toasts().is_empty());
	}

	#[test]
	fn empty_load_hints_at_user_creation() {
		let h = Harness::new(vec![]);
		block_on(h.actions.load_graph());

		assert_eq!(
			h.last_toast(),
			(Severity::Info, "No users yet. Use + to add one".into())
		);
	}

	#[test]
	fn load_failure_records_error() {
		let h = Harness::new(pair());
		*h.api().failing.borrow_mut() = Some(ApiOperation::GraphData);
		block_on(h.actions.load_graph());

		let state = h.graph.state().get_untracked();
		assert_eq!(state.error.as_deref(), Some("Failed to fetch graph data"));
		assert!(!state.loading);
		assert_eq!(
			h.last_toast(),
			(
				Severity::Error,
				"Failed to load data: Failed to fetch graph data".into()
			)
		);
	}

	#[test]
	fn refresh_notifies_success() {
		let h = Harness::new(pair());
		assert!(block_on(h.actions.refresh_graph()));
		assert_eq!(
			h.last_toast(),
			(Severity::Success, "Data refreshed successfully".into())
		);
	}

	#[test]
	fn empty_username_warns_without_calling_service() {
		let h = Harness::new(vec![]);
		let form = UserForm {
			hobbies: vec!["chess".into()],
			..UserForm::default()
		};

		assert!(!block_on(h.actions.save_user(None, &form)));
		assert!(h.api().calls().is_empty());
		assert_eq!(
			h.last_toast(),
			(Severity::Warning, "Username is required".into())
		);
	}

	#[test]
	fn valid_form_creates_exactly_one_user() {
		let h = Harness::new(vec![]);
		h.graph.set_users(vec![user("x", &[], &[])]);
		let form = UserForm {
			username: "ada".into(),
			age: 36,
			hobbies: vec!["chess".into()],
		};

		assert!(block_on(h.actions.save_user(None, &form)));
		assert_eq!(h.api().calls(), vec!["create"]);
		let users = h.graph.users();
		assert_eq!(users.len(), 2);
		assert_eq!(users[1].username, "ada");
		assert_eq!(
			h.last_toast(),
			(Severity::Success, "User created successfully".into())
		);
	}

	#[test]
	fn editing_replaces_user_in_place() {
		let h = Harness::new(pair());
		h.graph.set_users(pair());
		let form = UserForm {
			username: "bea".into(),
			age: 40,
			hobbies: vec!["golf".into()],
		};

		assert!(block_on(h.actions.save_user(Some("b"), &form)));
		assert_eq!(h.api().calls(), vec!["update"]);
		let users = h.graph.users();
		assert_eq!(users.len(), 2);
		assert_eq!(users[1].username, "bea");
		assert_eq!(users[1].hobbies, vec!["golf"]);
	}

	#[test]
	fn failed_save_keeps_form_open() {
		let h = Harness::new(vec![]);
		*h.api().failing.borrow_mut() = Some(ApiOperation::CreateUser);
		let form = UserForm {
			username: "ada".into(),
			age: 36,
			hobbies: vec!["chess".into()],
		};

		assert!(!block_on(h.actions.save_user(None, &form)));
		assert!(h.graph.users().is_empty());
		assert_eq!(
			h.last_toast(),
			(Severity::Error, "Failed to create user".into())
		);
		assert!(!h.graph.state().get_untracked().loading);
	}

	#[test]
	fn link_calls_service_then_refetches() {
		let h = Harness::new(pair());
		h.graph.set_users(pair());

		assert!(block_on(h.actions.link_users("a", "b")));
		assert_eq!(h.api().calls(), vec!["link", "graph"]);
		assert_eq!(graph::edges(&h.graph.users()).len(), 1);
		assert_eq!(
			h.last_toast(),
			(Severity::Success, "Users linked successfully!".into())
		);
	}

	#[test]
	fn already_connected_pair_is_not_sent() {
		let linked = vec![user("a", &["b"], &[]), user("b", &["a"], &[])];
		let h = Harness::new(linked.clone());
		h.graph.set_users(linked);

		assert!(!block_on(h.actions.link_users("b", "a")));
		assert!(h.api().calls().is_empty());
		assert_eq!(
			h.last_toast(),
			(Severity::Warning, "Users are already connected".into())
		);
	}

	#[test]
	fn failed_link_leaves_edges_untouched() {
		let h = Harness::new(pair());
		h.graph.set_users(pair());
		*h.api().failing.borrow_mut() = Some(ApiOperation::LinkUsers);

		assert!(!block_on(h.actions.link_users("a", "b")));
		assert_eq!(h.api().calls(), vec!["link"]);
		assert!(graph::edges(&h.graph.users()).is_empty());
		assert_eq!(
			h.last_toast(),
			(Severity::Error, "Failed to link users".into())
		);
	}

	#[test]
	fn unlink_refetches() {
		let linked = vec![user("a", &["b"], &[]), user("b", &["a"], &[])];
		let h = Harness::new(linked.clone());
		h.graph.set_users(linked);

		assert!(block_on(h.actions.unlink_users("a", "b")));
		assert_eq!(h.api().calls(), vec!["unlink", "graph"]);
		assert!(graph::edges(&h.graph.users()).is_empty());
	}

	#[test]
	fn duplicate_hobby_in_other_case_is_refused() {
		let h = Harness::new(pair());
		h.graph.set_users(pair());

		assert!(!block_on(h.actions.add_hobby("a", "Chess")));
		assert!(h.api().calls().is_empty());
		assert_eq!(
			h.last_toast(),
			(Severity::Warning, "User already has this hobby".into())
		);
	}

	#[test]
	fn hobby_is_appended_and_patched_locally() {
		let h = Harness::new(pair());
		h.graph.set_users(pair());

		assert!(block_on(h.actions.add_hobby("a", "  golf ")));
		assert_eq!(h.api().calls(), vec!["update"]);
		assert_eq!(h.graph.users()[0].hobbies, vec!["chess", "golf"]);
		assert_eq!(
			h.last_toast(),
			(Severity::Success, "Added hobby \"golf\" to user-a".into())
		);
	}

	#[test]
	fn hobby_for_unknown_user_errors() {
		let h = Harness::new(vec![]);
		assert!(!block_on(h.actions.add_hobby("ghost", "golf")));
		assert_eq!(h.last_toast(), (Severity::Error, "User not found".into()));
	}

	#[test]
	fn delete_removes_locally_on_success() {
		let h = Harness::new(pair());
		h.graph.set_users(pair());

		assert!(block_on(h.actions.delete_user("a")));
		assert_eq!(h.graph.users().len(), 1);
	}

	#[test]
	fn rejected_delete_keeps_user() {
		let h = Harness::new(pair());
		h.graph.set_users(pair());
		*h.api().failing.borrow_mut() = Some(ApiOperation::DeleteUser);

		assert!(!block_on(h.actions.delete_user("a")));
		assert_eq!(h.graph.users().len(), 2);
		assert_eq!(
			h.last_toast(),
			(Severity::Error, "Failed to delete user".into())
		);
	}
}
