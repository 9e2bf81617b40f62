use leptos::prelude::*;
use log::debug;

use crate::api::User;

/// Canonical UI copy of the graph plus selection state.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphState {
	pub users: Vec<User>,
	pub loading: bool,
	pub error: Option<String>,
	pub selected_user_id: Option<String>,
	pub dragging_hobby: Option<String>,
}

impl Default for GraphState {
	fn default() -> Self {
		Self {
			users: Vec::new(),
			loading: true,
			error: None,
			selected_user_id: None,
			dragging_hobby: None,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum GraphAction {
	SetUsers(Vec<User>),
	AddUser(User),
	UpdateUser(User),
	DeleteUser(String),
	SetLoading(bool),
	SetError(Option<String>),
	SetSelectedUser(Option<String>),
	SetDraggingHobby(Option<String>),
	// History actions are part of the vocabulary but no control issues them.
	PushHistory,
	Undo,
	Redo,
}

impl GraphState {
	pub fn apply(&mut self, action: GraphAction) {
		match action {
			GraphAction::SetUsers(users) => self.users = users,
			GraphAction::AddUser(user) => self.users.push(user),
			GraphAction::UpdateUser(user) => {
				if let Some(slot) = self.users.iter_mut().find(|u| u.id == user.id) {
					*slot = user;
				}
			}
			GraphAction::DeleteUser(id) => {
				self.users.retain(|u| u.id != id);
				if self.selected_user_id.as_deref() == Some(id.as_str()) {
					self.selected_user_id = None;
				}
			}
			GraphAction::SetLoading(loading) => self.loading = loading,
			GraphAction::SetError(error) => self.error = error,
			GraphAction::SetSelectedUser(id) => self.selected_user_id = id,
			GraphAction::SetDraggingHobby(hobby) => self.dragging_hobby = hobby,
			GraphAction::PushHistory | GraphAction::Undo | GraphAction::Redo => {}
		}
	}

	pub fn user(&self, id: &str) -> Option<&User> {
		self.users.iter().find(|u| u.id == id)
	}

	pub fn selected_user(&self) -> Option<&User> {
		self.selected_user_id.as_deref().and_then(|id| self.user(id))
	}

	/// True only while the selected id still names a user in the list.
	pub fn has_selection(&self) -> bool {
		self.selected_user().is_some()
	}
}

/// Ticket for one full-graph refetch; see [`GraphStore::begin_sync`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct SyncToken(u64);

/// Copyable handle to the graph state, shared through context.
///
/// All writes go through [`GraphStore::dispatch`], so every observer sees a
/// whole snapshot per action.
#[derive(Clone, Copy)]
pub struct GraphStore {
	state: RwSignal<GraphState>,
	sync_seq: StoredValue<u64>,
}

impl Default for GraphStore {
	fn default() -> Self {
		Self::new()
	}
}

impl GraphStore {
	pub fn new() -> Self {
		Self {
			state: RwSignal::new(GraphState::default()),
			sync_seq: StoredValue::new(0),
		}
	}

	pub fn state(&self) -> ReadSignal<GraphState> {
		self.state.read_only()
	}

	pub fn dispatch(&self, action: GraphAction) {
		self.state.update(|s| s.apply(action));
	}

	/// Reads the state without subscribing the caller.
	pub fn with<R>(&self, f: impl FnOnce(&GraphState) -> R) -> R {
		self.state.with_untracked(f)
	}

	#[cfg(test)]
	pub fn users(&self) -> Vec<User> {
		self.with(|s| s.users.clone())
	}

	pub fn set_users(&self, users: Vec<User>) {
		self.dispatch(GraphAction::SetUsers(users));
	}

	pub fn add_user(&self, user: User) {
		self.dispatch(GraphAction::AddUser(user));
	}

	pub fn update_user(&self, user: User) {
		self.dispatch(GraphAction::UpdateUser(user));
	}

	pub fn delete_user(&self, id: impl Into<String>) {
		self.dispatch(GraphAction::DeleteUser(id.into()));
	}

	pub fn set_loading(&self, loading: bool) {
		self.dispatch(GraphAction::SetLoading(loading));
	}

	pub fn set_error(&self, error: Option<String>) {
		self.dispatch(GraphAction::SetError(error));
	}

	pub fn set_selected_user(&self, id: Option<String>) {
		self.dispatch(GraphAction::SetSelectedUser(id));
	}

	pub fn set_dragging_hobby(&self, hobby: Option<String>) {
		self.dispatch(GraphAction::SetDraggingHobby(hobby));
	}

	/// Starts a refetch. Only the most recently issued token may write back.
	pub fn begin_sync(&self) -> SyncToken {
		self.sync_seq.update_value(|n| *n += 1);
		SyncToken(self.sync_seq.get_value())
	}

	/// Replaces the user list if `token` is still the latest sync.
	///
	/// Returns `false` when a newer refetch was started meanwhile; the stale
	/// response is dropped.
	pub fn finish_sync(&self, token: SyncToken, users: Vec<User>) -> bool {
		let latest = self.sync_seq.get_value();
		if token.0 != latest {
			debug!("dropping stale graph response {} (latest {})", token.0, latest);
			return false;
		}
		self.set_users(users);
		true
	}
}
