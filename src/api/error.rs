use thiserror::Error;

/// The calls the client can make, used to pick a fixed failure message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiOperation {
	ListUsers,
	GetUser,
	CreateUser,
	UpdateUser,
	DeleteUser,
	LinkUsers,
	UnlinkUsers,
	GraphData,
}

impl ApiOperation {
	pub fn failure_message(self) -> &'static str {
		match self {
			Self::ListUsers => "Failed to fetch users",
			Self::GetUser => "Failed to fetch user",
			Self::CreateUser => "Failed to create user",
			Self::UpdateUser => "Failed to update user",
			Self::DeleteUser => "Failed to delete user",
			Self::LinkUsers => "Failed to link users",
			Self::UnlinkUsers => "Failed to unlink users",
			Self::GraphData => "Failed to fetch graph data",
		}
	}
}

/// Errors surfaced by [`super::UserApi`] calls.
///
/// Status codes are kept for logging only; the message shown to the user is
/// always the fixed one for the operation.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ApiError {
	#[error("{}", operation.failure_message())]
	RequestFailed {
		operation: ApiOperation,
		status: u16,
	},
	#[error("Network error: {0}")]
	Transport(String),
	#[error("Unexpected response: {0}")]
	Decode(String),
}

impl ApiError {
	pub fn failed(operation: ApiOperation, status: u16) -> Self {
		Self::RequestFailed { operation, status }
	}
}
