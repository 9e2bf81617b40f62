use serde::{Deserialize, Serialize};

/// A user record as returned by the relationship service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
	pub id: String,
	pub username: String,
	pub age: u32,
	#[serde(default)]
	pub hobbies: Vec<String>,
	/// Ids of mutual friends. The service keeps both sides in step.
	#[serde(default)]
	pub friends: Vec<String>,
	#[serde(default)]
	pub created_at: Option<String>,
	#[serde(default)]
	pub popularity_score: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateUserRequest {
	pub username: String,
	pub age: u32,
	pub hobbies: Vec<String>,
}

/// Partial update; absent fields are left untouched by the service.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateUserRequest {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub username: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub age: Option<u32>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub hobbies: Option<Vec<String>>,
}

impl From<CreateUserRequest> for UpdateUserRequest {
	fn from(req: CreateUserRequest) -> Self {
		Self {
			username: Some(req.username),
			age: Some(req.age),
			hobbies: Some(req.hobbies),
		}
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRequest {
	pub friend_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
	pub user_id1: String,
	pub user_id2: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphResponse {
	#[serde(default)]
	pub users: Vec<User>,
	#[serde(default)]
	pub relationships: Vec<Relationship>,
}
