//! Client for the relationship service REST API.

mod client;
mod error;
mod types;

pub use client::ApiClient;
pub use error::{ApiError, ApiOperation};
pub use types::{
	CreateUserRequest, GraphResponse, LinkRequest, Relationship, UpdateUserRequest, User,
};

/// Operations offered by the relationship service.
///
/// Every call is a single attempt: no retry, no timeout. Workflows in
/// [`crate::actions`] are generic over this trait so they can run against an
/// in-memory service in tests.
#[allow(async_fn_in_trait)]
pub trait UserApi {
	/// `GET /users`
	async fn list_users(&self) -> Result<Vec<User>, ApiError>;
	/// `GET /users/{id}`
	async fn get_user(&self, id: &str) -> Result<User, ApiError>;
	/// `POST /users`
	async fn create_user(&self, req: &CreateUserRequest) -> Result<User, ApiError>;
	/// `PUT /users/{id}`
	async fn update_user(&self, id: &str, req: &UpdateUserRequest) -> Result<User, ApiError>;
	/// `DELETE /users/{id}`
	async fn delete_user(&self, id: &str) -> Result<(), ApiError>;
	/// `POST /users/{id}/link`
	async fn link_users(&self, id: &str, friend_id: &str) -> Result<User, ApiError>;
	/// `DELETE /users/{id}/unlink`
	async fn unlink_users(&self, id: &str, friend_id: &str) -> Result<User, ApiError>;
	/// `GET /graph`
	async fn graph(&self) -> Result<GraphResponse, ApiError>;
}
