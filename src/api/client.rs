use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

use super::error::{ApiError, ApiOperation};
use super::types::{
	CreateUserRequest, GraphResponse, LinkRequest, UpdateUserRequest, User,
};
use super::UserApi;

/// `window.fetch` backed implementation of [`UserApi`].
#[derive(Clone, Debug)]
pub struct ApiClient {
	base_url: String,
}

impl ApiClient {
	pub fn new(base_url: impl Into<String>) -> Self {
		Self {
			base_url: base_url.into(),
		}
	}

	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	fn url(&self, path: &str) -> String {
		format!("{}{}", self.base_url, path)
	}

	/// Issues one request and returns the raw body text of a successful response.
	async fn send(
		&self,
		operation: ApiOperation,
		method: &str,
		path: &str,
		body: Option<String>,
	) -> Result<String, ApiError> {
		let url = self.url(path);
		debug!("{} {}", method, url);

		let opts = RequestInit::new();
		opts.set_method(method);
		opts.set_mode(RequestMode::Cors);
		if let Some(body) = body {
			let headers = Headers::new().map_err(js_transport)?;
			headers
				.set("Content-Type", "application/json")
				.map_err(js_transport)?;
			opts.set_headers(&headers);
			opts.set_body(&JsValue::from_str(&body));
		}

		let request = Request::new_with_str_and_init(&url, &opts).map_err(js_transport)?;
		let window = web_sys::window().ok_or_else(|| ApiError::Transport("no window".into()))?;
		let resp: Response = JsFuture::from(window.fetch_with_request(&request))
			.await
			.map_err(js_transport)?
			.dyn_into()
			.map_err(|_| ApiError::Transport("response is not a Response".into()))?;

		if !resp.ok() {
			warn!("{} {} -> HTTP {}", method, url, resp.status());
			return Err(ApiError::failed(operation, resp.status()));
		}

		let text = JsFuture::from(resp.text().map_err(js_transport)?)
			.await
			.map_err(js_transport)?;
		Ok(text.as_string().unwrap_or_default())
	}

	async fn send_json<T: DeserializeOwned>(
		&self,
		operation: ApiOperation,
		method: &str,
		path: &str,
		body: Option<&impl Serialize>,
	) -> Result<T, ApiError> {
		let body = body
			.map(serde_json::to_string)
			.transpose()
			.map_err(|e| ApiError::Decode(e.to_string()))?;
		let text = self.send(operation, method, path, body).await?;
		serde_json::from_str(&text).map_err(|e| {
			warn!("{}: {}", operation.failure_message(), e);
			ApiError::Decode(e.to_string())
		})
	}
}

fn js_transport(err: JsValue) -> ApiError {
	ApiError::Transport(
		err.as_string()
			.unwrap_or_else(|| format!("{:?}", err)),
	)
}

const NO_BODY: Option<&()> = None;

impl UserApi for ApiClient {
	async fn list_users(&self) -> Result<Vec<User>, ApiError> {
		self.send_json(ApiOperation::ListUsers, "GET", "/users", NO_BODY)
			.await
	}

	async fn get_user(&self, id: &str) -> Result<User, ApiError> {
		self.send_json(ApiOperation::GetUser, "GET", &format!("/users/{id}"), NO_BODY)
			.await
	}

	async fn create_user(&self, req: &CreateUserRequest) -> Result<User, ApiError> {
		self.send_json(ApiOperation::CreateUser, "POST", "/users", Some(req))
			.await
	}

	async fn update_user(&self, id: &str, req: &UpdateUserRequest) -> Result<User, ApiError> {
		self.send_json(ApiOperation::UpdateUser, "PUT", &format!("/users/{id}"), Some(req))
			.await
	}

	async fn delete_user(&self, id: &str) -> Result<(), ApiError> {
		self.send(ApiOperation::DeleteUser, "DELETE", &format!("/users/{id}"), None)
			.await
			.map(|_| ())
	}

	async fn link_users(&self, id: &str, friend_id: &str) -> Result<User, ApiError> {
		let body = LinkRequest {
			friend_id: friend_id.into(),
		};
		self.send_json(
			ApiOperation::LinkUsers,
			"POST",
			&format!("/users/{id}/link"),
			Some(&body),
		)
		.await
	}

	async fn unlink_users(&self, id: &str, friend_id: &str) -> Result<User, ApiError> {
		let body = LinkRequest {
			friend_id: friend_id.into(),
		};
		self.send_json(
			ApiOperation::UnlinkUsers,
			"DELETE",
			&format!("/users/{id}/unlink"),
			Some(&body),
		)
		.await
	}

	async fn graph(&self) -> Result<GraphResponse, ApiError> {
		self.send_json(ApiOperation::GraphData, "GET", "/graph", NO_BODY)
			.await
	}
}
