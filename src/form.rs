//! Draft state for the create/edit user form.

use thiserror::Error;

use crate::api::{CreateUserRequest, User};

/// Age the form starts at, and falls back to on unparsable input.
pub const DEFAULT_AGE: u32 = 25;
pub const MIN_AGE: u32 = 1;
pub const MAX_AGE: u32 = 150;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FormError {
	#[error("Username is required")]
	MissingUsername,
	#[error("Age must be between 1 and 150")]
	AgeOutOfRange,
	#[error("At least one hobby is required")]
	NoHobbies,
	#[error("Hobby already added")]
	DuplicateHobby,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserForm {
	pub username: String,
	pub age: u32,
	pub hobbies: Vec<String>,
}

impl Default for UserForm {
	fn default() -> Self {
		Self {
			username: String::new(),
			age: DEFAULT_AGE,
			hobbies: Vec::new(),
		}
	}
}

impl UserForm {
	pub fn from_user(user: &User) -> Self {
		Self {
			username: user.username.clone(),
			age: user.age,
			hobbies: user.hobbies.clone(),
		}
	}

	pub fn set_age_input(&mut self, raw: &str) {
		self.age = raw.trim().parse().unwrap_or(DEFAULT_AGE);
	}

	/// Appends a hobby chip. Blank input is ignored; exact duplicates are
	/// refused.
	pub fn add_hobby(&mut self, hobby: &str) -> Result<bool, FormError> {
		if hobby.trim().is_empty() {
			return Ok(false);
		}
		if self.hobbies.iter().any(|h| h == hobby) {
			return Err(FormError::DuplicateHobby);
		}
		self.hobbies.push(hobby.to_string());
		Ok(true)
	}

	pub fn remove_hobby(&mut self, hobby: &str) {
		self.hobbies.retain(|h| h != hobby);
	}

	pub fn validate(&self) -> Result<CreateUserRequest, FormError> {
		if self.username.trim().is_empty() {
			return Err(FormError::MissingUsername);
		}
		if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
			return Err(FormError::AgeOutOfRange);
		}
		if self.hobbies.is_empty() {
			return Err(FormError::NoHobbies);
		}
		Ok(CreateUserRequest {
			username: self.username.clone(),
			age: self.age,
			hobbies: self.hobbies.clone(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn valid() -> UserForm {
		UserForm {
			username: "ada".into(),
			age: 36,
			hobbies: vec!["chess".into()],
		}
	}

	#[test]
	fn valid_form_builds_request() {
		let req = valid().validate().unwrap();
		assert_eq!(req.username, "ada");
		assert_eq!(req.age, 36);
		assert_eq!(req.hobbies, vec!["chess"]);
	}

	#[test]
	fn blank_username_is_rejected() {
		let form = UserForm {
			username: "   ".into(),
			..valid()
		};
		assert_eq!(form.validate(), Err(FormError::MissingUsername));
	}

	#[test]
	fn age_bounds_are_inclusive() {
		for (age, ok) in [(0, false), (1, true), (150, true), (151, false)] {
			let form = UserForm { age, ..valid() };
			assert_eq!(form.validate().is_ok(), ok, "age {age}");
		}
	}

	#[test]
	fn needs_a_hobby() {
		let form = UserForm {
			hobbies: vec![],
			..valid()
		};
		assert_eq!(form.validate(), Err(FormError::NoHobbies));
	}

	#[test]
	fn hobby_chips_dedupe_exactly() {
		let mut form = UserForm::default();
		assert_eq!(form.add_hobby("Chess"), Ok(true));
		assert_eq!(form.add_hobby("Chess"), Err(FormError::DuplicateHobby));
		assert_eq!(form.add_hobby("chess"), Ok(true));
		assert_eq!(form.add_hobby("  "), Ok(false));
		form.remove_hobby("Chess");
		assert_eq!(form.hobbies, vec!["chess"]);
	}

	#[test]
	fn bad_age_input_falls_back_to_default() {
		let mut form = UserForm::default();
		form.set_age_input("42");
		assert_eq!(form.age, 42);
		form.set_age_input("forty");
		assert_eq!(form.age, DEFAULT_AGE);
	}
}
