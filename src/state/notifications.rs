use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use leptos::prelude::*;

/// How long a toast stays up unless a TTL is given.
pub const DEFAULT_TTL: Duration = Duration::from_millis(3000);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
	Success,
	Error,
	Info,
	Warning,
}

impl Severity {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Success => "success",
			Self::Error => "error",
			Self::Info => "info",
			Self::Warning => "warning",
		}
	}

	pub fn icon(self) -> &'static str {
		match self {
			Self::Success => "\u{2714}",
			Self::Error => "\u{2716}",
			Self::Info => "\u{2139}",
			Self::Warning => "\u{26A0}",
		}
	}
}

impl fmt::Display for Severity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
	pub id: String,
	pub message: String,
	pub severity: Severity,
	pub ttl: Duration,
}

/// Deferred execution, so tests can run expiry on a manual clock.
pub trait Timer {
	fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>);
}

/// Schedules through `setTimeout`.
pub struct BrowserTimer;

impl Timer for BrowserTimer {
	fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
		set_timeout(task, delay);
	}
}

/// Toast queue shared through context. Insertion order is display order.
#[derive(Clone, Copy)]
pub struct Notifications {
	queue: RwSignal<Vec<Notification>>,
	next_id: StoredValue<u64>,
	timer: StoredValue<Rc<dyn Timer>, LocalStorage>,
}

impl Notifications {
	pub fn new() -> Self {
		Self::with_timer(Rc::new(BrowserTimer))
	}

	pub fn with_timer(timer: Rc<dyn Timer>) -> Self {
		Self {
			queue: RwSignal::new(Vec::new()),
			next_id: StoredValue::new(0),
			timer: StoredValue::new_local(timer),
		}
	}

	pub fn list(&self) -> ReadSignal<Vec<Notification>> {
		self.queue.read_only()
	}

	pub fn notify(&self, message: impl Into<String>, severity: Severity) -> String {
		self.notify_for(message, severity, DEFAULT_TTL)
	}

	/// Queues a toast that removes itself after `ttl`. A zero TTL keeps it
	/// until dismissed.
	pub fn notify_for(
		&self,
		message: impl Into<String>,
		severity: Severity,
		ttl: Duration,
	) -> String {
		self.next_id.update_value(|n| *n += 1);
		let id = format!("toast-{}", self.next_id.get_value());
		self.queue.update(|q| {
			q.push(Notification {
				id: id.clone(),
				message: message.into(),
				severity,
				ttl,
			})
		});

		if !ttl.is_zero() {
			let (this, expired) = (*self, id.clone());
			self.timer.with_value(|timer| {
				timer.schedule(ttl, Box::new(move || this.dismiss(&expired)));
			});
		}
		id
	}

	pub fn dismiss(&self, id: &str) {
		self.queue.update(|q| q.retain(|n| n.id != id));
	}

	pub fn success(&self, message: impl Into<String>) {
		self.notify(message, Severity::Success);
	}

	pub fn error(&self, message: impl Into<String>) {
		self.notify(message, Severity::Error);
	}

	pub fn warning(&self, message: impl Into<String>) {
		self.notify(message, Severity::Warning);
	}

	pub fn info(&self, message: impl Into<String>) {
		self.notify(message, Severity::Info);
	}
}

impl Default for Notifications {
	fn default() -> Self {
		Self::new()
	}
}
