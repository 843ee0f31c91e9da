//! Seams to the inspector transport and the IDE output channel.
//!
//! The bridge does not speak the inspector protocol itself. The session holds a
//! [`Transport`] and delegates attach, disconnect and paused handling to it.

use async_trait::async_trait;
use rn_debug_protocol::{DisconnectArgs, OutputCategory, PausedNotification, TransportAttachArgs};

use crate::error::Result;

/// The inspector transport the session forwards to.
#[async_trait]
pub trait Transport: Send + Sync {
	/// Connects to the inspector exposed by the packager.
	async fn attach(&self, args: TransportAttachArgs) -> Result<()>;

	/// Tears the inspector connection down.
	async fn disconnect(&self, args: DisconnectArgs) -> Result<()>;

	/// Surfaces a paused notification to the IDE.
	async fn on_paused(&self, notification: PausedNotification) -> Result<()>;
}

/// Human-readable lines shown in the IDE's debug console.
pub trait OutputChannel: Send + Sync {
	fn output(&self, text: &str, category: OutputCategory);
}

/// Output channel that forwards lines to `tracing`, for hosts without a console.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingOutput;

impl OutputChannel for TracingOutput {
	fn output(&self, text: &str, category: OutputCategory) {
		match category {
			OutputCategory::Stderr => tracing::warn!(target = "rn_debug.output", category = category.as_str(), "{text}"),
			_ => tracing::info!(target = "rn_debug.output", category = category.as_str(), "{text}"),
		}
	}
}
