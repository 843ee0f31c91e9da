//! rn-debug: debug-session bridge for React Native apps.
//!
//! The crate sits between an IDE's debug requests and the inspector exposed by
//! the React Native packager. It validates the project, asks the IDE-side
//! remote extension to launch the app and report the packager port, attaches
//! an inspector [`Transport`] to `localhost:<port>`, hides native frames from
//! paused notifications and tears the session down per platform.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use rn_debug::{AdapterConfig, Session};
//! use rn_debug_protocol::{AttachArgs, Platform, SessionArgs};
//!
//! #[tokio::main]
//! async fn main() -> rn_debug::Result<()> {
//!     let config = AdapterConfig::from_env()?;
//!     let session = Session::builder(Arc::new(MyTransport::new()))
//!         .config(&config)
//!         .build();
//!
//!     let args = AttachArgs::new(SessionArgs::new(Platform::Ios, "/work/app"));
//!     session.attach(args).await?;
//!     Ok(())
//! }
//! ```

pub mod cleanup;
pub mod config;
pub mod error;
pub mod frames;
pub mod logging;
pub mod project;
pub mod remote;
pub mod session;
pub mod settings;
pub mod telemetry;
pub mod testing;
pub mod transport;
pub mod versions;

pub use cleanup::{CleanupContext, CleanupHandler};
pub use config::AdapterConfig;
pub use error::{Error, ErrorKind, Result};
pub use frames::{filter_native_frames, is_native_frame, without_native_frames};
pub use project::{PackageManifest, Project};
pub use remote::{RemoteClient, RemoteClientFactory, RpcRemoteClient, RpcRemoteClientFactory};
pub use session::{Session, SessionBuilder, SessionState};
pub use settings::{Settings, SettingsGate};
pub use telemetry::{
	NoopTelemetry, Properties, PropertyBag, Telemetry, TelemetryError, TelemetryEvent, TelemetryOutcome, TelemetrySink,
	TracingTelemetry,
};
pub use transport::{OutputChannel, TracingOutput, Transport};
pub use versions::{PackageJsonVersionResolver, VersionResolver};
