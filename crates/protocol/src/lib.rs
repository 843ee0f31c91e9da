//! Wire types for the React Native direct-debugging bridge.
//!
//! These types are shared between the bridge core and anything that speaks to it:
//! the IDE-facing request arguments, the arguments handed to the inspector
//! transport, paused notifications coming back from the JS runtime, and the
//! version information reported for telemetry.
//!
//! # Main Types
//!
//! - [`LaunchArgs`] / [`AttachArgs`] - IDE request arguments
//! - [`TransportAttachArgs`] - what the inspector transport is asked to attach with
//! - [`PausedNotification`] / [`CallFrame`] - paused-execution events from the runtime
//! - [`RuntimeVersions`] - resolved React Native versions for a project

pub mod args;
pub mod frames;
pub mod native;
pub mod output;
pub mod platform;
pub mod versions;

pub use args::{AttachArgs, DisconnectArgs, LaunchArgs, SessionArgs, TransportAttachArgs};
pub use frames::{CallFrame, Location, PausedNotification};
pub use output::OutputCategory;
pub use platform::{ParsePlatformError, Platform, TraceLevel};
pub use versions::{HostVersion, RuntimeVersions};
