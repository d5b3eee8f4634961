//! SchoolDesk client: everything that talks to the backend or holds state
//! across requests.
//!
//! - [`config`]: client configuration (defaults, file, environment)
//! - [`session`]: the explicit session context and its on-disk blob
//! - [`notify`]: transient user notifications (toasts)
//! - [`api_client`]: the authenticated HTTP client
//! - [`services`]: the [`services::ApiService`] seam the grid talks through
//! - [`fetch`]: one-request-per-dependency-change fetching with stale
//!   response protection
//! - [`grid`]: the data-grid controller composing all of the above
//! - [`scd`]: school/class/division name prefetch

pub mod api_client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod grid;
pub mod notify;
pub mod scd;
pub mod services;
pub mod session;

pub use api_client::ApiClient;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult, ConfigError, SessionError};
pub use fetch::{FetchController, FetchDeps, FetchOutcome};
pub use grid::{Confirm, DataGrid, DeleteOutcome, GridOptions};
pub use notify::{LogNotifier, Notification, NotificationLevel, Notifier, ToastQueue};
pub use scd::{ScdDirectory, ScdEndpoints};
pub use services::api::{ApiService, UpdateMethod};
pub use session::{InvalidationReason, Session, SessionContext, SessionEvent, SessionStore};
