//! # SchoolDesk Core
//!
//! Pure logic behind the SchoolDesk administrative dashboard. Nothing in this
//! crate performs I/O; the client crate feeds it session data and responses.
//!
//! ## Overview
//!
//! - **Permissions**: [`rbac`] answers `(permissions, entity, action) -> bool`
//! - **Reconciliation**: [`grid::reconcile`] merges UI filters, pagination,
//!   search and role-enforced filters into one request payload
//! - **Presentation models**: [`grid::columns`], [`grid::actions`] and
//!   [`grid::view`] turn rows into a desktop table or a stacked card list
//! - **Screens**: [`screens`] describes every entity screen of the dashboard
//!
//! ## Examples
//!
//! ```
//! use schooldesk_core::grid::{GridQuery, RequestReconciler};
//! use schooldesk_model::prelude::*;
//!
//! let student = Profile::new(AccountId(7), 70, ActorKind::Student)
//!     .with_scd(Some(1), Some(2), Some(3));
//! let ui = FilterSet::new().with(filter_keys::CLASS_ID, 99);
//!
//! let mut reconciler = RequestReconciler::new();
//! let request = reconciler.reconcile(&student, GridQuery::new(PaginationModel::default(), "", &ui));
//! assert_eq!(request.filters.get(filter_keys::CLASS_ID), Some(&serde_json::json!(2)));
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

pub mod error;
pub mod grid;
pub mod rbac;
pub mod screens;

pub use error::{CoreError, Result};
pub use schooldesk_model as model;
