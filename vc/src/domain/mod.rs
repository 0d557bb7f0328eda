//! Domain types for viewcoord
//!
//! Core value types shared by every component: the view identifier and the
//! ordered filter set captured from a panel.

mod filter;
mod id;

pub use filter::FilterSet;
pub use id::ViewId;
