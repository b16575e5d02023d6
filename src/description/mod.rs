//! Description context builder
//!
//! Loads description fragments, merges them into one [`SwitchDescription`]
//! and derives the [`RenderContext`] shared by every template render.

pub mod context;
pub mod fragment;
pub mod model;

pub use context::{DESCRIPTION_KEY, RenderContext, SWITCH_PREFIX_KEY, build_render_context};
pub use fragment::{FileFragmentLoader, Fragment, FragmentLoader};
pub use model::SwitchDescription;
