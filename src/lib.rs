// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Layout core of a social-card editor.
//!
//! A card is a fixed 1200×630 canvas holding five blocks (avatar, title,
//! description, stats row, badge row) described by a [`CardConfig`]. The
//! crate derives each block's true footprint from the configuration and the
//! repository data ([`metrics`]), turns geometry requests into consistent
//! configuration updates ([`transform`]), drives drag, resize and selection
//! from pointer events ([`interaction`]) and renders the result as SVG
//! ([`render`]). Presets are imported and exported through [`preset`].
//!
//! The geometry core is pure and never fails; only the file-facing surfaces
//! return [`Error`].

pub mod config;
pub mod error;
pub mod geometry;
pub mod interaction;
pub mod metrics;
pub mod preset;
pub mod render;
pub mod repository;
pub mod selection;
pub mod transform;

pub use config::CardConfig;
pub use error::{Error, io_error};
pub use geometry::{BlockId, BlockMap, CANVAS_HEIGHT, CANVAS_WIDTH, GeometrySource, Point, Rect};
pub use interaction::{EditorEvent, EditorState, HitTarget, Modifiers, ResizeHandle, hit_test};
pub use metrics::{estimate_text_width, interactive_rects};
pub use preset::{load_preset, parse_preset, sanitize_card_config, save_preset, write_preset};
pub use render::{Labels, render_svg};
pub use repository::{RepoData, RepoReference, load_repository};
pub use selection::Selection;
pub use transform::{AlignAction, DistributeAxis, align_selected_blocks, apply_rect_to_config, distribute_selected_blocks};
