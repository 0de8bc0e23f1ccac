// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Canvas-space primitives shared by the metrics, transform and interaction
//! layers.
//!
//! Every coordinate is expressed in logical canvas units. The canvas is a
//! fixed 1200×630 surface with its origin in the top-left corner, regardless
//! of how large the host draws it on screen.

use std::{
    fmt,
    ops::{Index, IndexMut},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Logical width of the card canvas.
pub const CANVAS_WIDTH: f64 = 1200.0;
/// Logical height of the card canvas.
pub const CANVAS_HEIGHT: f64 = 630.0;

/// Clamps `value` into `[min, max]`.
///
/// Unlike [`f64::clamp`] this never panics: when `min > max` the upper bound
/// wins, and a NaN input collapses onto the lower bound.
pub fn clamp(value: f64, min: f64, max: f64,) -> f64
{
    value.max(min,).min(max,)
}

/// Returns `value` when it is finite, otherwise `fallback`.
pub fn finite_or(value: f64, fallback: f64,) -> f64
{
    if value.is_finite() { value } else { fallback }
}

/// Point in canvas or client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize,)]
pub struct Point
{
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point
{
    /// Creates a point from its coordinates.
    pub const fn new(x: f64, y: f64,) -> Self
    {
        Self {
            x,
            y,
        }
    }
}

/// Axis-aligned rectangle in canvas space.
///
/// # Examples
///
/// ```
/// use cardify::Rect;
///
/// let rect = Rect::new(100.0, 50.0, 200.0, 80.0,);
/// assert_eq!(rect.right(), 300.0);
/// assert_eq!(rect.center_y(), 90.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize,)]
pub struct Rect
{
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl Rect
{
    /// Creates a rectangle from its position and size.
    pub const fn new(x: f64, y: f64, w: f64, h: f64,) -> Self
    {
        Self {
            x,
            y,
            w,
            h,
        }
    }

    /// Right edge (`x + w`).
    pub fn right(&self,) -> f64
    {
        self.x + self.w
    }

    /// Bottom edge (`y + h`).
    pub fn bottom(&self,) -> f64
    {
        self.y + self.h
    }

    /// Horizontal center.
    pub fn center_x(&self,) -> f64
    {
        self.x + self.w / 2.0
    }

    /// Vertical center.
    pub fn center_y(&self,) -> f64
    {
        self.y + self.h / 2.0
    }

    /// Returns `true` when the point lies inside the rectangle, edges
    /// included.
    pub fn contains(&self, point: Point,) -> bool
    {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Returns `true` when every component is a finite number.
    pub fn is_finite(&self,) -> bool
    {
        self.x.is_finite() && self.y.is_finite() && self.w.is_finite() && self.h.is_finite()
    }

    /// Returns `true` when the rectangle lies fully inside the canvas.
    pub fn fits_canvas(&self,) -> bool
    {
        self.x >= 0.0 && self.y >= 0.0 && self.right() <= CANVAS_WIDTH && self.bottom() <= CANVAS_HEIGHT
    }

    /// Replaces every non-finite component with the matching component of
    /// `fallback`.
    pub fn or_finite(self, fallback: Rect,) -> Rect
    {
        Rect {
            x: finite_or(self.x, fallback.x,),
            y: finite_or(self.y, fallback.y,),
            w: finite_or(self.w, fallback.w,),
            h: finite_or(self.h, fallback.h,),
        }
    }
}

/// Smallest size a block may be resized to.
#[derive(Debug, Clone, Copy, PartialEq,)]
pub struct MinimumSize
{
    /// Minimum width in canvas units.
    pub width:  f64,
    /// Minimum height in canvas units.
    pub height: f64,
}

/// Clamps a rectangle to the canvas and to a minimum size.
///
/// Width and height are clamped first so the position can always be brought
/// back inside the canvas.
pub fn clamp_rect_to_canvas(rect: Rect, minimum: MinimumSize,) -> Rect
{
    let w = clamp(rect.w, minimum.width, CANVAS_WIDTH,);
    let h = clamp(rect.h, minimum.height, CANVAS_HEIGHT,);
    Rect {
        x: clamp(rect.x, 0.0, CANVAS_WIDTH - w,),
        y: clamp(rect.y, 0.0, CANVAS_HEIGHT - h,),
        w,
        h,
    }
}

/// Where a block's on-canvas size comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash,)]
pub enum GeometrySource
{
    /// Width and height are persisted in the layout and authoritative.
    Stored,
    /// Width and height are recomputed from style fields and content; the
    /// persisted size is advisory.
    DerivedFromStyle,
}

/// Identity of one of the five visual blocks of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,)]
#[serde(rename_all = "lowercase")]
pub enum BlockId
{
    /// Repository owner avatar or custom logo.
    Avatar,
    /// Owner and repository name.
    Title,
    /// Repository description text.
    Description,
    /// Row of star/fork/issue counters.
    Stats,
    /// Row of language badges.
    Badges,
}

impl BlockId
{
    /// All blocks in canonical paint order.
    pub const ALL: [BlockId; 5] =
        [BlockId::Avatar, BlockId::Title, BlockId::Description, BlockId::Stats, BlockId::Badges,];

    /// Block selected when nothing else is.
    pub const DEFAULT: BlockId = BlockId::Title;

    /// Stable identifier used in presets and on the command line.
    pub const fn as_str(self,) -> &'static str
    {
        match self {
            BlockId::Avatar => "avatar",
            BlockId::Title => "title",
            BlockId::Description => "description",
            BlockId::Stats => "stats",
            BlockId::Badges => "badges",
        }
    }

    /// Human readable label shown next to the block outline.
    pub const fn label(self,) -> &'static str
    {
        match self {
            BlockId::Avatar => "Avatar",
            BlockId::Title => "Title",
            BlockId::Description => "Description",
            BlockId::Stats => "Stats Row",
            BlockId::Badges => "Badges Row",
        }
    }

    /// Parses a block identifier, returning `None` for anything outside the
    /// fixed set.
    pub fn parse(value: &str,) -> Option<Self,>
    {
        Self::ALL.into_iter().find(|block| block.as_str().eq_ignore_ascii_case(value.trim(),),)
    }

    /// Minimum size enforced by resizing.
    pub const fn minimum_size(self,) -> MinimumSize
    {
        let (width, height,) = match self {
            BlockId::Avatar => (40.0, 40.0,),
            BlockId::Title => (140.0, 60.0,),
            BlockId::Description => (220.0, 80.0,),
            BlockId::Stats => (120.0, 40.0,),
            BlockId::Badges => (120.0, 28.0,),
        };
        MinimumSize {
            width,
            height,
        }
    }

    /// Whether the block's size is stored or derived from style fields.
    pub const fn geometry_source(self,) -> GeometrySource
    {
        match self {
            BlockId::Title | BlockId::Description => GeometrySource::Stored,
            BlockId::Avatar | BlockId::Stats | BlockId::Badges => GeometrySource::DerivedFromStyle,
        }
    }
}

impl fmt::Display for BlockId
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        f.write_str(self.as_str(),)
    }
}

impl FromStr for BlockId
{
    type Err = Error;

    fn from_str(value: &str,) -> Result<Self, Self::Err,>
    {
        Self::parse(value,).ok_or_else(|| Error::validation(format!("unknown block '{value}'"),),)
    }
}

/// One value per block, addressable by [`BlockId`].
///
/// The map is total: every block always has an entry, so lookups cannot fail.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize,)]
pub struct BlockMap<T,>
{
    /// Avatar entry.
    pub avatar:      T,
    /// Title entry.
    pub title:       T,
    /// Description entry.
    pub description: T,
    /// Stats entry.
    pub stats:       T,
    /// Badges entry.
    pub badges:      T,
}

impl<T,> BlockMap<T,>
{
    /// Builds a map by evaluating `f` for every block in canonical order.
    pub fn from_fn<F,>(mut f: F,) -> Self
    where
        F: FnMut(BlockId,) -> T,
    {
        Self {
            avatar:      f(BlockId::Avatar,),
            title:       f(BlockId::Title,),
            description: f(BlockId::Description,),
            stats:       f(BlockId::Stats,),
            badges:      f(BlockId::Badges,),
        }
    }

    /// Iterates over `(block, value)` pairs in canonical order.
    pub fn iter(&self,) -> impl Iterator<Item = (BlockId, &T,),>
    {
        BlockId::ALL.into_iter().map(move |block| (block, &self[block],),)
    }
}

impl<T,> Index<BlockId,> for BlockMap<T,>
{
    type Output = T;

    fn index(&self, block: BlockId,) -> &T
    {
        match block {
            BlockId::Avatar => &self.avatar,
            BlockId::Title => &self.title,
            BlockId::Description => &self.description,
            BlockId::Stats => &self.stats,
            BlockId::Badges => &self.badges,
        }
    }
}

impl<T,> IndexMut<BlockId,> for BlockMap<T,>
{
    fn index_mut(&mut self, block: BlockId,) -> &mut T
    {
        match block {
            BlockId::Avatar => &mut self.avatar,
            BlockId::Title => &mut self.title,
            BlockId::Description => &mut self.description,
            BlockId::Stats => &mut self.stats,
            BlockId::Badges => &mut self.badges,
        }
    }
}

#[cfg(test)]
mod tests
{
    use proptest::prelude::*;

    use super::{
        BlockId, BlockMap, CANVAS_HEIGHT, CANVAS_WIDTH, GeometrySource, MinimumSize, Rect, clamp,
        clamp_rect_to_canvas,
    };

    proptest! {
        #[test]
        fn clamped_rect_always_fits_canvas(
            x in -2000.0f64..3000.0,
            y in -2000.0f64..3000.0,
            w in -100.0f64..4000.0,
            h in -100.0f64..4000.0
        ) {
            let minimum = BlockId::Description.minimum_size();
            let rect = clamp_rect_to_canvas(Rect::new(x, y, w, h), minimum);
            prop_assert!(rect.fits_canvas());
            prop_assert!(rect.w >= minimum.width);
            prop_assert!(rect.h >= minimum.height);
        }
    }

    #[test]
    fn clamp_prefers_upper_bound_when_range_is_inverted()
    {
        assert_eq!(clamp(5.0, 10.0, 2.0,), 2.0);
        assert_eq!(clamp(f64::NAN, 1.0, 3.0,), 1.0);
    }

    #[test]
    fn clamp_rect_raises_size_to_minimum()
    {
        let minimum = MinimumSize {
            width:  140.0,
            height: 60.0,
        };
        let rect = clamp_rect_to_canvas(Rect::new(1190.0, 620.0, 10.0, 10.0,), minimum,);
        assert_eq!(rect, Rect::new(CANVAS_WIDTH - 140.0, CANVAS_HEIGHT - 60.0, 140.0, 60.0));
    }

    #[test]
    fn parse_accepts_known_blocks_only()
    {
        assert_eq!(BlockId::parse("Stats"), Some(BlockId::Stats));
        assert_eq!(BlockId::parse(" badges "), Some(BlockId::Badges));
        assert_eq!(BlockId::parse("footer"), None);
        assert!("footer".parse::<BlockId>().is_err());
    }

    #[test]
    fn text_blocks_store_their_geometry()
    {
        assert_eq!(BlockId::Title.geometry_source(), GeometrySource::Stored);
        assert_eq!(BlockId::Badges.geometry_source(), GeometrySource::DerivedFromStyle);
    }

    #[test]
    fn block_map_indexes_every_block()
    {
        let mut map = BlockMap::from_fn(|block| block.as_str().len(),);
        map[BlockId::Stats] = 42;
        let collected: Vec<_,> = map.iter().map(|(block, value,)| (block, *value,),).collect();
        assert_eq!(collected[0], (BlockId::Avatar, 6));
        assert_eq!(collected[3], (BlockId::Stats, 42));
        assert_eq!(collected.len(), 5);
    }
}
