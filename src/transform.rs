// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Layout transforms that turn a geometry request into a consistent
//! configuration.
//!
//! Resizing a style-driven block back-solves its style fields from the
//! requested box instead of storing the box: the style fields stay the
//! source of truth and the stored rectangle is their rendering. Alignment
//! and distribution only ever move stored positions.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    config::{BadgeConfig, CardConfig},
    error::Error,
    geometry::{BlockId, BlockMap, CANVAS_HEIGHT, CANVAS_WIDTH, Rect, clamp, clamp_rect_to_canvas},
    metrics::{
        BADGES_MIN_FOOTPRINT, STATS_MIN_FOOTPRINT, badge_extra_per_item, badge_width,
        estimate_text_width, reconcile, visible_badge_languages, visible_stats,
    },
    repository::RepoData,
};

/// Edge or center targeted by [`align_selected_blocks`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,)]
#[serde(rename_all = "lowercase")]
pub enum AlignAction
{
    /// Align left edges to the leftmost one.
    Left,
    /// Align horizontal centers to their mean.
    Center,
    /// Align right edges to the rightmost one.
    Right,
    /// Align top edges to the topmost one.
    Top,
    /// Align vertical centers to their mean.
    Middle,
    /// Align bottom edges to the lowest one.
    Bottom,
}

impl AlignAction
{
    /// Every action in toolbar order.
    pub const ALL: [AlignAction; 6] = [
        AlignAction::Left,
        AlignAction::Center,
        AlignAction::Right,
        AlignAction::Top,
        AlignAction::Middle,
        AlignAction::Bottom,
    ];

    /// Stable identifier used on the command line.
    pub const fn as_str(self,) -> &'static str
    {
        match self {
            AlignAction::Left => "left",
            AlignAction::Center => "center",
            AlignAction::Right => "right",
            AlignAction::Top => "top",
            AlignAction::Middle => "middle",
            AlignAction::Bottom => "bottom",
        }
    }

    fn axis(self,) -> DistributeAxis
    {
        match self {
            AlignAction::Left | AlignAction::Center | AlignAction::Right => DistributeAxis::Horizontal,
            AlignAction::Top | AlignAction::Middle | AlignAction::Bottom => DistributeAxis::Vertical,
        }
    }
}

impl fmt::Display for AlignAction
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        f.write_str(self.as_str(),)
    }
}

impl FromStr for AlignAction
{
    type Err = Error;

    fn from_str(value: &str,) -> Result<Self, Self::Err,>
    {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str().eq_ignore_ascii_case(value.trim(),),)
            .ok_or_else(|| Error::validation(format!("unknown align action '{value}'"),),)
    }
}

/// Axis along which [`distribute_selected_blocks`] spaces blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,)]
#[serde(rename_all = "lowercase")]
pub enum DistributeAxis
{
    /// Equalize horizontal gaps.
    Horizontal,
    /// Equalize vertical gaps.
    Vertical,
}

impl DistributeAxis
{
    /// Stable identifier used on the command line.
    pub const fn as_str(self,) -> &'static str
    {
        match self {
            DistributeAxis::Horizontal => "horizontal",
            DistributeAxis::Vertical => "vertical",
        }
    }

    fn start(self, rect: &Rect,) -> f64
    {
        match self {
            DistributeAxis::Horizontal => rect.x,
            DistributeAxis::Vertical => rect.y,
        }
    }

    fn size(self, rect: &Rect,) -> f64
    {
        match self {
            DistributeAxis::Horizontal => rect.w,
            DistributeAxis::Vertical => rect.h,
        }
    }

    fn limit(self,) -> f64
    {
        match self {
            DistributeAxis::Horizontal => CANVAS_WIDTH,
            DistributeAxis::Vertical => CANVAS_HEIGHT,
        }
    }

    fn store(self, rect: &mut Rect, position: f64,)
    {
        match self {
            DistributeAxis::Horizontal => rect.x = position,
            DistributeAxis::Vertical => rect.y = position,
        }
    }
}

impl fmt::Display for DistributeAxis
{
    fn fmt(&self, f: &mut fmt::Formatter<'_,>,) -> fmt::Result
    {
        f.write_str(self.as_str(),)
    }
}

impl FromStr for DistributeAxis
{
    type Err = Error;

    fn from_str(value: &str,) -> Result<Self, Self::Err,>
    {
        match value.trim().to_ascii_lowercase().as_str() {
            "horizontal" | "x" => Ok(DistributeAxis::Horizontal,),
            "vertical" | "y" => Ok(DistributeAxis::Vertical,),
            _ => Err(Error::validation(format!("unknown distribute axis '{value}'"),),),
        }
    }
}

const AVATAR_SIZE_RANGE: (f64, f64,) = (40.0, 320.0,);
const STATS_ITEM_HEIGHT_RANGE: (f64, f64,) = (40.0, 140.0,);
const STATS_ITEM_WIDTH_RANGE: (f64, f64,) = (80.0, 320.0,);
const BADGE_HEIGHT_RANGE: (f64, f64,) = (24.0, 100.0,);
const BADGE_FONT_RANGE: (f64, f64,) = (10.0, 48.0,);
const BADGE_GAP_RANGE: (f64, f64,) = (0.0, 120.0,);
/// Badge label size as a share of badge height.
const BADGE_FONT_RATIO: f64 = 0.42;

fn round_rect(rect: Rect,) -> Rect
{
    Rect::new(rect.x.round(), rect.y.round(), rect.w.round(), rect.h.round(),)
}

/// Applies a requested rectangle to `block` and returns the updated
/// configuration.
///
/// Non-finite components fall back to the block's current footprint. The
/// request is rounded to whole pixels and clamped to the canvas and to the
/// block's minimum size before the block-specific rules run:
///
/// * avatar: the larger side becomes `avatar.size` (square only);
/// * title and description: stored as is;
/// * stats: item width and height are solved from the box;
/// * badges: height and font size come from the box height, the gap is
///   solved from the box width.
///
/// Stats and badges store the width their solved style produces, which may
/// differ slightly from the request.
///
/// # Examples
///
/// ```
/// use cardify::{BlockId, CardConfig, Rect, RepoData, apply_rect_to_config};
///
/// let repo = RepoData::default();
/// let config = CardConfig::default();
/// let next = apply_rect_to_config(&config, &repo, BlockId::Title, Rect::new(10.0, 20.0, 400.0, 90.0,),);
/// assert_eq!(next.layout[BlockId::Title], Rect::new(10.0, 20.0, 400.0, 90.0));
/// ```
pub fn apply_rect_to_config(config: &CardConfig, repo: &RepoData, block: BlockId, requested: Rect,) -> CardConfig
{
    let current = reconcile(config, repo, block,);
    let rect = clamp_rect_to_canvas(round_rect(requested.or_finite(current,),), block.minimum_size(),);
    let mut next = config.clone();

    match block {
        BlockId::Avatar => {
            let size = clamp(rect.w.max(rect.h,), AVATAR_SIZE_RANGE.0, AVATAR_SIZE_RANGE.1,);
            next.avatar.size = size;
            next.layout.avatar = Rect::new(
                clamp(rect.x, 0.0, CANVAS_WIDTH - size,),
                clamp(rect.y, 0.0, CANVAS_HEIGHT - size,),
                size,
                size,
            );
        }
        BlockId::Title | BlockId::Description => {
            next.layout[block] = rect;
        }
        BlockId::Stats => {
            let count = visible_stats(config, repo,).len().max(1,) as f64;
            let gap = config.stats.gap;
            let item_height = clamp(rect.h, STATS_ITEM_HEIGHT_RANGE.0, STATS_ITEM_HEIGHT_RANGE.1,);
            let raw_item_width = (rect.w - gap * (count - 1.0)) / count;
            let item_width =
                clamp(raw_item_width.round(), STATS_ITEM_WIDTH_RANGE.0, STATS_ITEM_WIDTH_RANGE.1,);
            let actual_width = count * item_width + (count - 1.0) * gap;

            next.stats.item_width = item_width;
            next.stats.item_height = item_height;
            next.layout.stats = Rect::new(
                clamp(rect.x, 0.0, CANVAS_WIDTH - actual_width.max(STATS_MIN_FOOTPRINT.width,),),
                clamp(rect.y, 0.0, CANVAS_HEIGHT - item_height,),
                actual_width,
                item_height,
            );
        }
        BlockId::Badges => {
            let height = clamp(rect.h, BADGE_HEIGHT_RANGE.0, BADGE_HEIGHT_RANGE.1,);
            let font_size =
                clamp((height * BADGE_FONT_RATIO).round(), BADGE_FONT_RANGE.0, BADGE_FONT_RANGE.1,);
            next.badge.height = height;
            next.badge.font_size = font_size;

            let languages = visible_badge_languages(config, repo,);
            let y = clamp(rect.y, 0.0, CANVAS_HEIGHT - height.max(BADGES_MIN_FOOTPRINT.height,),);
            if languages.is_empty() {
                next.layout.badges = Rect::new(rect.x, y, rect.w, height,);
            } else {
                let count = languages.len();
                let font_size = fitting_badge_font(&languages, &config.badge, font_size,);
                next.badge.font_size = font_size;
                let baseline = badge_baseline(&languages, &config.badge, font_size,);
                let gap = if count > 1 {
                    let raw = (rect.w - baseline) / (count - 1) as f64;
                    let room = ((CANVAS_WIDTH - baseline) / (count - 1) as f64).floor();
                    clamp(raw.round(), BADGE_GAP_RANGE.0, BADGE_GAP_RANGE.1.min(room,).max(BADGE_GAP_RANGE.0,),)
                } else {
                    config.badge.gap
                };
                next.badge.gap = gap;

                let widths: f64 =
                    languages.iter().map(|language| badge_width(language, &next.badge,),).sum();
                let final_width = widths + gap * (count - 1) as f64;
                let max_x = (CANVAS_WIDTH - final_width.max(BADGES_MIN_FOOTPRINT.width,)).max(0.0,);
                next.layout.badges = Rect::new(clamp(rect.x, 0.0, max_x,), y, final_width, height,);
            }
        }
    }

    debug!(
        "Applied {:?} to {} as {:?}",
        requested, block, next.layout[block]
    );
    next
}

/// Summed badge widths of a row without gaps at `font_size`.
fn badge_baseline(languages: &[&str], badge: &BadgeConfig, font_size: f64,) -> f64
{
    let extra = badge_extra_per_item(badge.style, font_size, badge.padding_x,);
    languages.iter().map(|language| estimate_text_width(language, font_size,) + extra,).sum()
}

/// Largest font size up to `preferred` whose gapless row fits the canvas.
///
/// Stops at the smallest badge font when nothing fits.
fn fitting_badge_font(languages: &[&str], badge: &BadgeConfig, preferred: f64,) -> f64
{
    let mut font_size = preferred;
    while font_size > BADGE_FONT_RANGE.0 && badge_baseline(languages, badge, font_size,) > CANVAS_WIDTH {
        font_size = (font_size - 1.0).max(BADGE_FONT_RANGE.0,);
    }
    font_size
}

fn unique_blocks(selected: &[BlockId],) -> Vec<BlockId,>
{
    let mut unique = Vec::with_capacity(selected.len(),);
    for block in selected {
        if !unique.contains(block,) {
            unique.push(*block,);
        }
    }
    unique
}

/// Aligns every selected block to a shared edge or center.
///
/// Fewer than two distinct blocks is a no-op. Left/top use the minimum
/// leading edge, right/bottom the maximum trailing edge and center/middle
/// the mean center of the selection. Only one coordinate of each selected
/// block changes, and each block is kept on the canvas given its own size.
/// Positions are stored exactly so aligning twice changes nothing.
pub fn align_selected_blocks(
    config: &CardConfig,
    selected: &[BlockId],
    rects: &BlockMap<Rect,>,
    action: AlignAction,
) -> CardConfig
{
    let blocks = unique_blocks(selected,);
    if blocks.len() < 2 {
        return config.clone();
    }

    let axis = action.axis();
    let selected_rects = blocks.iter().map(|block| rects[*block],);
    let target = match action {
        AlignAction::Left | AlignAction::Top => {
            selected_rects.map(|rect| axis.start(&rect,),).fold(f64::INFINITY, f64::min,)
        }
        AlignAction::Right | AlignAction::Bottom => selected_rects
            .map(|rect| axis.start(&rect,) + axis.size(&rect,),)
            .fold(f64::NEG_INFINITY, f64::max,),
        AlignAction::Center | AlignAction::Middle => {
            selected_rects.map(|rect| axis.start(&rect,) + axis.size(&rect,) / 2.0,).sum::<f64>()
                / blocks.len() as f64
        }
    };

    let mut next = config.clone();
    for block in &blocks {
        let rect = rects[*block];
        let size = axis.size(&rect,);
        let leading = match action {
            AlignAction::Left | AlignAction::Top => target,
            AlignAction::Right | AlignAction::Bottom => target - size,
            AlignAction::Center | AlignAction::Middle => target - size / 2.0,
        };
        axis.store(&mut next.layout[*block], clamp(leading, 0.0, axis.limit() - size,),);
    }

    debug!("Aligned {} blocks {} to {}", blocks.len(), action, target);
    next
}

/// Spaces the selected blocks so consecutive gaps along `axis` are equal.
///
/// Fewer than three distinct blocks is a no-op. The blocks are ordered by
/// their leading edge; the first and last stay put and the middle ones are
/// placed one after another with the uniform gap.
pub fn distribute_selected_blocks(
    config: &CardConfig,
    selected: &[BlockId],
    rects: &BlockMap<Rect,>,
    axis: DistributeAxis,
) -> CardConfig
{
    let mut blocks = unique_blocks(selected,);
    if blocks.len() < 3 {
        return config.clone();
    }
    blocks.sort_by(|left, right| axis.start(&rects[*left],).total_cmp(&axis.start(&rects[*right],),),);

    let first = rects[blocks[0]];
    let last = rects[blocks[blocks.len() - 1]];
    let middle = &blocks[1..blocks.len() - 1];

    let first_end = axis.start(&first,) + axis.size(&first,);
    let middle_total: f64 = middle.iter().map(|block| axis.size(&rects[*block],),).sum();
    let gap = (axis.start(&last,) - first_end - middle_total) / (blocks.len() - 1) as f64;

    let mut next = config.clone();
    let mut cursor = first_end + gap;
    for block in middle {
        let size = axis.size(&rects[*block],);
        let position = clamp(cursor, 0.0, axis.limit() - size,);
        axis.store(&mut next.layout[*block], position,);
        cursor = position + size + gap;
    }

    debug!("Distributed {} blocks {} with gap {}", blocks.len(), axis, gap);
    next
}
