// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Derived card geometry.
//!
//! Every function here is pure and total. The results are treated as ground
//! truth by the transform engine, the interaction controller and the
//! renderer, so a block is always drawn exactly where its handles are.
//! Non-finite style values are the caller's responsibility; presets are
//! sanitized before they reach this module.

use serde::Serialize;

use crate::{
    config::{BadgeConfig, BadgeStyle, CardConfig},
    geometry::{BlockId, BlockMap, GeometrySource, MinimumSize, Rect},
    repository::{MAX_LANGUAGES, RepoData},
};

/// Smallest interactive footprint of the stats row.
pub const STATS_MIN_FOOTPRINT: MinimumSize = MinimumSize {
    width:  120.0,
    height: 40.0,
};

/// Smallest interactive footprint of the badge row.
pub const BADGES_MIN_FOOTPRINT: MinimumSize = MinimumSize {
    width:  120.0,
    height: 32.0,
};

/// Approximates the rendered width of `text` without glyph metrics.
///
/// The estimate is `max(font_size × 1.5, chars × font_size × 0.56)`, which
/// is monotonic in both string length and font size.
///
/// # Examples
///
/// ```
/// use cardify::estimate_text_width;
///
/// assert!((estimate_text_width("Rust", 10.0,) - 22.4).abs() < 1e-9);
/// assert_eq!(estimate_text_width("C", 10.0,), 15.0);
/// ```
pub fn estimate_text_width(text: &str, font_size: f64,) -> f64
{
    let chars = text.chars().count() as f64;
    (font_size * 1.5).max(chars * font_size * 0.56,)
}

/// Diameter of the leading dot drawn by the minimal badge style.
pub fn badge_dot_diameter(font_size: f64,) -> f64
{
    (font_size * 0.65).max(10.0,)
}

/// Width a badge adds on top of its label width.
pub fn badge_extra_per_item(style: BadgeStyle, font_size: f64, padding_x: f64,) -> f64
{
    match style {
        BadgeStyle::Minimal => padding_x + badge_dot_diameter(font_size,),
        BadgeStyle::Pill | BadgeStyle::Outline => padding_x * 2.0,
    }
}

/// Width of one language badge.
pub fn badge_width(text: &str, badge: &BadgeConfig,) -> f64
{
    estimate_text_width(text, badge.font_size,)
        + badge_extra_per_item(badge.style, badge.font_size, badge.padding_x,)
}

/// Left offset of every badge laid out left to right with `badge.gap`
/// between neighbours.
pub fn badge_offsets<S,>(languages: &[S], badge: &BadgeConfig,) -> Vec<f64,>
where
    S: AsRef<str,>,
{
    let mut offsets = Vec::with_capacity(languages.len(),);
    let mut running = 0.0;
    for language in languages {
        offsets.push(running,);
        running += badge_width(language.as_ref(), badge,) + badge.gap;
    }
    offsets
}

/// Total width of a badge row, zero when there are no languages.
pub fn badge_row_width<S,>(languages: &[S], badge: &BadgeConfig,) -> f64
where
    S: AsRef<str,>,
{
    let Some(last,) = languages.last() else {
        return 0.0;
    };
    let offsets = badge_offsets(languages, badge,);
    offsets[offsets.len() - 1] + badge_width(last.as_ref(), badge,)
}

/// Identity of a repository counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize,)]
#[serde(rename_all = "lowercase")]
pub enum StatKey
{
    /// Stargazers.
    Stars,
    /// Forks.
    Forks,
    /// Open issues.
    Issues,
}

/// One visible counter of the stats row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize,)]
pub struct StatItem
{
    /// Counter identity.
    pub key:   StatKey,
    /// Counter value.
    pub value: u64,
}

/// Counters enabled in the configuration, always ordered stars, forks,
/// issues.
pub fn visible_stats(config: &CardConfig, repo: &RepoData,) -> Vec<StatItem,>
{
    [
        (config.stats.show_stars, StatKey::Stars, repo.stars,),
        (config.stats.show_forks, StatKey::Forks, repo.forks,),
        (config.stats.show_issues, StatKey::Issues, repo.issues,),
    ]
    .into_iter()
    .filter(|(enabled, _, _,)| *enabled,)
    .map(|(_, key, value,)| StatItem {
        key,
        value,
    },)
    .collect()
}

/// Repository languages without the hidden ones, in provider order and
/// capped to [`MAX_LANGUAGES`].
pub fn visible_badge_languages<'a,>(config: &CardConfig, repo: &'a RepoData,) -> Vec<&'a str,>
{
    repo.languages
        .iter()
        .filter(|language| !config.badge.hidden_languages.iter().any(|hidden| hidden == *language,),)
        .take(MAX_LANGUAGES,)
        .map(String::as_str,)
        .collect()
}

/// Width of the stats row for `count` items, or `None` when nothing is
/// visible.
pub fn stats_row_width(config: &CardConfig, count: usize,) -> Option<f64,>
{
    if count == 0 {
        return None;
    }
    let count = count as f64;
    Some(count * config.stats.item_width + (count - 1.0) * config.stats.gap,)
}

/// True on-canvas footprint of every block.
///
/// Title and description are returned as stored. Avatar, stats and badges
/// derive their size from style fields and content so the stored size is
/// only used as a fallback when there is no content to measure.
pub fn interactive_rects(config: &CardConfig, repo: &RepoData,) -> BlockMap<Rect,>
{
    BlockMap::from_fn(|block| reconcile(config, repo, block,),)
}

/// Resolves the footprint of a single block.
///
/// This is the one place where stored and derived geometry are reconciled;
/// every geometry decision goes through it.
pub fn reconcile(config: &CardConfig, repo: &RepoData, block: BlockId,) -> Rect
{
    let stored = config.layout[block];
    if block.geometry_source() == GeometrySource::Stored {
        return stored;
    }

    match block {
        BlockId::Avatar => Rect::new(stored.x, stored.y, config.avatar.size, config.avatar.size,),
        BlockId::Stats => {
            let count = visible_stats(config, repo,).len();
            let width = stats_row_width(config, count,).unwrap_or(stored.w,);
            Rect::new(
                stored.x,
                stored.y,
                width.max(STATS_MIN_FOOTPRINT.width,),
                config.stats.item_height.max(STATS_MIN_FOOTPRINT.height,),
            )
        }
        BlockId::Badges => {
            let languages = visible_badge_languages(config, repo,);
            let width = if config.badge.visible && !languages.is_empty() {
                badge_row_width(&languages, &config.badge,)
            } else {
                stored.w
            };
            Rect::new(
                stored.x,
                stored.y,
                width.max(BADGES_MIN_FOOTPRINT.width,),
                config.badge.height.max(BADGES_MIN_FOOTPRINT.height,),
            )
        }
        BlockId::Title | BlockId::Description => stored,
    }
}

#[cfg(test)]
mod tests
{
    use proptest::prelude::*;

    use super::{
        StatKey, badge_offsets, badge_row_width, badge_width, estimate_text_width, interactive_rects,
        visible_badge_languages, visible_stats,
    };
    use crate::{
        config::{BadgeConfig, BadgeStyle, CardConfig},
        geometry::{BlockId, Rect},
        repository::RepoData,
    };

    fn sample_repo() -> RepoData
    {
        RepoData {
            owner: "octocat".to_owned(),
            name: "hello-world".to_owned(),
            stars: 1500,
            forks: 320,
            issues: 12,
            languages: vec!["Rust".to_owned(), "TypeScript".to_owned(), "Shell".to_owned()],
            ..RepoData::default()
        }
    }

    proptest! {
        #[test]
        fn badge_width_grows_with_label(len in 0usize..40, font in 10.0f64..48.0, padding in 4.0f64..48.0) {
            for style in [BadgeStyle::Minimal, BadgeStyle::Pill, BadgeStyle::Outline] {
                let badge = BadgeConfig { style, font_size: font, padding_x: padding, ..BadgeConfig::default() };
                let shorter = badge_width(&"a".repeat(len), &badge);
                let longer = badge_width(&"a".repeat(len + 1), &badge);
                prop_assert!(shorter <= longer);
                prop_assert!(shorter >= padding);
            }
        }

        #[test]
        fn text_width_is_monotonic_in_font_size(len in 0usize..40, font in 1.0f64..100.0) {
            let text = "x".repeat(len);
            prop_assert!(estimate_text_width(&text, font) <= estimate_text_width(&text, font + 1.0));
        }
    }

    #[test]
    fn badge_width_is_monotonic_for_short_labels()
    {
        let badge = BadgeConfig::default();
        let one = badge_width("a", &badge,);
        let two = badge_width("aa", &badge,);
        let three = badge_width("aaa", &badge,);
        assert!(one <= two && two <= three);
    }

    #[test]
    fn box_badges_use_padding_on_both_sides()
    {
        let badge = BadgeConfig {
            style: BadgeStyle::Pill,
            font_size: 20.0,
            padding_x: 10.0,
            ..BadgeConfig::default()
        };
        let text = estimate_text_width("TypeScript", 20.0,);
        assert_eq!(badge_width("TypeScript", &badge), text + 20.0);
    }

    #[test]
    fn minimal_badges_add_a_dot()
    {
        let badge = BadgeConfig {
            style: BadgeStyle::Minimal,
            font_size: 10.0,
            padding_x: 10.0,
            ..BadgeConfig::default()
        };
        assert_eq!(badge_width("Go", &badge), 15.0 + 10.0 + 10.0);
    }

    #[test]
    fn offsets_accumulate_width_and_gap()
    {
        let badge = BadgeConfig::default();
        let languages = ["Rust", "Go", "C"];
        let offsets = badge_offsets(&languages, &badge,);
        assert_eq!(offsets[0], 0.0);
        assert_eq!(offsets[1], badge_width("Rust", &badge) + badge.gap);
        assert_eq!(offsets[2], offsets[1] + (badge_width("Go", &badge) + badge.gap));
        assert_eq!(badge_row_width(&languages, &badge), offsets[2] + badge_width("C", &badge));
        assert_eq!(badge_row_width::<&str,>(&[], &badge), 0.0);
    }

    #[test]
    fn visible_stats_keep_canonical_order()
    {
        let repo = sample_repo();
        let mut config = CardConfig::default();
        config.stats.show_forks = false;

        let keys: Vec<_,> = visible_stats(&config, &repo,).into_iter().map(|item| item.key,).collect();
        assert_eq!(keys, vec![StatKey::Stars, StatKey::Issues]);
    }

    #[test]
    fn hidden_languages_are_skipped_and_list_is_capped()
    {
        let mut repo = sample_repo();
        repo.languages.push("Nix".to_owned(),);
        let mut config = CardConfig::default();
        config.badge.hidden_languages = vec!["TypeScript".to_owned()];

        assert_eq!(visible_badge_languages(&config, &repo), vec!["Rust", "Shell", "Nix"]);

        config.badge.hidden_languages.clear();
        assert_eq!(visible_badge_languages(&config, &repo), vec!["Rust", "TypeScript", "Shell"]);
    }

    #[test]
    fn interactive_rects_derive_style_driven_blocks()
    {
        let repo = sample_repo();
        let mut config = CardConfig::default();
        config.avatar.size = 150.0;

        let rects = interactive_rects(&config, &repo,);
        assert_eq!(rects[BlockId::Title], config.layout[BlockId::Title]);
        assert_eq!(rects[BlockId::Avatar], Rect::new(100.0, 100.0, 150.0, 150.0));
        assert_eq!(rects[BlockId::Stats].w, 3.0 * 150.0 + 2.0 * 20.0);
        assert_eq!(rects[BlockId::Stats].h, 85.0);

        let languages = visible_badge_languages(&config, &repo,);
        assert_eq!(rects[BlockId::Badges].w, badge_row_width(&languages, &config.badge));
        assert_eq!(rects[BlockId::Badges].h, 72.0);
    }

    #[test]
    fn interactive_rects_fall_back_to_stored_width_without_content()
    {
        let repo = RepoData::default();
        let mut config = CardConfig::default();
        config.stats.show_stars = false;
        config.stats.show_forks = false;
        config.stats.show_issues = false;
        config.layout.stats.w = 80.0;
        config.badge.height = 20.0;

        let rects = interactive_rects(&config, &repo,);
        assert_eq!(rects[BlockId::Stats].w, 120.0);
        assert_eq!(rects[BlockId::Badges].w, config.layout.badges.w);
        assert_eq!(rects[BlockId::Badges].h, 32.0);
    }
}
