// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! SVG rendering of a card.
//!
//! Block geometry always comes from [`interactive_rects`] so the rendered
//! document lines up with the editor's handles.

use std::{borrow::Cow, fmt::Write as _};

use crate::{
    config::{AvatarShape, BadgeStyle, CardConfig, PatternId, StatsStyle, StatsValueFormat, ThemeId, TitleDisplayMode},
    geometry::{CANVAS_HEIGHT, CANVAS_WIDTH, Rect},
    metrics::{
        StatKey, badge_dot_diameter, badge_offsets, badge_width, estimate_text_width, interactive_rects,
        visible_badge_languages, visible_stats,
    },
    repository::RepoData,
};

/// Localized strings drawn on the card.
#[derive(Debug, Clone, PartialEq, Eq,)]
pub struct Labels
{
    /// Star counter label.
    pub stars:          String,
    /// Fork counter label.
    pub forks:          String,
    /// Issue counter label.
    pub issues:         String,
    /// Description used when the repository has none.
    pub no_description: String,
}

impl Default for Labels
{
    fn default() -> Self
    {
        Self {
            stars:          "Stars".to_owned(),
            forks:          "Forks".to_owned(),
            issues:         "Issues".to_owned(),
            no_description: "No description provided.".to_owned(),
        }
    }
}

impl Labels
{
    fn stat(&self, key: StatKey,) -> &str
    {
        match key {
            StatKey::Stars => &self.stars,
            StatKey::Forks => &self.forks,
            StatKey::Issues => &self.issues,
        }
    }
}

/// Formats a counter value.
///
/// # Examples
///
/// ```
/// use cardify::{config::StatsValueFormat, render::format_stat};
///
/// assert_eq!(format_stat(1234567, StatsValueFormat::Full,), "1,234,567");
/// assert_eq!(format_stat(1234, StatsValueFormat::Compact,), "1.2k");
/// assert_eq!(format_stat(2_000_000, StatsValueFormat::Compact,), "2M");
/// ```
pub fn format_stat(value: u64, format: StatsValueFormat,) -> String
{
    match format {
        StatsValueFormat::Full => {
            let digits = value.to_string();
            let mut grouped = String::with_capacity(digits.len() + digits.len() / 3,);
            for (index, digit,) in digits.chars().enumerate() {
                if index > 0 && (digits.len() - index) % 3 == 0 {
                    grouped.push(',',);
                }
                grouped.push(digit,);
            }
            grouped
        }
        StatsValueFormat::Compact => {
            if value < 1_000 {
                return value.to_string();
            }
            let (tenths, suffix,) = if value < 999_950 {
                (value.saturating_add(50,) / 100, "k",)
            } else {
                (value.saturating_add(50_000,) / 100_000, "M",)
            };
            match tenths % 10 {
                0 => format!("{}{suffix}", tenths / 10),
                fraction => format!("{}.{fraction}{suffix}", tenths / 10),
            }
        }
    }
}

/// Greedily wraps `text` into lines no wider than `max_width` at
/// `font_size`.
///
/// Words longer than a line get a line of their own.
pub fn wrap_text(text: &str, max_width: f64, font_size: f64,) -> Vec<String,>
{
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word,);
            continue;
        }
        let candidate = format!("{current} {word}");
        if estimate_text_width(&candidate, font_size,) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_owned(),),);
        }
    }
    if !current.is_empty() {
        lines.push(current,);
    }
    lines
}

/// Escapes XML special characters, borrowing when nothing needs escaping.
pub fn escape_xml(value: &str,) -> Cow<'_, str,>
{
    if !value.chars().any(|character| matches!(character, '&' | '<' | '>' | '"' | '\''),) {
        return Cow::Borrowed(value,);
    }

    let mut escaped = String::with_capacity(value.len() + 8,);
    for character in value.chars() {
        match character {
            '&' => escaped.push_str("&amp;",),
            '<' => escaped.push_str("&lt;",),
            '>' => escaped.push_str("&gt;",),
            '"' => escaped.push_str("&quot;",),
            '\'' => escaped.push_str("&apos;",),
            other => escaped.push(other,),
        }
    }
    Cow::Owned(escaped,)
}

struct Palette<'a,>
{
    background: &'a str,
    text:       &'a str,
}

fn palette(config: &CardConfig,) -> Palette<'_,>
{
    match config.theme {
        ThemeId::Gradient | ThemeId::Solid => Palette {
            background: &config.colors.background,
            text:       &config.colors.accent,
        },
        ThemeId::Simple => Palette {
            background: "#ffffff",
            text:       "#18181b",
        },
        ThemeId::Dark => Palette {
            background: "#09090b",
            text:       "#fafafa",
        },
    }
}

/// Renders the card as a standalone 1200×630 SVG document.
pub fn render_svg(repo: &RepoData, config: &CardConfig, labels: &Labels,) -> String
{
    let rects = interactive_rects(config, repo,);
    let colors = palette(config,);
    let font = escape_xml(config.font.family(),);
    let mut svg = String::with_capacity(4096,);

    let _ = writeln!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{CANVAS_WIDTH}\" height=\"{CANVAS_HEIGHT}\" viewBox=\"0 0 {CANVAS_WIDTH} {CANVAS_HEIGHT}\" font-family=\"{font}\">",
    );
    write_background(&mut svg, config, &colors,);
    write_avatar(&mut svg, repo, config, rects.avatar,);
    write_title(&mut svg, repo, config, rects.title, colors.text,);
    write_description(&mut svg, repo, config, labels, rects.description, colors.text,);
    write_stats(&mut svg, repo, config, labels, rects.stats, &colors,);
    write_badges(&mut svg, repo, config, rects.badges, &colors,);
    svg.push_str("</svg>\n",);
    svg
}

fn write_background(svg: &mut String, config: &CardConfig, colors: &Palette<'_,>,)
{
    let background = escape_xml(colors.background,);
    if config.theme == ThemeId::Gradient {
        let accent = escape_xml(&config.colors.accent,);
        let _ = writeln!(
            svg,
            "  <defs>\n    <linearGradient id=\"card-bg\" x1=\"0\" y1=\"0\" x2=\"1\" y2=\"1\">\n      <stop offset=\"0%\" stop-color=\"{background}\"/>\n      <stop offset=\"100%\" stop-color=\"{accent}\" stop-opacity=\"0.35\"/>\n    </linearGradient>\n  </defs>\n  <rect width=\"{CANVAS_WIDTH}\" height=\"{CANVAS_HEIGHT}\" fill=\"{background}\"/>\n  <rect width=\"{CANVAS_WIDTH}\" height=\"{CANVAS_HEIGHT}\" fill=\"url(#card-bg)\"/>",
        );
    } else {
        let _ = writeln!(svg, "  <rect width=\"{CANVAS_WIDTH}\" height=\"{CANVAS_HEIGHT}\" fill=\"{background}\"/>",);
    }

    if config.pattern.id != PatternId::None {
        let tile = 24.0 * config.pattern.scale;
        let text = escape_xml(colors.text,);
        let _ = writeln!(
            svg,
            "  <defs>\n    <pattern id=\"card-pattern\" width=\"{tile}\" height=\"{tile}\" patternUnits=\"userSpaceOnUse\" patternTransform=\"translate({} {})\">\n      <circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{text}\"/>\n    </pattern>\n  </defs>\n  <rect width=\"{CANVAS_WIDTH}\" height=\"{CANVAS_HEIGHT}\" fill=\"url(#card-pattern)\" opacity=\"{}\"/>",
            config.pattern.offset_x,
            config.pattern.offset_y,
            tile / 2.0,
            tile / 2.0,
            tile / 8.0,
            config.pattern.opacity,
        );
    }
}

fn write_avatar(svg: &mut String, repo: &RepoData, config: &CardConfig, rect: Rect,)
{
    if !config.avatar.visible || config.avatar.shape == AvatarShape::None {
        return;
    }
    let href = config.custom_logo.as_deref().unwrap_or(&repo.avatar_url,);
    if href.is_empty() {
        return;
    }

    let clip = match config.avatar.shape {
        AvatarShape::Circle => {
            format!("<circle cx=\"{}\" cy=\"{}\" r=\"{}\"/>", rect.center_x(), rect.center_y(), rect.w / 2.0)
        }
        _ => format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{}\"/>",
            rect.x, rect.y, rect.w, rect.h, config.avatar.radius
        ),
    };
    let _ = writeln!(
        svg,
        "  <clipPath id=\"avatar-clip\">{clip}</clipPath>\n  <image href=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" clip-path=\"url(#avatar-clip)\" preserveAspectRatio=\"xMidYMid slice\"/>",
        escape_xml(href,),
        rect.x,
        rect.y,
        rect.w,
        rect.h,
    );
}

fn write_title(svg: &mut String, repo: &RepoData, config: &CardConfig, rect: Rect, color: &str,)
{
    let text = &config.text;
    let name = if text.custom_title.trim().is_empty() { repo.name.as_str() } else { text.custom_title.as_str() };
    let color = escape_xml(color,);

    match (text.show_owner, text.title_display,) {
        (true, TitleDisplayMode::Split,) => {
            let owner_y = rect.y + text.owner_size;
            let _ = writeln!(
                svg,
                "  <text x=\"{}\" y=\"{owner_y}\" font-size=\"{}\" fill=\"{color}\" opacity=\"0.8\">{}</text>",
                rect.x,
                text.owner_size,
                escape_xml(&repo.owner,),
            );
            let _ = writeln!(
                svg,
                "  <text x=\"{}\" y=\"{}\" font-size=\"{}\" font-weight=\"700\" fill=\"{color}\">{}</text>",
                rect.x,
                owner_y + text.title_size * 1.1,
                text.title_size,
                escape_xml(name,),
            );
        }
        (show_owner, _,) => {
            let label = if show_owner { format!("{}/{name}", repo.owner) } else { name.to_owned() };
            let _ = writeln!(
                svg,
                "  <text x=\"{}\" y=\"{}\" font-size=\"{}\" font-weight=\"700\" fill=\"{color}\">{}</text>",
                rect.x,
                rect.y + text.title_size,
                text.title_size,
                escape_xml(&label,),
            );
        }
    }
}

fn write_description(
    svg: &mut String,
    repo: &RepoData,
    config: &CardConfig,
    labels: &Labels,
    rect: Rect,
    color: &str,
)
{
    let size = config.text.description_size;
    let text = if config.text.custom_description.trim().is_empty() {
        repo.description_or(&labels.no_description,)
    } else {
        config.text.custom_description.as_str()
    };
    let line_height = size * 1.3;
    let max_lines = ((rect.h / line_height).floor() as usize).max(1,);

    let _ = write!(svg, "  <text x=\"{}\" y=\"{}\" font-size=\"{size}\" fill=\"{}\">", rect.x, rect.y, escape_xml(color,),);
    for (index, line,) in wrap_text(text, rect.w, size,).iter().take(max_lines,).enumerate() {
        let _ = write!(
            svg,
            "<tspan x=\"{}\" dy=\"{}\">{}</tspan>",
            rect.x,
            if index == 0 { size } else { line_height },
            escape_xml(line,),
        );
    }
    svg.push_str("</text>\n",);
}

fn write_stats(
    svg: &mut String,
    repo: &RepoData,
    config: &CardConfig,
    labels: &Labels,
    rect: Rect,
    colors: &Palette<'_,>,
)
{
    let stats = &config.stats;
    let text = escape_xml(colors.text,);

    for (index, item,) in visible_stats(config, repo,).into_iter().enumerate() {
        let x = rect.x + index as f64 * (stats.item_width + stats.gap);
        let value = format_stat(item.value, stats.value_format,);
        let label = escape_xml(labels.stat(item.key,),);
        let _ = writeln!(
            svg,
            "  <rect x=\"{x}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"12\" fill=\"{text}\" fill-opacity=\"0.08\"/>",
            rect.y, stats.item_width, stats.item_height,
        );

        match stats.style {
            StatsStyle::Card => {
                let center = x + stats.item_width / 2.0;
                let _ = writeln!(
                    svg,
                    "  <text x=\"{center}\" y=\"{}\" text-anchor=\"middle\" font-size=\"{}\" font-weight=\"700\" fill=\"{text}\">{value}</text>\n  <text x=\"{center}\" y=\"{}\" text-anchor=\"middle\" font-size=\"{}\" fill=\"{text}\" opacity=\"0.7\">{label}</text>",
                    rect.y + stats.item_height * 0.45,
                    stats.value_size,
                    rect.y + stats.item_height * 0.8,
                    stats.label_size,
                );
            }
            StatsStyle::Split => {
                let divider = x + stats.item_width * stats.split_ratio;
                let baseline = rect.y + stats.item_height / 2.0 + stats.value_size / 3.0;
                let _ = writeln!(
                    svg,
                    "  <text x=\"{}\" y=\"{baseline}\" font-size=\"{}\" fill=\"{text}\" opacity=\"0.7\">{label}</text>\n  <text x=\"{}\" y=\"{baseline}\" font-size=\"{}\" font-weight=\"700\" fill=\"{text}\">{value}</text>",
                    x + 12.0,
                    stats.label_size,
                    divider + 8.0,
                    stats.value_size,
                );
            }
        }
    }
}

fn write_badges(svg: &mut String, repo: &RepoData, config: &CardConfig, rect: Rect, colors: &Palette<'_,>,)
{
    let badge = &config.badge;
    if !badge.visible {
        return;
    }

    let languages = visible_badge_languages(config, repo,);
    let text = escape_xml(colors.text,);
    let background = escape_xml(colors.background,);
    let baseline = rect.y + badge.height / 2.0 + badge.font_size / 3.0;

    for (language, offset,) in languages.iter().zip(badge_offsets(&languages, badge,),) {
        let x = rect.x + offset;
        let width = badge_width(language, badge,);
        let label = escape_xml(language,);
        match badge.style {
            BadgeStyle::Pill | BadgeStyle::Outline => {
                let (fill, stroke, label_color,) = if badge.style == BadgeStyle::Pill {
                    (text.as_ref(), "none", background.as_ref(),)
                } else {
                    ("none", text.as_ref(), text.as_ref(),)
                };
                let _ = writeln!(
                    svg,
                    "  <rect x=\"{x}\" y=\"{}\" width=\"{width}\" height=\"{}\" rx=\"{}\" fill=\"{fill}\" stroke=\"{stroke}\" stroke-width=\"2\"/>\n  <text x=\"{}\" y=\"{baseline}\" font-size=\"{}\" fill=\"{label_color}\">{label}</text>",
                    rect.y,
                    badge.height,
                    badge.height / 2.0,
                    x + badge.padding_x,
                    badge.font_size,
                );
            }
            BadgeStyle::Minimal => {
                let dot = badge_dot_diameter(badge.font_size,);
                let _ = writeln!(
                    svg,
                    "  <circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{text}\"/>\n  <text x=\"{}\" y=\"{baseline}\" font-size=\"{}\" fill=\"{text}\">{label}</text>",
                    x + dot / 2.0,
                    rect.y + badge.height / 2.0,
                    dot / 2.0,
                    x + dot + badge.padding_x / 2.0,
                    badge.font_size,
                );
            }
        }
    }
}
