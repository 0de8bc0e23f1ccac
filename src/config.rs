// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Configuration model describing every visual property of a card.
//!
//! [`CardConfig`] is the single source of truth consumed by the metrics
//! engine and the renderer. It is replaced wholesale on preset import and
//! patched field by field by layout transforms. The serialized form uses
//! camelCase keys and is the preset file format.

use serde::{Deserialize, Serialize};

use crate::{
    geometry::{BlockMap, Rect},
    repository::RepoData,
};

/// Background theme of the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeId
{
    /// Diagonal gradient derived from the background color.
    #[default]
    Gradient,
    /// Flat background color.
    Solid,
    /// White background with dark text.
    Simple,
    /// Near-black background with light text.
    Dark,
}

/// Font family used for every text element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,)]
#[serde(rename_all = "kebab-case")]
pub enum FontId
{
    /// Inter.
    #[default]
    Inter,
    /// JetBrains Mono.
    Mono,
    /// Merriweather.
    Serif,
    /// Poppins.
    Poppins,
    /// Playfair Display.
    Playfair,
    /// Oswald.
    Oswald,
}

impl FontId
{
    /// CSS font-family stack written into rendered documents.
    pub const fn family(self,) -> &'static str
    {
        match self {
            FontId::Inter => "'Inter', sans-serif",
            FontId::Mono => "'JetBrains Mono', monospace",
            FontId::Serif => "'Merriweather', serif",
            FontId::Poppins => "'Poppins', sans-serif",
            FontId::Playfair => "'Playfair Display', serif",
            FontId::Oswald => "'Oswald', sans-serif",
        }
    }
}

/// Decorative background pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,)]
#[serde(rename_all = "kebab-case")]
pub enum PatternId
{
    /// No pattern.
    #[default]
    None,
    /// Signal.
    Signal,
    /// Charlie Brown zigzag.
    CharlieBrown,
    /// Formal invitation.
    FormalInvitation,
    /// Plus signs.
    Plus,
    /// Circuit board.
    CircuitBoard,
    /// Overlapping hexagons.
    OverlappingHexagons,
    /// Brick wall.
    BrickWall,
    /// Floating cogs.
    FloatingCogs,
    /// Diagonal stripes.
    DiagonalStripes,
}

/// Visual style of language badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,)]
#[serde(rename_all = "kebab-case")]
pub enum BadgeStyle
{
    /// Colored dot followed by the label, no box.
    #[default]
    Minimal,
    /// Filled rounded box.
    Pill,
    /// Outlined rounded box.
    Outline,
}

/// Clip shape of the avatar image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,)]
#[serde(rename_all = "kebab-case")]
pub enum AvatarShape
{
    /// Avatar hidden.
    None,
    /// Circular clip.
    Circle,
    /// Rounded square clip.
    #[default]
    Rounded,
}

/// Number formatting for stat values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,)]
#[serde(rename_all = "kebab-case")]
pub enum StatsValueFormat
{
    /// `1.2k` style.
    Compact,
    /// `1,234` style.
    #[default]
    Full,
}

/// Visual style of the stat items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,)]
#[serde(rename_all = "kebab-case")]
pub enum StatsStyle
{
    /// Translucent card with value above label.
    #[default]
    Card,
    /// Label and value split side by side.
    Split,
}

/// Size knobs applied when switching [`StatsStyle`].
#[derive(Debug, Clone, Copy, PartialEq,)]
pub struct StatsStyleDefaults
{
    /// Width of one stat item.
    pub item_width:  f64,
    /// Height of one stat item.
    pub item_height: f64,
    /// Gap between stat items.
    pub gap:         f64,
    /// Font size of the value.
    pub value_size:  f64,
    /// Font size of the label.
    pub label_size:  f64,
    /// Share of the item occupied by the label in the split style.
    pub split_ratio: f64,
}

impl StatsStyle
{
    /// Returns the size preset associated with the style.
    pub const fn defaults(self,) -> StatsStyleDefaults
    {
        match self {
            StatsStyle::Card => StatsStyleDefaults {
                item_width:  150.0,
                item_height: 85.0,
                gap:         20.0,
                value_size:  28.0,
                label_size:  18.0,
                split_ratio: 0.45,
            },
            StatsStyle::Split => StatsStyleDefaults {
                item_width:  160.0,
                item_height: 70.0,
                gap:         20.0,
                value_size:  20.0,
                label_size:  18.0,
                split_ratio: 0.45,
            },
        }
    }
}

/// How owner and repository name are laid out in the title block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,)]
#[serde(rename_all = "kebab-case")]
pub enum TitleDisplayMode
{
    /// Owner on its own line above the name.
    #[default]
    Split,
    /// `owner/name` on a single line.
    Inline,
}

/// Background and accent colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
#[serde(rename_all = "camelCase")]
pub struct ColorConfig
{
    /// Background color as a CSS color string.
    pub background: String,
    /// Accent color used for text and badges.
    pub accent:     String,
}

impl Default for ColorConfig
{
    fn default() -> Self
    {
        Self {
            background: "#a3a3a3".to_owned(),
            accent:     "#09090b".to_owned(),
        }
    }
}

/// Background pattern parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize,)]
#[serde(rename_all = "camelCase")]
pub struct PatternConfig
{
    /// Pattern kind.
    pub id:       PatternId,
    /// Tile scale factor.
    pub scale:    f64,
    /// Pattern opacity.
    pub opacity:  f64,
    /// Horizontal tile offset.
    pub offset_x: f64,
    /// Vertical tile offset.
    pub offset_y: f64,
}

impl Default for PatternConfig
{
    fn default() -> Self
    {
        Self {
            id:       PatternId::None,
            scale:    1.8,
            opacity:  0.1,
            offset_x: 0.0,
            offset_y: 0.0,
        }
    }
}

/// Language badge row style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize,)]
#[serde(rename_all = "camelCase")]
pub struct BadgeConfig
{
    /// Whether the badge row is drawn.
    pub visible:          bool,
    /// Badge style.
    pub style:            BadgeStyle,
    /// Label font size, derived from `height` when resized.
    pub font_size:        f64,
    /// Badge height.
    pub height:           f64,
    /// Horizontal padding inside a badge.
    pub padding_x:        f64,
    /// Gap between badges.
    pub gap:              f64,
    /// Languages the user chose to hide.
    #[serde(default)]
    pub hidden_languages: Vec<String,>,
}

impl Default for BadgeConfig
{
    fn default() -> Self
    {
        Self {
            visible:          true,
            style:            BadgeStyle::Minimal,
            font_size:        28.0,
            height:           72.0,
            padding_x:        20.0,
            gap:              20.0,
            hidden_languages: Vec::new(),
        }
    }
}

/// Avatar style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize,)]
#[serde(rename_all = "camelCase")]
pub struct AvatarConfig
{
    /// Whether the avatar is drawn.
    pub visible: bool,
    /// Clip shape.
    pub shape:   AvatarShape,
    /// Edge length of the square avatar.
    pub size:    f64,
    /// Corner radius for the rounded shape.
    pub radius:  f64,
}

impl Default for AvatarConfig
{
    fn default() -> Self
    {
        Self {
            visible: true,
            shape:   AvatarShape::Rounded,
            size:    120.0,
            radius:  24.0,
        }
    }
}

/// Stats row style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize,)]
#[serde(rename_all = "camelCase")]
pub struct StatsConfig
{
    /// Show the star counter.
    pub show_stars:   bool,
    /// Show the fork counter.
    pub show_forks:   bool,
    /// Show the open issue counter.
    pub show_issues:  bool,
    /// Value number format.
    pub value_format: StatsValueFormat,
    /// Item style.
    pub style:        StatsStyle,
    /// Width of one item.
    pub item_width:   f64,
    /// Height of one item.
    pub item_height:  f64,
    /// Gap between items.
    pub gap:          f64,
    /// Value font size.
    pub value_size:   f64,
    /// Label font size.
    pub label_size:   f64,
    /// Label share in the split style.
    pub split_ratio:  f64,
}

impl StatsConfig
{
    /// Switches the item style and resets the size knobs to its preset.
    pub fn apply_style(&mut self, style: StatsStyle,)
    {
        let defaults = style.defaults();
        self.style = style;
        self.item_width = defaults.item_width;
        self.item_height = defaults.item_height;
        self.gap = defaults.gap;
        self.value_size = defaults.value_size;
        self.label_size = defaults.label_size;
        self.split_ratio = defaults.split_ratio;
    }
}

impl Default for StatsConfig
{
    fn default() -> Self
    {
        let mut stats = Self {
            show_stars:   true,
            show_forks:   true,
            show_issues:  true,
            value_format: StatsValueFormat::Full,
            style:        StatsStyle::Card,
            item_width:   0.0,
            item_height:  0.0,
            gap:          0.0,
            value_size:   0.0,
            label_size:   0.0,
            split_ratio:  0.0,
        };
        stats.apply_style(StatsStyle::Card,);
        stats
    }
}

/// Text content and sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize,)]
#[serde(rename_all = "camelCase")]
pub struct TextConfig
{
    /// Show the owner next to the repository name.
    pub show_owner:         bool,
    /// Title arrangement.
    pub title_display:      TitleDisplayMode,
    /// Title text, seeded from the repository name.
    pub custom_title:       String,
    /// Description text, seeded from the repository description.
    pub custom_description: String,
    /// Owner font size.
    pub owner_size:         f64,
    /// Title font size.
    pub title_size:         f64,
    /// Description font size.
    pub description_size:   f64,
}

impl Default for TextConfig
{
    fn default() -> Self
    {
        Self {
            show_owner:         true,
            title_display:      TitleDisplayMode::Split,
            custom_title:       String::new(),
            custom_description: String::new(),
            owner_size:         32.0,
            title_size:         64.0,
            description_size:   36.0,
        }
    }
}

/// Stored rectangles of the default layout.
pub fn default_layout() -> BlockMap<Rect,>
{
    BlockMap {
        avatar:      Rect::new(100.0, 100.0, 120.0, 120.0,),
        title:       Rect::new(250.0, 100.0, 850.0, 150.0,),
        description: Rect::new(100.0, 275.0, 1000.0, 150.0,),
        stats:       Rect::new(100.0, 464.0, 489.9996, 85.0,),
        badges:      Rect::new(675.0, 464.0, 483.8796, 72.0,),
    }
}

/// Complete description of a card.
///
/// # Examples
///
/// ```
/// use cardify::{BlockId, CardConfig};
///
/// let config = CardConfig::default();
/// assert_eq!(config.layout[BlockId::Avatar].x, 100.0);
/// assert_eq!(config.avatar.size, 120.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize,)]
#[serde(rename_all = "camelCase")]
pub struct CardConfig
{
    /// Background theme.
    pub theme:       ThemeId,
    /// Font family.
    pub font:        FontId,
    /// Color pair.
    pub colors:      ColorConfig,
    /// Background pattern.
    pub pattern:     PatternConfig,
    /// Language badge style.
    pub badge:       BadgeConfig,
    /// Avatar style.
    pub avatar:      AvatarConfig,
    /// Stats row style.
    pub stats:       StatsConfig,
    /// Text content and sizes.
    pub text:        TextConfig,
    /// Stored rectangle of every block.
    pub layout:      BlockMap<Rect,>,
    /// Optional custom logo reference replacing the owner avatar.
    #[serde(default)]
    pub custom_logo: Option<String,>,
}

impl Default for CardConfig
{
    fn default() -> Self
    {
        Self {
            theme:       ThemeId::Gradient,
            font:        FontId::Inter,
            colors:      ColorConfig::default(),
            pattern:     PatternConfig::default(),
            badge:       BadgeConfig::default(),
            avatar:      AvatarConfig::default(),
            stats:       StatsConfig::default(),
            text:        TextConfig::default(),
            layout:      default_layout(),
            custom_logo: None,
        }
    }
}

impl CardConfig
{
    /// Returns a copy reseeded after a repository fetch.
    ///
    /// Title and description text are replaced with the repository's values
    /// (`no_description` when it has none) and any custom logo is dropped.
    /// Every other field is kept.
    pub fn reseeded(&self, repo: &RepoData, no_description: &str,) -> Self
    {
        let mut next = self.clone();
        next.text.custom_title = repo.name.clone();
        next.text.custom_description = repo.description_or(no_description,).to_owned();
        next.custom_logo = None;
        next
    }
}

#[cfg(test)]
mod tests
{
    use super::{BadgeStyle, CardConfig, PatternId, StatsStyle, ThemeId};
    use crate::{geometry::BlockId, repository::RepoData};

    #[test]
    fn default_stats_use_card_preset()
    {
        let config = CardConfig::default();
        assert_eq!(config.stats.style, StatsStyle::Card);
        assert_eq!(config.stats.item_width, 150.0);
        assert_eq!(config.stats.item_height, 85.0);
        assert_eq!(config.stats.gap, 20.0);
    }

    #[test]
    fn apply_style_switches_size_preset()
    {
        let mut config = CardConfig::default();
        config.stats.apply_style(StatsStyle::Split,);
        assert_eq!(config.stats.item_width, 160.0);
        assert_eq!(config.stats.item_height, 70.0);
        assert_eq!(config.stats.value_size, 20.0);
    }

    #[test]
    fn serialized_config_uses_camel_case_and_kebab_ids()
    {
        let mut config = CardConfig::default();
        config.pattern.id = PatternId::CharlieBrown;
        config.badge.style = BadgeStyle::Outline;

        let value = serde_json::to_value(&config,).expect("config should serialize",);
        assert_eq!(value["pattern"]["id"], "charlie-brown");
        assert_eq!(value["badge"]["style"], "outline");
        assert_eq!(value["badge"]["fontSize"], 28.0);
        assert_eq!(value["stats"]["showStars"], true);
        assert_eq!(value["layout"]["title"]["w"], 850.0);
        assert!(value["customLogo"].is_null());
    }

    #[test]
    fn reseeded_replaces_text_and_drops_logo()
    {
        let mut config = CardConfig::default();
        config.theme = ThemeId::Dark;
        config.custom_logo = Some("/api/logo/abc".to_owned(),);

        let repo = RepoData {
            owner: "octocat".to_owned(),
            name: "hello-world".to_owned(),
            ..RepoData::default()
        };
        let next = config.reseeded(&repo, "No description provided",);

        assert_eq!(next.text.custom_title, "hello-world");
        assert_eq!(next.text.custom_description, "No description provided");
        assert_eq!(next.custom_logo, None);
        assert_eq!(next.theme, ThemeId::Dark);
        assert_eq!(next.layout[BlockId::Title], config.layout[BlockId::Title]);
    }
}
