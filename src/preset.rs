// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Preset import and export.
//!
//! A preset is a serialized [`CardConfig`]. Imported documents are never
//! trusted: [`sanitize_card_config`] rebuilds a configuration field by field,
//! falling back to defaults for anything missing or mistyped and clamping
//! every number into its editable range.

use std::{fs, io::Write, path::Path};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::{
    config::{
        AvatarConfig, BadgeConfig, CardConfig, ColorConfig, PatternConfig, StatsConfig, TextConfig,
    },
    error::{self, Error},
    geometry::{BlockMap, Rect, clamp},
};

type Section<'a,> = Option<&'a Map<String, Value,>,>;

/// Encoding of a preset document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default,)]
pub enum PresetFormat
{
    /// JSON, the canonical export format.
    #[default]
    Json,
    /// YAML, convenient for hand-written presets.
    Yaml,
}

impl PresetFormat
{
    /// Picks the format from a file extension; anything but `.yaml`/`.yml`
    /// is JSON.
    pub fn from_path(path: &Path,) -> Self
    {
        match path.extension().and_then(|extension| extension.to_str(),) {
            Some("yaml" | "yml",) => PresetFormat::Yaml,
            _ => PresetFormat::Json,
        }
    }
}

fn section<'a,>(root: Section<'a,>, key: &str,) -> Section<'a,>
{
    root.and_then(|map| map.get(key,),).and_then(Value::as_object,)
}

fn number(section: Section<'_,>, key: &str, range: (f64, f64,), fallback: f64,) -> f64
{
    section
        .and_then(|map| map.get(key,),)
        .and_then(Value::as_f64,)
        .filter(|value| value.is_finite(),)
        .map_or(fallback, |value| clamp(value, range.0, range.1,),)
}

fn flag(section: Section<'_,>, key: &str, fallback: bool,) -> bool
{
    section.and_then(|map| map.get(key,),).and_then(Value::as_bool,).unwrap_or(fallback,)
}

fn string(section: Section<'_,>, key: &str, fallback: String,) -> String
{
    section.and_then(|map| map.get(key,),).and_then(Value::as_str,).map_or(fallback, str::to_owned,)
}

fn choice<T,>(section: Section<'_,>, key: &str, fallback: T,) -> T
where
    T: DeserializeOwned,
{
    section
        .and_then(|map| map.get(key,),)
        .filter(|value| value.is_string(),)
        .and_then(|value| serde_json::from_value(value.clone(),).ok(),)
        .unwrap_or(fallback,)
}

fn languages(section: Section<'_,>, key: &str, fallback: Vec<String,>,) -> Vec<String,>
{
    match section.and_then(|map| map.get(key,),).and_then(Value::as_array,) {
        Some(values,) => values.iter().filter_map(Value::as_str,).map(str::to_owned,).collect(),
        None => fallback,
    }
}

fn layout_rect(layout: Section<'_,>, key: &str, fallback: Rect,) -> Rect
{
    let rect = section(layout, key,);
    Rect::new(
        number(rect, "x", (0.0, 1200.0,), fallback.x,),
        number(rect, "y", (0.0, 630.0,), fallback.y,),
        number(rect, "w", (40.0, 1200.0,), fallback.w,),
        number(rect, "h", (24.0, 630.0,), fallback.h,),
    )
}

/// Rebuilds a [`CardConfig`] from an untrusted document.
///
/// Returns `None` when `input` is not an object. Otherwise every field is
/// taken from the document when it has the right type, clamped into its
/// range where numeric, and defaulted when missing, mistyped or an unknown
/// identifier.
///
/// # Examples
///
/// ```
/// use cardify::preset::sanitize_card_config;
/// use serde_json::json;
///
/// let config = sanitize_card_config(&json!({ "avatar": { "size": 9000 } })).expect("object input",);
/// assert_eq!(config.avatar.size, 320.0);
/// assert!(sanitize_card_config(&json!([1, 2, 3])).is_none());
/// ```
pub fn sanitize_card_config(input: &Value,) -> Option<CardConfig,>
{
    let root = Some(input.as_object()?,);
    let defaults = CardConfig::default();

    let colors = section(root, "colors",);
    let pattern = section(root, "pattern",);
    let badge = section(root, "badge",);
    let avatar = section(root, "avatar",);
    let stats = section(root, "stats",);
    let text = section(root, "text",);
    let layout = section(root, "layout",);

    let custom_logo = match input.get("customLogo",) {
        Some(Value::String(logo,),) => Some(logo.clone(),),
        Some(Value::Null,) => None,
        _ => defaults.custom_logo.clone(),
    };

    Some(CardConfig {
        theme: choice(root, "theme", defaults.theme,),
        font: choice(root, "font", defaults.font,),
        colors: ColorConfig {
            background: string(colors, "background", defaults.colors.background,),
            accent:     string(colors, "accent", defaults.colors.accent,),
        },
        pattern: PatternConfig {
            id:       choice(pattern, "id", defaults.pattern.id,),
            scale:    number(pattern, "scale", (0.5, 4.0,), defaults.pattern.scale,),
            opacity:  number(pattern, "opacity", (0.05, 0.95,), defaults.pattern.opacity,),
            offset_x: number(pattern, "offsetX", (-600.0, 600.0,), defaults.pattern.offset_x,),
            offset_y: number(pattern, "offsetY", (-400.0, 400.0,), defaults.pattern.offset_y,),
        },
        badge: BadgeConfig {
            visible:          flag(badge, "visible", defaults.badge.visible,),
            style:            choice(badge, "style", defaults.badge.style,),
            font_size:        number(badge, "fontSize", (10.0, 48.0,), defaults.badge.font_size,),
            height:           number(badge, "height", (24.0, 100.0,), defaults.badge.height,),
            padding_x:        number(badge, "paddingX", (4.0, 48.0,), defaults.badge.padding_x,),
            gap:              number(badge, "gap", (0.0, 120.0,), defaults.badge.gap,),
            hidden_languages: languages(badge, "hiddenLanguages", defaults.badge.hidden_languages,),
        },
        avatar: AvatarConfig {
            visible: flag(avatar, "visible", defaults.avatar.visible,),
            shape:   choice(avatar, "shape", defaults.avatar.shape,),
            size:    number(avatar, "size", (40.0, 320.0,), defaults.avatar.size,),
            radius:  number(avatar, "radius", (0.0, 160.0,), defaults.avatar.radius,),
        },
        stats: StatsConfig {
            show_stars:   flag(stats, "showStars", defaults.stats.show_stars,),
            show_forks:   flag(stats, "showForks", defaults.stats.show_forks,),
            show_issues:  flag(stats, "showIssues", defaults.stats.show_issues,),
            value_format: choice(stats, "valueFormat", defaults.stats.value_format,),
            style:        choice(stats, "style", defaults.stats.style,),
            item_width:   number(stats, "itemWidth", (80.0, 320.0,), defaults.stats.item_width,),
            item_height:  number(stats, "itemHeight", (40.0, 140.0,), defaults.stats.item_height,),
            gap:          number(stats, "gap", (0.0, 120.0,), defaults.stats.gap,),
            value_size:   number(stats, "valueSize", (10.0, 72.0,), defaults.stats.value_size,),
            label_size:   number(stats, "labelSize", (8.0, 48.0,), defaults.stats.label_size,),
            split_ratio:  number(stats, "splitRatio", (0.2, 0.8,), defaults.stats.split_ratio,),
        },
        text: TextConfig {
            show_owner:         flag(text, "showOwner", defaults.text.show_owner,),
            title_display:      choice(text, "titleDisplay", defaults.text.title_display,),
            custom_title:       string(text, "customTitle", defaults.text.custom_title,),
            custom_description: string(text, "customDescription", defaults.text.custom_description,),
            owner_size:         number(text, "ownerSize", (14.0, 80.0,), defaults.text.owner_size,),
            title_size:         number(text, "titleSize", (24.0, 140.0,), defaults.text.title_size,),
            description_size:   number(text, "descriptionSize", (14.0, 72.0,), defaults.text.description_size,),
        },
        layout: BlockMap::from_fn(|block| layout_rect(layout, block.as_str(), defaults.layout[block],),),
        custom_logo,
    },)
}

/// Decodes and sanitizes a preset document.
///
/// # Errors
///
/// Returns a decoding error when `contents` is not valid JSON or YAML and
/// [`Error::Preset`] when the document is not an object.
pub fn parse_preset(contents: &str, format: PresetFormat,) -> Result<CardConfig, Error,>
{
    let value: Value = match format {
        PresetFormat::Json => serde_json::from_str(contents,)?,
        PresetFormat::Yaml => serde_yaml::from_str(contents,)?,
    };
    sanitize_card_config(&value,).ok_or_else(|| Error::preset("document is not an object",),)
}

/// Reads a preset file, choosing the format from its extension.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be read and the errors of
/// [`parse_preset`] otherwise.
pub fn load_preset(path: &Path,) -> Result<CardConfig, Error,>
{
    info!("Loading preset from {}", path.display());
    let contents = fs::read_to_string(path,).map_err(|source| error::io_error(path, source,),)?;
    parse_preset(&contents, PresetFormat::from_path(path,),)
}

/// Serializes `config` as JSON into `writer`.
///
/// # Errors
///
/// Returns [`Error::Serialize`] when encoding or writing fails.
pub fn write_preset<W,>(writer: W, config: &CardConfig, pretty: bool,) -> Result<(), Error,>
where
    W: Write,
{
    if pretty {
        serde_json::to_writer_pretty(writer, config,)?;
    } else {
        serde_json::to_writer(writer, config,)?;
    }
    Ok((),)
}

/// Writes `config` to `path` as pretty JSON, or YAML for `.yaml`/`.yml`.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be written and an encoding
/// error when serialization fails.
pub fn save_preset(path: &Path, config: &CardConfig,) -> Result<(), Error,>
{
    let mut contents = match PresetFormat::from_path(path,) {
        PresetFormat::Json => serde_json::to_string_pretty(config,)?,
        PresetFormat::Yaml => serde_yaml::to_string(config,)?,
    };
    if !contents.ends_with('\n',) {
        contents.push('\n',);
    }

    debug!("Writing preset to {}", path.display());
    fs::write(path, contents,).map_err(|source| error::io_error(path, source,),)?;
    info!("Preset saved to {}", path.display());
    Ok((),)
}
