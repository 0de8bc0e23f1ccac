// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Repository metadata consumed by the card.
//!
//! The data itself is fetched by an external provider; this module only
//! describes its shape and resolves the user-supplied repository reference
//! into an owner/name pair.

use std::{fs, path::Path};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{self, Error};

/// Maximum number of languages the data provider reports for a repository.
pub const MAX_LANGUAGES: usize = 3;

/// Read-only repository snapshot supplied by the data provider.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize,)]
#[serde(rename_all = "camelCase")]
pub struct RepoData
{
    /// Account that owns the repository.
    pub owner:       String,
    /// Repository name.
    pub name:        String,
    /// Optional repository description.
    #[serde(default)]
    pub description: Option<String,>,
    /// Stargazer count.
    #[serde(default)]
    pub stars:       u64,
    /// Fork count.
    #[serde(default)]
    pub forks:       u64,
    /// Open issue count.
    #[serde(default)]
    pub issues:      u64,
    /// Primary language reported by the provider.
    #[serde(default)]
    pub language:    Option<String,>,
    /// Most used languages, most significant first.
    #[serde(default)]
    pub languages:   Vec<String,>,
    /// Avatar image location (URL or data URL).
    #[serde(default)]
    pub avatar_url:  String,
}

impl RepoData
{
    /// Returns the description, or `fallback` when the repository has none.
    pub fn description_or<'a,>(&'a self, fallback: &'a str,) -> &'a str
    {
        self.description.as_deref().map(str::trim,).filter(|value| !value.is_empty(),).unwrap_or(fallback,)
    }

    /// Returns `owner/name`.
    pub fn full_name(&self,) -> String
    {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Loads repository data from a JSON or YAML file.
///
/// Files ending in `.yaml` or `.yml` are decoded as YAML, everything else as
/// JSON.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be read and a decoding error
/// when its contents do not describe a repository.
pub fn load_repository(path: &Path,) -> Result<RepoData, Error,>
{
    debug!("Reading repository data from {}", path.display());
    let contents = fs::read_to_string(path,).map_err(|source| error::io_error(path, source,),)?;
    let is_yaml = path
        .extension()
        .and_then(|extension| extension.to_str(),)
        .is_some_and(|extension| matches!(extension, "yaml" | "yml"),);

    if is_yaml {
        Ok(serde_yaml::from_str(&contents,)?,)
    } else {
        Ok(serde_json::from_str(&contents,)?,)
    }
}

/// Owner/name pair identifying a repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize,)]
pub struct RepoReference
{
    /// Account that owns the repository.
    pub owner: String,
    /// Repository name.
    pub name:  String,
}

impl RepoReference
{
    /// Parses `owner/repo` or a GitHub repository URL.
    ///
    /// A trailing slash and a `.git` suffix are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when either segment is missing.
    ///
    /// # Examples
    ///
    /// ```
    /// use cardify::RepoReference;
    ///
    /// let reference = RepoReference::parse("https://github.com/rust-lang/rust/",)?;
    /// assert_eq!(reference.owner, "rust-lang");
    /// assert_eq!(reference.name, "rust");
    /// # Ok::<(), cardify::Error>(())
    /// ```
    pub fn parse(input: &str,) -> Result<Self, Error,>
    {
        let pattern = Regex::new(
            r"^(?:https?://)?(?:www\.)?(?:github\.com/)?([A-Za-z0-9-]+)/([A-Za-z0-9_.-]+?)(?:\.git)?/?$",
        )
        .map_err(|error| Error::validation(format!("invalid repository pattern: {error}"),),)?;

        let trimmed = input.trim();
        let captures = pattern.captures(trimmed,).ok_or_else(|| {
            Error::validation(format!("invalid repository '{trimmed}', use \"owner/repo\""),)
        },)?;

        Ok(Self {
            owner: captures[1].to_owned(),
            name:  captures[2].to_owned(),
        },)
    }
}
