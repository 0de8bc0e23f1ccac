// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Ordered, duplicate-free block selection whose first element is the
//! primary block.

use serde::{Deserialize, Serialize};

use crate::geometry::BlockId;

/// Non-empty ordered set of selected blocks.
///
/// The first block is the primary one: single-block edits and resize
/// handles target it. Every constructor normalizes its input, so the
/// selection is never empty and never holds duplicates.
///
/// # Examples
///
/// ```
/// use cardify::{BlockId, Selection};
///
/// let selection = Selection::normalize(&[BlockId::Title, BlockId::Title, BlockId::Stats], Some(BlockId::Stats),);
/// assert_eq!(selection.blocks(), &[BlockId::Stats, BlockId::Title]);
/// assert_eq!(selection.primary(), BlockId::Stats);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize,)]
#[serde(from = "Vec<BlockId>", into = "Vec<BlockId>")]
pub struct Selection
{
    blocks: Vec<BlockId,>,
}

impl Default for Selection
{
    fn default() -> Self
    {
        Self::single(BlockId::DEFAULT,)
    }
}

impl From<Vec<BlockId,>,> for Selection
{
    fn from(blocks: Vec<BlockId,>,) -> Self
    {
        Self::normalize(&blocks, None,)
    }
}

impl From<Selection,> for Vec<BlockId,>
{
    fn from(selection: Selection,) -> Self
    {
        selection.blocks
    }
}

impl Selection
{
    /// Selection holding `block` alone.
    pub fn single(block: BlockId,) -> Self
    {
        Self {
            blocks: vec![block],
        }
    }

    /// Deduplicates `blocks` keeping first occurrences and moves `primary`
    /// to the front.
    ///
    /// When `primary` is absent or not part of `blocks` the first block
    /// stays primary. An empty input falls back to the default block.
    pub fn normalize(blocks: &[BlockId], primary: Option<BlockId,>,) -> Self
    {
        let mut unique: Vec<BlockId,> = Vec::with_capacity(blocks.len(),);
        for block in blocks {
            if !unique.contains(block,) {
                unique.push(*block,);
            }
        }

        if unique.is_empty() {
            return Self::default();
        }

        if let Some(index,) = primary.and_then(|primary| unique.iter().position(|block| *block == primary,),) {
            let primary = unique.remove(index,);
            unique.insert(0, primary,);
        }

        Self {
            blocks: unique,
        }
    }

    /// Primary block.
    pub fn primary(&self,) -> BlockId
    {
        self.blocks.first().copied().unwrap_or(BlockId::DEFAULT,)
    }

    /// Selected blocks, primary first.
    pub fn blocks(&self,) -> &[BlockId]
    {
        &self.blocks
    }

    /// Number of selected blocks.
    pub fn len(&self,) -> usize
    {
        self.blocks.len()
    }

    /// Returns `true` when nothing is selected, which construction rules out.
    pub fn is_empty(&self,) -> bool
    {
        self.blocks.is_empty()
    }

    /// Returns `true` when `block` is selected.
    pub fn contains(&self, block: BlockId,) -> bool
    {
        self.blocks.contains(&block,)
    }

    /// Returns a copy with `block` promoted to primary when it is selected.
    pub fn with_primary(&self, block: BlockId,) -> Self
    {
        Self::normalize(&self.blocks, Some(block,),)
    }

    /// Toggles membership of `block`.
    ///
    /// An added block becomes primary. Removing the last block keeps it
    /// selected instead of emptying the selection.
    pub fn toggle(&self, block: BlockId,) -> Self
    {
        if self.contains(block,) {
            let remaining: Vec<BlockId,> = self.blocks.iter().copied().filter(|item| *item != block,).collect();
            if remaining.is_empty() {
                return Self::single(block,);
            }
            return Self::normalize(&remaining, None,);
        }

        let mut blocks = self.blocks.clone();
        blocks.push(block,);
        Self::normalize(&blocks, Some(block,),)
    }
}

#[cfg(test)]
mod tests
{
    use proptest::prelude::*;

    use super::Selection;
    use crate::geometry::BlockId;

    #[test]
    fn normalize_deduplicates_and_honors_primary()
    {
        let selection =
            Selection::normalize(&[BlockId::Title, BlockId::Title, BlockId::Stats], Some(BlockId::Stats,),);
        assert_eq!(selection.blocks(), &[BlockId::Stats, BlockId::Title]);
    }

    #[test]
    fn normalize_ignores_unselected_primary()
    {
        let selection = Selection::normalize(&[BlockId::Badges, BlockId::Avatar], Some(BlockId::Title,),);
        assert_eq!(selection.blocks(), &[BlockId::Badges, BlockId::Avatar]);
    }

    #[test]
    fn empty_selection_falls_back_to_title()
    {
        let selection = Selection::normalize(&[], Some(BlockId::Stats,),);
        assert_eq!(selection.blocks(), &[BlockId::Title]);
        assert_eq!(Selection::default().primary(), BlockId::Title);
    }

    #[test]
    fn toggle_adds_as_primary_and_never_empties()
    {
        let selection = Selection::single(BlockId::Title,).toggle(BlockId::Stats,);
        assert_eq!(selection.blocks(), &[BlockId::Stats, BlockId::Title]);

        let removed = selection.toggle(BlockId::Stats,);
        assert_eq!(removed.blocks(), &[BlockId::Title]);

        let kept = removed.toggle(BlockId::Title,);
        assert_eq!(kept.blocks(), &[BlockId::Title]);
    }

    #[test]
    fn with_primary_preserves_membership()
    {
        let selection = Selection::normalize(&[BlockId::Avatar, BlockId::Title, BlockId::Stats], None,);
        let promoted = selection.with_primary(BlockId::Stats,);
        assert_eq!(promoted.blocks(), &[BlockId::Stats, BlockId::Avatar, BlockId::Title]);
        assert_eq!(selection.with_primary(BlockId::Badges,), selection);
    }

    #[test]
    fn deserializing_normalizes()
    {
        let selection: Selection =
            serde_json::from_str(r#"["stats", "stats", "badges"]"#,).expect("selection should parse",);
        assert_eq!(selection.blocks(), &[BlockId::Stats, BlockId::Badges]);

        let empty: Selection = serde_json::from_str("[]",).expect("empty selection should parse",);
        assert_eq!(empty, Selection::default());
    }

    fn block_strategy() -> impl Strategy<Value = BlockId,>
    {
        prop::sample::select(BlockId::ALL.to_vec(),)
    }

    proptest! {
        #[test]
        fn normalized_selection_is_unique_and_non_empty(
            blocks in prop::collection::vec(block_strategy(), 0..8),
            primary in prop::option::of(block_strategy())
        ) {
            let selection = Selection::normalize(&blocks, primary);
            prop_assert!(!selection.is_empty());
            for (index, block) in selection.blocks().iter().enumerate() {
                prop_assert!(!selection.blocks()[index + 1..].contains(block));
            }
            if let Some(primary) = primary.filter(|primary| blocks.contains(primary)) {
                prop_assert_eq!(selection.primary(), primary);
            }
        }
    }
}
