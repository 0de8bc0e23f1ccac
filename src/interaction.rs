// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Pointer-driven editor state machine.
//!
//! [`EditorState`] is immutable: [`EditorState::reduce`] consumes one
//! [`EditorEvent`] and returns the next state. A single drag session can be
//! active at a time and it is owned by the pointer that started it; events
//! from every other pointer are ignored until the owner releases.
//!
//! Interactive rectangles are recomputed from the configuration whenever
//! they are needed, so replacing the configuration or the repository never
//! leaves stale geometry behind.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    config::CardConfig,
    geometry::{BlockId, BlockMap, CANVAS_HEIGHT, CANVAS_WIDTH, MinimumSize, Point, Rect, clamp},
    metrics::interactive_rects,
    repository::RepoData,
    selection::Selection,
    transform::{AlignAction, DistributeAxis, align_selected_blocks, apply_rect_to_config, distribute_selected_blocks},
};

/// Quantization step applied to unsnapped moves and resizes.
pub const GRID_STEP: f64 = 8.0;
/// Maximum distance at which an edge or center snaps to a guide.
pub const SNAP_THRESHOLD: f64 = 10.0;
/// Half the edge length of the square hit area around a resize handle.
pub const HANDLE_RADIUS: f64 = 8.0;

/// Identity of a pointing device.
pub type PointerId = u32;

/// Keyboard modifiers held during a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,)]
#[serde(default)]
pub struct Modifiers
{
    /// Shift, Ctrl or Cmd: toggle selection membership.
    pub additive: bool,
    /// Disable grid rounding and guide snapping.
    pub free:     bool,
}

/// Corner handle used to resize the primary block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,)]
#[serde(rename_all = "lowercase")]
pub enum ResizeHandle
{
    /// Top-left corner.
    Nw,
    /// Top-right corner.
    Ne,
    /// Bottom-left corner.
    Sw,
    /// Bottom-right corner.
    Se,
}

impl ResizeHandle
{
    /// Every handle in hit-test order.
    pub const ALL: [ResizeHandle; 4] = [ResizeHandle::Nw, ResizeHandle::Ne, ResizeHandle::Sw, ResizeHandle::Se,];

    const fn moves_left(self,) -> bool
    {
        matches!(self, ResizeHandle::Nw | ResizeHandle::Sw)
    }

    const fn moves_top(self,) -> bool
    {
        matches!(self, ResizeHandle::Nw | ResizeHandle::Ne)
    }

    /// Location of the handle on `rect`.
    pub fn anchor(self, rect: &Rect,) -> Point
    {
        let x = if self.moves_left() { rect.x } else { rect.right() };
        let y = if self.moves_top() { rect.y } else { rect.bottom() };
        Point::new(x, y,)
    }
}

/// What lies under a canvas point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum HitTarget
{
    /// A resize handle of the primary block.
    Handle
    {
        /// Block owning the handle.
        block:  BlockId,
        /// Which corner.
        handle: ResizeHandle,
    },
    /// The body of a block.
    Block
    {
        /// Block under the pointer.
        block: BlockId,
    },
    /// Empty canvas.
    Canvas,
}

/// Guide coordinates currently snapped to.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize,)]
pub struct SnapGuides
{
    /// X coordinate of the vertical guide line.
    pub vertical:   Option<f64,>,
    /// Y coordinate of the horizontal guide line.
    pub horizontal: Option<f64,>,
}

impl SnapGuides
{
    /// Returns `true` when no guide is shown.
    pub fn is_empty(&self,) -> bool
    {
        self.vertical.is_none() && self.horizontal.is_none()
    }
}

/// Candidate guide coordinates for both axes.
#[derive(Debug, Clone, PartialEq, Default,)]
pub struct GuideLines
{
    /// X coordinates of vertical guides.
    pub vertical:   Vec<f64,>,
    /// Y coordinates of horizontal guides.
    pub horizontal: Vec<f64,>,
}

/// Outcome of snapping one axis.
#[derive(Debug, Clone, Copy, PartialEq,)]
pub struct AxisSnap
{
    /// Possibly adjusted leading edge.
    pub value: f64,
    /// Guide that won, if any.
    pub guide: Option<f64,>,
}

/// Collects canvas edges, canvas midlines and the edges and centers of
/// every block not in `excluded`.
pub fn collect_guides(rects: &BlockMap<Rect,>, excluded: &[BlockId],) -> GuideLines
{
    let mut guides = GuideLines {
        vertical:   vec![0.0, CANVAS_WIDTH / 2.0, CANVAS_WIDTH],
        horizontal: vec![0.0, CANVAS_HEIGHT / 2.0, CANVAS_HEIGHT],
    };

    for (block, rect,) in rects.iter() {
        if excluded.contains(&block,) {
            continue;
        }
        guides.vertical.extend([rect.x, rect.center_x(), rect.right()],);
        guides.horizontal.extend([rect.y, rect.center_y(), rect.bottom()],);
    }
    guides
}

/// Snaps a segment `[position, position + size]` to the closest guide.
///
/// The leading edge, center and trailing edge are all tried against every
/// guide. Only candidates within [`SNAP_THRESHOLD`] qualify and the closest
/// one wins; ties keep the first candidate found.
///
/// # Examples
///
/// ```
/// use cardify::interaction::snap_axis;
///
/// let snap = snap_axis(243.0, 100.0, &[250.0, 600.0],);
/// assert_eq!(snap.value, 250.0);
/// assert_eq!(snap.guide, Some(250.0));
/// ```
pub fn snap_axis(position: f64, size: f64, guides: &[f64],) -> AxisSnap
{
    let anchors = [0.0, size / 2.0, size];
    let mut best = AxisSnap {
        value: position,
        guide: None,
    };
    let mut best_distance = SNAP_THRESHOLD + 1.0;

    for guide in guides {
        for anchor in anchors {
            let delta = guide - (position + anchor);
            let distance = delta.abs();
            if distance < best_distance && distance <= SNAP_THRESHOLD {
                best_distance = distance;
                best = AxisSnap {
                    value: position + delta,
                    guide: Some(*guide,),
                };
            }
        }
    }
    best
}

/// Rounds `value` to the nearest multiple of [`GRID_STEP`].
pub fn snap_to_grid(value: f64,) -> f64
{
    (value / GRID_STEP).round() * GRID_STEP
}

/// Resizes `start` by dragging `handle` by `(dx, dy)`.
///
/// The edges opposite to the handle stay fixed. The moving edges stop at the
/// canvas border, and when the new size falls below `minimum` it is floored
/// and the moving edges are pulled back, so the opposite corner never moves
/// for a start rectangle inside the canvas.
pub fn resized_rect(start: Rect, handle: ResizeHandle, dx: f64, dy: f64, minimum: MinimumSize,) -> Rect
{
    let (raw_w, max_w,) =
        if handle.moves_left() { (start.w - dx, start.right(),) } else { (start.w + dx, CANVAS_WIDTH - start.x,) };
    let (raw_h, max_h,) =
        if handle.moves_top() { (start.h - dy, start.bottom(),) } else { (start.h + dy, CANVAS_HEIGHT - start.y,) };
    let w = clamp(raw_w.min(max_w,), minimum.width, CANVAS_WIDTH,);
    let h = clamp(raw_h.min(max_h,), minimum.height, CANVAS_HEIGHT,);
    let x = if handle.moves_left() { start.right() - w } else { start.x };
    let y = if handle.moves_top() { start.bottom() - h } else { start.y };

    Rect::new(clamp(x, 0.0, CANVAS_WIDTH - w,), clamp(y, 0.0, CANVAS_HEIGHT - h,), w, h,)
}

/// Starting rectangle of one block in a move session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize,)]
pub struct BlockSnapshot
{
    /// Moved block.
    pub block: BlockId,
    /// Interactive rectangle when the session started.
    pub rect:  Rect,
}

/// In-progress group move.
#[derive(Debug, Clone, PartialEq, Serialize,)]
pub struct MoveSession
{
    /// Owning pointer.
    pub pointer:   PointerId,
    /// Block under the pointer; grid and guide snapping apply to it.
    pub active:    BlockId,
    /// Client position of the pointer-down.
    pub start:     Point,
    /// Every moved block with its starting rectangle.
    pub snapshots: Vec<BlockSnapshot,>,
}

/// In-progress corner resize of a single block.
#[derive(Debug, Clone, PartialEq, Serialize,)]
pub struct ResizeSession
{
    /// Owning pointer.
    pub pointer:    PointerId,
    /// Resized block.
    pub block:      BlockId,
    /// Dragged corner.
    pub handle:     ResizeHandle,
    /// Client position of the pointer-down.
    pub start:      Point,
    /// Interactive rectangle when the session started.
    pub start_rect: Rect,
}

/// Active drag gesture.
#[derive(Debug, Clone, PartialEq, Serialize,)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum DragSession
{
    /// Moving the selection.
    Move(MoveSession,),
    /// Resizing the primary block.
    Resize(ResizeSession,),
}

impl DragSession
{
    /// Pointer that owns the session.
    pub fn pointer(&self,) -> PointerId
    {
        match self {
            DragSession::Move(session,) => session.pointer,
            DragSession::Resize(session,) => session.pointer,
        }
    }
}

/// Input consumed by [`EditorState::reduce`].
///
/// Positions are client pixels relative to the canvas origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize,)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum EditorEvent
{
    /// A pointer was pressed. Without an explicit target the position is
    /// hit-tested.
    PointerDown
    {
        /// Pressed pointer.
        pointer:   PointerId,
        /// Client position.
        position:  Point,
        /// Element under the pointer as reported by the host.
        #[serde(default)]
        target:    Option<HitTarget,>,
        /// Held modifiers.
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// A pointer moved.
    PointerMove
    {
        /// Moving pointer.
        pointer:   PointerId,
        /// Client position.
        position:  Point,
        /// Held modifiers.
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// A pointer was released.
    PointerUp
    {
        /// Released pointer.
        pointer: PointerId,
    },
    /// The host cancelled a pointer.
    PointerCancel
    {
        /// Cancelled pointer.
        pointer: PointerId,
    },
    /// A block was clicked.
    BlockClick
    {
        /// Clicked block.
        block:     BlockId,
        /// Held modifiers.
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// Empty canvas was clicked.
    CanvasClick,
    /// The on-screen canvas width changed.
    ViewportResized
    {
        /// New on-screen width in client pixels.
        screen_width: f64,
    },
    /// Align the selection.
    Align
    {
        /// Alignment target.
        action: AlignAction,
    },
    /// Distribute the selection.
    Distribute
    {
        /// Distribution axis.
        axis: DistributeAxis,
    },
    /// The configuration was replaced by a preset import or the style panel.
    ReplaceConfig
    {
        /// New configuration.
        config: Box<CardConfig,>,
    },
    /// New repository data arrived.
    ReplaceRepository
    {
        /// New repository snapshot.
        repo: Box<RepoData,>,
    },
}

/// Complete state of one editor session.
#[derive(Debug, Clone, PartialEq, Serialize,)]
#[serde(rename_all = "camelCase")]
pub struct EditorState
{
    config:         CardConfig,
    repo:           RepoData,
    selection:      Selection,
    session:        Option<DragSession,>,
    guides:         SnapGuides,
    popover:        Option<BlockId,>,
    viewport_scale: f64,
}

impl EditorState
{
    /// Creates an idle editor with the default selection at scale 1.
    pub fn new(config: CardConfig, repo: RepoData,) -> Self
    {
        Self {
            config,
            repo,
            selection: Selection::default(),
            session: None,
            guides: SnapGuides::default(),
            popover: None,
            viewport_scale: 1.0,
        }
    }

    /// Current configuration.
    pub fn config(&self,) -> &CardConfig
    {
        &self.config
    }

    /// Current repository snapshot.
    pub fn repo(&self,) -> &RepoData
    {
        &self.repo
    }

    /// Current selection.
    pub fn selection(&self,) -> &Selection
    {
        &self.selection
    }

    /// Active drag session.
    pub fn session(&self,) -> Option<&DragSession,>
    {
        self.session.as_ref()
    }

    /// Snap guides to draw.
    pub fn guides(&self,) -> SnapGuides
    {
        self.guides
    }

    /// Block whose detail popover is open.
    pub fn popover(&self,) -> Option<BlockId,>
    {
        self.popover
    }

    /// Screen pixels per canvas unit.
    pub fn viewport_scale(&self,) -> f64
    {
        self.viewport_scale
    }

    /// Interactive rectangles of the current configuration.
    pub fn interactive_rects(&self,) -> BlockMap<Rect,>
    {
        interactive_rects(&self.config, &self.repo,)
    }

    /// Converts a client position to canvas units.
    pub fn to_canvas(&self, position: Point,) -> Point
    {
        Point::new(position.x / self.viewport_scale, position.y / self.viewport_scale,)
    }

    /// Applies one event and returns the resulting state.
    pub fn reduce(&self, event: &EditorEvent,) -> EditorState
    {
        match event {
            EditorEvent::PointerDown {
                pointer,
                position,
                target,
                modifiers,
            } => self.pointer_down(*pointer, *position, *target, *modifiers,),
            EditorEvent::PointerMove {
                pointer,
                position,
                modifiers,
            } => self.pointer_move(*pointer, *position, *modifiers,),
            EditorEvent::PointerUp {
                pointer,
            }
            | EditorEvent::PointerCancel {
                pointer,
            } => self.pointer_release(*pointer,),
            EditorEvent::BlockClick {
                block,
                modifiers,
            } => {
                let mut next = self.clone();
                if modifiers.additive {
                    next.popover = None;
                } else {
                    next.selection = Selection::single(*block,);
                    next.popover = Some(*block,);
                }
                next
            }
            EditorEvent::CanvasClick => {
                let mut next = self.clone();
                next.selection = Selection::default();
                next.popover = None;
                next
            }
            EditorEvent::ViewportResized {
                screen_width,
            } => {
                let mut next = self.clone();
                let scale = screen_width / CANVAS_WIDTH;
                if scale.is_finite() && scale > 0.0 {
                    next.viewport_scale = scale;
                }
                next
            }
            EditorEvent::Align {
                action,
            } => {
                let mut next = self.clone();
                next.config = align_selected_blocks(
                    &self.config,
                    self.selection.blocks(),
                    &self.interactive_rects(),
                    *action,
                );
                next
            }
            EditorEvent::Distribute {
                axis,
            } => {
                let mut next = self.clone();
                next.config = distribute_selected_blocks(
                    &self.config,
                    self.selection.blocks(),
                    &self.interactive_rects(),
                    *axis,
                );
                next
            }
            EditorEvent::ReplaceConfig {
                config,
            } => {
                let mut next = self.idle();
                next.config = config.as_ref().clone();
                next
            }
            EditorEvent::ReplaceRepository {
                repo,
            } => {
                let mut next = self.idle();
                next.repo = repo.as_ref().clone();
                next
            }
        }
    }

    /// Copy of the state with any session and guides dropped.
    fn idle(&self,) -> EditorState
    {
        let mut next = self.clone();
        if next.session.take().is_some() {
            debug!("Dropped drag session after external change");
        }
        next.guides = SnapGuides::default();
        next
    }

    fn pointer_down(
        &self,
        pointer: PointerId,
        position: Point,
        target: Option<HitTarget,>,
        modifiers: Modifiers,
    ) -> EditorState
    {
        if self.session.is_some() {
            return self.clone();
        }

        let target = target.unwrap_or_else(|| hit_test(self, self.to_canvas(position,),),);
        let rects = self.interactive_rects();
        let mut next = self.clone();

        match target {
            HitTarget::Handle {
                block,
                handle,
            } => {
                if block != self.selection.primary() {
                    return next;
                }
                next.selection = Selection::single(block,);
                next.guides = SnapGuides::default();
                next.session = Some(DragSession::Resize(ResizeSession {
                    pointer,
                    block,
                    handle,
                    start: position,
                    start_rect: rects[block],
                },),);
                debug!("Pointer {} started resizing {} from {:?}", pointer, block, handle);
            }
            HitTarget::Block {
                block,
            } => {
                if modifiers.additive {
                    next.selection = self.selection.toggle(block,);
                    return next;
                }

                next.selection = if self.selection.contains(block,) {
                    self.selection.with_primary(block,)
                } else {
                    Selection::single(block,)
                };
                let snapshots = next
                    .selection
                    .blocks()
                    .iter()
                    .map(|block| BlockSnapshot {
                        block: *block,
                        rect:  rects[*block],
                    },)
                    .collect();
                next.session = Some(DragSession::Move(MoveSession {
                    pointer,
                    active: block,
                    start: position,
                    snapshots,
                },),);
                next.popover = None;
                debug!("Pointer {} started moving {} block(s)", pointer, next.selection.len());
            }
            HitTarget::Canvas => {}
        }
        next
    }

    fn pointer_move(&self, pointer: PointerId, position: Point, modifiers: Modifiers,) -> EditorState
    {
        let Some(session,) = self.session.as_ref().filter(|session| session.pointer() == pointer,) else {
            return self.clone();
        };

        match session {
            DragSession::Move(session,) => self.move_selection(session, position, modifiers,),
            DragSession::Resize(session,) => self.resize_block(session, position, modifiers,),
        }
    }

    fn move_selection(&self, session: &MoveSession, position: Point, modifiers: Modifiers,) -> EditorState
    {
        let Some(active,) = session.snapshots.iter().find(|snapshot| snapshot.block == session.active,) else {
            return self.clone();
        };
        let active = active.rect;

        let (min_dx, max_dx,) = session.snapshots.iter().fold(
            (f64::NEG_INFINITY, f64::INFINITY,),
            |(low, high,), snapshot| {
                (low.max(-snapshot.rect.x,), high.min(CANVAS_WIDTH - snapshot.rect.w - snapshot.rect.x,),)
            },
        );
        let (min_dy, max_dy,) = session.snapshots.iter().fold(
            (f64::NEG_INFINITY, f64::INFINITY,),
            |(low, high,), snapshot| {
                (low.max(-snapshot.rect.y,), high.min(CANVAS_HEIGHT - snapshot.rect.h - snapshot.rect.y,),)
            },
        );

        let dx = clamp((position.x - session.start.x) / self.viewport_scale, min_dx, max_dx,);
        let dy = clamp((position.y - session.start.y) / self.viewport_scale, min_dy, max_dy,);
        let mut active_x = active.x + dx;
        let mut active_y = active.y + dy;

        let mut next = self.clone();
        if modifiers.free {
            next.guides = SnapGuides::default();
        } else {
            let moved: Vec<BlockId,> = session.snapshots.iter().map(|snapshot| snapshot.block,).collect();
            let lines = collect_guides(&self.interactive_rects(), &moved,);
            let snap_x = snap_axis(snap_to_grid(active_x,), active.w, &lines.vertical,);
            let snap_y = snap_axis(snap_to_grid(active_y,), active.h, &lines.horizontal,);
            active_x = snap_x.value;
            active_y = snap_y.value;
            next.guides = SnapGuides {
                vertical:   snap_x.guide,
                horizontal: snap_y.guide,
            };
        }

        let dx = clamp(active_x - active.x, min_dx, max_dx,);
        let dy = clamp(active_y - active.y, min_dy, max_dy,);
        for snapshot in &session.snapshots {
            // Rounding must not push a fractional-width block past the far edge.
            let stored = &mut next.config.layout[snapshot.block];
            stored.x = clamp((snapshot.rect.x + dx).round(), 0.0, (CANVAS_WIDTH - snapshot.rect.w).floor(),);
            stored.y = clamp((snapshot.rect.y + dy).round(), 0.0, (CANVAS_HEIGHT - snapshot.rect.h).floor(),);
        }
        next
    }

    fn resize_block(&self, session: &ResizeSession, position: Point, modifiers: Modifiers,) -> EditorState
    {
        let mut dx = (position.x - session.start.x) / self.viewport_scale;
        let mut dy = (position.y - session.start.y) / self.viewport_scale;
        if !modifiers.free {
            dx = snap_to_grid(dx,);
            dy = snap_to_grid(dy,);
        }

        let rect = resized_rect(session.start_rect, session.handle, dx, dy, session.block.minimum_size(),);
        let mut next = self.clone();
        next.config = apply_rect_to_config(&self.config, &self.repo, session.block, rect,);
        next.guides = SnapGuides::default();
        next
    }

    fn pointer_release(&self, pointer: PointerId,) -> EditorState
    {
        match &self.session {
            Some(session,) if session.pointer() == pointer => {
                debug!("Pointer {} ended its drag session", pointer);
                let mut next = self.clone();
                next.session = None;
                next.guides = SnapGuides::default();
                next
            }
            _ => self.clone(),
        }
    }
}

/// Finds what lies under `point` (canvas units).
///
/// Handles of the primary block win, then blocks from the top-most painted
/// one down, then the canvas.
pub fn hit_test(state: &EditorState, point: Point,) -> HitTarget
{
    let rects = state.interactive_rects();
    let primary = state.selection.primary();

    for handle in ResizeHandle::ALL {
        let anchor = handle.anchor(&rects[primary],);
        if (point.x - anchor.x).abs() <= HANDLE_RADIUS && (point.y - anchor.y).abs() <= HANDLE_RADIUS {
            return HitTarget::Handle {
                block: primary,
                handle,
            };
        }
    }

    BlockId::ALL
        .into_iter()
        .rev()
        .find(|block| rects[*block].contains(point,),)
        .map_or(HitTarget::Canvas, |block| HitTarget::Block {
            block,
        },)
}

#[cfg(test)]
mod tests
{
    use proptest::prelude::*;

    use super::{
        DragSession, EditorEvent, EditorState, HitTarget, Modifiers, PointerId, ResizeHandle, collect_guides,
        hit_test, resized_rect, snap_axis, snap_to_grid,
    };
    use crate::{
        config::CardConfig,
        geometry::{BlockId, Point, Rect},
        repository::RepoData,
        transform::AlignAction,
    };

    const FREE: Modifiers = Modifiers {
        additive: false,
        free:     true,
    };
    const ADDITIVE: Modifiers = Modifiers {
        additive: true,
        free:     false,
    };

    fn sample_repo() -> RepoData
    {
        RepoData {
            owner: "octocat".to_owned(),
            name: "hello-world".to_owned(),
            stars: 42,
            forks: 7,
            issues: 3,
            languages: vec!["Rust".to_owned(), "Go".to_owned()],
            ..RepoData::default()
        }
    }

    fn editor() -> EditorState
    {
        EditorState::new(CardConfig::default(), sample_repo(),)
    }

    fn down(pointer: PointerId, block: BlockId, modifiers: Modifiers,) -> EditorEvent
    {
        EditorEvent::PointerDown {
            pointer,
            position: Point::new(0.0, 0.0,),
            target: Some(HitTarget::Block {
                block,
            },),
            modifiers,
        }
    }

    fn handle_down(pointer: PointerId, block: BlockId, handle: ResizeHandle,) -> EditorEvent
    {
        EditorEvent::PointerDown {
            pointer,
            position: Point::new(0.0, 0.0,),
            target: Some(HitTarget::Handle {
                block,
                handle,
            },),
            modifiers: Modifiers::default(),
        }
    }

    fn move_to(pointer: PointerId, x: f64, y: f64, modifiers: Modifiers,) -> EditorEvent
    {
        EditorEvent::PointerMove {
            pointer,
            position: Point::new(x, y,),
            modifiers,
        }
    }

    fn replay(state: EditorState, events: &[EditorEvent],) -> EditorState
    {
        events.iter().fold(state, |state, event| state.reduce(event,),)
    }

    #[test]
    fn group_move_keeps_relative_offsets()
    {
        let state = replay(
            editor(),
            &[
                down(1, BlockId::Description, ADDITIVE,),
                down(1, BlockId::Title, Modifiers::default(),),
                move_to(1, 37.0, 23.0, FREE,),
            ],
        );

        assert_eq!(state.selection().blocks(), &[BlockId::Title, BlockId::Description]);
        let layout = &state.config().layout;
        assert_eq!((layout.title.x, layout.title.y), (287.0, 123.0));
        assert_eq!((layout.description.x, layout.description.y), (137.0, 298.0));
        assert!(state.guides().is_empty());
    }

    #[test]
    fn group_move_is_clamped_by_every_block()
    {
        let state = replay(
            editor(),
            &[
                down(1, BlockId::Description, ADDITIVE,),
                down(1, BlockId::Title, Modifiers::default(),),
                move_to(1, 500.0, 0.0, FREE,),
            ],
        );

        let layout = &state.config().layout;
        assert_eq!(layout.title.x, 350.0);
        assert_eq!(layout.description.x, 200.0);
    }

    #[test]
    fn additive_pointer_down_toggles_without_session()
    {
        let state = editor().reduce(&down(1, BlockId::Stats, ADDITIVE,),);
        assert_eq!(state.selection().blocks(), &[BlockId::Stats, BlockId::Title]);
        assert!(state.session().is_none());

        let state = state.reduce(&down(1, BlockId::Stats, ADDITIVE,),);
        assert_eq!(state.selection().blocks(), &[BlockId::Title]);
    }

    #[test]
    fn plain_pointer_down_on_selected_block_promotes_it()
    {
        let state = replay(
            editor(),
            &[down(1, BlockId::Stats, ADDITIVE,), down(1, BlockId::Title, Modifiers::default(),)],
        );
        assert_eq!(state.selection().blocks(), &[BlockId::Title, BlockId::Stats]);
        assert!(matches!(state.session(), Some(DragSession::Move(session)) if session.snapshots.len() == 2));
    }

    #[test]
    fn foreign_pointers_are_ignored_during_a_session()
    {
        let state = editor().reduce(&down(1, BlockId::Avatar, Modifiers::default(),),);
        let before = state.clone();

        let state = replay(
            state,
            &[
                down(2, BlockId::Stats, Modifiers::default(),),
                move_to(2, 300.0, 300.0, FREE,),
                EditorEvent::PointerUp {
                    pointer: 2,
                },
            ],
        );
        assert_eq!(state, before);

        let state = state.reduce(&EditorEvent::PointerCancel {
            pointer: 1,
        },);
        assert!(state.session().is_none());
    }

    #[test]
    fn snapping_emits_guides_until_release()
    {
        let state = replay(
            editor(),
            &[down(1, BlockId::Avatar, Modifiers::default(),), move_to(1, 3.0, 0.0, Modifiers::default(),)],
        );

        assert_eq!(state.config().layout.avatar.x, 100.0);
        assert_eq!(state.config().layout.avatar.y, 100.0);
        assert_eq!(state.guides().vertical, Some(100.0));
        assert_eq!(state.guides().horizontal, Some(100.0));

        let state = state.reduce(&EditorEvent::PointerUp {
            pointer: 1,
        },);
        assert!(state.guides().is_empty());
        assert!(state.session().is_none());
    }

    #[test]
    fn free_move_skips_grid_and_guides()
    {
        let state =
            replay(editor(), &[down(1, BlockId::Avatar, Modifiers::default(),), move_to(1, 3.0, 5.0, FREE,)],);

        assert_eq!(state.config().layout.avatar.x, 103.0);
        assert_eq!(state.config().layout.avatar.y, 105.0);
        assert!(state.guides().is_empty());
    }

    #[test]
    fn viewport_scale_converts_client_deltas()
    {
        let state = replay(
            editor(),
            &[
                EditorEvent::ViewportResized {
                    screen_width: 600.0,
                },
                down(1, BlockId::Avatar, Modifiers::default(),),
                move_to(1, 20.0, 10.0, FREE,),
            ],
        );

        assert_eq!(state.viewport_scale(), 0.5);
        assert_eq!(state.config().layout.avatar.x, 140.0);
        assert_eq!(state.config().layout.avatar.y, 120.0);
    }

    #[test]
    fn resize_from_north_west_keeps_bottom_right()
    {
        let state = replay(
            editor(),
            &[handle_down(1, BlockId::Title, ResizeHandle::Nw,), move_to(1, -30.0, -40.0, FREE,)],
        );
        assert_eq!(state.config().layout.title, Rect::new(220.0, 60.0, 880.0, 190.0,));

        let floored = replay(
            editor(),
            &[handle_down(1, BlockId::Title, ResizeHandle::Nw,), move_to(1, 800.0, 120.0, FREE,)],
        );
        assert_eq!(floored.config().layout.title, Rect::new(960.0, 190.0, 140.0, 60.0,));
    }

    #[test]
    fn resize_grid_rounds_the_delta()
    {
        let state = replay(
            editor(),
            &[handle_down(1, BlockId::Title, ResizeHandle::Se,), move_to(1, 13.0, -3.0, Modifiers::default(),)],
        );
        assert_eq!(state.config().layout.title, Rect::new(250.0, 100.0, 866.0, 150.0,));
    }

    #[test]
    fn resize_stops_moving_edges_at_the_canvas()
    {
        let east = replay(
            editor(),
            &[handle_down(1, BlockId::Title, ResizeHandle::Se,), move_to(1, 200.0, 500.0, FREE,)],
        );
        assert_eq!(east.config().layout.title, Rect::new(250.0, 100.0, 950.0, 530.0,));

        let west = replay(
            editor(),
            &[handle_down(1, BlockId::Title, ResizeHandle::Nw,), move_to(1, -300.0, -150.0, FREE,)],
        );
        assert_eq!(west.config().layout.title, Rect::new(0.0, 0.0, 1100.0, 250.0,));
    }

    fn editor_with_badge_font(font_size: f64,) -> EditorState
    {
        let mut config = CardConfig::default();
        config.badge.font_size = font_size;
        EditorState::new(config, sample_repo(),)
    }

    #[test]
    fn free_move_keeps_fractional_width_inside_canvas()
    {
        let state = replay(
            editor_with_badge_font(27.0,),
            &[down(1, BlockId::Badges, Modifiers::default(),), move_to(1, 2000.0, 0.0, FREE,)],
        );

        let badges = state.interactive_rects()[BlockId::Badges];
        assert!((badges.w - 196.08).abs() < 1e-9);
        assert_eq!(badges.x, 1003.0);
        assert!(badges.right() <= 1200.0);
    }

    #[test]
    fn handles_of_other_blocks_are_ignored()
    {
        let state = editor().reduce(&handle_down(1, BlockId::Stats, ResizeHandle::Se,),);
        assert!(state.session().is_none());
        assert_eq!(state.selection().primary(), BlockId::Title);
    }

    #[test]
    fn block_click_opens_popover_and_canvas_click_resets()
    {
        let state = editor().reduce(&EditorEvent::BlockClick {
            block:     BlockId::Badges,
            modifiers: Modifiers::default(),
        },);
        assert_eq!(state.popover(), Some(BlockId::Badges));
        assert_eq!(state.selection().blocks(), &[BlockId::Badges]);

        let state = state.reduce(&EditorEvent::BlockClick {
            block:     BlockId::Stats,
            modifiers: ADDITIVE,
        },);
        assert_eq!(state.popover(), None);
        assert_eq!(state.selection().blocks(), &[BlockId::Badges]);

        let state = state.reduce(&EditorEvent::CanvasClick,);
        assert_eq!(state.selection().blocks(), &[BlockId::Title]);
        assert_eq!(state.popover(), None);
    }

    #[test]
    fn align_event_uses_the_selection()
    {
        let state = replay(
            editor(),
            &[
                down(1, BlockId::Avatar, ADDITIVE,),
                EditorEvent::Align {
                    action: AlignAction::Top,
                },
            ],
        );
        assert_eq!(state.config().layout.avatar.y, 100.0);
        assert_eq!(state.config().layout.title.y, 100.0);

        let state = state.reduce(&EditorEvent::Align {
            action: AlignAction::Right,
        },);
        assert_eq!(state.config().layout.avatar.x, 980.0);
    }

    #[test]
    fn replacing_config_recomputes_rects_and_drops_session()
    {
        let state = editor().reduce(&down(1, BlockId::Avatar, Modifiers::default(),),);
        let mut config = CardConfig::default();
        config.avatar.size = 200.0;

        let state = state.reduce(&EditorEvent::ReplaceConfig {
            config: Box::new(config,),
        },);
        assert!(state.session().is_none());
        assert_eq!(state.interactive_rects().avatar.w, 200.0);
    }

    #[test]
    fn hit_test_prefers_primary_handles()
    {
        let state = editor();
        assert_eq!(
            hit_test(&state, Point::new(252.0, 95.0,),),
            HitTarget::Handle {
                block:  BlockId::Title,
                handle: ResizeHandle::Nw,
            }
        );
        assert_eq!(
            hit_test(&state, Point::new(500.0, 300.0,),),
            HitTarget::Block {
                block: BlockId::Description,
            }
        );
        assert_eq!(hit_test(&state, Point::new(5.0, 5.0,),), HitTarget::Canvas);
    }

    #[test]
    fn pointer_down_without_target_is_hit_tested()
    {
        let state = editor().reduce(&EditorEvent::PointerDown {
            pointer:   3,
            position:  Point::new(150.0, 150.0,),
            target:    None,
            modifiers: Modifiers::default(),
        },);
        assert_eq!(state.selection().blocks(), &[BlockId::Avatar]);
        assert_eq!(state.session().map(DragSession::pointer), Some(3));
    }

    #[test]
    fn events_deserialize_from_json()
    {
        let json = r#"[
            {"type": "pointerDown", "pointer": 1, "position": {"x": 150, "y": 150}},
            {"type": "pointerMove", "pointer": 1, "position": {"x": 170, "y": 150}, "modifiers": {"free": true}},
            {"type": "pointerUp", "pointer": 1},
            {"type": "viewportResized", "screenWidth": 600},
            {"type": "align", "action": "left"},
            {"type": "blockClick", "block": "stats"},
            {"type": "canvasClick"}
        ]"#;
        let events: Vec<EditorEvent,> = serde_json::from_str(json,).expect("events should parse",);
        assert_eq!(events.len(), 7);
        assert_eq!(events[1], move_to(1, 170.0, 150.0, FREE,));

        let state = replay(editor(), &events[..3],);
        assert_eq!(state.config().layout.avatar.x, 120.0);
    }

    #[test]
    fn snap_axis_prefers_the_closest_candidate()
    {
        let snap = snap_axis(243.0, 100.0, &[250.0, 296.0],);
        assert_eq!(snap.value, 246.0);
        assert_eq!(snap.guide, Some(296.0));

        let none = snap_axis(243.0, 100.0, &[600.0],);
        assert_eq!(none.value, 243.0);
        assert_eq!(none.guide, None);
    }

    #[test]
    fn guides_skip_excluded_blocks()
    {
        let rects = editor().interactive_rects();
        let lines = collect_guides(&rects, &BlockId::ALL,);
        assert_eq!(lines.vertical, vec![0.0, 600.0, 1200.0]);
        assert_eq!(lines.horizontal, vec![0.0, 315.0, 630.0]);

        let lines = collect_guides(&rects, &[BlockId::Avatar],);
        assert!(lines.vertical.contains(&1100.0));
        assert!(!lines.horizontal.contains(&220.0));
    }

    #[test]
    fn grid_rounding_uses_eight_units()
    {
        assert_eq!(snap_to_grid(103.0,), 104.0);
        assert_eq!(snap_to_grid(-3.0,), 0.0);
        assert_eq!(snap_to_grid(-13.0,), -16.0);
    }

    proptest! {
        #[test]
        fn group_move_is_rigid(dx in -400i32..400, dy in -300i32..300) {
            let state = replay(
                editor(),
                &[
                    down(1, BlockId::Avatar, ADDITIVE),
                    down(1, BlockId::Stats, ADDITIVE),
                    down(1, BlockId::Title, Modifiers::default()),
                    move_to(1, f64::from(dx), f64::from(dy), FREE),
                ],
            );
            let layout = &state.config().layout;
            let initial = CardConfig::default().layout;
            for block in [BlockId::Avatar, BlockId::Stats] {
                prop_assert_eq!(layout[block].x - layout.title.x, initial[block].x - initial.title.x);
                prop_assert_eq!(layout[block].y - layout.title.y, initial[block].y - initial.title.y);
            }
        }

        #[test]
        fn north_west_resize_anchors_bottom_right(dx in -1500i32..1500, dy in -800i32..800) {
            let state = replay(
                editor(),
                &[handle_down(1, BlockId::Title, ResizeHandle::Nw), move_to(1, f64::from(dx), f64::from(dy), FREE)],
            );
            let title = state.config().layout.title;
            prop_assert_eq!(title.right(), 1100.0);
            prop_assert_eq!(title.bottom(), 250.0);
        }

        #[test]
        fn south_east_resize_anchors_top_left(dx in -1500i32..1500, dy in -800i32..800) {
            let state = replay(
                editor(),
                &[handle_down(1, BlockId::Title, ResizeHandle::Se), move_to(1, f64::from(dx), f64::from(dy), FREE)],
            );
            let title = state.config().layout.title;
            prop_assert_eq!((title.x, title.y), (250.0, 100.0));
            prop_assert!(title.fits_canvas());
        }

        #[test]
        fn group_move_with_fractional_widths_stays_on_canvas(
            font_size in 10.0f64..48.0,
            dx in -2500.0f64..2500.0,
            dy in -1500.0f64..1500.0
        ) {
            let state = replay(
                editor_with_badge_font(font_size),
                &[
                    down(1, BlockId::Badges, ADDITIVE),
                    down(1, BlockId::Avatar, ADDITIVE),
                    down(1, BlockId::Title, Modifiers::default()),
                    move_to(1, dx, dy, FREE),
                ],
            );
            let rects = state.interactive_rects();
            for block in [BlockId::Title, BlockId::Avatar, BlockId::Badges] {
                let rect = rects[block];
                prop_assert!(rect.x >= 0.0 && rect.y >= 0.0);
                prop_assert!(rect.right() <= 1200.0 + 1e-9);
                prop_assert!(rect.bottom() <= 630.0 + 1e-9);
            }
        }

        #[test]
        fn resized_rect_respects_minimum_and_canvas(
            dx in -2000.0f64..2000.0,
            dy in -2000.0f64..2000.0,
            handle in prop::sample::select(ResizeHandle::ALL.to_vec())
        ) {
            let minimum = BlockId::Description.minimum_size();
            let start = Rect::new(100.0, 275.0, 1000.0, 150.0);
            let rect = resized_rect(start, handle, dx, dy, minimum);
            prop_assert!(rect.w >= minimum.width && rect.h >= minimum.height);
            prop_assert!(rect.fits_canvas());

            let fixed = match handle {
                ResizeHandle::Nw => (rect.right(), rect.bottom(), start.right(), start.bottom()),
                ResizeHandle::Ne => (rect.x, rect.bottom(), start.x, start.bottom()),
                ResizeHandle::Sw => (rect.right(), rect.y, start.right(), start.y),
                ResizeHandle::Se => (rect.x, rect.y, start.x, start.y),
            };
            prop_assert!((fixed.0 - fixed.2).abs() < 1e-9);
            prop_assert!((fixed.1 - fixed.3).abs() < 1e-9);
        }
    }
}
