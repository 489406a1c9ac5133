//! Static level objects and the collision queries over them.
//!
//! Scenery is declared once as `(category, x)` placements. Only objects near
//! the view are instantiated: each update, pending placements that come
//! within one window width of the scroll offset become active objects, and
//! active objects that leave that band are evicted back to pending. An
//! evicted entry keeps everything needed to rebuild the same object (exact
//! X, platform ordinal, trap phase), so streaming never changes the level.
//!
//! Tie-break for overlapping platforms or traps is first match in category
//! iteration order. Level design does not overlap them.

use std::collections::BTreeMap;

use dv_core::Rect;
use dv_render::{AssetError, Blit, Canvas, SpriteSheet};
use glam::DVec2;

use crate::background::Backdrop;
use crate::level::{LevelFile, ObjectCategory};
use crate::trap::{BearTrap, TrapPhase};
use crate::viewport::GameView;

/// Platform top surface: a thin band this many pixels below the image top.
const PLATFORM_SURFACE_INSET: f64 = 10.0;
const PLATFORM_SURFACE_THICKNESS: f64 = 3.0;

/// One sheet per category. The bear trap sheet is a 1x4 frame strip, every
/// other category a single image.
#[derive(Debug, Clone)]
pub struct LayoutArt {
    sheets: BTreeMap<ObjectCategory, SpriteSheet>,
}

impl LayoutArt {
    pub fn new(sheets: BTreeMap<ObjectCategory, SpriteSheet>) -> Result<Self, AssetError> {
        if let Some(missing) = ObjectCategory::ALL
            .iter()
            .find(|category| !sheets.contains_key(category))
        {
            return Err(AssetError::UnknownId(format!("{missing:?}")));
        }
        Ok(Self { sheets })
    }

    fn sheet(&self, category: ObjectCategory) -> Option<&SpriteSheet> {
        self.sheets.get(&category)
    }

    fn frame_size(&self, category: ObjectCategory) -> (f64, f64) {
        self.sheet(category)
            .map(|sheet| (sheet.frame_width(), sheet.frame_height()))
            .unwrap_or((0.0, 0.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingEntry {
    x: f64,
    /// 1-based declaration index within the category.
    ordinal: u32,
    trap_phase: TrapPhase,
}

#[derive(Debug, Clone)]
pub enum StaticObject {
    Scenery {
        category: ObjectCategory,
        position: DVec2,
        ordinal: u32,
    },
    Platform {
        position: DVec2,
        ordinal: u32,
    },
    Trap {
        trap: BearTrap,
        ordinal: u32,
    },
}

impl StaticObject {
    fn spawn(category: ObjectCategory, entry: PendingEntry, updates_per_frame: u32) -> Self {
        let position = DVec2::new(entry.x, category.level_y(entry.ordinal));
        match category {
            ObjectCategory::Platform => Self::Platform {
                position,
                ordinal: entry.ordinal,
            },
            ObjectCategory::BearTrap => Self::Trap {
                trap: BearTrap::new(position, entry.trap_phase, updates_per_frame),
                ordinal: entry.ordinal,
            },
            _ => Self::Scenery {
                category,
                position,
                ordinal: entry.ordinal,
            },
        }
    }

    fn to_pending(&self) -> PendingEntry {
        match self {
            Self::Scenery {
                position, ordinal, ..
            }
            | Self::Platform { position, ordinal } => PendingEntry {
                x: position.x,
                ordinal: *ordinal,
                trap_phase: TrapPhase::Unarmed,
            },
            Self::Trap { trap, ordinal } => PendingEntry {
                x: trap.position().x,
                ordinal: *ordinal,
                trap_phase: trap.phase(),
            },
        }
    }

    pub fn category(&self) -> ObjectCategory {
        match self {
            Self::Scenery { category, .. } => *category,
            Self::Platform { .. } => ObjectCategory::Platform,
            Self::Trap { .. } => ObjectCategory::BearTrap,
        }
    }

    pub fn position(&self) -> DVec2 {
        match self {
            Self::Scenery { position, .. } | Self::Platform { position, .. } => *position,
            Self::Trap { trap, .. } => trap.position(),
        }
    }

    /// Top-surface band that supports a body `query_width` wide. The band is
    /// narrowed by half the body width on each side, so support requires the
    /// body's centre to be over the platform.
    pub fn support_band(&self, platform_width: f64, query_width: f64) -> Option<Rect> {
        match self {
            Self::Platform { position, .. } => {
                let left = position.x + query_width / 2.0;
                let top = position.y + PLATFORM_SURFACE_INSET;
                Some(Rect::new(
                    left,
                    top,
                    left + platform_width - query_width,
                    top + PLATFORM_SURFACE_THICKNESS,
                ))
            }
            _ => None,
        }
    }

    pub fn trap(&self) -> Option<&BearTrap> {
        match self {
            Self::Trap { trap, .. } => Some(trap),
            _ => None,
        }
    }

    fn trap_mut(&mut self) -> Option<&mut BearTrap> {
        match self {
            Self::Trap { trap, .. } => Some(trap),
            _ => None,
        }
    }

    fn update(&mut self) {
        if let Some(trap) = self.trap_mut() {
            trap.update();
        }
    }

    fn draw(&self, canvas: &mut dyn Canvas, view: &GameView, sheet: &SpriteSheet) {
        if let Some(trap) = self.trap() {
            trap.draw(canvas, view, sheet);
            return;
        }
        let window = view.to_window_space(self.position());
        canvas.blit(Blit {
            image: sheet.image().clone(),
            src: sheet.frame_rect(0, 0),
            dst: Rect::from_origin_size(
                window.x,
                window.y,
                sheet.frame_width(),
                sheet.frame_height(),
            ),
            flip_x: false,
            rotation_deg: 0.0,
        });
    }
}

/// Result of a trap query for one foot zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrapContact {
    /// The query sprang a previously unarmed trap.
    pub sprung: bool,
    /// The touched trap is in its damaging phase.
    pub in_action: bool,
}

pub struct LevelLayout {
    pending: BTreeMap<ObjectCategory, Vec<PendingEntry>>,
    active: BTreeMap<ObjectCategory, Vec<StaticObject>>,
    art: LayoutArt,
    backdrop: Backdrop,
    updates_per_frame: u32,
}

impl LevelLayout {
    /// Build the layout and stream in whatever is already near `view`.
    pub fn new(
        level: &LevelFile,
        art: LayoutArt,
        backdrop: Backdrop,
        updates_per_frame: u32,
        view: &GameView,
    ) -> Self {
        let mut pending = BTreeMap::new();
        for category in ObjectCategory::ALL {
            let entries: Vec<PendingEntry> = level
                .placements(category)
                .zip(1u32..)
                .map(|(x, ordinal)| PendingEntry {
                    x,
                    ordinal,
                    trap_phase: TrapPhase::Unarmed,
                })
                .collect();
            pending.insert(category, entries);
        }
        let mut layout = Self {
            pending,
            active: BTreeMap::new(),
            art,
            backdrop,
            updates_per_frame,
        };
        layout.stream(view);
        layout
    }

    /// Scroll the backdrop, stream objects in and out, and animate traps.
    pub fn update(&mut self, view: &GameView) {
        self.backdrop.update(view);
        self.stream(view);
    }

    fn stream(&mut self, view: &GameView) {
        for (category, entries) in self.pending.iter_mut() {
            let (entering, waiting): (Vec<_>, Vec<_>) = std::mem::take(entries)
                .into_iter()
                .partition(|entry| view.is_within_window(entry.x));
            *entries = waiting;
            if entering.is_empty() {
                continue;
            }
            let active = self.active.entry(*category).or_default();
            for entry in entering {
                log::trace!("Streaming in {:?} at x={}", category, entry.x);
                active.push(StaticObject::spawn(*category, entry, self.updates_per_frame));
            }
        }

        for (category, objects) in self.active.iter_mut() {
            for object in objects.iter_mut() {
                object.update();
            }
            let (staying, leaving): (Vec<_>, Vec<_>) = std::mem::take(objects)
                .into_iter()
                .partition(|object| view.is_within_window(object.position().x));
            *objects = staying;
            let pending = self.pending.entry(*category).or_default();
            for object in leaving {
                log::trace!("Streaming out {:?} at x={}", category, object.position().x);
                pending.push(object.to_pending());
            }
        }
    }

    pub fn active(&self, category: ObjectCategory) -> &[StaticObject] {
        self.active.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// X positions waiting to be streamed in.
    pub fn pending_positions(&self, category: ObjectCategory) -> Vec<f64> {
        self.pending
            .get(&category)
            .map(|entries| entries.iter().map(|entry| entry.x).collect())
            .unwrap_or_default()
    }

    /// Surface Y of the first active platform whose top band overlaps
    /// `query`, or `None` when nothing supports it.
    pub fn platform_support_at(&self, query: Rect) -> Option<f64> {
        let (platform_width, _) = self.art.frame_size(ObjectCategory::Platform);
        self.active(ObjectCategory::Platform)
            .iter()
            .filter_map(|platform| platform.support_band(platform_width, query.width()))
            .find(|band| band.intersects(&query))
            .map(|band| band.top)
    }

    /// Test `foot` against the jaws of every active trap. The first trap hit
    /// is sprung (if still unarmed) and its state reported.
    pub fn trap_state_at(&mut self, foot: Rect) -> TrapContact {
        let (frame_width, frame_height) = self.art.frame_size(ObjectCategory::BearTrap);
        let Some(traps) = self.active.get_mut(&ObjectCategory::BearTrap) else {
            return TrapContact::default();
        };
        for trap in traps.iter_mut().filter_map(StaticObject::trap_mut) {
            if trap.trigger_rect(frame_width, frame_height).intersects(&foot) {
                let sprung = trap.trigger();
                if sprung {
                    log::debug!("Bear trap at x={} sprung", trap.position().x);
                }
                return TrapContact {
                    sprung,
                    in_action: trap.is_in_action(),
                };
            }
        }
        TrapContact::default()
    }

    fn draw_layer(&self, canvas: &mut dyn Canvas, view: &GameView, layer: &[ObjectCategory]) {
        for &category in layer {
            let Some(sheet) = self.art.sheet(category) else {
                continue;
            };
            for object in self.active(category) {
                object.draw(canvas, view, sheet);
            }
        }
    }

    /// Sky, houses, back-layer objects and the fence.
    pub fn draw_back(&self, canvas: &mut dyn Canvas, view: &GameView) {
        self.backdrop.sky.draw(canvas, view);
        self.backdrop.houses.draw(canvas, view);
        self.draw_layer(canvas, view, &ObjectCategory::BACK_LAYER);
        self.backdrop.fence.draw(canvas, view);
    }

    /// Front-layer objects and the road.
    pub fn draw_front(&self, canvas: &mut dyn Canvas, view: &GameView) {
        self.draw_layer(canvas, view, &ObjectCategory::FRONT_LAYER);
        self.backdrop.road.draw(canvas, view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{nominal_assets, GameArt};
    use crate::level::ObjectPlacement;
    use dv_render::DrawList;

    fn level_with(objects: &[(ObjectCategory, f64)]) -> LevelFile {
        let mut level = LevelFile::dogville();
        level.objects = objects
            .iter()
            .map(|&(category, x)| ObjectPlacement { category, x })
            .collect();
        level
    }

    fn layout_for(level: &LevelFile, view: &GameView) -> LevelLayout {
        let art = GameArt::load(&nominal_assets()).expect("nominal art");
        LevelLayout::new(level, art.layout, art.backdrop, 6, view)
    }

    fn scroll_to(view: &mut GameView, offset: f64) {
        view.set_moving(true);
        view.set_velocity_x(offset - view.offset_x());
        view.update();
        view.set_moving(false);
        view.set_velocity_x(0.0);
    }

    #[test]
    fn only_nearby_objects_are_active() {
        let level = LevelFile::dogville();
        let view = GameView::new(480.0);
        let layout = layout_for(&level, &view);

        let trees: Vec<f64> = layout
            .active(ObjectCategory::Tree1)
            .iter()
            .map(|tree| tree.position().x)
            .collect();
        assert_eq!(trees, vec![0.0]);
        assert_eq!(layout.pending_positions(ObjectCategory::Tree1), vec![745.0, 830.0, 900.0]);
        assert_eq!(layout.active(ObjectCategory::BearTrap).len(), 1);
        assert!(layout.active(ObjectCategory::Platform).is_empty());
    }

    #[test]
    fn evicted_objects_return_unchanged() {
        let level = level_with(&[
            (ObjectCategory::Platform, 1070.0),
            (ObjectCategory::Platform, 1166.5),
            (ObjectCategory::Stone, 1442.25),
        ]);
        let mut view = GameView::new(480.0);
        let mut layout = layout_for(&level, &view);
        assert!(layout.active(ObjectCategory::Platform).is_empty());

        for _ in 0..3 {
            scroll_to(&mut view, 1000.0);
            layout.update(&view);
            let platforms: Vec<DVec2> = layout
                .active(ObjectCategory::Platform)
                .iter()
                .map(StaticObject::position)
                .collect();
            assert_eq!(
                platforms,
                vec![DVec2::new(1070.0, 240.0), DVec2::new(1166.5, 200.0)]
            );
            assert_eq!(layout.active(ObjectCategory::Stone)[0].position().x, 1442.25);

            scroll_to(&mut view, 0.0);
            layout.update(&view);
            assert!(layout.active(ObjectCategory::Platform).is_empty());
            let mut pending = layout.pending_positions(ObjectCategory::Platform);
            pending.sort_by(f64::total_cmp);
            assert_eq!(pending, vec![1070.0, 1166.5]);
        }
    }

    #[test]
    fn platform_supports_body_centred_over_it() {
        let level = level_with(&[(ObjectCategory::Platform, 300.0)]);
        let view = GameView::new(480.0);
        let layout = layout_for(&level, &view);
        // Platform 1: image top at 240, surface at 250, 96 px wide.
        let standing = Rect::from_origin_size(320.0, 249.0, 48.0, 3.0);
        assert_eq!(layout.platform_support_at(standing), Some(250.0));

        // Centre just past the right edge.
        let overhanging = Rect::from_origin_size(373.0, 249.0, 48.0, 3.0);
        assert_eq!(layout.platform_support_at(overhanging), None);

        let below = Rect::from_origin_size(320.0, 290.0, 48.0, 3.0);
        assert_eq!(layout.platform_support_at(below), None);

        let degenerate = Rect::from_origin_size(320.0, 249.0, 0.0, 0.0);
        assert_eq!(layout.platform_support_at(degenerate), None);
    }

    #[test]
    fn trap_springs_once_and_keeps_phase_across_streaming() {
        let level = level_with(&[(ObjectCategory::BearTrap, 400.0)]);
        let mut view = GameView::new(480.0);
        let mut layout = layout_for(&level, &view);
        let foot = Rect::new(410.0, 275.0, 458.0, 291.0);

        let first = layout.trap_state_at(foot);
        assert!(first.sprung);
        assert!(!first.in_action);
        assert!(!layout.trap_state_at(foot).sprung);

        let mut damaging = 0;
        for _ in 0..30 {
            layout.update(&view);
            if layout.trap_state_at(foot).in_action {
                damaging += 1;
            }
        }
        assert_eq!(damaging, 6);

        scroll_to(&mut view, 1200.0);
        layout.update(&view);
        assert!(layout.active(ObjectCategory::BearTrap).is_empty());
        scroll_to(&mut view, 0.0);
        layout.update(&view);
        let trap = layout.active(ObjectCategory::BearTrap)[0]
            .trap()
            .expect("trap object");
        assert_eq!(trap.phase(), TrapPhase::Spent);
        assert_eq!(layout.trap_state_at(foot), TrapContact::default());
    }

    #[test]
    fn missing_trap_contact_is_quiet() {
        let level = level_with(&[(ObjectCategory::BearTrap, 400.0)]);
        let view = GameView::new(480.0);
        let mut layout = layout_for(&level, &view);
        let foot = Rect::new(100.0, 275.0, 148.0, 291.0);
        assert_eq!(layout.trap_state_at(foot), TrapContact::default());
    }

    #[test]
    fn layers_draw_in_fixed_order() {
        let level = level_with(&[
            (ObjectCategory::Stone, 10.0),
            (ObjectCategory::House1, 20.0),
            (ObjectCategory::Tree1, 30.0),
            (ObjectCategory::Car, 40.0),
        ]);
        let view = GameView::new(480.0);
        let layout = layout_for(&level, &view);
        let mut list = DrawList::new();
        layout.draw_back(&mut list, &view);
        layout.draw_front(&mut list, &view);
        let images: Vec<&str> = list.blitted_images().collect();
        assert_eq!(
            images,
            vec![
                "sky",
                "houses",
                "house_type1_front",
                "car_front",
                "fence",
                "trees_front",
                "stone",
                "road"
            ]
        );
    }
}
