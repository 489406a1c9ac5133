//! Every image the game uses and how each one is sliced.
//!
//! Loading goes through an [`AssetProvider`], so the same code runs over PNG
//! files on disk or over blank buffers of the right size for headless runs.

use std::collections::BTreeMap;
use std::sync::Arc;

use dv_render::{AssetError, AssetProvider, SpriteSheet, SyntheticAssets};

use crate::background::{Background, Backdrop};
use crate::character::CharacterSheet;
use crate::hud::ControlsArt;
use crate::layout::LayoutArt;
use crate::level::ObjectCategory;
use crate::spell::SpellSheet;

pub mod ids {
    pub const DOG: &str = "dog";
    pub const CAT: &str = "cat";
    pub const SLIME: &str = "slime";
    pub const WATER_BALL: &str = "water_ball";
    pub const BEAR_TRAP: &str = "bear_trap";
    pub const PLATFORM: &str = "platform";
    pub const TREE_1: &str = "trees_front";
    pub const TREE_2: &str = "tree_2";
    pub const STONE: &str = "stone";
    pub const HOUSE_1: &str = "house_type1_front";
    pub const HOUSE_2: &str = "house_type2_front";
    pub const CAR: &str = "car_front";
    pub const SKY: &str = "sky";
    pub const HOUSES: &str = "houses";
    pub const FENCE: &str = "fence";
    pub const ROAD: &str = "road";
    pub const JOYSTICK: [&str; 5] = [
        "joystick_left",
        "joystick_middle",
        "joystick_right",
        "joystick_up",
        "joystick_down",
    ];
    pub const ATTACK_UP: &str = "button_up";
    pub const ATTACK_DOWN: &str = "button_down";
    pub const JUMP_UP: &str = "green_button_up";
    pub const JUMP_DOWN: &str = "green_button_down";
}

/// Dog and cat sheets share a layout: sheet row and frame count per
/// animation row (walk, idle, attack, death, hurt).
const ANIMAL_ROWS: [u32; 5] = [4, 3, 0, 1, 2];
const ANIMAL_FRAMES: [usize; 5] = [6, 4, 4, 4, 2];
const SLIME_ROWS: [u32; 5] = [2, 0, 3, 4, 1];
const SLIME_FRAMES: [usize; 5] = [4, 4, 5, 4, 4];
const SPELL_FRAMES: [usize; 3] = [7, 14, 15];
const TRAP_FRAMES: u32 = 4;

/// Image sizes of the shipped artwork. Used to build synthetic assets with
/// the real geometry when no asset directory is given.
const NOMINAL_SIZES: [(&str, u32, u32); 25] = [
    (ids::DOG, 288, 240),
    (ids::CAT, 288, 240),
    (ids::SLIME, 160, 185),
    (ids::WATER_BALL, 480, 96),
    (ids::BEAR_TRAP, 384, 48),
    (ids::PLATFORM, 96, 24),
    (ids::TREE_1, 120, 160),
    (ids::TREE_2, 100, 150),
    (ids::STONE, 48, 90),
    (ids::HOUSE_1, 200, 260),
    (ids::HOUSE_2, 220, 260),
    (ids::CAR, 160, 270),
    (ids::SKY, 480, 320),
    (ids::HOUSES, 480, 320),
    (ids::FENCE, 480, 270),
    (ids::ROAD, 480, 270),
    (ids::JOYSTICK[0], 32, 32),
    (ids::JOYSTICK[1], 32, 32),
    (ids::JOYSTICK[2], 32, 32),
    (ids::JOYSTICK[3], 32, 32),
    (ids::JOYSTICK[4], 32, 32),
    (ids::ATTACK_UP, 16, 16),
    (ids::ATTACK_DOWN, 16, 16),
    (ids::JUMP_UP, 16, 16),
    (ids::JUMP_DOWN, 16, 16),
];

pub fn nominal_assets() -> SyntheticAssets {
    NOMINAL_SIZES
        .iter()
        .fold(SyntheticAssets::new(), |assets, &(id, width, height)| {
            assets.with_size(id, width, height)
        })
}

pub struct GameArt {
    pub dog: Arc<CharacterSheet>,
    pub cat: Arc<CharacterSheet>,
    pub slime: Arc<CharacterSheet>,
    pub spell: Arc<SpellSheet>,
    pub layout: LayoutArt,
    pub backdrop: Backdrop,
    pub controls: ControlsArt,
}

impl GameArt {
    /// Load and slice every image. Any failure is fatal for the session.
    pub fn load(provider: &dyn AssetProvider) -> Result<Self, AssetError> {
        let grid = |id: &str, rows: u32, cols: u32| -> Result<SpriteSheet, AssetError> {
            SpriteSheet::slice(id, &provider.load_image(id)?, rows, cols)
        };
        let whole = |id: &str| grid(id, 1, 1);
        let character = |id: &str, rows: [u32; 5], frames: [usize; 5]| -> Result<_, AssetError> {
            let sheet = grid(id, 5, frames.iter().copied().max().unwrap_or(1) as u32)?;
            Ok(Arc::new(CharacterSheet::new(sheet, rows, frames)?))
        };

        let dog = character(ids::DOG, ANIMAL_ROWS, ANIMAL_FRAMES)?;
        let cat = character(ids::CAT, ANIMAL_ROWS, ANIMAL_FRAMES)?;
        let slime = character(ids::SLIME, SLIME_ROWS, SLIME_FRAMES)?;
        let spell = Arc::new(SpellSheet::new(
            grid(ids::WATER_BALL, 3, 15)?,
            SPELL_FRAMES,
        )?);

        let mut sheets = BTreeMap::new();
        for (category, id) in [
            (ObjectCategory::Tree1, ids::TREE_1),
            (ObjectCategory::Tree2, ids::TREE_2),
            (ObjectCategory::Stone, ids::STONE),
            (ObjectCategory::Platform, ids::PLATFORM),
            (ObjectCategory::House1, ids::HOUSE_1),
            (ObjectCategory::House2, ids::HOUSE_2),
            (ObjectCategory::Car, ids::CAR),
        ] {
            sheets.insert(category, whole(id)?);
        }
        sheets.insert(ObjectCategory::BearTrap, grid(ids::BEAR_TRAP, 1, TRAP_FRAMES)?);
        let layout = LayoutArt::new(sheets)?;

        let strip = |id: &str| -> Result<Background, AssetError> {
            let sheet = whole(id)?;
            // Strips sit on the bottom edge of the 320 px window.
            let y = (320.0 - sheet.frame_height()).max(0.0);
            Ok(Background::new(&sheet, y))
        };
        let backdrop = Backdrop {
            sky: strip(ids::SKY)?.with_speed_multiplier(0.7).with_drift(-0.5),
            houses: strip(ids::HOUSES)?.with_speed_multiplier(0.8),
            fence: strip(ids::FENCE)?,
            road: strip(ids::ROAD)?,
        };

        let controls = ControlsArt {
            joystick: [
                whole(ids::JOYSTICK[0])?,
                whole(ids::JOYSTICK[1])?,
                whole(ids::JOYSTICK[2])?,
                whole(ids::JOYSTICK[3])?,
                whole(ids::JOYSTICK[4])?,
            ],
            attack_up: whole(ids::ATTACK_UP)?,
            attack_down: whole(ids::ATTACK_DOWN)?,
            jump_up: whole(ids::JUMP_UP)?,
            jump_down: whole(ids::JUMP_DOWN)?,
        };

        log::info!("Loaded {} images", NOMINAL_SIZES.len());
        Ok(Self {
            dog,
            cat,
            slime,
            spell,
            layout,
            backdrop,
            controls,
        })
    }
}
