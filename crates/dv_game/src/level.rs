//! Level description: where the player, the friendly cat, the slimes and the
//! static scenery start.
//!
//! Levels are JSON files (`version` "0.1"). The built-in Dogville street is
//! available as [`LevelFile::dogville`] so the game runs without any files.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use glam::DVec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use thiserror::Error;

const SUPPORTED_VERSION: &str = "0.1";

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("failed to read level file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse level JSON {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("level validation failed: {0}")]
    Invalid(String),
}

/// Kinds of static scenery. Declaration order is also the streaming order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectCategory {
    Tree1,
    Tree2,
    Stone,
    Platform,
    House1,
    House2,
    Car,
    BearTrap,
}

impl ObjectCategory {
    pub const ALL: [ObjectCategory; 8] = [
        ObjectCategory::Tree1,
        ObjectCategory::Tree2,
        ObjectCategory::Stone,
        ObjectCategory::Platform,
        ObjectCategory::House1,
        ObjectCategory::House2,
        ObjectCategory::Car,
        ObjectCategory::BearTrap,
    ];

    /// Drawn beneath the characters.
    pub const BACK_LAYER: [ObjectCategory; 4] = [
        ObjectCategory::House1,
        ObjectCategory::House2,
        ObjectCategory::Car,
        ObjectCategory::Tree2,
    ];

    /// Drawn above the characters.
    pub const FRONT_LAYER: [ObjectCategory; 4] = [
        ObjectCategory::Tree1,
        ObjectCategory::Platform,
        ObjectCategory::BearTrap,
        ObjectCategory::Stone,
    ];

    /// Level-space Y for objects of this category. Platforms stack upwards
    /// with their 1-based declaration ordinal.
    pub fn level_y(self, ordinal: u32) -> f64 {
        match self {
            Self::Tree1 => 130.0,
            Self::Tree2 => 142.0,
            Self::Stone => 202.0,
            Self::Platform => 280.0 - 40.0 * f64::from(ordinal),
            Self::House1 | Self::House2 => 30.0,
            Self::Car => 20.0,
            Self::BearTrap => 260.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct LevelPoint {
    pub x: f64,
    pub y: f64,
}

impl From<LevelPoint> for DVec2 {
    fn from(point: LevelPoint) -> Self {
        DVec2::new(point.x, point.y)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
pub struct ObjectPlacement {
    pub category: ObjectCategory,
    pub x: f64,
}

/// Slimes scattered uniformly over `[min_x, min_x + span)`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RandomEnemies {
    pub count: u32,
    pub min_x: f64,
    pub span: f64,
    /// Fixed seed for reproducible placement; fresh entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LevelFile {
    pub version: String,
    pub level_id: String,
    pub finish_point: f64,
    pub player_start: LevelPoint,
    pub npc: LevelPoint,
    #[serde(default = "default_enemy_y")]
    pub enemy_y: f64,
    #[serde(default)]
    pub fixed_enemies: Vec<f64>,
    #[serde(default)]
    pub random_enemies: Option<RandomEnemies>,
    #[serde(default)]
    pub objects: Vec<ObjectPlacement>,
}

impl LevelFile {
    pub fn dogville() -> Self {
        let placements: [(ObjectCategory, &[f64]); 8] = [
            (ObjectCategory::Tree1, &[0.0, 745.0, 830.0, 900.0]),
            (ObjectCategory::Car, &[1520.0]),
            (ObjectCategory::House1, &[280.0]),
            (ObjectCategory::House2, &[-40.0, 482.0]),
            (ObjectCategory::Tree2, &[1364.0]),
            (ObjectCategory::Stone, &[1442.0, 1470.0]),
            (ObjectCategory::Platform, &[1070.0, 1166.0, 1264.0]),
            (
                ObjectCategory::BearTrap,
                &[400.0, 600.0, 630.0, 1245.0, 1275.0, 1305.0, 1335.0, 1365.0],
            ),
        ];
        let objects = placements
            .iter()
            .flat_map(|(category, xs)| {
                xs.iter().map(|&x| ObjectPlacement {
                    category: *category,
                    x,
                })
            })
            .collect();

        Self {
            version: SUPPORTED_VERSION.to_string(),
            level_id: "dogville".to_string(),
            finish_point: 1680.0,
            player_start: LevelPoint { x: 100.0, y: 243.0 },
            npc: LevelPoint { x: 1730.0, y: 124.0 },
            enemy_y: default_enemy_y(),
            fixed_enemies: vec![1700.0, 1750.0],
            random_enemies: Some(RandomEnemies {
                count: 3,
                min_x: 400.0,
                span: 1000.0,
                seed: None,
            }),
            objects,
        }
    }

    /// Starting positions of every slime: random ones first, then fixed.
    pub fn enemy_positions(&self) -> Vec<DVec2> {
        let mut positions = Vec::new();
        if let Some(random) = &self.random_enemies {
            let mut rng = match random.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            for _ in 0..random.count {
                let x = random.min_x + rng.gen::<f64>() * random.span;
                positions.push(DVec2::new(x, self.enemy_y));
            }
        }
        positions.extend(self.fixed_enemies.iter().map(|&x| DVec2::new(x, self.enemy_y)));
        positions
    }

    pub fn placements(&self, category: ObjectCategory) -> impl Iterator<Item = f64> + '_ {
        self.objects
            .iter()
            .filter(move |placement| placement.category == category)
            .map(|placement| placement.x)
    }
}

pub fn load_level_from_path(path: &Path) -> Result<LevelFile, LevelError> {
    let raw = fs::read_to_string(path).map_err(|source| LevelError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let level: LevelFile = serde_json::from_str(&raw).map_err(|source| LevelError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate_level(&level)?;
    Ok(level)
}

pub fn validate_level(level: &LevelFile) -> Result<(), LevelError> {
    if level.version != SUPPORTED_VERSION {
        return Err(LevelError::Invalid(format!(
            "unsupported version '{}' (expected '{}')",
            level.version, SUPPORTED_VERSION
        )));
    }
    if level.level_id.trim().is_empty() {
        return Err(LevelError::Invalid("level_id is empty".to_string()));
    }

    let points = [
        level.finish_point,
        level.player_start.x,
        level.player_start.y,
        level.npc.x,
        level.npc.y,
        level.enemy_y,
    ];
    let placements = level.objects.iter().map(|placement| placement.x);
    if !points
        .into_iter()
        .chain(level.fixed_enemies.iter().copied())
        .chain(placements)
        .all(f64::is_finite)
    {
        return Err(LevelError::Invalid("coordinates must be finite".to_string()));
    }
    if let Some(random) = &level.random_enemies {
        if !(random.min_x.is_finite() && random.span.is_finite() && random.span >= 0.0) {
            return Err(LevelError::Invalid(
                "random_enemies needs a finite min_x and a non-negative span".to_string(),
            ));
        }
    }

    let mut seen = HashSet::new();
    for placement in &level.objects {
        if !seen.insert((placement.category, placement.x.to_bits())) {
            return Err(LevelError::Invalid(format!(
                "duplicate {:?} placement at x={}",
                placement.category, placement.x
            )));
        }
    }
    if level.objects.is_empty() {
        log::warn!(
            "Level '{}' has no static objects. This is allowed but often accidental.",
            level.level_id
        );
    }
    Ok(())
}

const fn default_enemy_y() -> f64 {
    254.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "dv_level_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn builtin_level_is_valid() {
        let level = LevelFile::dogville();
        validate_level(&level).expect("built-in level validates");
        assert_eq!(level.placements(ObjectCategory::BearTrap).count(), 8);
        assert_eq!(
            level.placements(ObjectCategory::Platform).collect::<Vec<_>>(),
            vec![1070.0, 1166.0, 1264.0]
        );
        // Three random slimes plus the two guarding the cat.
        assert_eq!(level.enemy_positions().len(), 5);
    }

    #[test]
    fn seeded_enemy_placement_is_reproducible() {
        let mut level = LevelFile::dogville();
        if let Some(random) = level.random_enemies.as_mut() {
            random.seed = Some(7);
        }
        let first = level.enemy_positions();
        let second = level.enemy_positions();
        assert_eq!(first, second);
        for position in &first[..3] {
            assert!((400.0..1400.0).contains(&position.x));
            assert_eq!(position.y, 254.0);
        }
    }

    #[test]
    fn platform_heights_stack_by_ordinal() {
        assert_eq!(ObjectCategory::Platform.level_y(1), 240.0);
        assert_eq!(ObjectCategory::Platform.level_y(3), 160.0);
        assert_eq!(ObjectCategory::BearTrap.level_y(0), 260.0);
    }

    #[test]
    fn level_file_parses() {
        let path = temp_file_path("parse");
        fs::write(
            &path,
            r#"{
              "version": "0.1",
              "level_id": "short",
              "finish_point": 600.0,
              "player_start": { "x": 50.0, "y": 243.0 },
              "npc": { "x": 650.0, "y": 124.0 },
              "fixed_enemies": [500.0],
              "objects": [
                { "category": "platform", "x": 300.0 },
                { "category": "bear_trap", "x": 420.0 }
              ]
            }"#,
        )
        .expect("write level file");

        let level = load_level_from_path(&path).expect("level should load");
        assert_eq!(level.enemy_y, 254.0);
        assert!(level.random_enemies.is_none());
        assert_eq!(level.enemy_positions(), vec![DVec2::new(500.0, 254.0)]);
        assert_eq!(level.objects[1].category, ObjectCategory::BearTrap);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn bundled_seeded_level_matches_the_builtin_street() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/dogville_seeded.json");
        let level = load_level_from_path(&path).expect("bundled level loads");
        let builtin = LevelFile::dogville();
        assert_eq!(level.objects, builtin.objects);
        assert_eq!(level.finish_point, builtin.finish_point);
        assert_eq!(level.enemy_positions(), level.enemy_positions());
    }

    #[test]
    fn wrong_version_is_rejected() {
        let mut level = LevelFile::dogville();
        level.version = "2.0".to_string();
        let err = validate_level(&level).expect_err("version mismatch");
        assert!(err.to_string().contains("2.0"));
    }

    #[test]
    fn duplicate_placements_are_rejected() {
        let mut level = LevelFile::dogville();
        level.objects.push(ObjectPlacement {
            category: ObjectCategory::Stone,
            x: 1442.0,
        });
        assert!(validate_level(&level).is_err());
    }
}
