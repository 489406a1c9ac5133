//! The friendly cat waiting on the car at the end of the street.

use crate::audio::Sound;
use crate::character::{Actor, Behaviour, Character};

pub struct NpcContext<'a> {
    pub player: &'a Character,
}

/// Watches the player and idles. Never moves, never attacks.
#[derive(Debug, Clone, Default)]
pub struct NpcBehaviour;

pub type Npc = Actor<NpcBehaviour>;

impl Behaviour for NpcBehaviour {
    type Context<'a> = NpcContext<'a>;
    type Output = ();

    fn update(&mut self, character: &mut Character, context: NpcContext<'_>) {
        character
            .body
            .face_towards(character.center(), context.player.center());
        character.tick_animation();
    }

    fn death_sound(&self) -> Option<Sound> {
        None
    }
}
