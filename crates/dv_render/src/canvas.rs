//! Drawing primitives the game renders through.
//!
//! Everything the simulation draws is expressed as image-region blits plus
//! solid rectangles and text. A host backend implements [`Canvas`] over its
//! real surface; [`DrawList`] records the commands instead, which is what the
//! headless runner presents and what tests inspect.

use std::sync::Arc;

use dv_core::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// Copy `src` (pixels of the image `image`) into `dst` (game-window pixels).
#[derive(Debug, Clone, PartialEq)]
pub struct Blit {
    pub image: Arc<str>,
    pub src: Rect,
    pub dst: Rect,
    /// Mirror horizontally around the destination centre.
    pub flip_x: bool,
    /// Clockwise rotation around the destination centre.
    pub rotation_deg: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub content: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub color: Rgba,
    pub align: TextAlign,
}

pub trait Canvas {
    fn blit(&mut self, blit: Blit);
    fn fill_rect(&mut self, rect: Rect, color: Rgba);
    fn text(&mut self, text: Text);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Blit(Blit),
    FillRect { rect: Rect, color: Rgba },
    Text(Text),
}

/// A canvas that records commands in submission order.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Images blitted, in draw order.
    pub fn blitted_images(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Blit(blit) => Some(&*blit.image),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text(text) => Some(text.content.as_str()),
            _ => None,
        })
    }
}

impl Canvas for DrawList {
    fn blit(&mut self, blit: Blit) {
        self.commands.push(DrawCommand::Blit(blit));
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn text(&mut self, text: Text) {
        self.commands.push(DrawCommand::Text(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_list_records_in_order() {
        let mut list = DrawList::new();
        list.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Rgba::BLACK);
        list.blit(Blit {
            image: Arc::from("sky"),
            src: Rect::new(0.0, 0.0, 4.0, 4.0),
            dst: Rect::new(0.0, 0.0, 4.0, 4.0),
            flip_x: false,
            rotation_deg: 0.0,
        });
        list.text(Text {
            content: "UPS: 60.00".to_string(),
            x: 350.0,
            y: 30.0,
            size: 20.0,
            color: Rgba::BLACK,
            align: TextAlign::Left,
        });
        assert_eq!(list.len(), 3);
        assert!(matches!(list.commands()[0], DrawCommand::FillRect { .. }));
        assert_eq!(list.blitted_images().collect::<Vec<_>>(), vec!["sky"]);
        assert_eq!(list.texts().collect::<Vec<_>>(), vec!["UPS: 60.00"]);
        list.clear();
        assert!(list.is_empty());
    }

    #[test]
    fn with_alpha_keeps_channels() {
        let c = Rgba::new(211, 210, 157, 255).with_alpha(40);
        assert_eq!(c, Rgba::new(211, 210, 157, 40));
    }
}
