pub mod assets;
pub mod canvas;
pub mod sheet;
pub mod surface;

pub use assets::{AssetError, AssetProvider, DirectoryAssets, RawImage, SyntheticAssets};
pub use canvas::{Blit, Canvas, DrawCommand, DrawList, Rgba, Text, TextAlign};
pub use sheet::SpriteSheet;
pub use surface::{HeadlessSurface, Surface, SurfaceError};
