mod layer;
mod stage;
mod tiled;
mod wave;

pub use layer::{ImageLayer, Layer, LayerScroll, Placement};

pub use stage::Stage;

pub use tiled::{BACKING_WIDTH, EMPTY_TILE, TILE_HEIGHT, TILE_WIDTH, TileLayer, Tilemap, TilemapError};

pub use wave::{RAMP_DENOM, RampLayer, WaveLayer};
