mod behavior;
mod bullet;
mod enemy;
mod explosion;
mod hud;
mod player;
mod powerup;
mod session;
mod spawn;
mod sprite;
mod weapon;
mod world;

pub use behavior::{Behavior, Entity, Inert, Status};
pub use bullet::{Bullet, TRACK_VEL};
pub use enemy::Enemy;
pub use explosion::{Explosion, ExplosionSize};
pub use hud::{draw_hud, draw_number};
pub use player::{INVULNERABLE_TICKS, Player, RESPAWN_TICKS};
pub use powerup::{Powerup, collect};
pub use session::{Session, SessionEvent, SessionSetup};
pub use spawn::spawn_object;
pub use sprite::{GRID_CELLS, Hitbox, Sprite, SpriteId, SpriteKind};
pub use weapon::fire;
pub use world::{
    Context, GameSheets, LAYER_BACK, LAYER_BULLET, LAYER_COUNT, LAYER_EFFECT, LAYER_ENEMY, LAYER_PLAYER,
    MAX_SPEED, MIN_SPEED, OFF_SCREEN_MARGIN, PlayerState, World,
};
