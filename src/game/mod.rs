/// Built-in language tables and JSON game configuration.
pub mod config;
pub mod movegen;
/// Tile racks.
pub mod rack;
/// Board rows and squares.
pub mod row;
/// Letter point values.
pub mod scoring;

pub use config::{ConfigError, GameConfig, Language, TileBag};
pub use movegen::{MoveGenerator, Plays, DEFAULT_LEFT_LIMIT};
pub use rack::Rack;
pub use row::{ParseError, Row, Square};
pub use scoring::{ScoreError, ScoreTable};
