mod action;
mod position;
pub mod rules;
mod types;

pub use action::{Move, MoveError};
pub use position::{InvalidSquare, Position};
pub use rules::Outcome;
pub use types::{Board, InvalidPlayerId, Player, PlayerId, Square};
