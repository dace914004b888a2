//! Concrete scenes: menu, the run itself, game over and the local ranking.

mod game_over;
mod gameplay;
mod menu;
mod ranking;

pub use game_over::GameOverScene;
pub use gameplay::GameplayScene;
pub use menu::MenuScene;
pub use ranking::RankingScene;
