pub mod deck;
pub mod progress;
pub mod statistics;
pub mod user;

pub use deck::DeckRepository;
pub use progress::ProgressRepository;
pub use statistics::{CardStore, QuestionStore, ReviewableStore};
pub use user::UserRepository;
