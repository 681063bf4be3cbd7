pub mod line;
pub mod login;
pub mod traits;

pub use line::LineMessenger;
pub use login::{LineLogin, LineProfile, TokenResponse};
pub use traits::Messenger;
