pub mod matcher;
pub mod tokens;
pub mod window;

pub use matcher::{find_tokens, MatchFinder};
pub use tokens::LZ77Token;
pub use window::OutputWindow;
