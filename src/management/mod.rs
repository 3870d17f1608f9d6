mod session;
mod token;

pub use session::Session;
pub use session::SessionState;
pub use token::Authorizer;
pub use token::BrowserAuthorizer;
pub use token::FileTokenStore;
pub use token::TokenManager;
pub use token::TokenSource;
pub use token::TokenStatus;
pub use token::TokenStore;
pub use token::resolve_token;
pub use token::token_from_callback_url;
