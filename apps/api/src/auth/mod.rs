// Accounts and bearer-token sessions.
// Tokens are "<user_id>.<suffix>" and are only trusted after a match against
// the stored token list of that user.

pub mod google;
pub mod handlers;
pub mod middleware;
pub mod password;
pub mod session;
