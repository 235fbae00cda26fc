// Password auth: argon2 hashes, HS256 bearer tokens, and a security-question reset flow.

pub mod extractor;
pub mod handlers;
pub mod password;
pub mod token;
pub mod users;
pub mod validation;
