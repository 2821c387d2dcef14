//! Identity verification

mod jwt;

pub use jwt::{Claims, JwtService, TokenType};
