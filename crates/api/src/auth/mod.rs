//! Credentials and tokens: [`password`] hashes `users.password_hash`,
//! [`jwt`] issues and checks the bearer tokens handed out at login.

pub mod jwt;
pub mod password;
