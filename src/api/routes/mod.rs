pub mod admin;
pub mod auth;
pub mod history;
pub mod participants;
pub mod ranking;
pub mod teams;
