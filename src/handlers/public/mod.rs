// Public handlers: no session required.
pub mod auth;
pub mod health;
pub mod pages;
