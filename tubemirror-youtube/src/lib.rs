//! # tubemirror-youtube
//!
//! [`YoutubeClient`] implements [`tubemirror_core::PlaylistSource`] over the
//! YouTube Data API v3 with blocking HTTP. [`auth`] manages the credentials
//! the client sends and refreshes.

pub mod api;
pub mod auth;
pub mod client;
pub mod error;

pub use auth::{Credentials, RefreshGrant};
pub use client::YoutubeClient;
pub use error::AuthError;
