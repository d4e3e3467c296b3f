//! Streaming source extraction for anime3rb episodes.
//!
//! The episode page only links to a player page, and the player page keeps
//! its streams in an inline script array. [`resolver::EpisodeResolver`]
//! walks both hops and returns the quality labels with decoded URLs.

pub mod command;
pub mod entities;
pub mod error;
pub mod fetcher;
pub mod info;
pub mod markers;
pub mod render;
pub mod resolver;
pub mod site;
pub mod sources;
