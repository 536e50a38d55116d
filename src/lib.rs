//! India Finance Pulse - a recent-headlines dashboard
//!
//! This crate fetches a fixed set of market news feeds, normalizes their
//! timestamps to IST, keeps each source's recent items (or its newest one
//! when nothing is recent), and merges everything into one card page.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod item;
pub mod parser;
pub mod registry;
pub mod routes;
pub mod window;
