//! Operational commands run from the command line.
//!
//! | Command | Description |
//! |---------|-------------|
//! | [`seed`] | Replace all vessel data with 30 days of demo data |
//! | [`demo_users`] | Create the demo admin and regular accounts |
//! | [`dev_server`] | Start the frontend dev server on a background thread |

pub mod demo_users;
pub mod dev_server;
pub mod seed;
