// Resume parsing: file selection, upload, normalization of the parser's answer.
// All calls to the parsing API go through affinda_client.

pub mod controller;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod raw;
pub mod sessions;
