pub mod profile;
pub mod songs;
