pub mod catalog;
pub mod colocation;
pub mod constants;
pub mod overpass;
pub mod overpass_errors;
pub mod pipeline;
pub mod time;
pub mod tracks;
