//! Doom engine WAD container support.
//!
//! This crate reads the directory table of IWAD/PWAD files without loading
//! lump data, and knows the names and titles of the commercial and free
//! base games:
//!
//! - Directory parsing and level-marker extraction ([`wad`])
//! - Known IWAD lookup table ([`iwad`])

pub mod iwad;
pub mod wad;

pub use iwad::{IwadInfo, KNOWN_IWADS, iwad_info, iwad_title};
pub use wad::{
    Lump, WadDirectory, WadError, WadKind, is_map_marker, map_marker_lumps, map_string_from_wad,
    read_directory, read_lump_data, read_map_names,
};
