//! Known base-game (IWAD) files.
//!
//! Lookups ignore case and extension, so `doom2.wad`, `DOOM2.WAD`,
//! `doom2.zip` and `DOOM2` all resolve to the same entry.

use wadshelf_core::util::stem;

/// A base game the library knows by file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IwadInfo {
    /// Upper-case file stem, e.g. `"DOOM2"`.
    pub file_name: &'static str,
    pub title: &'static str,
    /// Whether the game is published on the remote metadata source.
    ///
    /// Commercial IWADs are not, so their records are left alone during a
    /// metadata refresh.
    pub has_metadata: bool,
}

const fn iwad(file_name: &'static str, title: &'static str, has_metadata: bool) -> IwadInfo {
    IwadInfo {
        file_name,
        title,
        has_metadata,
    }
}

pub static KNOWN_IWADS: &[IwadInfo] = &[
    iwad("DOOM", "The Ultimate Doom", false),
    iwad("DOOM1", "Doom Shareware", false),
    iwad("DOOM2", "Doom II: Hell on Earth", false),
    iwad("PLUTONIA", "Final Doom: The Plutonia Experiment", false),
    iwad("TNT", "Final Doom: TNT - Evilution", false),
    iwad("HERETIC", "Heretic: Shadow of the Serpent Riders", false),
    iwad("HERETIC1", "Heretic Shareware", false),
    iwad("HEXEN", "Hexen: Beyond Heretic", false),
    iwad("HEXDD", "Hexen: Deathkings of the Dark Citadel", false),
    iwad("STRIFE1", "Strife: Quest for the Sigil", false),
    iwad("CHEX", "Chex Quest", true),
    iwad("CHEX3", "Chex Quest 3", true),
    iwad("HACX", "HacX: Twitch 'n Kill", true),
    iwad("FREEDOOM1", "Freedoom: Phase 1", false),
    iwad("FREEDOOM2", "Freedoom: Phase 2", false),
    iwad("FREEDM", "FreeDM", false),
];

/// Look up a known base game by file name.
pub fn iwad_info(name: &str) -> Option<&'static IwadInfo> {
    let key = stem(name);
    KNOWN_IWADS
        .iter()
        .find(|i| i.file_name.eq_ignore_ascii_case(key))
}

/// Display title for a base game, falling back to the upper-cased stem for
/// files not in the table.
pub fn iwad_title(name: &str) -> String {
    match iwad_info(name) {
        Some(info) => info.title.to_string(),
        None => stem(name).to_ascii_uppercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case_and_extension() {
        for name in ["doom2.wad", "DOOM2.WAD", "Doom2", "doom2.zip", "iwads/DOOM2.pk3"] {
            let info = iwad_info(name).unwrap();
            assert_eq!(info.file_name, "DOOM2", "lookup of {name}");
        }
    }

    #[test]
    fn test_unknown_iwad() {
        assert!(iwad_info("scythe.wad").is_none());
        assert_eq!(iwad_title("myiwad.wad"), "MYIWAD");
    }

    #[test]
    fn test_titles() {
        assert_eq!(iwad_title("tnt.wad"), "Final Doom: TNT - Evilution");
        assert_eq!(iwad_title("FREEDOOM1.WAD"), "Freedoom: Phase 1");
    }

    #[test]
    fn test_metadata_flag() {
        assert!(!iwad_info("doom2.wad").unwrap().has_metadata);
        assert!(iwad_info("chex.wad").unwrap().has_metadata);
    }

    #[test]
    fn test_table_names_are_unique_and_upper_case() {
        let mut names: Vec<_> = KNOWN_IWADS.iter().map(|i| i.file_name).collect();
        assert!(names.iter().all(|n| *n == n.to_ascii_uppercase()));
        names.sort();
        names.dedup();
        assert_eq!(names.len(), KNOWN_IWADS.len());
    }
}
