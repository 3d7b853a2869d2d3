//! Minecraft version label to resource-pack format table
//!
//! `pack.mcmeta` declares compatibility through an integer `pack_format`.
//! The labels below are what users pick from; each covers a range of game
//! releases sharing one format number.

/// Newest format in [`VERSION_FORMATS`] (1.20.x), used for unrecognized labels.
pub const DEFAULT_PACK_FORMAT: u32 = 15;

/// Supported version labels, newest first.
pub const VERSION_FORMATS: &[(&str, u32)] = &[
    ("1.20.x", 15),
    ("1.19.x", 13),
    ("1.18.x", 8),
    ("1.17.x", 7),
    ("1.16.x", 6),
    ("1.15–1.13", 5),
    ("1.12–1.11", 3),
    ("1.10–1.6", 2),
    ("1.5", 1),
];

/// Label selected when none is given.
pub const DEFAULT_VERSION_LABEL: &str = "1.20.x";

/// Outcome of resolving a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackFormat {
    /// The format number to write
    pub format: u32,
    /// `false` when the label was unknown and [`DEFAULT_PACK_FORMAT`] was used
    pub known: bool,
}

/// Look up the pack format for a label.
///
/// Range labels use an en dash (`1.15–1.13`); an ASCII hyphen is accepted in
/// its place so the labels can be typed on a command line.
///
/// # Examples
///
/// ```
/// use mctex::versions::pack_format;
///
/// assert_eq!(pack_format("1.16.x"), Some(6));
/// assert_eq!(pack_format("1.15-1.13"), Some(5));
/// assert_eq!(pack_format("99.9"), None);
/// ```
pub fn pack_format(label: &str) -> Option<u32> {
    canonical_label(label).and_then(|label| {
        VERSION_FORMATS.iter().find(|(l, _)| *l == label).map(|(_, f)| *f)
    })
}

/// The table's spelling of `label`, if it names a known version.
///
/// ```
/// use mctex::versions::canonical_label;
///
/// assert_eq!(canonical_label(" 1.12-1.11"), Some("1.12–1.11"));
/// assert_eq!(canonical_label("1.21"), None);
/// ```
pub fn canonical_label(label: &str) -> Option<&'static str> {
    let label = label.trim();
    let normalized = label.replace('-', "–");
    VERSION_FORMATS
        .iter()
        .map(|(l, _)| *l)
        .find(|l| *l == label || *l == normalized)
}

/// Resolve a label, falling back to [`DEFAULT_PACK_FORMAT`] for unknown labels.
pub fn resolve(label: &str) -> PackFormat {
    match pack_format(label) {
        Some(format) => PackFormat { format, known: true },
        None => {
            log::warn!(
                "Unknown Minecraft version '{}', using pack_format {}",
                label,
                DEFAULT_PACK_FORMAT
            );
            PackFormat { format: DEFAULT_PACK_FORMAT, known: false }
        }
    }
}

/// All labels in table order.
pub fn labels() -> impl Iterator<Item = &'static str> {
    VERSION_FORMATS.iter().map(|(label, _)| *label)
}
