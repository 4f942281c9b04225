//! Marketing names for common resolutions.

/// `(width, height, alias)` triples recognised by the viewer.
pub const RESOLUTION_ALIASES: &[(u32, u32, &str)] = &[
    (1920, 1080, "FHD"),
    (1920, 1200, "WUXGA"),
    (2560, 1080, "UWFHD"),
    (2560, 1440, "QHD"),
    (3440, 1440, "UWQHD"),
    (3840, 2160, "4K"),
    (3840, 1600, "UW4K"),
];

/// Returns the alias for an exact resolution match.
pub fn alias_for(width: u32, height: u32) -> Option<&'static str> {
    RESOLUTION_ALIASES
        .iter()
        .find(|&&(w, h, _)| w == width && h == height)
        .map(|&(_, _, alias)| alias)
}

/// Formats a resolution as its alias, or `"{width}x{height}"` when unknown.
pub fn format_resolution(width: u32, height: u32) -> String {
    match alias_for(width, height) {
        Some(alias) => alias.to_string(),
        None => format!("{width}x{height}"),
    }
}
