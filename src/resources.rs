//! Resources bundled into the binary.
//!
//! Style sheets and help pages are addressed by a relative path such as
//! `themes/white.theme` or `help/index.htm`, the same way they are laid out
//! under `assets/`.

/// All bundled resources, keyed by their path under `assets/`.
const RESOURCES: &[(&str, &str)] = &[
    ("themes/white.theme", include_str!("../assets/themes/white.theme")),
    ("themes/grey.theme", include_str!("../assets/themes/grey.theme")),
    ("help/index.htm", include_str!("../assets/help/index.htm")),
    ("help/files.htm", include_str!("../assets/help/files.htm")),
    ("help/editing.htm", include_str!("../assets/help/editing.htm")),
    ("help/settings.htm", include_str!("../assets/help/settings.htm")),
    ("help/keys.htm", include_str!("../assets/help/keys.htm")),
];

/// Looks up a bundled resource.
///
/// # Returns
///
/// The resource contents, or `None` if nothing is bundled under `path`.
#[must_use]
pub fn lookup(path: &str) -> Option<&'static str>
{
    RESOURCES
        .iter()
        .find(|(name, _)| *name == path)
        .map(|(_, contents)| *contents)
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn known_resources_resolve()
    {
        assert!(lookup("themes/white.theme").is_some());
        assert!(lookup("help/index.htm").is_some_and(|page| page.contains("<title>")));
    }

    #[test]
    fn unknown_resource_is_none()
    {
        assert!(lookup("themes/purple.theme").is_none());
    }
}
