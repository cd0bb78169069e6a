//! Hand-curated mappings that bypass automatic matching.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Names whose automatic match is known to be wrong.
const BUILTIN_OVERRIDES: &[(&str, &str)] = &[
    ("SDL", "media-libs/libsdl"),
    ("fmt", "dev-libs/libfmt"),
    ("httpd", "www-servers/apache"),
    ("intel-media-driver", "media-libs/libva-intel-media-driver"),
    ("intel-hybrid-driver", "media-libs/intel-hybrid-codec-driver"),
    ("CGNS", "sci-libs/cgnslib"),
    ("Linux-PAM", "sys-libs/pam"),
    ("FreeRDP2", "net-misc/freerdp"),
    ("awesome-wm", "x11-wm/awesome"),
    ("bind-utils", "net-dns/bind-tools"),
    ("boinc-client", "net-misc/boinc"),
    ("ghostscript", "app-text/ghostscript-gpl"),
    ("gnome-tweak-tool", "gnome-extra/gnome-tweaks"),
    ("graphite", "dev-libs/graphite2"),
    ("gtk4", "gui-libs/gtk"),
    ("gtk3", "x11-libs/gtk+"),
    ("gtkspell3", "app-text/gtkspell"),
    ("lcms2", "media-libs/lcms"),
    ("taskwarrior", "app-misc/task"),
    ("thermal_daemon", "sys-power/thermald"),
    ("udisks2", "sys-fs/udisks"),
    ("v4l-utils", "media-libs/libv4l"),
    ("webkitgtk", "net-libs/webkit-gtk"),
];

/// Exact source name → `category/name`. Keys are matched without case folding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverrideTable {
    entries: BTreeMap<String, String>,
}

impl OverrideTable {
    pub fn builtin() -> Self {
        BUILTIN_OVERRIDES.iter().copied().collect()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(|s| s.as_str())
    }

    pub fn insert(&mut self, name: impl Into<String>, path: impl Into<String>) {
        self.entries.insert(name.into(), path.into());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OverrideTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::loader::split_entry;

    #[test]
    fn builtin_lookup_is_exact() {
        let table = OverrideTable::builtin();
        assert_eq!(table.get("SDL"), Some("media-libs/libsdl"));
        assert_eq!(table.get("sdl"), None);
        assert_eq!(table.len(), BUILTIN_OVERRIDES.len());
    }

    #[test]
    fn builtin_values_are_qualified() {
        for (name, path) in BUILTIN_OVERRIDES {
            assert!(split_entry(path).is_some(), "override for {name} is not category/name");
        }
    }
}
