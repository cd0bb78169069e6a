//! Category priority ranking used to pick one match among several.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Built-in ranking, most preferred first: core system libraries, then
/// general applications, then desktop environments and games, then
/// language-ecosystem packages.
const BUILTIN_RANKING: &[&str] = &[
    // core libraries
    "sys-libs",
    "dev-libs",
    "media-libs",
    "x11-libs",
    "net-libs",
    "gui-libs",
    "sci-libs",
    "dev-cpp",
    "dev-qt",
    // system tools and applications
    "sys-apps",
    "sys-devel",
    "dev-lang",
    "dev-util",
    "sys-fs",
    "sys-process",
    "sys-power",
    "app-arch",
    "app-crypt",
    "net-misc",
    "net-dns",
    "net-analyzer",
    "app-text",
    "app-misc",
    "app-editors",
    "dev-vcs",
    "media-gfx",
    "media-sound",
    "media-video",
    "www-servers",
    "www-client",
    "sci-mathematics",
    // desktop environments and games
    "gui-apps",
    "x11-apps",
    "x11-wm",
    "x11-misc",
    "gnome-base",
    "gnome-extra",
    "kde-frameworks",
    "kde-plasma",
    "kde-apps",
    "xfce-base",
    "xfce-extra",
    "games-engines",
    "games-util",
    "games-action",
    "games-arcade",
    "games-strategy",
    // language ecosystems
    "dev-python",
    "dev-perl",
    "dev-ruby",
    "dev-go",
    "dev-java",
    "dev-php",
    "dev-lua",
    "dev-haskell",
    "dev-ml",
];

/// Category → rank (lower is preferred). Unlisted categories rank after every
/// listed one, even one ranked `u32::MAX`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, u32>", into = "BTreeMap<String, u32>")]
pub struct CategoryPriority {
    ranks: BTreeMap<String, u32>,
    default_rank: u64,
}

impl CategoryPriority {
    pub fn builtin() -> Self {
        Self::from_ordered(BUILTIN_RANKING)
    }

    /// Rank categories by position, starting at 1.
    pub fn from_ordered<S: AsRef<str>>(categories: &[S]) -> Self {
        categories
            .iter()
            .zip(1u32..)
            .map(|(c, rank)| (c.as_ref().to_string(), rank))
            .collect::<BTreeMap<_, _>>()
            .into()
    }

    pub fn rank(&self, category: &str) -> u64 {
        self.ranks
            .get(category)
            .map_or(self.default_rank, |&rank| u64::from(rank))
    }

    pub fn default_rank(&self) -> u64 {
        self.default_rank
    }

    /// Lowest-ranked category; equal ranks fall back to string order.
    pub fn select_best<'a, I>(&self, categories: I) -> Option<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        categories
            .into_iter()
            .min_by(|a, b| self.rank(a).cmp(&self.rank(b)).then_with(|| a.cmp(b)))
    }
}

impl Default for CategoryPriority {
    fn default() -> Self {
        Self::from(BTreeMap::new())
    }
}

impl From<BTreeMap<String, u32>> for CategoryPriority {
    fn from(ranks: BTreeMap<String, u32>) -> Self {
        let default_rank = ranks
            .values()
            .max()
            .map_or(0, |&max| u64::from(max) + 1);
        Self {
            ranks,
            default_rank,
        }
    }
}

impl From<CategoryPriority> for BTreeMap<String, u32> {
    fn from(priority: CategoryPriority) -> Self {
        priority.ranks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn libraries_outrank_bindings() {
        let p = CategoryPriority::builtin();
        assert!(p.rank("dev-libs") < p.rank("dev-python"));
        assert!(p.rank("sys-libs") < p.rank("sys-apps"));
        assert!(p.rank("sys-apps") < p.rank("gnome-base"));
        assert!(p.rank("games-util") < p.rank("dev-perl"));
    }

    #[test]
    fn unknown_category_ranks_last() {
        let p = CategoryPriority::builtin();
        let worst_listed = BUILTIN_RANKING.iter().map(|c| p.rank(c)).max().unwrap();
        assert!(p.rank("acme-widgets") > worst_listed);
        assert_eq!(p.rank("acme-widgets"), p.default_rank());
    }

    #[test]
    fn select_best_prefers_lower_rank() {
        let p = CategoryPriority::builtin();
        assert_eq!(
            p.select_best(["dev-python", "dev-libs"]),
            Some("dev-libs")
        );
    }

    #[test]
    fn ties_break_on_category_name() {
        let p = CategoryPriority::builtin();
        assert_eq!(p.select_best(["zz-unknown", "aa-unknown"]), Some("aa-unknown"));

        let flat: CategoryPriority =
            BTreeMap::from([("b-cat".to_string(), 1), ("a-cat".to_string(), 1)]).into();
        assert_eq!(flat.select_best(["b-cat", "a-cat"]), Some("a-cat"));
    }

    #[test]
    fn unknown_stays_behind_maximum_rank() {
        let p: CategoryPriority =
            BTreeMap::from([("dev-libs".to_string(), u32::MAX)]).into();
        assert!(p.rank("acme-widgets") > p.rank("dev-libs"));
        assert_eq!(p.select_best(["acme-widgets", "dev-libs"]), Some("dev-libs"));
    }

    #[test]
    fn empty_input_selects_nothing() {
        assert_eq!(CategoryPriority::builtin().select_best(std::iter::empty()), None);
    }

    #[test]
    fn json_table_recomputes_default() {
        let p: CategoryPriority =
            serde_json::from_str(r#"{"dev-python": 1, "dev-libs": 5}"#).unwrap();
        assert_eq!(p.rank("dev-python"), 1);
        assert_eq!(p.default_rank(), 6);
        assert_eq!(
            p.select_best(["dev-libs", "dev-python"]),
            Some("dev-python")
        );
    }
}
