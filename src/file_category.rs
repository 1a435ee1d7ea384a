//! Extension-based file classification.
//!
//! Categories live in an ordered table and the first category whose
//! extension set contains a candidate suffix wins. Order is part of the
//! contract: `.deb` belongs to both `archives` and `executables` in the
//! built-in table, and `archives` claims it because it is listed first.

use std::collections::HashSet;

/// Lowercases an extension and ensures a leading dot, so `"JPG"` and
/// `".jpg"` configure the same lookup key.
pub(crate) fn normalize_extension(extension: &str) -> String {
    let lowered = extension.trim().to_lowercase();
    if lowered.starts_with('.') {
        lowered
    } else {
        format!(".{}", lowered)
    }
}

/// All dot-suffixes of a file name, longest first and lowercased, so
/// `backup.tar.gz` yields `[".tar.gz", ".gz"]`. A leading dot is part of
/// the name, not a suffix separator, so `.hidden` yields nothing.
fn extension_candidates(file_name: &str) -> Vec<String> {
    file_name
        .char_indices()
        .filter(|&(index, ch)| ch == '.' && index > 0)
        .map(|(index, _)| file_name[index..].to_lowercase())
        .collect()
}

/// One category and the extensions it claims.
#[derive(Debug, Clone)]
pub struct CategoryRule {
    name: String,
    extensions: HashSet<String>,
}

impl CategoryRule {
    /// Creates a rule. Extensions are normalized on the way in.
    pub fn new(name: &str, extensions: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            extensions: extensions
                .iter()
                .map(|extension| normalize_extension(extension))
                .collect(),
        }
    }

    /// The category name, used as the destination folder name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this rule claims a normalized extension.
    pub fn claims(&self, extension: &str) -> bool {
        self.extensions.contains(extension)
    }
}

/// An ordered list of category rules with first-match-wins lookup.
///
/// # Examples
///
/// ```
/// use downsort::file_category::CategoryTable;
///
/// let table = CategoryTable::builtin();
/// assert_eq!(table.classify(".pdf"), Some("documents"));
/// assert_eq!(table.classify_name("Backup.TAR.GZ"), Some("archives"));
/// assert_eq!(table.classify_name("README"), None);
/// ```
#[derive(Debug, Clone)]
pub struct CategoryTable {
    rules: Vec<CategoryRule>,
}

impl CategoryTable {
    /// Creates a table from rules. Their order decides lookup priority.
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        Self { rules }
    }

    /// The built-in table: ten categories in a fixed priority order.
    pub fn builtin() -> Self {
        Self::new(vec![
            CategoryRule::new(
                "images",
                &[
                    ".jpg", ".jpeg", ".png", ".gif", ".svg", ".webp", ".bmp", ".tiff", ".ico",
                    ".heic", ".raw", ".cr2", ".nef",
                ],
            ),
            CategoryRule::new(
                "documents",
                &[
                    ".pdf", ".doc", ".docx", ".txt", ".rtf", ".odt", ".pages", ".xlsx", ".xls",
                    ".csv", ".pptx", ".ppt", ".odp", ".keynote",
                ],
            ),
            CategoryRule::new(
                "videos",
                &[
                    ".mp4", ".avi", ".mkv", ".mov", ".wmv", ".flv", ".webm", ".m4v", ".3gp",
                    ".mpg", ".mpeg", ".ogv",
                ],
            ),
            CategoryRule::new(
                "audio",
                &[
                    ".mp3", ".wav", ".flac", ".aac", ".ogg", ".wma", ".m4a", ".opus", ".aiff",
                    ".alac",
                ],
            ),
            CategoryRule::new(
                "archives",
                &[
                    ".zip", ".rar", ".7z", ".tar", ".gz", ".tar.gz", ".tar.bz2", ".bz2", ".xz",
                    ".tar.xz", ".dmg", ".pkg", ".deb", ".rpm",
                ],
            ),
            CategoryRule::new(
                "code",
                &[
                    ".py", ".js", ".html", ".css", ".json", ".xml", ".yml", ".yaml", ".java",
                    ".cpp", ".c", ".h", ".php", ".rb", ".go", ".rs", ".swift",
                ],
            ),
            CategoryRule::new(
                "executables",
                &[
                    ".exe", ".msi", ".app", ".deb", ".rpm", ".dmg", ".pkg", ".run", ".appimage",
                    ".flatpak", ".snap",
                ],
            ),
            CategoryRule::new("fonts", &[".ttf", ".otf", ".woff", ".woff2", ".eot"]),
            CategoryRule::new("ebooks", &[".epub", ".mobi", ".azw", ".azw3", ".fb2", ".lit"]),
            CategoryRule::new(
                "cad",
                &[".dwg", ".dxf", ".step", ".iges", ".stl", ".obj", ".blend"],
            ),
        ])
    }

    /// Returns the first category claiming `extension`, which must be
    /// lowercase with a leading dot (see [`classify_name`](Self::classify_name)
    /// for raw file names).
    pub fn classify(&self, extension: &str) -> Option<&str> {
        self.rules
            .iter()
            .find(|rule| rule.claims(extension))
            .map(|rule| rule.name())
    }

    /// Classifies a file name by its suffixes, trying the longest candidate
    /// first so multi-part extensions like `.tar.gz` beat plain `.gz`.
    pub fn classify_name(&self, file_name: &str) -> Option<&str> {
        extension_candidates(file_name)
            .into_iter()
            .find_map(|candidate| self.classify(&candidate))
    }

    /// Number of categories in the table.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_adds_leading_dot() {
        assert_eq!(normalize_extension("jpg"), ".jpg");
        assert_eq!(normalize_extension(".jpg"), ".jpg");
        assert_eq!(normalize_extension(" PDF "), ".pdf");
    }

    #[test]
    fn test_candidates_single_extension() {
        assert_eq!(extension_candidates("photo.jpg"), vec![".jpg"]);
    }

    #[test]
    fn test_candidates_longest_first() {
        assert_eq!(
            extension_candidates("backup.tar.gz"),
            vec![".tar.gz", ".gz"]
        );
        assert_eq!(
            extension_candidates("notes.2024.final.txt"),
            vec![".2024.final.txt", ".final.txt", ".txt"]
        );
    }

    #[test]
    fn test_candidates_lowercase() {
        assert_eq!(extension_candidates("PHOTO.JPG"), vec![".jpg"]);
    }

    #[test]
    fn test_candidates_for_hidden_and_bare_names() {
        assert!(extension_candidates(".hidden").is_empty());
        assert!(extension_candidates("README").is_empty());
        assert_eq!(extension_candidates("~draft.docx"), vec![".docx"]);
    }

    #[test]
    fn test_builtin_classifies_common_extensions() {
        let table = CategoryTable::builtin();
        assert_eq!(table.classify(".jpg"), Some("images"));
        assert_eq!(table.classify(".pdf"), Some("documents"));
        assert_eq!(table.classify(".mkv"), Some("videos"));
        assert_eq!(table.classify(".flac"), Some("audio"));
        assert_eq!(table.classify(".zip"), Some("archives"));
        assert_eq!(table.classify(".rs"), Some("code"));
        assert_eq!(table.classify(".exe"), Some("executables"));
        assert_eq!(table.classify(".woff2"), Some("fonts"));
        assert_eq!(table.classify(".epub"), Some("ebooks"));
        assert_eq!(table.classify(".dwg"), Some("cad"));
    }

    #[test]
    fn test_builtin_unknown_extension() {
        let table = CategoryTable::builtin();
        assert_eq!(table.classify(".xyz"), None);
        assert_eq!(table.classify_name("unknownfile.xyz"), None);
    }

    #[test]
    fn test_first_match_wins_for_shared_extensions() {
        // .deb, .rpm, .dmg and .pkg are listed under both archives and
        // executables; archives is earlier in the table.
        let table = CategoryTable::builtin();
        assert_eq!(table.classify(".deb"), Some("archives"));
        assert_eq!(table.classify(".rpm"), Some("archives"));
        assert_eq!(table.classify(".dmg"), Some("archives"));
        assert_eq!(table.classify(".pkg"), Some("archives"));
    }

    #[test]
    fn test_rule_order_decides_priority() {
        let flipped = CategoryTable::new(vec![
            CategoryRule::new("executables", &[".deb"]),
            CategoryRule::new("archives", &[".deb"]),
        ]);
        assert_eq!(flipped.classify(".deb"), Some("executables"));
    }

    #[test]
    fn test_classify_name_prefers_multi_part_extension() {
        let table = CategoryTable::new(vec![
            CategoryRule::new("archives", &[".tar.gz"]),
            CategoryRule::new("compressed", &[".gz"]),
        ]);
        assert_eq!(table.classify_name("backup.tar.gz"), Some("archives"));
        assert_eq!(table.classify_name("single.gz"), Some("compressed"));
    }

    #[test]
    fn test_classify_name_falls_through_unknown_middle_parts() {
        let table = CategoryTable::builtin();
        assert_eq!(table.classify_name("photo.backup.png"), Some("images"));
        assert_eq!(table.classify_name("report.final.pdf"), Some("documents"));
    }

    #[test]
    fn test_rules_normalize_configured_extensions() {
        let table = CategoryTable::new(vec![CategoryRule::new("images", &["JPG", ".Png"])]);
        assert_eq!(table.classify(".jpg"), Some("images"));
        assert_eq!(table.classify(".png"), Some("images"));
        assert_eq!(table.classify_name("SHOT.PNG"), Some("images"));
    }

    #[test]
    fn test_builtin_table_size() {
        let table = CategoryTable::builtin();
        assert_eq!(table.len(), 10);
        assert!(!table.is_empty());
    }
}
