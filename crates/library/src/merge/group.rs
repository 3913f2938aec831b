use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const COVER: &str = "cover";

/// Files belonging to one specification, in merge order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecificationGroup {
    pub identifier: String,
    /// Cover first, the rest sorted by file name.
    pub files: Vec<PathBuf>,
    /// `<identifier>.<extension>` in the directory of the parts.
    pub output: PathBuf,
}

/// The specification a part belongs to.
///
/// Parts carry a `_<part>` suffix (`38801-100_cover.pdf`): the identifier is
/// the stem before its first `_`, without the trailing `-<version>`
/// component. Stems without `_` are complete documents, not parts; this
/// covers whole specifications (`38101-1-g10.pdf`) as well as the output of
/// an earlier merge (`38801.pdf`). Hidden files are never parts.
///
/// ```rust
/// use specfetch_library::merge::identifier;
/// assert_eq!(identifier("38801-100_cover.pdf"), Some("38801"));
/// assert_eq!(identifier("38802_only.pdf"), Some("38802"));
/// assert_eq!(identifier("38101-1-g10_s00-s05.pdf"), Some("38101-1"));
/// assert_eq!(identifier("38101-1-g10.pdf"), None);
/// assert_eq!(identifier("38801.pdf"), None);
/// ```
pub fn identifier(file_name: &str) -> Option<&str> {
    if file_name.starts_with('.') {
        return None;
    }
    let stem = Path::new(file_name).file_stem()?.to_str()?;
    let (head, _part) = stem.split_once('_')?;
    let spec = head.rsplit_once('-').map_or(head, |(spec, _version)| spec);
    Some(spec).filter(|spec| !spec.is_empty())
}

fn file_name(path: &Path) -> &str {
    path.file_name().and_then(|name| name.to_str()).unwrap_or_default()
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|ext| ext.to_str()).is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// Groups the files with `extension` (case-insensitive) by [`identifier`].
///
/// Only identifiers shared by at least two files form a group. Within a group
/// the files are sorted by name, then the first one whose name contains
/// `cover` (case-sensitive) is moved to the front. Groups are returned sorted by identifier.
pub fn group_files(files: impl IntoIterator<Item = PathBuf>, extension: &str) -> Vec<SpecificationGroup> {
    let mut groups: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    for path in files.into_iter().filter(|path| has_extension(path, extension)) {
        if let Some(id) = identifier(file_name(&path)) {
            groups.entry(id.to_string()).or_default().push(path);
        }
    }
    groups
        .into_iter()
        .filter(|(_, files)| files.len() > 1)
        .map(|(identifier, mut files)| {
            files.sort_by(|a, b| file_name(a).cmp(file_name(b)));
            if let Some(position) = files.iter().position(|path| file_name(path).contains(COVER)) {
                let cover = files.remove(position);
                files.insert(0, cover);
            }
            let directory = files[0].parent().map(Path::to_path_buf).unwrap_or_default();
            let output = directory.join(format!("{identifier}.{extension}"));
            SpecificationGroup {
                identifier,
                files,
                output,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(|name| Path::new("/specs").join(name)).collect()
    }

    #[rstest]
    #[case("38801-100_cover.pdf", Some("38801"))]
    #[case("38801-200_part1.pdf", Some("38801"))]
    #[case("38802_only.pdf", Some("38802"))]
    #[case("38331-f10_s00-s05.pdf", Some("38331"))]
    #[case("38101-1-g10_s00.pdf", Some("38101-1"))]
    #[case("38101-1-g10.pdf", None)]
    #[case("38331-f10.docx", None)]
    #[case("38801.pdf", None)]
    #[case("38101-1.pdf", None)]
    #[case("_orphan.pdf", None)]
    #[case("-100_orphan.pdf", None)]
    #[case(".merge-a1b2_c3.pdf", None)]
    #[case("", None)]
    fn identifiers(#[case] name: &str, #[case] expected: Option<&str>) {
        assert_eq!(identifier(name), expected);
    }

    #[test]
    fn groups_parts_cover_first() {
        let files = paths(&["38801-300_part2.pdf", "38802_only.pdf", "38801-200_part1.pdf", "38801-100_cover.pdf"]);
        let groups = group_files(files, "pdf");
        assert_eq!(
            groups,
            vec![SpecificationGroup {
                identifier: "38801".to_string(),
                files: paths(&["38801-100_cover.pdf", "38801-200_part1.pdf", "38801-300_part2.pdf"]),
                output: PathBuf::from("/specs/38801.pdf"),
            }]
        );
    }

    #[test]
    fn cover_is_moved_ahead_of_earlier_names() {
        let files = paths(&["38901-a_annex.pdf", "38901-b_main.pdf", "38901-z_cover.pdf"]);
        let groups = group_files(files, "pdf");
        assert_eq!(groups[0].files, paths(&["38901-z_cover.pdf", "38901-a_annex.pdf", "38901-b_main.pdf"]));
    }

    #[test]
    fn cover_match_is_case_sensitive() {
        let files = paths(&["38901-a_annex.pdf", "38901-z_Cover.pdf"]);
        let groups = group_files(files, "pdf");
        assert_eq!(groups[0].files, paths(&["38901-a_annex.pdf", "38901-z_Cover.pdf"]));
    }

    #[test]
    fn numbered_specifications_stay_separate() {
        let files = paths(&["38101-1-g10.pdf", "38101-2-g10.pdf", "38101-3-g10.pdf"]);
        assert!(group_files(files, "pdf").is_empty());
    }

    #[test]
    fn parts_of_numbered_specifications_group_per_number() {
        let files = paths(&["38101-1-g10_s00.pdf", "38101-1-g10_s01.pdf", "38101-2-g10_s00.pdf", "38101-2-g10_s01.pdf"]);
        let groups = group_files(files, "pdf");
        let outputs: Vec<_> = groups.iter().map(|group| group.output.clone()).collect();
        assert_eq!(outputs, vec![PathBuf::from("/specs/38101-1.pdf"), PathBuf::from("/specs/38101-2.pdf")]);
    }

    #[test]
    fn leftover_staging_files_are_ignored() {
        let files = paths(&[".merge-a1b2.pdf", ".merge-c3d4.pdf", ".merge-e5_f6.pdf", ".merge-g7_h8.pdf"]);
        assert!(group_files(files, "pdf").is_empty());
    }

    #[test]
    fn only_first_cover_moves() {
        let files = paths(&["38901-2_cover.pdf", "38901-1_body.pdf", "38901-3_cover.pdf"]);
        let groups = group_files(files, "pdf");
        assert_eq!(groups[0].files, paths(&["38901-2_cover.pdf", "38901-1_body.pdf", "38901-3_cover.pdf"]));
    }

    #[test]
    fn previous_output_and_other_extensions_are_ignored() {
        let files = paths(&["38801.pdf", "38801-1_a.PDF", "38801-2_b.pdf", "38801-3_c.docx"]);
        let groups = group_files(files, "pdf");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].files, paths(&["38801-1_a.PDF", "38801-2_b.pdf"]));
    }

    #[test]
    fn singletons_are_not_grouped() {
        assert!(group_files(paths(&["38331-f10.pdf", "38300-f10.pdf"]), "pdf").is_empty());
    }
}
