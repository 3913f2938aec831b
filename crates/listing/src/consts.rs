use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// Matches `<A HREF="/ftp/Specs/archive/38_series/38.331/">38.331</A>`, but not
// navigational anchors such as `<A HREF="/ftp/Specs/archive/">[To Parent Directory]</A>`.
regex!(ANCHOR_REGEX, r#"(?i)<a\s+href="([^"]+)"\s*>\s*[^\[<\s][^<]*</a>"#);
