use std::sync::LazyLock;

use rustc_hash::FxHashMap;

/// Mapping from LaTeX command names (and literal characters) to Unicode code points.
///
/// Built from the line format of `unimathsymbols.txt`. The table is immutable once built.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    map: FxHashMap<Box<str>, u32>,
}

static_assertions::assert_impl_all!(SymbolTable: Send, Sync);

static BUNDLED: LazyLock<SymbolTable> =
    LazyLock::new(|| SymbolTable::from_unimath(include_str!("../data/unimathsymbols.txt")));

enum Override {
    CodePoint(u32),
    /// Same code point as another entry; skipped when that entry is missing.
    Alias(&'static str),
}

/// Entries that the bulk load gets wrong or misses.
static OVERRIDES: [(&str, Override); 39] = [
    (r"\And", Override::Alias(r"\ampersand")),
    (r"\bigcirc", Override::Alias(r"\lgwhtcircle")),
    (r"\Box", Override::Alias(r"\square")),
    (r"\circledS", Override::CodePoint(0x24C8)),
    (r"\diagdown", Override::CodePoint(0x2572)),
    (r"\diagup", Override::CodePoint(0x2571)),
    (r"\dots", Override::CodePoint(0x2026)),
    (r"\dotsb", Override::Alias(r"\cdots")),
    (r"\dotsc", Override::CodePoint(0x2026)),
    (r"\dotsi", Override::Alias(r"\cdots")),
    (r"\dotsm", Override::Alias(r"\cdots")),
    (r"\dotso", Override::CodePoint(0x2026)),
    (r"\emptyset", Override::CodePoint(0x2205)),
    (r"\gggt", Override::CodePoint(0x22D9)),
    (r"\gvertneqq", Override::CodePoint(0x2269)),
    (r"\gt", Override::Alias(r"\greater")),
    (r"\ldotp", Override::Alias(r"\period")),
    (r"\llless", Override::Alias(r"\lll")),
    (r"\lt", Override::Alias(r"\less")),
    (r"\lvert", Override::Alias(r"\vert")),
    (r"\lVert", Override::Alias(r"\Vert")),
    (r"\lvertneqq", Override::Alias(r"\lneqq")),
    (r"\ngeqq", Override::Alias(r"\ngeq")),
    (r"\nshortmid", Override::Alias(r"\nmid")),
    (r"\nshortparallel", Override::Alias(r"\nparallel")),
    (r"\nsubseteqq", Override::Alias(r"\nsubseteq")),
    (r"\omicron", Override::Alias(r"\upomicron")),
    (r"\rvert", Override::Alias(r"\vert")),
    (r"\rVert", Override::Alias(r"\Vert")),
    (r"\shortmid", Override::Alias(r"\mid")),
    (r"\smallfrown", Override::Alias(r"\frown")),
    (r"\smallint", Override::CodePoint(0x222B)),
    (r"\smallsmile", Override::Alias(r"\smile")),
    (r"\surd", Override::Alias(r"\sqrt")),
    (r"\thicksim", Override::CodePoint(0x223C)),
    (r"\thickapprox", Override::Alias(r"\approx")),
    (r"\varsubsetneqq", Override::Alias(r"\subsetneqq")),
    (r"\varsupsetneq", Override::CodePoint(0x228B)),
    (r"\varsupsetneqq", Override::Alias(r"\supsetneqq")),
];

impl SymbolTable {
    /// The table built from the bundled subset of `unimathsymbols.txt`.
    ///
    /// It is built on first use and shared by all converters that don't bring their own table.
    pub fn bundled() -> &'static SymbolTable {
        &BUNDLED
    }

    /// Parse a table in the format of `unimathsymbols.txt`.
    ///
    /// Lines starting with `#` are comments. Each record is split on `^`: the first field is the
    /// hexadecimal code point, the next three fields are names for it, and the last field may
    /// contain cross references like `= \cmd` or `# \cmd`, which become names too. When a name
    /// occurs more than once, the first occurrence wins. Records that don't parse are skipped.
    pub fn from_unimath(text: &str) -> SymbolTable {
        let mut map = FxHashMap::default();
        for line in text.lines() {
            if line.starts_with('#') {
                continue;
            }
            let columns: Vec<&str> = line.trim_matches(' ').split('^').collect();
            let [code, names @ .., comments] = columns.as_slice() else {
                continue;
            };
            if names.len() < 3 {
                continue;
            }
            let Ok(code) = u32::from_str_radix(code, 16) else {
                continue;
            };
            for name in &names[..3] {
                if !name.is_empty() {
                    map.entry(Box::from(*name)).or_insert(code);
                }
            }
            for name in cross_references(comments) {
                map.entry(Box::from(name)).or_insert(code);
            }
        }

        let resolved: Vec<(&str, u32)> = OVERRIDES
            .iter()
            .filter_map(|(name, value)| match value {
                Override::CodePoint(code) => Some((*name, *code)),
                Override::Alias(target) => map.get(*target).map(|code| (*name, *code)),
            })
            .collect();
        for (name, code) in resolved {
            map.insert(Box::from(name), code);
        }
        // A diacritic command, not a symbol.
        map.remove(r"\mathring");

        SymbolTable { map }
    }

    /// The character for `name`, if `name` is a known symbol.
    pub fn lookup(&self, name: &str) -> Option<char> {
        self.code_point(name).and_then(char::from_u32)
    }

    /// The code point for `name`, if `name` is a known symbol.
    #[inline]
    pub fn code_point(&self, name: &str) -> Option<u32> {
        self.map.get(name).copied()
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Yields every `\name` that directly follows an `=` or `#` marker.
///
/// A name runs until the next `,`, `^` or space.
fn cross_references(comments: &str) -> impl Iterator<Item = &str> {
    comments
        .match_indices(['=', '#'])
        .filter_map(move |(index, _)| {
            let rest = comments[index + 1..].trim_start();
            if !rest.starts_with('\\') {
                return None;
            }
            let end = rest[1..]
                .find([',', '^', ' '])
                .map_or(rest.len(), |pos| pos + 1);
            (end > 1).then(|| &rest[..end])
        })
}

#[cfg(test)]
mod tests {
    use super::{SymbolTable, cross_references};

    const SAMPLE: &str = "\
# comment line^with^carets
003B1^α^\\alpha^\\upalpha^A^mathalpha^^
02209^∉^\\notin^\\notin^R^mathrel^^= \\nin, = \\notni
0220B^∋^\\ni^\\ni^R^mathrel^^# \\owns
02208^∈^\\in^\\in^R^mathrel^^= \\notin
0030A^̊^\\mathring^\\ocirc^D^mathaccent^^
0007C^|^|^\\vert^F^mathfence^^
zzzzz^?^\\broken^^N^mathord^^
   02223^∣^\\mid^\\mid^R^mathrel^^
";

    #[test]
    fn names_and_first_write_wins() {
        let table = SymbolTable::from_unimath(SAMPLE);
        assert_eq!(table.lookup(r"\alpha"), Some('α'));
        assert_eq!(table.lookup("α"), Some('α'));
        assert_eq!(table.lookup(r"\upalpha"), Some('α'));
        // `\notin` appears again as a cross reference of U+2208.
        assert_eq!(table.code_point(r"\notin"), Some(0x2209));
        assert_eq!(table.code_point(r"\in"), Some(0x2208));
        assert_eq!(table.code_point(r"\mid"), Some(0x2223));
        assert!(!table.contains(r"\broken"));
    }

    #[test]
    fn cross_references_are_names() {
        let table = SymbolTable::from_unimath(SAMPLE);
        assert_eq!(table.lookup(r"\nin"), Some('∉'));
        assert_eq!(table.lookup(r"\notni"), Some('∉'));
        assert_eq!(table.lookup(r"\owns"), Some('∋'));
    }

    #[test]
    fn overrides_and_removals() {
        let table = SymbolTable::from_unimath(SAMPLE);
        assert!(!table.contains(r"\mathring"));
        assert_eq!(table.lookup(r"\ocirc"), Some('\u{30A}'));
        assert_eq!(table.lookup(r"\lvert"), Some('|'));
        assert_eq!(table.lookup(r"\rvert"), Some('|'));
        assert_eq!(table.lookup(r"\dots"), Some('…'));
        assert_eq!(table.lookup(r"\smallint"), Some('∫'));
        // Alias targets which are missing from the data are skipped.
        assert!(!table.contains(r"\omicron"));
        assert!(!table.contains(r"\Box"));
    }

    #[test]
    fn cross_reference_parsing() {
        let problems = [
            ("= \\nin", vec![r"\nin"]),
            ("= \\nin, = \\notni", vec![r"\nin", r"\notni"]),
            ("#\\owns (similar)", vec![r"\owns"]),
            ("= \\", vec![]),
            ("= nothing", vec![]),
            ("", vec![]),
        ];
        for (input, expected) in problems {
            let found: Vec<&str> = cross_references(input).collect();
            assert_eq!(found, expected, "failed: {input:?}");
        }
    }

    #[test]
    fn bundled_table() {
        let table = SymbolTable::bundled();
        assert!(!table.is_empty());
        let problems = [
            (r"\alpha", '\u{3B1}'),
            (r"\Omega", '\u{3A9}'),
            (r"\infty", '\u{221E}'),
            (r"\to", '\u{2192}'),
            (r"\ne", '\u{2260}'),
            (r"\nin", '\u{2209}'),
            (r"\lbrack", '['),
            (r"\rparen", ')'),
            (r"\{", '{'),
            (r"\|", '\u{2016}'),
            (r"\gt", '>'),
            (r"\lt", '<'),
            (r"\omicron", '\u{3BF}'),
            (r"\Box", '\u{25A1}'),
            (r"\bigcirc", '\u{25EF}'),
            (r"\surd", '\u{221A}'),
            (r"\mathdollar", '$'),
            (r"\dprime", '\u{2033}'),
        ];
        for (name, expected) in problems {
            assert_eq!(table.lookup(name), Some(expected), "failed: {name}");
        }
        assert!(!table.contains(r"\mathring"));
        assert!(!table.contains(r"\frac"));
    }
}
