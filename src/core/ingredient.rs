use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use unicode_normalization::UnicodeNormalization;

/// A canonical ingredient name.
///
/// Two raw names refer to the same ingredient when their normalized forms are
/// equal. Values are only produced by [`Normalizer::normalize`] (or
/// [`normalize`]), so holding an `IngredientName` means the string is already
/// folded, stripped and alias-resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngredientName(String);

impl IngredientName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for IngredientName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for IngredientName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Built-in spelling variants, `(variant, canonical)`.
const DEFAULT_ALIASES: &[(&str, &str)] = &[
    // Vegetables
    ("たまねぎ", "玉ねぎ"),
    ("タマネギ", "玉ねぎ"),
    ("玉葱", "玉ねぎ"),
    ("たま葱", "玉ねぎ"),
    ("人参", "にんじん"),
    ("ニンジン", "にんじん"),
    ("ジャガイモ", "じゃがいも"),
    ("じゃが芋", "じゃがいも"),
    ("馬鈴薯", "じゃがいも"),
    ("きゃべつ", "キャベツ"),
    ("とまと", "トマト"),
    ("しょうが", "生姜"),
    ("ショウガ", "生姜"),
    ("ニンニク", "にんにく"),
    ("大蒜", "にんにく"),
    ("ねぎ", "長ねぎ"),
    ("ネギ", "長ねぎ"),
    ("長ネギ", "長ねぎ"),
    ("葱", "長ねぎ"),
    ("カボチャ", "かぼちゃ"),
    ("南瓜", "かぼちゃ"),
    // Meat, fish, dairy
    ("豚挽き肉", "豚ひき肉"),
    ("豚挽肉", "豚ひき肉"),
    ("豚ミンチ", "豚ひき肉"),
    ("とり肉", "鶏肉"),
    ("鳥肉", "鶏肉"),
    ("えび", "エビ"),
    ("海老", "エビ"),
    ("玉子", "卵"),
    ("たまご", "卵"),
    ("タマゴ", "卵"),
    ("鶏卵", "卵"),
    ("とうふ", "豆腐"),
    ("トウフ", "豆腐"),
    // Seasonings
    ("しょうゆ", "醤油"),
    ("しょう油", "醤油"),
    ("濃口醤油", "醤油"),
    ("胡椒", "こしょう"),
    ("コショウ", "こしょう"),
    ("コショー", "こしょう"),
    ("さとう", "砂糖"),
    ("上白糖", "砂糖"),
    ("しお", "塩"),
    ("食塩", "塩"),
    ("料理酒", "酒"),
    ("日本酒", "酒"),
    ("味醂", "みりん"),
    ("本みりん", "みりん"),
    ("サラダ油", "油"),
    ("植物油", "油"),
    ("オリーブ油", "オリーブオイル"),
    ("出汁", "だし"),
    ("だし汁", "だし"),
    ("ダシ", "だし"),
    ("みそ", "味噌"),
    ("ミソ", "味噌"),
    ("マヨ", "マヨネーズ"),
    // English variants
    ("onions", "onion"),
    ("carrots", "carrot"),
    ("potatoes", "potato"),
    ("tomatoes", "tomato"),
    ("eggs", "egg"),
    ("scallion", "green onion"),
    ("scallions", "green onion"),
    ("spring onion", "green onion"),
    ("black pepper", "pepper"),
    ("table salt", "salt"),
    ("vegetable oil", "oil"),
    ("salad oil", "oil"),
    ("dashi stock", "dashi"),
    ("shoyu", "soy sauce"),
    ("cooking sake", "sake"),
];

/// Many-to-one mapping from spelling variants to a canonical name.
///
/// Both sides of every pair are folded with the same pipeline as lookups, and
/// alias chains are collapsed at construction so a canonical name never maps
/// any further.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    map: HashMap<String, String>,
}

impl AliasTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(variant, canonical)` pairs.
    pub fn from_pairs<I, V, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (V, C)>,
        V: AsRef<str>,
        C: AsRef<str>,
    {
        let mut raw: HashMap<String, String> = HashMap::new();
        for (variant, canonical) in pairs {
            let variant = fold(variant.as_ref());
            let canonical = fold(canonical.as_ref());
            if variant.is_empty() || canonical.is_empty() || variant == canonical {
                continue;
            }
            raw.insert(variant, canonical);
        }

        // Collapse chains (a -> b -> c becomes a -> c). A cycle stops at the
        // first repeated name.
        let mut map = HashMap::with_capacity(raw.len());
        for variant in raw.keys() {
            let mut target = &raw[variant];
            let mut seen = vec![variant.as_str()];
            while let Some(next) = raw.get(target) {
                if seen.contains(&next.as_str()) {
                    break;
                }
                seen.push(target.as_str());
                target = next;
            }
            map.insert(variant.clone(), target.clone());
        }

        // A canonical that is itself a key (cycle survivor) would break
        // idempotence; drop those keys.
        let canonicals: Vec<String> = map.values().cloned().collect();
        for canonical in canonicals {
            map.remove(&canonical);
        }

        Self { map }
    }

    /// Look up an already-folded name
    pub fn resolve<'a>(&'a self, folded: &'a str) -> &'a str {
        self.map.get(folded).map_or(folded, String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Canonicalizes raw ingredient names.
#[derive(Debug, Clone)]
pub struct Normalizer {
    aliases: AliasTable,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(AliasTable::from_pairs(DEFAULT_ALIASES.iter().copied()))
    }
}

impl Normalizer {
    pub fn new(aliases: AliasTable) -> Self {
        Self { aliases }
    }

    /// A normalizer that folds and strips but resolves no aliases
    pub fn without_aliases() -> Self {
        Self::new(AliasTable::new())
    }

    pub fn aliases(&self) -> &AliasTable {
        &self.aliases
    }

    /// Normalize a raw ingredient name. Total and deterministic.
    pub fn normalize(&self, raw: &str) -> IngredientName {
        let folded = fold(raw);
        IngredientName(self.aliases.resolve(&folded).to_string())
    }
}

/// Normalize with the built-in alias table.
///
/// Builds the default table on every call; hold a [`Normalizer`] when
/// normalizing in a loop.
pub fn normalize(raw: &str) -> IngredientName {
    Normalizer::default().normalize(raw)
}

/// Fold a string without alias resolution: NFKC, parenthetical stripping,
/// lowercase, NFKC again, whitespace collapse.
///
/// Lowercasing can leave marks uncomposed (`Ϊ\u{301}` becomes `ϊ\u{301}`),
/// so the second NFKC pass is what makes folding a fixed point.
pub fn fold(raw: &str) -> String {
    let compat: String = raw.nfkc().collect();
    let stripped = strip_parentheticals(&compat);
    let lowered: String = stripped.to_lowercase().nfkc().collect();
    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove every parenthesized span, ASCII or full-width, including the
/// parentheses. Stray closers are dropped; an unclosed opener drops the rest.
fn strip_parentheticals(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut depth = 0usize;
    for c in s.chars() {
        match c {
            '(' | '（' => depth += 1,
            ')' | '）' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_and_collapse_whitespace() {
        let n = Normalizer::without_aliases();
        assert_eq!(n.normalize("  green   bell\tpepper ").as_str(), "green bell pepper");
        assert_eq!(n.normalize("").as_str(), "");
        assert_eq!(n.normalize("   ").as_str(), "");
    }

    #[test]
    fn test_case_fold() {
        let n = Normalizer::without_aliases();
        assert_eq!(n.normalize("Consomme"), n.normalize("CONSOMME"));
        // Full-width latin folds through NFKC
        assert_eq!(n.normalize("ＣＨＥＥＳＥ").as_str(), "cheese");
    }

    #[test]
    fn test_strip_parentheticals() {
        let n = Normalizer::without_aliases();
        assert_eq!(n.normalize("豚肉(こま切れ)").as_str(), "豚肉");
        assert_eq!(n.normalize("豚肉（こま切れ）").as_str(), "豚肉");
        assert_eq!(n.normalize("tomato (ripe) paste").as_str(), "tomato paste");
        assert_eq!(n.normalize("egg (large (organic))").as_str(), "egg");
        assert_eq!(n.normalize("milk (whole").as_str(), "milk");
        assert_eq!(n.normalize("milk) whole").as_str(), "milk whole");
        assert_eq!(n.normalize("(小)").as_str(), "");
    }

    #[test]
    fn test_alias_resolution() {
        assert_eq!(normalize("玉ねぎ"), normalize("たまねぎ"));
        assert_eq!(normalize("タマネギ"), normalize("玉葱"));
        assert_eq!(normalize("しょうゆ"), normalize("醤油"));
        assert_eq!(normalize("豚挽き肉"), normalize("豚ひき肉"));
        assert_eq!(normalize("Onions"), normalize("onion"));
        assert_eq!(normalize("人参 (1本)").as_str(), "にんじん");
    }

    #[test]
    fn test_half_width_katakana() {
        // Half-width katakana composes to full-width before alias lookup
        assert_eq!(normalize("ﾀﾏﾈｷﾞ"), normalize("玉ねぎ"));
    }

    #[test]
    fn test_idempotence() {
        let n = Normalizer::default();
        let samples = [
            "  たまねぎ（大）",
            "ＯＮＩＯＮＳ",
            "Soy  Sauce",
            "(小)",
            "milk (whole",
            "ﾆﾝｼﾞﾝ",
            "Dashi Stock",
            "",
        ];
        for raw in samples {
            let once = n.normalize(raw);
            let twice = n.normalize(once.as_str());
            assert_eq!(once, twice, "normalize not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_idempotence_after_case_mapping() {
        let n = Normalizer::without_aliases();
        // Lowercasing exposes a composition or a mark reordering
        let cases = [
            ("Ϊ\u{301}", "\u{390}"),
            ("ᾼ\u{301}", "\u{1FB4}"),
            ("İ\u{3099}", "i\u{3099}\u{307}"),
        ];
        for (raw, expected) in cases {
            let once = n.normalize(raw);
            assert_eq!(once.as_str(), expected, "unexpected fold for {raw:?}");
            assert_eq!(once, n.normalize(once.as_str()), "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_idempotence_sweep() {
        let n = Normalizer::without_aliases();
        let mut failures = Vec::new();
        for cp in 0..0x3_0000u32 {
            let Some(c) = char::from_u32(cp) else { continue };
            for suffix in ["", "\u{301}", "\u{3099}"] {
                let raw = format!("{c}{suffix}");
                let once = n.normalize(&raw);
                if n.normalize(once.as_str()) != once {
                    failures.push(raw);
                }
            }
        }
        assert!(failures.is_empty(), "not idempotent: {failures:?}");
    }

    #[test]
    fn test_alias_chains_collapse() {
        let table = AliasTable::from_pairs([("a", "b"), ("b", "c")]);
        assert_eq!(table.resolve("a"), "c");
        assert_eq!(table.resolve("b"), "c");
        assert_eq!(table.resolve("c"), "c");
    }

    #[test]
    fn test_alias_cycle_is_idempotent() {
        let n = Normalizer::new(AliasTable::from_pairs([("x", "y"), ("y", "x")]));
        for raw in ["x", "y"] {
            let once = n.normalize(raw);
            assert_eq!(once, n.normalize(once.as_str()));
        }
    }

    #[test]
    fn test_alias_keys_are_folded() {
        let table = AliasTable::from_pairs([("Green Onion", "Negi")]);
        assert_eq!(table.resolve("green onion"), "negi");
    }
}
