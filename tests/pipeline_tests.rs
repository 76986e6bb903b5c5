//! End-to-end checks of the matching pipeline through the public API.
//!
//! Covers normalization, staples, coverage, scoring modes, filters, and the
//! ordering guarantees of the ranker.

use pantry_match::{
    MatchingConfig, MatchingEngine, Normalizer, Pantry, PreferenceProfile, Preferences, Recipe,
    RecipeCatalog, RecipeFilter, RecipeId, RecommendationSignal, ScoringMode, SortKey,
    StaplesPolicy,
};

fn pantry(names: &[&str]) -> Pantry {
    Pantry::from_names(names.iter().copied(), &Normalizer::default())
}

fn ids(results: &[pantry_match::ScoredRecipe]) -> Vec<&str> {
    results.iter().map(|s| s.result.recipe.id.0.as_str()).collect()
}

/// Normalizing twice gives the same name as normalizing once
#[test]
fn test_normalize_idempotent() {
    let normalizer = Normalizer::default();
    for raw in [
        "タマネギ",
        "玉葱（大）",
        "  Onions ",
        "ＳＡＬＴ",
        "ｼｮｳｶﾞ",
        "豚肉(こま切れ(国産))",
        "えび)",
        "(only a note",
        "",
    ] {
        let once = normalizer.normalize(raw);
        let twice = normalizer.normalize(once.as_str());
        assert_eq!(once, twice, "normalize not idempotent for {raw:?}");
    }
}

/// Spelling variants on either side still match
#[test]
fn test_variants_match_across_pantry_and_recipe() {
    let catalog = RecipeCatalog::from_recipes(vec![Recipe::new("r", "Test")
        .with_required(["玉ねぎ", "にんじん", "じゃがいも"])])
    .unwrap();
    let engine = MatchingEngine::with_config(&catalog, MatchingConfig::without_staples());

    let result = engine
        .match_by_id(&RecipeId::new("r"), &pantry(&["タマネギ", "人参", "ジャガイモ（男爵）"]))
        .unwrap();
    assert!(result.can_make);
    assert!((result.coverage - 1.0).abs() < 1e-9);
}

/// Four required, three on hand, no staples
#[test]
fn test_partial_coverage_scenario() {
    let catalog = RecipeCatalog::from_recipes(vec![Recipe::new("soup", "Soup")
        .with_required(["onion", "carrot", "potato", "consomme"])])
    .unwrap();
    let engine = MatchingEngine::with_config(&catalog, MatchingConfig::without_staples());

    let result = engine
        .match_by_id(&RecipeId::new("soup"), &pantry(&["onions", "carrots", "potatoes"]))
        .unwrap();

    let missing: Vec<&str> = result.missing_names().into_iter().map(|n| n.as_str()).collect();
    assert_eq!(missing, vec!["consomme"]);
    assert!((result.coverage - 0.75).abs() < 1e-9);
    assert!(!result.can_make);
}

/// A recipe of nothing but staples is makeable from an empty pantry
#[test]
fn test_staples_only_recipe() {
    let normalizer = Normalizer::default();
    let catalog = RecipeCatalog::from_recipes(vec![
        Recipe::new("seasoning", "Seasoning").with_required(["salt", "pepper"])
    ])
    .unwrap();
    let config = MatchingConfig {
        staples: StaplesPolicy::from_names(&normalizer, ["salt", "pepper"]),
        ..MatchingConfig::default()
    };
    let engine = MatchingEngine::with_config(&catalog, config);

    let result = engine
        .match_by_id(&RecipeId::new("seasoning"), &pantry(&[]))
        .unwrap();
    assert!(result.missing.is_empty());
    assert!((result.coverage - 1.0).abs() < 1e-9);
    assert!(result.can_make);
}

/// No required ingredients means full coverage
#[test]
fn test_empty_required_full_coverage() {
    let catalog =
        RecipeCatalog::from_recipes(vec![Recipe::new("toast", "Toast").with_optional(["butter"])])
            .unwrap();
    let engine = MatchingEngine::new(&catalog);
    let result = engine.match_by_id(&RecipeId::new("toast"), &pantry(&[])).unwrap();
    assert!(result.can_make);
    assert!((result.coverage - 1.0).abs() < 1e-9);
    assert_eq!(result.need_count, 0);
}

/// Counting and makeability invariants hold across the embedded catalog
#[test]
fn test_match_invariants_on_embedded_catalog() {
    let catalog = RecipeCatalog::load_embedded().unwrap();
    let engine = MatchingEngine::new(&catalog);
    let pantry = pantry(&["豚肉", "玉ねぎ", "卵", "じゃがいも", "にんじん", "牛乳"]);

    for s in engine.score_all(&pantry, &Preferences::default()) {
        let m = &s.result;
        assert_eq!(m.have_count + m.missing.len(), m.need_count, "{}", m.recipe.id);
        assert_eq!(m.can_make, m.missing.is_empty(), "{}", m.recipe.id);
        assert!((0.0..=1.0).contains(&m.coverage), "{}", m.recipe.id);
        assert!(m.optional_have_count <= m.recipe.optional_ingredients.len());
        assert_eq!(s.mode, ScoringMode::Local);
    }
}

/// Equal scores keep catalog order under the score sort
#[test]
fn test_equal_scores_keep_catalog_order() {
    let catalog = RecipeCatalog::from_recipes(vec![
        Recipe::new("first", "B").with_required(["a", "b", "c", "d", "x"]),
        Recipe::new("best", "A").with_required(["a"]),
        Recipe::new("second", "C").with_required(["a", "b", "c", "d", "y"]),
    ])
    .unwrap();
    let engine = MatchingEngine::with_config(&catalog, MatchingConfig::without_staples());
    let results = engine.suggest(
        &pantry(&["a", "b", "c", "d"]),
        &Preferences::default(),
        &RecipeFilter::default(),
        SortKey::Score,
    );

    assert_eq!(ids(&results), vec!["best", "first", "second"]);
    assert!((results[1].score - results[2].score).abs() < 1e-12);
}

/// Identical inputs give identical ordered output
#[test]
fn test_suggest_is_deterministic() {
    let catalog = RecipeCatalog::load_embedded().unwrap();
    let engine = MatchingEngine::new(&catalog);
    let pantry = pantry(&["鶏肉", "卵", "玉ねぎ", "ご飯", "長ねぎ"]);
    let filter = RecipeFilter {
        max_missing: Some(3),
        ..RecipeFilter::default()
    };

    for sort in [SortKey::Score, SortKey::Coverage, SortKey::Missing, SortKey::Title] {
        let first = engine.suggest(&pantry, &Preferences::default(), &filter, sort);
        let second = engine.suggest(&pantry, &Preferences::default(), &filter, sort);
        assert_eq!(ids(&first), ids(&second), "sort {sort}");
    }
}

/// Tightening a filter never adds results
#[test]
fn test_filters_only_remove() {
    let catalog = RecipeCatalog::load_embedded().unwrap();
    let engine = MatchingEngine::new(&catalog);
    let pantry = pantry(&["豚肉", "玉ねぎ", "生姜", "卵"]);
    let prefs = Preferences::default();

    let all = engine.suggest(&pantry, &prefs, &RecipeFilter::default(), SortKey::Score);
    assert_eq!(all.len(), catalog.len());

    let mut previous = all.len();
    for max_missing in (0..=5).rev() {
        let filter = RecipeFilter {
            max_missing: Some(max_missing),
            ..RecipeFilter::default()
        };
        let count = engine.suggest(&pantry, &prefs, &filter, SortKey::Score).len();
        assert!(count <= previous, "max_missing {max_missing}");
        previous = count;
    }

    let can_make = RecipeFilter {
        can_make_only: true,
        ..RecipeFilter::default()
    };
    let makeable = engine.suggest(&pantry, &prefs, &can_make, SortKey::Score);
    assert!(makeable.iter().all(|s| s.result.can_make));
    assert!(ids(&makeable).contains(&"buta_shogayaki"));
}

/// Excluding an ingredient drops every recipe that uses it
#[test]
fn test_exclude_ingredient() {
    let catalog = RecipeCatalog::load_embedded().unwrap();
    let engine = MatchingEngine::new(&catalog);
    let filter = RecipeFilter {
        exclude_ingredients: vec!["えび".to_string()],
        ..RecipeFilter::default()
    };
    let results = engine.suggest(&pantry(&[]), &Preferences::default(), &filter, SortKey::Score);
    let ids = ids(&results);
    assert!(!ids.contains(&"seafood_pasta"));
    assert!(!ids.contains(&"ebi_chili"));
    assert!(ids.contains(&"nikujaga"));
}

/// A preference profile switches every recipe to boosted scoring
#[test]
fn test_profile_boosts_matching_recipes() {
    let catalog = RecipeCatalog::from_recipes(vec![
        Recipe::new("plain", "Plain")
            .with_required(["rice"])
            .with_feature("和食", 0.0)
            .with_feature("洋食", 1.0),
        Recipe::new("liked", "Liked")
            .with_required(["rice"])
            .with_feature("和食", 1.0)
            .with_feature("洋食", 0.0),
    ])
    .unwrap();
    let engine = MatchingEngine::new(&catalog);
    let prefs = Preferences::with_profile(PreferenceProfile::new(
        vec!["和食".to_string(), "洋食".to_string()],
        vec![1.0, 0.0],
    ));

    let results = engine.suggest(&pantry(&["rice"]), &prefs, &RecipeFilter::default(), SortKey::Score);
    assert_eq!(ids(&results), vec!["liked", "plain"]);
    assert!(results.iter().all(|s| s.mode == ScoringMode::PreferenceBoosted));
    // 0.7 * 1.0 + 0.3 * 1.0
    assert!((results[0].score - 1.0).abs() < 1e-9);
    assert!((results[1].score - 0.7).abs() < 1e-9);
}

/// Signals apply only to the recipes they name
#[test]
fn test_signal_scores_one_recipe() {
    let catalog = RecipeCatalog::load_embedded().unwrap();
    let engine = MatchingEngine::new(&catalog);

    let mut prefs = Preferences::default();
    let mut signal = RecommendationSignal::new(RecipeId::new("miso_soup"));
    signal.preference_score = Some(0.9);
    signal.is_boosted = true;
    prefs.add_signal(signal);

    let results = engine.score_all(&pantry(&["豆腐"]), &prefs);
    for s in &results {
        if s.result.recipe.id.0 == "miso_soup" {
            assert_eq!(s.mode, ScoringMode::PreferenceBoosted);
            assert!(s.is_boosted);
            assert_eq!(s.preference_score, Some(0.9));
        } else {
            assert_eq!(s.mode, ScoringMode::Local);
            assert!(!s.is_boosted);
        }
    }
}

/// Ranking never touches the catalog
#[test]
fn test_ranking_leaves_catalog_untouched() {
    let catalog = RecipeCatalog::load_embedded().unwrap();
    let before: Vec<Recipe> = catalog.recipes().to_vec();
    let engine = MatchingEngine::new(&catalog);
    let filter = RecipeFilter {
        keyword: Some("卵".to_string()),
        limit: Some(2),
        ..RecipeFilter::default()
    };
    let results = engine.suggest(&pantry(&["卵"]), &Preferences::default(), &filter, SortKey::Title);
    assert!(results.len() <= 2);
    assert_eq!(catalog.recipes(), before.as_slice());
}
