use std::collections::HashSet;
use std::path::Path;

fn main() {
    let catalog_path = Path::new("catalogs/recipes.json");
    validate_catalog_file(catalog_path);
    set_build_dependencies();
}

fn validate_catalog_file(catalog_path: &Path) {
    assert!(
        catalog_path.exists(),
        "\n\nCATALOG BUILD ERROR: File not found\n\
         Path: {}\n\
         Please create the catalog file before building.\n",
        catalog_path.display()
    );

    let catalog_contents = std::fs::read_to_string(catalog_path).unwrap_or_else(|e| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Failed to read file\n\
             Path: {}\n\
             Error: {e}\n",
            catalog_path.display()
        );
    });

    let catalog: serde_json::Value = serde_json::from_str(&catalog_contents).unwrap_or_else(|e| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Invalid JSON\n\
             Path: {}\n\
             Error: {e}\n\
             Hint: Check for missing commas, brackets, or invalid syntax.\n",
            catalog_path.display()
        );
    });

    validate_catalog_structure(&catalog);
}

fn validate_catalog_structure(catalog: &serde_json::Value) {
    assert!(
        catalog.is_object(),
        "\n\nCATALOG BUILD ERROR: Root must be a JSON object\n\
         Got: {catalog}\n"
    );

    assert!(
        catalog.get("version").and_then(serde_json::Value::as_str).is_some(),
        "\n\nCATALOG BUILD ERROR: Missing string 'version' field\n"
    );

    let recipes = catalog.get("recipes").unwrap_or_else(|| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Missing 'recipes' field\n\
             The catalog must have a top-level 'recipes' array.\n"
        );
    });

    let recipes = recipes.as_array().unwrap_or_else(|| {
        panic!(
            "\n\nCATALOG BUILD ERROR: 'recipes' must be an array\n\
             Got: {recipes}\n"
        );
    });

    let total_ingredients = validate_recipes(recipes);

    println!(
        "cargo:warning=Validated catalog: {} recipes, {total_ingredients} total ingredients",
        recipes.len()
    );
}

fn validate_recipes(recipes: &[serde_json::Value]) -> usize {
    let mut total_ingredients = 0;
    let mut seen = HashSet::new();

    for (i, recipe) in recipes.iter().enumerate() {
        let recipe_id = recipe
            .get("id")
            .and_then(|v| v.as_str())
            .unwrap_or("<unknown>");

        validate_recipe_fields(recipe, recipe_id, i);
        assert!(
            seen.insert(recipe_id.to_string()),
            "\n\nCATALOG BUILD ERROR: Duplicate recipe id '{recipe_id}' (index {i})\n"
        );
        total_ingredients += validate_ingredient_list(recipe, recipe_id, "required_ingredients");
        total_ingredients += validate_ingredient_list(recipe, recipe_id, "optional_ingredients");
        validate_numeric_map(recipe, recipe_id, "required_quantities");
        validate_numeric_map(recipe, recipe_id, "features");
    }

    total_ingredients
}

fn validate_recipe_fields(recipe: &serde_json::Value, recipe_id: &str, index: usize) {
    assert!(
        recipe.get("id").and_then(serde_json::Value::as_str).is_some(),
        "\n\nCATALOG BUILD ERROR: Recipe at index {index} missing string 'id' field\n"
    );
    assert!(
        recipe.get("title").and_then(serde_json::Value::as_str).is_some(),
        "\n\nCATALOG BUILD ERROR: Recipe '{recipe_id}' (index {index}) missing string 'title' field\n"
    );
}

fn validate_ingredient_list(recipe: &serde_json::Value, recipe_id: &str, field: &str) -> usize {
    let Some(list) = recipe.get(field) else {
        return 0;
    };
    let items = list.as_array().unwrap_or_else(|| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Recipe '{recipe_id}' field '{field}' must be an array\n\
             Got: {list}\n"
        );
    });
    for (j, item) in items.iter().enumerate() {
        let name = item.as_str().unwrap_or_else(|| {
            panic!(
                "\n\nCATALOG BUILD ERROR: Recipe '{recipe_id}' {field}[{j}] must be a string\n\
                 Got: {item}\n"
            );
        });
        assert!(
            !name.trim().is_empty(),
            "\n\nCATALOG BUILD ERROR: Recipe '{recipe_id}' {field}[{j}] is blank\n"
        );
    }
    items.len()
}

fn validate_numeric_map(recipe: &serde_json::Value, recipe_id: &str, field: &str) {
    let Some(map) = recipe.get(field) else {
        return;
    };
    let entries = map.as_object().unwrap_or_else(|| {
        panic!(
            "\n\nCATALOG BUILD ERROR: Recipe '{recipe_id}' field '{field}' must be an object\n\
             Got: {map}\n"
        );
    });
    for (key, value) in entries {
        assert!(
            value.is_number(),
            "\n\nCATALOG BUILD ERROR: Recipe '{recipe_id}' {field}['{key}'] must be a number\n\
             Got: {value}\n"
        );
    }
}

fn set_build_dependencies() {
    // Tell cargo to rerun if catalog changes
    println!("cargo:rerun-if-changed=catalogs/recipes.json");

    // Tell cargo to rerun if build.rs changes
    println!("cargo:rerun-if-changed=build.rs");
}
