/// Category Linter — checks a category file against the built-in strategies.
///
/// Usage: category_linter <categories.xml> [--min-values <n>]

use quest_generator::core::category::{CategoryId, CategoryTree};
use quest_generator::core::strategies::PATTERNS;
use rustc_hash::FxHashMap;
use std::path::Path;
use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: category_linter <categories.xml> [--min-values <n>]");
        process::exit(0);
    }

    let categories_path = &args[1];
    let mut min_values = 6usize;

    let mut i = 2;
    while i < args.len() {
        if args[i] == "--min-values" && i + 1 < args.len() {
            i += 1;
            min_values = args[i].parse().unwrap_or(min_values);
        }
        i += 1;
    }

    let tree = match CategoryTree::load_from_xml(Path::new(categories_path)) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("ERROR: Failed to load categories: {}", e);
            process::exit(1);
        }
    };

    println!("Loaded {} categories", tree.len());

    let (errors, warnings) = lint_categories(&tree, min_values);

    println!("\n=== Category Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if errors.is_empty() {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

fn lint_categories(tree: &CategoryTree, min_values: usize) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    // Every pattern a strategy draws from must resolve to a usable pool.
    for pattern in PATTERNS {
        match tree.leaves(pattern) {
            Ok(values) if values.is_empty() => {
                errors.push(format!("Pattern '{}' resolves to categories without values", pattern));
            }
            Ok(values) if values.len() < min_values => {
                warnings.push(format!(
                    "Pattern '{}' has only {} values (minimum {} recommended)",
                    pattern,
                    values.len(),
                    min_values
                ));
            }
            Ok(_) => {}
            Err(e) => errors.push(format!("Pattern '{}': {}", pattern, e)),
        }
    }

    // Empty categories and values repeated across categories.
    let mut owners: FxHashMap<&str, Vec<String>> = FxHashMap::default();
    let mut stack: Vec<CategoryId> = tree.roots().to_vec();
    while let Some(id) = stack.pop() {
        let node = tree.node(id);
        if node.values.is_empty() && node.children.is_empty() {
            warnings.push(format!("Category '{}' is empty", tree.full_path(id)));
        }
        for value in &node.values {
            owners
                .entry(value.as_str())
                .or_default()
                .push(tree.full_path(id));
        }
        stack.extend(node.children.iter().copied());
    }

    let mut shared: Vec<(&str, Vec<String>)> = owners
        .into_iter()
        .filter(|(_, paths)| paths.len() > 1)
        .collect();
    shared.sort();
    for (value, paths) in shared {
        // Exclusion compares values only, so these count as one draw.
        warnings.push(format!(
            "Value '{}' appears in several categories: {}",
            value,
            paths.join(", ")
        ));
    }

    (errors, warnings)
}
