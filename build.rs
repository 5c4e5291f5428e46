use std::path::Path;

const LIST_FIELDS: &[&str] = &["name_drops"];
const PAIR_FIELDS: &[&str] = &[
    "name_substitutions",
    "province_substitutions",
    "fuel_substitutions",
    "status_substitutions",
];

fn main() {
    let config_path = Path::new("config/cleaner.json");
    validate_config_file(config_path);
    set_build_dependencies();
}

fn validate_config_file(config_path: &Path) {
    // Ensure config exists at build time
    assert!(
        config_path.exists(),
        "\n\nCLEANER CONFIG BUILD ERROR: File not found\n\
         Path: {}\n\
         Please create the cleaner config before building.\n",
        config_path.display()
    );

    let contents = std::fs::read_to_string(config_path).unwrap_or_else(|e| {
        panic!(
            "\n\nCLEANER CONFIG BUILD ERROR: Failed to read file\n\
             Path: {}\n\
             Error: {e}\n",
            config_path.display()
        );
    });

    let config: serde_json::Value = serde_json::from_str(&contents).unwrap_or_else(|e| {
        panic!(
            "\n\nCLEANER CONFIG BUILD ERROR: Invalid JSON\n\
             Path: {}\n\
             Error: {e}\n\
             Hint: Check for missing commas, brackets, or invalid syntax.\n",
            config_path.display()
        );
    });

    validate_config_structure(&config);
}

fn validate_config_structure(config: &serde_json::Value) {
    assert!(
        config.is_object(),
        "\n\nCLEANER CONFIG BUILD ERROR: Root must be a JSON object\n\
         Got: {config}\n"
    );

    let mut total_rules = 0;

    for field in LIST_FIELDS {
        if let Some(value) = config.get(field) {
            total_rules += validate_pattern_list(field, value);
        }
    }

    for field in PAIR_FIELDS {
        if let Some(value) = config.get(field) {
            total_rules += validate_pair_list(field, value);
        }
    }

    println!("cargo:warning=Validated cleaner config: {total_rules} rules");
}

fn validate_pattern_list(field: &str, value: &serde_json::Value) -> usize {
    let patterns = value.as_array().unwrap_or_else(|| {
        panic!(
            "\n\nCLEANER CONFIG BUILD ERROR: '{field}' must be an array of strings\n\
             Got: {value}\n"
        );
    });

    for (i, pattern) in patterns.iter().enumerate() {
        let pattern = pattern.as_str().unwrap_or_else(|| {
            panic!("\n\nCLEANER CONFIG BUILD ERROR: '{field}' entry {i} is not a string\n");
        });
        assert!(
            !pattern.is_empty(),
            "\n\nCLEANER CONFIG BUILD ERROR: '{field}' entry {i} is an empty pattern\n"
        );
    }

    patterns.len()
}

fn validate_pair_list(field: &str, value: &serde_json::Value) -> usize {
    let pairs = value.as_array().unwrap_or_else(|| {
        panic!(
            "\n\nCLEANER CONFIG BUILD ERROR: '{field}' must be an array of [pattern, replacement] pairs\n\
             Got: {value}\n"
        );
    });

    for (i, pair) in pairs.iter().enumerate() {
        let items = pair.as_array().unwrap_or_else(|| {
            panic!("\n\nCLEANER CONFIG BUILD ERROR: '{field}' entry {i} is not an array\n");
        });
        assert!(
            items.len() == 2 && items.iter().all(serde_json::Value::is_string),
            "\n\nCLEANER CONFIG BUILD ERROR: '{field}' entry {i} must be [pattern, replacement]\n\
             Got: {pair}\n"
        );
    }

    pairs.len()
}

fn set_build_dependencies() {
    // Tell cargo to rerun if the embedded config changes
    println!("cargo:rerun-if-changed=config/cleaner.json");

    // Tell cargo to rerun if build.rs changes
    println!("cargo:rerun-if-changed=build.rs");
}
