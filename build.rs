use std::fs;

/// Every key of the compiled default, with the TOML type it must have.
const KEYS: [(&str, &str, &str); 7] = [
    ("links", "color", "string"),
    ("links", "underline", "boolean"),
    ("links", "new_tab", "boolean"),
    ("page", "numbers", "boolean"),
    ("html", "class", "string"),
    ("layout", "keep_headings_with_next", "boolean"),
    ("layout", "unbreakable_list_max", "integer"),
];

fn main() {
    // The default config is compiled in, so reject a broken one at build time
    let config_path = "src/default_config.toml";
    println!("cargo:rerun-if-changed={config_path}");

    let content = fs::read_to_string(config_path).expect("Failed to read default_config.toml");
    let table = match content.parse::<toml::Table>() {
        Ok(table) => table,
        Err(e) => panic!("Invalid default_config.toml: {e}"),
    };

    for (section, key, kind) in KEYS {
        let Some(value) = table.get(section).and_then(|s| s.get(key)) else {
            panic!("default_config.toml is missing {section}.{key}");
        };
        if value.type_str() != kind {
            panic!(
                "default_config.toml: {section}.{key} must be a {kind}, found {}",
                value.type_str()
            );
        }
    }
}
