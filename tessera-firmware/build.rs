//! Build script for tessera-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates badge.toml at compile time
//! - Generates input constants and the card table from badge.toml

use std::env;
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Single-string keys accepted in a [[card]] entry
const CARD_STRING_FIELDS: &[&str] = &[
    "given_name",
    "family_name",
    "nickname",
    "position",
    "address",
    "email",
    "url",
    "tel",
    "impp",
    "gender",
    "notes",
];

/// List-of-strings keys accepted in a [[card]] entry
const CARD_LIST_FIELDS: &[&str] = &["middle_names", "prefixes", "suffixes", "org"];

/// Longest allowed battery sample interval (one day)
const MAX_SAMPLE_INTERVAL_S: i64 = 86_400;

/// Must match tessera_core::config::MAX_BOUNCE_WINDOW_MS
const MAX_BOUNCE_WINDOW_MS: i64 = (u32::MAX / 2) as i64;

/// Panel size, for bounds-checking bitmaps
const PANEL_WIDTH: i64 = 296;
const PANEL_HEIGHT: i64 = 128;

fn main() {
    setup_linker();
    let config = load_config();
    generate_config(&config);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = out_dir();

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).expect("create memory.x");
    f.write_all(memory_x).expect("write memory.x");

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    if env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

fn out_dir() -> PathBuf {
    PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not set"))
}

/// Read and syntax-check badge.toml
fn load_config() -> toml::Value {
    println!("cargo:rerun-if-changed=badge.toml");

    let config_path = Path::new("badge.toml");

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read badge.toml", &[e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail(
            "Invalid TOML syntax in badge.toml",
            &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
        ),
    };

    let mut errors = Vec::new();
    validate_input(&config, &mut errors);
    validate_battery(&config, &mut errors);
    validate_cards(&config, &mut errors);
    validate_qr(&config, &mut errors);

    if !errors.is_empty() {
        fail("Invalid configuration in badge.toml", &errors);
    }

    println!("cargo:warning=badge.toml validated successfully");
    config
}

/// Abort the build with a boxed error message
fn fail(title: &str, lines: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        format_error_lines(lines)
    );
}

/// Format error message lines with box drawing
fn format_error_lines(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| {
            let truncated = if line.chars().count() > 62 {
                format!("{}...", line.chars().take(59).collect::<String>())
            } else {
                line.clone()
            };
            format!("║  • {:<62} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn int_in(
    table: &toml::Value,
    section: &str,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) -> Option<i64> {
    match table.get(key) {
        None => None,
        Some(toml::Value::Integer(v)) if (min..=max).contains(v) => Some(*v),
        Some(toml::Value::Integer(_)) => {
            errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
            None
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            None
        }
    }
}

/// Validate the [input] section
fn validate_input(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(input) = config.get("input") else {
        return;
    };
    int_in(input, "input", "bounce_window_ms", 0, MAX_BOUNCE_WINDOW_MS, errors);
    int_in(input, "input", "queue_capacity", 1, 64, errors);
}

/// Validate the [battery] section
fn validate_battery(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(battery) = config.get("battery") else {
        return;
    };
    int_in(
        battery,
        "battery",
        "sample_interval_s",
        1,
        MAX_SAMPLE_INTERVAL_S,
        errors,
    );
}

/// Validate the [[card]] entries
fn validate_cards(config: &toml::Value, errors: &mut Vec<String>) {
    let cards = match config.get("card") {
        Some(toml::Value::Array(cards)) if !cards.is_empty() => cards,
        _ => {
            errors.push("Missing [[card]] - at least one card is required".to_string());
            return;
        }
    };

    for (i, card) in cards.iter().enumerate() {
        let Some(table) = card.as_table() else {
            errors.push(format!("card #{} must be a table", i + 1));
            continue;
        };

        for (key, value) in table {
            match key.as_str() {
                "image" => {
                    validate_bitmap(value, &format!("card #{} image", i + 1), errors);
                }
                k if CARD_LIST_FIELDS.contains(&k) => {
                    let ok = value
                        .as_array()
                        .map(|items| items.iter().all(|item| item.is_str()))
                        .unwrap_or(false);
                    if !ok {
                        errors.push(format!("card #{} {} must be a list of strings", i + 1, k));
                    }
                }
                k if CARD_STRING_FIELDS.contains(&k) => {
                    if !value.is_str() {
                        errors.push(format!("card #{} {} must be a string", i + 1, k));
                    }
                }
                other => errors.push(format!("card #{} has unknown key '{}'", i + 1, other)),
            }
        }

        let has_name = ["given_name", "family_name"]
            .iter()
            .any(|k| table.get(*k).and_then(|v| v.as_str()).is_some_and(|s| !s.is_empty()));
        if !has_name {
            errors.push(format!("card #{} needs given_name or family_name", i + 1));
        }
    }
}

/// Validate the optional [qr] section and its bitmap file
fn validate_qr(config: &toml::Value, errors: &mut Vec<String>) {
    if let Some(qr) = config.get("qr") {
        validate_bitmap(qr, "qr", errors);
    }
}

/// Check a `{ bitmap, width, height }` table against its file on disk
fn validate_bitmap(table: &toml::Value, section: &str, errors: &mut Vec<String>) {
    if !table.is_table() {
        errors.push(format!("[{}] must be a table", section));
        return;
    }
    let width = int_in(table, section, "width", 1, PANEL_WIDTH, errors);
    let height = int_in(table, section, "height", 1, PANEL_HEIGHT, errors);
    let Some(path) = table.get("bitmap").and_then(|v| v.as_str()) else {
        errors.push(format!("[{}] bitmap must be a path", section));
        return;
    };
    println!("cargo:rerun-if-changed={}", path);

    let (Some(width), Some(height)) = (width, height) else {
        errors.push(format!("[{}] needs width and height", section));
        return;
    };
    let expected = ((width as usize).div_ceil(8)) * height as usize;
    match fs::metadata(path) {
        Ok(meta) if meta.len() as usize == expected => {}
        Ok(meta) => errors.push(format!(
            "[{}] {} is {} bytes, expected {}",
            section,
            path,
            meta.len(),
            expected
        )),
        Err(e) => errors.push(format!("[{}] cannot read {}: {}", section, path, e)),
    }
}

/// Emit config_generated.rs and qr.bin into OUT_DIR
fn generate_config(config: &toml::Value) {
    let input = config.get("input");
    let get_int = |section: Option<&toml::Value>, key: &str, default: i64| {
        section
            .and_then(|s| s.get(key))
            .and_then(|v| v.as_integer())
            .unwrap_or(default)
    };

    let mut out = String::new();
    out.push_str("// Generated by build.rs from badge.toml. Do not edit.\n\n");
    let _ = writeln!(
        out,
        "pub const BOUNCE_WINDOW_MS: u32 = {};",
        get_int(input, "bounce_window_ms", 250)
    );
    let _ = writeln!(
        out,
        "pub const QUEUE_CAPACITY: usize = {};",
        get_int(input, "queue_capacity", 8)
    );
    let _ = writeln!(
        out,
        "pub const BATTERY_SAMPLE_SECS: u64 = {};",
        get_int(config.get("battery"), "sample_interval_s", 60)
    );

    let qr = config.get("qr");
    let _ = writeln!(out, "pub const QR_WIDTH: u16 = {};", get_int(qr, "width", 0));
    let _ = writeln!(out, "pub const QR_HEIGHT: u16 = {};", get_int(qr, "height", 0));

    let out_dir = out_dir();

    out.push_str("\npub static CARDS: &[Card<'static>] = &[\n");
    if let Some(cards) = config.get("card").and_then(|c| c.as_array()) {
        for (i, card) in cards.iter().enumerate() {
            out.push_str("    Card {\n");
            for key in CARD_STRING_FIELDS {
                let value = card.get(*key).and_then(|v| v.as_str()).unwrap_or("");
                let _ = writeln!(out, "        {}: {:?},", key, value);
            }
            for key in CARD_LIST_FIELDS {
                let items = card
                    .get(*key)
                    .and_then(|v| v.as_array())
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(|item| item.as_str())
                            .map(|item| format!("{:?}", item))
                            .collect::<Vec<_>>()
                            .join(", ")
                    })
                    .unwrap_or_default();
                let _ = writeln!(out, "        {}: &[{}],", key, items);
            }
            match card.get("image") {
                Some(image) => {
                    let file = format!("card{}.bin", i);
                    copy_bitmap(image, &out_dir.join(&file));
                    let _ = writeln!(
                        out,
                        "        image: Some(tessera_core::card::CardImage {{ bitmap: include_bytes!(concat!(env!(\"OUT_DIR\"), \"/{}\")), width: {}, height: {} }}),",
                        file,
                        get_int(Some(image), "width", 0),
                        get_int(Some(image), "height", 0)
                    );
                }
                None => out.push_str("        image: None,\n"),
            }
            out.push_str("    },\n");
        }
    }
    out.push_str("];\n");

    fs::write(out_dir.join("config_generated.rs"), out).expect("write config_generated.rs");

    match qr {
        Some(qr) => copy_bitmap(qr, &out_dir.join("qr.bin")),
        None => fs::write(out_dir.join("qr.bin"), b"").expect("write qr.bin"),
    }
}

/// Copy a validated bitmap file into OUT_DIR
fn copy_bitmap(table: &toml::Value, dest: &Path) {
    let path = table
        .get("bitmap")
        .and_then(|v| v.as_str())
        .expect("bitmap validated");
    fs::copy(path, dest).expect("copy bitmap");
}
