//! Bake `THERMOGRAPH_*` settings from a `.env` file into the binary.
//!
//! Each setting becomes a compile-time environment variable that
//! `src/bin/main.rs` reads with `option_env!`. Variables exported in the
//! shell take precedence over the file.

const KEYS: [&str; 8] = [
    "THERMOGRAPH_ENABLE_FILTER",
    "THERMOGRAPH_CHART_MODE",
    "THERMOGRAPH_LOG_LEVEL",
    "THERMOGRAPH_SENSOR_PERIOD_MS",
    "THERMOGRAPH_HISTORY_INTERVAL_SECS",
    "THERMOGRAPH_FILTER_DELTA",
    "THERMOGRAPH_BITMAP_COLUMN",
    "THERMOGRAPH_BITMAP_ROW",
];

fn main() {
    println!("cargo:rerun-if-changed=.env");
    for key in KEYS {
        println!("cargo:rerun-if-env-changed={key}");
    }

    let Ok(entries) = dotenvy::dotenv_iter() else {
        return;
    };
    for entry in entries {
        let (key, value) = match entry {
            Ok(pair) => pair,
            Err(e) => {
                println!("cargo:warning=.env: {e}");
                continue;
            }
        };
        if !KEYS.contains(&key.as_str()) {
            if key.starts_with("THERMOGRAPH_") {
                println!("cargo:warning=.env: unknown setting {key}");
            }
            continue;
        }
        if std::env::var_os(&key).is_none() {
            println!("cargo:rustc-env={key}={value}");
        }
    }
}
