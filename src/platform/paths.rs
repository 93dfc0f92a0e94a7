// Tabdeck platform paths
// Linux:   $XDG_CONFIG_HOME/tabdeck, $XDG_DATA_HOME/tabdeck
// macOS:   ~/Library/Application Support/Tabdeck
// Windows: %APPDATA%/Tabdeck

use std::env;
use std::path::PathBuf;

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Returns the directory holding `settings.json`.
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        let appdata = env::var("APPDATA")
            .unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
        PathBuf::from(appdata).join("Tabdeck")
    }
    #[cfg(target_os = "macos")]
    {
        home_dir()
            .join("Library")
            .join("Application Support")
            .join("Tabdeck")
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        match env::var("XDG_CONFIG_HOME") {
            Ok(xdg) => PathBuf::from(xdg).join("tabdeck"),
            Err(_) => home_dir().join(".config").join("tabdeck"),
        }
    }
}

/// Returns the directory holding the persisted UI state database.
pub fn get_data_dir() -> PathBuf {
    #[cfg(any(target_os = "windows", target_os = "macos"))]
    {
        get_config_dir()
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        match env::var("XDG_DATA_HOME") {
            Ok(xdg) => PathBuf::from(xdg).join("tabdeck"),
            Err(_) => home_dir().join(".local").join("share").join("tabdeck"),
        }
    }
}
