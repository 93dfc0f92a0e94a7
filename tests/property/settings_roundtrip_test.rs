//! Property-based tests for PanelSettings serialization round-trip.

use proptest::prelude::*;
use tabdeck::types::settings::{
    BookmarkSettings, LoggingSettings, PanelSettings, RefreshSettings, StorageSettings,
};

fn arb_refresh_settings() -> impl Strategy<Value = RefreshSettings> {
    (1u64..=5_000, 1u64..=5_000).prop_map(|(debounce_ms, fast_refresh_ms)| RefreshSettings {
        debounce_ms,
        fast_refresh_ms,
    })
}

fn arb_storage_settings() -> impl Strategy<Value = StorageSettings> {
    (
        proptest::option::of("[a-zA-Z0-9/._-]{1,40}"),
        "[a-z._]{1,30}",
    )
        .prop_map(|(database_path, folder_state_key)| StorageSettings {
            database_path,
            folder_state_key,
        })
}

fn arb_level() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("error".to_string()),
        Just("warn".to_string()),
        Just("info".to_string()),
        Just("debug".to_string()),
        Just("trace".to_string()),
    ]
}

fn arb_panel_settings() -> impl Strategy<Value = PanelSettings> {
    (
        arb_refresh_settings(),
        any::<bool>(),
        arb_storage_settings(),
        arb_level(),
    )
        .prop_map(|(refresh, default_folder_collapsed, storage, level)| PanelSettings {
            refresh,
            bookmarks: BookmarkSettings {
                default_folder_collapsed,
            },
            storage,
            logging: LoggingSettings { level },
        })
}

// *For any* valid `PanelSettings`, serializing to JSON then deserializing
// SHALL produce an equal struct.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn settings_serialization_roundtrip(settings in arb_panel_settings()) {
        let json = serde_json::to_string(&settings)
            .expect("Serialization to JSON should succeed for any valid PanelSettings");
        let deserialized: PanelSettings = serde_json::from_str(&json)
            .expect("Deserialization from JSON should succeed for valid JSON");
        prop_assert_eq!(deserialized, settings);
    }
}
