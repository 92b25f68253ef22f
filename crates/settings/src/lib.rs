pub mod preferences;

pub use preferences::{
    BackupPreferences, Preferences, PreferencesError, PreferencesStore, PromotionPreferences,
};
