use std::sync::RwLock;

use crate::db::repositories::settings_repository::SettingsRepository;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::settings::AppSettings;

const KEY_ACCENT_COLOR: &str = "accent_color";

const DEFAULT_ACCENT_COLOR: &str = "#4f8cff";

pub struct SettingsService {
    db: DbPool,
    cache: RwLock<Option<AppSettings>>,
}

impl SettingsService {
    pub fn new(db: DbPool) -> Self {
        Self {
            db,
            cache: RwLock::new(None),
        }
    }

    pub fn get(&self) -> AppResult<AppSettings> {
        if let Ok(guard) = self.cache.read() {
            if let Some(settings) = guard.as_ref() {
                return Ok(settings.clone());
            }
        }

        let settings = self.load_settings_from_db()?;
        if let Ok(mut guard) = self.cache.write() {
            *guard = Some(settings.clone());
        }
        Ok(settings)
    }

    pub fn update_accent_color(&self, accent_color: &str) -> AppResult<AppSettings> {
        let accent_color = accent_color.trim().to_lowercase();
        ensure_valid_color(&accent_color)?;

        self.db.with_connection(|conn| {
            SettingsRepository::upsert(conn, KEY_ACCENT_COLOR, &accent_color)
        })?;

        if let Ok(mut guard) = self.cache.write() {
            *guard = None;
        }
        self.get()
    }

    pub fn reset(&self) -> AppResult<AppSettings> {
        self.db
            .with_connection(|conn| SettingsRepository::delete(conn, KEY_ACCENT_COLOR))?;

        if let Ok(mut guard) = self.cache.write() {
            *guard = None;
        }
        self.get()
    }

    fn load_settings_from_db(&self) -> AppResult<AppSettings> {
        let row = self
            .db
            .with_connection(|conn| SettingsRepository::get(conn, KEY_ACCENT_COLOR))?;

        Ok(match row {
            Some(row) => AppSettings {
                accent_color: row.value,
                updated_at: row.updated_at,
            },
            Option::None => AppSettings {
                accent_color: DEFAULT_ACCENT_COLOR.to_string(),
                updated_at: String::new(),
            },
        })
    }
}

fn ensure_valid_color(value: &str) -> AppResult<()> {
    let hex = value.strip_prefix('#').ok_or_else(|| {
        AppError::validation(format!("Accent color must be a #rrggbb value: {}", value))
    })?;
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AppError::validation(format!(
            "Accent color must be a #rrggbb value: {}",
            value
        )));
    }
    Ok(())
}
