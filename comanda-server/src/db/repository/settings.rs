//! Restaurant Settings Repository
//!
//! Single-document store: one settings row per deployment. The invoice
//! builder reads it inside the close transaction and freezes the values
//! into the snapshot.

use super::{RepoError, RepoResult};
use crate::db::{SETTINGS_KEY, SETTINGS_TABLE, Store};
use redb::ReadableTable;
use shared::models::{RestaurantSettings, SettingsUpdate};
use shared::util::now_millis;

#[derive(Clone)]
pub struct SettingsRepository {
    store: Store,
}

impl SettingsRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Read the settings document, seeding defaults on first access
    pub fn get(&self) -> RepoResult<RestaurantSettings> {
        {
            let txn = self.store.begin_read()?;
            let table = txn.open_table(SETTINGS_TABLE)?;
            if let Some(value) = table.get(SETTINGS_KEY)? {
                return Ok(serde_json::from_slice(value.value())?);
            }
        }

        // First boot: persist the defaults so later reads and edits share
        // one document
        let seeded = RestaurantSettings::seed(now_millis());
        let txn = self.store.begin_write()?;
        {
            let mut table = txn.open_table(SETTINGS_TABLE)?;
            if let Some(value) = table.get(SETTINGS_KEY)? {
                // Lost the race against another seeder
                return Ok(serde_json::from_slice(value.value())?);
            }
            table.insert(SETTINGS_KEY, serde_json::to_vec(&seeded)?.as_slice())?;
        }
        txn.commit()?;
        Ok(seeded)
    }

    /// Apply a partial update
    pub fn update(&self, data: SettingsUpdate) -> RepoResult<RestaurantSettings> {
        for rate in [data.tax_rate, data.service_charge_rate].into_iter().flatten() {
            if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
                return Err(RepoError::Validation(
                    "Rates must be decimal fractions between 0 and 1".to_string(),
                ));
            }
        }

        let txn = self.store.begin_write()?;
        let settings = {
            let mut table = txn.open_table(SETTINGS_TABLE)?;

            let mut settings: RestaurantSettings = match table.get(SETTINGS_KEY)? {
                Some(value) => serde_json::from_slice(value.value())?,
                None => RestaurantSettings::seed(now_millis()),
            };

            if let Some(name) = data.restaurant_name {
                settings.restaurant_name = name;
            }
            if let Some(address) = data.restaurant_address {
                settings.restaurant_address = address;
            }
            if let Some(tax_id) = data.tax_id {
                settings.tax_id = tax_id;
            }
            if let Some(tax_rate) = data.tax_rate {
                settings.tax_rate = tax_rate;
            }
            if let Some(service_charge_rate) = data.service_charge_rate {
                settings.service_charge_rate = service_charge_rate;
            }
            settings.updated_at = now_millis();

            table.insert(SETTINGS_KEY, serde_json::to_vec(&settings)?.as_slice())?;
            settings
        };
        txn.commit()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> SettingsRepository {
        SettingsRepository::new(Store::open_in_memory().unwrap())
    }

    #[test]
    fn test_get_seeds_defaults() {
        let repo = repo();
        let settings = repo.get().unwrap();
        assert_eq!(settings.tax_rate, 0.0);
        assert_eq!(settings.service_charge_rate, 0.0);
        // Second read returns the persisted document
        assert_eq!(repo.get().unwrap(), settings);
    }

    #[test]
    fn test_partial_update() {
        let repo = repo();
        let updated = repo
            .update(SettingsUpdate {
                restaurant_name: Some("La Comanda".to_string()),
                restaurant_address: None,
                tax_id: Some("B-12345678".to_string()),
                tax_rate: Some(0.12),
                service_charge_rate: Some(0.10),
            })
            .unwrap();
        assert_eq!(updated.restaurant_name, "La Comanda");
        assert_eq!(updated.tax_rate, 0.12);
        // Untouched field keeps its default
        assert_eq!(updated.restaurant_address, "");
    }

    #[test]
    fn test_rate_bounds() {
        let repo = repo();
        let result = repo.update(SettingsUpdate {
            restaurant_name: None,
            restaurant_address: None,
            tax_id: None,
            tax_rate: Some(12.0), // percent instead of fraction
            service_charge_rate: None,
        });
        assert!(matches!(result, Err(RepoError::Validation(_))));
    }
}
