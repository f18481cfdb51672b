use serde::{Deserialize, Serialize};

pub type Id = String;

pub const DEFAULT_FRIENDLY_NAME: &str = "Kettle";
pub const DEFAULT_DESCRIPTION: &str = "Brew Time Kettle";
pub const DEFAULT_MANUFACTURER: &str = "Steven Tomlinson";
pub const DEFAULT_DISPLAY_CATEGORY: &str = "SWITCH";

/// The single device the gateway drives, plus what discovery tells the
/// assistant about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfiguration {
    pub device_id: Id,
    pub friendly_name: String,
    pub description: String,
    pub manufacturer_name: String,
    pub display_categories: Vec<String>,
}

impl DeviceConfiguration {
    pub fn new(device_id: impl Into<Id>) -> Self {
        Self {
            device_id: device_id.into(),
            friendly_name: DEFAULT_FRIENDLY_NAME.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            manufacturer_name: DEFAULT_MANUFACTURER.to_string(),
            display_categories: vec![DEFAULT_DISPLAY_CATEGORY.to_string()],
        }
    }

    pub fn friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = name.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn manufacturer_name(mut self, name: impl Into<String>) -> Self {
        self.manufacturer_name = name.into();
        self
    }

    pub fn display_categories(mut self, categories: Vec<String>) -> Self {
        self.display_categories = categories;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_overrides() {
        let dev = DeviceConfiguration::new("kettle-1");
        assert_eq!(dev.friendly_name, "Kettle");
        assert_eq!(dev.display_categories, vec!["SWITCH".to_string()]);

        let dev = dev
            .friendly_name("Office Kettle")
            .display_categories(vec!["SWITCH".into(), "OTHER".into()]);
        assert_eq!(dev.device_id, "kettle-1");
        assert_eq!(dev.friendly_name, "Office Kettle");
        assert_eq!(dev.display_categories.len(), 2);
    }
}
