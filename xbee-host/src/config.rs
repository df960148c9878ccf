use std::fs;

use serde_derive::Deserialize;

#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct Config {
    pub port: Option<String>,
    pub baud_rate: Option<u32>,
    pub manufacturer: Option<String>,
    pub model: Option<String>,
    pub location: Option<String>,
}

pub fn parse_config(text: &str) -> Option<Config> {
    match toml::from_str::<Config>(text) {
        Ok(config) => Some(config),
        Err(err) => {
            log::error!("Invalid configuration, {}", err);
            None
        }
    }
}

pub fn read_config(file_path: &str) -> Option<Config> {
    match fs::read(file_path) {
        Ok(bytes) => parse_config(&String::from_utf8_lossy(bytes.as_slice())),
        Err(err) => {
            log::error!("Failed to read \"{}\", {}", file_path, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let text = r#"
port = "/dev/ttyUSB0"
baud_rate = 9600
manufacturer = "Digi"
model = "XBee3"
location = "Hallway"
"#;
        let config = parse_config(text).unwrap();
        assert_eq!(config.port.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(config.baud_rate, Some(9600));
        assert_eq!(config.manufacturer.as_deref(), Some("Digi"));
        assert_eq!(config.model.as_deref(), Some("XBee3"));
        assert_eq!(config.location.as_deref(), Some("Hallway"));
    }

    #[test]
    fn parse_partial_config() {
        let config = parse_config("baud_rate = 115200").unwrap();
        assert_eq!(
            config,
            Config {
                baud_rate: Some(115_200),
                ..Default::default()
            }
        );
        assert!(parse_config("baud_rate = \"fast\"").is_none());
    }
}
