//! Conversion from `toolgate-config` logging settings.

use toolgate_config::LoggingSection;

use crate::logging::{LogConfig, LogFormat};

impl From<&LoggingSection> for LogConfig {
    fn from(section: &LoggingSection) -> Self {
        let format = LogFormat::from_name(&section.format).unwrap_or_default();
        let mut config = LogConfig::new(section.level.clone()).with_format(format);
        config.directives.clone_from(&section.directives);
        config
    }
}
