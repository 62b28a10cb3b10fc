use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Bus endpoint names are not empty
/// - Request priority and backend are not empty
/// - Session timeout is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let required = [
        ("bus.service", &config.bus.service),
        ("bus.path", &config.bus.path),
        ("bus.interface", &config.bus.interface),
        ("request.priority", &config.request.priority),
        ("request.backend", &config.request.backend),
    ];
    for (key, value) in required {
        if value.trim().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                key
            )));
        }
    }

    if !config.bus.path.starts_with('/') {
        return Err(ConfigError::ValidationError(
            "bus.path must be an absolute object path".to_string(),
        ));
    }

    if config.session.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "session.timeout_secs cannot be 0".to_string(),
        ));
    }

    Ok(())
}
