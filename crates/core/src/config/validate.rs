use url::Url;

use super::{types::Config, ConfigError};

/// Placeholder substituted with the video ID in the redirect template.
pub const VIDEO_ID_PLACEHOLDER: &str = "{video_id}";

/// Validate configuration
/// Currently validates:
/// - API base URL and redirect template are absolute URLs
/// - Redirect template contains the `{video_id}` placeholder
/// - Timeout and poll interval are not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if Url::parse(&config.api.base_url).is_err() {
        return Err(ConfigError::ValidationError(format!(
            "api.base_url is not a valid URL: {}",
            config.api.base_url
        )));
    }

    if config.api.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "api.timeout_secs cannot be 0".to_string(),
        ));
    }

    let template = &config.api.redirect_url_template;
    if !template.contains(VIDEO_ID_PLACEHOLDER) {
        return Err(ConfigError::ValidationError(format!(
            "api.redirect_url_template must contain {}",
            VIDEO_ID_PLACEHOLDER
        )));
    }
    if Url::parse(&template.replace(VIDEO_ID_PLACEHOLDER, "x")).is_err() {
        return Err(ConfigError::ValidationError(format!(
            "api.redirect_url_template is not a valid URL: {}",
            template
        )));
    }

    if config.tracker.poll_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "tracker.poll_interval_ms cannot be 0".to_string(),
        ));
    }

    Ok(())
}
