/// Validator settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// Channel type used by connections whose channel spec names no type.
    pub default_channel_type: String,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            default_channel_type: "ned.DatarateChannel".to_string(),
        }
    }
}

impl ValidatorConfig {
    pub fn with_default_channel_type(mut self, name: impl Into<String>) -> Self {
        self.default_channel_type = name.into();
        self
    }
}
