//! Path parameter extractors

use chat_core::Snowflake;

use crate::response::ApiError;

/// Path parameters with channel_id
#[derive(Debug, serde::Deserialize)]
pub struct ChannelIdPath {
    pub channel_id: String,
}

impl ChannelIdPath {
    /// Parse channel_id as Snowflake
    pub fn channel_id(&self) -> Result<Snowflake, ApiError> {
        self.channel_id
            .parse()
            .map_err(|_| ApiError::invalid_path("Invalid channel_id format"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_id_parsing() {
        let ok = ChannelIdPath { channel_id: "1234".to_string() };
        assert_eq!(ok.channel_id().unwrap(), Snowflake::new(1234));

        let bad = ChannelIdPath { channel_id: "general".to_string() };
        assert_eq!(bad.channel_id().unwrap_err().error_code(), "INVALID_PATH_PARAMETER");
    }
}
