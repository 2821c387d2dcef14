//! Channel model -> entity mapper

use chat_core::entities::Channel;
use chat_core::value_objects::Snowflake;

use crate::models::ChannelModel;

impl From<ChannelModel> for Channel {
    fn from(model: ChannelModel) -> Self {
        Channel {
            id: Snowflake::new(model.id),
            name: model.name,
            created_at: model.created_at,
        }
    }
}
