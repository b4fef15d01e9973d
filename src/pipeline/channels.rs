use crate::config::Config;
use crate::credentials::{ChannelStatsOperation, CredentialsExhausted, ResilientInvoker};
use std::collections::HashMap;

/// Follower counts by channel id
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelMetrics {
    followers: HashMap<String, u64>,
}

impl ChannelMetrics {
    /// Follower count for a channel; unknown channels count as 0
    pub fn follower_count(&self, channel_id: &str) -> u64 {
        self.followers.get(channel_id).copied().unwrap_or(0)
    }

    pub fn contains(&self, channel_id: &str) -> bool {
        self.followers.contains_key(channel_id)
    }

    pub fn len(&self) -> usize {
        self.followers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.followers.is_empty()
    }
}

/// Looks up follower counts for the channels of a query's videos
#[derive(Debug, Clone)]
pub struct ChannelEnricher {
    batch_size: usize,
}

impl ChannelEnricher {
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.api.batch_size)
    }

    /// Fetches counts in batches; a failed batch leaves its channels unmapped
    pub async fn fetch(
        &self,
        invoker: &mut ResilientInvoker,
        channel_ids: &[String],
    ) -> Result<ChannelMetrics, CredentialsExhausted> {
        let mut metrics = ChannelMetrics::default();

        for chunk in channel_ids.chunks(self.batch_size) {
            let operation = ChannelStatsOperation {
                ids: chunk.to_vec(),
            };
            let Some(items) = invoker.invoke(&operation).await.into_result()? else {
                continue;
            };

            for item in items {
                let count = if item.statistics.hidden_subscriber_count {
                    0
                } else {
                    item.statistics.subscriber_count.unwrap_or(0)
                };
                metrics.followers.insert(item.id, count);
            }
        }

        Ok(metrics)
    }
}
