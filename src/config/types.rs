use serde::Deserialize;
use std::fmt;

/// Main configuration structure for Vidscout
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Remote API access configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the video API (endpoints are appended to it)
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Ordered list of API keys; rotated through as quotas run out
    pub credentials: Vec<String>,

    /// Maximum number of ids per detail/channel request
    #[serde(rename = "batch-size")]
    pub batch_size: usize,

    /// Number of results requested from each search call
    #[serde(rename = "search-page-size")]
    pub search_page_size: usize,

    /// Content-type filter passed to the search call
    #[serde(rename = "content-type")]
    pub content_type: String,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            credentials: Vec::new(),
            batch_size: 50,
            search_page_size: 50,
            content_type: "video".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// What to crawl and how to classify it
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Search queries, processed in order
    pub queries: Vec<String>,

    /// Sort orders each query is searched with; earlier entries win strategy tagging
    #[serde(rename = "sort-strategies")]
    pub sort_strategies: Vec<SortStrategy>,

    /// Videos at or below this many seconds are flagged as short-form
    #[serde(rename = "short-form-threshold-secs")]
    pub short_form_threshold_secs: u64,

    /// Titles starting with any of these are auto-generated mixes and get dropped
    #[serde(rename = "synthetic-title-prefixes")]
    pub synthetic_title_prefixes: Vec<String>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            queries: DEFAULT_QUERIES.iter().map(|q| q.to_string()).collect(),
            sort_strategies: vec![
                SortStrategy::ViewCount,
                SortStrategy::Relevance,
                SortStrategy::Rating,
                SortStrategy::Date,
            ],
            short_form_threshold_secs: 60,
            synthetic_title_prefixes: vec!["Mix -".to_string(), "Mix:".to_string()],
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the semicolon-delimited dataset
    #[serde(rename = "dataset-path")]
    pub dataset_path: String,

    /// Path to the SQLite run journal
    #[serde(rename = "journal-path")]
    pub journal_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dataset_path: "youtube_dataset.csv".to_string(),
            journal_path: "vidscout_journal.db".to_string(),
        }
    }
}

/// Result ordering requested from the search endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortStrategy {
    Date,
    Rating,
    Relevance,
    Title,
    VideoCount,
    ViewCount,
}

impl SortStrategy {
    /// Wire name used by the search endpoint and stored in the dataset
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Rating => "rating",
            Self::Relevance => "relevance",
            Self::Title => "title",
            Self::VideoCount => "videoCount",
            Self::ViewCount => "viewCount",
        }
    }
}

impl fmt::Display for SortStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Built-in query list, grouped loosely by content niche
pub const DEFAULT_QUERIES: &[&str] = &[
    // Camera-default and low-effort titles
    "IMG 0001", "IMG 1234", "DSC 0001", "MVI 0001", "MOV 0001", "video",
    "untitled", "test video", "my first video", "VID 2024", "GOPR 0001",
    // Popular and viral
    "new", "live", "2025", "best", "top 10", "shorts", "viral", "trending",
    "asmr", "funny", "prank", "challenge", "tiktok", "meme", "comedy", "satisfying",
    // Games
    "minecraft", "roblox", "gta 5", "fortnite", "valorant", "gameplay", "stream",
    "ps5", "league of legends", "call of duty", "pokemon", "sims 4", "fifa 24",
    "horror game", "speedrun", "elden ring",
    // Music
    "music", "song", "lofi", "remix", "karaoke", "lyrics", "cover", "relaxing music",
    "bass boosted", "rap", "hip hop", "meditation sounds", "rain sounds",
    // Education and tutorials
    "vlog", "tutorial", "how to", "diy", "life hacks", "makeup", "workout",
    "study", "cooking", "coding", "python", "excel tutorial", "photoshop",
    // Tech and news
    "review", "unboxing", "tech news", "iphone 15", "samsung galaxy", "macbook",
    "news", "interview", "podcast", "football", "nba", "movie trailer", "messi", "ronaldo",
];
