//! Query model
//!
//! A [`Query`] describes one target of a dashboard request. Only a fixed subset of
//! its fields takes part in cache identity (see [`crate::fingerprint`]); `ref_id`
//! and `label` are per-panel bookkeeping and are ignored.

use serde::{Deserialize, Serialize};

/// Kind of data a query asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QueryType {
    /// Latest value of a property (one row per asset)
    PropertyValue,
    /// Raw historical values of a property
    PropertyValueHistory,
    /// Aggregated values of a property over resolution buckets
    PropertyAggregate,
    /// Interpolated values of a property at regular intervals
    PropertyInterpolated,
    ListAssetModels,
    ListAssets,
    ListAssociatedAssets,
    ListAssetProperties,
    ListTimeSeries,
    DescribeAsset,
}

impl QueryType {
    /// Every query kind, in declaration order
    pub const ALL: [QueryType; 10] = [
        QueryType::PropertyValue,
        QueryType::PropertyValueHistory,
        QueryType::PropertyAggregate,
        QueryType::PropertyInterpolated,
        QueryType::ListAssetModels,
        QueryType::ListAssets,
        QueryType::ListAssociatedAssets,
        QueryType::ListAssetProperties,
        QueryType::ListTimeSeries,
        QueryType::DescribeAsset,
    ];

    /// Wire name of the query kind
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::PropertyValue => "PropertyValue",
            QueryType::PropertyValueHistory => "PropertyValueHistory",
            QueryType::PropertyAggregate => "PropertyAggregate",
            QueryType::PropertyInterpolated => "PropertyInterpolated",
            QueryType::ListAssetModels => "ListAssetModels",
            QueryType::ListAssets => "ListAssets",
            QueryType::ListAssociatedAssets => "ListAssociatedAssets",
            QueryType::ListAssetProperties => "ListAssetProperties",
            QueryType::ListTimeSeries => "ListTimeSeries",
            QueryType::DescribeAsset => "DescribeAsset",
        }
    }

    /// Whether the kind produces frames with a time column
    ///
    /// Only these kinds are trimmed and re-requested by paginating requests.
    pub fn is_time_series(&self) -> bool {
        matches!(
            self,
            QueryType::PropertyValue
                | QueryType::PropertyValueHistory
                | QueryType::PropertyAggregate
                | QueryType::PropertyInterpolated
        )
    }

    /// Whether the kind returns only the latest value, which is never served from cache
    pub fn is_latest_value(&self) -> bool {
        matches!(self, QueryType::PropertyValue)
    }
}

impl std::fmt::Display for QueryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of the response frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    Table,
    #[serde(rename = "timeseries")]
    TimeSeries,
}

impl ResponseFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseFormat::Table => "table",
            ResponseFormat::TimeSeries => "timeseries",
        }
    }
}

/// Data quality filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Quality {
    Any,
    Good,
    Bad,
    Uncertain,
}

impl Quality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::Any => "ANY",
            Quality::Good => "GOOD",
            Quality::Bad => "BAD",
            Quality::Uncertain => "UNCERTAIN",
        }
    }
}

/// Aggregation resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    #[serde(rename = "AUTO")]
    Auto,
    #[serde(rename = "RAW")]
    Raw,
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "1d")]
    OneDay,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Auto => "AUTO",
            Resolution::Raw => "RAW",
            Resolution::OneMinute => "1m",
            Resolution::FifteenMinutes => "15m",
            Resolution::OneHour => "1h",
            Resolution::OneDay => "1d",
        }
    }
}

/// Order of the rows in time-series frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeOrdering {
    Ascending,
    Descending,
}

impl TimeOrdering {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeOrdering::Ascending => "ASCENDING",
            TimeOrdering::Descending => "DESCENDING",
        }
    }
}

/// Which assets a `ListAssets` query enumerates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetFilter {
    All,
    TopLevel,
}

impl AssetFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetFilter::All => "ALL",
            AssetFilter::TopLevel => "TOP_LEVEL",
        }
    }
}

/// Reference to the data source instance that executes a query
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataSourceRef {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub uid: Option<String>,
}

impl DataSourceRef {
    pub fn new(kind: impl Into<String>, uid: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            uid: Some(uid.into()),
        }
    }
}

/// One target of a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    /// Panel-local identifier that tags the frames produced for this query
    pub ref_id: String,
    pub query_type: QueryType,
    pub region: Option<String>,
    pub response_format: Option<ResponseFormat>,
    pub asset_id: Option<String>,
    pub asset_ids: Option<Vec<String>>,
    pub property_id: Option<String>,
    pub property_alias: Option<String>,
    pub quality: Option<Quality>,
    pub resolution: Option<Resolution>,
    /// Keep one observation before the requested window
    pub last_observation: Option<bool>,
    pub flatten_l4e: Option<bool>,
    /// Page size cap for aggregate queries
    pub max_page_aggregations: Option<u32>,
    pub datasource: Option<DataSourceRef>,
    pub time_ordering: Option<TimeOrdering>,
    pub load_all_children: Option<bool>,
    pub hierarchy_id: Option<String>,
    pub model_id: Option<String>,
    pub filter: Option<AssetFilter>,
    /// Display label; not part of cache identity
    pub label: Option<String>,
}

impl Query {
    /// Create a query with only the required fields set
    pub fn new(ref_id: impl Into<String>, query_type: QueryType) -> Self {
        Self {
            ref_id: ref_id.into(),
            query_type,
            region: None,
            response_format: None,
            asset_id: None,
            asset_ids: None,
            property_id: None,
            property_alias: None,
            quality: None,
            resolution: None,
            last_observation: None,
            flatten_l4e: None,
            max_page_aggregations: None,
            datasource: None,
            time_ordering: None,
            load_all_children: None,
            hierarchy_id: None,
            model_id: None,
            filter: None,
            label: None,
        }
    }

    /// Whether rows of this query's frames are newest-first
    pub fn is_descending(&self) -> bool {
        self.time_ordering == Some(TimeOrdering::Descending)
    }

    /// Whether one sample before the window is retained when trimming
    pub fn keeps_last_observation(&self) -> bool {
        self.last_observation.unwrap_or(false)
    }
}
