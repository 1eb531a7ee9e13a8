//! Typed views over upstream payloads
//!
//! The stock API is loosely typed: fields go missing, numbers arrive as
//! strings, and whole sections are sometimes `null`. Every field here is
//! optional and deserialized leniently, so a section with an unexpected shape
//! reads as absent instead of failing the reply. Placeholders for absent
//! values are chosen by the formatter.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::fmt;

/// Exchange served by the most-active endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Exchange {
    Nse,
    Bse,
}

impl Exchange {
    /// Upper-case code used in paths and messages
    pub fn code(self) -> &'static str {
        match self {
            Exchange::Nse => "NSE",
            Exchange::Bse => "BSE",
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A scalar upstream value kept as display text.
///
/// Strings are taken verbatim, numbers are rendered the way the upstream
/// JSON would print in a browser (`105.0` becomes `105`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scalar(String);

impl Scalar {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Display text, `None` when blank
    pub fn text(&self) -> Option<&str> {
        let trimmed = self.0.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self(s)),
            Value::Number(n) => Some(Self(render_number(&n))),
            Value::Bool(b) => Some(Self(b.to_string())),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Scalar::from_value(value).ok_or_else(|| serde::de::Error::custom("expected a scalar"))
    }
}

fn render_number(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if !n.is_i64() && !n.is_u64() && f.fract() == 0.0 && f.abs() < 1e15 => {
            format!("{f:.0}")
        }
        _ => n.to_string(),
    }
}

/// Deserialize `T`, reading any mismatch as absent
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// Deserialize a list, dropping entries that do not match `T`
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(lenient_slots(deserializer)?.into_iter().flatten().collect())
}

/// Deserialize a list keeping positions; mismatched entries become `None`
fn lenient_slots<'de, D, T>(deserializer: D) -> Result<Vec<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items.into_iter().map(|item| T::deserialize(item).ok()).collect(),
        _ => Vec::new(),
    })
}

/// Entry of the NSE/BSE most-active lists
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StockQuote {
    #[serde(default, deserialize_with = "lenient")]
    pub company: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub ticker: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub price: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub net_change: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub percent_change: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub high: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub low: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub volume: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub overall_rating: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub short_term_trend: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub long_term_trend: Option<Scalar>,
}

impl StockQuote {
    /// Read a most-active response; anything but a list reads as empty
    pub fn list_from(value: Value) -> Vec<StockQuote> {
        lenient_list(value).unwrap_or_default()
    }
}

/// Entry of the upcoming IPO calendar
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IpoListing {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub symbol: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub document_url: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub min_price: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub max_price: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub bidding_start_date: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub bidding_end_date: Option<Scalar>,
}

/// `/ipo` response; only the upcoming section is read
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct IpoCalendar {
    #[serde(default, deserialize_with = "lenient_list")]
    pub upcoming: Vec<IpoListing>,
}

impl IpoCalendar {
    pub fn from_value(value: Value) -> Self {
        Self::deserialize(value).unwrap_or_default()
    }
}

/// Gainer or loser in the trending response
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TrendingQuote {
    #[serde(default, deserialize_with = "lenient")]
    pub company_name: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub ticker_id: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub price: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub net_change: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub percent_change: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub high: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub low: Option<Scalar>,
    /// Sent as a string by the trending endpoint
    #[serde(default, deserialize_with = "lenient")]
    pub volume: Option<Scalar>,
}

/// Top gainers and losers, in upstream order
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TrendingSet {
    #[serde(default, deserialize_with = "lenient_list")]
    pub top_gainers: Vec<TrendingQuote>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub top_losers: Vec<TrendingQuote>,
}

impl TrendingSet {
    /// Read `trending_stocks` out of a `/trending` response
    pub fn from_value(value: Value) -> Self {
        #[derive(Deserialize)]
        struct Payload {
            #[serde(default, deserialize_with = "lenient")]
            trending_stocks: Option<TrendingSet>,
        }

        Payload::deserialize(value)
            .ok()
            .and_then(|p| p.trending_stocks)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.top_gainers.is_empty() && self.top_losers.is_empty()
    }
}

/// `/stock?name=` response
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CompanyProfile {
    #[serde(rename = "companyName", default, deserialize_with = "lenient")]
    pub company_name: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub industry: Option<Scalar>,
    #[serde(rename = "companyProfile", default, deserialize_with = "lenient")]
    pub profile: Option<ProfileDetails>,
    #[serde(rename = "currentPrice", default, deserialize_with = "lenient")]
    pub current_price: Option<CurrentPrice>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProfileDetails {
    #[serde(rename = "companyDescription", default, deserialize_with = "lenient")]
    pub company_description: Option<Scalar>,
    #[serde(rename = "peerCompanyList", default, deserialize_with = "lenient_slots")]
    pub peer_company_list: Vec<Option<PeerCompany>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PeerCompany {
    #[serde(rename = "companyName", default, deserialize_with = "lenient")]
    pub company_name: Option<Scalar>,
    #[serde(rename = "marketCap", default, deserialize_with = "lenient")]
    pub market_cap: Option<Scalar>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CurrentPrice {
    #[serde(rename = "NSE", default, deserialize_with = "lenient")]
    pub nse: Option<Scalar>,
    #[serde(rename = "BSE", default, deserialize_with = "lenient")]
    pub bse: Option<Scalar>,
}

/// Peer list slot holding the market capitalization.
///
/// The upstream schema puts the queried company second in its own peer list.
pub const MARKET_CAP_PEER_INDEX: usize = 1;

impl CompanyProfile {
    pub fn from_value(value: Value) -> Self {
        Self::deserialize(value).unwrap_or_default()
    }

    /// Whether the lookup matched a company
    pub fn is_found(&self) -> bool {
        self.company_name.as_ref().and_then(Scalar::text).is_some()
    }

    pub fn description(&self) -> Option<&Scalar> {
        self.profile.as_ref()?.company_description.as_ref()
    }

    pub fn nse_price(&self) -> Option<&Scalar> {
        self.current_price.as_ref()?.nse.as_ref()
    }

    pub fn bse_price(&self) -> Option<&Scalar> {
        self.current_price.as_ref()?.bse.as_ref()
    }

    pub fn market_cap(&self) -> Option<&Scalar> {
        self.profile
            .as_ref()?
            .peer_company_list
            .get(MARKET_CAP_PEER_INDEX)?
            .as_ref()?
            .market_cap
            .as_ref()
    }
}
