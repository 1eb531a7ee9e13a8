//! Reply formatting
//!
//! One pure function per payload shape. Absent fields render a placeholder so
//! every line of a template is always present.

use crate::model::{CompanyProfile, Exchange, IpoListing, Scalar, StockQuote, TrendingQuote};
use std::borrow::Cow;
use std::fmt;

/// Placeholder for absent quote fields
pub const NOT_APPLICABLE: &str = "N/A";
/// Placeholder for absent company fields
pub const NOT_AVAILABLE: &str = "Not Available";
/// Placeholder for unannounced IPO details
pub const TO_BE_ANNOUNCED: &str = "TBA";
/// Placeholder for an absent company description
pub const NO_DESCRIPTION: &str = "No description available.";
/// Link target when an IPO has no document
pub const NO_DOCUMENT: &str = "#";

/// Entries shown for most-active and IPO lists
pub const LIST_LIMIT: usize = 5;
/// Entries shown per trending section
pub const TRENDING_LIMIT: usize = 3;

/// Discord message length limit, in characters
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Shown when an error carries no upstream message
pub const GENERIC_FAILURE: &str = "Please try again later.";

/// A well-formed response with nothing to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyResult {
    MostActive(Exchange),
    UpcomingIpos,
    CompanyNotFound,
    Trending,
}

impl fmt::Display for EmptyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyResult::MostActive(exchange) => {
                write!(f, "❌ No active stocks found for {exchange}.")
            }
            EmptyResult::UpcomingIpos => f.write_str("❌ No upcoming IPOs found."),
            EmptyResult::CompanyNotFound => f.write_str("❌ Company not found."),
            EmptyResult::Trending => f.write_str("❌ No trending data available at the moment."),
        }
    }
}

fn or<'a>(field: Option<&'a Scalar>, placeholder: &'a str) -> &'a str {
    field.and_then(Scalar::text).unwrap_or(placeholder)
}

/// Top entries of a most-active list
pub fn most_active(exchange: Exchange, quotes: &[StockQuote]) -> String {
    let entries = quotes
        .iter()
        .take(LIST_LIMIT)
        .enumerate()
        .map(|(i, quote)| quote_entry(i + 1, quote))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("📢 **Top {LIST_LIMIT} Most Active {exchange} Stocks:**\n\n{entries}")
}

/// One ranked most-active entry
pub fn quote_entry(rank: usize, quote: &StockQuote) -> String {
    let na = NOT_APPLICABLE;
    format!(
        "📌 **{rank}. {} ({})**\n\
         💰 Price: ₹{} | 📈 Change: {} ({}%)\n\
         🔺 High: ₹{} | 🔻 Low: ₹{} | 🕒 Volume: {}\n\
         📊 Rating: {} | 📉 Trend: {}, {}",
        or(quote.company.as_ref(), na),
        or(quote.ticker.as_ref(), na),
        or(quote.price.as_ref(), na),
        or(quote.net_change.as_ref(), na),
        or(quote.percent_change.as_ref(), na),
        or(quote.high.as_ref(), na),
        or(quote.low.as_ref(), na),
        quote
            .volume
            .as_ref()
            .and_then(Scalar::text)
            .map_or_else(|| na.to_string(), group_thousands),
        or(quote.overall_rating.as_ref(), na),
        or(quote.short_term_trend.as_ref(), na),
        or(quote.long_term_trend.as_ref(), na),
    )
}

/// First entries of the upcoming IPO calendar
pub fn upcoming_ipos(listings: &[IpoListing]) -> String {
    let entries = listings
        .iter()
        .take(LIST_LIMIT)
        .enumerate()
        .map(|(i, ipo)| ipo_entry(i + 1, ipo))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!("📢 **Upcoming IPOs:**\n\n{entries}")
}

pub fn ipo_entry(rank: usize, ipo: &IpoListing) -> String {
    let tba = TO_BE_ANNOUNCED;
    format!(
        "📌 **{rank}. {} ({})**\n\
         📄 [Doc]({}) | 💸 ₹{} - ₹{}\n\
         📅 Bidding: {} - {}",
        or(ipo.name.as_ref(), NOT_APPLICABLE),
        or(ipo.symbol.as_ref(), NOT_APPLICABLE),
        or(ipo.document_url.as_ref(), NO_DOCUMENT),
        or(ipo.min_price.as_ref(), tba),
        or(ipo.max_price.as_ref(), tba),
        or(ipo.bidding_start_date.as_ref(), tba),
        or(ipo.bidding_end_date.as_ref(), tba),
    )
}

/// Company card; callers check [`CompanyProfile::is_found`] first
pub fn company_info(profile: &CompanyProfile) -> String {
    format!(
        "📊 **{}**\n\
         *Industry:* {}\n\
         *Description:* {}\n\
         \n\
         💹 **Stock Info**\n\
         - **NSE Price:** ₹{}\n\
         - **BSE Price:** ₹{}\n\
         - **Market Cap:** ₹{} Cr",
        or(profile.company_name.as_ref(), NOT_AVAILABLE),
        or(profile.industry.as_ref(), NOT_AVAILABLE),
        or(profile.description(), NO_DESCRIPTION),
        or(profile.nse_price(), NOT_AVAILABLE),
        or(profile.bse_price(), NOT_AVAILABLE),
        or(profile.market_cap(), NOT_APPLICABLE),
    )
}

/// Gainers and losers; both headers are always present
pub fn trending(gainers: &[TrendingQuote], losers: &[TrendingQuote]) -> String {
    let section = |quotes: &[TrendingQuote], marker: &str| {
        quotes
            .iter()
            .take(TRENDING_LIMIT)
            .enumerate()
            .map(|(i, quote)| trending_entry(marker, i + 1, quote))
            .collect::<Vec<_>>()
            .join("\n\n")
    };

    let message = format!(
        "📢 **Top {TRENDING_LIMIT} Gainers:**\n\n{}\n\n🟥 **Top {TRENDING_LIMIT} Losers:**\n\n{}",
        section(gainers, "📈"),
        section(losers, "📉"),
    );
    message.trim_end().to_string()
}

pub fn trending_entry(marker: &str, rank: usize, quote: &TrendingQuote) -> String {
    let na = NOT_APPLICABLE;
    let volume = quote
        .volume
        .as_ref()
        .and_then(Scalar::text)
        .and_then(parse_leading_integer)
        .map_or_else(|| na.to_string(), |v| group_thousands(&v.to_string()));

    format!(
        "{marker} **{rank}. {} ({})**\n\
         💰 Price: ₹{} | 📊 Change: {} ({}%)\n\
         🔺 High: ₹{} | 🔻 Low: ₹{} | 🕒 Volume: {volume}",
        or(quote.company_name.as_ref(), na),
        or(quote.ticker_id.as_ref(), na),
        or(quote.price.as_ref(), na),
        or(quote.net_change.as_ref(), na),
        or(quote.percent_change.as_ref(), na),
        or(quote.high.as_ref(), na),
        or(quote.low.as_ref(), na),
    )
}

/// Reply sent when a command fails after deferral
pub fn failure(upstream_message: Option<&str>) -> String {
    let message = upstream_message
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(GENERIC_FAILURE);
    format!("🚨 Something went wrong: {message}")
}

/// Insert `,` between thousands of a decimal number.
///
/// Non-numeric text is returned unchanged.
pub fn group_thousands(text: &str) -> String {
    let text = text.trim();
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (unsigned, None),
    };

    let numeric = !int_part.is_empty()
        && int_part.bytes().all(|b| b.is_ascii_digit())
        && frac_part.is_none_or(|f| f.bytes().all(|b| b.is_ascii_digit()));
    if !numeric {
        return text.to_string();
    }

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match frac_part {
        Some(frac) if !frac.is_empty() => format!("{sign}{grouped}.{frac}"),
        _ => format!("{sign}{grouped}"),
    }
}

/// Integer prefix of `text`: optional sign then digits, anything after is ignored
pub fn parse_leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let digits_start = usize::from(text.starts_with(['-', '+']));
    let digits_len = text[digits_start..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return None;
    }
    text[..digits_start + digits_len].parse().ok()
}

/// Truncate a reply to the Discord message limit
pub fn fit_message(content: &str) -> Cow<'_, str> {
    if content.chars().count() <= MAX_MESSAGE_CHARS {
        return Cow::Borrowed(content);
    }
    let mut truncated: String = content.chars().take(MAX_MESSAGE_CHARS - 1).collect();
    truncated.push('…');
    Cow::Owned(truncated)
}
