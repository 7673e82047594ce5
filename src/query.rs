use crate::time::TimeOfDay;
use log::debug;
use url::{form_urlencoded, Url};

/// Query parameter the booking link carries the first slot's start time in
pub const START_TIME_PARAM: &str = "start_time";

/// First value of `name` in a query string, if non-empty.
/// A leading `?` is accepted so `location.search` can be passed as-is.
///
/// # Examples
/// ```
/// use appointment_libs::query::query_param;
///
/// assert_eq!(query_param("?start_time=9%3A30am&x=1", "start_time"), Some("9:30am".to_string()));
/// assert_eq!(query_param("start_time=", "start_time"), None);
/// assert_eq!(query_param("start_time=&start_time=9:00am", "start_time"), None);
/// ```
pub fn query_param(query: &str, name: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);

    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// The base time for slot labels, if the query string carries a valid one
pub fn start_time(query: &str) -> Option<TimeOfDay> {
    query_param(query, START_TIME_PARAM).and_then(|value| TimeOfDay::parse_start_time(&value))
}

/// Same as [`start_time`], reading the query of a full page URL
pub fn start_time_from_url(href: &str) -> Option<TimeOfDay> {
    match Url::parse(href) {
        Ok(url) => url.query().and_then(start_time),
        Err(err) => {
            debug!("Ignoring page url {:?}: {}", href, err);
            None
        }
    }
}
