use chrono::{DateTime, Utc};
use http::HeaderMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Geolocation fields as returned by the provider.
///
/// Every field is optional: the provider omits anything it cannot resolve,
/// and an empty answer is still a valid answer.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProviderLocation {
    pub city: Option<String>,

    pub region: Option<String>,

    pub country: Option<String>,

    /// Coordinates as a single `"lat,lon"` string.
    pub loc: Option<String>,

    pub org: Option<String>,

    pub postal: Option<String>,

    pub timezone: Option<String>,
}

impl ProviderLocation {
    /// Split the `"lat,lon"` pair into numeric coordinates.
    ///
    /// A missing or malformed pair yields `(None, None)` rather than failing
    /// the whole lookup.
    #[must_use]
    pub fn coordinates(&self) -> (Option<f64>, Option<f64>) {
        let Some(ref loc) = self.loc else { return (None, None) };

        let Some((latitude, longitude)) = loc.split_once(',') else { return (None, None) };

        match (latitude.trim().parse::<f64>(), longitude.trim().parse::<f64>()) {
            (Ok(latitude), Ok(longitude)) => (Some(latitude), Some(longitude)),
            _ => (None, None),
        }
    }
}

/// Request metadata captured alongside a lookup.
#[derive(Clone, Debug, Default)]
pub struct RequestMetadata {
    pub user_agent: Option<String>,

    pub referer: Option<String>,
}

impl RequestMetadata {
    /// Both referer header spellings are seen in the wild.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let header = |name: &str| {
            headers.get(name).and_then(|value| value.to_str().ok()).map(str::to_string)
        };

        Self {
            user_agent: header("user-agent"),
            referer: header("referer").or_else(|| header("referrer")),
        }
    }
}

/// A single resolved lookup, persisted at most once.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LocationRecord {
    /// Client address the lookup was performed for
    pub ip: String,

    pub city: Option<String>,

    pub region: Option<String>,

    /// Country code as reported by the provider
    pub country: Option<String>,

    pub latitude: Option<f64>,

    pub longitude: Option<f64>,

    /// Owning organization or carrier
    pub org: Option<String>,

    pub postal: Option<String>,

    pub timezone: Option<String>,

    /// `User-Agent` header of the requesting client
    pub user_agent: Option<String>,

    pub referer: Option<String>,

    /// When the lookup was resolved
    pub recorded_at: DateTime<Utc>,
}

impl LocationRecord {
    #[must_use]
    pub fn new(ip: String, provider: ProviderLocation, metadata: RequestMetadata) -> Self {
        let (latitude, longitude) = provider.coordinates();

        Self {
            ip,
            city: provider.city,
            region: provider.region,
            country: provider.country,
            latitude,
            longitude,
            org: provider.org,
            postal: provider.postal,
            timezone: provider.timezone,
            user_agent: metadata.user_agent,
            referer: metadata.referer,
            recorded_at: Utc::now(),
        }
    }
}

/// Reduced projection of a [`LocationRecord`] returned to the caller.
///
/// Fields the provider could not resolve are emitted as explicit nulls.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct LocationResponse {
    /// Resolved client address
    #[schema(example = "8.8.8.8")]
    pub ip: String,

    #[schema(example = "Mountain View")]
    pub city: Option<String>,

    #[schema(example = "CA")]
    pub region: Option<String>,

    #[schema(example = "US")]
    pub country: Option<String>,

    pub latitude: Option<f64>,

    pub longitude: Option<f64>,

    #[schema(example = "America/Los_Angeles")]
    pub timezone: Option<String>,

    pub org: Option<String>,
}

impl From<LocationRecord> for LocationResponse {
    fn from(record: LocationRecord) -> Self {
        Self {
            ip: record.ip,
            city: record.city,
            region: record.region,
            country: record.country,
            latitude: record.latitude,
            longitude: record.longitude,
            timezone: record.timezone,
            org: record.org,
        }
    }
}

#[cfg(test)]
mod tests {
    use http::{HeaderMap, HeaderValue};
    use serde_json::json;

    use super::{LocationRecord, LocationResponse, ProviderLocation, RequestMetadata};

    #[test]
    fn coordinates_split_on_comma() {
        let provider = ProviderLocation {
            loc: Some("37.4,-122.08".to_string()),
            ..ProviderLocation::default()
        };

        assert_eq!(provider.coordinates(), (Some(37.4), Some(-122.08)));
    }

    #[test]
    fn coordinates_tolerate_whitespace() {
        let provider = ProviderLocation {
            loc: Some(" 37.4 , -122.08 ".to_string()),
            ..ProviderLocation::default()
        };

        assert_eq!(provider.coordinates(), (Some(37.4), Some(-122.08)));
    }

    #[test]
    fn malformed_coordinates_become_none() {
        for loc in ["37.4", "north,south", "37.4;-122.08", ""] {
            let provider = ProviderLocation {
                loc: Some(loc.to_string()),
                ..ProviderLocation::default()
            };

            assert_eq!(provider.coordinates(), (None, None), "loc = {loc:?}");
        }
    }

    #[test]
    fn missing_coordinates_become_none() {
        assert_eq!(ProviderLocation::default().coordinates(), (None, None));
    }

    #[test]
    fn empty_provider_answer_projects_to_nulls() {
        let provider: ProviderLocation =
            serde_json::from_str("{}").expect("empty object is a valid provider answer");
        let record =
            LocationRecord::new("203.0.113.9".to_string(), provider, RequestMetadata::default());

        let body = serde_json::to_value(LocationResponse::from(record))
            .expect("response is serializable");

        assert_eq!(
            body,
            json!({
                "ip": "203.0.113.9",
                "city": null,
                "region": null,
                "country": null,
                "latitude": null,
                "longitude": null,
                "timezone": null,
                "org": null,
            })
        );
    }

    #[test]
    fn projection_keeps_the_reduced_field_set() {
        let provider = ProviderLocation {
            city: Some("Mountain View".to_string()),
            region: Some("CA".to_string()),
            country: Some("US".to_string()),
            loc: Some("37.4,-122.08".to_string()),
            org: Some("Google".to_string()),
            postal: Some("94043".to_string()),
            timezone: Some("America/Los_Angeles".to_string()),
        };
        let record =
            LocationRecord::new("8.8.8.8".to_string(), provider, RequestMetadata::default());

        let body = serde_json::to_value(LocationResponse::from(record))
            .expect("response is serializable");

        assert_eq!(
            body,
            json!({
                "ip": "8.8.8.8",
                "city": "Mountain View",
                "region": "CA",
                "country": "US",
                "latitude": 37.4,
                "longitude": -122.08,
                "timezone": "America/Los_Angeles",
                "org": "Google",
            })
        );
    }

    #[test]
    fn referer_falls_back_to_the_other_spelling() {
        let mut headers = HeaderMap::new();
        headers.insert("referrer", HeaderValue::from_static("https://example.com/"));

        let metadata = RequestMetadata::from_headers(&headers);
        assert_eq!(metadata.referer.as_deref(), Some("https://example.com/"));

        headers.insert("referer", HeaderValue::from_static("https://example.org/"));

        let metadata = RequestMetadata::from_headers(&headers);
        assert_eq!(metadata.referer.as_deref(), Some("https://example.org/"));
    }

    #[test]
    fn user_agent_is_captured() {
        let mut headers = HeaderMap::new();
        headers.insert("user-agent", HeaderValue::from_static("curl/8.5.0"));

        let metadata = RequestMetadata::from_headers(&headers);
        assert_eq!(metadata.user_agent.as_deref(), Some("curl/8.5.0"));
        assert_eq!(metadata.referer, None);
    }
}
