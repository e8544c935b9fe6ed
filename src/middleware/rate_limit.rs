use axum::http::Request;
use governor::{clock::QuantaInstant, middleware::NoOpMiddleware};
use std::{hash::Hash, net::IpAddr, sync::Arc, time::Duration};
use tower_governor::{
    errors::GovernorError,
    governor::{GovernorConfig, GovernorConfigBuilder},
    key_extractor::KeyExtractor,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IpKeyExtractor;

impl KeyExtractor for IpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        let headers = req.headers();

        // 1. Cloudflare header first. When the service sits behind CF the
        // real client IP is in 'cf-connecting-ip'; trusting it assumes the
        // origin only accepts traffic from CF.
        if let Some(ip) = headers
            .get("cf-connecting-ip")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.parse::<IpAddr>().ok())
        {
            return Ok(ip);
        }

        // 2. X-Forwarded-For as backup. First entry in the list is the
        // client when a generic load balancer or nginx sits in front.
        if let Some(ip) = headers
            .get("x-forwarded-for")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split(',').next())
            .and_then(|s| s.trim().parse::<IpAddr>().ok())
        {
            return Ok(ip);
        }

        // 3. Fallback to localhost. Mostly local dev, where the headers are
        // missing. In prod this lumps unknown IPs into one bucket, which
        // beats failing the request over a missing header.
        Ok("127.0.0.1".parse().unwrap())
    }
}

// Using NoOpMiddleware<QuantaInstant> because that's what the default
// builder produces.
pub type LoginConfig = GovernorConfig<IpKeyExtractor, NoOpMiddleware<QuantaInstant>>;

/// Login rate limit: 5 attempts per 15 minutes per IP.
///
/// Tight enough to make credential stuffing boring, loose enough for a
/// human who typoed their password a few times.
pub fn create_login_config() -> Arc<LoginConfig> {
    Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(IpKeyExtractor)
            .period(Duration::from_secs(180)) // 180s * 5 = 15 mins
            .burst_size(5)
            .finish()
            .unwrap(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn prefers_cloudflare_header() {
        let req = Request::builder()
            .header("cf-connecting-ip", "203.0.113.9")
            .header("x-forwarded-for", "198.51.100.1")
            .body(Body::empty())
            .unwrap();

        let key = IpKeyExtractor.extract(&req).unwrap();
        assert_eq!(key, "203.0.113.9".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn takes_first_forwarded_entry() {
        let req = Request::builder()
            .header("x-forwarded-for", "198.51.100.1, 10.0.0.2")
            .body(Body::empty())
            .unwrap();

        let key = IpKeyExtractor.extract(&req).unwrap();
        assert_eq!(key, "198.51.100.1".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn falls_back_to_localhost() {
        let req = Request::builder().body(Body::empty()).unwrap();

        let key = IpKeyExtractor.extract(&req).unwrap();
        assert_eq!(key, "127.0.0.1".parse::<IpAddr>().unwrap());
    }
}
