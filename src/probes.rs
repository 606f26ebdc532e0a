/// Endpoint probes for the diagnostic run
///
/// Each probe builds one fixed request against the service, sends it
/// through the generic transport, and classifies the outcome with its own
/// pass predicate. Probes never fail hard: transport errors and unexpected
/// responses both fold into a failed `TestResult` carrying enough raw
/// detail for support triage.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};

use crate::client::{ApiRequest, ApiTransport};
use crate::payload::{
    image_messages, metadata_function_definition, GENERATE_META_MAX_TOKENS,
    METADATA_FUNCTION_NAME,
};
use crate::signing::free_trial_hash;
use crate::types::{
    body_view, is_truthy, parse_body, ErrorBody, GenerateMetaBody, LicenseValidationBody,
    TestResult, UsageBody,
};

pub const VALIDATE_LICENSE_NAME: &str = "Step 0: Validate License";
pub const CHECK_USAGE_NAME: &str = "Step 1: Subscriber Check Usage";
pub const SUBSCRIBER_GENERATE_META_NAME: &str = "Step 2: Subscriber Generate Meta";
pub const FREE_TRIAL_GENERATE_META_NAME: &str = "Step 3: Free Trial Generate Meta";

pub const VALIDATE_LICENSE_PATH: &str = "/wp-json/oneclick/v1/auth/validate-license";
pub const CHECK_USAGE_PATH: &str = "/wp-json/subscriber/v1/check-usage";
pub const SUBSCRIBER_GENERATE_META_PATH: &str = "/wp-json/subscriber/v1/generate-meta";
pub const FREE_TRIAL_GENERATE_META_PATH: &str = "/wp-json/free-trial/v1/generate-meta";

/// One diagnostic probe against a fixed endpoint.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Display name of the probe, also used to key raw responses
    fn name(&self) -> &str;

    /// Builds the request, sends it, and classifies the response
    async fn run(&self, transport: &dyn ApiTransport) -> TestResult;
}

/// Sends a request and folds the outcome into a `TestResult`.
///
/// Transport failures become failed results with the error text and an
/// empty body; completed responses are parsed (malformed JSON yields the
/// empty body) and judged by the probe's predicate.
async fn run_probe<P>(
    transport: &dyn ApiTransport,
    name: &str,
    request: ApiRequest,
    predicate: P,
) -> TestResult
where
    P: Fn(u16, &Value) -> bool + Send,
{
    match transport.execute(request).await {
        Ok(response) => {
            let body = parse_body(&response.body);
            let passed = predicate(response.status, &body);
            TestResult::completed(name, passed, response.status, body)
        }
        Err(error) => TestResult::transport_failure(name, &error),
    }
}

/// Shared payload for both generate-meta probes: the sample-image message
/// plus the pinned function-call schema.
fn generate_meta_payload() -> Value {
    json!({
        "messages": image_messages(),
        "functions": [metadata_function_definition()],
        "function_call": { "name": METADATA_FUNCTION_NAME },
        "max_tokens": GENERATE_META_MAX_TOKENS,
    })
}

fn merge_payload(base: Value, extra: Value) -> Value {
    let mut merged = base;
    if let (Some(target), Some(source)) = (merged.as_object_mut(), extra.as_object()) {
        for (key, value) in source {
            target.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Probe 0: license validation.
///
/// Passes when the service answers 200 with `status == "success"`.
pub struct ValidateLicenseProbe {
    license_key: String,
    site_url: String,
}

impl ValidateLicenseProbe {
    pub fn new(license_key: &str, site_url: &str) -> Self {
        Self {
            license_key: license_key.to_string(),
            site_url: site_url.to_string(),
        }
    }
}

#[async_trait]
impl Probe for ValidateLicenseProbe {
    fn name(&self) -> &str {
        VALIDATE_LICENSE_NAME
    }

    async fn run(&self, transport: &dyn ApiTransport) -> TestResult {
        let request = ApiRequest::post(VALIDATE_LICENSE_PATH).with_json(json!({
            "license_key": self.license_key,
            "site_url": self.site_url,
        }));

        run_probe(transport, self.name(), request, |status, body| {
            let view: LicenseValidationBody = body_view(body);
            status == 200 && view.status.as_deref() == Some("success")
        })
        .await
    }
}

/// Probe 1: subscriber usage check.
///
/// Passes when the service answers 200 with a truthy `success`.
pub struct CheckUsageProbe {
    license_key: String,
    origin_url: String,
    product_slug: String,
}

impl CheckUsageProbe {
    pub fn new(license_key: &str, origin_url: &str, product_slug: &str) -> Self {
        Self {
            license_key: license_key.to_string(),
            origin_url: origin_url.to_string(),
            product_slug: product_slug.to_string(),
        }
    }
}

#[async_trait]
impl Probe for CheckUsageProbe {
    fn name(&self) -> &str {
        CHECK_USAGE_NAME
    }

    async fn run(&self, transport: &dyn ApiTransport) -> TestResult {
        let request = ApiRequest::post(CHECK_USAGE_PATH).with_json(json!({
            "license_key": self.license_key,
            "origin_url": self.origin_url,
            "product_slug": self.product_slug,
        }));

        run_probe(transport, self.name(), request, |status, body| {
            let view: UsageBody = body_view(body);
            status == 200 && view.success.map(|v| is_truthy(&v)).unwrap_or(false)
        })
        .await
    }
}

/// Probe 2: authenticated metadata generation.
///
/// Same payload as the free-trial probe plus the license key; passes when
/// the service answers 200 with a truthy `success`.
pub struct SubscriberGenerateMetaProbe {
    license_key: String,
    origin_url: String,
    product_slug: String,
}

impl SubscriberGenerateMetaProbe {
    pub fn new(license_key: &str, origin_url: &str, product_slug: &str) -> Self {
        Self {
            license_key: license_key.to_string(),
            origin_url: origin_url.to_string(),
            product_slug: product_slug.to_string(),
        }
    }
}

#[async_trait]
impl Probe for SubscriberGenerateMetaProbe {
    fn name(&self) -> &str {
        SUBSCRIBER_GENERATE_META_NAME
    }

    async fn run(&self, transport: &dyn ApiTransport) -> TestResult {
        let payload = merge_payload(
            generate_meta_payload(),
            json!({
                "license_key": self.license_key,
                "origin_url": self.origin_url,
                "product_slug": self.product_slug,
            }),
        );
        let request = ApiRequest::post(SUBSCRIBER_GENERATE_META_PATH).with_json(payload);

        run_probe(transport, self.name(), request, |status, body| {
            let view: GenerateMetaBody = body_view(body);
            status == 200 && view.success.map(|v| is_truthy(&v)).unwrap_or(false)
        })
        .await
    }
}

/// Probe 3: free-trial metadata generation.
///
/// Carries no license key; instead the request is signed with an HMAC over
/// the origin URL and the current Unix timestamp, sent as headers. A 403
/// whose error mentions "limit reached" counts as a pass: it proves the
/// service received, verified, and correctly rejected the request.
pub struct FreeTrialGenerateMetaProbe {
    origin_url: String,
    product_slug: String,
}

impl FreeTrialGenerateMetaProbe {
    pub fn new(origin_url: &str, product_slug: &str) -> Self {
        Self {
            origin_url: origin_url.to_string(),
            product_slug: product_slug.to_string(),
        }
    }
}

#[async_trait]
impl Probe for FreeTrialGenerateMetaProbe {
    fn name(&self) -> &str {
        FREE_TRIAL_GENERATE_META_NAME
    }

    async fn run(&self, transport: &dyn ApiTransport) -> TestResult {
        let timestamp = Utc::now().timestamp();
        let hash = free_trial_hash(&self.origin_url, timestamp);

        let payload = merge_payload(
            generate_meta_payload(),
            json!({
                "origin_url": self.origin_url,
                "product_slug": self.product_slug,
            }),
        );
        let request = ApiRequest::post(FREE_TRIAL_GENERATE_META_PATH)
            .with_json(payload)
            .with_header("X-Free-Trial-Hash", &hash)
            .with_header("X-Timestamp", &timestamp.to_string());

        run_probe(transport, self.name(), request, |status, body| {
            let meta: GenerateMetaBody = body_view(body);
            let succeeded =
                status == 200 && meta.success.map(|v| is_truthy(&v)).unwrap_or(false);

            let error: ErrorBody = body_view(body);
            let limit_reached = status == 403
                && error
                    .error
                    .as_deref()
                    .map(|e| e.contains("limit reached"))
                    .unwrap_or(false);

            succeeded || limit_reached
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{HttpResponse, MockApiTransport};
    use crate::error::DiagError;
    use crate::types::empty_body;

    fn failing_transport() -> MockApiTransport {
        let mut transport = MockApiTransport::new();
        transport
            .expect_execute()
            .returning(|_| Err(DiagError::Transport("dns error: no such host".to_string())));
        transport
    }

    fn canned_transport(status: u16, body: &str) -> MockApiTransport {
        let body = body.to_string();
        let mut transport = MockApiTransport::new();
        transport.expect_execute().returning(move |_| {
            Ok(HttpResponse {
                status,
                body: body.clone(),
            })
        });
        transport
    }

    #[tokio::test]
    async fn test_all_probes_fail_on_transport_error() {
        let transport = failing_transport();
        let probes: Vec<Box<dyn Probe>> = vec![
            Box::new(ValidateLicenseProbe::new("PK-TEST", "https://site.example")),
            Box::new(CheckUsageProbe::new("PK-TEST", "https://site.example", "slug")),
            Box::new(SubscriberGenerateMetaProbe::new(
                "PK-TEST",
                "https://site.example",
                "slug",
            )),
            Box::new(FreeTrialGenerateMetaProbe::new("https://site.example", "slug")),
        ];

        for probe in &probes {
            let result = probe.run(&transport).await;
            assert!(!result.passed, "{} should fail on transport error", probe.name());
            assert_eq!(result.response_body, empty_body());
            assert!(
                result.details.contains("dns error"),
                "Details should carry the transport error text"
            );
        }
    }

    #[tokio::test]
    async fn test_validate_license_passes_on_success() {
        let transport = canned_transport(200, r#"{"status":"success","message":"ok"}"#);
        let probe = ValidateLicenseProbe::new("PK-TEST", "https://site.example");

        let result = probe.run(&transport).await;
        assert!(result.passed);
        assert_eq!(result.response_body["message"], "ok");
        assert!(result.details.starts_with("Status: 200"));
    }

    #[tokio::test]
    async fn test_validate_license_fails_on_error_status() {
        let transport = canned_transport(200, r#"{"status":"error","message":"invalid key"}"#);
        let probe = ValidateLicenseProbe::new("PK-TEST", "https://site.example");

        assert!(!probe.run(&transport).await.passed);
    }

    #[tokio::test]
    async fn test_validate_license_sends_expected_payload() {
        let mut transport = MockApiTransport::new();
        transport
            .expect_execute()
            .withf(|request| {
                request.path == VALIDATE_LICENSE_PATH
                    && request.json.as_ref().map_or(false, |body| {
                        body["license_key"] == "PK-TEST" && body["site_url"] == "https://site.example"
                    })
            })
            .returning(|_| {
                Ok(HttpResponse {
                    status: 200,
                    body: r#"{"status":"success"}"#.to_string(),
                })
            });

        let probe = ValidateLicenseProbe::new("PK-TEST", "https://site.example");
        assert!(probe.run(&transport).await.passed);
    }

    #[tokio::test]
    async fn test_check_usage_accepts_numeric_success() {
        let transport =
            canned_transport(200, r#"{"success":1,"usage_limit":100,"used_count":3}"#);
        let probe = CheckUsageProbe::new("PK-TEST", "https://site.example", "slug");

        assert!(probe.run(&transport).await.passed);
    }

    #[tokio::test]
    async fn test_check_usage_fails_on_falsy_success() {
        let transport = canned_transport(200, r#"{"success":0,"message":"over quota"}"#);
        let probe = CheckUsageProbe::new("PK-TEST", "https://site.example", "slug");

        assert!(!probe.run(&transport).await.passed);
    }

    #[tokio::test]
    async fn test_subscriber_generate_meta_payload_includes_schema() {
        let mut transport = MockApiTransport::new();
        transport
            .expect_execute()
            .withf(|request| {
                request.path == SUBSCRIBER_GENERATE_META_PATH
                    && request.json.as_ref().map_or(false, |body| {
                        body["license_key"] == "PK-TEST"
                            && body["max_tokens"] == 500
                            && body["function_call"]["name"] == METADATA_FUNCTION_NAME
                            && body["messages"].is_array()
                            && body["functions"][0]["name"] == METADATA_FUNCTION_NAME
                    })
            })
            .returning(|_| {
                Ok(HttpResponse {
                    status: 200,
                    body: r#"{"success":true}"#.to_string(),
                })
            });

        let probe = SubscriberGenerateMetaProbe::new("PK-TEST", "https://site.example", "slug");
        assert!(probe.run(&transport).await.passed);
    }

    #[tokio::test]
    async fn test_free_trial_passes_on_limit_reached() {
        let transport =
            canned_transport(403, r#"{"error":"Free trial limit reached for this site."}"#);
        let probe = FreeTrialGenerateMetaProbe::new("https://site.example", "slug");

        let result = probe.run(&transport).await;
        assert!(result.passed, "Expected rejection should count as a pass");
    }

    #[tokio::test]
    async fn test_free_trial_fails_on_other_403() {
        let transport = canned_transport(403, r#"{"error":"unauthorized"}"#);
        let probe = FreeTrialGenerateMetaProbe::new("https://site.example", "slug");

        assert!(!probe.run(&transport).await.passed);
    }

    #[tokio::test]
    async fn test_free_trial_sends_signed_headers() {
        let mut transport = MockApiTransport::new();
        transport
            .expect_execute()
            .withf(|request| {
                let hash = request
                    .headers
                    .iter()
                    .find(|(name, _)| name == "X-Free-Trial-Hash")
                    .map(|(_, value)| value.clone());
                let timestamp = request
                    .headers
                    .iter()
                    .find(|(name, _)| name == "X-Timestamp")
                    .map(|(_, value)| value.clone());

                // No license key in the free-trial payload.
                let no_key = request
                    .json
                    .as_ref()
                    .map_or(false, |body| body.get("license_key").is_none());

                hash.map_or(false, |h| h.len() == 64)
                    && timestamp.map_or(false, |t| t.parse::<i64>().is_ok())
                    && no_key
                    && request.path == FREE_TRIAL_GENERATE_META_PATH
            })
            .returning(|_| {
                Ok(HttpResponse {
                    status: 200,
                    body: r#"{"success":true}"#.to_string(),
                })
            });

        let probe = FreeTrialGenerateMetaProbe::new("https://site.example", "slug");
        assert!(probe.run(&transport).await.passed);
    }

    #[tokio::test]
    async fn test_malformed_body_fails_without_panicking() {
        let transport = canned_transport(200, r#"{"status":"succ"#);
        let probe = ValidateLicenseProbe::new("PK-TEST", "https://site.example");

        let result = probe.run(&transport).await;
        assert!(!result.passed);
        assert_eq!(result.response_body, empty_body());
    }
}
