//! Status and health integration tests.

#[cfg(test)]
mod tests {
    use crate::{client, url};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_report_connected_status() {
        let client = client();
        let resp = client.get(url("/api/status")).send().await.expect("status");
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        assert!(resp.headers().contains_key("x-request-id"));

        let json: serde_json::Value = resp.json().await.expect("json");
        assert_eq!(json["status"], "online");
        assert_eq!(json["database"], "connected");
        assert!(json["uptime"].is_number());
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_answer_health_probe() {
        let client = client();
        let resp = client.get(url("/health")).send().await.expect("health");
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let json: serde_json::Value = resp.json().await.expect("json");
        assert_eq!(json["status"], "running");
    }
}
