//! Routing error integration tests.

#[cfg(test)]
mod tests {
    use crate::{client, url};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_wrong_method() {
        let client = client();
        let resp = client.get(url("/api/upload")).send().await.expect("request");
        assert_eq!(resp.status(), reqwest::StatusCode::METHOD_NOT_ALLOWED);
        let json: serde_json::Value = resp.json().await.expect("json");
        assert_eq!(json["error"], "Method not allowed");
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_not_found_for_unknown_route() {
        let client = client();
        let resp = client
            .get(url("/api/unknown"))
            .send()
            .await
            .expect("request");
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_return_not_found_for_missing_file() {
        let client = client();
        let resp = client
            .delete(url("/api/delete/00000000-0000-0000-0000-000000000000"))
            .send()
            .await
            .expect("request");
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
        let json: serde_json::Value = resp.json().await.expect("json");
        assert_eq!(json["error"], "File not found");
    }
}
