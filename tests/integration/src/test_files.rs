//! Listing integration tests.

#[cfg(test)]
mod tests {
    use crate::{cleanup_file, client, test_filename, upload, url};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_find_uploaded_file_by_search() {
        let client = client();
        let filename = test_filename("search", "log");
        let uploaded = upload(&client, &filename, b"line 1\nline 2\n").await;
        let id = uploaded["fileId"].as_str().expect("fileId");

        let resp = client
            .get(url(&format!("/api/files?search={filename}")))
            .send()
            .await
            .expect("list");
        assert_eq!(resp.status(), reqwest::StatusCode::OK);

        let json: serde_json::Value = resp.json().await.expect("json");
        assert_eq!(json["success"], true);
        assert_eq!(json["pagination"]["total"], 1);
        let files = json["files"].as_array().expect("files");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0]["_id"], id);
        assert!(files[0].get("data").is_none());

        cleanup_file(&client, id).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_filter_by_category() {
        let client = client();
        let archive = upload(&client, &test_filename("cat", "zip"), b"PK").await;
        let id = archive["fileId"].as_str().expect("fileId");

        let resp = client
            .get(url("/api/files?filter=archive&limit=500"))
            .send()
            .await
            .expect("list");
        let json: serde_json::Value = resp.json().await.expect("json");
        let files = json["files"].as_array().expect("files");
        assert!(files.iter().any(|f| f["_id"] == id));
        assert!(
            files
                .iter()
                .all(|f| f["filename"].as_str().is_some_and(|n| {
                    let n = n.to_ascii_lowercase();
                    [".zip", ".rar", ".tar", ".gz"].iter().any(|e| n.ends_with(e))
                }))
        );

        cleanup_file(&client, id).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_invalid_page() {
        let client = client();
        let resp = client
            .get(url("/api/files?page=0"))
            .send()
            .await
            .expect("list");
        assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    }
}
