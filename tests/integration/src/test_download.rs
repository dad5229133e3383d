//! Download and delete integration tests.

#[cfg(test)]
mod tests {
    use crate::{client, test_filename, upload, url};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_download_exact_bytes() {
        let client = client();
        let filename = test_filename("download", "bin");
        let payload: Vec<u8> = (0..=255).collect();

        let uploaded = upload(&client, &filename, &payload).await;
        let id = uploaded["fileId"].as_str().expect("fileId");

        let resp = client
            .get(url(&format!("/api/download/{id}")))
            .send()
            .await
            .expect("download");
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let disposition = resp
            .headers()
            .get("content-disposition")
            .and_then(|v| v.to_str().ok())
            .map(ToOwned::to_owned);
        assert_eq!(
            disposition.as_deref(),
            Some(format!("attachment; filename=\"{filename}\"").as_str())
        );
        let body = resp.bytes().await.expect("body");
        assert_eq!(body.as_ref(), payload.as_slice());

        let resp = client
            .delete(url(&format!("/api/delete?id={id}")))
            .send()
            .await
            .expect("delete");
        assert_eq!(resp.status(), reqwest::StatusCode::OK);
        let json: serde_json::Value = resp.json().await.expect("json");
        assert_eq!(json["message"], "File deleted permanently");

        let resp = client
            .get(url(&format!("/api/download/{id}")))
            .send()
            .await
            .expect("download after delete");
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_require_file_id() {
        let client = client();
        let resp = client
            .get(url("/api/download"))
            .send()
            .await
            .expect("download");
        assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
        let json: serde_json::Value = resp.json().await.expect("json");
        assert_eq!(json["error"], "File ID required");
    }
}
