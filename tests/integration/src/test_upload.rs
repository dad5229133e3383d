//! Upload integration tests.

#[cfg(test)]
mod tests {
    use crate::{BOUNDARY, cleanup_file, client, multipart_body, test_filename, upload, url};

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_upload_file() {
        let client = client();
        let filename = test_filename("upload", "txt");

        let resp = upload(&client, &filename, b"hello world").await;
        assert_eq!(resp["success"], true);
        assert_eq!(resp["filename"], filename.as_str());
        assert_eq!(resp["size"], 11);
        assert_eq!(resp["message"], "File uploaded permanently");

        let id = resp["fileId"].as_str().expect("fileId");
        assert_eq!(resp["url"], format!("/api/download/{id}"));

        cleanup_file(&client, id).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_apply_override_fields() {
        let client = client();
        let renamed = test_filename("renamed", "md");

        let resp = client
            .post(url("/api/upload"))
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(multipart_body(
                "original.bin",
                b"abc",
                &[("filename", renamed.as_str()), ("size", "42")],
            ))
            .send()
            .await
            .expect("upload");
        assert_eq!(resp.status(), reqwest::StatusCode::OK);

        let json: serde_json::Value = resp.json().await.expect("json");
        assert_eq!(json["filename"], renamed.as_str());
        assert_eq!(json["size"], 42);

        cleanup_file(&client, json["fileId"].as_str().expect("fileId")).await;
    }

    #[tokio::test]
    #[ignore = "requires running server"]
    async fn test_should_reject_upload_without_file() {
        let client = client();
        let resp = client
            .post(url("/api/upload"))
            .header("Content-Type", "multipart/form-data; boundary=unused")
            .body(multipart_body("a.txt", b"x", &[]))
            .send()
            .await
            .expect("upload");
        assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);

        let json: serde_json::Value = resp.json().await.expect("json");
        assert_eq!(json["error"], "No file uploaded");
    }
}
