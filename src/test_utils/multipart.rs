use axum::{
    body::Body,
    extract::{FromRequest, Multipart},
    http::Request,
};

use crate::storage::UploadedFile;

const BOUNDARY: &str = "TEST_BOUNDARY_1337";

/// Build a `Multipart` extractor from text fields and file uploads, the same
/// way a browser would encode the form.
pub(crate) async fn must_make_multipart(
    text_fields: &[(&str, &str)],
    files: &[(&str, &UploadedFile)],
) -> Multipart {
    let mut body: Vec<u8> = Vec::new();

    for (name, value) in text_fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }

    for (name, file) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                file.file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(&file.bytes);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("Could not build multipart request");

    Multipart::from_request(request, &())
        .await
        .expect("Could not parse multipart request")
}
