//! Test fixtures: upload forms and small payloads.

#![allow(dead_code)]

use axum_test::multipart::{MultipartForm, Part};

/// Ten bytes starting with the PNG signature.
pub fn ten_byte_png() -> Vec<u8> {
    vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00]
}

/// A payload of `len` zero bytes.
pub fn payload_of(len: usize) -> Vec<u8> {
    vec![0u8; len]
}

/// Upload form with a credential and one file part.
pub fn upload_form(auth: &str, filename: &str, content_type: &str, data: Vec<u8>) -> MultipartForm {
    let part = Part::bytes(data).file_name(filename).mime_type(content_type);
    MultipartForm::new()
        .add_text("auth", auth.to_string())
        .add_part("file", part)
}

/// Upload form with a credential but no file part.
pub fn form_without_file(auth: &str) -> MultipartForm {
    MultipartForm::new().add_text("auth", auth.to_string())
}
