//! `multipart/form-data` assembly.

use bytes::{BufMut, Bytes, BytesMut};
use uuid::Uuid;

/// Builds a `multipart/form-data` body in memory.
pub struct MultipartWriter {
    boundary: String,
    buffer: BytesMut,
    parts: usize,
}

impl MultipartWriter {
    pub fn new() -> Self {
        Self::with_boundary(Uuid::new_v4().simple().to_string())
    }

    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            buffer: BytesMut::new(),
            parts: 0,
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Appends a plain field part.
    pub fn write_field(&mut self, name: &str, value: &str) {
        let disposition = format!("form-data; name=\"{}\"", escape_quotes(name));
        self.begin_part(&disposition, None);
        self.buffer.put_slice(value.as_bytes());
    }

    /// Appends a file part with a generic binary content type.
    pub fn write_file(&mut self, field: &str, filename: &str, contents: &[u8]) {
        let disposition = format!(
            "form-data; name=\"{}\"; filename=\"{}\"",
            escape_quotes(field),
            escape_quotes(filename)
        );
        self.begin_part(&disposition, Some("application/octet-stream"));
        self.buffer.put_slice(contents);
    }

    /// Writes the closing delimiter and returns `(content_type, body)`.
    pub fn finish(mut self) -> (String, Bytes) {
        let content_type = self.content_type();
        if self.parts > 0 {
            self.buffer.put_slice(b"\r\n");
        }
        self.buffer
            .put_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (content_type, self.buffer.freeze())
    }

    fn begin_part(&mut self, disposition: &str, content_type: Option<&str>) {
        if self.parts > 0 {
            self.buffer.put_slice(b"\r\n");
        }
        self.parts += 1;

        self.buffer
            .put_slice(format!("--{}\r\n", self.boundary).as_bytes());
        self.buffer
            .put_slice(format!("Content-Disposition: {}\r\n", disposition).as_bytes());
        if let Some(content_type) = content_type {
            self.buffer
                .put_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
        }
        self.buffer.put_slice(b"\r\n");
    }
}

impl Default for MultipartWriter {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_quotes(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
