use crate::application::multipart::MultipartWriter;
use crate::domain::entities::{BodySource, Method};
use crate::domain::errors::CommandError;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const NO_BODY_CONTENT_TYPE: &str = "plain/text";

/// A request body ready to be sent, with the `Content-Type` that describes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedBody {
    pub content_type: String,
    pub content: Bytes,
}

/// Turns a `BodySource` into bytes on the wire.
///
/// The two POST encodings fail differently: an unreadable `-body-file`
/// degrades to an empty JSON body, while an unreadable `-upload` file aborts
/// the encode with `CommandError::Io`.
pub struct BodyEncoder;

impl BodyEncoder {
    pub fn encode(method: Method, source: &BodySource) -> Result<EncodedBody, CommandError> {
        match method {
            Method::Get | Method::Head => Ok(EncodedBody {
                content_type: NO_BODY_CONTENT_TYPE.to_string(),
                content: Bytes::new(),
            }),
            Method::Post => match source {
                BodySource::Inline(text) => Ok(Self::json(Bytes::from(text.clone()))),
                BodySource::File(path) => Ok(Self::json(Self::read_lenient(path))),
                BodySource::Multipart { fields, upload } => {
                    Self::multipart(fields, upload.as_deref())
                }
            },
            other => Err(CommandError::UnsupportedMethod(other.to_string())),
        }
    }

    fn json(content: Bytes) -> EncodedBody {
        EncodedBody {
            content_type: JSON_CONTENT_TYPE.to_string(),
            content,
        }
    }

    /// Reads a body file byte for byte, falling back to an empty body when it
    /// can't be read.
    fn read_lenient(path: &Path) -> Bytes {
        match fs::read(path) {
            Ok(bytes) => Bytes::from(bytes),
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "body file unreadable, sending empty body"
                );
                Bytes::new()
            }
        }
    }

    fn multipart(
        fields: &BTreeMap<String, String>,
        upload: Option<&Path>,
    ) -> Result<EncodedBody, CommandError> {
        let mut writer = MultipartWriter::new();

        for (name, value) in fields {
            writer.write_field(name, value);
        }

        if let Some(path) = upload {
            let contents = fs::read(path).map_err(|e| CommandError::io("open", path, e))?;
            let filename = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "file".to_string());
            debug!(%filename, size = contents.len(), "attaching upload");
            writer.write_file("file", &filename, &contents);
        }

        let (content_type, content) = writer.finish();
        Ok(EncodedBody {
            content_type,
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn get_and_head_carry_no_body() {
        for method in [Method::Get, Method::Head] {
            let encoded =
                BodyEncoder::encode(method, &BodySource::Inline("ignored".into())).unwrap();
            assert_eq!(encoded.content_type, "plain/text");
            assert!(encoded.content.is_empty());
        }
    }

    #[test]
    fn inline_body_is_sent_as_json() {
        let encoded =
            BodyEncoder::encode(Method::Post, &BodySource::Inline("{\"a\":1}".into())).unwrap();
        assert_eq!(encoded.content_type, "application/json");
        assert_eq!(encoded.content, Bytes::from_static(b"{\"a\":1}"));
    }

    #[test]
    fn body_file_matches_inline_body() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"value\": 42}}").unwrap();

        let from_file =
            BodyEncoder::encode(Method::Post, &BodySource::File(file.path().to_path_buf()))
                .unwrap();
        let inline =
            BodyEncoder::encode(Method::Post, &BodySource::Inline("{\"value\": 42}".into()))
                .unwrap();
        assert_eq!(from_file, inline);
    }

    #[test]
    fn body_file_bytes_are_sent_unchanged() {
        let raw: &[u8] = b"{\"name\":\"caf\xe9\"}";
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(raw).unwrap();

        let encoded =
            BodyEncoder::encode(Method::Post, &BodySource::File(file.path().to_path_buf()))
                .unwrap();
        assert_eq!(encoded.content_type, "application/json");
        assert_eq!(encoded.content, Bytes::copy_from_slice(raw));
    }

    #[test]
    fn unreadable_body_file_degrades_to_empty_body() {
        let source = BodySource::File(PathBuf::from("/nonexistent/dir/body.json"));
        let encoded = BodyEncoder::encode(Method::Post, &source).unwrap();
        assert_eq!(encoded.content_type, "application/json");
        assert!(encoded.content.is_empty());
    }

    #[test]
    fn multipart_carries_fields_and_upload_basename() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("file.json");
        std::fs::write(&path, b"{\"value\": \"some value from file\"}").unwrap();

        let mut fields = BTreeMap::new();
        fields.insert("key1".to_string(), "value1".to_string());
        fields.insert("key2".to_string(), "value2".to_string());

        let encoded = BodyEncoder::encode(
            Method::Post,
            &BodySource::Multipart {
                fields,
                upload: Some(path),
            },
        )
        .unwrap();

        assert!(encoded.content_type.starts_with("multipart/form-data; boundary="));
        let text = String::from_utf8(encoded.content.to_vec()).unwrap();
        assert!(text.contains("name=\"key1\"\r\n\r\nvalue1\r\n"));
        assert!(text.contains("name=\"key2\"\r\n\r\nvalue2\r\n"));
        assert!(text.contains("name=\"file\"; filename=\"file.json\""));
        assert!(!text.contains(dir.path().to_str().unwrap()));
        assert!(text.contains("some value from file"));
    }

    #[test]
    fn unreadable_upload_is_fatal() {
        let source = BodySource::Multipart {
            fields: BTreeMap::new(),
            upload: Some(PathBuf::from("/nonexistent/dir/upload.bin")),
        };
        let err = BodyEncoder::encode(Method::Post, &source).unwrap_err();
        assert!(matches!(err, CommandError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/dir/upload.bin"));
    }

    #[test]
    fn methods_without_a_body_strategy_are_unsupported() {
        for method in [Method::Put, Method::Delete, Method::Patch, Method::Options] {
            assert!(matches!(
                BodyEncoder::encode(method, &BodySource::Inline(String::new())),
                Err(CommandError::UnsupportedMethod(_))
            ));
        }
    }
}
