use std::fmt;

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(String);

        impl $name {
            pub fn new(raw: impl Into<String>) -> Self {
                Self(raw.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(
    /// Opaque token the upload endpoint returns to correlate a later generation request.
    DocumentId
);
id_newtype!(
    /// Identifier of a generated video, used to build its download route.
    VideoId
);

/// A file picked in the upload form, already read into memory.
#[derive(Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

impl fmt::Debug for SelectedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// 2xx response with a JSON body.
    Accepted {
        message: Option<String>,
        document_id: Option<DocumentId>,
        extracted_text: Option<String>,
    },
    /// Non-2xx response with a JSON body.
    Rejected {
        status: u16,
        message: Option<String>,
        redirect: Option<String>,
    },
    /// Transport failure, or a body that was not JSON.
    NetworkFailure { detail: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Generated {
        video_path: Option<String>,
        id: VideoId,
    },
    Rejected {
        status: u16,
        detail: Option<String>,
    },
    Failed { detail: String },
}
