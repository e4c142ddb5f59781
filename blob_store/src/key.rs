use std::fmt;

use crate::{BlobError, BlobResult};

const DELIMITER: char = '/';

/// Address of a stored object: `{partner_hash}/{file_name}`.
///
/// Neither segment may be empty or contain the delimiter, which keeps the
/// joined key unambiguous. Control characters are rejected too: the file name
/// is echoed back in a `Content-Disposition` header, which cannot carry them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey {
    partner_hash: String,
    file_name: String,
}

impl ObjectKey {
    pub fn new(partner_hash: &str, file_name: &str) -> BlobResult<Self> {
        validate_segment(partner_hash)?;
        validate_segment(file_name)?;
        Ok(Self {
            partner_hash: partner_hash.to_string(),
            file_name: file_name.to_string(),
        })
    }

    pub fn partner_hash(&self) -> &str {
        &self.partner_hash
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.partner_hash, DELIMITER, self.file_name)
    }
}

fn validate_segment(segment: &str) -> BlobResult<()> {
    if segment.is_empty() {
        return Err(BlobError::InvalidKey {
            segment: segment.to_string(),
            reason: "segment is empty".to_string(),
        });
    }
    if segment.contains(DELIMITER) {
        return Err(BlobError::InvalidKey {
            segment: segment.to_string(),
            reason: format!("segment contains '{}'", DELIMITER),
        });
    }
    if segment.chars().any(char::is_control) {
        return Err(BlobError::InvalidKey {
            segment: segment.escape_debug().to_string(),
            reason: "segment contains a control character".to_string(),
        });
    }
    Ok(())
}
