//! Shared key generation for storage backends.
//!
//! Keys are flat filenames: `{uuid}{original extension}`. The UUID component
//! makes keys collision-free by construction; the extension is carried over
//! from the uploaded filename so content sniffing by players keeps working.

use uuid::Uuid;

/// Generate a storage key for an uploaded file.
///
/// `original_filename` contributes only its extension; everything else about
/// the client-supplied name is discarded.
pub fn generate_storage_key(original_filename: &str) -> String {
    match extension_of(original_filename) {
        Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
        None => Uuid::new_v4().to_string(),
    }
}

/// Extract a safe extension from a filename, if it has one.
///
/// Rejects extensions with path separators or dots so a hostile filename
/// cannot smuggle traversal sequences into the key.
fn extension_of(filename: &str) -> Option<&str> {
    let ext = filename.rsplit_once('.').map(|(_, ext)| ext)?;
    if ext.is_empty()
        || ext.len() > 10
        || ext.contains('/')
        || ext.contains('\\')
        || ext.contains('.')
    {
        return None;
    }
    Some(ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_extension() {
        let key = generate_storage_key("holiday.mp4");
        assert!(key.ends_with(".mp4"));
        assert_eq!(key.len(), 36 + 4);
    }

    #[test]
    fn unique_per_call() {
        assert_ne!(generate_storage_key("a.mp4"), generate_storage_key("a.mp4"));
    }

    #[test]
    fn drops_hostile_extensions() {
        let key = generate_storage_key("clip.../../etc/passwd");
        assert!(!key.contains('/'));
        assert!(!key.contains(".."));

        let key = generate_storage_key("noextension");
        assert!(!key.contains('.'));
    }
}
