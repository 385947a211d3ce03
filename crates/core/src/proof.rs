//! Payment proof validation and stored-filename generation.
//!
//! An order may only be created once a proof-of-payment image passes these
//! checks. The validator never persists anything itself; the caller hands
//! the blob to the object storage collaborator.

use crate::error::CoreError;
use crate::pricing::PaymentMethod;

/// Maximum accepted proof image size: 5 MiB.
pub const MAX_PROOF_SIZE_BYTES: u64 = 5 * 1024 * 1024;

/// Extension used when the MIME subtype is missing.
const DEFAULT_EXTENSION: &str = "png";

/// Validate a proof upload: must be non-empty, an `image/*` MIME type, and
/// at most [`MAX_PROOF_SIZE_BYTES`].
pub fn validate_proof(content_type: &str, len: u64) -> Result<(), CoreError> {
    if len == 0 {
        return Err(CoreError::ProofMissing);
    }
    if !content_type.starts_with("image/") {
        return Err(CoreError::ProofWrongType(content_type.to_string()));
    }
    if len > MAX_PROOF_SIZE_BYTES {
        return Err(CoreError::ProofTooLarge {
            size: len,
            max: MAX_PROOF_SIZE_BYTES,
        });
    }
    Ok(())
}

/// Build the stored filename for a validated proof image:
/// `{qris_|proof_}{random token}.{extension}`.
///
/// The extension is taken from the MIME subtype (`png` fallback); the
/// random token guarantees a fresh name, so an existing object is never
/// overwritten.
pub fn stored_filename(method: PaymentMethod, content_type: &str) -> String {
    let prefix = match method {
        PaymentMethod::Qris => "qris_",
        PaymentMethod::Bank => "proof_",
    };
    let extension = content_type
        .split('/')
        .nth(1)
        .filter(|ext| !ext.is_empty())
        .unwrap_or(DEFAULT_EXTENSION);
    format!("{prefix}{}.{extension}", uuid::Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const MIB: u64 = 1024 * 1024;

    #[test]
    fn accepts_a_2_mib_png() {
        assert!(validate_proof("image/png", 2 * MIB).is_ok());
    }

    #[test]
    fn accepts_exactly_the_limit() {
        assert!(validate_proof("image/jpeg", MAX_PROOF_SIZE_BYTES).is_ok());
    }

    #[test]
    fn rejects_a_6_mib_image() {
        let err = validate_proof("image/png", 6 * MIB).unwrap_err();
        assert_matches!(err, CoreError::ProofTooLarge { size, max } => {
            assert_eq!(size, 6 * MIB);
            assert_eq!(max, MAX_PROOF_SIZE_BYTES);
        });
    }

    #[test]
    fn rejects_non_image_mime_type() {
        let err = validate_proof("application/pdf", MIB).unwrap_err();
        assert_matches!(err, CoreError::ProofWrongType(got) => {
            assert_eq!(got, "application/pdf");
        });
    }

    #[test]
    fn rejects_empty_blob() {
        assert_matches!(validate_proof("image/png", 0), Err(CoreError::ProofMissing));
    }

    #[test]
    fn filename_prefix_follows_method() {
        assert!(stored_filename(PaymentMethod::Qris, "image/png").starts_with("qris_"));
        assert!(stored_filename(PaymentMethod::Bank, "image/png").starts_with("proof_"));
    }

    #[test]
    fn filename_extension_from_mime_subtype() {
        assert!(stored_filename(PaymentMethod::Bank, "image/jpeg").ends_with(".jpeg"));
        assert!(stored_filename(PaymentMethod::Bank, "image/webp").ends_with(".webp"));
    }

    #[test]
    fn filename_falls_back_to_png() {
        assert!(stored_filename(PaymentMethod::Bank, "image/").ends_with(".png"));
    }

    #[test]
    fn filenames_are_unique() {
        let a = stored_filename(PaymentMethod::Qris, "image/png");
        let b = stored_filename(PaymentMethod::Qris, "image/png");
        assert_ne!(a, b);
    }
}
