//! Validation of completion proof documents.

use super::error::TaskDomainError;

/// File extensions accepted as completion proof.
pub const ALLOWED_PROOF_EXTENSIONS: [&str; 7] =
    ["pdf", "doc", "docx", "png", "jpg", "jpeg", "gif"];

/// Maximum accepted proof size: 10 MiB.
pub const MAX_PROOF_BYTES: u64 = 10 * 1024 * 1024;

/// Checks a proof document's filename extension and size.
///
/// # Errors
///
/// Returns [`TaskDomainError::UnsupportedProofExtension`] for filenames
/// without a recognised extension and [`TaskDomainError::ProofTooLarge`]
/// for content over 10 MiB.
pub fn validate_proof(filename: &str, size: u64) -> Result<(), TaskDomainError> {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    if !ALLOWED_PROOF_EXTENSIONS.contains(&extension.as_str()) {
        return Err(TaskDomainError::UnsupportedProofExtension(extension));
    }
    if size > MAX_PROOF_BYTES {
        return Err(TaskDomainError::ProofTooLarge(size));
    }
    Ok(())
}
