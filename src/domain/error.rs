//! Domain error taxonomy.
//!
//! Every service raises only these kinds at its boundary; raw persistence or
//! asset-store errors never cross unmapped. Each kind carries a stable status
//! code for the response envelope.

use std::fmt;

use super::catalog::AssetRef;

#[derive(Debug)]
pub enum DomainError {
    /// Malformed input, named by field.
    Validation {
        field: &'static str,
        reason: String,
    },
    /// A required parameter was absent.
    MissingParameter { field: &'static str },
    /// The requester is not the owner of the resource.
    Authorization {
        resource: &'static str,
        id: String,
    },
    /// The referenced entity does not exist.
    NotFound {
        resource: &'static str,
        id: String,
    },
    /// Uniqueness violation.
    Conflict {
        resource: &'static str,
        detail: String,
    },
    /// An external collaborator (asset store or persistence) failed or timed
    /// out. `asset_refs` names any uploaded objects affected by a partial
    /// saga so the state can be remediated.
    Dependency {
        operation: &'static str,
        step: &'static str,
        asset_refs: Vec<AssetRef>,
        detail: String,
    },
    Internal(String),
}

impl DomainError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        DomainError::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        DomainError::NotFound {
            resource,
            id: id.into(),
        }
    }

    pub fn authorization(resource: &'static str, id: impl Into<String>) -> Self {
        DomainError::Authorization {
            resource,
            id: id.into(),
        }
    }

    pub fn dependency(
        operation: &'static str,
        step: &'static str,
        asset_refs: Vec<AssetRef>,
        detail: impl Into<String>,
    ) -> Self {
        DomainError::Dependency {
            operation,
            step,
            asset_refs,
            detail: detail.into(),
        }
    }

    /// Stable status code for the boundary layer.
    pub fn status_code(&self) -> u16 {
        match self {
            DomainError::Validation { .. } | DomainError::MissingParameter { .. } => 400,
            DomainError::Authorization { .. } => 403,
            DomainError::NotFound { .. } => 404,
            DomainError::Conflict { .. } => 409,
            DomainError::Dependency { .. } => 502,
            DomainError::Internal(_) => 500,
        }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::Validation { field, reason } => {
                write!(f, "invalid {}: {}", field, reason)
            }
            DomainError::MissingParameter { field } => write!(f, "{} is required", field),
            DomainError::Authorization { resource, id } => {
                write!(f, "requester does not own {} {}", resource, id)
            }
            DomainError::NotFound { resource, id } => write!(f, "{} {} not found", resource, id),
            DomainError::Conflict { resource, detail } => {
                write!(f, "{} conflict: {}", resource, detail)
            }
            DomainError::Dependency {
                operation,
                step,
                asset_refs,
                detail,
            } => {
                write!(f, "{} failed at {}: {}", operation, step, detail)?;
                if !asset_refs.is_empty() {
                    let refs: Vec<&str> = asset_refs.iter().map(AssetRef::as_str).collect();
                    write!(f, " (affected assets: {})", refs.join(", "))?;
                }
                Ok(())
            }
            DomainError::Internal(detail) => write!(f, "internal error: {}", detail),
        }
    }
}

impl std::error::Error for DomainError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_are_stable() {
        assert_eq!(DomainError::validation("page", "x").status_code(), 400);
        assert_eq!(
            DomainError::MissingParameter { field: "userId" }.status_code(),
            400
        );
        assert_eq!(DomainError::authorization("playlist", "p1").status_code(), 403);
        assert_eq!(DomainError::not_found("video", "v1").status_code(), 404);
        assert_eq!(
            DomainError::Conflict {
                resource: "playlists",
                detail: "dup".into()
            }
            .status_code(),
            409
        );
        assert_eq!(
            DomainError::dependency("publish_video", "upload_video", vec![], "down").status_code(),
            502
        );
        assert_eq!(DomainError::Internal("boom".into()).status_code(), 500);
    }

    #[test]
    fn dependency_error_names_affected_assets() {
        let err = DomainError::dependency(
            "publish_video",
            "compensate_video_asset",
            vec![AssetRef::from("a-1")],
            "store unreachable",
        );
        let text = err.to_string();
        assert!(text.contains("publish_video"));
        assert!(text.contains("compensate_video_asset"));
        assert!(text.contains("a-1"));
    }
}
