use crate::id::DbId;

/// Body of `/roles/{id}/add-feature/` and `/roles/{id}/remove-feature/`
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct FeatureReqArgs {
    pub feature_id: DbId,
}
