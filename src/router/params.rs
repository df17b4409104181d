//! Branch lookup parameters
//!
//! Typed view of the parameters bound by the home route.

use serde::Serialize;

use super::pattern::RouteParams;

pub const BANK_CODE: &str = "bankCode";
pub const BRANCH_CODE: &str = "branchCode";
pub const BRANCH_NAME: &str = "branchName";

/// Path parameters handed to the home view.
///
/// Each field is independently optional. Paths bind positionally, so a
/// resolved match fills the fields from the front.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchParams {
    pub bank_code: Option<String>,
    pub branch_code: Option<String>,
    pub branch_name: Option<String>,
}

impl BranchParams {
    pub fn new(
        bank_code: Option<&str>,
        branch_code: Option<&str>,
        branch_name: Option<&str>,
    ) -> Self {
        Self {
            bank_code: bank_code.map(str::to_string),
            branch_code: branch_code.map(str::to_string),
            branch_name: branch_name.map(str::to_string),
        }
    }

    /// True when no segment was present (the root path)
    pub fn is_empty(&self) -> bool {
        self.bank_code.is_none() && self.branch_code.is_none() && self.branch_name.is_none()
    }
}

impl From<&RouteParams> for BranchParams {
    fn from(params: &RouteParams) -> Self {
        Self::new(
            params.get(BANK_CODE),
            params.get(BRANCH_CODE),
            params.get(BRANCH_NAME),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::pattern::RoutePattern;

    #[test]
    fn test_from_route_params() {
        let pattern = RoutePattern::parse("/:bankCode?/:branchCode?/:branchName?").unwrap();
        let params = pattern.matches("/812/0015").unwrap();

        let branch = BranchParams::from(&params);
        assert_eq!(branch, BranchParams::new(Some("812"), Some("0015"), None));
        assert!(!branch.is_empty());
    }

    #[test]
    fn test_serializes_camel_case() {
        let branch = BranchParams::new(Some("812"), None, None);
        let json = serde_json::to_value(&branch).unwrap();

        assert_eq!(json["bankCode"], "812");
        assert!(json["branchCode"].is_null());
        assert!(json["branchName"].is_null());
    }
}
