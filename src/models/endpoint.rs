//! Table of portal endpoints.

use std::fmt;

/// Default portal base URL.
pub const DEFAULT_BASE_URL: &str = "https://app.fflbizhub.com";

/// A REST endpoint exposed by the portal.
///
/// # Example
///
/// ```
/// use fflbizhub_rs::Endpoint;
///
/// assert_eq!(
///     Endpoint::AdSearch.url("https://app.fflbizhub.com/"),
///     "https://app.fflbizhub.com/api/adSearch/getDataByFilter"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Credential login (POST)
    Auth,
    /// Switch the active FFL book for the session
    SetFfl,
    /// FFL books associated with the account (GET)
    UserFfls,
    /// Duplicate check before receiving a firearm
    CheckDuplicity,
    /// Whether a serialized batch was already acquired
    IsAcquiredBatch,
    /// Acquire a batch of firearms into the default location
    AcquireBatch,
    /// Bulk correction data
    BulkCorrection,
    /// Multi-book report data
    ReportData,
    /// Whether a firearm may be loaned out
    CanLoanOut,
    /// Loan out (check out) a firearm
    LoanOutFirearm,
    /// Whether a loan may be returned
    CanReturnLoan,
    /// Return (check in) a loaned firearm
    ReturnLoanFirearm,
    /// Filtered acquisition/disposition search (POST, paginated)
    AdSearch,
}

impl Endpoint {
    /// Every known endpoint, in table order.
    pub const ALL: [Endpoint; 13] = [
        Endpoint::Auth,
        Endpoint::SetFfl,
        Endpoint::UserFfls,
        Endpoint::CheckDuplicity,
        Endpoint::IsAcquiredBatch,
        Endpoint::AcquireBatch,
        Endpoint::BulkCorrection,
        Endpoint::ReportData,
        Endpoint::CanLoanOut,
        Endpoint::LoanOutFirearm,
        Endpoint::CanReturnLoan,
        Endpoint::ReturnLoanFirearm,
        Endpoint::AdSearch,
    ];

    /// Path (and fixed query, where the portal requires one) relative to the base URL.
    ///
    /// Paths ending in `/` expect an identifier to be appended by the caller.
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Auth => "/api/auth",
            Endpoint::SetFfl => "/api/auth/me/setFFL",
            Endpoint::UserFfls => "/api/multiBookSearch/getUserFFLs",
            Endpoint::CheckDuplicity => "/api/receive/checkDuplicity",
            Endpoint::IsAcquiredBatch => "/api/serialize/isAcquiredBatch/",
            Endpoint::AcquireBatch => {
                "/api/serialize/acquireFirearmBatch?deparmentId=0&branchId=0&locationId=0"
            }
            Endpoint::BulkCorrection => "/api/bulkcorrection/getBulkCorrectionData",
            Endpoint::ReportData => "/api/multiBookSearch/getReportData",
            Endpoint::CanLoanOut => "/api/loanOut/canLoanOut/",
            Endpoint::LoanOutFirearm => "/api/loanOut/loanOutFirearm/",
            Endpoint::CanReturnLoan => "/api/loanReturn/canReturnLoan/",
            Endpoint::ReturnLoanFirearm => "/api/loanReturn/returnLoanFirearm/",
            Endpoint::AdSearch => "/api/adSearch/getDataByFilter",
        }
    }

    /// Absolute URL for this endpoint under `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_paths() {
        assert_eq!(Endpoint::Auth.path(), "/api/auth");
        assert_eq!(Endpoint::UserFfls.path(), "/api/multiBookSearch/getUserFFLs");
        assert_eq!(Endpoint::AdSearch.path(), "/api/adSearch/getDataByFilter");
    }

    #[test]
    fn test_url_strips_trailing_slash() {
        assert_eq!(
            Endpoint::Auth.url("http://localhost:8080/"),
            "http://localhost:8080/api/auth"
        );
        assert_eq!(
            Endpoint::Auth.url(DEFAULT_BASE_URL),
            "https://app.fflbizhub.com/api/auth"
        );
    }

    #[test]
    fn test_all_paths_are_api_rooted() {
        for endpoint in Endpoint::ALL {
            assert!(endpoint.path().starts_with("/api/"), "{endpoint:?}");
        }
    }
}
