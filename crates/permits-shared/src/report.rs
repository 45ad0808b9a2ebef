//! Aggregated permit reports computed by the backend

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::permit::{Permit, PermitStatus};

/// Window used for the expiring permits report when none is chosen
pub const REPORT_DEFAULT_EXPIRING_DAYS: u32 = 30;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, Default)]
pub struct OverallStats {
    #[serde(default)]
    pub total_permits: u64,
    #[serde(default)]
    pub active_permits: u64,
    #[serde(default)]
    pub expired_permits: u64,
    #[serde(default)]
    pub cancelled_permits: u64,
    #[serde(default)]
    pub pending_permits: u64,
    #[serde(default)]
    pub inactive_permits: u64,
}

impl OverallStats {
    /// Counts in display order, the expired count is by date rather than
    /// status so the rows need not add up to the total
    pub fn by_status(&self) -> [(PermitStatus, u64); 5] {
        [
            (PermitStatus::Active, self.active_permits),
            (PermitStatus::Pending, self.pending_permits),
            (PermitStatus::Expired, self.expired_permits),
            (PermitStatus::Cancelled, self.cancelled_permits),
            (PermitStatus::Inactive, self.inactive_permits),
        ]
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, Default)]
pub struct RecentActivity {
    #[serde(default)]
    pub created_last_30_days: u64,
    #[serde(default)]
    pub modified_last_30_days: u64,
    #[serde(default)]
    pub expiring_in_30_days: u64,
}

/// Response of `/permits/report_detailed_stats/`
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct DetailedStats {
    #[serde(default)]
    pub generated_at: Option<DateTime<Utc>>,
    pub overall_stats: OverallStats,
    #[serde(default)]
    pub recent_activity: RecentActivity,
    #[serde(default)]
    pub by_authority: BTreeMap<String, u64>,
    #[serde(default)]
    pub by_permit_type: BTreeMap<String, u64>,
    #[serde(default)]
    pub by_vehicle_type: BTreeMap<String, u64>,
}

/// Envelope shared by the grouped reports
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct GroupedReport<T> {
    #[serde(default)]
    pub report_type: String,
    #[serde(default)]
    pub generated_at: Option<DateTime<Utc>>,
    pub data: Vec<T>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct PermitTypeReportRow {
    pub permit_type: String,
    #[serde(default)]
    pub permit_code: String,
    pub total: u64,
    #[serde(default)]
    pub active: u64,
    #[serde(default)]
    pub pending: u64,
    #[serde(default)]
    pub expired: u64,
    #[serde(default)]
    pub cancelled: u64,
    #[serde(default)]
    pub inactive: u64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct VehicleTypeReportRow {
    pub vehicle_type: String,
    pub total: u64,
    #[serde(default)]
    pub active: u64,
    #[serde(default)]
    pub expired: u64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
pub struct AuthorityReportRow {
    pub authority: String,
    #[serde(default)]
    pub authority_code: String,
    pub total_permits: u64,
    #[serde(default)]
    pub active: u64,
    #[serde(default)]
    pub pending: u64,
    #[serde(default)]
    pub expired: u64,
    #[serde(default)]
    pub cancelled: u64,
    #[serde(default)]
    pub inactive: u64,
}

/// Share of `part` in `total` as a whole percentage, zero when there is
/// nothing to share
pub fn percent_of(part: u64, total: u64) -> u64 {
    if total == 0 {
        0
    } else {
        (part * 100 + total / 2) / total
    }
}

/// Query for `/permits/report_expiring_permits/`
#[derive(Debug, serde::Serialize, Clone, Copy, PartialEq, Eq)]
pub struct ExpiringQuery {
    pub days: u32,
}

impl Default for ExpiringQuery {
    fn default() -> Self {
        Self {
            days: REPORT_DEFAULT_EXPIRING_DAYS,
        }
    }
}

/// Active permits whose validity ends within the requested window
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct ExpiringPermitsReport {
    #[serde(default)]
    pub report_type: String,
    #[serde(default)]
    pub expiring_date: Option<NaiveDate>,
    #[serde(default)]
    pub total_expiring: u64,
    #[serde(default)]
    pub data: Vec<Permit>,
}
