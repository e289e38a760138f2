//! DTOs for the admin API resources.
//!
//! # Design
//! Field names follow the wire format (camelCase on resources, snake_case on
//! the pagination envelope). The mock server defines its own copies; the
//! integration tests catch drift between the two.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Listing envelope returned by paginated endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub first_page_url: Option<String>,
    #[serde(default)]
    pub from: Option<u32>,
    #[serde(default)]
    pub last_page: u32,
    #[serde(default)]
    pub last_page_url: Option<String>,
    #[serde(default)]
    pub links: Vec<PageLink>,
    #[serde(default)]
    pub next_page_url: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub prev_page_url: Option<String>,
    #[serde(default)]
    pub to: Option<u32>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    pub url: Option<String>,
    pub label: String,
    pub active: bool,
}

/// `{ "data": ... }` wrapper used by action endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupStatus {
    Pending,
    Approved,
    Rejected,
    Active,
    Inactive,
}

impl GroupStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            GroupStatus::Pending => "PENDING",
            GroupStatus::Approved => "APPROVED",
            GroupStatus::Rejected => "REJECTED",
            GroupStatus::Active => "ACTIVE",
            GroupStatus::Inactive => "INACTIVE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub status: GroupStatus,
    pub created_at: String,
    pub updated_at: String,
    pub owner_id: u64,
    pub member_count: u32,
    pub total_savings: f64,
    pub total_loans: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberContact {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
    pub id: u64,
    pub group_id: u64,
    pub user_id: u64,
    pub joined_at: String,
    pub status: MemberStatus,
    pub user: MemberContact,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Interest,
    LoanDisbursement,
    LoanRepayment,
    ShareContribution,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Deposit => "DEPOSIT",
            TransactionType::Withdrawal => "WITHDRAWAL",
            TransactionType::Interest => "INTEREST",
            TransactionType::LoanDisbursement => "LOAN_DISBURSEMENT",
            TransactionType::LoanRepayment => "LOAN_REPAYMENT",
            TransactionType::ShareContribution => "SHARE_CONTRIBUTION",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRef {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountHolder {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: u64,
    pub account_type: String,
    pub balance: f64,
    pub user: AccountHolder,
    pub group: GroupRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: u64,
    pub transaction_id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: f64,
    pub account_id: u64,
    pub status: TransactionStatus,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    pub account: Account,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Active,
    Inactive,
    Suspended,
}

impl UserStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            UserStatus::Active => "ACTIVE",
            UserStatus::Inactive => "INACTIVE",
            UserStatus::Suspended => "SUSPENDED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: u64,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub id_type: String,
    pub id_number: String,
    pub role_id: u64,
    pub status: UserStatus,
    pub created_at: String,
    pub updated_at: String,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    SavingsReminder,
    LoanApproval,
    RepaymentDue,
    GroupUpdate,
    DonorReport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSender {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub read: bool,
    pub created_at: String,
    pub updated_at: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<NotificationSender>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationList {
    pub data: Vec<Notification>,
    pub unread_count: u64,
}

/// Request payload for creating a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    pub user_id: String,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Count {
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginated_envelope_tolerates_sparse_fields() {
        let raw = r#"{"data":[],"total":0}"#;
        let page: Paginated<Group> = serde_json::from_str(raw).unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.total, 0);
        assert!(page.next_page_url.is_none());
    }

    #[test]
    fn transaction_type_uses_wire_names() {
        let json = serde_json::to_value(TransactionType::LoanDisbursement).unwrap();
        assert_eq!(json, "LOAN_DISBURSEMENT");
        assert_eq!(TransactionType::LoanDisbursement.as_str(), "LOAN_DISBURSEMENT");
    }

    #[test]
    fn new_notification_serializes_type_field() {
        let input = NewNotification {
            user_id: "42".to_string(),
            title: "Reminder".to_string(),
            message: "Savings due Friday".to_string(),
            kind: NotificationType::SavingsReminder,
        };
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["userId"], "42");
        assert_eq!(json["type"], "SAVINGS_REMINDER");
    }

    #[test]
    fn group_reads_camel_case_fields() {
        let raw = r#"{"id":1,"name":"Umoja","description":"Savings circle","status":"PENDING",
            "createdAt":"2024-01-01","updatedAt":"2024-01-02","ownerId":9,"memberCount":12,
            "totalSavings":1500.5,"totalLoans":0}"#;
        let group: Group = serde_json::from_str(raw).unwrap();
        assert_eq!(group.status, GroupStatus::Pending);
        assert_eq!(group.member_count, 12);
    }
}
