//! In-memory records served by the mock API.
//!
//! These mirror the client's DTOs but are defined independently so the
//! integration tests catch schema drift.

use serde::Serialize;
use uuid::Uuid;

pub const CREATED_AT: &str = "2024-05-01T08:00:00Z";
pub const ACTED_AT: &str = "2024-05-02T09:30:00Z";

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
    pub owner_id: u64,
    pub member_count: u32,
    pub total_savings: f64,
    pub total_loans: f64,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: u64,
    pub group_id: u64,
    pub user_id: u64,
    pub joined_at: String,
    pub status: String,
    pub user: Contact,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Role {
    pub id: u64,
    pub name: String,
    pub description: String,
}

#[derive(Clone, Debug, Serialize)]
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
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
    pub role: Role,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountHolder {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct GroupRef {
    pub id: u64,
    pub name: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: u64,
    pub account_type: String,
    pub balance: f64,
    pub user: AccountHolder,
    pub group: GroupRef,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: u64,
    pub transaction_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: f64,
    pub account_id: u64,
    pub status: String,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    pub account: Account,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub read: bool,
    pub created_at: String,
    pub updated_at: String,
    pub user_id: String,
}

/// The operator account accepted by `/auth/login`.
#[derive(Clone, Debug, Serialize)]
pub struct Operator {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub email_verified_at: Option<String>,
    pub deactivated_at: Option<String>,
    pub role: String,
    pub created_at: String,
    pub updated_at: String,
}

pub struct Store {
    pub operator: Operator,
    pub operator_phone: String,
    pub operator_password: String,
    pub groups: Vec<Group>,
    pub members: Vec<Member>,
    pub users: Vec<User>,
    pub transactions: Vec<Transaction>,
    pub notifications: Vec<Notification>,
}

fn user(id: u64, first: &str, last: &str, status: &str) -> User {
    User {
        id,
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: format!("{}@example.com", first.to_lowercase()),
        phone: format!("+2547000000{id:02}"),
        id_type: "NATIONAL_ID".to_string(),
        id_number: format!("ID-{id:04}"),
        role_id: 2,
        status: status.to_string(),
        created_at: CREATED_AT.to_string(),
        updated_at: CREATED_AT.to_string(),
        role: Role {
            id: 2,
            name: "member".to_string(),
            description: "Savings group member".to_string(),
        },
    }
}

fn group(id: u64, name: &str, status: &str, owner_id: u64) -> Group {
    Group {
        id,
        name: name.to_string(),
        description: format!("{name} savings circle"),
        status: status.to_string(),
        created_at: CREATED_AT.to_string(),
        updated_at: CREATED_AT.to_string(),
        owner_id,
        member_count: 2,
        total_savings: 1250.0 * id as f64,
        total_loans: 300.0,
    }
}

fn transaction(
    id: u64,
    kind: &str,
    status: &str,
    amount: f64,
    holder: &User,
    group: &Group,
) -> Transaction {
    Transaction {
        id,
        transaction_id: format!("TX-{id:05}"),
        kind: kind.to_string(),
        amount,
        account_id: holder.id,
        status: status.to_string(),
        description: format!("{} by {}", kind.to_lowercase(), holder.first_name),
        created_at: CREATED_AT.to_string(),
        updated_at: CREATED_AT.to_string(),
        approved_by: None,
        approved_at: None,
        rejection_reason: None,
        account: Account {
            id: holder.id,
            account_type: "SAVINGS".to_string(),
            balance: 5000.0,
            user: AccountHolder {
                id: holder.id,
                first_name: holder.first_name.clone(),
                last_name: holder.last_name.clone(),
                email: holder.email.clone(),
            },
            group: GroupRef {
                id: group.id,
                name: group.name.clone(),
            },
        },
    }
}

impl Store {
    pub fn seeded() -> Self {
        let users = vec![
            user(1, "Amina", "Otieno", "ACTIVE"),
            user(2, "Baraka", "Mwangi", "ACTIVE"),
            user(3, "Chausiku", "Njeri", "SUSPENDED"),
        ];
        let groups = vec![
            group(1, "Umoja", "ACTIVE", 1),
            group(2, "Tumaini", "PENDING", 2),
            group(3, "Imani", "PENDING", 3),
        ];
        let members = users
            .iter()
            .take(2)
            .enumerate()
            .map(|(i, u)| Member {
                id: i as u64 + 1,
                group_id: 1,
                user_id: u.id,
                joined_at: CREATED_AT.to_string(),
                status: "ACTIVE".to_string(),
                user: Contact {
                    id: u.id,
                    first_name: u.first_name.clone(),
                    last_name: u.last_name.clone(),
                    email: u.email.clone(),
                    phone: u.phone.clone(),
                },
            })
            .collect();
        let transactions = vec![
            transaction(1, "DEPOSIT", "COMPLETED", 500.0, &users[0], &groups[0]),
            transaction(2, "WITHDRAWAL", "PENDING", 120.0, &users[1], &groups[0]),
            transaction(3, "DEPOSIT", "PENDING", 75.5, &users[0], &groups[0]),
            transaction(4, "LOAN_DISBURSEMENT", "APPROVED", 1000.0, &users[1], &groups[0]),
        ];
        let notifications = vec![
            Notification {
                id: Uuid::new_v4(),
                title: "Savings reminder".to_string(),
                message: "Weekly contribution due Friday".to_string(),
                kind: "SAVINGS_REMINDER".to_string(),
                read: false,
                created_at: CREATED_AT.to_string(),
                updated_at: CREATED_AT.to_string(),
                user_id: "1".to_string(),
            },
            Notification {
                id: Uuid::new_v4(),
                title: "Group update".to_string(),
                message: "Tumaini requested approval".to_string(),
                kind: "GROUP_UPDATE".to_string(),
                read: true,
                created_at: CREATED_AT.to_string(),
                updated_at: CREATED_AT.to_string(),
                user_id: "1".to_string(),
            },
        ];

        Store {
            operator: Operator {
                id: 1,
                name: "Console Admin".to_string(),
                email: "admin@example.com".to_string(),
                email_verified_at: Some(CREATED_AT.to_string()),
                deactivated_at: None,
                role: "admin".to_string(),
                created_at: CREATED_AT.to_string(),
                updated_at: CREATED_AT.to_string(),
            },
            operator_phone: "+254700000000".to_string(),
            operator_password: "secret".to_string(),
            groups,
            members,
            users,
            transactions,
            notifications,
        }
    }
}
