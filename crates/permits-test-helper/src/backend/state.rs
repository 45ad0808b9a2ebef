use std::{
    collections::{BTreeMap, HashMap},
    time::Duration,
};

use actix_web::http::StatusCode;
use serde_json::{json, Value};

use super::reject;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Table {
    Chalans,
    FeeStructures,
    VehicleTypes,
    Permits,
    PermitTypes,
    Roles,
    Features,
    Notifications,
}

impl Table {
    fn not_found(&self) -> actix_web::Error {
        reject(StatusCode::NOT_FOUND, json!({"detail": "Not found."}))
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Account {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub is_staff: bool,
    pub is_active: bool,
    pub role_id: Option<u64>,
}

/// A request as seen by the backend, used by tests to check what was sent
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: String,
    pub body: Option<Value>,
}

#[derive(Debug)]
pub(crate) struct ForcedFailure {
    pub status: StatusCode,
    pub body: Value,
}

#[derive(Debug)]
pub struct BackendState {
    pub(crate) api_key: String,
    pub(crate) accounts: Vec<Account>,
    pub(crate) sessions: HashMap<String, u64>,
    tables: BTreeMap<Table, BTreeMap<u64, Value>>,
    history: BTreeMap<(Table, u64), Vec<Value>>,
    next_id: u64,
    pub(crate) requests: Vec<RecordedRequest>,
    pub(crate) forced_failures: HashMap<(String, String), ForcedFailure>,
    pub(crate) delays: HashMap<(String, String), Duration>,
}

impl BackendState {
    pub(crate) fn seeded(api_key: String) -> Self {
        let mut result = Self {
            api_key,
            accounts: Vec::new(),
            sessions: HashMap::new(),
            tables: BTreeMap::new(),
            history: BTreeMap::new(),
            next_id: 100,
            requests: Vec::new(),
            forced_failures: HashMap::new(),
            delays: HashMap::new(),
        };
        result.seed();
        result
    }

    fn seed(&mut self) {
        for (id, name, display_name) in [
            (1, "employee", "Is Employee"),
            (2, "report_view", "View Reports"),
            (3, "chalan_view", "View Chalans"),
            (4, "user_manage", "Manage Users"),
            (5, "permit_edit", "Edit Permits"),
        ] {
            self.put(
                Table::Features,
                id,
                json!({"id": id, "name": name, "display_name": display_name, "description": ""}),
            );
        }

        self.put(
            Table::Roles,
            1,
            json!({"id": 1, "name": "admin", "display_name": "Administrator",
                "description": "Full access", "features": [], "is_active": true}),
        );
        self.put(
            Table::Roles,
            2,
            json!({"id": 2, "name": "inspector", "display_name": "Inspector",
                "description": "Issues chalans", "is_active": true,
                "features": [{"id": 1, "name": "employee", "display_name": "Is Employee"},
                    {"id": 3, "name": "chalan_view", "display_name": "View Chalans"}]}),
        );
        self.put(
            Table::Roles,
            3,
            json!({"id": 3, "name": "clerk", "display_name": "Clerk",
                "description": "Data entry", "features": [], "is_active": true}),
        );

        for (id, username, first_name, role_id) in [
            (1, "admin", "Site", 1),
            (2, "officer", "Ali", 2),
            (3, "clerk", "Sana", 3),
        ] {
            self.accounts.push(Account {
                id,
                username: username.to_string(),
                email: format!("{username}@example.com"),
                first_name: first_name.to_string(),
                last_name: "Test".to_string(),
                password: format!("{username}-password"),
                is_staff: false,
                is_active: true,
                role_id: Some(role_id),
            });
        }

        self.put(
            Table::VehicleTypes,
            1,
            json!({"id": 1, "name": "Truck", "description": "Goods vehicle", "icon": "",
                "permit_duration_days": 365, "is_active": true}),
        );
        self.put(
            Table::VehicleTypes,
            2,
            json!({"id": 2, "name": "Bus", "description": "Passenger vehicle", "icon": "",
                "permit_duration_days": 180, "is_active": true}),
        );
        self.put(
            Table::PermitTypes,
            1,
            json!({"id": 1, "name": "Goods", "code": "G"}),
        );
        self.put(
            Table::PermitTypes,
            2,
            json!({"id": 2, "name": "Passenger", "code": "P"}),
        );

        self.put(
            Table::FeeStructures,
            1,
            json!({"id": 1, "vehicle_type": 1, "vehicle_type_name": "Truck",
                "base_fee": "1500.00", "description": "Truck violation", "is_active": true}),
        );
        self.put(
            Table::FeeStructures,
            2,
            json!({"id": 2, "vehicle_type": 2, "vehicle_type_name": "Bus",
                "base_fee": "800.00", "description": "Old bus rate", "is_active": false}),
        );

        self.put(
            Table::Chalans,
            1,
            json!({"id": 1, "chalan_number": "CH-00001", "owner_name": "Ahmed Raza",
                "owner_cnic": "35202-1234567-1", "owner_phone": "0300-1111111",
                "car_number": "LEA-1234", "permit": null, "vehicle_type": 1,
                "vehicle_type_name": "Truck", "violation_description": "Overloading",
                "fees_amount": "1500.00", "paid_amount": "0.00", "remaining_amount": "1500.00",
                "is_paid": false, "status": "pending", "issued_date": "2024-05-01T09:00:00Z",
                "issued_by_name": "officer", "issue_location": "Lahore", "remarks": null}),
        );
        self.put(
            Table::Chalans,
            2,
            json!({"id": 2, "chalan_number": "CH-00002", "owner_name": "Bilal Ahmed",
                "owner_cnic": "35202-7654321-3", "owner_phone": null,
                "car_number": "LEB-9876", "permit": 1, "vehicle_type": 2,
                "vehicle_type_name": "Bus", "violation_description": "No permit displayed",
                "fees_amount": 800, "paid_amount": 800, "remaining_amount": 0,
                "is_paid": true, "status": "paid", "issued_date": "2024-04-11T12:30:00Z",
                "payment_date": "2024-04-12T10:00:00Z", "payment_reference": "RCPT-1"}),
        );

        for (id, user, is_read, title, created_at) in [
            (1, 2, false, "Permit assigned", "2024-05-02T09:00:00Z"),
            (2, 2, true, "Welcome", "2024-04-01T09:00:00Z"),
            (3, 1, false, "Permit status changed", "2024-05-03T09:00:00Z"),
        ] {
            self.put(
                Table::Notifications,
                id,
                json!({"id": id, "user": user, "notification_type": "permit_assigned",
                    "title": title, "message": format!("{title} for PRM-00001"),
                    "permit": 1, "is_read": is_read, "action_url": "/permits/1",
                    "created_at": created_at}),
            );
        }

        let truck = self.get(Table::VehicleTypes, 1).cloned().unwrap_or(Value::Null);
        let goods = self.get(Table::PermitTypes, 1).cloned().unwrap_or(Value::Null);
        self.put(
            Table::Permits,
            1,
            json!({"id": 1, "permit_number": "PRM-00001", "authority": "RTA",
                "permit_type": goods, "vehicle_number": "LEB-4321", "vehicle_type": truck,
                "vehicle_make": "Hino", "vehicle_model": "Ranger", "vehicle_year": 2020,
                "owner_name": "Sara Khan", "owner_cnic": "35202-2222222-2",
                "owner_phone": "0300-2222222", "owner_email": null,
                "owner_address": "Model Town, Lahore", "status": "active",
                "valid_from": "2024-01-01", "valid_to": "2025-01-01",
                "description": "Goods carriage", "remarks": null}),
        );
        self.put(
            Table::Permits,
            2,
            json!({"id": 2, "permit_number": "PRM-00002", "authority": "PTA",
                "permit_type": goods, "vehicle_number": "LHR-5555", "vehicle_type": truck,
                "owner_name": "Usman Ali", "status": "pending", "description": "Renewal"}),
        );
    }

    pub(crate) fn put(&mut self, table: Table, id: u64, value: Value) {
        self.tables.entry(table).or_default().insert(id, value);
    }

    pub(crate) fn get(&self, table: Table, id: u64) -> Option<&Value> {
        self.tables.get(&table).and_then(|rows| rows.get(&id))
    }

    pub(crate) fn get_or_404(&self, table: Table, id: u64) -> actix_web::Result<&Value> {
        self.get(table, id).ok_or_else(|| table.not_found())
    }

    pub(crate) fn get_mut_or_404(
        &mut self,
        table: Table,
        id: u64,
    ) -> actix_web::Result<&mut Value> {
        self.tables
            .get_mut(&table)
            .and_then(|rows| rows.get_mut(&id))
            .ok_or_else(|| table.not_found())
    }

    pub(crate) fn remove(&mut self, table: Table, id: u64) -> actix_web::Result<Value> {
        self.tables
            .get_mut(&table)
            .and_then(|rows| rows.remove(&id))
            .ok_or_else(|| table.not_found())
    }

    pub(crate) fn rows(&self, table: Table) -> Vec<Value> {
        self.tables
            .get(&table)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Adds a record and returns the id assigned to it
    pub(crate) fn insert(&mut self, table: Table, mut value: Value) -> u64 {
        let id = self.next_id();
        value["id"] = json!(id);
        self.put(table, id, value);
        id
    }

    pub(crate) fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub(crate) fn add_history(&mut self, table: Table, id: u64, mut entry: Value) {
        entry["id"] = json!(self.next_id());
        entry["timestamp"] = json!(chrono::Utc::now().to_rfc3339());
        self.history.entry((table, id)).or_default().push(entry);
    }

    pub(crate) fn history(&self, table: Table, id: u64) -> Vec<Value> {
        self.history.get(&(table, id)).cloned().unwrap_or_default()
    }

    pub(crate) fn account(&self, id: u64) -> Option<&Account> {
        self.accounts.iter().find(|x| x.id == id)
    }

    pub(crate) fn account_mut_or_404(&mut self, id: u64) -> actix_web::Result<&mut Account> {
        self.accounts
            .iter_mut()
            .find(|x| x.id == id)
            .ok_or_else(|| reject(StatusCode::NOT_FOUND, json!({"detail": "User not found."})))
    }

    /// The user as the backend reports it, with the role and its features
    /// embedded
    pub(crate) fn user_json(&self, account: &Account) -> Value {
        let role = account
            .role_id
            .and_then(|id| self.get(Table::Roles, id))
            .cloned()
            .unwrap_or(Value::Null);
        let features = role.get("features").cloned().unwrap_or_else(|| json!([]));
        json!({
            "id": account.id,
            "username": account.username,
            "email": account.email,
            "first_name": account.first_name,
            "last_name": account.last_name,
            "is_staff": account.is_staff,
            "is_active": account.is_active,
            "role": role,
            "features": features,
        })
    }

    pub(crate) fn start_session(&mut self, account_id: u64) -> String {
        let token = uuid::Uuid::new_v4().simple().to_string();
        self.sessions.insert(token.clone(), account_id);
        token
    }
}
